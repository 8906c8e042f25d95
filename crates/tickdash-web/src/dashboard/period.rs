use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tickdash_core::ValidationError;

/// Which statement the financials section charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PeriodSelection {
    #[default]
    Quarterly,
    Annual,
}

impl PeriodSelection {
    /// Toggle options in display order.
    pub const OPTIONS: [Self; 2] = [Self::Quarterly, Self::Annual];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }

    /// Name of the ordinal x-axis field.
    pub const fn axis_field(self) -> &'static str {
        match self {
            Self::Quarterly => "Quarter",
            Self::Annual => "Year",
        }
    }

    /// Axis label for a reporting period under this selection.
    pub fn period_label(self, period: &str) -> String {
        match self {
            Self::Quarterly => quarter_label(period),
            Self::Annual => year_label(period),
        }
    }
}

impl Display for PeriodSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeriodSelection {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ValidationError::InvalidPeriod {
                value: value.to_owned(),
            })
    }
}

/// Quarterly periods are shown exactly as reported.
pub fn quarter_label(period: &str) -> String {
    period.to_owned()
}

/// Annual periods are shown as the text before the first `-`, e.g. `"2023-09-30"` → `"2023"`.
pub fn year_label(period: &str) -> String {
    period.split('-').next().unwrap_or(period).to_owned()
}
