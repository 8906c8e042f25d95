use serde::Serialize;
use tickdash_core::CompanyInfo;

use super::charts::{BarChartSpec, CandlestickFigure};
use super::period::PeriodSelection;

pub const TITLE: &str = "Stock Dashboard";
pub const SYMBOL_LABEL: &str = "Enter a stock symbol";
pub const COMPANY_HEADING: &str = "Company Information";
pub const CHART_HEADING: &str = "Chart";
pub const FINANCIALS_HEADING: &str = "Financials";
pub const PERIOD_LABEL: &str = "Period";

/// Rendered page, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub symbol_input: SymbolInput,
    /// Shown instead of the sections when the symbol input cannot be used.
    pub prompt: Option<String>,
    pub company: Option<Section<CompanySection>>,
    pub chart: Option<Section<ChartSection>>,
    pub financials: Option<FinancialsSection>,
}

impl DashboardPage {
    pub(crate) fn prompt(symbol_input: SymbolInput, message: String) -> Self {
        Self {
            title: TITLE,
            symbol_input,
            prompt: Some(message),
            company: None,
            chart: None,
            financials: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolInput {
    pub label: &'static str,
    pub value: String,
}

impl SymbolInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            label: SYMBOL_LABEL,
            value: value.into(),
        }
    }
}

/// A page section that either rendered or explains why it could not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Unavailable { message: String },
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(content) => Some(content),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_message(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanySection {
    pub heading: &'static str,
    /// `Name: ...`, `Market Cap: $...`, `Sector: ...`
    pub lines: Vec<String>,
    pub info: CompanyInfo,
}

impl CompanySection {
    pub fn new(info: CompanyInfo) -> Self {
        let lines = vec![
            format!("Name: {}", info.long_name),
            format!("Market Cap: {}", format_market_cap(info.market_cap)),
            format!("Sector: {}", info.sector),
        ];
        Self {
            heading: COMPANY_HEADING,
            lines,
            info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSection {
    pub heading: &'static str,
    pub candlestick: CandlestickFigure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialsSection {
    pub heading: &'static str,
    pub toggle: PeriodToggle,
    pub charts: Section<FinancialCharts>,
}

/// Two-option segmented control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodToggle {
    pub label: &'static str,
    pub options: Vec<ToggleOption>,
    pub selected: PeriodSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOption {
    pub label: &'static str,
    pub selected: bool,
}

impl PeriodToggle {
    pub fn new(selected: PeriodSelection) -> Self {
        Self {
            label: PERIOD_LABEL,
            options: PeriodSelection::OPTIONS
                .into_iter()
                .map(|option| ToggleOption {
                    label: option.label(),
                    selected: option == selected,
                })
                .collect(),
            selected,
        }
    }
}

/// Revenue and net income bars over the selected period axis, stacked vertically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialCharts {
    pub axis: &'static str,
    pub revenue: BarChartSpec,
    pub net_income: BarChartSpec,
}

/// `$` followed by the value with comma thousands separators.
pub fn format_market_cap(market_cap: u64) -> String {
    let digits = market_cap.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_cap_uses_thousands_separators() {
        assert_eq!(format_market_cap(3_012_345_678), "$3,012,345,678");
        assert_eq!(format_market_cap(3_000_000_000_000), "$3,000,000,000,000");
        assert_eq!(format_market_cap(999), "$999");
        assert_eq!(format_market_cap(1_000), "$1,000");
        assert_eq!(format_market_cap(0), "$0");
    }

    #[test]
    fn company_lines_follow_display_order() {
        let section = CompanySection::new(CompanyInfo {
            long_name: "Apple Inc.".to_owned(),
            market_cap: 3_000_000_000_000,
            sector: "Technology".to_owned(),
            industry: None,
            country: None,
            website: None,
            currency: None,
            full_time_employees: None,
        });

        assert_eq!(
            section.lines,
            vec![
                "Name: Apple Inc.",
                "Market Cap: $3,000,000,000,000",
                "Sector: Technology"
            ]
        );
    }

    #[test]
    fn toggle_marks_exactly_one_option() {
        let toggle = PeriodToggle::new(PeriodSelection::Annual);

        let selected = toggle
            .options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.label)
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["Annual"]);
        assert_eq!(toggle.options[0].label, "Quarterly");
    }

    #[test]
    fn sections_serialize_with_status_tag() {
        let section: Section<u8> = Section::Unavailable {
            message: "No data for symbol ZZZZ".to_owned(),
        };

        let encoded = serde_json::to_value(&section).expect("serializes");

        assert_eq!(encoded["status"], "unavailable");
        assert_eq!(encoded["content"]["message"], "No data for symbol ZZZZ");
        assert_eq!(section.unavailable_message(), Some("No data for symbol ZZZZ"));
        assert!(section.ready().is_none());
    }
}
