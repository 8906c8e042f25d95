use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::{Symbol, ValidationError};

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const NET_INCOME: &str = "Net Income";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Loosely-typed company profile, field name to value, as the provider reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyProfile(BTreeMap<String, Value>);

impl CompanyProfile {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Typed projection of the fields the dashboard displays.
    ///
    /// Every required field that is absent or of the wrong type is reported in
    /// a single [`ValidationError::IncompleteProfile`].
    pub fn project(&self) -> Result<CompanyInfo, ValidationError> {
        let long_name = self.text("longName");
        let market_cap = self.get("marketCap").and_then(whole_number);
        let sector = self.text("sector");

        match (long_name, market_cap, sector) {
            (Some(long_name), Some(market_cap), Some(sector)) => Ok(CompanyInfo {
                long_name,
                market_cap,
                sector,
                industry: self.text("industry"),
                country: self.text("country"),
                website: self.text("website"),
                currency: self.text("currency"),
                full_time_employees: self.get("fullTimeEmployees").and_then(whole_number),
            }),
            (long_name, market_cap, sector) => {
                let mut missing = Vec::new();
                if long_name.is_none() {
                    missing.push("longName");
                }
                if market_cap.is_none() {
                    missing.push("marketCap");
                }
                if sector.is_none() {
                    missing.push("sector");
                }
                Err(ValidationError::IncompleteProfile { missing })
            }
        }
    }

    fn text(&self, field: &str) -> Option<String> {
        self.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    }
}

fn whole_number(value: &Value) -> Option<u64> {
    if let Some(number) = value.as_u64() {
        return Some(number);
    }
    value
        .as_f64()
        .filter(|number| number.is_finite() && *number >= 0.0)
        .map(|number| number.trunc() as u64)
}

/// Validated company facts rendered in the "Company Information" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub long_name: String,
    pub market_cap: u64,
    pub sector: String,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub currency: Option<String>,
    pub full_time_employees: Option<u64>,
}

/// One weekly OHLC bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Trailing price history for one symbol, ordered by ascending date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, bars: Vec<PriceBar>) -> Self {
        Self { symbol, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Reporting cadence of a financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Quarterly,
    Annual,
}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

/// One statement line (e.g. "Total Revenue") across every reported period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Aligned with [`StatementTable::periods`]; `None` where the provider has no value.
    pub values: Vec<Option<f64>>,
}

/// Income statement in provider orientation: line items as rows, periods as columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub frequency: Frequency,
    /// Period-end dates as reported, e.g. `"2024-03-31"`.
    pub periods: Vec<String>,
    pub line_items: Vec<LineItem>,
}

impl StatementTable {
    pub fn new(frequency: Frequency, periods: Vec<String>) -> Self {
        Self {
            frequency,
            periods,
            line_items: Vec::new(),
        }
    }

    pub fn with_line_item(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.line_items.push(LineItem {
            name: name.into(),
            values,
        });
        self
    }

    /// One row per reporting period, in the provider's period order.
    pub fn transpose(&self) -> Vec<FinancialsRow> {
        self.periods
            .iter()
            .enumerate()
            .map(|(index, period)| FinancialsRow {
                period: period.clone(),
                values: self
                    .line_items
                    .iter()
                    .map(|item| (item.name.clone(), item.values.get(index).copied().flatten()))
                    .collect(),
            })
            .collect()
    }
}

/// Statement figures for a single reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialsRow {
    pub period: String,
    pub values: BTreeMap<String, Option<f64>>,
}

impl FinancialsRow {
    pub fn value(&self, line_item: &str) -> Option<f64> {
        self.values.get(line_item).copied().flatten()
    }

    pub fn total_revenue(&self) -> Option<f64> {
        self.value(TOTAL_REVENUE)
    }

    pub fn net_income(&self) -> Option<f64> {
        self.value(NET_INCOME)
    }
}
