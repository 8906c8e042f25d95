use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{json, Value};
use time::{Date, Month};

use crate::provider::{MarketDataProvider, Operation, ProviderFuture, ProviderId, SourceError};
use crate::{CompanyProfile, Frequency, PriceBar, PriceHistory, StatementTable, Symbol};

/// Last trading day covered by synthetic data.
pub const FIXTURE_AS_OF: Date = time::macros::date!(2024 - 06 - 28);

const WEEKS_PER_YEAR: usize = 52;
const QUARTERS: usize = 5;
const YEARS: usize = 4;

/// Everything the fixture provider serves for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDataset {
    pub profile: CompanyProfile,
    pub quarterly: StatementTable,
    pub annual: StatementTable,
    pub prices: Vec<PriceBar>,
}

impl FixtureDataset {
    /// Deterministic data derived from the symbol text.
    pub fn synthetic(symbol: &Symbol) -> Result<Self, SourceError> {
        let seed = symbol_seed(symbol);
        let entry = catalog_entry(symbol.as_str());
        Ok(Self {
            profile: synthetic_profile(symbol, seed, entry),
            quarterly: synthetic_statement(seed, Frequency::Quarterly, entry)?,
            annual: synthetic_statement(seed, Frequency::Annual, entry)?,
            prices: synthetic_prices(seed),
        })
    }
}

/// Offline provider serving deterministic data.
///
/// Any symbol gets synthetic data unless the provider is strict, in which case
/// only registered datasets are served and everything else is `NotFound`.
/// Calls are counted per operation so tests can observe memoization.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    datasets: HashMap<Symbol, FixtureDataset>,
    strict: bool,
    latency: Option<Duration>,
    calls: [AtomicUsize; 4],
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `dataset` for `symbol` instead of synthetic data.
    pub fn with_dataset(mut self, symbol: Symbol, dataset: FixtureDataset) -> Self {
        self.datasets.insert(symbol, dataset);
        self
    }

    /// Only registered symbols are known.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Delay every response, useful for exercising concurrent callers.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.calls[slot(operation)].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        Operation::ALL.into_iter().map(|op| self.calls(op)).sum()
    }

    async fn dataset(
        &self,
        operation: Operation,
        symbol: &Symbol,
    ) -> Result<FixtureDataset, SourceError> {
        self.calls[slot(operation)].fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.datasets.get(symbol) {
            Some(dataset) => Ok(dataset.clone()),
            None if self.strict => Err(SourceError::not_found(format!(
                "no data for symbol '{symbol}'"
            ))),
            None => FixtureDataset::synthetic(symbol),
        }
    }
}

impl MarketDataProvider for FixtureProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn company_profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CompanyProfile> {
        Box::pin(async move {
            let dataset = self.dataset(Operation::CompanyInfo, symbol).await?;
            Ok(dataset.profile)
        })
    }

    fn income_statement<'a>(
        &'a self,
        symbol: &'a Symbol,
        frequency: Frequency,
    ) -> ProviderFuture<'a, StatementTable> {
        Box::pin(async move {
            let dataset = self
                .dataset(Operation::for_statement(frequency), symbol)
                .await?;
            Ok(match frequency {
                Frequency::Quarterly => dataset.quarterly,
                Frequency::Annual => dataset.annual,
            })
        })
    }

    fn weekly_price_history<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, PriceHistory> {
        Box::pin(async move {
            let dataset = self.dataset(Operation::WeeklyPriceHistory, symbol).await?;
            Ok(PriceHistory::new(symbol.clone(), dataset.prices))
        })
    }
}

const fn slot(operation: Operation) -> usize {
    match operation {
        Operation::CompanyInfo => 0,
        Operation::QuarterlyFinancials => 1,
        Operation::AnnualFinancials => 2,
        Operation::WeeklyPriceHistory => 3,
    }
}

struct CatalogEntry {
    symbol: &'static str,
    name: &'static str,
    market_cap: u64,
    sector: &'static str,
    industry: &'static str,
    fiscal_year_end: Month,
}

static CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        symbol: "AAPL",
        name: "Apple Inc.",
        market_cap: 3_000_000_000_000,
        sector: "Technology",
        industry: "Consumer Electronics",
        fiscal_year_end: Month::September,
    },
    CatalogEntry {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        market_cap: 3_100_000_000_000,
        sector: "Technology",
        industry: "Software - Infrastructure",
        fiscal_year_end: Month::June,
    },
    CatalogEntry {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        market_cap: 2_100_000_000_000,
        sector: "Communication Services",
        industry: "Internet Content & Information",
        fiscal_year_end: Month::December,
    },
    CatalogEntry {
        symbol: "AMZN",
        name: "Amazon.com, Inc.",
        market_cap: 1_900_000_000_000,
        sector: "Consumer Cyclical",
        industry: "Internet Retail",
        fiscal_year_end: Month::December,
    },
];

const SECTORS: [&str; 5] = [
    "Technology",
    "Healthcare",
    "Industrials",
    "Financial Services",
    "Energy",
];

fn catalog_entry(symbol: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.symbol == symbol)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(byte as u64))
}

fn synthetic_profile(
    symbol: &Symbol,
    seed: u64,
    entry: Option<&CatalogEntry>,
) -> CompanyProfile {
    let (name, market_cap, sector, industry) = match entry {
        Some(entry) => (
            entry.name.to_owned(),
            entry.market_cap,
            entry.sector,
            entry.industry,
        ),
        None => (
            format!("{symbol} Holdings Inc."),
            5_000_000_000 + (seed % 500) * 1_000_000_000,
            SECTORS[(seed % SECTORS.len() as u64) as usize],
            "Diversified",
        ),
    };

    let mut profile = CompanyProfile::default();
    profile.insert("symbol", Value::String(symbol.to_string()));
    profile.insert("longName", Value::String(name));
    profile.insert("marketCap", json!(market_cap));
    profile.insert("sector", Value::String(sector.to_owned()));
    profile.insert("industry", Value::String(industry.to_owned()));
    profile.insert("country", Value::String("United States".to_owned()));
    profile.insert("currency", Value::String("USD".to_owned()));
    profile.insert("fullTimeEmployees", json!(1_000 + seed % 150_000));
    profile
}

fn synthetic_statement(
    seed: u64,
    frequency: Frequency,
    entry: Option<&CatalogEntry>,
) -> Result<StatementTable, SourceError> {
    let (periods, scale) = match frequency {
        Frequency::Quarterly => (quarter_ends(FIXTURE_AS_OF, QUARTERS)?, 1.0),
        Frequency::Annual => {
            let month = entry.map_or(Month::December, |entry| entry.fiscal_year_end);
            (fiscal_year_ends(FIXTURE_AS_OF, month, YEARS)?, 4.0)
        }
    };

    let base = (20.0 + (seed % 80) as f64) * 1e9 * scale;
    let margin = 0.12 + (seed % 10) as f64 / 100.0;
    let revenue = (0..periods.len())
        .map(|index| base * (1.0 - 0.02 * index as f64))
        .collect::<Vec<_>>();
    let scaled = |ratio: f64| revenue.iter().map(|r| Some(r * ratio)).collect::<Vec<_>>();
    let eps = revenue
        .iter()
        .map(|r| Some(((r * margin / 15e9) * 100.0).round() / 100.0))
        .collect();

    Ok(StatementTable::new(
        frequency,
        periods.iter().map(Date::to_string).collect(),
    )
    .with_line_item(crate::TOTAL_REVENUE, scaled(1.0))
    .with_line_item("Cost Of Revenue", scaled(0.55))
    .with_line_item("Gross Profit", scaled(0.45))
    .with_line_item("Operating Income", scaled(0.30))
    .with_line_item(crate::NET_INCOME, scaled(margin))
    .with_line_item("EBITDA", scaled(0.35))
    .with_line_item("Diluted EPS", eps))
}

fn synthetic_prices(seed: u64) -> Vec<PriceBar> {
    let last_monday = FIXTURE_AS_OF
        - time::Duration::days(i64::from(FIXTURE_AS_OF.weekday().number_days_from_monday()));

    (0..WEEKS_PER_YEAR)
        .map(|index| {
            let weeks_back = (WEEKS_PER_YEAR - 1 - index) as i64;
            let base = 90.0 + ((seed + index as u64) % 350) as f64 / 10.0;
            PriceBar {
                date: last_monday - time::Duration::weeks(weeks_back),
                open: base,
                high: base + 1.20,
                low: base - 0.80,
                close: base + 0.30,
                volume: Some(20_000 + (index as u64) * 25),
            }
        })
        .collect()
}

/// Most recent `count` calendar quarter ends on or before `as_of`, newest first.
fn quarter_ends(as_of: Date, count: usize) -> Result<Vec<Date>, SourceError> {
    let mut year = as_of.year();
    let mut quarter = (u8::from(as_of.month()) - 1) / 3;
    let mut ends = Vec::with_capacity(count);

    while ends.len() < count {
        let end = month_end(year, quarter * 3 + 3)?;
        if end <= as_of {
            ends.push(end);
        }
        if quarter == 0 {
            quarter = 3;
            year -= 1;
        } else {
            quarter -= 1;
        }
    }
    Ok(ends)
}

/// Most recent `count` fiscal year ends on or before `as_of`, newest first.
fn fiscal_year_ends(as_of: Date, month: Month, count: usize) -> Result<Vec<Date>, SourceError> {
    let mut year = as_of.year();
    let mut ends = Vec::with_capacity(count);
    while ends.len() < count {
        let end = month_end(year, u8::from(month))?;
        if end <= as_of {
            ends.push(end);
        }
        year -= 1;
    }
    Ok(ends)
}

fn month_end(year: i32, month: u8) -> Result<Date, SourceError> {
    let month = Month::try_from(month)
        .map_err(|e| SourceError::internal(format!("invalid fixture month: {e}")))?;
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };
    Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(Date::previous_day)
        .ok_or_else(|| SourceError::internal(format!("invalid fixture date {year}-{month}")))
}
