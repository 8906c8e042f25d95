//! # Dashboard
//!
//! Builds the page model from the current view state.
//!
//! [`render_dashboard`] is a pure function of `(symbol, period)` plus whatever
//! the memoized data access returns, so a page can be rebuilt on every
//! request without hidden state. Sections are fetched strictly in page order:
//! company info, weekly prices, quarterly then annual financials. Both
//! statements are fetched whichever period is selected.

pub mod charts;
pub mod page;
pub mod period;

use std::fmt::Display;
use std::sync::Arc;

use tickdash_core::{DataAccess, FinancialsRow, SourceError, Symbol, NET_INCOME, TOTAL_REVENUE};

pub use charts::{BarChartSpec, CandlestickFigure};
pub use page::{
    format_market_cap, ChartSection, CompanySection, DashboardPage, FinancialCharts,
    FinancialsSection, PeriodToggle, Section, SymbolInput, TITLE,
};
pub use period::{quarter_label, year_label, PeriodSelection};

use charts::{NET_INCOME_COLOR, REVENUE_COLOR};

/// The two inputs a page depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub symbol: String,
    pub period: PeriodSelection,
}

impl ViewState {
    pub fn new(symbol: impl Into<String>, period: PeriodSelection) -> Self {
        Self {
            symbol: symbol.into(),
            period,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new("AAPL", PeriodSelection::default())
    }
}

/// Fetch everything the page shows and lay it out.
///
/// A failing fetch only blanks its own section; the message names the symbol
/// so the user can correct it and re-render.
pub async fn render_dashboard(data: &DataAccess, view: &ViewState) -> DashboardPage {
    let symbol_input = SymbolInput::new(view.symbol.clone());
    let symbol = match Symbol::parse(&view.symbol) {
        Ok(symbol) => symbol,
        Err(error) => {
            tracing::debug!(input = %view.symbol, %error, "symbol input rejected");
            return DashboardPage::prompt(
                symbol_input,
                format!("Enter a valid stock symbol: {error}"),
            );
        }
    };
    tracing::debug!(%symbol, period = %view.period, "rendering dashboard");

    let company = match data.company_info(&symbol).await {
        Ok(info) => Section::Ready(CompanySection::new(info)),
        Err(error) => unavailable(&symbol, error),
    };

    let chart = match data.fetch_weekly_price_history(&symbol).await {
        Ok(history) => Section::Ready(ChartSection {
            heading: page::CHART_HEADING,
            candlestick: charts::candlestick(&history),
        }),
        Err(error) => unavailable(&symbol, error),
    };

    let quarterly = data.fetch_quarterly_financials(&symbol).await;
    let annual = data.fetch_annual_financials(&symbol).await;
    let selected = match view.period {
        PeriodSelection::Quarterly => quarterly,
        PeriodSelection::Annual => annual,
    };

    DashboardPage {
        title: TITLE,
        symbol_input,
        prompt: None,
        company: Some(company),
        chart: Some(chart),
        financials: Some(FinancialsSection {
            heading: page::FINANCIALS_HEADING,
            toggle: PeriodToggle::new(view.period),
            charts: financial_charts(&symbol, view.period, selected),
        }),
    }
}

fn financial_charts(
    symbol: &Symbol,
    period: PeriodSelection,
    rows: Result<Arc<Vec<FinancialsRow>>, SourceError>,
) -> Section<FinancialCharts> {
    match rows {
        Ok(rows) => Section::Ready(FinancialCharts {
            axis: period.axis_field(),
            revenue: charts::financial_bars(&rows, period, TOTAL_REVENUE, REVENUE_COLOR),
            net_income: charts::financial_bars(&rows, period, NET_INCOME, NET_INCOME_COLOR),
        }),
        Err(error) => unavailable(symbol, error),
    }
}

fn unavailable<T>(symbol: &Symbol, error: impl Display) -> Section<T> {
    Section::Unavailable {
        message: format!("No data for symbol {symbol}: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use tickdash_core::{CacheConfig, FixtureProvider, Operation};

    use super::*;

    fn data_access(provider: Arc<FixtureProvider>) -> DataAccess {
        DataAccess::new(provider, CacheConfig::default())
    }

    #[tokio::test]
    async fn invalid_symbol_renders_prompt_without_fetching() {
        let provider = Arc::new(FixtureProvider::new());
        let data = data_access(provider.clone());

        let view = ViewState::new("   ", PeriodSelection::Quarterly);
        let page = render_dashboard(&data, &view).await;

        assert_eq!(page.title, "Stock Dashboard");
        assert_eq!(page.symbol_input.value, "   ");
        assert_eq!(
            page.prompt.as_deref(),
            Some("Enter a valid stock symbol: symbol cannot be empty")
        );
        assert!(page.company.is_none());
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn both_statements_are_fetched_for_either_selection() {
        let provider = Arc::new(FixtureProvider::new());
        let data = data_access(provider.clone());

        render_dashboard(&data, &ViewState::new("MSFT", PeriodSelection::Annual)).await;

        for operation in Operation::ALL {
            assert_eq!(provider.calls(operation), 1, "{operation}");
        }
    }

    #[tokio::test]
    async fn unknown_symbol_blanks_every_section() {
        let provider = Arc::new(FixtureProvider::new().strict());
        let data = data_access(provider);

        let view = ViewState::new("ZZZZ", PeriodSelection::Quarterly);
        let page = render_dashboard(&data, &view).await;

        let company = page.company.expect("company section");
        assert_eq!(
            company.unavailable_message(),
            Some("No data for symbol ZZZZ: no data for symbol 'ZZZZ' (source.not_found)")
        );
        assert!(page.chart.expect("chart section").ready().is_none());
        let financials = page.financials.expect("financials section");
        assert!(financials.charts.ready().is_none());
        assert_eq!(financials.toggle.selected, PeriodSelection::Quarterly);
    }
}
