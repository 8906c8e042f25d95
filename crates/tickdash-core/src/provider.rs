//! Market-data provider contract.
//!
//! The dashboard consumes three kinds of provider data, exposed through four
//! memoized operations:
//!
//! | Operation | Provider call | Result |
//! |-----------|---------------|--------|
//! | [`Operation::CompanyInfo`] | [`MarketDataProvider::company_profile`] | [`CompanyProfile`] |
//! | [`Operation::QuarterlyFinancials`] | [`MarketDataProvider::income_statement`] | [`StatementTable`] |
//! | [`Operation::AnnualFinancials`] | [`MarketDataProvider::income_statement`] | [`StatementTable`] |
//! | [`Operation::WeeklyPriceHistory`] | [`MarketDataProvider::weekly_price_history`] | [`PriceHistory`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{CompanyProfile, Frequency, PriceHistory, StatementTable, Symbol};

/// Boxed future returned by provider methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Identifies which provider answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    Fixture,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Fixture => "fixture",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four memoized data-access operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CompanyInfo,
    QuarterlyFinancials,
    AnnualFinancials,
    WeeklyPriceHistory,
}

impl Operation {
    pub const ALL: [Self; 4] = [
        Self::CompanyInfo,
        Self::QuarterlyFinancials,
        Self::AnnualFinancials,
        Self::WeeklyPriceHistory,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompanyInfo => "company_info",
            Self::QuarterlyFinancials => "quarterly_financials",
            Self::AnnualFinancials => "annual_financials",
            Self::WeeklyPriceHistory => "weekly_price_history",
        }
    }

    pub const fn for_statement(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Quarterly => Self::QuarterlyFinancials,
            Frequency::Annual => Self::AnnualFinancials,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    NotFound,
    Unavailable,
    RateLimited,
    InvalidResponse,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Adapter contract every market-data provider implements.
///
/// Implementations do not cache; memoization is layered on top by
/// [`DataAccess`](crate::DataAccess).
pub trait MarketDataProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Company profile lookup.
    fn company_profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CompanyProfile>;

    /// Income statement with line items as rows and periods as columns.
    fn income_statement<'a>(
        &'a self,
        symbol: &'a Symbol,
        frequency: Frequency,
    ) -> ProviderFuture<'a, StatementTable>;

    /// Trailing one year of weekly OHLC bars, ascending by date.
    fn weekly_price_history<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, PriceHistory>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_code() {
        let error = SourceError::not_found("no data for symbol 'ZZZZ'");
        assert_eq!(
            error.to_string(),
            "no data for symbol 'ZZZZ' (source.not_found)"
        );
        assert!(!error.retryable());
    }

    #[test]
    fn statement_operations_follow_frequency() {
        assert_eq!(
            Operation::for_statement(Frequency::Quarterly),
            Operation::QuarterlyFinancials
        );
        assert_eq!(
            Operation::for_statement(Frequency::Annual).as_str(),
            "annual_financials"
        );
    }
}
