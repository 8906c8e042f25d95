//! # Domain Models
//!
//! Types exchanged between the market-data provider and the dashboard.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Ticker symbol, kept verbatim |
//! | [`CompanyProfile`] | Loose provider profile mapping |
//! | [`CompanyInfo`] | Typed projection of the profile |
//! | [`PriceHistory`] | Weekly OHLC bars, ascending by date |
//! | [`StatementTable`] | Income statement, line items as rows |
//! | [`FinancialsRow`] | One reporting period after transposition |

mod models;
mod symbol;

pub use models::{
    CompanyInfo, CompanyProfile, FinancialsRow, Frequency, LineItem, PriceBar, PriceHistory,
    StatementTable, NET_INCOME, TOTAL_REVENUE,
};
pub use symbol::Symbol;
