//! # Tickdash Core
//!
//! Market-data access for the tickdash stock dashboard.
//!
//! ## Overview
//!
//! - **Domain models** for company profiles, weekly price bars and income statements
//! - **Provider contract** implemented by the Yahoo adapter and an offline fixture provider
//! - **Memoization cache** shared by concurrent requests, populated only on success
//! - **Data access** exposing the four memoized fetch operations the dashboard renders
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider implementations (Yahoo, fixture) |
//! | [`cache`] | Memoization cache with optional TTL and capacity |
//! | [`data_access`] | The four memoized fetch operations |
//! | [`domain`] | Symbol, profile, price and statement types |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider`] | Provider trait, operations and source errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickdash_core::{CacheConfig, DataAccess, FixtureProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let data = DataAccess::new(Arc::new(FixtureProvider::new()), CacheConfig::default());
//!     let symbol = Symbol::parse("AAPL")?;
//!
//!     let info = data.fetch_company_info(&symbol).await?.project()?;
//!     println!("{} ({})", info.long_name, info.sector);
//!
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod data_access;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;

pub use adapters::{FixtureDataset, FixtureProvider, YahooAdapter, FIXTURE_AS_OF};
pub use cache::{CacheConfig, CacheMode, Lookup, MemoCache};
pub use data_access::{CacheSizes, DataAccess};
pub use domain::{
    CompanyInfo, CompanyProfile, FinancialsRow, Frequency, LineItem, PriceBar, PriceHistory,
    StatementTable, Symbol, NET_INCOME, TOTAL_REVENUE,
};
pub use error::{CoreError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use provider::{
    MarketDataProvider, Operation, ProviderFuture, ProviderId, SourceError, SourceErrorKind,
};
