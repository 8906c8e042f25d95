//! Memoized data-access operations backing the dashboard.
//!
//! Each operation is keyed by the exact symbol text. A repeated call with the
//! same symbol is answered from memory without contacting the provider;
//! distinct symbols and distinct operations never share an entry.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::cache::{CacheConfig, CacheMode, MemoCache};
use crate::provider::{MarketDataProvider, Operation, ProviderId, SourceError};
use crate::{
    CompanyInfo, CompanyProfile, CoreError, FinancialsRow, Frequency, PriceHistory, Symbol,
};

type Rows = Arc<Vec<FinancialsRow>>;

/// Entry counts per memoized operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheSizes {
    pub company_info: usize,
    pub quarterly_financials: usize,
    pub annual_financials: usize,
    pub weekly_price_history: usize,
}

impl CacheSizes {
    pub const fn total(&self) -> usize {
        self.company_info
            + self.quarterly_financials
            + self.annual_financials
            + self.weekly_price_history
    }
}

/// Provider wrapped with one memoization cache per operation.
///
/// Cloning is cheap and clones share the same caches.
#[derive(Clone)]
pub struct DataAccess {
    provider: Arc<dyn MarketDataProvider>,
    company_info: MemoCache<Symbol, Arc<CompanyProfile>>,
    quarterly_financials: MemoCache<Symbol, Rows>,
    annual_financials: MemoCache<Symbol, Rows>,
    weekly_price_history: MemoCache<Symbol, Arc<PriceHistory>>,
    mode: CacheMode,
}

impl DataAccess {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: CacheConfig) -> Self {
        Self {
            provider,
            company_info: MemoCache::new(config),
            quarterly_financials: MemoCache::new(config),
            annual_financials: MemoCache::new(config),
            weekly_price_history: MemoCache::new(config),
            mode: CacheMode::Use,
        }
    }

    /// A handle sharing these caches but using `mode` for its lookups.
    pub fn with_cache_mode(&self, mode: CacheMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub async fn fetch_company_info(
        &self,
        symbol: &Symbol,
    ) -> Result<Arc<CompanyProfile>, SourceError> {
        self.memoized(Operation::CompanyInfo, &self.company_info, symbol, || async {
            self.provider.company_profile(symbol).await.map(Arc::new)
        })
        .await
    }

    /// Memoized profile projected onto the fields the dashboard displays.
    pub async fn company_info(&self, symbol: &Symbol) -> Result<CompanyInfo, CoreError> {
        let profile = self.fetch_company_info(symbol).await?;
        Ok(profile.project()?)
    }

    pub async fn fetch_quarterly_financials(&self, symbol: &Symbol) -> Result<Rows, SourceError> {
        self.fetch_financials(symbol, Frequency::Quarterly).await
    }

    pub async fn fetch_annual_financials(&self, symbol: &Symbol) -> Result<Rows, SourceError> {
        self.fetch_financials(symbol, Frequency::Annual).await
    }

    pub async fn fetch_weekly_price_history(
        &self,
        symbol: &Symbol,
    ) -> Result<Arc<PriceHistory>, SourceError> {
        self.memoized(
            Operation::WeeklyPriceHistory,
            &self.weekly_price_history,
            symbol,
            || async {
                self.provider
                    .weekly_price_history(symbol)
                    .await
                    .map(Arc::new)
            },
        )
        .await
    }

    async fn fetch_financials(
        &self,
        symbol: &Symbol,
        frequency: Frequency,
    ) -> Result<Rows, SourceError> {
        let cache = match frequency {
            Frequency::Quarterly => &self.quarterly_financials,
            Frequency::Annual => &self.annual_financials,
        };
        self.memoized(Operation::for_statement(frequency), cache, symbol, || async {
            let table = self.provider.income_statement(symbol, frequency).await?;
            Ok(Arc::new(table.transpose()))
        })
        .await
    }

    async fn memoized<T, F, Fut>(
        &self,
        operation: Operation,
        cache: &MemoCache<Symbol, Arc<T>>,
        symbol: &Symbol,
        fetch: F,
    ) -> Result<Arc<T>, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<T>, SourceError>>,
    {
        let started = Instant::now();
        let result = cache
            .get_or_try_insert_with(symbol.clone(), self.mode, fetch)
            .await;

        match result {
            Ok(lookup) => {
                tracing::debug!(
                    operation = operation.as_str(),
                    %symbol,
                    cache_hit = lookup.cache_hit,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "data access"
                );
                Ok(lookup.value)
            }
            Err(error) => {
                tracing::warn!(
                    operation = operation.as_str(),
                    %symbol,
                    provider = %self.provider.id(),
                    code = error.code(),
                    "provider fetch failed: {}",
                    error.message()
                );
                Err(error)
            }
        }
    }

    /// Drop every memoized result.
    pub async fn clear_cache(&self) {
        self.company_info.clear().await;
        self.quarterly_financials.clear().await;
        self.annual_financials.clear().await;
        self.weekly_price_history.clear().await;
        tracing::info!("data access cache cleared");
    }

    pub async fn cache_sizes(&self) -> CacheSizes {
        CacheSizes {
            company_info: self.company_info.len().await,
            quarterly_financials: self.quarterly_financials.len().await,
            annual_financials: self.annual_financials.len().await,
            weekly_price_history: self.weekly_price_history.len().await,
        }
    }
}
