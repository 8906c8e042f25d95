//! Shared server state.

use std::time::Instant;

use tickdash_core::DataAccess;

/// Handed to every handler; cloning shares the memoized data access.
#[derive(Clone)]
pub struct AppState {
    pub data: DataAccess,
    /// Symbol shown when the request does not name one.
    pub default_symbol: String,
    started_at: Instant,
}

impl AppState {
    pub fn new(data: DataAccess, default_symbol: impl Into<String>) -> Self {
        Self {
            data,
            default_symbol: default_symbol.into(),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
