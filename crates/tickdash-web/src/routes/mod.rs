//! HTTP route handlers.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | [`page::index`] |
//! | `GET /api/dashboard` | [`api::get_dashboard`] |
//! | `GET /api/cache` | [`api::get_cache`] |
//! | `DELETE /api/cache` | [`api::clear_cache`] |
//! | `GET /health` | [`health::health`] |

pub mod api;
pub mod health;
pub mod page;

use serde::Deserialize;

use crate::dashboard::{PeriodSelection, ViewState};
use crate::error::AppResult;
use crate::state::AppState;

/// Query string shared by the HTML page and its JSON twin.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

impl DashboardQuery {
    /// Missing fields fall back to the configured symbol and the quarterly view.
    pub fn view_state(self, state: &AppState) -> AppResult<ViewState> {
        let period = match self.period {
            Some(period) => period.parse::<PeriodSelection>()?,
            None => PeriodSelection::default(),
        };
        let symbol = self
            .symbol
            .unwrap_or_else(|| state.default_symbol.clone());
        Ok(ViewState::new(symbol, period))
    }
}
