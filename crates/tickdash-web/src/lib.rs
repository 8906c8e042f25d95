//! # Tickdash Web
//!
//! The stock dashboard page and the axum server that hosts it.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`app`] | Router construction |
//! | [`config`] | clap configuration with environment fallbacks |
//! | [`dashboard`] | Page model, period toggle and chart specs |
//! | [`error`] | HTTP error mapping |
//! | [`html`] | askama rendering of the page model |
//! | [`routes`] | Route handlers |
//! | [`state`] | Shared server state |

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod html;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use config::Config;
pub use dashboard::{render_dashboard, DashboardPage, PeriodSelection, ViewState};
pub use error::{AppError, AppResult};
pub use state::AppState;
