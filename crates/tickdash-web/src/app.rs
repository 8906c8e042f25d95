//! Axum application builder.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::routes::{api, health, page};
use crate::state::AppState;

/// Create the router with every route and the request trace layer.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/api/dashboard", get(api::get_dashboard))
        .route("/api/cache", get(api::get_cache).delete(api::clear_cache))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
