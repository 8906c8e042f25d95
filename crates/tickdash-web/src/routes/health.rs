use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tickdash_core::ProviderId;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: ProviderId,
    pub uptime_secs: u64,
}

/// `GET /health`: liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        provider: state.data.provider_id(),
        uptime_secs: state.uptime_secs(),
    })
}
