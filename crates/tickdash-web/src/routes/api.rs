use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use tickdash_core::{CacheSizes, ProviderId};

use super::DashboardQuery;
use crate::dashboard::{render_dashboard, DashboardPage};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheResponse {
    pub provider: ProviderId,
    pub entries: CacheSizes,
}

/// `GET /api/dashboard`: the page model as JSON.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardPage>> {
    let view = query.view_state(&state)?;
    Ok(Json(render_dashboard(&state.data, &view).await))
}

/// `GET /api/cache`: memoized entries per operation.
pub async fn get_cache(State(state): State<AppState>) -> Json<CacheResponse> {
    Json(CacheResponse {
        provider: state.data.provider_id(),
        entries: state.data.cache_sizes().await,
    })
}

/// `DELETE /api/cache`: drop every memoized result; reports what was dropped.
pub async fn clear_cache(State(state): State<AppState>) -> Json<CacheResponse> {
    let entries = state.data.cache_sizes().await;
    state.data.clear_cache().await;
    Json(CacheResponse {
        provider: state.data.provider_id(),
        entries,
    })
}
