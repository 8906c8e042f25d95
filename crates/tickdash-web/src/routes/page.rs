use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;

use super::DashboardQuery;
use crate::dashboard::render_dashboard;
use crate::error::AppResult;
use crate::html::DashboardTemplate;
use crate::state::AppState;

/// `GET /`: the dashboard page.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Html<String>> {
    let view = query.view_state(&state)?;
    let page = render_dashboard(&state.data, &view).await;
    let html = DashboardTemplate::new(&page)?.render()?;
    Ok(Html(html))
}
