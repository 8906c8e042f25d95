//! Application errors mapped to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tickdash_core::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid query input (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Page could not be produced (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        }

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::BadRequest(error.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> Self {
        AppError::Internal(format!("template render failed: {error}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
