//! Health check handlers.

use axum::http::StatusCode;

/// GET {health.path}
pub async fn health() -> &'static str {
    "OK"
}

/// Anything else on the health listener.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
