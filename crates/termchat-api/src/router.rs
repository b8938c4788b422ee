//! Route definitions for the relay and health listeners.

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::RelayState;

/// Build the relay router. The WebSocket upgrade is served on `/` and `/ws`.
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(handlers::ws::ws_handler))
        .route("/ws", get(handlers::ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Build the health router: `GET {path}` answers `OK`, everything else 404.
pub fn health_router(path: &str) -> Router {
    Router::new()
        .route(path, get(handlers::health::health))
        .fallback(handlers::health::not_found)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let resp = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = resp.status();
        let body = to_bytes(resp.into_body(), 1024).await.expect("body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_health_path_answers_ok() {
        let (status, body) = call(health_router("/health"), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_health_rejects_everything_else() {
        let (status, _) = call(health_router("/health"), Method::GET, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(health_router("/health"), Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_custom_path() {
        let (status, body) = call(health_router("/status"), Method::GET, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
