//! Health responder on its own router.

use axum::body::{Body, to_bytes};
use http::{Request, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use termchat_api::health_router;

async fn get(path: &str) -> (StatusCode, String) {
    let resp = health_router("/health")
        .oneshot(Request::get(path).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024).await.expect("body");
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_health_ok() {
    assert_eq!(get("/health").await, (StatusCode::OK, "OK".to_string()));
}

#[tokio::test]
async fn test_other_paths_rejected() {
    assert_eq!(get("/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get("/ws").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_listener_ignores_relay_state() {
    // Served on a real port, independent of any relay.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, health_router("/health")).await.expect("serve");
    });

    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write");
    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read");
    assert!(response.starts_with("HTTP/1.1 200"), "got {response}");
    assert!(response.ends_with("OK"));
}
