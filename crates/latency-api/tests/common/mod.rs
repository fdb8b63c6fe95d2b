#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use latency_api::{AppState, build_router, settings::Settings};
use latency_stats::{Dataset, Record};
use tower::ServiceExt;

/// Router over the embedded sample dataset with default settings
pub fn sample_router() -> Router {
    let settings = Settings::default();
    let state = AppState::new(
        Dataset::embedded().unwrap(),
        settings.stats.default_threshold_ms,
    );
    build_router(state, settings.server.max_body_bytes)
}

/// Router over `records` with a custom default threshold and body limit
pub fn custom_router(records: Vec<Record>, default_threshold_ms: f64, max_body_bytes: usize) -> Router {
    let state = AppState::new(Dataset::new(records).unwrap(), default_threshold_ms);
    build_router(state, max_body_bytes)
}

pub async fn send(router: Router, method: Method, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    router.oneshot(request).await.unwrap()
}

pub async fn post_json(router: Router, uri: &str, body: &str) -> Response<Body> {
    send(router, Method::POST, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub fn assert_cors(response: &Response<Body>) {
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
