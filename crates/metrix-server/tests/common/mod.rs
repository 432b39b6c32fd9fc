#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use metrix_server::app_state::AppState;
use metrix_server::config::ServerConfig;
use metrix_server::dispatch::CounterPolicy;
use metrix_server::router;

pub fn build_app() -> axum::Router {
    build_app_with(CounterPolicy::RejectNegative)
}

pub fn build_app_with(counter_policy: CounterPolicy) -> axum::Router {
    let cfg = ServerConfig {
        counter_policy,
        ..ServerConfig::default()
    };
    router::build_router(AppState::new(cfg))
}

pub async fn send(app: &axum::Router, method: &str, uri: &str, body: Body) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

pub async fn post(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    send(app, "POST", uri, Body::empty()).await
}

pub async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    send(app, "GET", uri, Body::empty()).await
}
