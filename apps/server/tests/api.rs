use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wallboard_server::{api::app_router, build_state, config::Config};

fn test_config(data_mode: &str) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_mode: data_mode.to_string(),
        cache_enabled: false,
        snapshot_cache_ttl: Duration::from_secs(15),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
    }
}

async fn build_test_router() -> Router {
    let config = test_config("mock");
    let state = build_state(&config).await.unwrap();
    app_router(state, &config)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn liveness_reports_ok() {
    let app = build_test_router().await;
    let (status, body) = call(&app, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn readiness_reports_mode_and_cache() {
    let app = build_test_router().await;
    let (status, body) = call(&app, get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "data_mode": "mock", "cache_enabled": false})
    );
}

#[tokio::test]
async fn snapshot_has_every_section() {
    let app = build_test_router().await;
    let (status, body) = call(&app, get("/data/snapshot")).await;
    assert_eq!(status, StatusCode::OK);

    for key in [
        "timestamp",
        "data_mode",
        "indices",
        "fx",
        "rates",
        "commodities",
        "us_stocks",
        "crypto",
        "calendar",
        "summary",
        "heatmap",
        "a_share_heatmap",
        "a_share_short_term",
    ] {
        assert!(body.get(key).is_some(), "snapshot is missing {}", key);
    }
    assert_eq!(body["data_mode"], "mock");
    assert!(body["heatmap"].as_array().unwrap().len() <= 16);
    assert!(body["indices"]["000001.SH"]["last"].is_number());
}

#[tokio::test]
async fn config_rejects_unknown_mode() {
    let app = build_test_router().await;
    let (status, body) = call(&app, post_json("/config", json!({"data_mode": "bloomberg"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": 400, "message": "Invalid data_mode"}));

    let (status, body) = call(&app, post_json("/config", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data_mode");

    let (_, body) = call(&app, get("/config")).await;
    assert_eq!(body, json!({"data_mode": "mock"}));
}

#[tokio::test]
async fn config_rejects_undecodable_body_as_json_error() {
    let app = build_test_router().await;
    let (status, body) = call(&app, post_json("/config", json!({"data_mode": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": 400, "message": "Invalid data_mode"}));

    let (status, body) = call(&app, post_raw("/config", "{\"data_mode\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": 400, "message": "Invalid data_mode"}));

    let (_, body) = call(&app, get("/config")).await;
    assert_eq!(body, json!({"data_mode": "mock"}));
}

#[tokio::test]
async fn config_switch_rebuilds_service() {
    let app = build_test_router().await;
    let (status, body) = call(&app, post_json("/config", json!({"data_mode": "wind"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data_mode": "wind"}));

    let (_, body) = call(&app, get("/config")).await;
    assert_eq!(body, json!({"data_mode": "wind"}));

    let (_, body) = call(&app, get("/health/ready")).await;
    assert_eq!(body["data_mode"], "wind");

    // Without a terminal session the snapshot still carries fallback quotes.
    let (_, body) = call(&app, get("/data/snapshot")).await;
    assert_eq!(body["data_mode"], "wind");
    assert!(!body["indices"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn startup_rejects_unknown_mode() {
    let config = test_config("bloomberg");
    assert!(build_state(&config).await.is_err());
}
