//! Integration tests for the landing API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The Cloudflare cases point a real `reqwest`
//! client at a `wiremock` server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sokushuu_api::{AppState, build_router};
use sokushuu_kv::{CloudflareConfig, KvStore, MemoryKv, keys};
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn memory_state(memory: &MemoryKv) -> Arc<AppState> {
    Arc::new(AppState::new(KvStore::from(memory.clone())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_waitlist(state: Arc<AppState>, body: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(
            Request::post("/api/waitlist")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn assert_iso_timestamp(value: &Value) {
    let text = value.as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(text).is_ok(), "{text}");
}

// =========================================================================
// Liveness
// =========================================================================

#[tokio::test]
async fn test_index_returns_banner() {
    let response = build_router(memory_state(&MemoryKv::new()))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"Sokushuu landing API");
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (status, json) = get_json(memory_state(&MemoryKv::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok", "kv_backend": "memory" }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, json) = get_json(memory_state(&MemoryKv::new()), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert_eq!(json["error"], "no route for /api/nope");
}

// =========================================================================
// Launch date
// =========================================================================

#[tokio::test]
async fn test_launch_date_from_kv() {
    let memory = MemoryKv::with_entries([(keys::LAUNCH_DATE, "2025-08-24T00:00:00Z")]);
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/launch-date").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["launch_date"], "2025-08-24T00:00:00Z");
    assert_eq!(json["source"], "kv");
    assert_iso_timestamp(&json["timestamp"]);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_launch_date_missing_key_falls_back() {
    let (status, json) =
        get_json(memory_state(&MemoryKv::new()), "/api/statistics/launch-date").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["launch_date"], json["timestamp"]);
    assert_iso_timestamp(&json["launch_date"]);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_launch_date_store_failure_is_still_200() {
    let memory = MemoryKv::new();
    memory.fail_with("connection refused").await;
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/launch-date").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback_error");
    assert_iso_timestamp(&json["launch_date"]);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}

// =========================================================================
// Waiting total
// =========================================================================

#[tokio::test]
async fn test_waiting_total_from_kv() {
    let memory = MemoryKv::with_entries([(keys::WAITING_TOTAL, "2847")]);
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/waiting-total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 2847);
    assert_eq!(json["source"], "kv");
    assert_eq!(json["raw_value"], "2847");
    assert_iso_timestamp(&json["timestamp"]);
}

#[tokio::test]
async fn test_waiting_total_non_numeric_is_zero() {
    let memory = MemoryKv::with_entries([(keys::WAITING_TOTAL, "lots")]);
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/waiting-total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 0);
    assert_eq!(json["source"], "kv");
    assert_eq!(json["raw_value"], "lots");
}

#[tokio::test]
async fn test_waiting_total_negative_is_zero() {
    let memory = MemoryKv::with_entries([(keys::WAITING_TOTAL, "-5")]);
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/waiting-total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 0);
    assert_eq!(json["source"], "kv");
    assert_eq!(json["raw_value"], "-5");
}

#[tokio::test]
async fn test_waiting_total_missing_key_is_zero() {
    let (status, json) =
        get_json(memory_state(&MemoryKv::new()), "/api/statistics/waiting-total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 0);
    assert_eq!(json["source"], "fallback");
    assert!(json.get("raw_value").is_none());
}

#[tokio::test]
async fn test_waiting_total_store_failure_is_still_200() {
    let memory = MemoryKv::new();
    memory.fail_with("timeout").await;
    let (status, json) = get_json(memory_state(&memory), "/api/statistics/waiting-total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 0);
    assert_eq!(json["source"], "fallback_error");
    assert!(json["error"].is_string());
}

// =========================================================================
// Cloudflare Workers KV
// =========================================================================

const KV_VALUES: &str = "/client/v4/accounts/acc/storage/kv/namespaces/ns/values";

fn cloudflare_state(server: &MockServer) -> Arc<AppState> {
    let config = CloudflareConfig::new("acc", "ns", "token").with_api_url(server.uri());
    Arc::new(AppState::new(KvStore::cloudflare(&config).unwrap()))
}

#[tokio::test]
async fn test_cloudflare_value_is_served() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{KV_VALUES}/{}", keys::WAITING_TOTAL)))
        .respond_with(ResponseTemplate::new(200).set_body_string("120"))
        .mount(&server)
        .await;

    let (status, json) = get_json(cloudflare_state(&server), "/api/statistics/waiting-total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["waiting_total"], 120);
    assert_eq!(json["source"], "kv");
}

#[tokio::test]
async fn test_cloudflare_404_is_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, json) = get_json(cloudflare_state(&server), "/api/statistics/launch-date").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_cloudflare_500_is_fallback_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("kv exploded"))
        .mount(&server)
        .await;

    let (status, json) = get_json(cloudflare_state(&server), "/api/statistics/waiting-total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback_error");
    assert_eq!(json["waiting_total"], 0);
    assert_eq!(
        json["error"],
        "KV API error: 500 Internal Server Error - kv exploded"
    );
}

// =========================================================================
// Waiting list
// =========================================================================

#[tokio::test]
async fn test_subscribe_adds_address_and_bumps_total() {
    let memory = MemoryKv::with_entries([(keys::WAITING_TOTAL, "9")]);
    let (status, json) = post_waitlist(memory_state(&memory), r#"{"email":" Ann@Example.COM "}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "message": "Successfully subscribed!" }));
    assert!(
        memory
            .get(&keys::waitlist_entry("ann@example.com").unwrap())
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(
        memory.get(keys::WAITING_TOTAL).await.unwrap().as_deref(),
        Some("10")
    );
}

#[tokio::test]
async fn test_subscribe_twice_counts_once() {
    let memory = MemoryKv::new();
    let state = memory_state(&memory);

    post_waitlist(Arc::clone(&state), r#"{"email":"ann@example.com"}"#).await;
    let (status, json) = post_waitlist(state, r#"{"email":"ANN@example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "You're already on the waiting list!");
    assert_eq!(
        memory.get(keys::WAITING_TOTAL).await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn test_subscribe_rejects_invalid_email() {
    let memory = MemoryKv::new();
    let (status, json) = post_waitlist(memory_state(&memory), r#"{"email":"ann@example"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Please enter a valid email address");
    assert!(memory.is_empty().await);
}

#[tokio::test]
async fn test_subscribe_rejects_empty_email() {
    let (status, json) =
        post_waitlist(memory_state(&MemoryKv::new()), r#"{"email":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email is required");
}

#[tokio::test]
async fn test_subscribe_malformed_body_is_400() {
    let (status, json) = post_waitlist(memory_state(&MemoryKv::new()), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_subscribe_store_failure_is_502() {
    let memory = MemoryKv::new();
    memory.fail_with("down").await;
    let (status, json) = post_waitlist(memory_state(&memory), r#"{"email":"ann@example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        json,
        json!({ "success": false, "message": "Subscription failed. Please try again." })
    );
}

#[tokio::test]
async fn test_subscribe_counter_failure_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(format!("{KV_VALUES}/{}", keys::WAITLIST_PREFIX)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{KV_VALUES}/{}", keys::WAITING_TOTAL)))
        .respond_with(ResponseTemplate::new(500).set_body_string("write failed"))
        .expect(1)
        .mount(&server)
        .await;

    let (status, json) =
        post_waitlist(cloudflare_state(&server), r#"{"email":"ann@example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "message": "Successfully subscribed!" }));
}

#[tokio::test]
async fn test_subscribe_oversized_address_is_400() {
    let memory = MemoryKv::new();
    let email = format!("{}@{}.jp", "\u{1f600}".repeat(64), "\u{1f600}".repeat(252));
    let body = json!({ "email": email }).to_string();

    let (status, json) = post_waitlist(memory_state(&memory), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({ "success": false, "message": "Email address is too long" })
    );
    assert!(memory.is_empty().await);
}
