//! The Pub/Sub push endpoint served by the worker router.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{Engine, engine::general_purpose::STANDARD};
use catalog_sync_core::Cursor;
use catalog_sync_integration_tests::{Harness, sized_product};
use catalog_sync_worker::routes;
use catalog_sync_worker::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn push_request(offset_message: &str) -> Request<Body> {
    let body = json!({
        "message": {
            "data": STANDARD.encode(offset_message),
            "messageId": "9188201",
            "publishTime": "2026-10-16T09:30:00.000Z"
        },
        "subscription": "projects/catalogiq/subscriptions/offsets-push"
    });

    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(harness: &Harness, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let app = routes::routes(AppState::new(harness.engine()));
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&Harness::default(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_push_processes_page() {
    let harness = Harness::with_records(vec![
        sized_product("First", &[("F-1", "S")]),
        sized_product("Second", &[("S-1", "S")]),
    ]);

    let (status, body) = send(&harness, push_request(r#"{"offset":"1"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        summary,
        json!({
            "action": "advanced",
            "offset": 1,
            "next": 2,
            "created": 1,
            "skipped": 0,
            "media_failures": 0
        })
    );
    assert_eq!(harness.store.submitted().len(), 1);
    assert_eq!(harness.publisher.published(), vec![Cursor::new(2)]);
}

#[tokio::test]
async fn test_push_at_end_of_catalog() {
    let harness = Harness::default();

    let (status, body) = send(&harness, push_request(r#"{"offset":"0"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary["action"], "finished");
    assert_eq!(harness.notifier.reports().len(), 1);
}

#[tokio::test]
async fn test_malformed_offset_is_bad_request() {
    let harness = Harness::default();

    let (status, _) = send(&harness, push_request(r#"{"page":"0"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(harness.catalog.requests().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let (status, _) = send(&Harness::default(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_failure_asks_for_redelivery() {
    let harness = Harness::with_records(vec![sized_product("First", &[("F-1", "S")])]);
    harness.catalog.fail_with(502);

    let (status, _) = send(&harness, push_request(r#"{"offset":"0"}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(harness.publisher.published().is_empty());
}

#[tokio::test]
async fn test_publish_failure_asks_for_redelivery() {
    let harness = Harness::with_records(vec![sized_product("First", &[("F-1", "S")])]);
    harness.publisher.fail();

    let (status, _) = send(&harness, push_request(r#"{"offset":"0"}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
