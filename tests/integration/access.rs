//! Access control integration tests
//!
//! Tests for the checks applied before a message is relayed:
//! - OPTIONS preflight and CORS headers
//! - Method restrictions
//! - Referer/origin allow-list

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestResponse;
use serde_json::{json, Value};

use crate::common::{constants, RelayTestHarness};

fn assert_cors_headers(response: &TestResponse) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}

#[tokio::test]
async fn test_options_preflight_is_always_answered() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .server
        .method(Method::OPTIONS, "/proxy")
        .add_header(header::REFERER, HeaderValue::from_static(constants::EVIL_REFERER))
        .await;

    response.assert_status_ok();
    assert!(response.text().is_empty());
    assert_cors_headers(&response);
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let harness = RelayTestHarness::new().await;

    for response in [
        harness.server.get("/proxy").await,
        harness.server.put("/proxy").await,
        harness.server.delete("/proxy").await,
    ] {
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.json::<Value>(), json!({ "error": "Method not allowed" }));
        assert_cors_headers(&response);
    }
}

#[tokio::test]
async fn test_allow_listed_referer_is_granted() {
    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_stream("data: [DONE]\n\n").await;

    let response = harness
        .post_message_from("https://example.com/chat", &json!({ "Text": "hi" }))
        .await;

    response.assert_status_ok();
    assert_cors_headers(&response);
}

#[tokio::test]
async fn test_allow_listed_origin_is_granted() {
    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_stream("data: [DONE]\n\n").await;

    let response = harness
        .server
        .post("/proxy")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://example.com"))
        .json(&json!({ "Text": "hi" }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_unknown_referer_is_denied() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .post_message_from(constants::EVIL_REFERER, &json!({ "Text": "hi" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Access denied: Unauthorized domain" })
    );
    assert_cors_headers(&response);
    assert!(harness.upstream.received().await.is_empty());
}

#[tokio::test]
async fn test_missing_referer_is_denied_when_allow_list_is_set() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.post("/proxy").json(&json!({ "Text": "hi" })).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_access_is_checked_before_validation() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .post_message_from(constants::EVIL_REFERER, &json!({}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_development_mode_grants_any_caller() {
    for flag in [("NODE_ENV", "development"), ("VERCEL_ENV", "preview")] {
        let harness = RelayTestHarness::with_env(&[flag]).await;
        harness.upstream.mock_stream("data: [DONE]\n\n").await;

        harness
            .server
            .post("/proxy")
            .json(&json!({ "Text": "hi" }))
            .await
            .assert_status_ok();

        harness
            .post_message_from(constants::EVIL_REFERER, &json!({ "Text": "hi" }))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_localhost_caller_is_granted() {
    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_stream("data: [DONE]\n\n").await;

    harness
        .post_message_from("http://localhost:5173/", &json!({ "Text": "hi" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_empty_allow_list_is_unrestricted() {
    let harness = RelayTestHarness::with_env(&[("ALLOWED_DOMAINS", "")]).await;
    harness.upstream.mock_stream("data: [DONE]\n\n").await;

    harness
        .post_message_from(constants::EVIL_REFERER, &json!({ "Text": "hi" }))
        .await
        .assert_status_ok();
}
