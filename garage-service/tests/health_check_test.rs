//! Health check integration tests for garage-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "garage-service");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/ready").await;
    assert!(response.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
async fn metrics_endpoint_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/metrics").await;

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap_or("").contains("text/plain"))
        .unwrap_or(false));

    app.cleanup().await;
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
    assert!(response.headers().contains_key("x-content-type-options"));

    app.cleanup().await;
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let response = app.get("/.well-known/openapi.json").await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["paths"]["/save-invoice"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());

    app.cleanup().await;
}
