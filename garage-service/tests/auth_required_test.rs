//! Business routes behind bearer authentication.

mod common;

use common::TestApp;

#[tokio::test]
async fn business_routes_reject_anonymous_callers() {
    let app = TestApp::spawn_with_auth(true).await;

    for path in ["/parts", "/customers", "/api/dashboard-stats", "/latest-invoice-id"] {
        assert_eq!(app.get(path).await.status().as_u16(), 401, "{} should be protected", path);
    }

    assert!(app.get("/health").await.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
async fn business_routes_accept_bearer_token() {
    let app = TestApp::spawn_with_auth(true).await;
    let token = app.signup_and_login("clerk@garage.test", "counter-42").await;

    let response = app
        .client
        .get(app.url("/parts"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    app.cleanup().await;
}
