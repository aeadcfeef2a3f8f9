use axum::http::StatusCode;

use crate::common::TestContext;

#[tokio::test]
async fn notices_are_delivered_once() {
    let ctx = TestContext::signed_in().await;

    let response = ctx.server.get("/notices").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    let notices = body["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["level"], "success");
    assert_eq!(notices[0]["title"], "Login successful");
    assert_eq!(notices[0]["description"], "Welcome back");

    let body: serde_json::Value = ctx.server.get("/notices").await.json();
    assert!(body["notices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn responses_carry_console_headers() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("cache-control"), "no-store");
    assert_eq!(response.header("x-frame-options"), "DENY");
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "license-admin");
    assert_eq!(body["language"], "en");
    assert_eq!(body["rtl"], false);
}
