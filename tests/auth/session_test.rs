use axum::http::StatusCode;

use crate::common::TestContext;

#[tokio::test]
async fn startup_without_session_is_checked_and_signed_out() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/auth/session").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["loading"], false);
    assert_eq!(body["session_checked"], true);
    assert_eq!(body["is_authenticated"], false);
    assert_eq!(body["session_valid"], false);
    assert_eq!(body["route"], "/login");
}

#[tokio::test]
async fn session_reports_loaded_admin() {
    let ctx = TestContext::signed_in().await;

    let body: serde_json::Value = ctx.server.get("/auth/session").await.json();
    assert_eq!(body["is_authenticated"], true);
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["user"]["name"], "Console Admin");
    assert_eq!(body["session_valid"], true);
}

#[tokio::test]
async fn expired_session_is_not_valid() {
    let ctx = TestContext::signed_in().await;
    ctx.clock.advance(chrono::Duration::hours(2));

    let body: serde_json::Value = ctx.server.get("/auth/session").await.json();
    assert_eq!(body["session_valid"], false);
}

#[tokio::test]
async fn session_expiry_redirects_to_login() {
    let ctx = TestContext::signed_in().await;
    ctx.notice_titles();

    let response = ctx.server.post("/auth/session-expired").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["redirect"], "/login?sessionExpired=true");
    assert_eq!(ctx.notice_titles(), ["Session expired"]);

    // Already on the login page: no second notice.
    ctx.server.post("/auth/session-expired").await.assert_status_ok();
    assert!(ctx.notice_titles().is_empty());
}
