use axum::http::StatusCode;
use serde_json::json;

use crate::common::{customer, TestContext, ADMIN_EMAIL};

#[tokio::test]
async fn login_with_valid_credentials_authenticates() {
    let ctx = TestContext::new().await;

    let response = ctx.login().await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["requires_two_factor"], false);
    assert_eq!(body["redirect"], "/dashboard");
    assert!(ctx.state.session.is_authenticated());
    assert_eq!(ctx.notice_titles(), ["Login successful"]);
}

#[tokio::test]
async fn login_with_invalid_password_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "WrongPassword1"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid login credentials");
    assert!(!ctx.state.session.is_authenticated());
    assert!(!ctx.state.context.persisted.snapshot().await.login_in_progress);
}

#[tokio::test]
async fn blocked_account_is_rejected_before_sign_in() {
    let ctx = TestContext::new().await;
    let mut blocked = customer("blocked");
    blocked.block = Some("Blocked".to_string());
    ctx.backend.seed_user(blocked, "secret1").await;
    ctx.backend.reset_calls();

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "blocked@example.com",
            "password": "secret1"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(!ctx.backend.calls().contains(&"sign_in_with_password"));
    assert_eq!(ctx.notice_titles(), ["Account blocked"]);
}

#[tokio::test]
async fn user_without_credits_is_rejected() {
    let ctx = TestContext::new().await;
    let mut broke = customer("broke");
    broke.credits = Some("0".to_string());
    ctx.backend.seed_user(broke, "secret1").await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "broke@example.com",
            "password": "secret1"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No credits left");
}

#[tokio::test]
async fn missing_fields_fail_validation() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "",
            "password": ""
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_logins_are_rate_limited() {
    let ctx = TestContext::with_login_burst(2).await;

    ctx.login().await.assert_status_ok();
    ctx.login().await.assert_status_ok();
    ctx.login().await.assert_status(StatusCode::TOO_MANY_REQUESTS);
}
