use axum::http::StatusCode;
use serde_json::json;

use crate::common::{admin, TestContext, ADMIN_ID};

async fn guarded_context() -> TestContext {
    let mut guarded = admin();
    guarded.two_factor_enabled = Some(true);
    let ctx = TestContext::with_admin(guarded).await;
    ctx.backend.set_two_factor_code(ADMIN_ID, "424242").await;
    ctx
}

#[tokio::test]
async fn login_asks_for_second_factor() {
    let ctx = guarded_context().await;

    let response = ctx.login().await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["requires_two_factor"], true);
    assert_eq!(body["user_id"], ADMIN_ID);
    assert_eq!(body["redirect"], "/two-factor");

    let state = ctx.state.session.snapshot();
    assert!(state.needs_two_factor);
    assert!(!state.is_authenticated);
}

#[tokio::test]
async fn valid_code_completes_login() {
    let ctx = guarded_context().await;
    ctx.login().await.assert_status_ok();

    let response = ctx
        .server
        .post("/auth/verify-2fa")
        .json(&json!({ "code": "424242" }))
        .await;

    response.assert_status(StatusCode::OK);
    assert!(ctx.state.session.is_authenticated());
    assert!(ctx.state.context.persisted.verified_for(ADMIN_ID).await);
}

#[tokio::test]
async fn invalid_code_keeps_operator_out() {
    let ctx = guarded_context().await;
    ctx.login().await.assert_status_ok();
    ctx.notice_titles();

    let response = ctx
        .server
        .post("/auth/verify-2fa")
        .json(&json!({ "user_id": ADMIN_ID, "code": "000000" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(!ctx.state.session.is_authenticated());
    assert_eq!(ctx.notice_titles(), ["Invalid verification code"]);

    // Protected operations stay closed.
    ctx.server.get("/users").await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_survives_console_restart() {
    let ctx = guarded_context().await;
    ctx.login().await.assert_status_ok();
    ctx.server
        .post("/auth/verify-2fa")
        .json(&json!({ "code": "424242" }))
        .await
        .assert_status_ok();

    // A fresh store reading the same backend session and persisted state.
    ctx.state.session.initialize().await;
    assert!(ctx.state.session.is_authenticated());
}

#[tokio::test]
async fn verify_without_pending_login_is_rejected() {
    let ctx = guarded_context().await;

    let response = ctx
        .server
        .post("/auth/verify-2fa")
        .json(&json!({ "code": "424242" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
