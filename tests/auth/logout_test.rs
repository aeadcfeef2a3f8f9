use axum::http::StatusCode;

use license_admin::services::backend::Fault;

use crate::common::TestContext;

#[tokio::test]
async fn logout_signs_out_and_redirects() {
    let ctx = TestContext::signed_in().await;
    ctx.notice_titles();

    let response = ctx.server.post("/auth/logout").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["redirect"], "/login?loggedOut=true");
    assert!(ctx.backend.calls().contains(&"sign_out"));
    assert!(!ctx.state.session.is_authenticated());
    assert_eq!(ctx.notice_titles(), ["Successfully logged out"]);
}

#[tokio::test]
async fn logout_with_expired_session_skips_backend() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.expire_session().await;

    let response = ctx.server.post("/auth/logout").await;

    response.assert_status(StatusCode::OK);
    assert!(!ctx.backend.calls().contains(&"sign_out"));
    assert!(!ctx.state.session.is_authenticated());
    assert!(!ctx.state.context.persisted.snapshot().await.login_in_progress);
}

#[tokio::test]
async fn failed_sign_out_is_reported() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.fail(Fault::SignOut);

    let response = ctx.server.post("/auth/logout").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(ctx.state.session.is_authenticated());
}

#[tokio::test]
async fn users_are_closed_after_logout() {
    let ctx = TestContext::signed_in().await;
    ctx.server.post("/auth/logout").await.assert_status_ok();

    ctx.server.get("/users").await.assert_status(StatusCode::UNAUTHORIZED);
}
