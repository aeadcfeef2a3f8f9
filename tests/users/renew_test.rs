use axum::http::StatusCode;
use serde_json::json;

use crate::common::{customer, TestContext};

#[tokio::test]
async fn lapsed_license_renews_from_today() {
    let ctx = TestContext::signed_in().await;
    let mut lapsed = customer("c1");
    lapsed.expiry_time = Some("2025-01-01".to_string());
    ctx.backend.seed_user(lapsed, "secret1").await;

    let response = ctx
        .server
        .post("/users/c1/renew")
        .json(&json!({ "months": 3 }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["expiry_time"], "2025-09-15");

    let row = ctx.backend.user("c1").await.unwrap();
    assert_eq!(row.user_type.as_deref(), Some("Monthly License"));
    assert_eq!(row.expiry_time.as_deref(), Some("2025-09-15"));
}

#[tokio::test]
async fn running_license_is_extended() {
    let ctx = TestContext::signed_in().await;
    let mut running = customer("c1");
    running.expiry_time = Some("2025-08-31".to_string());
    ctx.backend.seed_user(running, "secret1").await;

    let body: serde_json::Value = ctx
        .server
        .post("/users/c1/renew")
        .json(&json!({ "months": 6 }))
        .await
        .json();

    assert_eq!(body["expiry_time"], "2026-02-28");
}

#[tokio::test]
async fn zero_months_is_rejected() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let response = ctx
        .server
        .post("/users/c1/renew")
        .json(&json!({ "months": 0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let ctx = TestContext::signed_in().await;

    let response = ctx
        .server
        .post("/users/ghost/renew")
        .json(&json!({ "months": 1 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signed_out_renew_is_rejected_before_lookup() {
    let ctx = TestContext::new().await;
    let calls_before = ctx.backend.calls().len();

    let response = ctx
        .server
        .post("/users/ghost/renew")
        .json(&json!({ "months": 3 }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.backend.calls().len(), calls_before);
}
