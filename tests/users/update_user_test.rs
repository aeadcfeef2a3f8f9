use axum::http::StatusCode;
use serde_json::json;

use license_admin::services::backend::Fault;

use crate::common::{customer, TestContext};

#[tokio::test]
async fn update_writes_editable_columns() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let response = ctx
        .server
        .put("/users/c1")
        .json(&json!({
            "name": "Renamed",
            "email": "renamed@example.com",
            "block": "Blocked"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let row = ctx.backend.user("c1").await.unwrap();
    assert_eq!(row.name.as_deref(), Some("Renamed"));
    assert_eq!(row.email, "renamed@example.com");
    assert!(row.is_blocked());
    // Columns not sent are left alone.
    assert_eq!(row.phone.as_deref(), Some("+966500000000"));
    assert_eq!(row.credits.as_deref(), Some("10.0"));
}

#[tokio::test]
async fn backend_failure_is_reported() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;
    ctx.backend.fail(Fault::ProfileUpdate);
    ctx.notice_titles();

    let response = ctx
        .server
        .put("/users/c1")
        .json(&json!({ "email": "c1@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(ctx.notice_titles(), ["Failed to update user data"]);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let ctx = TestContext::signed_in().await;

    let response = ctx
        .server
        .put("/users/c1")
        .json(&json!({ "email": "nope" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
