use axum::http::StatusCode;

use license_admin::services::backend::Fault;

use crate::common::{customer, TestContext};

#[tokio::test]
async fn delete_removes_row_and_identity() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let response = ctx.server.delete("/users/c1").await;

    response.assert_status(StatusCode::OK);
    assert!(ctx.backend.user("c1").await.is_none());
    assert!(!ctx.backend.has_identity("c1").await);
}

#[tokio::test]
async fn identity_failure_is_partial_and_row_stays_gone() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;
    ctx.server.get("/users").await.assert_status_ok();
    ctx.backend.fail(Fault::IdentityDelete);

    let response = ctx.server.delete("/users/c1").await;

    response.assert_status(StatusCode::MULTI_STATUS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Partial deletion");
    assert!(body["message"].as_str().unwrap().contains("remains in the auth system"));
    assert!(ctx.backend.user("c1").await.is_none());
    assert!(ctx.backend.has_identity("c1").await);

    // The cached list no longer shows the removed row.
    let list: serde_json::Value = ctx.server.get("/users").await.json();
    assert!(list["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u["id"] != "c1"));
}

#[tokio::test]
async fn row_failure_keeps_identity() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;
    ctx.backend.fail(Fault::ProfileDelete);

    let response = ctx.server.delete("/users/c1").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(ctx.backend.user("c1").await.is_some());
    assert!(!ctx.backend.calls().contains(&"delete_auth_user"));
}
