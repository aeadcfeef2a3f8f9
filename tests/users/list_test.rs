use axum::http::StatusCode;
use serde_json::json;

use crate::common::{customer, TestContext};

#[tokio::test]
async fn list_returns_all_rows() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let response = ctx.server.get("/users").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn list_is_cached_until_a_mutation() {
    let ctx = TestContext::signed_in().await;
    ctx.server.get("/users").await.assert_status_ok();

    // Rows written behind the console's back are not seen while cached.
    ctx.backend.seed_user(customer("c1"), "secret1").await;
    let body: serde_json::Value = ctx.server.get("/users").await.json();
    assert_eq!(body["total"], 1);

    ctx.server
        .post("/users/c1/credits")
        .json(&json!({ "amount": "1" }))
        .await
        .assert_status_ok();
    let body: serde_json::Value = ctx.server.get("/users").await.json();
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn concurrent_reads_share_one_view() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let reads = (0..8).map(|_| ctx.state.users.list_users());
    let results = futures::future::join_all(reads).await;

    for users in results {
        assert_eq!(users.unwrap().len(), 2);
    }
}
