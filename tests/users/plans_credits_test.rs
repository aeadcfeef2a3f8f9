use axum::http::StatusCode;
use serde_json::json;

use crate::common::{customer, TestContext};

#[tokio::test]
async fn plan_is_appended_and_expiry_extended() {
    let ctx = TestContext::signed_in().await;
    let mut user = customer("c1");
    user.expiry_time = Some("2025-01-01".to_string());
    user.my_plans = Some("Silver".to_string());
    ctx.backend.seed_user(user, "secret1").await;

    let response = ctx
        .server
        .post("/users/c1/plans")
        .json(&json!({ "plan_name": "Gold", "duration_months": 3 }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["my_plans"], "Silver, Gold");
    assert_eq!(body["expiry_time"], "2025-09-15");
}

#[tokio::test]
async fn plan_defaults_to_one_month_and_is_not_duplicated() {
    let ctx = TestContext::signed_in().await;
    let mut user = customer("c1");
    user.my_plans = Some("Gold".to_string());
    ctx.backend.seed_user(user, "secret1").await;

    let body: serde_json::Value = ctx
        .server
        .post("/users/c1/plans")
        .json(&json!({ "plan_name": "Gold" }))
        .await
        .json();

    assert_eq!(body["my_plans"], "Gold");
    assert_eq!(body["expiry_time"], "2025-07-15");
}

#[tokio::test]
async fn credits_are_added_to_balance() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    let response = ctx
        .server
        .post("/users/c1/credits")
        .json(&json!({ "amount": "5" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["credits"], "15.0");
    assert_eq!(ctx.backend.user("c1").await.unwrap().credits.as_deref(), Some("15.0"));
}

#[tokio::test]
async fn non_positive_credits_are_rejected() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    for amount in ["0", "-3", "abc"] {
        ctx.server
            .post("/users/c1/credits")
            .json(&json!({ "amount": amount }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn plan_turns_credits_license_into_monthly() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.seed_user(customer("c1"), "secret1").await;

    ctx.server
        .post("/users/c1/plans")
        .json(&json!({ "plan_name": "Gold" }))
        .await
        .assert_status_ok();

    let row = ctx.backend.user("c1").await.unwrap();
    assert_eq!(row.user_type.as_deref(), Some("Monthly License"));
    assert_eq!(row.expiry_time.as_deref(), Some("2025-07-15"));
    assert_eq!(row.my_plans.as_deref(), Some("Gold"));
}

#[tokio::test]
async fn credits_overflow_is_rejected() {
    let ctx = TestContext::signed_in().await;
    let mut user = customer("c1");
    user.credits = Some("79228162514264337593543950335".to_string());
    ctx.backend.seed_user(user, "secret1").await;

    let response = ctx
        .server
        .post("/users/c1/credits")
        .json(&json!({ "amount": "1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        ctx.backend.user("c1").await.unwrap().credits.as_deref(),
        Some("79228162514264337593543950335")
    );
}
