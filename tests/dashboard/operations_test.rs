use axum::http::StatusCode;

use license_admin::modules::dashboard::model::OperationRecord;
use license_admin::services::backend::Fault;

use crate::common::TestContext;

#[tokio::test]
async fn monthly_series_counts_valid_entries() {
    let ctx = TestContext::signed_in().await;
    for time in [
        "2025/06/02 10:15 -AM",
        "2025/06/14 03:40 -PM",
        "2025/03/01 12:00 -PM",
        "2025/01/20 08:00 -AM",
        "2024/12/31 11:59 -PM",
        "not a date",
    ] {
        ctx.backend.push_operation(OperationRecord::at(time)).await;
    }

    let response = ctx.server.get("/dashboard/monthly-operations").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Operations");
    assert!(body.get("empty_message").is_none());

    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series[0]["key"], "2025-01");
    assert_eq!(series[5]["key"], "2025-06");
    assert_eq!(series[5]["value"], 2);
    let total: u64 = series.iter().map(|b| b["value"].as_u64().unwrap()).sum();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn empty_operations_show_no_data_message() {
    let ctx = TestContext::signed_in().await;

    let body: serde_json::Value = ctx.server.get("/dashboard/monthly-operations").await.json();

    assert!(body["series"].as_array().unwrap().is_empty());
    assert_eq!(body["empty_message"], "No operations data available");
}

#[tokio::test]
async fn summary_counts_statuses() {
    let ctx = TestContext::signed_in().await;
    for status in ["Success", "successful", "Failed", "pending"] {
        ctx.backend
            .push_operation(OperationRecord::at("2025/06/01 10:00 -AM").with_status(status))
            .await;
    }

    let body: serde_json::Value = ctx.server.get("/dashboard/summary").await.json();

    assert_eq!(body["total"], 4);
    assert_eq!(body["successful"], 2);
    assert_eq!(body["failed"], 1);
}

#[tokio::test]
async fn dashboard_requires_authentication() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/dashboard/monthly-operations")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn backend_failure_is_bad_gateway() {
    let ctx = TestContext::signed_in().await;
    ctx.backend.fail(Fault::ListOperations);

    ctx.server
        .get("/dashboard/summary")
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}
