use axum::http::StatusCode;

use crate::common::TestContext;

#[tokio::test]
async fn metrics_export_console_series() {
    let ctx = TestContext::signed_in().await;
    ctx.server.get("/users").await.assert_status_ok();

    let response = ctx.server.get("/metrics").await;

    response.assert_status(StatusCode::OK);
    let output = response.text();
    assert!(output.contains("license_admin_http_requests_total"));
    assert!(output.contains("endpoint=\"/users\""));
    assert!(output.contains("license_admin_auth_actions_total"));
    assert!(output.contains("license_admin_session_authenticated 1"));
}

#[tokio::test]
async fn health_reports_session_check() {
    let ctx = TestContext::new().await;

    let body: serde_json::Value = ctx.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["session_checked"], true);
}
