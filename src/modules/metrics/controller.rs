use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::AppState;

/// Handler for GET /metrics endpoint
/// Returns Prometheus metrics in text format
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.context.metrics.export() {
        Ok(output) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to export metrics: {}", e),
        )
            .into_response(),
    }
}

/// Handler for GET /health endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let session_checked = state.session.snapshot().session_checked;
    (
        StatusCode::OK,
        [("Content-Type", "application/json")],
        format!(r#"{{"status":"healthy","session_checked":{}}}"#, session_checked),
    )
        .into_response()
}
