use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn dashboard_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/monthly-operations", get(controller::monthly))
        .route("/summary", get(controller::summary))
}
