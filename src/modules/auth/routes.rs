use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(controller::login))
        .route("/verify-2fa", post(controller::verify_two_factor))
        .route("/logout", post(controller::logout))
        .route("/session", get(controller::session))
        .route("/session-expired", post(controller::session_expired))
}
