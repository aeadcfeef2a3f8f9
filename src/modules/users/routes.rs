use axum::{routing::{get, post, put}, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(controller::list_users).post(controller::create_user))
        .route("/{id}", put(controller::update_user).delete(controller::delete_user))
        .route("/{id}/renew", post(controller::renew_user))
        .route("/{id}/plans", post(controller::add_plan))
        .route("/{id}/credits", post(controller::add_credits))
}
