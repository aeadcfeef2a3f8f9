use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::services::notifier::Notice;

#[derive(Debug, Serialize)]
pub struct ConsoleInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub language: String,
    pub rtl: bool,
    pub route: String,
}

#[derive(Debug, Serialize)]
pub struct NoticesResponse {
    pub notices: Vec<Notice>,
}

pub async fn index(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ConsoleInfo>) {
    let language = state.context.translator.language();
    (
        StatusCode::OK,
        Json(ConsoleInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            language: language.code().to_string(),
            rtl: language.is_rtl(),
            route: state.context.navigator.current().path(),
        }),
    )
}

/// Drains pending notices; each notice is delivered once.
pub async fn notices(State(state): State<Arc<AppState>>) -> (StatusCode, Json<NoticesResponse>) {
    (
        StatusCode::OK,
        Json(NoticesResponse {
            notices: state.notices.drain(),
        }),
    )
}
