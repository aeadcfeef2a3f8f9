use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::AppState;
use crate::modules::auth::schema::ErrorResponse;
use crate::modules::dashboard::{
    analytics::{monthly_operations, operation_summary},
    model::{MonthlyOperationsResponse, OperationRecord, OperationSummary},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

async fn load_operations(state: &AppState) -> Result<Vec<OperationRecord>, ApiError> {
    if !state.session.is_authenticated() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Not authenticated")),
        ));
    }

    state.context.backend.list_operations().await.map_err(|e| {
        tracing::error!("Failed to load operations: {}", e);
        (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(e.to_string())))
    })
}

pub async fn monthly(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<MonthlyOperationsResponse>), ApiError> {
    let operations = load_operations(&state).await?;
    let series = monthly_operations(&operations, state.context.clock.today());
    let translator = &state.context.translator;

    Ok((
        StatusCode::OK,
        Json(MonthlyOperationsResponse {
            title: translator.t("operations"),
            empty_message: series.is_empty().then(|| translator.t("noOperationsFound")),
            series,
        }),
    ))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<OperationSummary>), ApiError> {
    let operations = load_operations(&state).await?;
    Ok((StatusCode::OK, Json(operation_summary(&operations))))
}
