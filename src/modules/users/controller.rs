use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::modules::auth::schema::ErrorResponse;
use crate::modules::users::{
    interface::UserError,
    model::LicenseType,
    schema::{
        parse_credits, AddCreditsRequest, AddPlanRequest, CreditsResponse, MessageResponse,
        NewUserRequest, PlanResponse, RenewRequest, RenewResponse, UpdateUserRequest,
        UserListResponse, UserResponse,
    },
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn user_error(e: UserError) -> ApiError {
    (e.status_code(), Json(ErrorResponse::new(e.to_string())))
}

fn invalid(e: impl ToString) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<UserListResponse>), ApiError> {
    let users = state.users.list_users().await.map_err(user_error)?;
    Ok((
        StatusCode::OK,
        Json(UserListResponse {
            total: users.len(),
            users,
        }),
    ))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.add_user(&req).await.map_err(user_error)?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    req.validate().map_err(invalid)?;

    let user = req.into_user(user_id);
    state.users.update_user(&user).await.map_err(user_error)?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: format!("User {} updated", user.id),
        }),
    ))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    match state.users.delete_user(&user_id).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("User {} deleted", user_id),
            }),
        )),
        Err(e @ UserError::IdentityRemains { .. }) => Err((
            e.status_code(),
            Json(ErrorResponse::with_message(
                "Partial deletion",
                e.to_string(),
            )),
        )),
        Err(e) => Err(user_error(e)),
    }
}

pub async fn renew_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<RenewRequest>,
) -> Result<(StatusCode, Json<RenewResponse>), ApiError> {
    state.users.require_auth().map_err(user_error)?;
    req.validate().map_err(invalid)?;

    let user = state
        .context
        .backend
        .find_user(&user_id)
        .await
        .map_err(|e| user_error(e.into()))?
        .ok_or_else(|| user_error(UserError::NotFound(user_id.clone())))?;

    let expiry_time = state
        .users
        .renew_user(&user, req.months)
        .await
        .map_err(user_error)?;

    Ok((
        StatusCode::OK,
        Json(RenewResponse {
            user_id,
            user_type: LicenseType::Monthly.to_string(),
            expiry_time,
        }),
    ))
}

pub async fn add_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<AddPlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    req.validate().map_err(invalid)?;

    let assignment = state
        .users
        .add_plan_to_user(&user_id, &req.plan_name, req.duration_months)
        .await
        .map_err(user_error)?;

    Ok((
        StatusCode::OK,
        Json(PlanResponse {
            user_id,
            my_plans: assignment.my_plans,
            expiry_time: assignment.expiry_time,
        }),
    ))
}

pub async fn add_credits(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<AddCreditsRequest>,
) -> Result<(StatusCode, Json<CreditsResponse>), ApiError> {
    let amount = parse_credits(&req.amount)
        .ok_or_else(|| invalid(format!("Invalid credits amount: {}", req.amount)))?;

    let credits = state
        .users
        .add_credits(&user_id, amount)
        .await
        .map_err(user_error)?;

    Ok((StatusCode::OK, Json(CreditsResponse { user_id, credits })))
}
