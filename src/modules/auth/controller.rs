use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::modules::auth::{
    interface::{AuthError, LoginOutcome},
    schema::{
        ErrorResponse, LoginRequest, LoginResponse, RedirectResponse, SessionResponse,
        TwoFactorRequest, TwoFactorResponse,
    },
};
use crate::services::notifier::Route;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn auth_error(e: AuthError) -> ApiError {
    (e.status_code(), Json(ErrorResponse::new(e.to_string())))
}

fn check_login_rate(state: &AppState) -> Result<(), ApiError> {
    if state.login_limiter.check().is_err() {
        tracing::warn!("Login rate limit exceeded");
        return Err(auth_error(AuthError::RateLimited));
    }
    Ok(())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
    }
    check_login_rate(&state)?;

    let outcome = state
        .auth
        .login(req.email.trim(), &req.password)
        .await
        .map_err(auth_error)?;

    let response = match outcome {
        LoginOutcome::Completed => LoginResponse {
            requires_two_factor: false,
            user_id: None,
            redirect: Route::Dashboard.path(),
        },
        LoginOutcome::TwoFactorRequired { user_id } => LoginResponse {
            requires_two_factor: true,
            user_id: Some(user_id),
            redirect: Route::TwoFactor.path(),
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

pub async fn verify_two_factor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TwoFactorRequest>,
) -> Result<(StatusCode, Json<TwoFactorResponse>), ApiError> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
    }
    check_login_rate(&state)?;

    let user_id = match req.user_id {
        Some(id) => id,
        None => state
            .session
            .current_user()
            .map(|u| u.id)
            .ok_or_else(|| auth_error(AuthError::NoPendingUser))?,
    };

    let verified = state
        .auth
        .verify_two_factor(&user_id, req.code.trim())
        .await
        .map_err(auth_error)?;

    if !verified {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid verification code")),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(TwoFactorResponse {
            verified,
            redirect: Route::Dashboard.path(),
        }),
    ))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<RedirectResponse>), ApiError> {
    state.auth.logout().await.map_err(auth_error)?;

    Ok((
        StatusCode::OK,
        Json(RedirectResponse {
            redirect: state.context.navigator.current().path(),
        }),
    ))
}

pub async fn session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionResponse>) {
    let session_valid = state.auth.check_session().await;
    let snapshot = state.session.snapshot();

    (
        StatusCode::OK,
        Json(SessionResponse {
            is_admin: snapshot.is_admin(),
            state: snapshot,
            session_valid,
            route: state.context.navigator.current().path(),
        }),
    )
}

pub async fn session_expired(State(state): State<Arc<AppState>>) -> (StatusCode, Json<RedirectResponse>) {
    state.auth.handle_session_expired().await;

    (
        StatusCode::OK,
        Json(RedirectResponse {
            redirect: state.context.navigator.current().path(),
        }),
    )
}
