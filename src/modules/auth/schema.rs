use serde::{Deserialize, Serialize};
use validator::Validate;

use super::state::AuthState;

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub requires_two_factor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub redirect: String,
}

// =============================================================================
// TWO-FACTOR
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct TwoFactorRequest {
    /// Defaults to the user loaded by the pending login.
    #[serde(default)]
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "Verification code is required"))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct TwoFactorResponse {
    pub verified: bool,
    pub redirect: String,
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub state: AuthState,
    pub is_admin: bool,
    pub session_valid: bool,
    pub route: String,
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
