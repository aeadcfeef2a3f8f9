use axum::http::StatusCode;

use crate::services::backend::BackendError;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Outcome of a password login that passed the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Completed,
    /// Password accepted; the second factor for `user_id` must follow.
    TwoFactorRequired { user_id: String },
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Account blocked")]
    AccountBlocked,

    #[error("No credits left")]
    NoCreditsLeft,

    #[error("{0}")]
    SignInRejected(String),

    #[error("No user is waiting for a second factor")]
    NoPendingUser,

    #[error("Second factor submitted for a different user")]
    UserMismatch,

    #[error("Rate limited")]
    RateLimited,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AuthError {
    /// Sign-in failures the backend attributes to the caller become
    /// rejections; everything else stays a backend error.
    pub fn from_sign_in(e: BackendError) -> Self {
        match e {
            BackendError::Api { status, message } if (400..500).contains(&status) => {
                Self::SignInRejected(message)
            }
            other => Self::Backend(other),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccountBlocked => StatusCode::FORBIDDEN,
            Self::NoCreditsLeft => StatusCode::FORBIDDEN,
            Self::SignInRejected(_) => StatusCode::UNAUTHORIZED,
            Self::NoPendingUser => StatusCode::BAD_REQUEST,
            Self::UserMismatch => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
