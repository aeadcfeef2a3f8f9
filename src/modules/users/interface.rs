use axum::http::StatusCode;

use crate::services::backend::BackendError;

pub type Result<T> = std::result::Result<T, UserError>;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Failed to create user: {0}")]
    IdentityCreate(BackendError),

    /// The profile row was rejected after the identity was created.
    /// `rolled_back` reports whether the identity was removed again.
    #[error("Failed to create user profile: {source}")]
    ProfileInsert { source: BackendError, rolled_back: bool },

    #[error("Failed to delete user from database: {0}")]
    ProfileDelete(BackendError),

    /// The row is gone but the login identity could not be removed.
    #[error("User {user_id} was removed from the database but remains in the auth system: {source}")]
    IdentityRemains { user_id: String, source: BackendError },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IdentityCreate(BackendError::Api { status: 422, .. }) => StatusCode::CONFLICT,
            Self::IdentityCreate(_) => StatusCode::BAD_GATEWAY,
            Self::ProfileInsert { .. } => StatusCode::BAD_GATEWAY,
            Self::ProfileDelete(_) => StatusCode::BAD_GATEWAY,
            Self::IdentityRemains { .. } => StatusCode::MULTI_STATUS,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
