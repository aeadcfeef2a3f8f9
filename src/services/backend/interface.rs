use async_trait::async_trait;
use tokio::sync::broadcast;

use super::types::{AuthIdentity, CreateIdentity, Session, SessionEvent};
use crate::modules::auth::model::{CredentialRecord, UserAttributes};
use crate::modules::dashboard::model::OperationRecord;
use crate::modules::users::model::{User, UserPatch};

// =============================================================================
// BACKEND COLLABORATOR TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, BackendError>;

/// Auth half of the hosted service: sessions, admin identities and the
/// out-of-band second factor validator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self) -> Result<()>;
    async fn get_session(&self) -> Result<Option<Session>>;
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
    async fn admin_create_user(&self, identity: &CreateIdentity) -> Result<AuthIdentity>;
    async fn admin_delete_user(&self, user_id: &str) -> Result<()>;
    async fn validate_two_factor(&self, user_id: &str, token: &str) -> Result<bool>;
}

/// The `users` table plus the two privileged procedures that work around
/// row-level security.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// RPC `get_user_data_safe`
    async fn get_user_data_safe(&self, user_id: &str) -> Result<Option<UserAttributes>>;
    async fn find_attributes_by_id(&self, user_id: &str) -> Result<Option<UserAttributes>>;
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<CredentialRecord>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn find_user(&self, user_id: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: &User) -> Result<()>;
    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<()>;
    async fn delete_user(&self, user_id: &str) -> Result<()>;
    /// RPC `delete_auth_user`
    async fn delete_auth_user(&self, user_id: &str) -> Result<()>;
}

#[async_trait]
pub trait OperationRepository: Send + Sync {
    async fn list_operations(&self) -> Result<Vec<OperationRecord>>;
}

/// Everything the console consumes from the hosted service.
pub trait Backend: AuthProvider + UserRepository + OperationRepository {}

impl<T> Backend for T where T: AuthProvider + UserRepository + OperationRepository {}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl BackendError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}
