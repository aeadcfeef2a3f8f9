use std::sync::Arc;

use super::model::{AuthUser, CredentialRecord};
use crate::services::backend::{Backend, BackendError};

/// Attribute lookups that stay clear of the `users` row-level policies.
#[derive(Clone)]
pub struct CredentialChecker {
    backend: Arc<dyn Backend>,
}

impl CredentialChecker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Privileged RPC first, direct table read if the RPC errors.
    pub async fn fetch_user_data(&self, user_id: &str) -> Result<Option<AuthUser>, BackendError> {
        tracing::debug!("Fetching user data for {}", user_id);
        match self.backend.get_user_data_safe(user_id).await {
            Ok(Some(row)) => Ok(Some(row.into())),
            Ok(None) => {
                tracing::error!("No user data found for {}", user_id);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("get_user_data_safe failed for {}: {}; using direct read", user_id, e);
                self.fetch_user_data_fallback(user_id).await
            }
        }
    }

    pub async fn fetch_user_data_fallback(&self, user_id: &str) -> Result<Option<AuthUser>, BackendError> {
        let row = self.backend.find_attributes_by_id(user_id).await.map_err(|e| {
            tracing::error!("Fallback user lookup failed for {}: {}", user_id, e);
            e
        })?;
        if row.is_none() {
            tracing::info!("No user data in fallback lookup for {}", user_id);
        }
        Ok(row.map(AuthUser::from))
    }

    /// Pre-login lookup by email. Lookup errors are logged and reported as
    /// "unknown", which lets the password check decide.
    pub async fn check_user_credentials(&self, email: &str) -> Option<CredentialRecord> {
        match self.backend.find_credentials_by_email(email).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Credential check failed for {}: {}", email, e);
                None
            }
        }
    }
}
