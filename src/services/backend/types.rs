use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity attached to a session, as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated session issued by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is no longer valid
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Notification pushed by the backend whenever its session changes.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub kind: AuthChangeEvent,
    pub session: Option<Session>,
}

impl SessionEvent {
    pub fn new(kind: AuthChangeEvent, session: Option<Session>) -> Self {
        Self { kind, session }
    }
}

/// Identity created through the admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateIdentity {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: Map<String, Value>,
}

impl CreateIdentity {
    /// Pre-confirmed identity carrying the display name as metadata.
    pub fn confirmed(email: &str, password: &str, name: &str) -> Self {
        let mut user_metadata = Map::new();
        user_metadata.insert("name".to_string(), Value::String(name.to_string()));
        Self {
            email: email.to_string(),
            password: password.to_string(),
            email_confirm: true,
            user_metadata,
        }
    }
}
