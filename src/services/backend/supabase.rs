use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{broadcast, RwLock};

use super::interface::{
    AuthProvider, BackendError, OperationRepository, Result, UserRepository,
};
use super::types::{AuthChangeEvent, AuthIdentity, CreateIdentity, Session, SessionEvent, SessionUser};
use crate::modules::auth::model::{CredentialRecord, UserAttributes};
use crate::modules::dashboard::model::OperationRecord;
use crate::modules::users::model::{User, UserPatch};

const USERS_TABLE: &str = "users";
const OPERATIONS_TABLE: &str = "operations";
const ATTRIBUTE_COLUMNS: &str =
    "id,uid,email,name,email_type,credits,expiry_time,two_factor_enabled,block,activate";
const CREDENTIAL_COLUMNS: &str = "email,email_type,block,credits,two_factor_enabled";
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Needed only for the admin identity endpoints
    pub service_role_key: Option<String>,
    /// Edge function that validates second-factor tokens
    pub two_factor_function: String,
}

/// Client for the hosted Supabase project (GoTrue auth, PostgREST tables and
/// RPCs, edge functions).
///
/// Like the browser client it holds the current session in memory and
/// broadcasts a [`SessionEvent`] whenever it changes.
pub struct SupabaseClient {
    client: Client,
    config: SupabaseConfig,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct TwoFactorResponse {
    #[serde(default)]
    valid: bool,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client: Client::new(),
            config: SupabaseConfig {
                url: config.url.trim_end_matches('/').to_string(),
                ..config
            },
            session: RwLock::new(None),
            events,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url, path)
    }

    fn table(&self, table: &str) -> String {
        self.endpoint(&format!("rest/v1/{}", table))
    }

    fn rpc(&self, function: &str) -> String {
        self.endpoint(&format!("rest/v1/rpc/{}", function))
    }

    /// Request authorized as the signed-in user, or anonymously when no
    /// session is held.
    async fn user_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.config.anon_key.clone(),
        };
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    fn admin_request(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let key = self.config.service_role_key.as_deref().ok_or_else(|| {
            BackendError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY is required for admin calls".to_string())
        })?;
        Ok(builder.header("apikey", key).bearer_auth(key))
    }

    fn publish(&self, kind: AuthChangeEvent, session: Option<Session>) {
        // no receivers is fine
        let _ = self.events.send(SessionEvent::new(kind, session));
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::checked(builder.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn send_empty(builder: RequestBuilder) -> Result<()> {
        Self::checked(builder.send().await?).await.map(|_| ())
    }

    async fn checked(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        Err(BackendError::api(status.as_u16(), message))
    }

    async fn select_first<T: DeserializeOwned>(
        &self,
        columns: &str,
        filter: (&str, String),
    ) -> Result<Option<T>> {
        let builder = self
            .client
            .get(self.table(USERS_TABLE))
            .query(&[("select", columns.to_string()), (filter.0, filter.1)])
            .query(&[("limit", "1")]);
        let rows: Vec<T> = Self::send_json(self.user_request(builder).await).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let builder = self
            .client
            .post(self.endpoint("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }));
        let token: TokenResponse = Self::send_json(builder).await?;

        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|secs| Utc::now().timestamp() + secs));
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        };

        *self.session.write().await = Some(session.clone());
        self.publish(AuthChangeEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let current = self.session.read().await.clone();
        if let Some(session) = current {
            let builder = self
                .client
                .post(self.endpoint("auth/v1/logout"))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(&session.access_token);
            Self::send_empty(builder).await?;
        }
        *self.session.write().await = None;
        self.publish(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn admin_create_user(&self, identity: &CreateIdentity) -> Result<AuthIdentity> {
        let builder = self.admin_request(self.client.post(self.endpoint("auth/v1/admin/users")))?;
        Self::send_json(builder.json(identity)).await
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("auth/v1/admin/users/{}", user_id));
        Self::send_empty(self.admin_request(self.client.delete(url))?).await
    }

    async fn validate_two_factor(&self, user_id: &str, token: &str) -> Result<bool> {
        let url = self.endpoint(&format!("functions/v1/{}", self.config.two_factor_function));
        let builder = self
            .client
            .post(url)
            .json(&json!({ "user_id": user_id, "token": token }));
        let response: TwoFactorResponse = Self::send_json(self.user_request(builder).await).await?;
        Ok(response.valid)
    }
}

#[async_trait]
impl UserRepository for SupabaseClient {
    async fn get_user_data_safe(&self, user_id: &str) -> Result<Option<UserAttributes>> {
        let builder = self
            .client
            .post(self.rpc("get_user_data_safe"))
            .json(&json!({ "user_id": user_id }));
        let value: Value = Self::send_json(self.user_request(builder).await).await?;

        // the procedure has returned both a row and a single-row set
        let row = match value {
            Value::Null => return Ok(None),
            Value::Array(rows) => match rows.into_iter().next() {
                Some(row) => row,
                None => return Ok(None),
            },
            row => row,
        };
        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn find_attributes_by_id(&self, user_id: &str) -> Result<Option<UserAttributes>> {
        self.select_first(ATTRIBUTE_COLUMNS, ("id", format!("eq.{}", user_id)))
            .await
    }

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        self.select_first(CREDENTIAL_COLUMNS, ("email", format!("eq.{}", email)))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let builder = self
            .client
            .get(self.table(USERS_TABLE))
            .query(&[("select", "*")]);
        Self::send_json(self.user_request(builder).await).await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        self.select_first("*", ("id", format!("eq.{}", user_id))).await
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let builder = self
            .client
            .post(self.table(USERS_TABLE))
            .header("Prefer", "return=minimal")
            .json(user);
        Self::send_empty(self.user_request(builder).await).await
    }

    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<()> {
        let builder = self
            .client
            .patch(self.table(USERS_TABLE))
            .query(&[("id", format!("eq.{}", user_id))])
            .header("Prefer", "return=minimal")
            .json(patch);
        Self::send_empty(self.user_request(builder).await).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let builder = self
            .client
            .delete(self.table(USERS_TABLE))
            .query(&[("id", format!("eq.{}", user_id))]);
        Self::send_empty(self.user_request(builder).await).await
    }

    async fn delete_auth_user(&self, user_id: &str) -> Result<()> {
        let builder = self
            .client
            .post(self.rpc("delete_auth_user"))
            .json(&json!({ "user_id": user_id }));
        Self::send_empty(self.user_request(builder).await).await
    }
}

#[async_trait]
impl OperationRepository for SupabaseClient {
    async fn list_operations(&self) -> Result<Vec<OperationRecord>> {
        let builder = self
            .client
            .get(self.table(OPERATIONS_TABLE))
            .query(&[("select", "*")]);
        Self::send_json(self.user_request(builder).await).await
    }
}
