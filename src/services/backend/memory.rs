use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::interface::{
    AuthProvider, BackendError, OperationRepository, Result, UserRepository,
};
use super::types::{AuthChangeEvent, AuthIdentity, CreateIdentity, Session, SessionEvent, SessionUser};
use crate::modules::auth::model::{CredentialRecord, UserAttributes};
use crate::modules::dashboard::model::OperationRecord;
use crate::modules::users::model::{User, UserPatch};
use crate::services::clock::Clock;

pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Backend calls that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    SignIn,
    SignOut,
    GetSession,
    SafeLookup,
    AttributeLookup,
    CredentialLookup,
    AdminCreate,
    AdminDelete,
    TwoFactor,
    ListUsers,
    FindUser,
    ProfileInsert,
    ProfileUpdate,
    ProfileDelete,
    IdentityDelete,
    ListOperations,
}

#[derive(Debug, Clone)]
struct Identity {
    email: String,
    password: String,
}

/// Self-contained stand-in for the hosted service, used by tests and local
/// demos. State lives in memory; every call is recorded by name.
pub struct InMemoryBackend {
    clock: Arc<dyn Clock>,
    session_ttl_secs: i64,
    identities: RwLock<HashMap<String, Identity>>,
    users: RwLock<BTreeMap<String, User>>,
    operations: RwLock<Vec<OperationRecord>>,
    two_factor_codes: RwLock<HashMap<String, String>>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
    faults: Mutex<HashSet<Fault>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            clock,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            identities: RwLock::new(HashMap::new()),
            users: RwLock::new(BTreeMap::new()),
            operations: RwLock::new(Vec::new()),
            two_factor_codes: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            events,
            faults: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    // -------------------------------------------------------------------------
    // seeding and inspection
    // -------------------------------------------------------------------------

    /// Registers an identity and its profile row in one step.
    pub async fn seed_user(&self, user: User, password: &str) {
        self.identities.write().await.insert(
            user.id.clone(),
            Identity {
                email: user.email.clone(),
                password: password.to_string(),
            },
        );
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn set_two_factor_code(&self, user_id: &str, code: &str) {
        self.two_factor_codes
            .write()
            .await
            .insert(user_id.to_string(), code.to_string());
    }

    pub async fn push_operation(&self, operation: OperationRecord) {
        self.operations.write().await.push(operation);
    }

    pub async fn user(&self, user_id: &str) -> Option<User> {
        self.users.read().await.get(user_id).cloned()
    }

    pub async fn has_identity(&self, user_id: &str) -> bool {
        self.identities.read().await.contains_key(user_id)
    }

    pub async fn identity_id(&self, email: &str) -> Option<String> {
        self.identities
            .read()
            .await
            .iter()
            .find(|(_, identity)| identity.email == email)
            .map(|(id, _)| id.clone())
    }

    /// Moves the held session's expiry into the past without notifying.
    pub async fn expire_session(&self) {
        let now = self.clock.unix_seconds();
        if let Some(session) = self.session.write().await.as_mut() {
            session.expires_at = Some(now - 1);
        }
    }

    pub fn fail(&self, fault: Fault) {
        self.faults.lock().unwrap_or_else(|e| e.into_inner()).insert(fault);
    }

    pub fn heal(&self, fault: Fault) {
        self.faults.lock().unwrap_or_else(|e| e.into_inner()).remove(&fault);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn enter(&self, call: &'static str, fault: Fault) -> Result<()> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        if self.faults.lock().unwrap_or_else(|e| e.into_inner()).contains(&fault) {
            return Err(BackendError::api(500, format!("{} failed", call)));
        }
        Ok(())
    }

    fn publish(&self, kind: AuthChangeEvent, session: Option<Session>) {
        let _ = self.events.send(SessionEvent::new(kind, session));
    }

    fn attributes(user: &User) -> UserAttributes {
        UserAttributes {
            id: user.id.clone(),
            uid: user.uid.clone(),
            email: Some(user.email.clone()),
            name: user.name.clone(),
            email_type: user.email_type.clone(),
            credits: user.credits.clone(),
            expiry_time: user.expiry_time.clone(),
            two_factor_enabled: user.two_factor_enabled,
            block: user.block.clone(),
            activate: user.activate.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.enter("sign_in_with_password", Fault::SignIn)?;
        let id = self
            .identities
            .read()
            .await
            .iter()
            .find(|(_, identity)| identity.email == email && identity.password == password)
            .map(|(id, _)| id.clone())
            .ok_or_else(|| BackendError::api(400, "Invalid login credentials"))?;

        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Some(Uuid::new_v4().to_string()),
            expires_at: Some(self.clock.unix_seconds() + self.session_ttl_secs),
            user: SessionUser {
                id,
                email: Some(email.to_string()),
            },
        };
        *self.session.write().await = Some(session.clone());
        self.publish(AuthChangeEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.enter("sign_out", Fault::SignOut)?;
        *self.session.write().await = None;
        self.publish(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        self.enter("get_session", Fault::GetSession)?;
        Ok(self.session.read().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn admin_create_user(&self, identity: &CreateIdentity) -> Result<AuthIdentity> {
        self.enter("admin_create_user", Fault::AdminCreate)?;
        let mut identities = self.identities.write().await;
        if identities.values().any(|i| i.email == identity.email) {
            return Err(BackendError::api(
                422,
                "A user with this email address has already been registered",
            ));
        }
        let id = Uuid::new_v4().to_string();
        identities.insert(
            id.clone(),
            Identity {
                email: identity.email.clone(),
                password: identity.password.clone(),
            },
        );
        Ok(AuthIdentity {
            id,
            email: Some(identity.email.clone()),
        })
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<()> {
        self.enter("admin_delete_user", Fault::AdminDelete)?;
        self.identities.write().await.remove(user_id);
        Ok(())
    }

    async fn validate_two_factor(&self, user_id: &str, token: &str) -> Result<bool> {
        self.enter("validate_two_factor", Fault::TwoFactor)?;
        Ok(self
            .two_factor_codes
            .read()
            .await
            .get(user_id)
            .is_some_and(|code| code == token))
    }
}

#[async_trait]
impl UserRepository for InMemoryBackend {
    async fn get_user_data_safe(&self, user_id: &str) -> Result<Option<UserAttributes>> {
        self.enter("get_user_data_safe", Fault::SafeLookup)?;
        Ok(self.users.read().await.get(user_id).map(Self::attributes))
    }

    async fn find_attributes_by_id(&self, user_id: &str) -> Result<Option<UserAttributes>> {
        self.enter("find_attributes_by_id", Fault::AttributeLookup)?;
        Ok(self.users.read().await.get(user_id).map(Self::attributes))
    }

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        self.enter("find_credentials_by_email", Fault::CredentialLookup)?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .map(|u| CredentialRecord {
                email: Some(u.email.clone()),
                email_type: u.email_type.clone(),
                block: u.block.clone(),
                credits: u.credits.clone(),
                two_factor_enabled: u.two_factor_enabled,
            }))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter("list_users", Fault::ListUsers)?;
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        self.enter("find_user", Fault::FindUser)?;
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.enter("insert_user", Fault::ProfileInsert)?;
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(BackendError::api(409, "duplicate key value violates unique constraint"));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<()> {
        self.enter("update_user", Fault::ProfileUpdate)?;
        if let Some(user) = self.users.write().await.get_mut(user_id) {
            patch.apply_to(user);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.enter("delete_user", Fault::ProfileDelete)?;
        self.users.write().await.remove(user_id);
        Ok(())
    }

    async fn delete_auth_user(&self, user_id: &str) -> Result<()> {
        self.enter("delete_auth_user", Fault::IdentityDelete)?;
        self.identities.write().await.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl OperationRepository for InMemoryBackend {
    async fn list_operations(&self) -> Result<Vec<OperationRecord>> {
        self.enter("list_operations", Fault::ListOperations)?;
        Ok(self.operations.read().await.clone())
    }
}
