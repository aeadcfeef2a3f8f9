//! Session state store.
//!
//! Holds the operator's derived authentication state and keeps it in step
//! with the backend session. Every transition (startup, auth change events,
//! explicit refreshes after sign-in or sign-out) runs under one async lock and
//! resolves against the session the backend reports *now*, so an event that
//! arrives late cannot resurrect a session that has since been signed out.

use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::{broadcast::error::RecvError, Mutex};
use tokio::task::JoinHandle;

use super::credentials::CredentialChecker;
use super::model::{AuthUser, UserRole};
use crate::services::backend::{AuthChangeEvent, Session, SessionEvent};
use crate::services::context::ConsoleContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthState {
    pub loading: bool,
    pub user: Option<AuthUser>,
    pub role: Option<UserRole>,
    pub is_authenticated: bool,
    pub needs_two_factor: bool,
    pub two_factor_verified: bool,
    pub session_checked: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            user: None,
            role: None,
            is_authenticated: false,
            needs_two_factor: false,
            two_factor_verified: false,
            session_checked: false,
        }
    }
}

impl AuthState {
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }

    /// With a user loaded, authentication follows the second-factor flags.
    fn derive(&mut self) {
        if self.user.is_some() {
            self.is_authenticated = !self.needs_two_factor || self.two_factor_verified;
        }
    }

    fn clear(&mut self) {
        self.user = None;
        self.role = None;
        self.is_authenticated = false;
        self.needs_two_factor = false;
        self.two_factor_verified = false;
    }
}

pub struct SessionStateStore {
    ctx: ConsoleContext,
    credentials: CredentialChecker,
    state: RwLock<AuthState>,
    transitions: Mutex<()>,
}

impl SessionStateStore {
    pub fn new(ctx: ConsoleContext) -> Self {
        let credentials = CredentialChecker::new(ctx.backend.clone());
        Self {
            ctx,
            credentials,
            state: RwLock::new(AuthState::default()),
            transitions: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.snapshot().user
    }

    /// Startup: resolve the existing session once and mark the check done.
    pub async fn initialize(&self) {
        let _guard = self.transitions.lock().await;
        match self.ctx.backend.get_session().await {
            Ok(session) => self.apply_session(session).await,
            Err(e) => tracing::error!("Initial session lookup failed: {}", e),
        }
        self.update(|state| {
            state.loading = false;
            state.session_checked = true;
        });
    }

    /// Re-reads the backend session and applies it.
    pub async fn refresh(&self) {
        let _guard = self.transitions.lock().await;
        match self.ctx.backend.get_session().await {
            Ok(session) => self.apply_session(session).await,
            Err(e) => tracing::error!("Session refresh failed: {}", e),
        }
    }

    /// Applies a caller-provided session (None clears the state).
    pub async fn handle_session(&self, session: Option<Session>) {
        let _guard = self.transitions.lock().await;
        self.apply_session(session).await;
    }

    pub async fn apply_event(&self, event: SessionEvent) {
        tracing::debug!(
            "Auth state changed: {:?}, session present: {}",
            event.kind,
            event.session.is_some()
        );
        match event.kind {
            AuthChangeEvent::SignedOut => self.handle_session(None).await,
            _ if event.session.is_some() => self.refresh().await,
            _ => {}
        }
    }

    /// Subscribes before spawning, so no event published after this call is missed.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.ctx.backend.subscribe();
        let store = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => store.apply_event(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Auth listener skipped {} events; resyncing", skipped);
                        store.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Auth listener stopped");
        })
    }

    pub async fn set_two_factor_complete(&self) {
        let _guard = self.transitions.lock().await;
        if let Some(user) = self.current_user() {
            self.ctx
                .persisted
                .mark_two_factor_verified(&user.id, self.ctx.clock.now())
                .await;
        }
        self.update(|state| state.two_factor_verified = true);
    }

    pub async fn clear_two_factor_verification(&self) {
        let _guard = self.transitions.lock().await;
        self.ctx.persisted.clear_two_factor().await;
        self.update(|state| state.two_factor_verified = false);
    }

    async fn apply_session(&self, session: Option<Session>) {
        let Some(session) = session else {
            tracing::debug!("No session; clearing auth state");
            self.ctx.persisted.clear_two_factor().await;
            self.update(AuthState::clear);
            return;
        };

        let user = match self.credentials.fetch_user_data(&session.user.id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::error!("No user data for session user {}", session.user.id);
                self.update(AuthState::clear);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load user data for {}: {}", session.user.id, e);
                self.update(AuthState::clear);
                return;
            }
        };

        let needs_two_factor = user.two_factor_enabled;
        let verified = if needs_two_factor {
            self.ctx.persisted.verified_for(&user.id).await
        } else {
            if self.ctx.persisted.snapshot().await.two_factor_verified.is_some() {
                self.ctx.persisted.clear_two_factor().await;
            }
            true
        };

        tracing::info!(
            "Session user {} loaded (role {:?}, 2FA required: {}, verified: {})",
            user.id,
            user.role,
            needs_two_factor,
            verified
        );
        self.update(|state| {
            state.role = Some(user.role);
            state.user = Some(user);
            state.needs_two_factor = needs_two_factor;
            state.two_factor_verified = verified;
        });
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        let authenticated = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            f(&mut state);
            state.derive();
            state.is_authenticated
        };
        self.ctx.metrics.set_authenticated(authenticated);
    }
}
