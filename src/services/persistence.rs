use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const STATE_VERSION: u32 = 1;

/// Console-side auth state that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedAuthState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub login_in_progress: bool,
    #[serde(default)]
    pub two_factor_verified: Option<VerifiedMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedMarker {
    pub user_id: String,
    pub verified_at: DateTime<Utc>,
}

impl PersistedAuthState {
    pub fn fresh() -> Self {
        Self {
            version: STATE_VERSION,
            ..Default::default()
        }
    }

    pub fn is_verified_for(&self, user_id: &str) -> bool {
        self.two_factor_verified
            .as_ref()
            .is_some_and(|m| m.user_id == user_id)
    }

    /// Drops anything that cannot apply to `user_id`: state written by another
    /// format version is discarded, and a marker for a different user is removed.
    /// Returns true when something changed.
    pub fn reconcile(&mut self, user_id: Option<&str>) -> bool {
        if self.version != STATE_VERSION {
            *self = Self::fresh();
            return true;
        }
        match (&self.two_factor_verified, user_id) {
            (Some(marker), Some(id)) if marker.user_id != id => {
                self.two_factor_verified = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait StatePersistence: Send + Sync {
    async fn load(&self) -> Result<Option<PersistedAuthState>, PersistenceError>;
    async fn save(&self, state: &PersistedAuthState) -> Result<(), PersistenceError>;
}

/// JSON file next to the console binary.
pub struct FileStatePersistence {
    path: PathBuf,
}

impl FileStatePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StatePersistence for FileStatePersistence {
    async fn load(&self) -> Result<Option<PersistedAuthState>, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, state: &PersistedAuthState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(state)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStatePersistence {
    state: Mutex<Option<PersistedAuthState>>,
}

impl MemoryStatePersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatePersistence for MemoryStatePersistence {
    async fn load(&self) -> Result<Option<PersistedAuthState>, PersistenceError> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &PersistedAuthState) -> Result<(), PersistenceError> {
        *self.state.lock().await = Some(state.clone());
        Ok(())
    }
}

/// Read-modify-write access to the persisted state.
///
/// Storage failures are logged and never fail the calling auth flow; an
/// unreadable state behaves like an empty one.
pub struct PersistedSession {
    storage: Arc<dyn StatePersistence>,
    lock: Mutex<()>,
}

impl PersistedSession {
    pub fn new(storage: Arc<dyn StatePersistence>) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> PersistedAuthState {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Whether a second-factor verification is on record for `user_id`.
    /// A marker left by another account is discarded on the way.
    pub async fn verified_for(&self, user_id: &str) -> bool {
        let _guard = self.lock.lock().await;
        let mut state = self.read().await;
        if state.reconcile(Some(user_id)) {
            tracing::debug!("Discarded stale persisted auth state");
            self.write(&state).await;
        }
        state.is_verified_for(user_id)
    }

    pub async fn set_login_in_progress(&self, in_progress: bool) {
        self.modify(|s| s.login_in_progress = in_progress).await;
    }

    pub async fn mark_two_factor_verified(&self, user_id: &str, at: DateTime<Utc>) {
        let marker = VerifiedMarker {
            user_id: user_id.to_string(),
            verified_at: at,
        };
        self.modify(move |s| s.two_factor_verified = Some(marker)).await;
    }

    pub async fn clear_two_factor(&self) {
        self.modify(|s| s.two_factor_verified = None).await;
    }

    pub async fn clear_all(&self) {
        self.modify(|s| *s = PersistedAuthState::fresh()).await;
    }

    async fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut PersistedAuthState),
    {
        let _guard = self.lock.lock().await;
        let mut state = self.read().await;
        state.reconcile(None);
        f(&mut state);
        self.write(&state).await;
    }

    async fn read(&self) -> PersistedAuthState {
        match self.storage.load().await {
            Ok(Some(state)) => state,
            Ok(None) => PersistedAuthState::fresh(),
            Err(e) => {
                tracing::warn!("Failed to load persisted auth state: {}", e);
                PersistedAuthState::fresh()
            }
        }
    }

    async fn write(&self, state: &PersistedAuthState) {
        if let Err(e) = self.storage.save(state).await {
            tracing::error!("Failed to persist auth state: {}", e);
        }
    }
}
