//! Operator-facing notices and page navigation.
//!
//! Auth and user flows report outcomes as transient notices and move the
//! operator between console pages. Both are collaborators so the flows can be
//! driven without a front-end attached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, RwLock};

use super::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Builds translated notices for a [`Notifier`].
#[derive(Clone, Copy)]
pub struct NoticeBuilder<'a> {
    translator: &'a Translator,
    notifier: &'a dyn Notifier,
}

impl<'a> NoticeBuilder<'a> {
    pub fn new(translator: &'a Translator, notifier: &'a dyn Notifier) -> Self {
        Self { translator, notifier }
    }

    /// Title and description are both dictionary keys.
    pub fn keys(&self, level: NoticeLevel, title_key: &str, description_key: &str) {
        let description = self.translator.t(description_key);
        self.text(level, title_key, description);
    }

    /// Translated title with a literal description (usually an error message).
    pub fn text(&self, level: NoticeLevel, title_key: &str, description: impl Into<String>) {
        self.notifier.notify(Notice {
            level,
            title: self.translator.t(title_key),
            description: description.into(),
            created_at: Utc::now(),
        });
    }
}

pub const NOTICE_LOG_CAPACITY: usize = 50;

/// Bounded in-memory notice queue drained by the front-end.
pub struct NoticeLog {
    notices: Mutex<VecDeque<Notice>>,
    capacity: usize,
}

impl NoticeLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            notices: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn peek(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new(NOTICE_LOG_CAPACITY)
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("{}: {}", notice.title, notice.description),
            _ => tracing::info!("{}: {}", notice.title, notice.description),
        }
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.push_back(notice);
        while notices.len() > self.capacity {
            notices.pop_front();
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Login {
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<LoginMarker>,
    },
    TwoFactor,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginMarker {
    LoggedOut,
    SessionExpired,
}

impl Route {
    pub fn login() -> Self {
        Self::Login { marker: None }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Self::Login { .. })
    }

    /// Front-end path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Login { marker: None } => "/login".to_string(),
            Self::Login {
                marker: Some(LoginMarker::LoggedOut),
            } => "/login?loggedOut=true".to_string(),
            Self::Login {
                marker: Some(LoginMarker::SessionExpired),
            } => "/login?sessionExpired=true".to_string(),
            Self::TwoFactor => "/two-factor".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;
    fn navigate(&self, to: Route);
}

/// Remembers the operator's current page; the HTTP layer reports it back as
/// the redirect target.
pub struct RouteTracker {
    current: RwLock<Route>,
}

impl RouteTracker {
    pub fn new(start: Route) -> Self {
        Self {
            current: RwLock::new(start),
        }
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new(Route::login())
    }
}

impl Navigator for RouteTracker {
    fn current(&self) -> Route {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn navigate(&self, to: Route) {
        tracing::debug!("Navigating to {}", to);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = to;
    }
}
