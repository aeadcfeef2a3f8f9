use std::sync::Arc;

use super::credentials::CredentialChecker;
use super::interface::{AuthError, LoginOutcome, Result};
use super::state::SessionStateStore;
use crate::services::context::ConsoleContext;
use crate::services::notifier::{LoginMarker, NoticeLevel, Route};

/// Operator-triggered auth flows: login, second factor, logout, expiry.
#[derive(Clone)]
pub struct AuthActions {
    ctx: ConsoleContext,
    store: Arc<SessionStateStore>,
    credentials: CredentialChecker,
}

impl AuthActions {
    pub fn new(ctx: ConsoleContext, store: Arc<SessionStateStore>) -> Self {
        let credentials = CredentialChecker::new(ctx.backend.clone());
        Self { ctx, store, credentials }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        tracing::info!("Login attempt for {}", email);
        self.ctx.persisted.set_login_in_progress(true).await;

        let record = self.credentials.check_user_credentials(email).await;
        if let Some(record) = &record {
            if record.is_blocked() {
                return Err(self
                    .reject_login(AuthError::AccountBlocked, "accountBlocked", "accountBlockedDescription")
                    .await);
            }
            if record.has_no_credits() {
                return Err(self
                    .reject_login(AuthError::NoCreditsLeft, "noCreditsLeft", "noCreditsLeftDescription")
                    .await);
            }
        }

        let session = match self.ctx.backend.sign_in_with_password(email, password).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Sign-in failed for {}: {}", email, e);
                self.ctx.persisted.set_login_in_progress(false).await;
                self.ctx.notices().text(NoticeLevel::Error, "loginFailed", e.to_string());
                self.ctx.metrics.record_auth("login", false);
                return Err(AuthError::from_sign_in(e));
            }
        };

        self.store.refresh().await;

        // Unknown credential rows defer to what the session store loaded.
        let requires_two_factor = match &record {
            Some(record) => record.requires_two_factor(),
            None => self.store.snapshot().needs_two_factor,
        };

        self.ctx.metrics.record_auth("login", true);
        if requires_two_factor {
            tracing::info!("Second factor required for {}", session.user.id);
            self.ctx.navigator.navigate(Route::TwoFactor);
            return Ok(LoginOutcome::TwoFactorRequired {
                user_id: session.user.id,
            });
        }

        self.ctx
            .notices()
            .keys(NoticeLevel::Success, "loginSuccess", "welcomeBack");
        self.ctx.persisted.set_login_in_progress(false).await;
        self.ctx.navigator.navigate(Route::Dashboard);
        Ok(LoginOutcome::Completed)
    }

    /// Returns whether the code was accepted.
    pub async fn verify_two_factor(&self, user_id: &str, token: &str) -> Result<bool> {
        match self.store.current_user() {
            Some(user) if user.id != user_id => return Err(AuthError::UserMismatch),
            None => return Err(AuthError::NoPendingUser),
            Some(_) => {}
        }

        match self.ctx.backend.validate_two_factor(user_id, token).await {
            Ok(true) => {
                self.store.set_two_factor_complete().await;
                self.ctx.persisted.set_login_in_progress(false).await;
                self.ctx
                    .notices()
                    .keys(NoticeLevel::Success, "loginSuccess", "welcomeBack");
                self.ctx.metrics.record_auth("verify_2fa", true);
                self.ctx.navigator.navigate(Route::Dashboard);
                Ok(true)
            }
            Ok(false) => {
                tracing::info!("Invalid second factor for {}", user_id);
                self.store.clear_two_factor_verification().await;
                self.ctx
                    .notices()
                    .keys(NoticeLevel::Error, "invalidOTP", "invalidOTPDescription");
                self.ctx.metrics.record_auth("verify_2fa", false);
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Second factor validation failed for {}: {}", user_id, e);
                self.store.clear_two_factor_verification().await;
                self.ctx
                    .notices()
                    .text(NoticeLevel::Error, "verificationFailed", e.to_string());
                self.ctx.metrics.record_auth("verify_2fa", false);
                Err(e.into())
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        if !self.check_session().await {
            tracing::info!("No valid session on logout; clearing local state");
            self.ctx.persisted.clear_all().await;
            self.store.handle_session(None).await;
            self.ctx.navigator.navigate(Route::Login {
                marker: Some(LoginMarker::LoggedOut),
            });
            return Ok(());
        }

        if let Err(e) = self.ctx.backend.sign_out().await {
            tracing::error!("Sign-out failed: {}", e);
            self.ctx.notices().text(NoticeLevel::Error, "logoutFailed", e.to_string());
            self.ctx.metrics.record_auth("logout", false);
            return Err(e.into());
        }

        self.ctx.persisted.clear_all().await;
        self.store.refresh().await;
        self.ctx
            .notices()
            .keys(NoticeLevel::Success, "logoutSuccess", "comeBackSoon");
        self.ctx.metrics.record_auth("logout", true);
        self.ctx.navigator.navigate(Route::Login {
            marker: Some(LoginMarker::LoggedOut),
        });
        Ok(())
    }

    /// True when the backend holds a session that has not expired.
    /// Lookup errors count as no session.
    pub async fn check_session(&self) -> bool {
        match self.ctx.backend.get_session().await {
            Ok(Some(session)) => {
                let expired = session.is_expired_at(self.ctx.clock.unix_seconds());
                if expired {
                    tracing::info!("Session for {} has expired", session.user.id);
                }
                !expired
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!("Session check failed: {}", e);
                false
            }
        }
    }

    /// Clears persisted flags and sends the operator to the login page,
    /// unless they are already there.
    pub async fn handle_session_expired(&self) {
        self.ctx.persisted.clear_all().await;
        if self.ctx.navigator.current().is_login() {
            return;
        }
        self.ctx
            .notices()
            .keys(NoticeLevel::Error, "sessionExpired", "pleaseLoginAgain");
        self.ctx.navigator.navigate(Route::Login {
            marker: Some(LoginMarker::SessionExpired),
        });
    }

    async fn reject_login(&self, error: AuthError, title_key: &str, description_key: &str) -> AuthError {
        tracing::warn!("Login rejected: {}", error);
        self.ctx.persisted.set_login_in_progress(false).await;
        self.ctx.notices().keys(NoticeLevel::Error, title_key, description_key);
        self.ctx.metrics.record_auth("login", false);
        error
    }
}
