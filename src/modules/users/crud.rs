//! User administration.
//!
//! Every operation requires an authenticated operator; an unauthenticated
//! call raises the session-expired notice and touches nothing. Successful
//! mutations invalidate the cached user list.

use rust_decimal::Decimal;
use std::sync::Arc;
use validator::Validate;

use super::expiry::{extend_expiry, format_expiry, initial_expiry};
use super::interface::{Result, UserError};
use super::model::{LicenseType, User, UserPatch};
use super::schema::{format_credits, parse_credits, NewUserRequest};
use crate::modules::auth::SessionStateStore;
use crate::services::backend::types::CreateIdentity;
use crate::services::context::ConsoleContext;
use crate::services::notifier::NoticeLevel;
use crate::services::query_cache::{QueryCache, USERS_QUERY};

const DEFAULT_PLAN_MONTHS: u32 = 1;

/// New expiry and plan list written by [`UserOperations::add_plan_to_user`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAssignment {
    pub my_plans: String,
    pub expiry_time: String,
}

#[derive(Clone)]
pub struct UserOperations {
    ctx: ConsoleContext,
    store: Arc<SessionStateStore>,
    cache: Arc<QueryCache>,
}

impl UserOperations {
    pub fn new(ctx: ConsoleContext, store: Arc<SessionStateStore>, cache: Arc<QueryCache>) -> Self {
        Self { ctx, store, cache }
    }

    /// Cached listing; a fetch that races an invalidation is returned but not cached.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.require_auth()?;

        if let Some(users) = self.cache.get::<Vec<User>>(USERS_QUERY) {
            return Ok(users);
        }
        let generation = self.cache.generation(USERS_QUERY);
        let users = self.ctx.backend.list_users().await?;
        self.cache.put(USERS_QUERY, generation, &users);
        Ok(users)
    }

    pub async fn add_user(&self, req: &NewUserRequest) -> Result<User> {
        self.require_auth()?;

        let credits = match req.validate() {
            Err(e) => Err(e.to_string()),
            Ok(()) => req.formatted_credits(),
        }
        .map_err(|message| {
            self.ctx.notices().text(NoticeLevel::Error, "addUserError", message.clone());
            UserError::Validation(message)
        })?;

        let email = req.email.trim().to_string();
        let name = req.name.trim().to_string();
        let identity = self
            .ctx
            .backend
            .admin_create_user(&CreateIdentity::confirmed(&email, &req.password, &name))
            .await
            .map_err(|e| {
                tracing::error!("Identity creation failed for {}: {}", email, e);
                self.fail_mutation("add_user", "addUserError", e.to_string());
                UserError::IdentityCreate(e)
            })?;

        let today = self.ctx.clock.today();
        let user = User {
            id: identity.id.clone(),
            uid: Some(identity.id.clone()),
            name: Some(name),
            email,
            password: Some(req.password.clone()),
            credits: Some(credits),
            user_type: Some(req.user_type.as_str().to_string()),
            phone: Some(req.phone.trim().to_string()),
            country: Some(req.country.clone()),
            block: Some(req.block.as_str().to_string()),
            activate: Some("Active".to_string()),
            email_type: Some("User".to_string()),
            expiry_time: initial_expiry(req.user_type, today, req.months()).map(format_expiry),
            start_date: Some(format_expiry(today)),
            hwid: Some("Null".to_string()),
            my_plans: None,
            two_factor_enabled: None,
        };

        if let Err(e) = self.ctx.backend.insert_user(&user).await {
            tracing::error!("Profile insert failed for {}: {}", user.id, e);
            let rolled_back = match self.ctx.backend.admin_delete_user(&user.id).await {
                Ok(()) => {
                    tracing::info!("Removed identity {} after failed profile insert", user.id);
                    true
                }
                Err(cleanup) => {
                    tracing::error!("Could not remove identity {}: {}", user.id, cleanup);
                    self.ctx.metrics.record_partial_failure("add_user");
                    false
                }
            };
            self.fail_mutation("add_user", "addUserError", e.to_string());
            return Err(UserError::ProfileInsert { source: e, rolled_back });
        }

        tracing::info!("Created user {} ({})", user.id, user.email);
        self.succeed_mutation("add_user", "addSuccess", "addUserSuccess");
        Ok(user)
    }

    /// Writes the editable profile columns of `user`; unset columns are kept.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        self.require_auth()?;

        let patch = UserPatch {
            name: user.name.clone(),
            email: Some(user.email.clone()),
            password: user.password.clone(),
            phone: user.phone.clone(),
            country: user.country.clone(),
            activate: user.activate.clone(),
            block: user.block.clone(),
            ..Default::default()
        };

        if let Err(e) = self.ctx.backend.update_user(&user.id, &patch).await {
            tracing::error!("Update failed for {}: {}", user.id, e);
            self.fail_mutation("update_user", "updateUserFailed", e.to_string());
            return Err(e.into());
        }

        self.succeed_mutation("update_user", "updateSuccess", "updateUserSuccess");
        Ok(())
    }

    /// Removes the profile row, then the login identity.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.require_auth()?;

        if let Err(e) = self.ctx.backend.delete_user(user_id).await {
            tracing::error!("Profile delete failed for {}: {}", user_id, e);
            let err = UserError::ProfileDelete(e);
            self.fail_mutation("delete_user", "deleteUserFailed", err.to_string());
            return Err(err);
        }

        if let Err(e) = self.ctx.backend.delete_auth_user(user_id).await {
            tracing::warn!("Identity delete failed for {}: {}", user_id, e);
            // The row is already gone; listings must not show it.
            self.cache.invalidate(USERS_QUERY);
            self.ctx.metrics.record_partial_failure("delete_user");
            let err = UserError::IdentityRemains {
                user_id: user_id.to_string(),
                source: e,
            };
            self.fail_mutation("delete_user", "deleteUserFailed", err.to_string());
            return Err(err);
        }

        tracing::info!("Deleted user {}", user_id);
        self.succeed_mutation("delete_user", "deleteSuccess", "deleteUserSuccess");
        Ok(())
    }

    /// Switches `user` to a monthly license running `months` past
    /// `max(today, current expiry)`. Returns the new expiry.
    pub async fn renew_user(&self, user: &User, months: u32) -> Result<String> {
        self.require_auth()?;
        if months == 0 {
            return Err(UserError::Validation("Months must be at least 1".to_string()));
        }

        let expiry = extend_expiry(self.ctx.clock.today(), user.expiry_date(), months)
            .map(format_expiry)
            .ok_or_else(|| UserError::Validation("Expiry date out of range".to_string()))?;
        let patch = UserPatch {
            user_type: Some(LicenseType::Monthly.as_str().to_string()),
            expiry_time: Some(expiry.clone()),
            ..Default::default()
        };

        if let Err(e) = self.ctx.backend.update_user(&user.id, &patch).await {
            tracing::error!("Renewal failed for {}: {}", user.id, e);
            self.fail_mutation("renew_user", "renewUserFailed", e.to_string());
            return Err(e.into());
        }

        tracing::info!("Renewed {} until {}", user.id, expiry);
        self.succeed_mutation("renew_user", "renewSuccess", "renewUserSuccess");
        Ok(expiry)
    }

    /// Appends `plan_name` to the user's plan list (once) and extends the
    /// expiry by `duration_months`, one month when omitted.
    pub async fn add_plan_to_user(
        &self,
        user_id: &str,
        plan_name: &str,
        duration_months: Option<u32>,
    ) -> Result<PlanAssignment> {
        self.require_auth()?;

        let plan_name = plan_name.trim();
        if plan_name.is_empty() {
            return Err(UserError::Validation("Plan name is required".to_string()));
        }
        let months = duration_months.unwrap_or(DEFAULT_PLAN_MONTHS);
        if months == 0 {
            return Err(UserError::Validation("Duration must be at least 1 month".to_string()));
        }

        let user = self
            .ctx
            .backend
            .find_user(user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        let expiry_time = extend_expiry(self.ctx.clock.today(), user.expiry_date(), months)
            .map(format_expiry)
            .ok_or_else(|| UserError::Validation("Expiry date out of range".to_string()))?;
        let my_plans = merge_plans(user.my_plans.as_deref(), plan_name);

        let patch = UserPatch {
            user_type: Some(LicenseType::Monthly.as_str().to_string()),
            my_plans: Some(my_plans.clone()),
            expiry_time: Some(expiry_time.clone()),
            ..Default::default()
        };
        if let Err(e) = self.ctx.backend.update_user(user_id, &patch).await {
            tracing::error!("Adding plan {} to {} failed: {}", plan_name, user_id, e);
            self.ctx.metrics.record_mutation("add_plan", false);
            return Err(e.into());
        }

        tracing::info!("Added plan {} to {} (expires {})", plan_name, user_id, expiry_time);
        self.ctx.metrics.record_mutation("add_plan", true);
        self.cache.invalidate(USERS_QUERY);
        Ok(PlanAssignment { my_plans, expiry_time })
    }

    /// Adds `amount` to the stored balance. Returns the new balance text.
    pub async fn add_credits(&self, user_id: &str, amount: Decimal) -> Result<String> {
        self.require_auth()?;
        if amount <= Decimal::ZERO {
            return Err(UserError::Validation("Amount must be positive".to_string()));
        }

        let user = self
            .ctx
            .backend
            .find_user(user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        let current = match user.credits.as_deref().map(str::trim) {
            None | Some("") => Decimal::ZERO,
            Some(raw) => parse_credits(raw).ok_or_else(|| {
                UserError::Validation(format!("Stored credits are not numeric: {}", raw))
            })?,
        };
        let total = current
            .checked_add(amount)
            .ok_or_else(|| UserError::Validation("Credit balance out of range".to_string()))?;
        let credits = format_credits(total);

        let patch = UserPatch {
            credits: Some(credits.clone()),
            ..Default::default()
        };
        if let Err(e) = self.ctx.backend.update_user(user_id, &patch).await {
            tracing::error!("Adding credits to {} failed: {}", user_id, e);
            self.fail_mutation("add_credits", "updateUserFailed", e.to_string());
            return Err(e.into());
        }

        tracing::info!("Credits for {} now {}", user_id, credits);
        self.succeed_mutation("add_credits", "updateSuccess", "addCreditsSuccess");
        Ok(credits)
    }

    pub fn require_auth(&self) -> Result<()> {
        if self.store.is_authenticated() {
            return Ok(());
        }
        tracing::warn!("User operation attempted without an authenticated session");
        self.ctx
            .notices()
            .keys(NoticeLevel::Error, "sessionExpired", "pleaseLogin");
        Err(UserError::NotAuthenticated)
    }

    fn succeed_mutation(&self, operation: &str, title_key: &str, description_key: &str) {
        self.cache.invalidate(USERS_QUERY);
        self.ctx.metrics.record_mutation(operation, true);
        self.ctx
            .notices()
            .keys(NoticeLevel::Success, title_key, description_key);
    }

    fn fail_mutation(&self, operation: &str, title_key: &str, description: String) {
        self.ctx.metrics.record_mutation(operation, false);
        self.ctx.notices().text(NoticeLevel::Error, title_key, description);
    }
}

/// Comma-separated plan list with `plan` appended unless already present.
pub fn merge_plans(existing: Option<&str>, plan: &str) -> String {
    let mut plans: Vec<&str> = existing
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if !plans.contains(&plan) {
        plans.push(plan);
    }
    plans.join(", ")
}
