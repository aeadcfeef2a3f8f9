use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::expiry::DEFAULT_SUBSCRIPTION_MONTHS;
use super::model::{BlockStatus, LicenseType, User};

/// Upper bound on subscription lengths accepted from the console.
pub const MAX_SUBSCRIPTION_MONTHS: u32 = 120;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn has_at_sign(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') {
        return Err(ValidationError::new("email"));
    }
    Ok(())
}

/// Appends `.0` to integral amounts so the column keeps its decimal shape.
pub fn format_credits(amount: Decimal) -> String {
    if amount.scale() == 0 {
        format!("{}.0", amount)
    } else {
        amount.to_string()
    }
}

/// Parses a credit amount, tolerating surrounding quotes and whitespace.
pub fn parse_credits(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.replace('"', "").trim()).ok()
}

// =============================================================================
// ADD USER
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "has_at_sign", message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub credits: Option<String>,
    #[serde(default = "default_license")]
    pub user_type: LicenseType,
    #[validate(custom(function = "not_blank", message = "Phone is required"))]
    pub phone: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub block: BlockStatus,
    #[serde(default)]
    #[validate(range(min = 1, max = 120, message = "Subscription must be between 1 and 120 months"))]
    pub subscription_months: Option<u32>,
}

fn default_license() -> LicenseType {
    LicenseType::Credits
}

fn default_country() -> String {
    "Saudi Arabia".to_string()
}

impl NewUserRequest {
    /// Credits as stored; empty input becomes `0.0`.
    pub fn formatted_credits(&self) -> Result<String, String> {
        let raw = self.credits.as_deref().unwrap_or("").trim();
        if raw.is_empty() {
            return Ok(format_credits(Decimal::ZERO));
        }
        match parse_credits(raw) {
            Some(amount) if amount.is_sign_negative() => Err("Credits cannot be negative".to_string()),
            Some(amount) => Ok(format_credits(amount)),
            None => Err(format!("Invalid credits amount: {}", raw)),
        }
    }

    pub fn months(&self) -> u32 {
        self.subscription_months.unwrap_or(DEFAULT_SUBSCRIPTION_MONTHS)
    }
}

// =============================================================================
// UPDATE USER
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[validate(custom(function = "has_at_sign", message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub activate: Option<String>,
    #[serde(default)]
    pub block: Option<BlockStatus>,
}

impl UpdateUserRequest {
    pub fn into_user(self, id: String) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            country: self.country,
            activate: self.activate,
            block: self.block.map(|b| b.as_str().to_string()),
            ..Default::default()
        }
    }
}

// =============================================================================
// RENEW / PLANS / CREDITS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RenewRequest {
    #[validate(range(min = 1, max = 120, message = "Months must be between 1 and 120"))]
    pub months: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPlanRequest {
    #[validate(custom(function = "not_blank", message = "Plan name is required"))]
    pub plan_name: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 120, message = "Duration must be between 1 and 120 months"))]
    pub duration_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AddCreditsRequest {
    pub amount: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RenewResponse {
    pub user_id: String,
    pub user_type: String,
    pub expiry_time: String,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub user_id: String,
    pub my_plans: String,
    pub expiry_time: String,
}

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub user_id: String,
    pub credits: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
