use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::modules::users::model::{deserialize_loose_string, BlockStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    /// `email_type` column, compared case-insensitively.
    pub fn from_email_type(email_type: Option<&str>) -> Self {
        match email_type {
            Some(t) if t.eq_ignore_ascii_case("admin") => Self::Admin,
            _ => Self::User,
        }
    }
}

/// The signed-in staff member as seen by the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub credits: Option<String>,
    pub expiry_time: Option<String>,
    pub uid: Option<String>,
    pub two_factor_enabled: bool,
}

/// Row shape returned by `get_user_data_safe` and its direct-read fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAttributes {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub credits: Option<String>,
    #[serde(default)]
    pub expiry_time: Option<String>,
    #[serde(default)]
    pub two_factor_enabled: Option<bool>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub activate: Option<String>,
}

impl From<UserAttributes> for AuthUser {
    fn from(row: UserAttributes) -> Self {
        Self {
            role: UserRole::from_email_type(row.email_type.as_deref()),
            id: row.id,
            email: row.email.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            credits: row.credits,
            expiry_time: row.expiry_time,
            uid: row.uid,
            two_factor_enabled: row.two_factor_enabled.unwrap_or(false),
        }
    }
}

/// Minimal projection used for the pre-login credential check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_type: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub credits: Option<String>,
    #[serde(default)]
    pub two_factor_enabled: Option<bool>,
}

impl CredentialRecord {
    pub fn is_blocked(&self) -> bool {
        self.block.as_deref() == Some(BlockStatus::Blocked.as_str())
    }

    /// True for a non-admin account whose credit balance parses to zero or less.
    /// Admins, missing balances and unparsable balances are never rejected.
    pub fn has_no_credits(&self) -> bool {
        let Some(email_type) = self.email_type.as_deref() else {
            return false;
        };
        if email_type.eq_ignore_ascii_case("admin") {
            return false;
        }
        self.credits
            .as_deref()
            .map(|raw| raw.replace('"', ""))
            .and_then(|raw| Decimal::from_str(raw.trim()).ok())
            .is_some_and(|credits| credits <= Decimal::ZERO)
    }

    pub fn requires_two_factor(&self) -> bool {
        self.two_factor_enabled.unwrap_or(false)
    }
}
