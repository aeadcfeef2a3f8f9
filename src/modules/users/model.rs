use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::expiry::parse_expiry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    #[serde(rename = "Credits License")]
    Credits,
    #[serde(rename = "Monthly License")]
    Monthly,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credits => "Credits License",
            Self::Monthly => "Monthly License",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Credits License" => Ok(Self::Credits),
            "Monthly License" => Ok(Self::Monthly),
            other => Err(format!("unknown license type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    #[serde(rename = "Blocked")]
    Blocked,
    #[serde(rename = "Not Blocked")]
    NotBlocked,
}

impl BlockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "Blocked",
            Self::NotBlocked => "Not Blocked",
        }
    }
}

impl Default for BlockStatus {
    fn default() -> Self {
        Self::NotBlocked
    }
}

/// A row of the `users` table.
///
/// Text columns are kept as strings because the table is shared with the
/// licensing client and may hold values this console does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub credits: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub activate: Option<String>,
    #[serde(default)]
    pub email_type: Option<String>,
    /// `YYYY-MM-DD`; null means unlimited
    #[serde(default)]
    pub expiry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hwid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_plans: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_enabled: Option<bool>,
}

impl User {
    pub fn license_type(&self) -> Option<LicenseType> {
        self.user_type.as_deref().and_then(|t| t.parse().ok())
    }

    pub fn is_blocked(&self) -> bool {
        self.block.as_deref() == Some(BlockStatus::Blocked.as_str())
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_time.as_deref().and_then(parse_expiry)
    }
}

/// Column subset written by an update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_plans: Option<String>,
}

impl UserPatch {
    /// Copies every set field onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        fn set(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        set(&mut user.name, &self.name);
        set(&mut user.password, &self.password);
        set(&mut user.phone, &self.phone);
        set(&mut user.country, &self.country);
        set(&mut user.activate, &self.activate);
        set(&mut user.block, &self.block);
        set(&mut user.credits, &self.credits);
        set(&mut user.user_type, &self.user_type);
        set(&mut user.expiry_time, &self.expiry_time);
        set(&mut user.my_plans, &self.my_plans);
    }
}

/// Accepts a JSON string or number and yields its textual form.
///
/// The `credits` column has been written both as text and as a number.
pub fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
