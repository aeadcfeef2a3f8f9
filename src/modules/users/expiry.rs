//! License expiry arithmetic.
//!
//! Expiry dates are calendar dates (`YYYY-MM-DD`, UTC). Adding months clamps
//! to the last day of the target month, so Jan 31 + 1 month is Feb 28 (or 29).

use chrono::{DateTime, Months, NaiveDate};

use super::model::LicenseType;

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Subscription length used when a monthly license is created without one.
pub const DEFAULT_SUBSCRIPTION_MONTHS: u32 = 3;

/// Parses a stored expiry. Accepts a bare date, an RFC 3339 timestamp, or any
/// string starting with `YYYY-MM-DD`.
pub fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, EXPIRY_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, EXPIRY_FORMAT).ok())
}

pub fn format_expiry(date: NaiveDate) -> String {
    date.format(EXPIRY_FORMAT).to_string()
}

pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// `max(today, current) + months`: a renewal never shortens a license that
/// is still running, and a lapsed one restarts from today.
pub fn extend_expiry(today: NaiveDate, current: Option<NaiveDate>, months: u32) -> Option<NaiveDate> {
    let base = match current {
        Some(current) if current > today => current,
        _ => today,
    };
    add_months(base, months)
}

/// Expiry assigned at creation: monthly licenses run `months` from today,
/// credit licenses never expire.
pub fn initial_expiry(license: LicenseType, today: NaiveDate, months: u32) -> Option<NaiveDate> {
    match license {
        LicenseType::Monthly => add_months(today, months),
        LicenseType::Credits => None,
    }
}
