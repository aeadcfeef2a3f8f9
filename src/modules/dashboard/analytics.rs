use chrono::{Datelike, Months, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{MonthlyCount, OperationRecord, OperationSummary};

pub const MONTHS_TO_SHOW: u32 = 6;

lazy_static! {
    static ref MONTH_PREFIX: Regex = Regex::new(r"(\d{4})/(\d{2})/").expect("valid month pattern");
}

/// `YYYY-MM` of an operation timestamp, or `None` when it carries no
/// `yyyy/MM/` segment.
pub fn month_key(time: &str) -> Option<String> {
    let caps = MONTH_PREFIX.captures(time)?;
    Some(format!("{}-{}", &caps[1], &caps[2]))
}

/// Operation counts for the current month and the five before it, oldest
/// first. Entries with malformed or out-of-range timestamps are dropped.
pub fn monthly_operations(operations: &[OperationRecord], today: NaiveDate) -> Vec<MonthlyCount> {
    if operations.is_empty() {
        return Vec::new();
    }

    let this_month = today.with_day(1).unwrap_or(today);
    let mut buckets: Vec<MonthlyCount> = (0..MONTHS_TO_SHOW)
        .rev()
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .map(|month| MonthlyCount {
            key: month.format("%Y-%m").to_string(),
            name: month.format("%b").to_string(),
            value: 0,
        })
        .collect();

    for key in operations
        .iter()
        .filter_map(|op| op.time.as_deref())
        .filter_map(month_key)
    {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.key == key) {
            bucket.value += 1;
        } else {
            tracing::trace!("Operation month {} outside chart window", key);
        }
    }

    buckets
}

pub fn operation_summary(operations: &[OperationRecord]) -> OperationSummary {
    operations.iter().fold(OperationSummary::default(), |mut acc, op| {
        acc.total += 1;
        match op.status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("success") || s.eq_ignore_ascii_case("successful") => {
                acc.successful += 1
            }
            Some(s) if s.eq_ignore_ascii_case("failed") || s.eq_ignore_ascii_case("failure") => {
                acc.failed += 1
            }
            _ => {}
        }
        acc
    })
}
