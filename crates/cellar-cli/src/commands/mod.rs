//! Command handlers for the Cellar CLI.

pub mod add;
pub mod check;
pub mod completions;
pub mod consume;
pub mod delete;
pub mod init;
pub mod list;
pub mod move_wine;
pub mod positions;
pub mod show;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};

/// Parse an ISO-8601 timestamp or a bare YYYY-MM-DD date.
pub(crate) fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(anyhow::anyhow!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
}
