//! "Now" and "today" for the derivation engine.
//!
//! The engine works on local wall-clock time and never reads a clock
//! itself; this module decides which clock the CLI hands it.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::errors::CliError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a configured timezone name. Empty or "auto" means system local.
pub fn parse_timezone(value: &str) -> anyhow::Result<Option<Tz>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    trimmed
        .parse::<Tz>()
        .map(Some)
        .map_err(|_| CliError::invalid_input(format!("Invalid timezone: {}", trimmed)).into())
}

/// Current local time, in `tz` when configured.
pub fn now_in(tz: Option<Tz>) -> NaiveDateTime {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
        None => Local::now().naive_local(),
    }
}

/// Parse a `--now` override.
///
/// A bare date stands for the last millisecond of that day. An RFC 3339
/// timestamp keeps the wall-clock time of its own offset.
pub fn parse_now(value: &str) -> anyhow::Result<NaiveDateTime> {
    let trimmed = value.trim();
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| anyhow::anyhow!("Invalid time of day"))?;
        return Ok(date.and_time(end_of_day));
    }
    Err(CliError::invalid_input(format!(
        "Invalid time (expected YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD): {}",
        value
    ))
    .into())
}

/// `--now` when given, otherwise the clock.
pub fn resolve_now(override_value: Option<&str>, tz: Option<Tz>) -> anyhow::Result<NaiveDateTime> {
    match override_value {
        Some(value) => parse_now(value),
        None => Ok(now_in(tz)),
    }
}
