//! String formatting utilities for UI rendering.

use chrono::{DateTime, NaiveDate, Utc};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Replace newlines so a value fits on one line.
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

/// `2024-03-04 (Mon)`
pub fn format_day(date: NaiveDate, pretty: bool) -> String {
    if pretty {
        date.format("%Y-%m-%d (%a)").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

pub fn format_datetime(dt: &DateTime<Utc>, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M UTC").to_string()
    } else {
        dt.to_rfc3339()
    }
}

/// Progress toward a threshold, e.g. `2/3`.
pub fn progress(count: u32, target: u32) -> String {
    format!("{}/{}", count, target)
}

/// Gain rate as a percentage with up to two decimals, e.g. `4%`.
pub fn format_rate(rate: f64) -> String {
    let percent = format!("{:.2}", rate * 100.0);
    let trimmed = percent.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}
