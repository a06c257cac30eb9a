//! Parsing helpers for dates, windows, formats and ratios.

use chrono::{Duration, NaiveDate};

use habitlog_core::storage::{split_gratitude, SavingsRatio};

use crate::errors::CliError;
use crate::ui::OutputFormat;

/// Parse a day: `YYYY-MM-DD`, `today` or `yesterday`.
pub fn parse_day(value: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

/// Parse a look-back window such as `30d` or `4w`.
pub fn parse_window(value: &str) -> anyhow::Result<Duration> {
    let invalid = || CliError::invalid_input(format!("Invalid window: {} (use e.g. 30d or 4w)", value));
    let (split, unit) = match value.char_indices().last() {
        Some((idx, unit)) if idx > 0 => (idx, unit),
        _ => return Err(invalid().into()),
    };

    let amount: i64 = value[..split].parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(CliError::invalid_input(format!("Window must be positive: {}", value)).into());
    }

    let window = match unit {
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => return Err(invalid().into()),
    };
    window.ok_or_else(|| CliError::invalid_input(format!("Window too large: {}", value)).into())
}

/// First day covered by a window ending on `today`; `7d` spans today and the six days before.
pub fn window_start(today: NaiveDate, window: Duration) -> anyhow::Result<NaiveDate> {
    window
        .checked_sub(&Duration::days(1))
        .and_then(|back| today.checked_sub_signed(back))
        .ok_or_else(|| CliError::invalid_input("Window reaches past the earliest date").into())
}

pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    value
        .map(|v| v.parse::<OutputFormat>())
        .transpose()
        .map_err(Into::into)
}

/// Parse a savings ratio given as percent or fraction.
pub fn parse_savings_ratio(value: &str) -> anyhow::Result<SavingsRatio> {
    value.parse::<SavingsRatio>().map_err(Into::into)
}

/// Flatten repeated `--gratitude` values into items.
pub fn gratitude_items(values: &[String]) -> Vec<String> {
    values.iter().flat_map(|v| split_gratitude(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("today", today()).unwrap(), today());
        assert_eq!(
            parse_day("Yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_day("2024-01-31", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_day("2024-13-01", today()).is_err());
    }

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("30d").unwrap(), Duration::days(30));
        assert_eq!(parse_window("4w").unwrap(), Duration::days(28));
        assert!(parse_window("0d").is_err());
        assert!(parse_window("3h").is_err());
        assert!(parse_window("d").is_err());
        assert!(parse_window("").is_err());
    }

    #[test]
    fn test_parse_window_rejects_multibyte_unit() {
        assert!(parse_window("3日").is_err());
        assert!(parse_window("日").is_err());
        assert!(parse_window("3dé").is_err());
    }

    #[test]
    fn test_parse_window_rejects_out_of_range_amount() {
        let err = parse_window("999999999999999d").unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(parse_window("999999999999999w").is_err());
    }

    #[test]
    fn test_window_start() {
        let today = today();
        assert_eq!(window_start(today, Duration::days(1)).unwrap(), today);
        assert_eq!(
            window_start(today, Duration::days(7)).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 24).unwrap()
        );
        let huge = parse_window("99999999999d").unwrap();
        assert!(window_start(today, huge).is_err());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(parse_output_format(Some("plain")).unwrap(), Some(OutputFormat::Plain));
        assert!(parse_output_format(Some("xml")).is_err());
    }

    #[test]
    fn test_parse_savings_ratio() {
        assert_eq!(parse_savings_ratio("25").unwrap(), SavingsRatio::Quarter);
        assert_eq!(parse_savings_ratio("0.5").unwrap(), SavingsRatio::Half);
        assert_eq!(parse_savings_ratio("0%").unwrap(), SavingsRatio::None);
        assert!(parse_savings_ratio("30").is_err());
    }

    #[test]
    fn test_gratitude_items() {
        let values = vec!["tea, friends".to_string(), "sunny day".to_string()];
        assert_eq!(gratitude_items(&values), vec!["tea", "friends", "sunny day"]);
    }
}
