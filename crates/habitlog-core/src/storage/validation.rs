//! Write-path validation and input normalization for entries.
//!
//! The derivation engine trusts its input; everything it relies on is
//! checked here before an entry reaches the store.

use crate::error::{HabitlogError, Result};
use crate::storage::types::{Entry, NewEntry, Settings};

/// Minimum length of the improvement note, in characters, after trimming.
pub const MIN_IMPROVE_CHARS: usize = 3;

/// Maximum length of the improvement note, in characters.
pub const MAX_IMPROVE_CHARS: usize = 2000;

/// Maximum length of a habit label, in characters.
pub const MAX_HABIT_LABEL_CHARS: usize = 80;

/// Split free-form gratitude text into items.
///
/// Items are separated by newlines or commas (ASCII or full-width);
/// surrounding whitespace is trimmed and empty items are dropped.
pub fn split_gratitude(text: &str) -> Vec<String> {
    text.split(['\n', ',', '\u{FF0C}'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate a new entry against the current habit list and return the
/// normalized form that gets stored.
pub fn normalize_new_entry(entry: &NewEntry, settings: &Settings) -> Result<NewEntry> {
    let improve = entry.improve.trim().to_string();
    check_improve(&improve)?;

    let gratitude: Vec<String> = entry
        .gratitude
        .iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    if gratitude.is_empty() {
        return Err(HabitlogError::Validation(
            "At least one gratitude item is required".to_string(),
        ));
    }

    for id in &entry.habits_completed {
        if settings.habit(id).is_none() {
            return Err(HabitlogError::Validation(format!(
                "Unknown habit id: {}",
                id
            )));
        }
    }

    Ok(NewEntry {
        date: entry.date,
        improve,
        gratitude,
        habits_completed: entry.habits_completed.clone(),
        bookkeeping: entry.bookkeeping,
    })
}

/// Check an entry already in the store.
///
/// Habit ids are not checked: entries may reference habits deleted since.
pub fn validate_stored_entry(entry: &Entry) -> Result<()> {
    check_improve(entry.improve.trim())
        .map_err(|e| HabitlogError::Validation(format!("{}: {}", entry.date, e)))?;
    if entry.gratitude.iter().all(|g| g.trim().is_empty()) {
        return Err(HabitlogError::Validation(format!(
            "{}: entry has no gratitude items",
            entry.date
        )));
    }
    Ok(())
}

/// Normalize a habit label.
pub fn normalize_habit_label(label: &str) -> Result<String> {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(HabitlogError::Validation(
            "Habit label cannot be empty".to_string(),
        ));
    }
    if normalized.chars().count() > MAX_HABIT_LABEL_CHARS {
        return Err(HabitlogError::Validation(format!(
            "Habit label too long (max {} characters)",
            MAX_HABIT_LABEL_CHARS
        )));
    }
    Ok(normalized)
}

fn check_improve(improve: &str) -> Result<()> {
    let chars = improve.chars().count();
    if chars < MIN_IMPROVE_CHARS {
        return Err(HabitlogError::Validation(format!(
            "Improvement note must be at least {} characters",
            MIN_IMPROVE_CHARS
        )));
    }
    if chars > MAX_IMPROVE_CHARS {
        return Err(HabitlogError::Validation(format!(
            "Improvement note too long (max {} characters)",
            MAX_IMPROVE_CHARS
        )));
    }
    Ok(())
}
