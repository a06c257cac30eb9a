//! Row types for database queries.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{HabitlogError, Result};
use crate::storage::types::Entry;

/// Columns selected for every entry query, in `EntryRow::from_row` order.
pub const ENTRY_COLUMNS: &str = "e.date, e.improve, e.gratitude_json, e.habits_json, e.bookkeeping, e.updated_at";

/// Raw row data from the entries table, before parsing into domain types.
#[derive(Debug)]
pub struct EntryRow {
    pub date: String,
    pub improve: String,
    pub gratitude_json: String,
    pub habits_json: String,
    pub bookkeeping: bool,
    pub updated_at: String,
}

impl EntryRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            improve: row.get(1)?,
            gratitude_json: row.get(2)?,
            habits_json: row.get(3)?,
            bookkeeping: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = HabitlogError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| HabitlogError::Storage(format!("Invalid entry date {}: {}", row.date, e)))?;
        let gratitude: Vec<String> = serde_json::from_str(&row.gratitude_json)
            .map_err(|e| HabitlogError::Storage(format!("Invalid gratitude JSON: {}", e)))?;
        let habits_completed: BTreeSet<String> = serde_json::from_str(&row.habits_json)
            .map_err(|e| HabitlogError::Storage(format!("Invalid habits JSON: {}", e)))?;
        let updated_at = DateTime::parse_from_rfc3339(&row.updated_at)
            .map_err(|e| HabitlogError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Entry {
            date,
            improve: row.improve,
            gratitude,
            habits_completed,
            bookkeeping: row.bookkeeping,
            updated_at: Some(updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, habits_json: &str) -> EntryRow {
        EntryRow {
            date: date.to_string(),
            improve: "reply to mail".to_string(),
            gratitude_json: r#"["tea"]"#.to_string(),
            habits_json: habits_json.to_string(),
            bookkeeping: false,
            updated_at: "2024-03-04T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_row_converts_to_entry() {
        let entry: Entry = row("2024-03-04", r#"["run","read"]"#).try_into().unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(entry.habits_completed.len(), 2);
        assert!(entry.is_habit_day());
    }

    #[test]
    fn test_bad_date_is_storage_error() {
        let result: Result<Entry> = row("2024-02-30", "[]").try_into();
        assert!(matches!(result, Err(HabitlogError::Storage(_))));
    }
}
