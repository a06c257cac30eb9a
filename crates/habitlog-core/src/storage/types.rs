//! Core data types for the habitlog store.
//!
//! Entries are keyed by calendar date: there is at most one entry per day,
//! and recording a day again replaces it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HabitlogError;

/// Label shown for habit ids that are no longer in the habit list.
pub const UNKNOWN_HABIT_LABEL: &str = "unknown habit";

/// Label shown for legacy bookkeeping days when no habit is defined.
pub const LEGACY_BOOKKEEPING_LABEL: &str = "bookkeeping";

/// Metadata for a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// When this store was created
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (informational)
    pub last_modified: DateTime<Utc>,
}

/// A user-defined tracked behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Opaque, stable identifier
    pub id: String,

    /// Display name
    pub label: String,
}

impl Habit {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Share of points set aside each month.
///
/// Only the three ratios offered by the application exist; any other value
/// is rejected when parsed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavingsRatio {
    #[default]
    None,
    Quarter,
    Half,
}

impl SavingsRatio {
    pub const ALL: [SavingsRatio; 3] = [
        SavingsRatio::None,
        SavingsRatio::Quarter,
        SavingsRatio::Half,
    ];

    pub fn as_fraction(self) -> f64 {
        match self {
            SavingsRatio::None => 0.0,
            SavingsRatio::Quarter => 0.25,
            SavingsRatio::Half => 0.5,
        }
    }

    pub fn as_percent(self) -> u32 {
        match self {
            SavingsRatio::None => 0,
            SavingsRatio::Quarter => 25,
            SavingsRatio::Half => 50,
        }
    }

    pub fn from_fraction(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_fraction() == value)
    }
}

impl fmt::Display for SavingsRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

impl FromStr for SavingsRatio {
    type Err = HabitlogError;

    /// Accepts a fraction (`0.25`) or a percentage (`25`, `25%`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            HabitlogError::InvalidInput(format!(
                "Invalid savings ratio: {} (use 0, 25 or 50)",
                trimmed
            ))
        };
        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: u32 = percent.trim().parse().map_err(|_| invalid())?;
            return Self::ALL
                .into_iter()
                .find(|r| r.as_percent() == value)
                .ok_or_else(invalid);
        }
        let value: f64 = trimmed.parse().map_err(|_| invalid())?;
        if let Some(ratio) = Self::from_fraction(value) {
            return Ok(ratio);
        }
        Self::ALL
            .into_iter()
            .find(|r| f64::from(r.as_percent()) == value)
            .ok_or_else(invalid)
    }
}

impl Serialize for SavingsRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_fraction())
    }
}

impl<'de> Deserialize<'de> for SavingsRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        SavingsRatio::from_fraction(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "savings ratio must be one of 0, 0.25, 0.5 (got {})",
                value
            ))
        })
    }
}

/// Per-store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, alias = "savingsRatio")]
    pub savings_ratio: SavingsRatio,

    /// Current habit list, in display order
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl Settings {
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// The habit a legacy `bookkeeping` flag stands for.
    pub fn first_habit(&self) -> Option<&Habit> {
        self.habits.first()
    }
}

/// One recorded day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Calendar day this entry belongs to (unique key)
    pub date: NaiveDate,

    /// The one thing to improve
    pub improve: String,

    /// Things the user is grateful for
    pub gratitude: Vec<String>,

    /// Ids of habits completed that day
    #[serde(default, alias = "habitsCompleted")]
    pub habits_completed: BTreeSet<String>,

    /// Legacy single-habit flag from before multi-habit support
    #[serde(default)]
    pub bookkeeping: bool,

    /// When this entry was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Whether this day counts toward streaks, rewards and bonus density.
    ///
    /// This is the only habit-day predicate; every counter goes through it.
    pub fn is_habit_day(&self) -> bool {
        !self.habits_completed.is_empty() || self.bookkeeping
    }

    /// Resolve the completed habits against the current habit list.
    pub fn completed_habits<'a>(&'a self, settings: &'a Settings) -> Vec<HabitRef<'a>> {
        if self.habits_completed.is_empty() {
            if self.bookkeeping {
                return vec![HabitRef::Legacy(settings.first_habit())];
            }
            return Vec::new();
        }
        self.habits_completed
            .iter()
            .map(|id| match settings.habit(id) {
                Some(habit) => HabitRef::Known(habit),
                None => HabitRef::Unknown(id),
            })
            .collect()
    }
}

/// A completed habit as resolved for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitRef<'a> {
    /// Id present in the current habit list
    Known(&'a Habit),
    /// Id whose habit has since been deleted
    Unknown(&'a str),
    /// Legacy bookkeeping flag, standing for the first habit if any
    Legacy(Option<&'a Habit>),
}

impl<'a> HabitRef<'a> {
    pub fn label(&self) -> &'a str {
        match *self {
            HabitRef::Known(habit) | HabitRef::Legacy(Some(habit)) => &habit.label,
            HabitRef::Unknown(_) => UNKNOWN_HABIT_LABEL,
            HabitRef::Legacy(None) => LEGACY_BOOKKEEPING_LABEL,
        }
    }

    pub fn id(&self) -> Option<&'a str> {
        match *self {
            HabitRef::Known(habit) | HabitRef::Legacy(Some(habit)) => Some(&habit.id),
            HabitRef::Unknown(id) => Some(id),
            HabitRef::Legacy(None) => None,
        }
    }
}

/// Builder for recording a day.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub improve: String,
    pub gratitude: Vec<String>,
    pub habits_completed: BTreeSet<String>,
    pub bookkeeping: bool,
}

impl NewEntry {
    pub fn new(date: NaiveDate, improve: impl Into<String>, gratitude: Vec<String>) -> Self {
        Self {
            date,
            improve: improve.into(),
            gratitude,
            habits_completed: BTreeSet::new(),
            bookkeeping: false,
        }
    }

    pub fn with_habits<I, S>(mut self, habits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.habits_completed = habits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bookkeeping(mut self, bookkeeping: bool) -> Self {
        self.bookkeeping = bookkeeping;
        self
    }

    /// Materialize the stored entry.
    pub fn into_entry(self, updated_at: DateTime<Utc>) -> Entry {
        Entry {
            date: self.date,
            improve: self.improve,
            gratitude: self.gratitude,
            habits_completed: self.habits_completed,
            bookkeeping: self.bookkeeping,
            updated_at: Some(updated_at),
        }
    }
}

/// Whether an upsert created a new day or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Filter for querying entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Start date (inclusive)
    pub since: Option<NaiveDate>,

    /// End date (inclusive)
    pub until: Option<NaiveDate>,

    /// Only days on which this habit id was completed
    pub habit: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    pub fn habit(mut self, id: impl Into<String>) -> Self {
        self.habit = Some(id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
