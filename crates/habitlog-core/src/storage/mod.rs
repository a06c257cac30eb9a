//! Storage layer: data model, write-path validation and backends.

pub mod sqlite;
pub mod traits;
pub mod types;
pub mod validation;

pub use sqlite::SqliteStorage;
pub use traits::StorageEngine;
pub use types::{
    Entry, EntryFilter, Habit, HabitRef, NewEntry, SavingsRatio, Settings, StoreMetadata,
    UpsertOutcome, LEGACY_BOOKKEEPING_LABEL, UNKNOWN_HABIT_LABEL,
};
pub use validation::split_gratitude;
