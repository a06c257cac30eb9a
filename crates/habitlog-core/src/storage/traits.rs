//! Storage engine trait definition.
//!
//! The `StorageEngine` trait is the boundary between the habitlog domain and
//! wherever entries and settings live. The derivation engine never touches
//! it: callers take a snapshot (`list_entries` + `settings`) and hand that to
//! [`crate::engine::compute_stats`].

use std::path::Path;

use chrono::NaiveDate;

use super::types::{
    Entry, EntryFilter, Habit, NewEntry, SavingsRatio, Settings, StoreMetadata, UpsertOutcome,
};
use crate::error::Result;

/// Storage engine interface for a habitlog store.
///
/// All implementations must ensure:
/// - At most one entry per calendar date
/// - Deleting a habit never rewrites entries that reference it
/// - Writes become durable on `close`
pub trait StorageEngine: Send + Sync {
    /// Create a new, empty store at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `HabitlogError::Storage` if:
    /// - File already exists
    /// - Cannot write to path
    fn create(path: &Path) -> Result<()>
    where
        Self: Sized;

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// Returns `HabitlogError::StoreNotFound` if the file does not exist,
    /// or `HabitlogError::Storage` if it cannot be read.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Close the store, persisting all changes atomically.
    fn close(self) -> Result<()>;

    /// Get store metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    // --- Entry operations ---

    /// Record a day, replacing any entry already stored for that date.
    ///
    /// # Errors
    ///
    /// Returns `HabitlogError::Validation` if:
    /// - The improvement note is shorter than 3 characters after trimming
    /// - No non-empty gratitude item is given
    /// - A habit id is not in the current habit list
    fn upsert_entry(&mut self, entry: &NewEntry) -> Result<UpsertOutcome>;

    /// Get the entry for a date.
    ///
    /// Returns `Ok(Some(entry))` if found, `Ok(None)` if not found.
    fn get_entry(&self, date: NaiveDate) -> Result<Option<Entry>>;

    /// Delete the entry for a date. Returns whether an entry was removed.
    fn delete_entry(&mut self, date: NaiveDate) -> Result<bool>;

    /// List entries matching the filter, newest first.
    fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>>;

    // --- Settings operations ---

    /// Current settings; defaults when nothing has been stored yet.
    fn settings(&self) -> Result<Settings>;

    /// Persist a new savings ratio.
    fn set_savings_ratio(&mut self, ratio: SavingsRatio) -> Result<()>;

    /// Append a habit to the habit list and return it with its new id.
    fn add_habit(&mut self, label: &str) -> Result<Habit>;

    /// Change the label of an existing habit.
    ///
    /// # Errors
    ///
    /// Returns `HabitlogError::NotFound` if no habit has that id.
    fn rename_habit(&mut self, id: &str, label: &str) -> Result<Habit>;

    /// Remove a habit from the habit list. Returns whether it existed.
    fn remove_habit(&mut self, id: &str) -> Result<bool>;

    // --- Maintenance operations ---

    /// Check store integrity.
    ///
    /// Verifies:
    /// - Database consistency
    /// - Required metadata keys
    /// - Every stored entry decodes and passes validation
    fn check_integrity(&self) -> Result<()>;
}
