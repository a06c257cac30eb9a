//! # habitlog core
//!
//! Core library for habitlog - a CLI-first daily improvement, gratitude and
//! habit tracker.
//!
//! This crate provides the data model, the derivation engine that turns the
//! raw entry history into streak, reward and projection statistics, and the
//! storage abstraction, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: Data model, write-path validation and the SQLite store
//! - **engine**: Pure statistics derivation (calendar buckets, streaks,
//!   rewards, projections)
//! - **fs**: Atomic file replacement

pub mod engine;
pub mod error;
pub mod fs;
pub mod storage;

pub use engine::{compute_stats, Stats};
pub use error::{HabitlogError, Result};
pub use storage::{
    Entry, EntryFilter, Habit, NewEntry, SavingsRatio, Settings, SqliteStorage, StorageEngine,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
