//! SQLite storage backend.
//!
//! The database is held in memory while the store is open and serialized to
//! a single file on close, replacing the previous file atomically.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::serialize::OwnedData;
use rusqlite::{Connection, DatabaseName, OptionalExtension};
use tracing::{debug, warn, Level};
use uuid::Uuid;

use crate::error::{HabitlogError, Result};
use crate::storage::traits::StorageEngine;
use crate::storage::types::{
    Entry, EntryFilter, Habit, NewEntry, SavingsRatio, Settings, StoreMetadata, UpsertOutcome,
};
use crate::storage::validation::{
    normalize_habit_label, normalize_new_entry, validate_stored_entry,
};

use row::{EntryRow, ENTRY_COLUMNS};

/// On-disk format version written to new stores.
pub const FORMAT_VERSION: &str = "0.1";

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE habits (
        id TEXT PRIMARY KEY,
        label TEXT NOT NULL,
        position INTEGER NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    );

    -- One row per calendar day; the date is the key.
    CREATE TABLE entries (
        date TEXT PRIMARY KEY,
        improve TEXT NOT NULL,
        gratitude_json TEXT NOT NULL,
        habits_json TEXT NOT NULL DEFAULT '[]',
        bookkeeping INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    );
"#;

/// Single-file SQLite storage engine.
pub struct SqliteStorage {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| HabitlogError::Storage("SQLite connection poisoned".to_string()))
    }

    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        if bytes.is_empty() {
            return Err(HabitlogError::Storage("Store file is empty".to_string()));
        }

        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| HabitlogError::Storage("Store file too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns a valid pointer or null; null is
        // rejected below before anything is written through it.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        if raw.is_null() {
            return Err(HabitlogError::Storage("SQLite allocation failed".to_string()));
        }

        // SAFETY:
        // - `raw` was allocated above with exactly `bytes.len()` bytes and is non-null
        // - the source slice is valid for `bytes.len()` reads and cannot overlap
        //   the freshly allocated buffer
        // - `OwnedData` takes ownership of the sqlite3_malloc'd buffer and frees it
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), raw, bytes.len());
            let ptr = NonNull::new(raw).ok_or_else(|| {
                HabitlogError::Storage("SQLite allocation returned null".to_string())
            })?;
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }

    fn persist(conn: &Connection, path: &Path) -> Result<()> {
        let data = conn.serialize(DatabaseName::Main)?;
        crate::fs::write_atomic(path, data.as_ref())
            .map_err(|e| HabitlogError::Storage(format!("Failed to write store: {}", e)))
    }

    fn touch(conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn read_meta(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or_else(|| HabitlogError::Storage(format!("Metadata key missing: {}", key)))
    }

    fn read_habits(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare("SELECT id, label FROM habits ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok(Habit {
                id: row.get(0)?,
                label: row.get(1)?,
            })
        })?;
        let mut habits = Vec::new();
        for habit in rows {
            habits.push(habit?);
        }
        Ok(habits)
    }

    fn read_settings(conn: &Connection) -> Result<Settings> {
        let savings_ratio = conn
            .query_row(
                "SELECT value FROM settings WHERE key = 'savings_ratio'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .map(|value| value.parse::<SavingsRatio>())
            .transpose()
            .map_err(|e| HabitlogError::Storage(format!("Invalid stored savings ratio: {}", e)))?
            .unwrap_or_default();

        Ok(Settings {
            savings_ratio,
            habits: Self::read_habits(conn)?,
        })
    }

    fn new_habit_id(conn: &Connection) -> Result<String> {
        loop {
            let candidate = Uuid::new_v4().simple().to_string()[..8].to_string();
            let taken: Option<String> = conn
                .query_row("SELECT id FROM habits WHERE id = ?", [&candidate], |row| {
                    row.get(0)
                })
                .optional()?;
            if taken.is_none() {
                return Ok(candidate);
            }
        }
    }
}

impl StorageEngine for SqliteStorage {
    fn create(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(HabitlogError::Storage(
                "Store file already exists".to_string(),
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        let created_at = Utc::now().to_rfc3339();
        for (key, value) in [
            ("format_version", FORMAT_VERSION),
            ("created_at", created_at.as_str()),
            ("last_modified", created_at.as_str()),
        ] {
            conn.execute("INSERT INTO meta (key, value) VALUES (?, ?)", [key, value])?;
        }

        Self::persist(&conn, path)?;
        debug!(path = %path.display(), "created store");
        Ok(())
    }

    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HabitlogError::StoreNotFound);
        }

        let bytes = fs::read(path)?;
        let mut conn = Connection::open_in_memory()?;
        let owned_data = Self::owned_data_from_bytes(&bytes)?;
        conn.deserialize(DatabaseName::Main, owned_data, false)?;

        let format_version = Self::read_meta(&conn, "format_version")?;
        if format_version != FORMAT_VERSION {
            return Err(HabitlogError::Storage(format!(
                "Unsupported store format version: {}",
                format_version
            )));
        }

        debug!(path = %path.display(), "opened store");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| HabitlogError::Storage("SQLite connection poisoned".to_string()))?;
        Self::persist(&conn, &self.path)?;
        debug!(path = %self.path.display(), "closed store");
        Ok(())
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;

        let parse = |key: &str| -> Result<DateTime<Utc>> {
            let value = Self::read_meta(&conn, key)?;
            Ok(DateTime::parse_from_rfc3339(&value)
                .map_err(|e| HabitlogError::Storage(format!("Invalid {} timestamp: {}", key, e)))?
                .with_timezone(&Utc))
        };

        Ok(StoreMetadata {
            format_version: Self::read_meta(&conn, "format_version")?,
            created_at: parse("created_at")?,
            last_modified: parse("last_modified")?,
        })
    }

    fn upsert_entry(&mut self, entry: &NewEntry) -> Result<UpsertOutcome> {
        let mut conn = self.lock_conn()?;
        let settings = Self::read_settings(&conn)?;
        let normalized = normalize_new_entry(entry, &settings)?;

        let tx = conn.transaction()?;
        let date_key = normalized.date.format("%Y-%m-%d").to_string();
        let existed: Option<String> = tx
            .query_row("SELECT date FROM entries WHERE date = ?", [&date_key], |row| {
                row.get(0)
            })
            .optional()?;

        let gratitude_json = serde_json::to_string(&normalized.gratitude)
            .map_err(|e| HabitlogError::Storage(format!("Failed to serialize gratitude: {}", e)))?;
        let habits_json = serde_json::to_string(&normalized.habits_completed)
            .map_err(|e| HabitlogError::Storage(format!("Failed to serialize habits: {}", e)))?;

        tx.execute(
            r#"
            INSERT INTO entries (date, improve, gratitude_json, habits_json, bookkeeping, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                improve = excluded.improve,
                gratitude_json = excluded.gratitude_json,
                habits_json = excluded.habits_json,
                bookkeeping = excluded.bookkeeping,
                updated_at = excluded.updated_at
            "#,
            (
                &date_key,
                &normalized.improve,
                gratitude_json,
                habits_json,
                normalized.bookkeeping,
                Utc::now().to_rfc3339(),
            ),
        )?;
        Self::touch(&tx)?;
        tx.commit()?;

        let outcome = if existed.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        debug!(date = %date_key, ?outcome, "upserted entry");
        Ok(outcome)
    }

    fn get_entry(&self, date: NaiveDate) -> Result<Option<Entry>> {
        let conn = self.lock_conn()?;
        let query = format!("SELECT {} FROM entries e WHERE e.date = ?", ENTRY_COLUMNS);
        let row = conn
            .query_row(&query, [date.format("%Y-%m-%d").to_string()], EntryRow::from_row)
            .optional()?;
        row.map(Entry::try_from).transpose()
    }

    fn delete_entry(&mut self, date: NaiveDate) -> Result<bool> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            "DELETE FROM entries WHERE date = ?",
            [date.format("%Y-%m-%d").to_string()],
        )?;
        if removed > 0 {
            Self::touch(&conn)?;
        }
        debug!(%date, removed, "deleted entry");
        Ok(removed > 0)
    }

    fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(since) = filter.since {
            conditions.push("e.date >= ?");
            params.push(Box::new(since.format("%Y-%m-%d").to_string()));
        }

        if let Some(until) = filter.until {
            conditions.push("e.date <= ?");
            params.push(Box::new(until.format("%Y-%m-%d").to_string()));
        }

        if let Some(ref habit) = filter.habit {
            conditions.push("EXISTS (SELECT 1 FROM json_each(e.habits_json) WHERE value = ?)");
            params.push(Box::new(habit.clone()));
        }

        let mut query = format!("SELECT {} FROM entries e", ENTRY_COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY e.date DESC");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            EntryRow::from_row,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(Entry::try_from(row?)?);
        }
        Ok(entries)
    }

    fn settings(&self) -> Result<Settings> {
        let conn = self.lock_conn()?;
        Self::read_settings(&conn)
    }

    fn set_savings_ratio(&mut self, ratio: SavingsRatio) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES ('savings_ratio', ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            [ratio.as_percent().to_string()],
        )?;
        Self::touch(&conn)?;
        debug!(%ratio, "updated savings ratio");
        Ok(())
    }

    fn add_habit(&mut self, label: &str) -> Result<Habit> {
        let label = normalize_habit_label(label)?;
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let duplicate: Option<String> = tx
            .query_row(
                "SELECT id FROM habits WHERE label = ? COLLATE NOCASE",
                [&label],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = duplicate {
            return Err(HabitlogError::Validation(format!(
                "Habit '{}' already exists (id {})",
                label, id
            )));
        }

        let id = Self::new_habit_id(&tx)?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM habits",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO habits (id, label, position, created_at) VALUES (?, ?, ?, ?)",
            (&id, &label, position, Utc::now().to_rfc3339()),
        )?;
        Self::touch(&tx)?;
        tx.commit()?;

        debug!(%id, %label, "added habit");
        Ok(Habit { id, label })
    }

    fn rename_habit(&mut self, id: &str, label: &str) -> Result<Habit> {
        let label = normalize_habit_label(label)?;
        let conn = self.lock_conn()?;
        let updated = conn.execute(
            "UPDATE habits SET label = ? WHERE id = ?",
            [label.as_str(), id],
        )?;
        if updated == 0 {
            return Err(HabitlogError::NotFound(format!("Habit {}", id)));
        }
        Self::touch(&conn)?;
        Ok(Habit {
            id: id.to_string(),
            label,
        })
    }

    fn remove_habit(&mut self, id: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM habits WHERE id = ?", [id])?;
        if removed > 0 {
            Self::touch(&conn)?;
            if tracing::enabled!(Level::DEBUG) {
                let referencing: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries e WHERE EXISTS (SELECT 1 FROM json_each(e.habits_json) WHERE value = ?)",
                    [id],
                    |row| row.get(0),
                )?;
                debug!(%id, referencing, "removed habit; historical entries keep the id");
            }
        }
        Ok(removed > 0)
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(HabitlogError::Storage(format!(
                "SQLite integrity check failed: {}",
                status
            )));
        }

        let metadata_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM meta WHERE key IN ('format_version', 'created_at', 'last_modified')",
            [],
            |row| row.get(0),
        )?;
        if metadata_count < 3 {
            return Err(HabitlogError::Storage(
                "Metadata table missing required keys".to_string(),
            ));
        }

        let settings = Self::read_settings(&conn)?;

        let query = format!("SELECT {} FROM entries e ORDER BY e.date", ENTRY_COLUMNS);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], EntryRow::from_row)?;
        let mut dangling = 0usize;
        for row in rows {
            let entry = Entry::try_from(row?)?;
            validate_stored_entry(&entry)?;
            dangling += entry
                .habits_completed
                .iter()
                .filter(|id| settings.habit(id).is_none())
                .count();
        }
        if dangling > 0 {
            warn!(dangling, "entries reference habits that no longer exist");
        }

        Ok(())
    }
}
