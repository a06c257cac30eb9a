use std::io::{self, Read};

use tracing::debug;

use habitlog_core::storage::{Entry, NewEntry, UpsertOutcome};
use habitlog_core::{HabitlogError, StorageEngine};

use crate::app::AppContext;
use crate::cli::ImportArgs;
use crate::errors::CliError;
use crate::ui::{print, receipt};

/// Parse exported or legacy entry documents: a JSON array, or one object per line.
///
/// Legacy documents (`habitsCompleted`, `bookkeeping`) are accepted as-is.
pub fn parse_entry_documents(text: &str) -> anyhow::Result<Vec<Entry>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| CliError::invalid_input(format!("Invalid JSON document: {}", e)).into());
    }

    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: Entry = serde_json::from_str(line).map_err(|e| {
            CliError::invalid_input(format!("Invalid entry on line {}: {}", idx + 1, e))
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn read_source(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(file).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::not_found(
            format!("Import file not found: {}", file),
            "Hint: Pass a file written by `habitlog export`, or `-` for stdin.",
        )
        .into(),
        _ => anyhow::anyhow!("Failed to read {}: {}", file, e),
    })
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let entries = parse_entry_documents(&read_source(&args.file)?)?;
    let mut storage = ctx.open_storage()?;

    let mut created = 0usize;
    let mut replaced = 0usize;
    for entry in entries {
        let date = entry.date;
        let new_entry = NewEntry::new(date, entry.improve, entry.gratitude)
            .with_habits(entry.habits_completed)
            .with_bookkeeping(entry.bookkeeping);
        // Nothing is persisted unless every document is accepted.
        match storage.upsert_entry(&new_entry) {
            Ok(UpsertOutcome::Created) => created += 1,
            Ok(UpsertOutcome::Updated) => replaced += 1,
            Err(HabitlogError::Validation(message)) => {
                return Err(CliError::invalid_input(format!("{}: {}", date, message)).into());
            }
            Err(e) => return Err(e.into()),
        }
    }
    storage.close()?;
    debug!(created, replaced, "entries imported");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Entries imported",
                &[
                    ("Created", &created.to_string()),
                    ("Replaced", &replaced.to_string()),
                ],
            ),
        );
    }
    Ok(())
}
