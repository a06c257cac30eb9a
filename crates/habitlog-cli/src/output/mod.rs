//! Output formatting helpers for the CLI.
//!
//! Entries store habit ids; everything shown to the user resolves them
//! against the current habit list first.

use habitlog_core::storage::{Entry, Habit, HabitRef, Settings};

use crate::app::AppContext;
use crate::ui::format::{format_datetime, format_day, single_line, truncate};
use crate::ui::{
    blank_line, header, hint, kv, print, simple_table, Column, OutputFormat, UiContext,
};

fn habit_ref_json(habit: &HabitRef<'_>) -> serde_json::Value {
    serde_json::json!({
        "id": habit.id(),
        "label": habit.label(),
        "known": !matches!(habit, HabitRef::Unknown(_)),
    })
}

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &Entry, settings: &Settings) -> serde_json::Value {
    let habits: Vec<serde_json::Value> = entry
        .completed_habits(settings)
        .iter()
        .map(habit_ref_json)
        .collect();
    serde_json::json!({
        "date": entry.date,
        "improve": entry.improve,
        "gratitude": entry.gratitude,
        "habits_completed": entry.habits_completed,
        "habits": habits,
        "bookkeeping": entry.bookkeeping,
        "habit_day": entry.is_habit_day(),
        "updated_at": entry.updated_at,
    })
}

/// Convert multiple entries to JSON array for output.
pub fn entries_json(entries: &[Entry], settings: &Settings) -> Vec<serde_json::Value> {
    entries
        .iter()
        .map(|entry| entry_json(entry, settings))
        .collect()
}

pub fn habit_json(habit: &Habit) -> serde_json::Value {
    serde_json::json!({
        "id": habit.id,
        "label": habit.label,
    })
}

/// Comma-separated labels of the habits completed on `entry`.
pub fn habit_labels(entry: &Entry, settings: &Settings) -> String {
    entry
        .completed_habits(settings)
        .iter()
        .map(|h| h.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a list of entries in the resolved output mode.
pub fn print_entry_list(
    entries: &[Entry],
    settings: &Settings,
    json: bool,
    format: Option<OutputFormat>,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(json, format);

    if ui_ctx.mode.is_json() {
        let output = serde_json::to_string_pretty(&entries_json(entries, settings))?;
        println!("{}", output);
        return Ok(());
    }

    if entries.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &hint(&ui_ctx, "No entries found."));
        }
        return Ok(());
    }

    let pretty = ui_ctx.mode.is_pretty();
    let improve_width = ui_ctx.width.saturating_sub(50).max(20);
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let habits = habit_labels(entry, settings);
            if pretty {
                vec![
                    format_day(entry.date, true),
                    truncate(&single_line(&entry.improve), improve_width),
                    if habits.is_empty() { "-".to_string() } else { habits },
                ]
            } else {
                vec![
                    format_day(entry.date, false),
                    format!("habit_day={}", entry.is_habit_day()),
                    single_line(&entry.improve),
                ]
            }
        })
        .collect();

    if pretty && !ctx.quiet() {
        print(
            &ui_ctx,
            &header(&ui_ctx, "list", Some(&format!("{} entries", entries.len()))),
        );
    }
    let columns = [Column::new("DATE"), Column::new("IMPROVE"), Column::new("HABITS")];
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

/// Print a single entry.
pub fn print_entry(entry: &Entry, settings: &Settings, ui_ctx: &UiContext, quiet: bool) {
    let pretty = ui_ctx.mode.is_pretty();
    if pretty && !quiet {
        print(ui_ctx, &header(ui_ctx, "show", None));
        blank_line(ui_ctx);
    }
    print(ui_ctx, &kv(ui_ctx, "Date", &format_day(entry.date, pretty)));
    print(ui_ctx, &kv(ui_ctx, "Improve", &single_line(&entry.improve)));
    print(ui_ctx, &kv(ui_ctx, "Gratitude", &entry.gratitude.join(", ")));
    let habits = habit_labels(entry, settings);
    print(
        ui_ctx,
        &kv(ui_ctx, "Habits", if habits.is_empty() { "-" } else { &habits }),
    );
    if let Some(updated_at) = entry.updated_at {
        print(ui_ctx, &kv(ui_ctx, "Updated", &format_datetime(&updated_at, pretty)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use habitlog_core::storage::{NewEntry, SavingsRatio, UNKNOWN_HABIT_LABEL};

    fn settings() -> Settings {
        Settings {
            savings_ratio: SavingsRatio::None,
            habits: vec![Habit::new("run", "Run")],
        }
    }

    fn entry(habits: &[&str]) -> Entry {
        NewEntry::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            "call mom",
            vec!["coffee".to_string()],
        )
        .with_habits(habits.iter().copied())
        .into_entry(Utc::now())
    }

    #[test]
    fn test_entry_json_resolves_habits() {
        let value = entry_json(&entry(&["run", "gone"]), &settings());
        assert_eq!(value["date"], "2024-03-04");
        assert_eq!(value["habit_day"], true);

        let habits = value["habits"].as_array().unwrap();
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[0]["label"], UNKNOWN_HABIT_LABEL);
        assert_eq!(habits[0]["known"], false);
        assert_eq!(habits[1]["label"], "Run");
    }

    #[test]
    fn test_habit_labels() {
        assert_eq!(habit_labels(&entry(&["run"]), &settings()), "Run");
        assert_eq!(habit_labels(&entry(&[]), &settings()), "");
    }
}
