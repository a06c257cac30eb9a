use tracing::debug;

use habitlog_core::storage::{NewEntry, UpsertOutcome};
use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::input::{prompt_gratitude, prompt_habits, read_improve};
use crate::helpers::parsing::{gratitude_items, parse_day};
use crate::ui::format::format_day;
use crate::ui::{print, receipt};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let today = ctx.today()?;
    let date = match args.date.as_deref() {
        Some(value) => parse_day(value, today)?,
        None => today,
    };

    let mut storage = ctx.open_storage()?;
    let settings = storage.settings()?;
    let existing = storage.get_entry(date)?;
    let ui_ctx = ctx.ui_context(false, None);
    let interactive = !args.no_input && ui_ctx.is_interactive();

    let improve = read_improve(args.no_input, args.improve.clone(), ctx.editor()?)?;

    let mut gratitude = gratitude_items(&args.gratitude);
    if gratitude.is_empty() {
        if !interactive {
            return Err(CliError::invalid_input(
                "At least one --gratitude item is required",
            )
            .into());
        }
        gratitude = prompt_gratitude()?;
    }

    let habits = if !args.habit.is_empty() || !interactive {
        args.habit.clone()
    } else {
        let preselected: Vec<String> = existing
            .as_ref()
            .map(|e| e.habits_completed.iter().cloned().collect())
            .unwrap_or_default();
        prompt_habits(&settings.habits, &preselected)?
    };

    let entry = NewEntry::new(date, improve, gratitude).with_habits(habits);
    let outcome = storage.upsert_entry(&entry)?;
    storage.close()?;
    debug!(%date, ?outcome, "entry recorded");

    if !ctx.quiet() {
        let title = match outcome {
            UpsertOutcome::Created => "Entry recorded",
            UpsertOutcome::Updated => "Entry replaced",
        };
        let habit_count = entry.habits_completed.len().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                title,
                &[
                    ("Date", &format_day(date, ui_ctx.mode.is_pretty())),
                    ("Habits", &habit_count),
                ],
            ),
        );
    }
    Ok(())
}
