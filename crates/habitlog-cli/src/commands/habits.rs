//! Habit list management.
//!
//! Renaming or removing a habit never touches past entries; removed ids
//! keep counting as habit days and render as unknown.

use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::HabitsSubcommand;
use crate::errors::CliError;
use crate::helpers::input::confirm;
use crate::output::habit_json;
use crate::ui::{header, hint, print, receipt, table, Column, OutputMode};

pub fn handle_habits(ctx: &AppContext, command: &HabitsSubcommand) -> anyhow::Result<()> {
    match command {
        HabitsSubcommand::List { json } => handle_list(ctx, *json),
        HabitsSubcommand::Add { label } => handle_add(ctx, label),
        HabitsSubcommand::Rename { id, label } => handle_rename(ctx, id, label),
        HabitsSubcommand::Remove { id, yes } => handle_remove(ctx, id, *yes),
    }
}

fn handle_list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let settings = storage.settings()?;
    let ui_ctx = ctx.ui_context(json, None);

    if ui_ctx.mode.is_json() {
        let habits: Vec<serde_json::Value> = settings.habits.iter().map(habit_json).collect();
        println!("{}", serde_json::to_string_pretty(&habits)?);
        return Ok(());
    }

    if settings.habits.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &hint(&ui_ctx, "No habits yet. Add one with `habitlog habits add <label>`."));
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = settings
        .habits
        .iter()
        .map(|h| vec![h.id.clone(), h.label.clone()])
        .collect();
    if ui_ctx.mode == OutputMode::Pretty && !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "habits", None));
    }
    print(
        &ui_ctx,
        &table(&ui_ctx, &[Column::new("ID"), Column::new("LABEL")], &rows),
    );
    Ok(())
}

fn handle_add(ctx: &AppContext, label: &str) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let habit = storage.add_habit(label)?;
    storage.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Habit added", &[("ID", &habit.id), ("Label", &habit.label)]),
        );
    }
    Ok(())
}

fn handle_rename(ctx: &AppContext, id: &str, label: &str) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let habit = storage.rename_habit(id, label)?;
    storage.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Habit renamed", &[("ID", &habit.id), ("Label", &habit.label)]),
        );
    }
    Ok(())
}

fn handle_remove(ctx: &AppContext, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let label = match storage.settings()?.habit(id) {
        Some(habit) => habit.label.clone(),
        None => {
            return Err(CliError::not_found(
                format!("Habit not found: {}", id),
                "Hint: Run `habitlog habits list` to see habit ids.",
            )
            .into())
        }
    };

    let prompt = format!("Remove habit \"{}\"? Past entries keep their days.", label);
    if !confirm(&prompt, yes)? {
        return Err(anyhow::anyhow!("Cancelled"));
    }

    storage.remove_habit(id)?;
    storage.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Habit removed", &[("ID", id), ("Label", &label)]),
        );
    }
    Ok(())
}
