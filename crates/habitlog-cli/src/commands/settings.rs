use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::SettingsSubcommand;
use crate::helpers::parsing::parse_savings_ratio;
use crate::ui::{header, kv, print, receipt};

pub fn handle_settings(ctx: &AppContext, command: &SettingsSubcommand) -> anyhow::Result<()> {
    match command {
        SettingsSubcommand::Show { json } => handle_show(ctx, *json),
        SettingsSubcommand::Savings { ratio } => handle_savings(ctx, ratio),
    }
}

fn handle_show(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let settings = storage.settings()?;
    let ui_ctx = ctx.ui_context(json, None);

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "settings", None));
    }
    print(
        &ui_ctx,
        &kv(&ui_ctx, "Savings ratio", &settings.savings_ratio.to_string()),
    );
    print(&ui_ctx, &kv(&ui_ctx, "Habits", &settings.habits.len().to_string()));
    Ok(())
}

fn handle_savings(ctx: &AppContext, value: &str) -> anyhow::Result<()> {
    let ratio = parse_savings_ratio(value)?;
    let mut storage = ctx.open_storage()?;
    storage.set_savings_ratio(ratio)?;
    storage.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Settings saved", &[("Savings ratio", &ratio.to_string())]),
        );
    }
    Ok(())
}
