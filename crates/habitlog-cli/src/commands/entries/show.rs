use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::helpers::parsing::parse_day;
use crate::output::{entry_json, print_entry};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let today = ctx.today()?;
    let date = match args.date.as_deref() {
        Some(value) => parse_day(value, today)?,
        None => today,
    };

    let storage = ctx.open_storage()?;
    let entry = storage.get_entry(date)?.ok_or_else(|| {
        CliError::not_found(
            format!("No entry for {}", date),
            "Hint: Run `habitlog list --last 7d` to see recorded days.",
        )
    })?;
    let settings = storage.settings()?;

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry, &settings))?);
        return Ok(());
    }

    print_entry(&entry, &settings, &ui_ctx, ctx.quiet());
    Ok(())
}
