use habitlog_core::storage::EntryFilter;
use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::errors::CliError;
use crate::helpers::parsing::parse_day;
use crate::output::entries_json;

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let mut filter = EntryFilter::new();
    if let Some(ref since) = args.since {
        filter = filter.since(parse_day(since, ctx.today()?)?);
    }

    let storage = ctx.open_storage()?;
    let entries = storage.list_entries(&filter)?;
    let settings = storage.settings()?;
    match args.format.as_str() {
        "json" => {
            let output = serde_json::to_string_pretty(&entries_json(&entries, &settings))?;
            println!("{}", output);
        }
        "jsonl" => {
            for value in entries_json(&entries, &settings) {
                println!("{}", serde_json::to_string(&value)?);
            }
        }
        other => {
            return Err(CliError::invalid_input(format!(
                "Unsupported export format: {} (use json or jsonl)",
                other
            ))
            .into());
        }
    }
    Ok(())
}
