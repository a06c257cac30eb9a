use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;
use crate::helpers::input::confirm;
use crate::helpers::parsing::parse_day;
use crate::ui::{print, receipt};

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let date = parse_day(&args.date, ctx.today()?)?;
    let mut storage = ctx.open_storage()?;

    if storage.get_entry(date)?.is_none() {
        return Err(CliError::not_found(
            format!("No entry for {}", date),
            "Hint: Run `habitlog list --last 7d` to see recorded days.",
        )
        .into());
    }
    if !confirm(&format!("Delete the entry for {}?", date), args.yes)? {
        return Err(anyhow::anyhow!("Cancelled"));
    }

    storage.delete_entry(date)?;
    storage.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let day = date.to_string();
        print(&ui_ctx, &receipt(&ui_ctx, "Entry deleted", &[("Date", &day)]));
    }
    Ok(())
}
