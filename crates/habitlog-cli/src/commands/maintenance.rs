use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::ui::{badge, hint, print, Badge, OutputMode};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let ui_ctx = ctx.ui_context(false, None);

    match storage.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        for check in ["sqlite integrity", "metadata keys", "stored entries"] {
                            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, check));
                        }
                        println!();
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "All checks passed"));
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("check=sqlite_integrity ok");
                        println!("check=metadata_keys ok");
                        println!("check=stored_entries ok");
                        println!("status=ok");
                    }
                }
            }
            Ok(())
        }
        Err(err) => {
            if ui_ctx.mode.is_pretty() {
                print(
                    &ui_ctx,
                    &hint(&ui_ctx, "Export what still reads with `habitlog export` before repairing."),
                );
            } else {
                eprintln!("status=failed");
            }
            Err(CliError::IntegrityFailed(err.to_string()).into())
        }
    }
}
