//! habitlog CLI - daily improvement, gratitude and habit tracker
//!
//! Records one entry per day and derives streak, reward and projection
//! statistics from the stored history.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use habitlog_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{entries, habits, init, maintenance, misc, settings, stats};
use crate::constants::env;
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(env::LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(error[idx + 1..].trim_start_matches("Hint:").trim())),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::Add(args)) => entries::handle_add(ctx, args)?,
        Some(Commands::Show(args)) => entries::handle_show(ctx, args)?,
        Some(Commands::List(args)) => entries::handle_list(ctx, args)?,
        Some(Commands::Delete(args)) => entries::handle_delete(ctx, args)?,
        Some(Commands::Habits(command)) => habits::handle_habits(ctx, command)?,
        Some(Commands::Settings(command)) => settings::handle_settings(ctx, command)?,
        Some(Commands::Stats(args)) => stats::handle_stats(ctx, args)?,
        Some(Commands::Export(args)) => entries::handle_export(ctx, args)?,
        Some(Commands::Import(args)) => entries::handle_import(ctx, args)?,
        Some(Commands::Check) => maintenance::handle_check(ctx)?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("habitlog v{}", VERSION);
            println!("\nQuickstart:");
            println!("  habitlog init");
            println!("  habitlog habits add \"Morning run\"");
            println!("  habitlog add --improve \"sleep earlier\" -g \"tea\"");
            println!("  habitlog stats");
            println!("\nRun `habitlog --help` for full usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        let (message, hint) = split_hint("No store\nHint: Run `habitlog init`.");
        assert_eq!(message, "No store");
        assert_eq!(hint, Some("Run `habitlog init`."));

        assert_eq!(split_hint("plain failure"), ("plain failure", None));
    }
}
