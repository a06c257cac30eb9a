use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

use habitlog_core::storage::{SqliteStorage, StorageEngine};
use habitlog_core::VERSION;

use crate::app::{parse_timezone, resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, HabitlogConfig};
use crate::errors::CliError;
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, hint, print, Badge, OutputMode, UiContext};

/// Print a step indicator for the interactive flow.
fn print_step(ctx: &UiContext, step: usize, total: usize, title: &str) {
    if !ctx.mode.is_pretty() {
        return;
    }
    let progress = styled(&format!("{}/{}", step, total), styles::dim(), ctx.color);
    println!("{}  {}", progress, styled(title, styles::bold(), ctx.color));
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let effective_no_input = args.no_input || !interactive;
    let ui_ctx = ctx.ui_context(false, None);
    let theme = ColorfulTheme::default();

    if !ctx.quiet() && ui_ctx.mode.is_pretty() {
        let title = styled("habitlog", styles::bold(), ui_ctx.color);
        println!("{} \u{00B7} init", title);
        let version_line = format!("v{}", VERSION);
        println!("{}\n", styled(&version_line, styles::dim(), ui_ctx.color));
    }

    let default_store = default_store_path()?;
    let store_path = match args.path.clone().or_else(|| ctx.cli().db.clone()) {
        Some(value) => PathBuf::from(value),
        None if effective_no_input => default_store,
        None => {
            print_step(&ui_ctx, 1, 2, "Choose location");
            let input: String = Input::with_theme(&theme)
                .with_prompt("Store file location")
                .default(default_store.to_string_lossy().to_string())
                .interact_text()?;
            PathBuf::from(input)
        }
    };

    let timezone_input = match args.timezone.clone() {
        Some(value) => value,
        None if effective_no_input => String::new(),
        None => {
            print_step(&ui_ctx, 2, 2, "Timezone");
            Input::with_theme(&theme)
                .with_prompt("Timezone for \"today\" (IANA name, or auto)")
                .default("auto".to_string())
                .interact_text()?
        }
    };
    let timezone = parse_timezone(&timezone_input)?.map(|tz| tz.to_string());

    if store_path.exists() {
        return Err(CliError::invalid_input(format!(
            "A store already exists at {}",
            store_path.display()
        ))
        .into());
    }
    SqliteStorage::create(&store_path)?;
    info!(path = %store_path.display(), "store created");

    let config_path = resolve_config_path()?;
    let config = HabitlogConfig::new(&store_path, timezone, args.editor.clone());
    write_config(&config_path, &config)?;

    if !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => {
                println!();
                print(
                    &ui_ctx,
                    &badge(
                        &ui_ctx,
                        Badge::Ok,
                        &format!("Store created at {}", store_path.display()),
                    ),
                );
                print(
                    &ui_ctx,
                    &badge(
                        &ui_ctx,
                        Badge::Ok,
                        &format!("Config written to {}", config_path.display()),
                    ),
                );
                println!();
                print(
                    &ui_ctx,
                    &hint(
                        &ui_ctx,
                        "habitlog habits add <label>  \u{00B7}  habitlog add  \u{00B7}  habitlog stats",
                    ),
                );
            }
            OutputMode::Plain | OutputMode::Json => {
                println!("status=ok");
                println!("store_path={}", store_path.display());
                println!("config_path={}", config_path.display());
            }
        }
    }

    Ok(())
}
