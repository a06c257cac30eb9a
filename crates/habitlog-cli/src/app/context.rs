//! Application context for the habitlog CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use once_cell::unsync::OnceCell;
use tracing::debug;

use habitlog_core::storage::{SqliteStorage, StorageEngine};
use habitlog_core::HabitlogError;

use crate::cli::Cli;
use crate::config::{read_config, HabitlogConfig};
use crate::errors::CliError;
use crate::ui::{OutputFormat, UiContext};

use super::clock::{parse_timezone, resolve_now};
use super::resolver::{init_hint, missing_store_message, resolve_config_path, resolve_store_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<HabitlogConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, loaded on first use. `None` when it does not exist.
    pub fn config(&self) -> anyhow::Result<Option<&HabitlogConfig>> {
        self.config
            .get_or_try_init(|| -> anyhow::Result<Option<HabitlogConfig>> {
                let path = resolve_config_path()?;
                if !path.exists() {
                    debug!(path = %path.display(), "no config file");
                    return Ok(None);
                }
                read_config(&path).map(Some)
            })
            .map(Option::as_ref)
    }

    /// Configured editor override, if any.
    pub fn editor(&self) -> anyhow::Result<Option<&str>> {
        Ok(self
            .config()?
            .and_then(|config| config.ui.editor.as_deref()))
    }

    /// Configured timezone; `None` means system local time.
    pub fn timezone(&self) -> anyhow::Result<Option<Tz>> {
        match self.config()?.and_then(|c| c.ui.timezone.as_deref()) {
            Some(name) => parse_timezone(name),
            None => Ok(None),
        }
    }

    /// Local "now" for statistics, honoring a `--now` override.
    pub fn now(&self, override_value: Option<&str>) -> anyhow::Result<NaiveDateTime> {
        resolve_now(override_value, self.timezone()?)
    }

    pub fn today(&self) -> anyhow::Result<NaiveDate> {
        Ok(self.now(None)?.date())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli.db.as_deref(), self.config()?)
    }

    /// Open the store, turning a missing file into an actionable error.
    pub fn open_storage(&self) -> anyhow::Result<SqliteStorage> {
        let path = self.store_path()?;
        match SqliteStorage::open(&path) {
            Ok(storage) => Ok(storage),
            Err(HabitlogError::StoreNotFound) => {
                Err(CliError::not_found(missing_store_message(&path), init_hint()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// UI context for this invocation.
    pub fn ui_context(&self, json: bool, format: Option<OutputFormat>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }
}
