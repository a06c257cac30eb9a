//! Output mode routing logic.

use std::str::FromStr;

use crate::errors::CliError;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain `key=value` text, stable for logs and scripts
    #[default]
    Plain,
    /// Human-friendly with colors and tables (TTY only)
    Pretty,
}

/// Value of a `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "table" => Ok(Self::Table),
            "plain" => Ok(Self::Plain),
            other => Err(CliError::invalid_input(format!(
                "Unsupported format: {} (use table or plain)",
                other
            ))),
        }
    }
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// `--json` wins over everything, then `--format plain`, then
    /// `TERM=dumb`. Pretty output needs a TTY.
    pub fn resolve(
        json_flag: bool,
        format: Option<OutputFormat>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if format == Some(OutputFormat::Plain) || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
