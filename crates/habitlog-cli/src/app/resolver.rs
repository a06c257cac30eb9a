//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, HabitlogConfig};
use crate::constants::env;
use crate::errors::CliError;

/// Resolve the config file path, checking HABITLOG_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG_PATH) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path from `--db` / HABITLOG_PATH, then the config.
pub fn resolve_store_path(
    db_flag: Option<&str>,
    config: Option<&HabitlogConfig>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = db_flag {
        return Ok(PathBuf::from(path));
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.store.path));
    }
    let config_path = resolve_config_path()?;
    Err(CliError::not_found(missing_config_message(&config_path), init_hint()).into())
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!("No habitlog store found at {}", path.display())
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No habitlog config found at {}", config_path.display())
}

pub fn init_hint() -> String {
    "Hint: Run `habitlog init`, or point to a store with --db / HABITLOG_PATH.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_flag_wins_over_config() {
        let config = HabitlogConfig::new(Path::new("/from/config.db"), None, None);
        let path = resolve_store_path(Some("/from/flag.db"), Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/from/flag.db"));
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let config = HabitlogConfig::new(Path::new("/from/config.db"), None, None);
        let path = resolve_store_path(None, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/from/config.db"));
    }
}
