use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STORE_FILE;

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitlogConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl HabitlogConfig {
    pub fn new(store_path: &Path, timezone: Option<String>, editor: Option<String>) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            ui: UiSection { timezone, editor },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(DEFAULT_STORE_FILE))
}

pub fn read_config(path: &Path) -> anyhow::Result<HabitlogConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &HabitlogConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    habitlog_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("habitlog"));
        }
    }
    Ok(home_dir()?.join(".config").join("habitlog"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("habitlog"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("habitlog"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = HabitlogConfig::new(
            Path::new("/tmp/habitlog.db"),
            Some("Asia/Taipei".to_string()),
            None,
        );
        write_config(&path, &config).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[store]"));
        assert!(!contents.contains("editor"));

        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.store.path, "/tmp/habitlog.db");
        assert_eq!(loaded.ui.timezone.as_deref(), Some("Asia/Taipei"));
    }

    #[test]
    fn test_ui_section_is_optional() {
        let config: HabitlogConfig = toml::from_str("[store]\npath = \"/x.db\"\n").unwrap();
        assert!(config.ui.timezone.is_none());
        assert!(config.ui.editor.is_none());
    }
}
