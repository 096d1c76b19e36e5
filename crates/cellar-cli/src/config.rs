//! CLI configuration file handling.
//!
//! The config lives at `$CELLAR_CONFIG` if set, otherwise at
//! `$XDG_CONFIG_HOME/cellar/config.toml` (falling back to
//! `~/.config/cellar/config.toml`). A missing file yields the defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CellarConfig {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Default database path when --database is not given
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UiSection {
    /// Default output format for list views (table, plain)
    pub format: Option<String>,
}

/// Resolve the config file path.
pub fn config_path() -> PathBuf {
    if let Ok(value) = std::env::var("CELLAR_CONFIG") {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }

    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    config_home.join("cellar").join("config.toml")
}

impl CellarConfig {
    /// Load the config, returning defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Write the config to its resolved path, creating parent directories.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create config dir: {}", e))?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
        std::fs::write(&path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
        Ok(())
    }
}
