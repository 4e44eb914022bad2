//! TUI configuration management.
//!
//! The console shares `~/.flowdesk/config.toml` with `flowdesk-core`; this
//! module only reads the sections that concern the terminal UI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// TUI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme preset: "dark" (default) or "light"
    #[serde(default = "default_preset")]
    pub preset: String,
}

fn default_preset() -> String {
    "dark".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { preset: default_preset() }
    }
}

impl TuiConfig {
    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".flowdesk").join("config.toml"))
    }

    /// Load configuration from `path`, or return default if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
