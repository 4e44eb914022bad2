//! Console configuration.
//!
//! Settings are resolved in layers: the optional TOML file
//! (`~/.flowdesk/config.toml`), then environment variables, then whatever
//! the caller overrides (usually command line flags).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Environment variable holding the backend base URL.
pub const ENV_BASE_URL: &str = "FLOWDESK_API_BASE_URL";
/// Environment variable holding the static bearer token.
pub const ENV_TOKEN: &str = "FLOWDESK_API_TOKEN";

/// Page sizes offered by paginated views.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];

/// Backend connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API (e.g. "https://automation.example.com/api")
    #[serde(default)]
    pub base_url: Option<String>,
    /// Static bearer token attached to every request
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiConfig {
    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.trim_end_matches('/').to_string()),
            _ => Err(ConsoleError::Config(format!(
                "no API base URL configured (set {} or [api].base_url)",
                ENV_BASE_URL
            ))),
        }
    }

    /// Returns the bearer token, empty when none is configured.
    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

/// Display settings for the console views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Initial page size of the executions view (default: 10)
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Characters of step output shown before a row is expanded (default: 300)
    #[serde(default = "default_output_preview_chars")]
    pub output_preview_chars: usize,
    /// Lower bound for resized columns, in cells (default: 6)
    #[serde(default = "default_min_column_width")]
    pub min_column_width: u16,
}

fn default_page_size() -> u32 {
    10
}

fn default_output_preview_chars() -> usize {
    300
}

fn default_min_column_width() -> u16 {
    6
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            output_preview_chars: default_output_preview_chars(),
            min_column_width: default_min_column_width(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl ConsoleConfig {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConsoleError::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".flowdesk").join("config.toml"))
    }

    /// Loads the file at `path`, or defaults when it does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ConsoleError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file (explicit path or the default one) and applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_file(&Self::default_path()?)?,
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides API settings from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = Some(url);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.api.token = Some(token);
        }
    }

    /// Applies explicit overrides (command line flags).
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if base_url.is_some() {
            self.api.base_url = base_url;
        }
        if token.is_some() {
            self.api.token = token;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if !PAGE_SIZES.contains(&self.ui.default_page_size) {
            return Err(ConsoleError::Config(format!(
                "ui.default_page_size must be one of {:?}, got {}",
                PAGE_SIZES, self.ui.default_page_size
            )));
        }
        if self.ui.min_column_width == 0 {
            return Err(ConsoleError::Config("ui.min_column_width must be positive".to_string()));
        }
        Ok(())
    }
}
