// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{ConverterError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable consulted for the API key when the layered config
/// does not provide one.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_path())
    }

    /// Same as [`AppConfig::load`] with an explicit config file location.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::from(path.to_path_buf()).required(false))
            // Override with environment variables, e.g. GEMCONVERT_GEMINI__MODEL
            .add_source(
                Environment::with_prefix("GEMCONVERT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConverterError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| ConverterError::Config(e.to_string()))?;

        if app_config.gemini.api_key.as_deref().map_or(true, str::is_empty) {
            app_config.gemini.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(app_config)
    }

    /// Whether an API key was found in any source.
    pub fn has_api_key(&self) -> bool {
        self.gemini
            .api_key
            .as_deref()
            .map_or(false, |key| !key.trim().is_empty())
    }

    /// Render the configuration as TOML (the API key is never included).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConverterError::Config(e.to_string()))
    }

    pub fn default_config_path() -> PathBuf {
        app_dir().join("config.toml")
    }
}

/// Directory holding the config file and the preference store.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gemconvert")
}
