//! Configuration data structures for gemconvert.
//!
//! This module defines the schema for the application settings, including
//! server parameters, Gemini API specifics, converter behavior and the
//! location of the persisted preference store.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Conversion orchestrator settings.
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Persisted user preference settings.
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads for the Tokio runtime.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Allow cross-origin requests so a browser front end on another origin
    /// can call the API.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Maximum accepted request body size in bytes.
    /// Default: `1048576` (1 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Settings for the upstream Gemini API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the public Generative Language API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key. Falls back to the `GEMINI_API_KEY` environment variable.
    /// Never written back out by `init-config`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// The Gemini model used for every request.
    /// Default: `gemini-1.5-pro`
    #[serde(default = "default_model")]
    pub model: String,

    /// Connection and request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Sampling temperature. Unset leaves the model default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Settings for the conversion orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Let concurrent identical requests share one upstream call.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub deduplicate_inflight: bool,
}

/// Settings for the persisted preference store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Path of the JSON preference file.
    /// Default: `~/.gemconvert/preferences.json`
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            enable_cors: true,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            model: default_model(),
            timeout_seconds: default_timeout(),
            temperature: None,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            deduplicate_inflight: true,
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_preferences_path() -> String {
    super::app_dir()
        .join("preferences.json")
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
