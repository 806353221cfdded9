//! Configuration for the Paydesk terminal client.
//!
//! Settings live in a small JSON file in the standard configuration directory
//! (`~/.config/paydesk/config.json` on most platforms). A missing file yields
//! the defaults; a malformed file is reported with a warning and also yields
//! the defaults so the terminal can still start.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "PAYDESK_CONFIG_PATH";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "PAYDESK_BASE_URL";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Backend used when neither the file, the environment nor a flag names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Error surfaced when reading or writing the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaydeskConfig {
    /// Backend base URL, e.g. `https://pay.example.org`.
    pub base_url: Option<String>,
    /// Symbol appended to rendered amounts.
    pub currency_symbol: String,
    /// How long a toast stays visible.
    pub toast_seconds: u64,
    /// How long the pay button shows success or failure.
    pub flash_millis: u64,
    /// Permit plain `http` for hosts other than loopback.
    pub allow_insecure_http: bool,
}

impl Default for PaydeskConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            currency_symbol: "€".to_string(),
            toast_seconds: 10,
            flash_millis: 2000,
            allow_insecure_http: false,
        }
    }
}

impl PaydeskConfig {
    /// Load from the default location (see [`default_config_path`]).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist or
    /// cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config");
                    Ok(config)
                }
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Resolve the backend URL: explicit override, then `PAYDESK_BASE_URL`,
    /// then the file, then [`DEFAULT_BASE_URL`].
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> String {
        let from_env = env::var(BASE_URL_ENV).ok();
        [override_url, from_env.as_deref(), self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Path of the config file: `PAYDESK_CONFIG_PATH` if set, else
/// `<config dir>/paydesk/config.json`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paydesk")
        .join(CONFIG_FILE_NAME)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if path == "~" {
        return home();
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(path),
    }
}
