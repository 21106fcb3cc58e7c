//! Application configuration.
//!
//! Configuration is stored in `<config dir>/config.yaml` and includes:
//! - The ticketing backend base URL
//! - The request timeout
//! - An optional default role, used by `view` when no session is stored

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::paths::config_path;
use crate::types::Role;

/// Backend used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8082";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "TICKETDESK_BASE_URL";

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &["base_url", "timeout", "default_role"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ticketing backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_role: Option<Role>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            default_role: None,
        }
    }
}

impl Config {
    /// Load configuration from the config directory, or the default if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        crate::utils::restrict_permissions(path)?;

        Ok(())
    }

    /// Base URL after applying the `TICKETDESK_BASE_URL` override
    pub fn effective_base_url(&self) -> String {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.base_url.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Read one key as display text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "timeout" => Ok(self.timeout.to_string()),
            "default_role" => Ok(self
                .default_role
                .map(|r| r.to_string())
                .unwrap_or_else(|| "(not set)".to_string())),
            other => Err(unknown_key(other)),
        }
    }

    /// Validate and set one key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                validate_base_url(value)?;
                self.base_url = value.trim().to_string();
            }
            "timeout" => {
                let seconds: u64 = value.trim().parse().map_err(|_| {
                    DeskError::Config(format!(
                        "timeout must be a whole number of seconds, got '{value}'"
                    ))
                })?;
                if seconds == 0 {
                    return Err(DeskError::Config(
                        "timeout must be at least 1 second".to_string(),
                    ));
                }
                self.timeout = seconds;
            }
            "default_role" => {
                self.default_role = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

/// Check that `value` is an absolute http(s) URL
pub fn validate_base_url(value: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(value.trim())
        .map_err(|e| DeskError::Config(format!("invalid base_url '{value}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DeskError::Config(format!(
            "invalid base_url '{value}': unsupported scheme '{scheme}'"
        ))),
    }
}
