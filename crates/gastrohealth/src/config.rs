//! Configuration management for gastrohealth.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "gastrohealth";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "db.json";

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "GASTROHEALTH_";

/// Conventional environment variable for the Gemini key.
const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GASTROHEALTH_`, sections split on `__`)
/// 2. `GEMINI_API_KEY` for the model key
/// 3. TOML config file at `~/.config/gastrohealth/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Generative model configuration.
    pub ai: AiConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Largest accepted request body. Food photos arrive base64-encoded.
    pub body_limit_bytes: usize,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON database file.
    /// Defaults to `~/.local/share/gastrohealth/db.json`
    pub database_path: Option<PathBuf>,
}

/// Generative model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Language the model is asked to answer in.
    pub language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
            language: "Vietnamese".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(
                Env::raw()
                    .only(&[GEMINI_KEY_VAR])
                    .map(|_| "ai.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.server.body_limit_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "server.body_limit_bytes must be greater than 0".to_string(),
            });
        }

        if self.ai.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "ai.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.ai.model.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "ai.model must not be empty".to_string(),
            });
        }

        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://") {
            return Err(Error::ConfigValidation {
                message: format!("ai.base_url is not an http(s) URL: {}", self.ai.base_url),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::ConfigValidation {
                message: format!("invalid bind address: {e}"),
            })
    }

    /// Get the model request timeout as a Duration.
    #[must_use]
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai.timeout_secs)
    }

    /// Whether a model API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.ai
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
