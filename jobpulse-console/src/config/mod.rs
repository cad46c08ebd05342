//! Configuration management for the console
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `JOBPULSE_` prefix, `__` for nesting)
//! 2. The file passed on the command line, or `./jobpulse.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # jobpulse.toml
//! [server]
//! bind = "127.0.0.1:4200"
//! origin = "http://localhost:4200"
//!
//! [backend]
//! api_url = "http://localhost:8080/api"
//! request_timeout_secs = 30
//!
//! [storage]
//! data_dir = "/var/lib/jobpulse-console"
//!
//! [oauth2.google]
//! client_id = "1234.apps.googleusercontent.com"
//!
//! [oauth2.github]
//! client_id = "Iv1.abcdef"
//! require_state = true
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use jobpulse_console::config::ConsoleConfig;
//!
//! # fn example() -> Result<(), jobpulse_console::config::ConfigError> {
//! let config = ConsoleConfig::load(None)?;
//! let origin = config.origin_url()?;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::oauth2::OAuthConfig;

/// Config file read when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "jobpulse.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "JOBPULSE_";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address the console listens on
    pub bind: SocketAddr,

    /// Public origin of the console, as seen by the browser
    pub origin: String,

    /// Per-request timeout for console handlers in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 4200)),
            origin: "http://localhost:4200".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// JobPulse backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the REST API
    pub api_url: String,

    /// Timeout of a single backend request in seconds
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl BackendSettings {
    /// Timeout of a single backend request
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the durable store
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir().map_or_else(
                || PathBuf::from(".jobpulse-console"),
                |dir| dir.join("jobpulse-console"),
            ),
        }
    }
}

impl StorageSettings {
    /// Path of the durable store file
    #[must_use]
    pub fn durable_store_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

/// Complete console configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Backend settings
    #[serde(default)]
    pub backend: BackendSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// OAuth2 provider settings
    #[serde(default)]
    pub oauth2: OAuthConfig,
}

impl ConsoleConfig {
    /// Load and validate configuration
    ///
    /// `path` replaces the default `./jobpulse.toml`. A missing file is not an
    /// error; defaults and environment variables still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file contains invalid TOML
    /// - A value has the wrong type
    /// - Validation fails (see [`ConsoleConfig::validate`])
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Self = Self::figment(path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
    }

    /// Check values that would only fail later at runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or the API URL is not an absolute
    /// http(s) URL, or an OAuth2 provider has an empty client ID
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.origin_url()?;
        self.api_url()?;

        for (name, provider) in [
            ("oauth2.google", self.oauth2.google.as_ref()),
            ("oauth2.github", self.oauth2.github.as_ref()),
        ] {
            if provider.is_some_and(|p| p.client_id.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    field: name,
                    reason: "client_id must not be empty".to_string(),
                });
            }
        }

        for (field, secs) in [
            ("server.request_timeout_secs", self.server.request_timeout_secs),
            ("backend.request_timeout_secs", self.backend.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Public origin of the console
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not an absolute http(s) URL
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("server.origin", &self.server.origin)
    }

    /// Base URL of the backend REST API
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("backend.api_url", &self.backend.api_url)
    }
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })?;

    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Sources could not be read or merged
    #[error("Failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    /// A value failed validation
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
