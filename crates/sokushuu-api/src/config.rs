//! Configuration loading for the landing API.
//!
//! Settings come from an optional YAML file (`sokushuu-config.yaml` unless
//! `SOKUSHUU_CONFIG` points elsewhere) and are then overridden by
//! environment variables:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `API_HOST` / `API_PORT` | `server.host` / `server.port` |
//! | `KV_BACKEND` | `kv.backend` (`cloudflare`, `redis`, `memory`) |
//! | `CLOUDFLARE_ACCOUNT_ID` | `kv.account_id` |
//! | `KV_NAMESPACE_ID` | `kv.namespace_id` |
//! | `CLOUDFLARE_API_TOKEN` | `kv.api_token` |
//! | `KV_API_BASE_URL` | `kv.api_url` |
//! | `KV_TIMEOUT_MS` | `kv.timeout_ms` |
//! | `REDIS_URL` | `kv.redis_url` |
//! | `LOG_LEVEL` / `LOG_FORMAT` | `logging.level` / `logging.format` |

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sokushuu_kv::CloudflareConfig;
use sokushuu_kv::cloudflare::{DEFAULT_API_URL, DEFAULT_TIMEOUT, token_hint};

use crate::server::ServerConfig;

/// Config file used when `SOKUSHUU_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "sokushuu-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A setting has an unusable value.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Setting or variable name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A setting required by the selected backend is absent.
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level API configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Listen address.
    #[serde(default)]
    pub server: ServerConfig,

    /// KV store selection and credentials.
    #[serde(default)]
    pub kv: KvConfig,

    /// Log filter and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which KV store backs the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvBackend {
    /// Cloudflare Workers KV (production).
    #[default]
    Cloudflare,
    /// Redis or `Dragonfly`.
    Redis,
    /// In-process map, empty at startup.
    Memory,
}

impl FromStr for KvBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudflare" | "workers-kv" => Ok(Self::Cloudflare),
            "redis" | "dragonfly" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                name: "KV_BACKEND",
                reason: format!("unknown backend {other}"),
            }),
        }
    }
}

/// KV store settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KvConfig {
    /// Selected backend.
    pub backend: KvBackend,
    /// Cloudflare account identifier.
    pub account_id: Option<String>,
    /// Workers KV namespace identifier.
    pub namespace_id: Option<String>,
    /// Cloudflare API token.
    pub api_token: Option<String>,
    /// Cloudflare API base URL.
    pub api_url: String,
    /// Per-request timeout for KV calls, in milliseconds.
    pub timeout_ms: u64,
    /// Redis connection URL.
    pub redis_url: String,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            backend: KvBackend::default(),
            account_id: None,
            namespace_id: None,
            api_token: None,
            api_url: DEFAULT_API_URL.to_owned(),
            timeout_ms: u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
            redis_url: String::from("redis://localhost:6379"),
        }
    }
}

impl core::fmt::Debug for KvConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KvConfig")
            .field("backend", &self.backend)
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &self.api_token.as_deref().map(token_hint))
            .field("api_url", &self.api_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("redis_url", &self.redis_url)
            .finish()
    }
}

impl KvConfig {
    /// Workers KV client settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the account, namespace, or token
    /// is not set.
    pub fn cloudflare(&self) -> Result<CloudflareConfig, ConfigError> {
        let account_id = required(self.account_id.as_deref(), "CLOUDFLARE_ACCOUNT_ID")?;
        let namespace_id = required(self.namespace_id.as_deref(), "KV_NAMESPACE_ID")?;
        let api_token = required(self.api_token.as_deref(), "CLOUDFLARE_API_TOKEN")?;

        Ok(CloudflareConfig::new(account_id, namespace_id, api_token)
            .with_api_url(self.api_url.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms)))
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                reason: format!("unknown format {other}"),
            }),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the content is not valid YAML or does
    /// not match the expected structure.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
    /// [`ConfigError::Yaml`] if it cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load the config file named by `SOKUSHUU_CONFIG` (or the default
    /// path) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or any variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("SOKUSHUU_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override settings from a variable lookup such as the process
    /// environment. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("API_PORT") {
            self.server.port = parse_var("API_PORT", &port)?;
        }
        if let Some(backend) = get("KV_BACKEND") {
            self.kv.backend = backend.parse()?;
        }
        if let Some(account_id) = get("CLOUDFLARE_ACCOUNT_ID") {
            self.kv.account_id = Some(account_id);
        }
        if let Some(namespace_id) = get("KV_NAMESPACE_ID") {
            self.kv.namespace_id = Some(namespace_id);
        }
        if let Some(api_token) = get("CLOUDFLARE_API_TOKEN") {
            self.kv.api_token = Some(api_token);
        }
        if let Some(api_url) = get("KV_API_BASE_URL") {
            self.kv.api_url = api_url;
        }
        if let Some(timeout) = get("KV_TIMEOUT_MS") {
            self.kv.timeout_ms = parse_var("KV_TIMEOUT_MS", &timeout)?;
        }
        if let Some(redis_url) = get("REDIS_URL") {
            self.kv.redis_url = redis_url;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = get("LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
