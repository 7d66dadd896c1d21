//! Runtime configuration.
//!
//! Settings come from `config.toml` in the platform config directory (or an
//! explicit `--config` path), then `CONSOLE_ROUTER_*` environment variables,
//! then command-line flags:
//!
//! ```toml
//! catalog = "/path/to/console-services.yml"
//! endpoint = "http://127.0.0.1:8080/api"
//! region = "eu-west-1"
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_CATALOG: &str = "CONSOLE_ROUTER_CATALOG";
pub const ENV_ENDPOINT: &str = "CONSOLE_ROUTER_ENDPOINT";
pub const ENV_REGION: &str = "CONSOLE_ROUTER_REGION";
pub const ENV_TIMEOUT_SECS: &str = "CONSOLE_ROUTER_TIMEOUT_SECS";

pub const DEFAULT_CATALOG_FILE: &str = "console-services.yml";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Service catalog YAML.
    pub catalog: Option<PathBuf>,
    /// Gateway base URL for remote searchers. No endpoint means no session.
    pub endpoint: Option<String>,
    pub region: String,
    pub console_domain: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            console_domain: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Platform config file location, e.g. `~/.config/console-router/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "console-router")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from an explicit path (which must exist) or the default location
    /// (which may be absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply environment overrides; `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(catalog) = get(ENV_CATALOG) {
            self.catalog = Some(PathBuf::from(catalog));
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(region) = get(ENV_REGION) {
            self.region = region;
        }
        if let Some(domain) = get(crate::console::CONSOLE_DOMAIN_ENV) {
            self.console_domain = Some(domain);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
        }
        Ok(self)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
