//! Configuration loader
//!
//! Loads [`RingBufferConfig`] from an optional `.env` file and environment
//! variables.

use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::{validate_capacity, RingBufferConfig, DEFAULT_CAPACITY, DEFAULT_KEY_PREFIX};
use crate::entry::LogLevel;

pub const ENV_KEY_PREFIX: &str = "RINGLOG_KEY_PREFIX";
pub const ENV_CAPACITY: &str = "RINGLOG_CAPACITY";
pub const ENV_MIN_LEVEL: &str = "RINGLOG_MIN_LEVEL";

/// Configuration loader
///
/// Values from the `.env` file are loaded into the process environment first,
/// then the configuration is read from the environment and validated.
///
/// # Example
///
/// ```ignore
/// use ringlog_core::config::ConfigLoader;
///
/// let config = ConfigLoader::new(Some(".env".into())).load()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Optional path to .env file
    env_file_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new ConfigLoader
    pub fn new(env_file_path: Option<PathBuf>) -> Self {
        Self { env_file_path }
    }

    /// Load and validate the ring buffer configuration.
    pub fn load(&self) -> Result<RingBufferConfig> {
        if let Some(path) = &self.env_file_path {
            self.load_env_file(path)?;
        }

        let config = RingBufferConfig::from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn load_env_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ConfigError::EnvFileLoad {
                path: path.to_path_buf(),
                source: dotenv::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )),
            });
        }

        dotenv::from_path(path).map_err(|e| ConfigError::EnvFileLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

impl RingBufferConfig {
    /// Build configuration from environment variables.
    ///
    /// Every variable is optional; unset variables take their defaults, but a
    /// variable that is set to an unparsable value is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_prefix = lookup(ENV_KEY_PREFIX).unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());

        let capacity = match lookup(ENV_CAPACITY) {
            Some(raw) => {
                let parsed = raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                    var: ENV_CAPACITY.to_string(),
                    value: raw.clone(),
                })?;
                validate_capacity(parsed)?
            }
            None => DEFAULT_CAPACITY,
        };

        let min_level = match lookup(ENV_MIN_LEVEL) {
            Some(raw) => raw.parse::<LogLevel>().map_err(|_| ConfigError::InvalidValue {
                var: ENV_MIN_LEVEL.to_string(),
                value: raw.clone(),
            })?,
            None => LogLevel::Trace,
        };

        Ok(Self {
            key_prefix,
            capacity,
            min_level,
        })
    }
}
