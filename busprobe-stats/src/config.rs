//! Monitor configuration loaded from files and the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading monitor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where to emit reports, as written in a configuration file.
///
/// ```toml
/// [[outputs]]
/// kind = "file"
/// path = "/var/run/busprobe/stats.yaml"
///
/// [[outputs]]
/// kind = "tcp"
/// addr = "localhost:9090"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputConfig {
    File { path: PathBuf },
    Tcp { addr: String },
    Stdout,
}

/// Settings for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Emission interval in milliseconds.
    pub interval_ms: u64,

    /// Maximum senders remembered per topic. Unbounded if unset.
    pub sender_capacity: Option<usize>,

    /// Topics to monitor from the start.
    pub topics: Vec<String>,

    /// Report destinations.
    pub outputs: Vec<OutputConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            sender_capacity: None,
            topics: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BUSPROBE";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl MonitorConfig {
    /// Load configuration from a file, with `BUSPROBE_*` environment
    /// variables taking precedence.
    ///
    /// The format is inferred from the file extension (TOML, YAML, JSON, ...).
    /// Environment keys are upper case, e.g. `BUSPROBE_INTERVAL_MS=500`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(Some(path), environment())
    }

    /// Load configuration from `BUSPROBE_*` environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_with(None, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading monitor configuration from {:?}", path);
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(env).build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: MonitorConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.sender_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "sender_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The emission interval.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
