//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for the Signal connector (`SIGNAL_SERVICE_URL`,
//! `SIGNAL_NUMBER`). A missing config file falls back to defaults so the
//! REPL works out of the box.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Points granted to every account on first contact.
pub const DEFAULT_STARTING_BALANCE: u64 = 1000;

/// Longest accepted outcome display string.
pub const DEFAULT_MAX_OUTCOME_LEN: usize = 40;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Betting-engine tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Balance granted to new accounts.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,
    /// Maximum length of one outcome display string.
    #[serde(default = "default_max_outcome_len")]
    pub max_outcome_len: usize,
}

const fn default_starting_balance() -> u64 {
    DEFAULT_STARTING_BALANCE
}

const fn default_max_outcome_len() -> usize {
    DEFAULT_MAX_OUTCOME_LEN
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Path to the JSON snapshot file.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookie")
        .join("state.json")
}

/// signal-cli-rest-api connector settings.
///
/// `service_url` and `phone_number` can be overridden with the
/// `SIGNAL_SERVICE_URL` and `SIGNAL_NUMBER` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    #[serde(default = "default_signal_url")]
    pub service_url: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Long-poll timeout for the receive endpoint, in seconds.
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
}

fn default_signal_url() -> String {
    "http://localhost:8080".into()
}

const fn default_poll_seconds() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            max_outcome_len: default_max_outcome_len(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            service_url: default_signal_url(),
            phone_number: None,
            poll_seconds: default_poll_seconds(),
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

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            state: StateConfig::default(),
            signal: SignalConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env();
            Ok(config)
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SIGNAL_SERVICE_URL") {
            self.signal.service_url = url;
        }
        if let Ok(number) = std::env::var("SIGNAL_NUMBER") {
            self.signal.phone_number = Some(number);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.signal.service_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "signal.service_url",
            }
            .into());
        }
        if self.engine.starting_balance == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.starting_balance",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.engine.max_outcome_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_outcome_len",
                reason: "must be positive".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
