//! Host configuration: TOML file, environment overrides, defaults.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use whisker_tictactoe::{MISTAKE_CHANCE, MovePolicy};

/// Environment variable overriding `mistake_chance`.
pub const MISTAKE_CHANCE_ENV: &str = "WHISKER_MISTAKE_CHANCE";

/// Environment variable overriding `report_url`.
pub const REPORT_URL_ENV: &str = "WHISKER_REPORT_URL";

/// Settings for the game host.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Chance in `[0, 1]` that the computer deliberately plays a weaker move.
    #[serde(default = "default_mistake_chance")]
    mistake_chance: f64,

    /// Pause before the computer's reply becomes visible, in milliseconds.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// Where finished matches are POSTed. Results are only logged when unset.
    #[serde(default)]
    report_url: Option<String>,

    /// Address the REST server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the REST server binds to.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_mistake_chance() -> f64 {
    MISTAKE_CHANCE
}

fn default_computer_delay_ms() -> u64 {
    500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mistake_chance: default_mistake_chance(),
            computer_delay_ms: default_computer_delay_ms(),
            report_url: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(mistake_chance = config.mistake_chance, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise defaults, then applies environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup (the process environment in production).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MISTAKE_CHANCE_ENV) {
            self.mistake_chance = raw.trim().parse().map_err(|e| {
                ConfigError::new(format!("{} is not a number ({}): {}", MISTAKE_CHANCE_ENV, raw, e))
            })?;
            debug!(mistake_chance = self.mistake_chance, "Mistake chance from environment");
        }
        if let Some(url) = lookup(REPORT_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.report_url = Some(url);
        }
        self.validate()?;
        Ok(self)
    }

    /// Replaces the mistake chance (from a CLI flag).
    pub fn with_mistake_chance(mut self, mistake_chance: f64) -> Result<Self, ConfigError> {
        self.mistake_chance = mistake_chance;
        self.validate()?;
        Ok(self)
    }

    /// Replaces the bind address.
    pub fn with_address(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Replaces the computer delay.
    pub fn with_computer_delay_ms(mut self, computer_delay_ms: u64) -> Self {
        self.computer_delay_ms = computer_delay_ms;
        self
    }

    /// Move policy for these settings.
    pub fn policy(&self) -> MovePolicy {
        MovePolicy::new(self.mistake_chance)
    }

    /// Cosmetic delay before the computer's move is applied.
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.mistake_chance) {
            return Err(ConfigError::new(format!(
                "mistake_chance must be within [0, 1], got {}",
                self.mistake_chance
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
