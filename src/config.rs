//! Server configuration — TOML file plus command-line overrides.
//!
//! ```toml
//! bind_address = "0.0.0.0"
//! port = 8080
//! throttle = 500          # messages/second per connection, 0 = unlimited
//! log_level = "DEBUG"
//! max_connections = 0     # 0 = unlimited
//! channel_capacity = 64
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{IndexError, Result};
use crate::logging::LogLevel;

/// Fixed listening port of the index.
pub const DEFAULT_PORT: u16 = 8080;

/// Ceiling for the per-connection rate limit, in messages/second.
pub const MAX_THROTTLE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub throttle: u32,
    /// Level name as written; resolved with [`Config::level`].
    pub log_level: String,
    pub max_connections: usize,
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            throttle: 0,
            log_level: LogLevel::Info.as_str().to_string(),
            max_connections: 0,
            channel_capacity: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            IndexError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(IndexError::Config(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.bind_address.trim().is_empty() {
            return Err(IndexError::Config("bind_address is empty".to_string()));
        }
        Ok(())
    }

    /// The configured log level, `Info` when the name is not a level.
    pub fn level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or_default()
    }

    /// The configured level name, if it names no level.
    pub fn unknown_log_level(&self) -> Option<&str> {
        match LogLevel::parse(&self.log_level) {
            Some(_) => None,
            None => Some(&self.log_level),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// The configured rate limit, clamped to `MAX_THROTTLE`.
    pub fn effective_throttle(&self) -> u32 {
        if self.throttle > MAX_THROTTLE {
            warn!(
                requested = self.throttle,
                max = MAX_THROTTLE,
                "throttle above maximum, clamping"
            );
            return MAX_THROTTLE;
        }
        self.throttle
    }
}
