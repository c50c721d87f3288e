//! Platform configuration
//!
//! Loaded with the precedence: defaults -> .env files -> `KEYSTONE_*`
//! environment variables -> validation (see [`super::loader`]).

use crate::primitives::*;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::str::FromStr;

/// Prefix of every platform environment variable
pub const ENV_PREFIX: &str = "KEYSTONE_";

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: u8 = 0; // Error-only logging by default
    pub const COLOR: bool = false;
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn log_level() -> u8 {
        defaults::LOG_LEVEL
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> bool {
        defaults::COLOR
    }
}

/// Parse through `FromStr` so enum aliases are honoured
fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

/// Platform configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlatformConfig {
    /// Component references added at start, in order (comma separated)
    #[serde(default)]
    pub components: Vec<String>,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[serde(default = "default_fns::log_format", deserialize_with = "from_str")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[serde(default = "default_fns::log_output", deserialize_with = "from_str")]
    pub log_output: LogOutput,

    /// ANSI colour in text logs
    #[serde(default = "default_fns::color")]
    pub color: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl PlatformConfig {
    /// Create LoggerConfig from PlatformConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: self.color && self.log_format != LogFormat::Json,
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if !other.components.is_empty() {
            self.components = other.components;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if other.color != default_fns::color() {
            self.color = other.color;
        }
        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for reference in self.components.iter_mut() {
            *reference = reference.trim().to_string();
        }

        if self.components.iter().any(String::is_empty) {
            return Err(ConfigError::ValidationFailed {
                reason: "empty component reference".to_string(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.components.iter().find(|r| !seen.insert(r.as_str())) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("component reference {duplicate} listed twice"),
            });
        }

        Ok(())
    }
}
