//! Shared keystone types
//!
//! Component lifecycle states, logging settings and the errors raised while
//! configuring the platform.

use clap::ValueEnum;
use thiserror::Error;

pub mod component;
pub mod logging;

pub use component::*;
pub use logging::*;

/// Platform configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load environment file '{file}': {source}")]
    EnvFileError {
        file: String,
        source: dotenvy::Error,
    },

    #[error("Global configuration already initialized")]
    AlreadyInitialized,

    #[error("Failed to parse environment variables: {source}")]
    EnvironmentParsingFailed {
        #[from]
        source: envy::Error,
    },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to parse configuration value '{value}': {reason}")]
    ParseError { value: String, reason: String },
}

/// Logger initialization errors
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to initialize tracing subscriber: {reason}")]
    InitializationFailed { reason: String },

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Match `value` against the names and aliases of a `ValueEnum`, ignoring case
pub(crate) fn parse_value_enum<T: ValueEnum>(value: &str, reason: &str) -> Result<T, ConfigError> {
    T::from_str(value, true).map_err(|_| ConfigError::ParseError {
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
