//! Structured logging setup
//!
//! Installs one `tracing-subscriber` registry per process. `RUST_LOG` wins
//! when set; otherwise keystone logs at the configured level and everything
//! else at `error`.

use crate::primitives::*;
use std::sync::OnceLock;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Handle proving the global subscriber is installed
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

/// Filter used when `RUST_LOG` is absent
pub fn default_filter(level: LogLevel) -> String {
    format!("keystone={},error", level.as_filter())
}

impl Logger {
    /// Initialize the global logger
    pub fn init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        if GLOBAL_LOGGER.get().is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level)));

        let writer = match config.output {
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        };
        let layer = fmt::layer().with_writer(writer);
        let fmt_layer = match config.format {
            LogFormat::Text => layer.with_ansi(config.ansi).compact().boxed(),
            LogFormat::Json => layer.with_ansi(false).json().boxed(),
            LogFormat::Yaml => layer.with_ansi(config.ansi).pretty().boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggerError::InitializationFailed {
                reason: e.to_string(),
            })?;

        let logger = GLOBAL_LOGGER.get_or_init(|| Logger {
            config: config.clone(),
        });

        tracing::info!(
            level = ?config.level,
            format = ?config.format,
            output = ?config.output,
            ansi = config.ansi,
            "Logger initialized"
        );

        Ok(logger)
    }

    /// Get reference to the global logger instance
    pub fn global() -> Option<&'static Self> {
        GLOBAL_LOGGER.get()
    }

    /// Check if logger is initialized
    pub fn is_initialized() -> bool {
        GLOBAL_LOGGER.get().is_some()
    }

    /// Configuration the subscriber was built from
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
