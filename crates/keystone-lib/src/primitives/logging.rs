//! Logging knobs shared by the config loader and the logger

use super::{ConfigError, parse_value_enum};
use clap::ValueEnum;
use serde::Deserialize;
use std::str::FromStr;

/// Log verbosity, ordered from quietest to noisiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[value(aliases = ["err", "fatal", "critical"])]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warning,
    #[value(alias = "information")]
    Info,
    #[value(alias = "debugging")]
    Debug,
    #[value(aliases = ["tracing", "verbose"])]
    Trace,
}

impl LogLevel {
    /// Map the numeric `log_level` setting; anything above 4 is `Trace`
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4.. => LogLevel::Trace,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Whether a message at this level passes a logger set to `current_level`
    pub fn should_log(&self, current_level: LogLevel) -> bool {
        *self <= current_level
    }
}

/// Formatter used for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact single-line text
    #[value(aliases = ["txt", "plain"])]
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line, human oriented
    #[value(alias = "yml")]
    Yaml,
}

/// Stream the logger writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[value(alias = "err")]
    Stderr,
    #[value(alias = "out")]
    Stdout,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value_enum(s, "invalid log level")
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value_enum(s, "invalid log format")
    }
}

impl FromStr for LogOutput {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value_enum(s, "invalid log output stream")
    }
}

/// Everything `Logger::init` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// ANSI colour in text output
    pub ansi: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            ansi: false,
        }
    }
}
