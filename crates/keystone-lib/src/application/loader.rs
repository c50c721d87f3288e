//! Configuration loading and global state management

use super::config::{ENV_PREFIX, PlatformConfig};
use super::env::EnvironmentConfig;
use crate::primitives::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

// Global configuration available throughout the application
static GLOBAL_CONFIG: OnceLock<PlatformConfig> = OnceLock::new();

/// Env files read from the config directory, lowest precedence first
const ENV_FILES: [&str; 2] = [".env", ".env.local"];

impl PlatformConfig {
    /// Load config from the current directory and process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), std::env::vars())
    }

    /// Load config: defaults -> `dir/.env` -> `dir/.env.local` -> `vars`
    ///
    /// Env files are read without touching the process environment.
    pub fn load_from<I>(dir: &Path, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged: HashMap<String, String> = HashMap::new();

        for file in ENV_FILES {
            let path = dir.join(file);
            match dotenvy::from_path_iter(&path) {
                Ok(entries) => {
                    for entry in entries {
                        let (key, value) = entry.map_err(|source| ConfigError::EnvFileError {
                            file: path.display().to_string(),
                            source,
                        })?;
                        merged.insert(key, value);
                    }
                    debug!(file = %path.display(), "Loaded env file");
                }
                Err(e) if e.not_found() => {}
                Err(source) => {
                    return Err(ConfigError::EnvFileError {
                        file: path.display().to_string(),
                        source,
                    });
                }
            }
        }

        merged.extend(vars);
        Self::from_env_iter(merged)
    }

    /// Build config from `(key, value)` pairs alone
    pub fn from_env_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        // 1. Defaults, overridden by KEYSTONE_* variables
        let mut config = PlatformConfig::default()
            .merge_with(envy::prefixed(ENV_PREFIX).from_iter(vars.iter().cloned())?);

        // 2. Standard colour variables
        let env_config = EnvironmentConfig::from_iter(vars)?;
        config.color = env_config.apply_color_config(config.color);

        // 3. Post-process and validate
        config.validate()?;

        Ok(config)
    }

    /// Initialize global configuration (call once at startup)
    pub fn init_global(config: PlatformConfig) -> Result<(), ConfigError> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// Global configuration, if initialized
    pub fn global() -> Option<&'static PlatformConfig> {
        GLOBAL_CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
