//! Standard colour environment variables
//!
//! `NO_COLOR`, `FORCE_COLOR`, `CLICOLOR` and `CI` adjust the colour setting
//! after the platform variables are read.

use crate::primitives::ConfigError;
use serde::Deserialize;

/// Outcome of the colour variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOverride {
    Enable,
    Disable,
    /// Keep the configured setting
    Unset,
}

/// Environment variables that affect colour output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// Any non-empty value disables colour
    pub no_color: Option<String>,
    pub force_color: Option<String>,
    pub clicolor: Option<String>,
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    /// Read from explicit `(key, value)` pairs
    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Colour decision of the standard variables alone
    ///
    /// `CI` always disables colour. A recognised `FORCE_COLOR` value beats
    /// `NO_COLOR` and `CLICOLOR=0`.
    pub fn color_override(&self) -> ColorOverride {
        if self.ci.is_some() {
            return ColorOverride::Disable;
        }

        match self.force_color.as_deref() {
            Some("1" | "2" | "3" | "true") => return ColorOverride::Enable,
            Some("0" | "false") => return ColorOverride::Disable,
            _ => {}
        }

        let no_color = self.no_color.as_deref().is_some_and(|v| !v.is_empty());
        if no_color || self.clicolor.as_deref() == Some("0") {
            ColorOverride::Disable
        } else {
            ColorOverride::Unset
        }
    }

    /// Configured colour setting after the standard variables
    pub fn apply_color_config(&self, color: bool) -> bool {
        match self.color_override() {
            ColorOverride::Enable => true,
            ColorOverride::Disable => false,
            ColorOverride::Unset => color,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
