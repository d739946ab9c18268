//! Configuration System
//!
//! Layered settings for the registry, the dispatcher and logging. Values come
//! from built-in defaults, the global config file, an optional explicit file
//! and `STRATA__*` environment variables, in increasing priority.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registration-phase settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject layers whose signature differs from the method's
    #[serde(default = "default_true")]
    pub strict_signatures: bool,

    /// Seal the registry once configuration-driven setup finishes
    #[serde(default)]
    pub seal_after_setup: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_signatures: default_true(),
            seal_after_setup: false,
        }
    }
}

/// Dispatch settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Emit a trace event for every layer invocation
    #[serde(default)]
    pub trace_layers: bool,
}

fn default_true() -> bool {
    true
}

impl StrataConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' (must be one of {})",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }
        if self.logging.format != "json" && self.logging.format != "text" {
            return Err(ConfigError::Invalid(format!(
                "logging.format '{}' (must be 'json' or 'text')",
                self.logging.format
            )));
        }
        const OUTPUTS: [&str; 4] = ["stdout", "stderr", "file", "both"];
        if !OUTPUTS.contains(&self.logging.output.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.output '{}' (must be one of {})",
                self.logging.output,
                OUTPUTS.join(", ")
            )));
        }
        Ok(())
    }
}
