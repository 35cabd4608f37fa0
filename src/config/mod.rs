pub mod loader;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME, LOG_LEVEL_ENV_VAR, MODE_ENV_VAR};

use crate::errors::ConfigError;
use crate::infrastructure::container::Mode;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub delegation: DelegationConfig,
    pub logging: LoggingConfig,
}

/// `[delegation]` section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationConfig {
    /// Policy applied by single-parent containers built from this config
    pub mode: Mode,
}

impl LocatorConfig {
    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::TomlParse("<inline>".to_string(), e))
    }
}
