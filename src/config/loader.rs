use std::{collections::HashMap, env, fs, path::PathBuf};

use super::LocatorConfig;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = "container-chain.toml";
/// Overrides `[delegation].mode`
pub const MODE_ENV_VAR: &str = "CONTAINER_CHAIN_MODE";
/// Overrides `[logging].level`
pub const LOG_LEVEL_ENV_VAR: &str = "CONTAINER_CHAIN_LOG";

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    env_override: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a loader that reads overrides from the process environment
    pub fn new() -> Self {
        Self { env_override: None }
    }

    /// Create a loader with a fixed environment (for testing)
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            env_override: Some(env),
        }
    }

    /// Load configuration from `path`, falling back to defaults when the file does not exist
    pub fn load(&self, path: &str) -> Result<LocatorConfig, ConfigError> {
        let path = Self::expand_path(path);

        let config: LocatorConfig = if path.exists() {
            let display = path.display().to_string();
            let content =
                fs::read_to_string(&path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
            toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            LocatorConfig::default()
        };

        self.apply_env_overrides(config, &self.collect_env_vars())
    }

    /// Expand a leading `~`
    fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).as_ref())
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        if let Some(env_map) = &self.env_override {
            return env_map.clone();
        }

        [MODE_ENV_VAR, LOG_LEVEL_ENV_VAR]
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect()
    }

    fn apply_env_overrides(
        &self,
        mut config: LocatorConfig,
        env_map: &HashMap<String, String>,
    ) -> Result<LocatorConfig, ConfigError> {
        if let Some(mode) = env_map.get(MODE_ENV_VAR) {
            config.delegation.mode = mode.parse()?;
            tracing::debug!(
                mode = %config.delegation.mode,
                "Delegation mode overridden from environment"
            );
        }
        if let Some(level) = env_map.get(LOG_LEVEL_ENV_VAR) {
            config.logging.level = level.clone();
        }
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::container::Mode;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = ConfigLoader::with_env(HashMap::new())
            .load(path.to_str().unwrap())
            .unwrap();

        assert_eq!(config, LocatorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[delegation]\nmode = \"standard_compliant\"").unwrap();

        let config = ConfigLoader::with_env(HashMap::new())
            .load(file.path().to_str().unwrap())
            .unwrap();

        assert_eq!(config.delegation.mode, Mode::StandardCompliant);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[delegation]\nmode = \"standard_compliant\"").unwrap();

        let config = ConfigLoader::with_env(env(&[
            (MODE_ENV_VAR, "act-as-master"),
            (LOG_LEVEL_ENV_VAR, "trace"),
        ]))
        .load(file.path().to_str().unwrap())
        .unwrap();

        assert_eq!(config.delegation.mode, Mode::ActAsMaster);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_invalid_env_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let err = ConfigLoader::with_env(env(&[(MODE_ENV_VAR, "whatever")]))
            .load(path.to_str().unwrap())
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidMode(ref v) if v == "whatever"));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[delegation").unwrap();

        let err = ConfigLoader::with_env(HashMap::new())
            .load(file.path().to_str().unwrap())
            .unwrap_err();

        assert!(matches!(err, ConfigError::TomlParse(..)));
    }
}
