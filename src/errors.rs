use crate::infrastructure::container::ContainerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid delegation mode '{0}', expected 'standard_compliant' or 'act_as_master'")]
    InvalidMode(String),
    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_toml_error() -> toml::de::Error {
        toml::from_str::<toml::Value>("invalid_toml").err().unwrap()
    }

    #[test]
    fn test_config_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err_file_read = ConfigError::FileRead("locator.toml".to_string(), io_err);
        assert_eq!(
            format!("{}", err_file_read),
            "Failed to read file 'locator.toml': file not found"
        );

        let err_toml_parse = ConfigError::TomlParse("locator.toml".to_string(), mock_toml_error());
        assert!(format!("{}", err_toml_parse)
            .starts_with("Failed to parse TOML from file 'locator.toml': "));

        let err_mode = ConfigError::InvalidMode("master".to_string());
        assert_eq!(
            format!("{}", err_mode),
            "Invalid delegation mode 'master', expected 'standard_compliant' or 'act_as_master'"
        );
    }

    #[test]
    fn test_app_error_conversions() {
        let app: AppError = ConfigError::InvalidLogLevel("loud".to_string()).into();
        assert_eq!(
            format!("{}", app),
            "Configuration error: Invalid log level 'loud'"
        );

        let app: AppError = ContainerError::not_found("mailer").into();
        assert!(matches!(app, AppError::Container(ref e) if e.is_not_found()));
    }
}
