use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{AppError, ConfigError};

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// JSON 格式
    Json,
    /// 紧凑格式
    #[default]
    Compact,
}

/// 日志配置（对应配置文件中的 `[logging]`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 过滤指令，如 `info` 或 `container_chain=trace`
    pub level: String,
    /// 输出格式
    pub format: LogFormat,
    /// 是否显示目标模块
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境配置：追踪每一次委托
    pub fn development() -> Self {
        Self {
            level: "container_chain=trace".to_string(),
            format: LogFormat::Pretty,
            show_target: true,
            show_thread_ids: true,
        }
    }

    /// 创建测试环境配置
    pub fn testing() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
        }
    }

    /// 解析过滤指令
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }
}

/// 初始化日志系统
///
/// 全局订阅者只能安装一次，重复调用返回 `AppError::Logging`。
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = config.env_filter()?;

    let installed = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Json | LogFormat::Compact => {
            // json 特性未启用，JSON 降级到紧凑格式
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(config.format != LogFormat::Json);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
    };
    installed.map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_creation() {
        let dev_config = LoggingConfig::development();
        assert_eq!(dev_config.format, LogFormat::Pretty);
        assert!(dev_config.show_thread_ids);

        let test_config = LoggingConfig::testing();
        assert_eq!(test_config.level, "error");
        assert_eq!(test_config.format, LogFormat::Compact);

        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_env_filter_validation() {
        assert!(LoggingConfig::development().env_filter().is_ok());

        let bad = LoggingConfig {
            level: "container_chain=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(bad.env_filter(), Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_init_logging_twice() {
        let config = LoggingConfig::testing();
        let first = init_logging(&config);
        let second = init_logging(&config);
        // 同一测试进程中可能已有其他测试安装过订阅者，但第二次一定失败
        assert!(first.is_ok() || matches!(first, Err(AppError::Logging(_))));
        assert!(matches!(second, Err(AppError::Logging(_))));
    }
}
