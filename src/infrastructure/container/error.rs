//! 容器错误类型

use thiserror::Error;

/// 容器查找 / 创建过程中的错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 整条委托链都无法解析该服务
    #[error("{}", not_found_message(.id, .suggestions))]
    NotFound {
        id: String,
        suggestions: Vec<String>,
    },
    /// 服务工厂执行失败
    #[error("Failed to create service \"{id}\": {reason}")]
    CreationFailed { id: String, reason: String },
    /// 类型转换失败
    #[error("Type cast failed for service \"{id}\": expected {expected}")]
    TypeCastFailed { id: String, expected: String },
}

impl ContainerError {
    /// 构造不带建议的 NotFound
    pub fn not_found(id: impl Into<String>) -> Self {
        ContainerError::NotFound {
            id: id.into(),
            suggestions: Vec::new(),
        }
    }

    /// NotFound 携带的候选服务名；其他错误返回空切片
    pub fn suggestions(&self) -> &[String] {
        match self {
            ContainerError::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound { .. })
    }
}

fn not_found_message(id: &str, suggestions: &[String]) -> String {
    let mut message = format!("You have requested a non-existent service \"{}\".", id);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean this: \"{}\"?", only)),
        many => {
            let quoted: Vec<String> = many.iter().map(|s| format!("\"{}\"", s)).collect();
            message.push_str(&format!(" Did you mean one of these: {}?", quoted.join(", ")));
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_without_suggestions() {
        let err = ContainerError::not_found("mailer");
        assert_eq!(
            err.to_string(),
            "You have requested a non-existent service \"mailer\"."
        );
        assert!(err.suggestions().is_empty());
    }

    #[test]
    fn test_not_found_display_with_suggestions() {
        let single = ContainerError::NotFound {
            id: "logr".to_string(),
            suggestions: vec!["logger".to_string()],
        };
        assert_eq!(
            single.to_string(),
            "You have requested a non-existent service \"logr\". Did you mean this: \"logger\"?"
        );

        let many = ContainerError::NotFound {
            id: "log".to_string(),
            suggestions: vec!["logger".to_string(), "log.file".to_string()],
        };
        assert!(many
            .to_string()
            .ends_with("Did you mean one of these: \"logger\", \"log.file\"?"));
    }

    #[test]
    fn test_other_errors_have_no_suggestions() {
        let err = ContainerError::CreationFailed {
            id: "db".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create service \"db\": connection refused"
        );
        assert!(err.suggestions().is_empty());
        assert!(!err.is_not_found());
    }
}
