// crates/rosi_config/src/error.rs

//! 配置层错误类型

use rosi_foundation::RosiError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 缺失配置
    #[error("缺失配置: {0}")]
    Missing(String),
}

impl ConfigError {
    /// 创建无效值错误
    pub fn invalid(key: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for RosiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => RosiError::io_with_source("读取配置失败", e),
            ConfigError::Parse(msg) => RosiError::config(msg),
            ConfigError::InvalidValue { key, value, reason } => {
                RosiError::invalid_config(key, value, reason)
            }
            ConfigError::Missing(key) => RosiError::missing_config(key),
        }
    }
}

/// 配置层结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("dt", -1.0, "必须为正");
        assert!(err.to_string().contains("dt"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_into_rosi_error() {
        let err: RosiError = ConfigError::Missing("soil.precipitation".into()).into();
        assert!(err.to_string().contains("soil.precipitation"));
    }
}
