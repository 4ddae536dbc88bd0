// ==========================================
// 酸奶产线排产系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &str, message: String) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
