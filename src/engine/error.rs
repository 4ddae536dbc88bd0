// ==========================================
// 酸奶产线排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 错误只作用于本次批次调用,不终止进程
// 红线: 无法归类/可选字段缺失不是错误
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 批次中存在无效记录,整批拒绝（避免静默丢行改变产线负荷）
    #[error("无效输入 (记录 {index}): {message}")]
    InvalidInput { index: usize, message: String },

    #[error("配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
