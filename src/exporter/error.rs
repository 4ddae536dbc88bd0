// ==========================================
// 酸奶产线排产系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    FileWriteError(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(#[from] csv::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
