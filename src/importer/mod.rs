// ==========================================
// 酸奶产线排产系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成 Job 列表
// 支持: CSV（规范列名）
// ==========================================

pub mod derivation;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{columns, CsvJobReader};
