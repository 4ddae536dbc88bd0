// ==========================================
// 酸奶产线排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读写,不含引擎规则
// ==========================================

pub mod job;
pub mod sequence;
pub mod types;

// 重导出核心类型
pub use job::{Job, JobKey, ScoredJob};
pub use sequence::{MachineSummary, Run, RunKey, SequencedJob};
pub use types::{LineAction, MachineLine, QaDisposition, RiskBand};
