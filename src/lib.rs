// ==========================================
// 酸奶产线排产系统 - 核心库
// ==========================================
// 流程: 导入 → 机组分配 → 风险评分 → 产线内排序 → 换产标注 → 批次压缩 → 导出
// 系统定位: 决策支持 (排产建议,人工最终确认)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 引擎配置
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 报表
pub mod exporter;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LineAction, MachineLine, QaDisposition, RiskBand};

// 领域实体
pub use domain::{Job, JobKey, MachineSummary, Run, ScoredJob, SequencedJob};

// 配置
pub use config::{ConfigManager, SequencerConfig};

// 引擎
pub use engine::{
    MachineClassifier, RiskScorer, RunCompressor, SequenceOptimizer, SequencingEngine,
    SequencingResult, TransitionAnnotator, TransitionCost, TransitionCostModel,
};

// 导入/导出
pub use exporter::{CsvReportWriter, OutputRow, RowFilter};
pub use importer::CsvJobReader;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "酸奶产线排产系统";
