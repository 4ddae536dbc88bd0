// ==========================================
// 酸奶产线排产系统 - 引擎层
// ==========================================
// 职责: 实现排产规则引擎,不做文件读写
// 红线: 所有判定必须输出 reason
// ==========================================

pub mod annotator;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod risk;
pub mod run_compressor;
pub mod sequencer;
pub mod transition;

// 重导出核心引擎
pub use annotator::TransitionAnnotator;
pub use classifier::{Classification, ClassificationRule, MachineClassifier};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{MachinePlan, SequencingEngine, SequencingResult};
pub use risk::{RiskContribution, RiskRule, RiskScorer};
pub use run_compressor::RunCompressor;
pub use sequencer::{cleaning_burden, SequenceOptimizer};
pub use transition::{FiredTrigger, TransitionCost, TransitionCostModel, TransitionTrigger};
