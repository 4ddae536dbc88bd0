// ==========================================
// 酸奶产线排产系统 - 配置层
// ==========================================
// 职责: 引擎配置定义、加载与校验
// 存储: JSON 文件 / 内存默认值
// ==========================================

pub mod config_manager;
pub mod error;
pub mod sequencer_config;

// 重导出核心配置类型
pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use sequencer_config::{
    ClassifierConfig, CompressionConfig, RiskConfig, SequencerConfig, TransitionConfig,
};
