// ==========================================
// 酸奶产线排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、共享
// 存储: JSON 文件（缺失字段取默认值）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::sequencer_config::SequencerConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<SequencerConfig>,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: Arc::new(SequencerConfig::default()),
        }
    }

    /// 包装已有配置（会先校验）
    pub fn from_config(config: SequencerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// 从 JSON 文件加载配置
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(ConfigManager): 加载并校验成功
    /// - Err(ConfigError): 文件不存在/解析失败/校验失败
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载配置
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: SequencerConfig = serde_json::from_str(raw)?;
        debug!(
            overrides = config.classifier.overrides.len(),
            quantity_fields = config.compression.quantity_fields.len(),
            parallel = config.parallel,
            "配置解析完成"
        );
        Self::from_config(config)
    }

    /// 共享配置引用
    pub fn config(&self) -> Arc<SequencerConfig> {
        Arc::clone(&self.config)
    }

    /// 配置快照（JSON 格式）
    pub fn snapshot_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self.config.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MachineLine;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_json_uses_defaults() {
        let manager = ConfigManager::from_json_str(
            r#"{
                "classifier": {
                    "overrides": { "C.SomeProduct 150g": "M2" },
                    "unmatched_machine": "UNKNOWN"
                },
                "risk": { "ph_min": 3.8 }
            }"#,
        )
        .unwrap();
        let config = manager.config();

        assert_eq!(
            config.classifier.overrides.get("C.SomeProduct 150g"),
            Some(&MachineLine::M2)
        );
        assert_eq!(config.classifier.unmatched_machine, MachineLine::Unknown);
        assert_eq!(config.risk.ph_min, 3.8);
        assert_eq!(config.risk.ph_max, 4.9);
        assert_eq!(config.transition.product_change_minutes, 10.0);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = ConfigManager::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_applied_on_load() {
        let result = ConfigManager::from_json_str(r#"{ "risk": { "ph_min": 5.0, "ph_max": 4.0 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{ "parallel": false }}"#).unwrap();

        let manager = ConfigManager::from_file(temp_file.path()).unwrap();
        assert!(!manager.config().parallel);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigManager::from_file("non_existent_config.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let manager = ConfigManager::with_defaults();
        let json = manager.snapshot_json().unwrap();
        let reloaded = ConfigManager::from_json_str(&json).unwrap();
        assert_eq!(*reloaded.config(), *manager.config());
    }
}
