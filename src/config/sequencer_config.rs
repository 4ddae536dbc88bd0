// ==========================================
// 酸奶产线排产系统 - 引擎配置
// ==========================================
// 职责: 机组规则表/风险权重/切换耗时/数量字段
// 红线: 配置为不可变值,构造组件时传入,无全局可变状态
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{MachineLine, QaDisposition, RiskBand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SequencerConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub classifier: ClassifierConfig,
    pub risk: RiskConfig,
    pub transition: TransitionConfig,
    pub compression: CompressionConfig,

    /// 按机组分区并行执行（结果与串行一致）
    pub parallel: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            risk: RiskConfig::default(),
            transition: TransitionConfig::default(),
            compression: CompressionConfig::default(),
            parallel: true,
        }
    }
}

impl SequencerConfig {
    /// 校验配置一致性
    pub fn validate(&self) -> ConfigResult<()> {
        self.risk.validate()?;
        self.transition.validate()?;
        self.compression.validate()?;
        Ok(())
    }
}

// ==========================================
// ClassifierConfig - 机组分配规则表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// 精确品名覆写表（品名 → 机组）,优先级最高
    pub overrides: BTreeMap<String, MachineLine>,

    pub bucket_pack_sizes_g: Vec<f64>,
    pub bucket_name_tokens: Vec<String>,

    pub granola_token: String,
    pub granola_prefix: String,

    pub m2_pack_sizes_g: Vec<f64>,
    pub m2_name_tokens: Vec<String>,

    pub m1_pack_sizes_g: Vec<f64>,
    pub m1_name_tokens: Vec<String>,

    /// 所有规则均未命中时的去向（M1 或 UNKNOWN）
    pub unmatched_machine: MachineLine,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::new(),
            bucket_pack_sizes_g: vec![2000.0, 5000.0, 10000.0],
            bucket_name_tokens: strings(&["2kg", "5kg", "10kg"]),
            granola_token: "granola".to_string(),
            granola_prefix: "ss ".to_string(),
            m2_pack_sizes_g: vec![450.0],
            m2_name_tokens: strings(&["450g"]),
            m1_pack_sizes_g: vec![150.0, 170.0, 175.0],
            m1_name_tokens: strings(&["150g", "170g", "175g"]),
            unmatched_machine: MachineLine::M1,
        }
    }
}

impl ClassifierConfig {
    /// 添加 M2 覆写品名
    pub fn with_m2_override(mut self, product_name: impl Into<String>) -> Self {
        self.overrides.insert(product_name.into(), MachineLine::M2);
        self
    }
}

// ==========================================
// RiskConfig - 风险评分权重
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    // ===== pH =====
    pub ph_expected: bool,
    pub ph_min: f64,
    pub ph_max: f64,
    pub ph_near_margin: f64,
    pub ph_missing_weight: f64,
    pub ph_out_of_range_weight: f64,
    pub ph_near_limit_weight: f64,

    // ===== 配方复杂度 =====
    pub complex_keywords: Vec<String>,
    pub complex_formulation_weight: f64,

    // ===== 包装规格 =====
    pub pack_min_g: f64,
    pub pack_max_g: f64,
    pub pack_missing_weight: f64,
    pub pack_out_of_range_weight: f64,

    // ===== 数据完整性 =====
    pub machine_unassigned_weight: f64,
    pub empty_name_weight: f64,

    // ===== 等级阈值 =====
    pub medium_band_from: f64,
    pub high_band_from: f64,
    /// 达到该分数即停线（高于 high_band_from）
    pub stop_line_from: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            ph_expected: true,
            ph_min: 3.6,
            ph_max: 4.9,
            ph_near_margin: 0.1,
            ph_missing_weight: 0.25,
            ph_out_of_range_weight: 1.2,
            ph_near_limit_weight: 0.35,
            complex_keywords: strings(&[
                "granola",
                "white chocolate",
                "white choc",
                "layered",
                "pieces",
                "bits",
                "top-hat",
                "tophat",
            ]),
            complex_formulation_weight: 0.40,
            pack_min_g: 80.0,
            pack_max_g: 12000.0,
            pack_missing_weight: 0.20,
            pack_out_of_range_weight: 0.20,
            machine_unassigned_weight: 0.15,
            empty_name_weight: 0.60,
            medium_band_from: 0.5,
            high_band_from: 1.0,
            stop_line_from: 2.0,
        }
    }
}

impl RiskConfig {
    /// 风险等级
    pub fn band(&self, score: f64) -> RiskBand {
        RiskBand::classify(score, self.medium_band_from, self.high_band_from)
    }

    /// 质检处置
    pub fn disposition(&self, score: f64) -> QaDisposition {
        QaDisposition::classify(score, self.band(score), self.stop_line_from)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.ph_min < self.ph_max) {
            return Err(ConfigError::invalid(
                "risk.ph_min",
                format!("pH 区间无效: [{}, {}]", self.ph_min, self.ph_max),
            ));
        }
        if !(self.pack_min_g < self.pack_max_g) {
            return Err(ConfigError::invalid(
                "risk.pack_min_g",
                format!("包装规格区间无效: [{}, {}]", self.pack_min_g, self.pack_max_g),
            ));
        }
        if !(self.medium_band_from <= self.high_band_from) {
            return Err(ConfigError::invalid(
                "risk.medium_band_from",
                format!(
                    "等级阈值倒置: medium={} high={}",
                    self.medium_band_from, self.high_band_from
                ),
            ));
        }
        if !(self.high_band_from <= self.stop_line_from) {
            return Err(ConfigError::invalid(
                "risk.stop_line_from",
                format!(
                    "停线阈值低于高风险阈值: high={} stop_line={}",
                    self.high_band_from, self.stop_line_from
                ),
            ));
        }
        let weights = [
            ("risk.ph_near_margin", self.ph_near_margin),
            ("risk.ph_missing_weight", self.ph_missing_weight),
            ("risk.ph_out_of_range_weight", self.ph_out_of_range_weight),
            ("risk.ph_near_limit_weight", self.ph_near_limit_weight),
            ("risk.complex_formulation_weight", self.complex_formulation_weight),
            ("risk.pack_missing_weight", self.pack_missing_weight),
            ("risk.pack_out_of_range_weight", self.pack_out_of_range_weight),
            ("risk.machine_unassigned_weight", self.machine_unassigned_weight),
            ("risk.empty_name_weight", self.empty_name_weight),
        ];
        check_non_negative(&weights)
    }
}

// ==========================================
// TransitionConfig - 切换耗时（分钟）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub product_change_minutes: f64,
    pub granola_line_change_minutes: f64,
    pub flavour_change_minutes: f64,
    pub plain_switch_minutes: f64,
    pub granola_switch_minutes: f64,
    pub nut_risk_switch_minutes: f64,
    pub chocolate_switch_minutes: f64,

    /// 换品即需清洗的产线
    pub granola_line: MachineLine,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            product_change_minutes: 10.0,
            granola_line_change_minutes: 25.0,
            flavour_change_minutes: 12.0,
            plain_switch_minutes: 8.0,
            granola_switch_minutes: 15.0,
            nut_risk_switch_minutes: 20.0,
            chocolate_switch_minutes: 20.0,
            granola_line: MachineLine::M3,
        }
    }
}

impl TransitionConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_non_negative(&[
            ("transition.product_change_minutes", self.product_change_minutes),
            ("transition.granola_line_change_minutes", self.granola_line_change_minutes),
            ("transition.flavour_change_minutes", self.flavour_change_minutes),
            ("transition.plain_switch_minutes", self.plain_switch_minutes),
            ("transition.granola_switch_minutes", self.granola_switch_minutes),
            ("transition.nut_risk_switch_minutes", self.nut_risk_switch_minutes),
            ("transition.chocolate_switch_minutes", self.chocolate_switch_minutes),
        ])
    }
}

// ==========================================
// CompressionConfig - 批次压缩
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// 需要透传并在批次内求和的数量字段
    pub quantity_fields: Vec<String>,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            quantity_fields: strings(&["packed_trays", "packed_kg"]),
        }
    }
}

impl CompressionConfig {
    fn validate(&self) -> ConfigResult<()> {
        for field in &self.quantity_fields {
            if field.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "compression.quantity_fields",
                    "数量字段名不能为空".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn check_non_negative(values: &[(&str, f64)]) -> ConfigResult<()> {
    for (key, value) in values {
        if !value.is_finite() || *value < 0.0 {
            return Err(ConfigError::invalid(key, format!("必须为非负有限数,实际 {}", value)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SequencerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.parallel);
        assert_eq!(config.classifier.unmatched_machine, MachineLine::M1);
        assert_eq!(config.transition.granola_line, MachineLine::M3);
    }

    #[test]
    fn test_stop_line_below_high_band_rejected() {
        let mut config = SequencerConfig::default();
        config.risk.stop_line_from = 0.8;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("risk.stop_line_from"));
    }

    #[test]
    fn test_inverted_ph_band_rejected() {
        let mut config = SequencerConfig::default();
        config.risk.ph_min = 5.0;
        config.risk.ph_max = 4.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("risk.ph_min"));
    }

    #[test]
    fn test_negative_minutes_rejected() {
        let mut config = SequencerConfig::default();
        config.transition.flavour_change_minutes = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transition.flavour_change_minutes"));
    }

    #[test]
    fn test_blank_quantity_field_rejected() {
        let mut config = SequencerConfig::default();
        config.compression.quantity_fields.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_m2_override_builder() {
        let classifier = ClassifierConfig::default().with_m2_override("C.SomeProduct 150g");
        assert_eq!(
            classifier.overrides.get("C.SomeProduct 150g"),
            Some(&MachineLine::M2)
        );
    }
}
