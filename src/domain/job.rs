// ==========================================
// 酸奶产线排产系统 - 生产任务领域模型
// ==========================================
// 职责: 生产任务 (Job) 与评分后任务 (ScoredJob) 的数据定义
// 红线: 纯数据,不含规则逻辑
// 红线: 进入排序前 machine 必须已确定
// ==========================================

use crate::domain::types::{MachineLine, RiskBand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Job - 生产任务
// ==========================================
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // ===== 产品信息 =====
    pub product_name: String,        // 产品名称（必填）
    pub pack_size_g: Option<f64>,    // 包装规格（克，None=未知）
    pub flavour_label: String,       // 口味标签（空=未确定）

    // ===== 清洗相关特征 =====
    pub is_plain: bool,              // 原味
    pub is_granola: bool,            // 含燕麦脆
    pub has_chocolate: bool,         // 含巧克力
    pub has_nut_risk: bool,          // 坚果过敏原风险

    // ===== 质量 =====
    pub ph: Option<f64>,             // pH 值（None=缺失）

    // ===== 产线 =====
    pub machine: Option<MachineLine>, // None=尚未分配

    // ===== 数量字段（压缩时求和）=====
    #[serde(default)]
    pub quantities: BTreeMap<String, f64>,
}

impl Job {
    /// 以产品名创建任务,其余字段取默认值
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    /// 当前产线,未分配时视为 UNKNOWN
    pub fn machine_line(&self) -> MachineLine {
        self.machine.unwrap_or(MachineLine::Unknown)
    }

    /// 排序去重键 (product_name, flavour_label, pack_size_g)
    pub fn sequencing_key(&self) -> JobKey {
        JobKey {
            product_name: self.product_name.clone(),
            flavour_label: self.flavour_label.clone(),
            pack_size_bits: self.pack_size_g.map(f64::to_bits),
        }
    }

    /// 读取数量字段,缺失视为 0
    pub fn quantity(&self, field: &str) -> f64 {
        self.quantities.get(field).copied().unwrap_or(0.0)
    }
}

impl AsRef<Job> for Job {
    fn as_ref(&self) -> &Job {
        self
    }
}

// ==========================================
// JobKey - 同一 SKU 判定键
// ==========================================
// pack_size 以位模式比较,保证 Eq/Hash/Ord 确定
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub product_name: String,
    pub flavour_label: String,
    pub pack_size_bits: Option<u64>,
}

// ==========================================
// ScoredJob - 已评分任务
// ==========================================
// 生命周期: Risk Scorer 创建一次,之后只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: Job,
    pub risk_score: f64,          // 风险分（≥0,无上限）
    pub risk_reason: Vec<String>, // 触发原因（按规则顺序）
}

impl ScoredJob {
    /// 展示用原因文本
    pub fn risk_reason_text(&self) -> String {
        self.risk_reason.join("; ")
    }

    /// 风险等级
    pub fn risk_band(&self, medium_from: f64, high_from: f64) -> RiskBand {
        RiskBand::classify(self.risk_score, medium_from, high_from)
    }
}

impl AsRef<Job> for ScoredJob {
    fn as_ref(&self) -> &Job {
        &self.job
    }
}
