// ==========================================
// 酸奶产线排产系统 - 输出行
// ==========================================
// 职责: 将 SequencedJob / Run 展平为统一表格行
// 列顺序: FIXED_COLUMNS + 配置的数量列
// ==========================================

use crate::config::RiskConfig;
use crate::domain::sequence::{Run, SequencedJob};
use crate::domain::types::{LineAction, MachineLine, QaDisposition, RiskBand};
use serde::Serialize;
use std::collections::BTreeMap;

/// 固定列（数量列追加在后）
pub const FIXED_COLUMNS: &[&str] = &[
    "machine",
    "sequence_rank",
    "first_rank",
    "last_rank",
    "job_count",
    "product_name",
    "pack_size_g",
    "flavour_label",
    "is_plain",
    "is_granola",
    "has_chocolate",
    "has_nut_risk",
    "ph",
    "action",
    "qa_action",
    "changeover_required",
    "changeover_reason",
    "washdown_required",
    "washdown_reason",
    "downtime_minutes",
    "risk_score",
    "risk_band",
    "risk_reason",
];

// ==========================================
// OutputRow - 展示行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub machine: MachineLine,
    pub sequence_rank: u32,
    pub first_rank: u32,
    pub last_rank: u32,
    pub job_count: usize,

    pub product_name: String,
    pub pack_size_g: Option<f64>,
    pub flavour_label: String,
    pub is_plain: bool,
    pub is_granola: bool,
    pub has_chocolate: bool,
    pub has_nut_risk: bool,
    pub ph: Option<f64>,

    pub action: LineAction,
    pub qa_action: QaDisposition,
    pub changeover_required: bool,
    pub changeover_reason: String,
    pub washdown_required: bool,
    pub washdown_reason: String,
    pub downtime_minutes: f64,

    pub risk_score: f64,
    pub risk_band: RiskBand,
    pub risk_reason: String,

    pub quantities: BTreeMap<String, f64>,
}

impl OutputRow {
    /// 单个任务行
    pub fn from_sequenced(job: &SequencedJob, risk: &RiskConfig) -> Self {
        let base = job.job();
        Self {
            machine: job.machine(),
            sequence_rank: job.sequence_rank,
            first_rank: job.sequence_rank,
            last_rank: job.sequence_rank,
            job_count: 1,
            product_name: base.product_name.clone(),
            pack_size_g: base.pack_size_g,
            flavour_label: base.flavour_label.clone(),
            is_plain: base.is_plain,
            is_granola: base.is_granola,
            has_chocolate: base.has_chocolate,
            has_nut_risk: base.has_nut_risk,
            ph: base.ph,
            action: job.action(),
            qa_action: risk.disposition(job.scored.risk_score),
            changeover_required: job.changeover_required,
            changeover_reason: job.changeover_reason.clone(),
            washdown_required: job.washdown_required,
            washdown_reason: job.washdown_reason.clone(),
            downtime_minutes: job.downtime_minutes,
            risk_score: job.scored.risk_score,
            risk_band: risk.band(job.scored.risk_score),
            risk_reason: job.scored.risk_reason_text(),
            quantities: base.quantities.clone(),
        }
    }

    /// 批次行（代表字段取首个成员）
    pub fn from_run(run: &Run, risk: &RiskConfig) -> Self {
        let base = &run.representative;
        Self {
            machine: run.machine,
            sequence_rank: run.run_rank,
            first_rank: run.first_rank,
            last_rank: run.last_rank,
            job_count: run.job_count,
            product_name: base.product_name.clone(),
            pack_size_g: base.pack_size_g,
            flavour_label: base.flavour_label.clone(),
            is_plain: base.is_plain,
            is_granola: base.is_granola,
            has_chocolate: base.has_chocolate,
            has_nut_risk: base.has_nut_risk,
            ph: base.ph,
            action: run.action(),
            qa_action: risk.disposition(run.risk_score),
            changeover_required: run.changeover_required,
            changeover_reason: run.changeover_reason.clone(),
            washdown_required: run.washdown_required,
            washdown_reason: run.washdown_reason.clone(),
            downtime_minutes: run.downtime_minutes,
            risk_score: run.risk_score,
            risk_band: risk.band(run.risk_score),
            risk_reason: run.risk_reason_text(),
            quantities: run.quantities.clone(),
        }
    }

    /// 转为 CSV 记录（缺失数量写 0）
    pub fn to_record(&self, quantity_fields: &[String]) -> Vec<String> {
        let mut record = vec![
            self.machine.to_string(),
            self.sequence_rank.to_string(),
            self.first_rank.to_string(),
            self.last_rank.to_string(),
            self.job_count.to_string(),
            self.product_name.clone(),
            optional_number(self.pack_size_g),
            self.flavour_label.clone(),
            self.is_plain.to_string(),
            self.is_granola.to_string(),
            self.has_chocolate.to_string(),
            self.has_nut_risk.to_string(),
            optional_number(self.ph),
            self.action.label().to_string(),
            self.qa_action.label().to_string(),
            self.changeover_required.to_string(),
            self.changeover_reason.clone(),
            self.washdown_required.to_string(),
            self.washdown_reason.clone(),
            self.downtime_minutes.to_string(),
            format!("{:.2}", self.risk_score),
            self.risk_band.to_string(),
            self.risk_reason.clone(),
        ];
        record.extend(
            quantity_fields
                .iter()
                .map(|f| self.quantities.get(f).copied().unwrap_or(0.0).to_string()),
        );
        record
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
