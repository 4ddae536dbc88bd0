// ==========================================
// 酸奶产线排产系统 - 排序结果领域模型
// ==========================================
// 职责: 排序后任务 (SequencedJob) 与连续批次 (Run) 的数据定义
// 红线: 每个分区首个任务 changeover_required = false
// 红线: Run 只由压缩器派生,序列变化后整体重算
// ==========================================

use crate::domain::job::{Job, JobKey, ScoredJob};
use crate::domain::types::{LineAction, MachineLine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SequencedJob - 排序后任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedJob {
    #[serde(flatten)]
    pub scored: ScoredJob,

    // ===== 排序位置 =====
    pub sequence_rank: u32, // 分区内序号（从1开始）

    // ===== 换产/清洗判定 =====
    pub changeover_required: bool,
    pub changeover_reason: String,
    pub washdown_required: bool,
    pub washdown_reason: String,
    pub downtime_minutes: f64, // 进入本任务的切换耗时（首个为0）
}

impl SequencedJob {
    pub fn job(&self) -> &Job {
        &self.scored.job
    }

    pub fn machine(&self) -> MachineLine {
        self.scored.job.machine_line()
    }

    /// 连续批次判定键 (machine, product_name, pack_size_g, flavour_label)
    pub fn run_key(&self) -> RunKey {
        RunKey {
            machine: self.machine(),
            job_key: self.scored.job.sequencing_key(),
        }
    }

    pub fn action(&self) -> LineAction {
        LineAction::from_flags(self.washdown_required, self.changeover_required)
    }
}

impl AsRef<Job> for SequencedJob {
    fn as_ref(&self) -> &Job {
        &self.scored.job
    }
}

// ==========================================
// RunKey - 连续批次键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunKey {
    pub machine: MachineLine,
    pub job_key: JobKey,
}

// ==========================================
// Run - 连续相同任务合并后的批次
// ==========================================
// 代表字段取首个成员; 数量字段为成员求和; 风险取最大值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub machine: MachineLine,
    pub run_rank: u32,     // 分区内批次序号（从1开始）
    pub first_rank: u32,   // 成员原始序号范围
    pub last_rank: u32,
    pub job_count: usize,

    pub representative: Job,              // 首个成员
    pub quantities: BTreeMap<String, f64>, // 成员数量求和

    pub risk_score: f64,
    pub risk_reason: Vec<String>,

    pub changeover_required: bool,
    pub changeover_reason: String,
    pub washdown_required: bool,
    pub washdown_reason: String,
    pub downtime_minutes: f64,
}

impl Run {
    /// 由单个排序任务构造单成员批次
    pub fn from_sequenced(job: &SequencedJob) -> Self {
        Self {
            machine: job.machine(),
            run_rank: job.sequence_rank,
            first_rank: job.sequence_rank,
            last_rank: job.sequence_rank,
            job_count: 1,
            representative: job.scored.job.clone(),
            quantities: job.scored.job.quantities.clone(),
            risk_score: job.scored.risk_score,
            risk_reason: job.scored.risk_reason.clone(),
            changeover_required: job.changeover_required,
            changeover_reason: job.changeover_reason.clone(),
            washdown_required: job.washdown_required,
            washdown_reason: job.washdown_reason.clone(),
            downtime_minutes: job.downtime_minutes,
        }
    }

    pub fn key(&self) -> RunKey {
        RunKey {
            machine: self.machine,
            job_key: self.representative.sequencing_key(),
        }
    }

    pub fn quantity(&self, field: &str) -> f64 {
        self.quantities.get(field).copied().unwrap_or(0.0)
    }

    pub fn risk_reason_text(&self) -> String {
        self.risk_reason.join("; ")
    }

    pub fn action(&self) -> LineAction {
        LineAction::from_flags(self.washdown_required, self.changeover_required)
    }
}

// ==========================================
// MachineSummary - 单产线汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSummary {
    pub machine: MachineLine,
    pub job_count: usize,
    pub run_count: usize,
    pub changeover_count: usize,
    pub washdown_count: usize,
    pub total_downtime_minutes: f64,
    pub max_risk_score: f64,
}

impl MachineSummary {
    pub fn from_sequence(machine: MachineLine, jobs: &[SequencedJob], runs: &[Run]) -> Self {
        Self {
            machine,
            job_count: jobs.len(),
            run_count: runs.len(),
            changeover_count: jobs.iter().filter(|j| j.changeover_required).count(),
            washdown_count: jobs.iter().filter(|j| j.washdown_required).count(),
            total_downtime_minutes: jobs.iter().map(|j| j.downtime_minutes).sum(),
            max_risk_score: jobs
                .iter()
                .map(|j| j.scored.risk_score)
                .fold(0.0, f64::max),
        }
    }
}
