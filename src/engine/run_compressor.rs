// ==========================================
// 酸奶产线排产系统 - 连续批次压缩引擎
// ==========================================
// 职责: 合并排序结果中连续相同任务为批次 (Run)
// 输入: SequencedJob 列表（已排序）
// 输出: Run 列表
// 红线: 键 (machine, product_name, pack_size_g, flavour_label) 变化即开新批次
// 红线: 幂等, 对已压缩结果再压缩结果不变
// ==========================================

use crate::config::CompressionConfig;
use crate::domain::sequence::{Run, SequencedJob};
use std::collections::BTreeMap;

// ==========================================
// RunCompressor - 连续批次压缩引擎
// ==========================================
pub struct RunCompressor {
    quantity_fields: Vec<String>,
}

impl RunCompressor {
    /// 构造函数
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            quantity_fields: config.quantity_fields.clone(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 压缩排序结果
    pub fn compress(&self, jobs: &[SequencedJob]) -> Vec<Run> {
        let seeds = jobs.iter().map(|job| self.seed(job)).collect();
        self.merge_runs(seeds)
    }

    /// 合并相邻同键批次并重新编号
    ///
    /// 对 compress 的输出再次调用结果不变
    pub fn merge_runs(&self, runs: Vec<Run>) -> Vec<Run> {
        let mut merged: Vec<Run> = Vec::with_capacity(runs.len());

        for run in runs {
            match merged.last_mut() {
                Some(current) if current.key() == run.key() => absorb(current, run),
                _ => merged.push(run),
            }
        }

        renumber(&mut merged);
        merged
    }

    /// 单任务批次（只保留配置的数量字段,缺失记 0）
    fn seed(&self, job: &SequencedJob) -> Run {
        let mut run = Run::from_sequenced(job);
        run.quantities = self
            .quantity_fields
            .iter()
            .map(|field| (field.clone(), job.job().quantity(field)))
            .collect::<BTreeMap<_, _>>();
        run
    }
}

/// 将 next 并入 current
///
/// - 数量字段求和
/// - 风险取最大值（原因随最大值成员）
/// - 换产/清洗任一成员需要即需要
/// - 停机时间求和
fn absorb(current: &mut Run, next: Run) {
    current.last_rank = next.last_rank;
    current.job_count += next.job_count;

    for (field, value) in next.quantities {
        *current.quantities.entry(field).or_insert(0.0) += value;
    }

    if next.risk_score > current.risk_score {
        current.risk_score = next.risk_score;
        current.risk_reason = next.risk_reason;
    }

    if next.changeover_required {
        if !current.changeover_required {
            current.changeover_reason = next.changeover_reason;
        }
        current.changeover_required = true;
    }

    if next.washdown_required {
        if !current.washdown_required {
            current.washdown_reason = next.washdown_reason;
        }
        current.washdown_required = true;
    }

    current.downtime_minutes += next.downtime_minutes;
}

/// 按产线重新编号（从 1 开始）
fn renumber(runs: &mut [Run]) {
    let mut rank: u32 = 0;
    let mut machine = None;
    for run in runs.iter_mut() {
        if machine != Some(run.machine) {
            machine = Some(run.machine);
            rank = 0;
        }
        rank += 1;
        run.run_rank = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::{Job, ScoredJob};
    use crate::domain::types::MachineLine;

    fn sequenced(name: &str, rank: u32, trays: f64, risk: f64) -> SequencedJob {
        let mut job = Job {
            product_name: name.to_string(),
            pack_size_g: Some(150.0),
            machine: Some(MachineLine::M1),
            ..Default::default()
        };
        job.quantities.insert("packed_trays".to_string(), trays);
        SequencedJob {
            scored: ScoredJob {
                job,
                risk_score: risk,
                risk_reason: vec![format!("risk {}", risk)],
            },
            sequence_rank: rank,
            changeover_required: rank > 1,
            changeover_reason: String::new(),
            washdown_required: false,
            washdown_reason: String::new(),
            downtime_minutes: if rank > 1 { 10.0 } else { 0.0 },
        }
    }

    fn compressor() -> RunCompressor {
        RunCompressor::new(&CompressionConfig::default())
    }

    #[test]
    fn test_consecutive_identical_jobs_merge() {
        let mut second = sequenced("Vanilla", 2, 5.0, 0.2);
        second.changeover_required = false;
        second.downtime_minutes = 0.0;

        let runs = compressor().compress(&[
            sequenced("Vanilla", 1, 3.0, 0.6),
            second,
            sequenced("Mango", 3, 4.0, 0.0),
        ]);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].job_count, 2);
        assert_eq!((runs[0].first_rank, runs[0].last_rank), (1, 2));
        assert_eq!(runs[0].quantity("packed_trays"), 8.0);
        assert_eq!(runs[0].quantity("packed_kg"), 0.0);
        assert_eq!(runs[0].risk_score, 0.6);
        assert_eq!(runs[0].risk_reason, vec!["risk 0.6"]);
        assert!(!runs[0].changeover_required);
        assert_eq!(runs[1].run_rank, 2);
        assert!(runs[1].changeover_required);
    }

    #[test]
    fn test_non_adjacent_duplicates_stay_separate() {
        let runs = compressor().compress(&[
            sequenced("Vanilla", 1, 1.0, 0.0),
            sequenced("Mango", 2, 1.0, 0.0),
            sequenced("Vanilla", 3, 1.0, 0.0),
        ]);
        assert_eq!(runs.len(), 3);
    }

    #[test]
    fn test_worst_risk_and_flags_propagate() {
        let mut first = sequenced("Vanilla", 2, 1.0, 0.1);
        first.changeover_required = false;
        let mut second = sequenced("Vanilla", 3, 1.0, 1.3);
        second.washdown_required = true;
        second.washdown_reason = "flavour change".to_string();

        let runs = compressor().compress(&[first, second]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].risk_score, 1.3);
        assert!(runs[0].washdown_required);
        assert_eq!(runs[0].washdown_reason, "flavour change");
        assert!(runs[0].changeover_required);
        assert_eq!(runs[0].downtime_minutes, 20.0);
    }

    #[test]
    fn test_merge_runs_idempotent() {
        let jobs = vec![
            sequenced("Vanilla", 1, 1.0, 0.0),
            sequenced("Vanilla", 2, 2.0, 0.0),
            sequenced("Mango", 3, 3.0, 0.0),
        ];
        let once = compressor().compress(&jobs);
        let twice = compressor().merge_runs(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_machine_change_starts_new_run() {
        let a = sequenced("Vanilla", 1, 1.0, 0.0);
        let mut b = sequenced("Vanilla", 1, 1.0, 0.0);
        b.scored.job.machine = Some(MachineLine::M2);

        let runs = compressor().compress(&[a, b]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].machine, MachineLine::M2);
        assert_eq!(runs[1].run_rank, 1);
    }
}
