// ==========================================
// 酸奶产线排产系统 - 引擎编排器
// ==========================================
// 用途: 协调机组分配 → 风险评分 → 分区排序 → 换产标注 → 批次压缩
// 红线: 无 I/O; 输入整批校验,任一记录无效即整批拒绝
// 红线: 各产线分区互相独立,可并行; 合并时保持规范产线顺序
// ==========================================

use crate::config::{ConfigManager, SequencerConfig};
use crate::domain::job::{Job, ScoredJob};
use crate::domain::sequence::{MachineSummary, Run, SequencedJob};
use crate::domain::types::MachineLine;
use crate::engine::annotator::TransitionAnnotator;
use crate::engine::classifier::MachineClassifier;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::risk::RiskScorer;
use crate::engine::run_compressor::RunCompressor;
use crate::engine::sequencer::SequenceOptimizer;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// MachinePlan - 单产线排产结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MachinePlan {
    pub machine: MachineLine,
    pub jobs: Vec<SequencedJob>,
    pub runs: Vec<Run>,
    pub summary: MachineSummary,
}

// ==========================================
// SequencingResult - 整批排产结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SequencingResult {
    /// 按规范产线顺序排列（UNKNOWN 最后）,无空分区
    pub plans: Vec<MachinePlan>,
}

impl SequencingResult {
    pub fn plan(&self, machine: MachineLine) -> Option<&MachinePlan> {
        self.plans.iter().find(|p| p.machine == machine)
    }

    /// 所有排序任务（产线顺序 + 分区内顺序）
    pub fn jobs(&self) -> impl Iterator<Item = &SequencedJob> {
        self.plans.iter().flat_map(|p| p.jobs.iter())
    }

    /// 所有批次
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.plans.iter().flat_map(|p| p.runs.iter())
    }

    pub fn summaries(&self) -> Vec<MachineSummary> {
        self.plans.iter().map(|p| p.summary.clone()).collect()
    }

    pub fn job_count(&self) -> usize {
        self.plans.iter().map(|p| p.jobs.len()).sum()
    }
}

// ==========================================
// SequencingEngine - 引擎编排器
// ==========================================
pub struct SequencingEngine {
    config: Arc<SequencerConfig>,
    classifier: MachineClassifier,
    scorer: RiskScorer,
    optimizer: SequenceOptimizer,
    annotator: TransitionAnnotator,
    compressor: RunCompressor,
}

impl SequencingEngine {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎配置（构造时校验）
    pub fn new(config: Arc<SequencerConfig>) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: MachineClassifier::new(&config.classifier),
            scorer: RiskScorer::new(&config.risk),
            optimizer: SequenceOptimizer::new(&config.transition),
            annotator: TransitionAnnotator::new(&config.transition),
            compressor: RunCompressor::new(&config.compression),
            config,
        })
    }

    /// 从配置管理器创建
    pub fn from_manager(manager: &ConfigManager) -> EngineResult<Self> {
        Self::new(manager.config())
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    // ==========================================
    // 主流程
    // ==========================================

    /// 执行完整排产流程
    ///
    /// # 参数
    /// - jobs: 已清洗的任务列表（保持导入顺序）
    ///
    /// # 返回
    /// - Ok(SequencingResult): 各产线排序/标注/压缩结果
    /// - Err(EngineError::InvalidInput): 存在无效记录,整批拒绝
    pub fn run(&self, jobs: Vec<Job>) -> EngineResult<SequencingResult> {
        info!(
            job_count = jobs.len(),
            parallel = self.config.parallel,
            "开始执行排产流程"
        );

        // ==========================================
        // 步骤0: 整批校验
        // ==========================================
        validate_batch(&jobs)?;

        // ==========================================
        // 步骤1+2: 机组分配 + 风险评分（逐任务独立）
        // ==========================================
        debug!("步骤1: 执行机组分配与风险评分");
        let scored = self.classify_and_score(jobs);

        let unknown_count = scored
            .iter()
            .filter(|s| s.job.machine_line() == MachineLine::Unknown)
            .count();
        if unknown_count > 0 {
            warn!(unknown_count, "存在无法归类的任务,排在最后且不参与成本排序");
        }

        // ==========================================
        // 步骤3: 按产线分区
        // ==========================================
        let partitions: Vec<(MachineLine, Vec<ScoredJob>)> =
            self.optimizer.partition(scored).into_iter().collect();
        debug!(partition_count = partitions.len(), "步骤2: 分区完成");

        // ==========================================
        // 步骤4: 分区内 排序 → 标注 → 压缩
        // ==========================================
        let plans: Vec<MachinePlan> = if self.config.parallel {
            partitions
                .into_par_iter()
                .map(|(machine, members)| self.process_partition(machine, members))
                .collect()
        } else {
            partitions
                .into_iter()
                .map(|(machine, members)| self.process_partition(machine, members))
                .collect()
        };

        let result = SequencingResult { plans };
        info!(
            machine_count = result.plans.len(),
            job_count = result.job_count(),
            "排产流程完成"
        );
        Ok(result)
    }

    /// 机组分配 + 风险评分
    fn classify_and_score(&self, jobs: Vec<Job>) -> Vec<ScoredJob> {
        let pipeline = |job: Job| {
            let job = self.classifier.assign(sanitize(job));
            self.scorer.score_job(job)
        };

        if self.config.parallel {
            jobs.into_par_iter().map(pipeline).collect()
        } else {
            jobs.into_iter().map(pipeline).collect()
        }
    }

    /// 单产线流水线
    fn process_partition(&self, machine: MachineLine, members: Vec<ScoredJob>) -> MachinePlan {
        let ordered = self.optimizer.order_partition(machine, members);
        let jobs = self.annotator.annotate(ordered);
        let runs = self.compressor.compress(&jobs);
        let summary = MachineSummary::from_sequence(machine, &jobs, &runs);

        info!(
            machine = %machine,
            job_count = summary.job_count,
            run_count = summary.run_count,
            changeovers = summary.changeover_count,
            washdowns = summary.washdown_count,
            downtime_minutes = summary.total_downtime_minutes,
            "产线排序完成"
        );

        MachinePlan {
            machine,
            jobs,
            runs,
            summary,
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 整批校验: product_name 不得为空
fn validate_batch(jobs: &[Job]) -> EngineResult<()> {
    for (index, job) in jobs.iter().enumerate() {
        if job.product_name.trim().is_empty() {
            warn!(index, "记录缺少 product_name,整批拒绝");
            return Err(EngineError::InvalidInput {
                index,
                message: "product_name 为空".to_string(),
            });
        }
    }
    Ok(())
}

/// 非有限数值视为缺失
fn sanitize(mut job: Job) -> Job {
    job.pack_size_g = job.pack_size_g.filter(|v| v.is_finite());
    job.ph = job.ph.filter(|v| v.is_finite());
    job
}
