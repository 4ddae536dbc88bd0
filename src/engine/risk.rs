// ==========================================
// 酸奶产线排产系统 - 风险评分引擎
// ==========================================
// 职责: 逐任务累加风险分并给出原因
// 输入: Job + RiskConfig
// 输出: (risk_score, reasons) / ScoredJob
// 红线: 规则相互独立、逐条可解释; 缺失字段只加分,不报错
// ==========================================

use crate::config::RiskConfig;
use crate::domain::job::{Job, ScoredJob};
use crate::domain::types::{MachineLine, QaDisposition, RiskBand};
use std::fmt;

// 浮点边界容差（如 3.7 - 3.6 不严格等于 0.1）
const BOUNDARY_EPSILON: f64 = 1e-9;

// ==========================================
// RiskRule - 风险规则
// ==========================================
// 顺序即原因输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskRule {
    PhMissing,
    PhOutOfRange,
    PhNearLimit,
    ComplexFormulation,
    PackSizeMissing,
    PackSizeOutOfRange,
    MachineUnassigned,
    EmptyProductName,
}

impl RiskRule {
    pub const ALL: [RiskRule; 8] = [
        RiskRule::PhMissing,
        RiskRule::PhOutOfRange,
        RiskRule::PhNearLimit,
        RiskRule::ComplexFormulation,
        RiskRule::PackSizeMissing,
        RiskRule::PackSizeOutOfRange,
        RiskRule::MachineUnassigned,
        RiskRule::EmptyProductName,
    ];
}

impl fmt::Display for RiskRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskRule::PhMissing => write!(f, "PH_MISSING"),
            RiskRule::PhOutOfRange => write!(f, "PH_OUT_OF_RANGE"),
            RiskRule::PhNearLimit => write!(f, "PH_NEAR_LIMIT"),
            RiskRule::ComplexFormulation => write!(f, "COMPLEX_FORMULATION"),
            RiskRule::PackSizeMissing => write!(f, "PACK_SIZE_MISSING"),
            RiskRule::PackSizeOutOfRange => write!(f, "PACK_SIZE_OUT_OF_RANGE"),
            RiskRule::MachineUnassigned => write!(f, "MACHINE_UNASSIGNED"),
            RiskRule::EmptyProductName => write!(f, "EMPTY_PRODUCT_NAME"),
        }
    }
}

/// 单条规则的加分结果
#[derive(Debug, Clone, PartialEq)]
pub struct RiskContribution {
    pub rule: RiskRule,
    pub weight: f64,
    pub reason: String,
}

// ==========================================
// RiskScorer - 风险评分引擎
// ==========================================
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// 构造函数
    pub fn new(config: &RiskConfig) -> Self {
        let mut config = config.clone();
        for keyword in config.complex_keywords.iter_mut() {
            *keyword = keyword.to_lowercase();
        }
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算风险分与原因
    ///
    /// # 返回
    /// (risk_score, reasons): 分数为各规则加分之和,无上限
    pub fn score(&self, job: &Job) -> (f64, Vec<String>) {
        let contributions = self.explain(job);
        let score = contributions.iter().map(|c| c.weight).sum::<f64>().max(0.0);
        let reasons = contributions.into_iter().map(|c| c.reason).collect();
        (score, reasons)
    }

    /// 评分并生成 ScoredJob
    pub fn score_job(&self, job: Job) -> ScoredJob {
        let (risk_score, risk_reason) = self.score(&job);
        ScoredJob {
            job,
            risk_score,
            risk_reason,
        }
    }

    /// 逐条列出命中的规则
    pub fn explain(&self, job: &Job) -> Vec<RiskContribution> {
        RiskRule::ALL
            .iter()
            .filter_map(|rule| self.evaluate(*rule, job))
            .collect()
    }

    /// 风险等级
    pub fn band(&self, score: f64) -> RiskBand {
        self.config.band(score)
    }

    /// 质检处置
    pub fn disposition(&self, score: f64) -> QaDisposition {
        self.config.disposition(score)
    }

    // ==========================================
    // 规则判定
    // ==========================================

    fn evaluate(&self, rule: RiskRule, job: &Job) -> Option<RiskContribution> {
        let cfg = &self.config;
        let hit = |weight: f64, reason: String| {
            Some(RiskContribution {
                rule,
                weight,
                reason,
            })
        };

        match rule {
            RiskRule::PhMissing => match job.ph {
                None if cfg.ph_expected => hit(cfg.ph_missing_weight, "pH missing".to_string()),
                _ => None,
            },
            RiskRule::PhOutOfRange => {
                let ph = job.ph?;
                if ph < cfg.ph_min || ph > cfg.ph_max {
                    hit(
                        cfg.ph_out_of_range_weight,
                        format!("pH {:.2} outside range [{}, {}]", ph, cfg.ph_min, cfg.ph_max),
                    )
                } else {
                    None
                }
            }
            RiskRule::PhNearLimit => {
                let ph = job.ph?;
                let inside = ph >= cfg.ph_min && ph <= cfg.ph_max;
                let margin = cfg.ph_near_margin + BOUNDARY_EPSILON;
                let near = (ph - cfg.ph_min) <= margin || (cfg.ph_max - ph) <= margin;
                if inside && near {
                    hit(
                        cfg.ph_near_limit_weight,
                        format!("pH {:.2} near limit [{}, {}]", ph, cfg.ph_min, cfg.ph_max),
                    )
                } else {
                    None
                }
            }
            RiskRule::ComplexFormulation => {
                // 标签中的下划线按空格处理（white_choc → white choc）
                let text = format!(
                    "{} {}",
                    job.product_name.to_lowercase(),
                    job.flavour_label.to_lowercase().replace('_', " ")
                );
                let keyword = cfg
                    .complex_keywords
                    .iter()
                    .find(|k| !k.is_empty() && text.contains(k.as_str()))?;
                hit(
                    cfg.complex_formulation_weight,
                    format!("complex formulation: {}", keyword),
                )
            }
            RiskRule::PackSizeMissing => match job.pack_size_g {
                Some(p) if p > 0.0 => None,
                _ => hit(cfg.pack_missing_weight, "pack size missing/invalid".to_string()),
            },
            RiskRule::PackSizeOutOfRange => {
                let pack = job.pack_size_g.filter(|p| *p > 0.0)?;
                if pack < cfg.pack_min_g || pack > cfg.pack_max_g {
                    hit(
                        cfg.pack_out_of_range_weight,
                        format!(
                            "pack size {}g outside range [{}, {}]g",
                            pack, cfg.pack_min_g, cfg.pack_max_g
                        ),
                    )
                } else {
                    None
                }
            }
            RiskRule::MachineUnassigned => match job.machine {
                None | Some(MachineLine::Unknown) => hit(
                    cfg.machine_unassigned_weight,
                    "machine not assigned".to_string(),
                ),
                _ => None,
            },
            RiskRule::EmptyProductName => {
                if job.product_name.trim().is_empty() {
                    hit(cfg.empty_name_weight, "product name empty".to_string())
                } else {
                    None
                }
            }
        }
    }
}
