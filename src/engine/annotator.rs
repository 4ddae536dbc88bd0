// ==========================================
// 酸奶产线排产系统 - 换产/清洗标注引擎
// ==========================================
// 职责: 沿排序结果逐个计算进入切换,标注换产/清洗及停机时间
// 输入: 已排序任务列表
// 输出: SequencedJob 列表
// 红线: 分区首个任务 rank=1、无换产、无清洗、停机 0
// ==========================================

use crate::config::TransitionConfig;
use crate::domain::job::ScoredJob;
use crate::domain::sequence::SequencedJob;
use crate::engine::transition::TransitionCostModel;

// ==========================================
// TransitionAnnotator - 换产/清洗标注引擎
// ==========================================
pub struct TransitionAnnotator {
    cost_model: TransitionCostModel,
}

impl TransitionAnnotator {
    /// 构造函数
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            cost_model: TransitionCostModel::new(config),
        }
    }

    /// 标注排序结果
    ///
    /// 产线变化处视为新分区起点（序号重新从 1 开始）,
    /// 因此传入多个分区首尾相接的序列也能得到正确结果
    pub fn annotate(&self, ordered: Vec<ScoredJob>) -> Vec<SequencedJob> {
        let mut result: Vec<SequencedJob> = Vec::with_capacity(ordered.len());
        let mut rank: u32 = 0;

        for scored in ordered {
            let previous = result
                .last()
                .filter(|prev| prev.machine() == scored.job.machine_line());

            let sequenced = match previous {
                None => {
                    rank = 1;
                    SequencedJob {
                        scored,
                        sequence_rank: rank,
                        changeover_required: false,
                        changeover_reason: String::new(),
                        washdown_required: false,
                        washdown_reason: String::new(),
                        downtime_minutes: 0.0,
                    }
                }
                Some(prev) => {
                    rank += 1;
                    let cost = self.cost_model.cost(prev.job(), &scored.job);
                    SequencedJob {
                        changeover_required: prev.job().product_name != scored.job.product_name,
                        changeover_reason: cost.changeover_reason(),
                        washdown_required: cost.washdown,
                        washdown_reason: cost.washdown_reason(),
                        downtime_minutes: cost.minutes,
                        sequence_rank: rank,
                        scored,
                    }
                }
            };

            result.push(sequenced);
        }

        result
    }
}
