// ==========================================
// 酸奶产线排产系统 - 产线内排序引擎
// ==========================================
// 职责: 按产线分区,分区内以切换成本做贪心最近邻排序
// 输入: 已分配产线的任务列表
// 输出: BTreeMap<产线, 排序后任务列表>（规范产线顺序,UNKNOWN 最后）
// 红线: 确定性: 不使用随机数,不依赖无序遍历; 平局取输入中先出现者
// 红线: UNKNOWN 分区保持输入顺序,不参与成本排序
// ==========================================
// 注: 最近邻为启发式,O(n²),不保证全局最优; 日计划单线任务量为几十级
// ==========================================

use crate::config::TransitionConfig;
use crate::domain::job::{Job, JobKey};
use crate::domain::types::MachineLine;
use crate::engine::transition::TransitionCostModel;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// ==========================================
// SequenceOptimizer - 产线内排序引擎
// ==========================================
pub struct SequenceOptimizer {
    cost_model: TransitionCostModel,
}

impl SequenceOptimizer {
    /// 构造函数
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            cost_model: TransitionCostModel::new(config),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按产线分区并排序
    ///
    /// # 返回
    /// 空分区不会出现在结果中
    pub fn optimize<T: AsRef<Job>>(&self, jobs: Vec<T>) -> BTreeMap<MachineLine, Vec<T>> {
        self.partition(jobs)
            .into_iter()
            .map(|(machine, members)| (machine, self.order_partition(machine, members)))
            .collect()
    }

    /// 按产线分区（分区内保持输入顺序）
    pub fn partition<T: AsRef<Job>>(&self, jobs: Vec<T>) -> BTreeMap<MachineLine, Vec<T>> {
        let mut grouped: BTreeMap<MachineLine, Vec<T>> = BTreeMap::new();
        for job in jobs {
            let machine = job.as_ref().machine_line();
            grouped.entry(machine).or_default().push(job);
        }
        grouped
    }

    /// 单分区排序
    ///
    /// 步骤:
    /// 1) 相同 SKU (product_name, flavour_label, pack_size_g) 合并为一个排序单元
    /// 2) 以清洗负担最低的单元开头
    /// 3) 反复选取与上一单元切换成本最低的剩余单元
    /// 4) 展开单元,同一单元内任务保持输入顺序
    pub fn order_partition<T: AsRef<Job>>(&self, machine: MachineLine, jobs: Vec<T>) -> Vec<T> {
        if !machine.is_sequenced() || jobs.len() <= 1 {
            return jobs;
        }

        let units = group_units(jobs);
        if units.len() == 1 {
            return units.into_iter().flatten().collect();
        }

        let order = self.greedy_order(&units);
        debug!(
            machine = %machine,
            unit_count = units.len(),
            "分区排序完成"
        );

        let mut slots: Vec<Option<Vec<T>>> = units.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .flatten()
            .collect()
    }

    // ==========================================
    // 排序细节
    // ==========================================

    /// 贪心最近邻,返回单元下标序列
    fn greedy_order<T: AsRef<Job>>(&self, units: &[Vec<T>]) -> Vec<usize> {
        let reps: Vec<&Job> = units.iter().map(|u| u[0].as_ref()).collect();

        let start = select_start(&reps);
        let mut order = Vec::with_capacity(reps.len());
        order.push(start);

        let mut remaining: Vec<usize> = (0..reps.len()).filter(|i| *i != start).collect();

        while !remaining.is_empty() {
            let last = reps[order[order.len() - 1]];

            // 严格小于,平局保留先出现者
            let mut best_pos = 0;
            let mut best_minutes = f64::INFINITY;
            for (pos, idx) in remaining.iter().enumerate() {
                let minutes = self.cost_model.cost(last, reps[*idx]).minutes;
                if minutes < best_minutes {
                    best_minutes = minutes;
                    best_pos = pos;
                }
            }

            order.push(remaining.remove(best_pos));
        }

        order
    }
}

/// 清洗负担分（越低越应先做）
///
/// - 原味 −5
/// - 不含燕麦脆 −2
/// - 无坚果风险 −2
/// - 不含巧克力 −1
pub fn cleaning_burden(job: &Job) -> i32 {
    let mut score = 0;
    if job.is_plain {
        score -= 5;
    }
    if !job.is_granola {
        score -= 2;
    }
    if !job.has_nut_risk {
        score -= 2;
    }
    if !job.has_chocolate {
        score -= 1;
    }
    score
}

/// 选择起始单元（平局取先出现者）
fn select_start(reps: &[&Job]) -> usize {
    let mut best = 0;
    let mut best_score = i32::MAX;
    for (idx, job) in reps.iter().enumerate() {
        let score = cleaning_burden(job);
        if score < best_score {
            best_score = score;
            best = idx;
        }
    }
    best
}

/// 按 SKU 合并为排序单元（单元顺序 = 首次出现顺序）
fn group_units<T: AsRef<Job>>(jobs: Vec<T>) -> Vec<Vec<T>> {
    let mut index: HashMap<JobKey, usize> = HashMap::new();
    let mut units: Vec<Vec<T>> = Vec::new();

    for job in jobs {
        let key = job.as_ref().sequencing_key();
        match index.get(&key) {
            Some(&pos) => units[pos].push(job),
            None => {
                index.insert(key, units.len());
                units.push(vec![job]);
            }
        }
    }

    units
}
