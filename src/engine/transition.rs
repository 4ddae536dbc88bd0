// ==========================================
// 酸奶产线排产系统 - 切换成本模型
// ==========================================
// 职责: 评估同一产线上 A 之后紧接 B 的切换耗时与是否需要清洗
// 输入: (from: Job, to: Job) + TransitionConfig
// 输出: TransitionCost (分钟数 + 清洗标志 + 原因)
// 红线: 纯函数; 所有触发项同时生效,耗时为各项之和
// 红线: 跨产线返回无穷大成本,仅作保护
// ==========================================

use crate::config::TransitionConfig;
use crate::domain::job::Job;
use std::fmt;

pub const REASON_SEPARATOR: &str = " ; ";

// ==========================================
// TransitionTrigger - 切换触发项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTrigger {
    ProductChange,            // 换品（基础换产）
    GranolaLineProductChange, // 燕麦脆线换品
    FlavourChange,            // 口味变化（双方均已确定）
    PlainSwitch,              // 原味 ↔ 风味
    GranolaSwitch,            // 含/不含燕麦脆
    NutRiskSwitch,            // 坚果过敏原变化
    ChocolateSwitch,          // 含/不含巧克力
}

impl TransitionTrigger {
    pub const ALL: [TransitionTrigger; 7] = [
        TransitionTrigger::ProductChange,
        TransitionTrigger::GranolaLineProductChange,
        TransitionTrigger::FlavourChange,
        TransitionTrigger::PlainSwitch,
        TransitionTrigger::GranolaSwitch,
        TransitionTrigger::NutRiskSwitch,
        TransitionTrigger::ChocolateSwitch,
    ];

    /// 是否触发清洗
    pub fn requires_washdown(&self) -> bool {
        !matches!(self, TransitionTrigger::ProductChange)
    }

    /// 触发项耗时（分钟）
    pub fn minutes(&self, cfg: &TransitionConfig) -> f64 {
        match self {
            TransitionTrigger::ProductChange => cfg.product_change_minutes,
            TransitionTrigger::GranolaLineProductChange => cfg.granola_line_change_minutes,
            TransitionTrigger::FlavourChange => cfg.flavour_change_minutes,
            TransitionTrigger::PlainSwitch => cfg.plain_switch_minutes,
            TransitionTrigger::GranolaSwitch => cfg.granola_switch_minutes,
            TransitionTrigger::NutRiskSwitch => cfg.nut_risk_switch_minutes,
            TransitionTrigger::ChocolateSwitch => cfg.chocolate_switch_minutes,
        }
    }

    /// 判定是否触发（调用方保证同一产线）
    fn fires(&self, from: &Job, to: &Job, cfg: &TransitionConfig) -> bool {
        let product_changed = from.product_name != to.product_name;
        match self {
            TransitionTrigger::ProductChange => product_changed,
            TransitionTrigger::GranolaLineProductChange => {
                product_changed && to.machine_line() == cfg.granola_line
            }
            TransitionTrigger::FlavourChange => {
                !from.flavour_label.is_empty()
                    && !to.flavour_label.is_empty()
                    && from.flavour_label != to.flavour_label
            }
            TransitionTrigger::PlainSwitch => from.is_plain != to.is_plain,
            TransitionTrigger::GranolaSwitch => from.is_granola != to.is_granola,
            TransitionTrigger::NutRiskSwitch => from.has_nut_risk != to.has_nut_risk,
            TransitionTrigger::ChocolateSwitch => from.has_chocolate != to.has_chocolate,
        }
    }

    /// 原因描述,统一为 "from → to" 方向
    fn describe(&self, from: &Job, to: &Job) -> String {
        match self {
            TransitionTrigger::ProductChange => format!(
                "product change on {}: {} → {}",
                to.machine_line(),
                from.product_name,
                to.product_name
            ),
            TransitionTrigger::GranolaLineProductChange => format!(
                "{} granola line: washdown required for product change",
                to.machine_line()
            ),
            TransitionTrigger::FlavourChange => format!(
                "flavour change: {} → {}",
                from.flavour_label, to.flavour_label
            ),
            TransitionTrigger::PlainSwitch => format!(
                "{} → {} switch",
                plain_word(from.is_plain),
                plain_word(to.is_plain)
            ),
            TransitionTrigger::GranolaSwitch => format!(
                "{} → {} switch",
                flag_word(from.is_granola, "granola"),
                flag_word(to.is_granola, "granola")
            ),
            TransitionTrigger::NutRiskSwitch => format!(
                "{} → {} switch (full washdown)",
                if from.has_nut_risk { "nut-risk" } else { "nut-free" },
                if to.has_nut_risk { "nut-risk" } else { "nut-free" }
            ),
            TransitionTrigger::ChocolateSwitch => format!(
                "{} → {} switch (full washdown)",
                flag_word(from.has_chocolate, "chocolate"),
                flag_word(to.has_chocolate, "chocolate")
            ),
        }
    }
}

impl fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionTrigger::ProductChange => write!(f, "PRODUCT_CHANGE"),
            TransitionTrigger::GranolaLineProductChange => write!(f, "GRANOLA_LINE_PRODUCT_CHANGE"),
            TransitionTrigger::FlavourChange => write!(f, "FLAVOUR_CHANGE"),
            TransitionTrigger::PlainSwitch => write!(f, "PLAIN_SWITCH"),
            TransitionTrigger::GranolaSwitch => write!(f, "GRANOLA_SWITCH"),
            TransitionTrigger::NutRiskSwitch => write!(f, "NUT_RISK_SWITCH"),
            TransitionTrigger::ChocolateSwitch => write!(f, "CHOCOLATE_SWITCH"),
        }
    }
}

fn plain_word(is_plain: bool) -> &'static str {
    if is_plain {
        "plain"
    } else {
        "flavoured"
    }
}

fn flag_word(flag: bool, noun: &str) -> String {
    if flag {
        noun.to_string()
    } else {
        format!("non-{}", noun)
    }
}

/// 已触发的切换项
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTrigger {
    pub trigger: TransitionTrigger,
    pub minutes: f64,
    pub washdown: bool,
    pub description: String,
}

// ==========================================
// TransitionCost - 切换成本
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCost {
    pub minutes: f64,
    pub washdown: bool,
    pub reason: String,
    pub fired: Vec<FiredTrigger>,
}

impl TransitionCost {
    /// 零成本（相同任务）
    pub fn zero() -> Self {
        Self {
            minutes: 0.0,
            washdown: false,
            reason: String::new(),
            fired: Vec::new(),
        }
    }

    pub fn is_cross_machine(&self) -> bool {
        self.minutes.is_infinite()
    }

    pub fn has_fired(&self, trigger: TransitionTrigger) -> bool {
        self.fired.iter().any(|f| f.trigger == trigger)
    }

    /// 换产原因（仅换品项）
    pub fn changeover_reason(&self) -> String {
        self.fired
            .iter()
            .filter(|f| f.trigger == TransitionTrigger::ProductChange)
            .map(|f| f.description.as_str())
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }

    /// 清洗原因（仅清洗项）
    pub fn washdown_reason(&self) -> String {
        self.fired
            .iter()
            .filter(|f| f.washdown)
            .map(|f| f.description.as_str())
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }
}

// ==========================================
// TransitionCostModel - 切换成本模型
// ==========================================
pub struct TransitionCostModel {
    config: TransitionConfig,
}

impl TransitionCostModel {
    /// 构造函数
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 计算 from → to 切换成本
    ///
    /// # 规则
    /// - 跨产线 → 无穷大（保护,优化器不会比较跨产线任务）
    /// - 同产线 → 各触发项独立判定,耗时求和,任一清洗项触发即需清洗
    pub fn cost(&self, from: &Job, to: &Job) -> TransitionCost {
        if from.machine_line() != to.machine_line() {
            return TransitionCost {
                minutes: f64::INFINITY,
                washdown: false,
                reason: format!(
                    "cross-machine transition: {} → {}",
                    from.machine_line(),
                    to.machine_line()
                ),
                fired: Vec::new(),
            };
        }

        let fired: Vec<FiredTrigger> = TransitionTrigger::ALL
            .iter()
            .filter(|t| t.fires(from, to, &self.config))
            .map(|t| FiredTrigger {
                trigger: *t,
                minutes: t.minutes(&self.config),
                washdown: t.requires_washdown(),
                description: t.describe(from, to),
            })
            .collect();

        if fired.is_empty() {
            return TransitionCost::zero();
        }

        TransitionCost {
            minutes: fired.iter().map(|f| f.minutes).sum(),
            washdown: fired.iter().any(|f| f.washdown),
            reason: fired
                .iter()
                .map(|f| f.description.as_str())
                .collect::<Vec<_>>()
                .join(REASON_SEPARATOR),
            fired,
        }
    }
}
