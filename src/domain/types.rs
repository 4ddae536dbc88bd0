// ==========================================
// 酸奶产线排产系统 - 领域类型定义
// ==========================================
// 红线: 机组为枚举,不是自由字符串
// 红线: UNKNOWN 机组永远排在最后
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产线 (Machine Line)
// ==========================================
// 顺序即输出顺序: M1 < M2 < M3 < BUCKET_LINE < UNKNOWN
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineLine {
    M1,         // 150g/170g/175g 杯装
    M2,         // 450g 杯装
    M3,         // 燕麦脆 (granola) 线
    BucketLine, // 2kg/5kg/10kg 桶装
    Unknown,    // 无法归类
}

impl MachineLine {
    /// 规范输出顺序
    pub const CANONICAL_ORDER: [MachineLine; 5] = [
        MachineLine::M1,
        MachineLine::M2,
        MachineLine::M3,
        MachineLine::BucketLine,
        MachineLine::Unknown,
    ];

    /// 从字符串解析产线代码
    ///
    /// # 返回
    /// - `Some(MachineLine)`: 识别成功
    /// - `None`: 无法识别
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "M1" => Some(MachineLine::M1),
            "M2" => Some(MachineLine::M2),
            "M3" => Some(MachineLine::M3),
            "BUCKET_LINE" | "BUCKET" => Some(MachineLine::BucketLine),
            "UNKNOWN" => Some(MachineLine::Unknown),
            _ => None,
        }
    }

    /// 转换为输出字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineLine::M1 => "M1",
            MachineLine::M2 => "M2",
            MachineLine::M3 => "M3",
            MachineLine::BucketLine => "BUCKET_LINE",
            MachineLine::Unknown => "UNKNOWN",
        }
    }

    /// 是否参与基于成本的排序
    pub fn is_sequenced(&self) -> bool {
        *self != MachineLine::Unknown
    }
}

impl fmt::Display for MachineLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 风险等级 (Risk Band)
// ==========================================
// 仅用于展示/告警,不参与排序
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// 按阈值划分风险等级
    ///
    /// - score < medium_from → Low
    /// - medium_from ≤ score < high_from → Medium
    /// - score ≥ high_from → High
    pub fn classify(score: f64, medium_from: f64, high_from: f64) -> Self {
        if score >= high_from {
            RiskBand::High
        } else if score >= medium_from {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "LOW"),
            RiskBand::Medium => write!(f, "MEDIUM"),
            RiskBand::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 质检处置 (QA Disposition)
// ==========================================
// 由风险分派生,与换产/清洗动作分列输出
// 顺序: Release < Monitor < Hold < StopLine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QaDisposition {
    Release,
    Monitor,
    Hold,
    StopLine,
}

impl QaDisposition {
    /// - score ≥ stop_line_from → StopLine
    /// - High → Hold
    /// - Medium → Monitor
    /// - Low → Release
    pub fn classify(score: f64, band: RiskBand, stop_line_from: f64) -> Self {
        if score >= stop_line_from {
            return QaDisposition::StopLine;
        }
        match band {
            RiskBand::High => QaDisposition::Hold,
            RiskBand::Medium => QaDisposition::Monitor,
            RiskBand::Low => QaDisposition::Release,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QaDisposition::Release => "RELEASE",
            QaDisposition::Monitor => "MONITOR",
            QaDisposition::Hold => "HOLD",
            QaDisposition::StopLine => "STOP LINE",
        }
    }
}

impl fmt::Display for QaDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 现场动作 (Line Action)
// ==========================================
// 规则: 清洗优先于换产
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineAction {
    WashdownAndRun,
    ChangeoverAndRun,
    Run,
}

impl LineAction {
    pub fn from_flags(washdown_required: bool, changeover_required: bool) -> Self {
        if washdown_required {
            LineAction::WashdownAndRun
        } else if changeover_required {
            LineAction::ChangeoverAndRun
        } else {
            LineAction::Run
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineAction::WashdownAndRun => "WASHDOWN + RUN",
            LineAction::ChangeoverAndRun => "CHANGEOVER + RUN",
            LineAction::Run => "RUN",
        }
    }
}

impl fmt::Display for LineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
