// ==========================================
// 酸奶产线排产系统 - 输出行筛选
// ==========================================
// 职责: 决策视图筛选（仅清洗 / 仅换产 / 产线 / 品名搜索）
// 红线: 只过滤展示行,不影响排序与批次压缩
// ==========================================

use crate::domain::types::MachineLine;
use crate::exporter::output_row::OutputRow;

// ==========================================
// RowFilter - 行筛选条件
// ==========================================
// 各条件同时生效; 默认值不过滤任何行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub only_washdown: bool,
    pub only_changeover: bool,
    /// 空 = 全部产线
    pub machines: Vec<MachineLine>,
    /// 品名包含（大小写不敏感）
    pub search: Option<String>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        *self == RowFilter::default()
    }

    pub fn matches(&self, row: &OutputRow) -> bool {
        if self.only_washdown && !row.washdown_required {
            return false;
        }
        if self.only_changeover && !row.changeover_required {
            return false;
        }
        if !self.machines.is_empty() && !self.machines.contains(&row.machine) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => row
                .product_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    pub fn apply(&self, rows: Vec<OutputRow>) -> Vec<OutputRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::domain::job::{Job, ScoredJob};
    use crate::domain::sequence::SequencedJob;

    fn row(name: &str, machine: MachineLine, changeover: bool, washdown: bool) -> OutputRow {
        let mut job = Job::new(name);
        job.machine = Some(machine);
        let sequenced = SequencedJob {
            scored: ScoredJob {
                job,
                risk_score: 0.0,
                risk_reason: Vec::new(),
            },
            sequence_rank: 1,
            changeover_required: changeover,
            changeover_reason: String::new(),
            washdown_required: washdown,
            washdown_reason: String::new(),
            downtime_minutes: 0.0,
        };
        OutputRow::from_sequenced(&sequenced, &RiskConfig::default())
    }

    fn rows() -> Vec<OutputRow> {
        vec![
            row("Greek Natural 150g", MachineLine::M1, false, false),
            row("Vanilla 150g", MachineLine::M1, true, true),
            row("Vanilla 150g", MachineLine::M1, false, true),
            row("C.Vanilla 450g", MachineLine::M2, false, false),
            row("Honey Granola 150g", MachineLine::M3, true, false),
        ]
    }

    fn names(rows: &[OutputRow]) -> Vec<&str> {
        rows.iter().map(|r| r.product_name.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_everything() {
        let filter = RowFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(rows()).len(), 5);
    }

    #[test]
    fn test_only_washdown_and_changeover() {
        let washdown = RowFilter {
            only_washdown: true,
            ..Default::default()
        };
        assert_eq!(names(&washdown.apply(rows())), vec!["Vanilla 150g", "Vanilla 150g"]);

        let both = RowFilter {
            only_washdown: true,
            only_changeover: true,
            ..Default::default()
        };
        assert_eq!(both.apply(rows()).len(), 1);
    }

    #[test]
    fn test_machine_selection() {
        let filter = RowFilter {
            machines: vec![MachineLine::M2, MachineLine::M3],
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply(rows())),
            vec!["C.Vanilla 450g", "Honey Granola 150g"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = RowFilter {
            search: Some("  vanilla ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(rows()).len(), 3);

        let blank = RowFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.apply(rows()).len(), 5);
    }
}
