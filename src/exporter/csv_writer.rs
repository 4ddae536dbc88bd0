// ==========================================
// 酸奶产线排产系统 - CSV 报表写出
// ==========================================
// 职责: 将排产结果按产线顺序写为 CSV
// 输出: 任意 io::Write（文件 / stdout / 内存）
// ==========================================

use crate::config::{RiskConfig, SequencerConfig};
use crate::engine::orchestrator::SequencingResult;
use crate::exporter::error::ExportResult;
use crate::exporter::output_row::{OutputRow, FIXED_COLUMNS};
use crate::exporter::row_filter::RowFilter;
use csv::Writer;
use std::io::Write;
use tracing::debug;

// ==========================================
// CsvReportWriter - CSV 报表写出器
// ==========================================
pub struct CsvReportWriter<W: Write> {
    writer: Writer<W>,
    quantity_fields: Vec<String>,
    risk: RiskConfig,
    filter: RowFilter,
}

impl<W: Write> CsvReportWriter<W> {
    /// 构造函数
    ///
    /// # 参数
    /// - inner: 输出目标
    /// - config: 提供数量列与风险等级/处置阈值
    pub fn new(inner: W, config: &SequencerConfig) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            quantity_fields: config.compression.quantity_fields.clone(),
            risk: config.risk.clone(),
            filter: RowFilter::default(),
        }
    }

    /// 设置行筛选条件（仅影响 write_jobs / write_runs）
    pub fn with_filter(mut self, filter: RowFilter) -> Self {
        self.filter = filter;
        self
    }

    /// 表头 = 固定列 + 数量列
    pub fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.quantity_fields.iter().cloned())
            .collect()
    }

    /// 写出逐任务明细（筛选后）
    pub fn write_jobs(&mut self, result: &SequencingResult) -> ExportResult<usize> {
        let rows: Vec<OutputRow> = result
            .jobs()
            .map(|j| OutputRow::from_sequenced(j, &self.risk))
            .collect();
        let rows = self.filter.apply(rows);
        self.write_rows(&rows)
    }

    /// 写出压缩后的批次
    pub fn write_runs(&mut self, result: &SequencingResult) -> ExportResult<usize> {
        let rows: Vec<OutputRow> = result
            .runs()
            .map(|r| OutputRow::from_run(r, &self.risk))
            .collect();
        let rows = self.filter.apply(rows);
        self.write_rows(&rows)
    }

    /// 写出表头与行,返回写出的行数
    pub fn write_rows(&mut self, rows: &[OutputRow]) -> ExportResult<usize> {
        let header = self.header();
        self.writer.write_record(&header)?;
        for row in rows {
            self.writer.write_record(row.to_record(&self.quantity_fields))?;
        }
        self.writer.flush()?;

        debug!(row_count = rows.len(), "CSV 报表写出完成");
        Ok(rows.len())
    }

    /// 取回底层输出
    pub fn into_inner(self) -> ExportResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}
