// ==========================================
// 酸奶产线排产系统 - 导出层
// ==========================================
// 职责: 排产结果展平为表格行,按决策视图筛选后写出
// 红线: 不改变排序结果,只做展示
// ==========================================

pub mod csv_writer;
pub mod error;
pub mod output_row;
pub mod row_filter;

pub use csv_writer::CsvReportWriter;
pub use error::{ExportError, ExportResult};
pub use output_row::{OutputRow, FIXED_COLUMNS};
pub use row_filter::RowFilter;
