// ==========================================
// 酸奶产线排产系统 - CSV 任务读取器
// ==========================================
// 职责: 读取规范列名的 CSV,转为 Job 列表
// 规则: 仅识别规范列名（不做列名猜测）; 派生列缺失/为空时按品名推导
// 红线: 不丢弃品名为空的行,交由引擎整批拒绝
// ==========================================

use crate::config::CompressionConfig;
use crate::domain::job::Job;
use crate::domain::types::MachineLine;
use crate::importer::derivation;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// 规范列名
// ==========================================
pub mod columns {
    pub const PRODUCT_NAME: &str = "product_name";
    pub const PACK_SIZE_G: &str = "pack_size_g";
    pub const FLAVOUR_LABEL: &str = "flavour_label";
    pub const FLAVOUR_NAME: &str = "flavour_name";
    pub const IS_PLAIN: &str = "is_plain";
    pub const IS_GRANOLA: &str = "is_granola";
    pub const HAS_CHOCOLATE: &str = "has_chocolate";
    pub const HAS_NUT_RISK: &str = "has_nut_risk";
    pub const PH: &str = "ph";
    pub const MACHINE: &str = "machine";
}

// ==========================================
// CsvJobReader - CSV 任务读取器
// ==========================================
pub struct CsvJobReader {
    quantity_fields: Vec<String>,
}

impl CsvJobReader {
    /// 构造函数
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            quantity_fields: config.quantity_fields.clone(),
        }
    }

    /// 从文件读取
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<Job>> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let jobs = self.read_from(file)?;
        info!(path = %path.display(), job_count = jobs.len(), "CSV 导入完成");
        Ok(jobs)
    }

    /// 从任意输入流读取
    pub fn read_from<R: Read>(&self, input: R) -> ImportResult<Vec<Job>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(input);

        // 读取表头（列名大小写不敏感）
        let headers: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim().to_lowercase(), idx))
            .collect();

        if !headers.contains_key(columns::PRODUCT_NAME) {
            return Err(ImportError::MissingColumn(columns::PRODUCT_NAME.to_string()));
        }

        let mut jobs = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;

            // 跳过完全空白的行
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            let row = RowView {
                record: &record,
                headers: &headers,
                row: row_idx + 1,
            };
            jobs.push(self.map_row(&row)?);
        }

        debug!(job_count = jobs.len(), "CSV 解析完成");
        Ok(jobs)
    }

    /// 单行映射为 Job
    fn map_row(&self, row: &RowView<'_>) -> ImportResult<Job> {
        let product_name = row.text(columns::PRODUCT_NAME).unwrap_or_default();
        let flavour_name = row.text(columns::FLAVOUR_NAME).unwrap_or_default();

        let pack_size_g = match row.number(columns::PACK_SIZE_G)? {
            Some(v) => Some(v),
            None => derivation::extract_pack_size_g(&product_name),
        };

        let flavour_label = row
            .text(columns::FLAVOUR_LABEL)
            .unwrap_or_else(|| derivation::infer_flavour_label(&product_name, &flavour_name));

        let is_plain = row
            .flag(columns::IS_PLAIN)?
            .unwrap_or_else(|| derivation::is_plain(&product_name, &flavour_label));
        let is_granola = row
            .flag(columns::IS_GRANOLA)?
            .unwrap_or_else(|| derivation::is_granola(&product_name, &flavour_label));
        let has_chocolate = row
            .flag(columns::HAS_CHOCOLATE)?
            .unwrap_or_else(|| derivation::has_chocolate(&product_name, &flavour_label));
        let has_nut_risk = row
            .flag(columns::HAS_NUT_RISK)?
            .unwrap_or_else(|| derivation::has_nut_risk(&product_name, &flavour_label));

        let mut quantities = std::collections::BTreeMap::new();
        for field in &self.quantity_fields {
            if let Some(value) = row.number(field)? {
                quantities.insert(field.clone(), value);
            }
        }

        Ok(Job {
            product_name,
            pack_size_g,
            flavour_label,
            is_plain,
            is_granola,
            has_chocolate,
            has_nut_risk,
            ph: row.number(columns::PH)?,
            machine: row.machine()?,
            quantities,
        })
    }
}

// ==========================================
// RowView - 单行字段读取
// ==========================================
struct RowView<'a> {
    record: &'a StringRecord,
    headers: &'a HashMap<String, usize>,
    row: usize,
}

impl RowView<'_> {
    /// 非空文本（已去首尾空白）
    fn text(&self, column: &str) -> Option<String> {
        let idx = *self.headers.get(&column.to_lowercase())?;
        let value = self.record.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// 空值/NaN 视为缺失
    fn number(&self, column: &str) -> ImportResult<Option<f64>> {
        let Some(raw) = self.text(column) else {
            return Ok(None);
        };
        if is_null_token(&raw) {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(column, raw)),
        }
    }

    fn flag(&self, column: &str) -> ImportResult<Option<bool>> {
        let Some(raw) = self.text(column) else {
            return Ok(None);
        };
        match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Ok(Some(true)),
            "0" | "false" | "no" | "n" => Ok(Some(false)),
            _ if is_null_token(&raw) => Ok(None),
            _ => Err(self.invalid(column, raw)),
        }
    }

    fn machine(&self) -> ImportResult<Option<MachineLine>> {
        let Some(raw) = self.text(columns::MACHINE) else {
            return Ok(None);
        };
        if is_null_token(&raw) {
            return Ok(None);
        }
        MachineLine::parse(&raw)
            .map(Some)
            .ok_or_else(|| self.invalid(columns::MACHINE, raw))
    }

    fn invalid(&self, column: &str, value: String) -> ImportError {
        ImportError::InvalidValue {
            row: self.row,
            field: column.to_string(),
            value,
        }
    }
}

fn is_null_token(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "nan" | "na" | "n/a" | "null" | "none"
    )
}
