// ==========================================
// Repair Queens - 配件导入器
// ==========================================
// 流程: 文件解析 → 逐行映射 → 汇总报告
// 红线: 坏行只记录，不中断整个导入
// ==========================================

use crate::domain::part::Part;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::part_mapper::PartMapper;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// 被拒绝的行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    /// 文件中的行号（表头为第 1 行）
    pub row: usize,
    pub reason: String,
}

/// 导入报告
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartImportReport {
    pub parts: Vec<Part>,
    pub rejected: Vec<RowRejection>,
}

impl PartImportReport {
    pub fn total_rows(&self) -> usize {
        self.parts.len() + self.rejected.len()
    }
}

pub struct PartImporter {
    parser: UniversalFileParser,
    mapper: PartMapper,
}

impl Default for PartImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PartImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: PartMapper,
        }
    }

    /// 导入配件文件（.csv / .xlsx / .xls）
    ///
    /// # 返回
    /// - Ok(report): 文件可读；坏行记录在 report.rejected
    /// - Err: 文件不存在 / 格式不支持 / 整体解析失败
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<PartImportReport> {
        let records = self.parser.parse(file_path.as_ref())?;

        let mut report = PartImportReport::default();
        for record in &records {
            let row_number = record.line;
            match self.mapper.map_row(&record.fields, row_number) {
                Ok(part) => report.parts.push(part),
                Err(e) => {
                    warn!(row = row_number, error = %e, "配件行被拒绝");
                    report.rejected.push(RowRejection {
                        row: e.row().unwrap_or(row_number),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            imported = report.parts.len(),
            rejected = report.rejected.len(),
            "配件导入完成"
        );
        Ok(report)
    }
}
