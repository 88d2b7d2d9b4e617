// ==========================================
// Repair Queens - 导入层
// ==========================================
// 职责: 外部配件清单导入
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod part_importer;
pub mod part_mapper;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, RawRow, UniversalFileParser};
pub use part_importer::{PartImportReport, PartImporter, RowRejection};
pub use part_mapper::PartMapper;
