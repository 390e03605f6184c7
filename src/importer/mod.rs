// ==========================================
// маршрутная карта - 导入层
// ==========================================
// 职责: 外部文件 → RawTable
// 支持: Excel, CSV, 工艺文本 (Proc.txt), JSON
// ==========================================

pub mod error;
pub mod file_parser;
pub mod json_export;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{
    normalize_headers, CsvParser, ExcelParser, ProcTextParser, TableParser, UniversalFileParser,
};
pub use json_export::{read_table_json, table_from_json, table_to_json, write_table_json};
