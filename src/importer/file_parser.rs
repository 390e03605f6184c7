// ==========================================
// маршрутная карта - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv) / 工艺文本 (.txt) / JSON (.json)
// 输出: RawTable（首行为表头，完全空白的行被丢弃）
// ==========================================

use crate::domain::table::{CellValue, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::json_export::read_table_json;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 工艺文本中的分隔点（希腊文分号 U+0387）
pub const PROC_SEPARATOR: char = '\u{0387}';

// ==========================================
// TableParser Trait
// ==========================================
pub trait TableParser {
    /// 将文件解析为原始表格
    fn parse(&self, path: &Path) -> ImportResult<RawTable>;
}

/// 检查文件存在且扩展名在允许列表中
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let ext = extension_of(path);
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 表头规范化
///
/// - 空表头 → `Unnamed: <列序号>`
/// - 重复表头 → `Name.1`, `Name.2` ...
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (idx, header) in raw.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        };

        let mut name = base.clone();
        while headers.contains(&name) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            name = format!("{}.{}", base, counter);
        }
        headers.push(name);
    }

    headers
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl TableParser for ExcelParser {
    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        check_file(path, &["xlsx", "xls", "xlsm", "xlsb", "ods"])?;

        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;
        let headers = normalize_headers(header_row.iter().map(|c| c.to_string()).collect());

        let records: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(Self::convert_cell).collect::<Vec<_>>())
            .filter(|values| !values.iter().all(CellValue::is_blank))
            .collect();

        let table = RawTable::from_records(headers, records);
        info!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = table.len(),
            columns = table.columns().len(),
            "Excel 文件已加载"
        );
        Ok(table)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        check_file(path, &["csv"])?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_path(path)?;

        let headers = normalize_headers(reader.headers()?.iter().map(str::to_string).collect());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let values: Vec<CellValue> = record
                .iter()
                .map(|v| match v.trim() {
                    "" => CellValue::Empty,
                    trimmed => CellValue::Text(trimmed.to_string()),
                })
                .collect();

            // 跳过完全空白的行
            if values.iter().all(CellValue::is_blank) {
                continue;
            }
            records.push(values);
        }

        let table = RawTable::from_records(headers, records);
        info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "CSV 文件已加载");
        Ok(table)
    }
}

// ==========================================
// 工艺文本 Parser 实现
// ==========================================
// 格式: UTF-8 文本，"··" 为列分隔，单个 "·" 为装饰符
// 首个非空行为表头；短行补空、长行截断
// ==========================================
pub struct ProcTextParser;

impl ProcTextParser {
    /// 解析文本内容
    pub fn parse_str(&self, content: &str) -> ImportResult<RawTable> {
        let pair: String = [PROC_SEPARATOR, PROC_SEPARATOR].iter().collect();
        let normalized = content
            .replace(&pair, "\t")
            .replace(PROC_SEPARATOR, "");

        let mut headers: Option<Vec<String>> = None;
        let mut records: Vec<Vec<CellValue>> = Vec::new();

        for line in normalized.split('\n') {
            let parts: Vec<&str> = line
                .trim()
                .split('\t')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            if parts.is_empty() {
                continue;
            }

            let Some(width) = headers.as_ref().map(Vec::len) else {
                headers = Some(parts.iter().map(|p| p.to_string()).collect());
                continue;
            };

            let mut values: Vec<CellValue> = parts
                .iter()
                .take(width)
                .map(|p| CellValue::Text(p.to_string()))
                .collect();
            values.resize(width, CellValue::Empty);
            records.push(values);
        }

        match headers {
            Some(headers) if !records.is_empty() => {
                debug!(columns = headers.len(), rows = records.len(), "工艺文本结构已识别");
                Ok(RawTable::from_records(normalize_headers(headers), records))
            }
            _ => Err(ImportError::TextStructureError(
                "未找到表头或数据行".to_string(),
            )),
        }
    }
}

impl TableParser for ProcTextParser {
    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        check_file(path, &["txt"])?;

        let content = fs::read_to_string(path)?;
        let table = self.parse_str(&content)?;
        info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "工艺文本已加载");
        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl TableParser for UniversalFileParser {
    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        match extension_of(path).as_str() {
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => ExcelParser.parse(path),
            "csv" => CsvParser.parse(path),
            "txt" => ProcTextParser.parse(path),
            "json" => read_table_json(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl UniversalFileParser {
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<RawTable> {
        self.parse(path.as_ref())
    }
}
