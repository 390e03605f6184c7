// ==========================================
// маршрутная карта - 表格 JSON 中间产物
// ==========================================
// 格式: 行对象数组（键按列顺序），UTF-8，4 空格缩进
// 空单元格 → null
// ==========================================

use crate::domain::table::{CellValue, RawTable, TableRow};
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
    }
}

fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
        other => CellValue::Text(other.to_string()),
    }
}

/// 转换为 JSON 值（列顺序保持）
pub fn table_to_json(table: &RawTable) -> Value {
    let rows = (0..table.len())
        .filter_map(|idx| table.ordered_values(idx))
        .map(|values| {
            let object: Map<String, Value> = table
                .columns()
                .iter()
                .zip(values)
                .map(|(col, cell)| (col.clone(), cell_to_json(cell)))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

/// 4 空格缩进序列化
pub fn to_pretty_string<T: Serialize>(value: &T) -> ImportResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ImportError::InternalError(e.to_string()))
}

/// 写出表格 JSON
pub fn write_table_json<P: AsRef<Path>>(table: &RawTable, path: P) -> ImportResult<()> {
    let path = path.as_ref();
    let json = to_pretty_string(&table_to_json(table))?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(json.as_bytes())?;
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "表格 JSON 已写出");
    Ok(())
}

/// 读取表格 JSON（列顺序取各行键的首次出现顺序）
pub fn read_table_json<P: AsRef<Path>>(path: P) -> ImportResult<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let value: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let table = table_from_json(&value)?;
    info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "表格 JSON 已加载");
    Ok(table)
}

/// 由 JSON 值构造表格
pub fn table_from_json(value: &Value) -> ImportResult<RawTable> {
    let items = value
        .as_array()
        .ok_or_else(|| ImportError::JsonError("顶层应为行对象数组".to_string()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<TableRow> = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| ImportError::JsonError(format!("第 {} 行不是对象", idx)))?;

        let mut row = TableRow::new();
        for (key, cell) in object {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(cell));
        }
        rows.push(row);
    }

    let mut table = RawTable::new(columns);
    for row in rows {
        table.push_row(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> RawTable {
        RawTable::from_records(
            vec!["Designator", "Кол-во", "Comment"],
            vec![
                vec![CellValue::from("R1"), CellValue::Number(2.0), CellValue::Empty],
                vec![CellValue::from("C1"), CellValue::Number(1.5), CellValue::from("cap")],
            ],
        )
    }

    #[test]
    fn test_json_layout() {
        let json = to_pretty_string(&table_to_json(&sample())).unwrap();

        // 4 空格缩进，非 ASCII 不转义，空值输出 null
        assert!(json.contains("\n        \"Designator\": \"R1\""));
        assert!(json.contains("\"Кол-во\""));
        assert!(json.contains("\"Comment\": null"));

        // 键按列顺序
        let designator = json.find("Designator").unwrap();
        let comment = json.find("Comment").unwrap();
        assert!(designator < comment);
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");

        write_table_json(&sample(), &path).unwrap();
        let table = read_table_json(&path).unwrap();

        assert_eq!(table.columns(), ["Designator", "Кол-во", "Comment"]);
        assert_eq!(table.cell(1, "Кол-во"), Some(&CellValue::Number(1.5)));
        assert_eq!(table.cell(0, "Comment"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_rejects_non_array() {
        let result = table_from_json(&serde_json::json!({ "a": 1 }));
        assert!(matches!(result, Err(ImportError::JsonError(_))));
    }
}
