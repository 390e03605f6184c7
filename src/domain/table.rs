// ==========================================
// маршрутная карта - 原始表格模型
// ==========================================
// 职责: 加载器产出的矩形数据集（列名有序 + 行映射）
// 约束: 行内缺失的列等同于空单元格
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// 空白判定: 空值 / 纯空白 / "nan"（不区分大小写）/ NaN 数值
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
        }
    }

    /// 去除首尾空白后的显示文本，空白单元格返回 None
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Empty => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// 行记录（列名 → 值）
pub type TableRow = HashMap<String, CellValue>;

// ==========================================
// TableEditError - 编辑错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableEditError {
    #[error("行号越界: {index}（共 {len} 行）")]
    RowOutOfRange { index: usize, len: usize },

    #[error("列不存在: {0}")]
    UnknownColumn(String),
}

// ==========================================
// RawTable - 原始表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 由列名 + 按列顺序排列的值构造
    ///
    /// 行长度不足时补空，超出部分丢弃
    pub fn from_records<C, R>(columns: Vec<C>, records: Vec<R>) -> Self
    where
        C: Into<String>,
        R: IntoIterator,
        R::Item: Into<CellValue>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut values = record.into_iter();
                columns
                    .iter()
                    .map(|col| {
                        let value = values.next().map(Into::into).unwrap_or(CellValue::Empty);
                        (col.clone(), value)
                    })
                    .collect::<TableRow>()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    /// 读取单元格；行存在但列缺失时返回空单元格
    pub fn cell(&self, index: usize, column: &str) -> Option<&CellValue> {
        self.rows
            .get(index)
            .map(|row| row.get(column).unwrap_or(&EMPTY_CELL))
    }

    /// 按列顺序返回一行的值
    pub fn ordered_values(&self, index: usize) -> Option<Vec<&CellValue>> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .map(|col| row.get(col).unwrap_or(&EMPTY_CELL))
                .collect(),
        )
    }

    /// 追加列（已存在时忽略）
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// 追加一行；行内出现的新列名按字母序追加到列尾
    pub fn push_row(&mut self, row: TableRow) {
        self.register_columns(&row);
        self.rows.push(row);
    }

    pub fn insert_row(&mut self, index: usize, row: TableRow) -> Result<(), TableEditError> {
        if index > self.rows.len() {
            return Err(TableEditError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        self.register_columns(&row);
        self.rows.insert(index, row);
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<TableRow, TableEditError> {
        if index >= self.rows.len() {
            return Err(TableEditError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    pub fn set_cell(
        &mut self,
        index: usize,
        column: &str,
        value: CellValue,
    ) -> Result<(), TableEditError> {
        if !self.has_column(column) {
            return Err(TableEditError::UnknownColumn(column.to_string()));
        }
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(TableEditError::RowOutOfRange { index, len })?;
        row.insert(column.to_string(), value);
        Ok(())
    }

    fn register_columns(&mut self, row: &TableRow) {
        let mut unseen: Vec<&String> = row.keys().filter(|k| !self.has_column(k)).collect();
        unseen.sort();
        for name in unseen {
            self.columns.push(name.clone());
        }
    }
}
