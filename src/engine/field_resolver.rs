// ==========================================
// маршрутная карта - 字段解析器
// ==========================================
// 职责: 逻辑字段 ← 多个同义物理列名（英文 / 俄文两套命名）
// 优先级: 精确同义名 → 忽略大小写 → 带侧后缀（_proc / _elem）
// ==========================================

use crate::domain::table::{CellValue, TableRow};
use crate::domain::types::LogicalField;
use crate::engine::merger::{ELEMENTS_SUFFIX, PROCESS_SUFFIX};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ==========================================
// FieldSynonyms - 同义列名表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSynonyms {
    pub operation: Vec<String>,
    pub designator: Vec<String>,
    pub description: Vec<String>,
    pub quantity: Vec<String>,
    pub equipment: Vec<String>,
    pub material: Vec<String>,
}

impl Default for FieldSynonyms {
    fn default() -> Self {
        Self {
            operation: names(&["Operation", "Процесс", "operation"]),
            designator: names(&["Designator", "Позиционное обозначение", "designator"]),
            description: names(&["Description", "Наименование", "description", "Comment"]),
            quantity: names(&["Quantity", "Количество", "quantity"]),
            equipment: names(&["Equipment", "Оборудование", "equipment"]),
            material: names(&["Material", "Материал", "material"]),
        }
    }
}

impl FieldSynonyms {
    pub fn for_field(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::Operation => &self.operation,
            LogicalField::Designator => &self.designator,
            LogicalField::Description => &self.description,
            LogicalField::Quantity => &self.quantity,
            LogicalField::Equipment => &self.equipment,
            LogicalField::Material => &self.material,
        }
    }
}

// ==========================================
// ResolvedField - 解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedField {
    Present(String),
    Absent,
}

impl ResolvedField {
    pub fn is_present(&self) -> bool {
        matches!(self, ResolvedField::Present(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            ResolvedField::Present(v) => Some(v.as_str()),
            ResolvedField::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            ResolvedField::Present(v) => Some(v),
            ResolvedField::Absent => None,
        }
    }

    /// 缺失时返回空字符串（用于展示列）
    pub fn or_empty(&self) -> String {
        self.as_deref().unwrap_or_default().to_string()
    }
}

// 工艺侧字段优先取 _proc，元件侧字段优先取 _elem
fn side_preference(field: LogicalField) -> [&'static str; 2] {
    match field {
        LogicalField::Operation | LogicalField::Equipment | LogicalField::Material => {
            [PROCESS_SUFFIX, ELEMENTS_SUFFIX]
        }
        LogicalField::Designator | LogicalField::Description | LogicalField::Quantity => {
            [ELEMENTS_SUFFIX, PROCESS_SUFFIX]
        }
    }
}

fn push_unique(planned: &mut Vec<String>, col: &String) {
    if !planned.contains(col) {
        planned.push(col.clone());
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ==========================================
// FieldResolver - 按表列名预先计算的探测顺序
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldResolver {
    candidates: HashMap<LogicalField, Vec<String>>,
}

impl FieldResolver {
    pub fn for_columns(columns: &[String], synonyms: &FieldSynonyms) -> Self {
        let candidates = LogicalField::ALL
            .iter()
            .map(|&field| (field, Self::plan_field(field, columns, synonyms)))
            .collect();
        Self { candidates }
    }

    fn plan_field(field: LogicalField, columns: &[String], synonyms: &FieldSynonyms) -> Vec<String> {
        let mut planned: Vec<String> = Vec::new();
        let synonyms = synonyms.for_field(field);

        // 第一轮: 精确匹配
        for syn in synonyms {
            if let Some(col) = columns.iter().find(|c| *c == syn) {
                push_unique(&mut planned, col);
            }
        }

        // 第二轮: 忽略大小写与首尾空白
        for syn in synonyms {
            let wanted = normalize_name(syn);
            for col in columns.iter().filter(|c| normalize_name(c) == wanted) {
                push_unique(&mut planned, col);
            }
        }

        // 第三轮: 合并产生的侧后缀列
        for syn in synonyms {
            for suffix in side_preference(field) {
                let wanted = normalize_name(&format!("{}{}", syn, suffix));
                for col in columns.iter().filter(|c| normalize_name(c) == wanted) {
                    push_unique(&mut planned, col);
                }
            }
        }

        planned
    }

    pub fn candidates(&self, field: LogicalField) -> &[String] {
        self.candidates
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 第一个存在且非空白（非 "nan"）的候选列取值
    pub fn resolve(&self, row: &TableRow, field: LogicalField) -> ResolvedField {
        self.candidates(field)
            .iter()
            .find_map(|col| row.get(col).and_then(CellValue::as_text))
            .map(ResolvedField::Present)
            .unwrap_or(ResolvedField::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(list: &[&str]) -> Vec<String> {
        names(list)
    }

    fn row(pairs: &[(&str, &str)]) -> TableRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_first_non_blank_synonym_wins() {
        let cols = columns(&["Description", "Comment"]);
        let resolver = FieldResolver::for_columns(&cols, &FieldSynonyms::default());

        let r = row(&[("Description", "nan"), ("Comment", "10k")]);
        assert_eq!(
            resolver.resolve(&r, LogicalField::Description),
            ResolvedField::Present("10k".to_string())
        );
    }

    #[test]
    fn test_russian_vocabulary() {
        let cols = columns(&["Процесс", "Позиционное обозначение", "Количество"]);
        let resolver = FieldResolver::for_columns(&cols, &FieldSynonyms::default());
        let r = row(&[
            ("Процесс", "Пайка"),
            ("Позиционное обозначение", "R5"),
            ("Количество", "2"),
        ]);

        assert_eq!(resolver.resolve(&r, LogicalField::Operation).as_deref(), Some("Пайка"));
        assert_eq!(resolver.resolve(&r, LogicalField::Designator).as_deref(), Some("R5"));
        assert_eq!(resolver.resolve(&r, LogicalField::Quantity).as_deref(), Some("2"));
    }

    #[test]
    fn test_case_insensitive_after_exact() {
        let cols = columns(&["EQUIPMENT "]);
        let resolver = FieldResolver::for_columns(&cols, &FieldSynonyms::default());
        assert_eq!(resolver.candidates(LogicalField::Equipment), &["EQUIPMENT "]);
    }

    #[test]
    fn test_side_qualified_columns() {
        let cols = columns(&["Designator", "Operation_elem", "Operation_proc"]);
        let resolver = FieldResolver::for_columns(&cols, &FieldSynonyms::default());
        assert_eq!(
            resolver.candidates(LogicalField::Operation),
            &["Operation_proc", "Operation_elem"]
        );
    }

    #[test]
    fn test_absent_when_no_column() {
        let cols = columns(&["Footprint"]);
        let resolver = FieldResolver::for_columns(&cols, &FieldSynonyms::default());
        let r = row(&[("Footprint", "0402")]);
        assert_eq!(resolver.resolve(&r, LogicalField::Material), ResolvedField::Absent);
    }
}
