// ==========================================
// маршрутная карта - 数据校验器（预检）
// ==========================================
// 职责: 生成前的提示性检查，只返回消息，不阻断生成
// 规则:
//   - 必填列（存在时）不得含空值
//   - 合并键值重复时给出提示
// ==========================================

use crate::domain::table::{CellValue, RawTable};
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认必填列
pub const DEFAULT_REQUIRED_FIELDS: [&str; 2] = ["Designator", "Footprint"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationLevel {
    Warning, // 警告（可能影响文档内容）
    Info,    // 提示（仅记录）
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub level: ValidationLevel,
    pub field: String,
    pub rows: Vec<usize>, // 涉及的行（0 起）
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct TableValidator {
    required_fields: Vec<String>,
    key: String,
    locale: String,
}

impl TableValidator {
    pub fn new(required_fields: Vec<String>, key: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            required_fields,
            key: key.into(),
            locale: locale.into(),
        }
    }

    pub fn validate(&self, table: &RawTable) -> Vec<ValidationMessage> {
        let mut messages = self.validate_required_fields(table);
        messages.extend(self.validate_duplicate_keys(table));
        messages
    }

    /// 必填列空值检查（列不存在时跳过）
    fn validate_required_fields(&self, table: &RawTable) -> Vec<ValidationMessage> {
        self.required_fields
            .iter()
            .filter(|field| table.has_column(field))
            .filter_map(|field| {
                let rows: Vec<usize> = table
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.get(field.as_str()).map_or(true, CellValue::is_blank))
                    .map(|(idx, _)| idx)
                    .collect();

                if rows.is_empty() {
                    return None;
                }
                Some(ValidationMessage {
                    level: ValidationLevel::Warning,
                    field: field.clone(),
                    rows,
                    message: t_with_args("validation.empty_field", &self.locale, &[("field", field.as_str())]),
                })
            })
            .collect()
    }

    fn validate_duplicate_keys(&self, table: &RawTable) -> Vec<ValidationMessage> {
        if !table.has_column(&self.key) {
            return Vec::new();
        }

        let mut occurrences: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, row) in table.rows().iter().enumerate() {
            if let Some(value) = row.get(&self.key).and_then(CellValue::as_text) {
                occurrences.entry(value).or_default().push(idx);
            }
        }

        occurrences
            .into_iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(value, rows)| {
                let count = rows.len().to_string();
                ValidationMessage {
                    level: ValidationLevel::Info,
                    field: self.key.clone(),
                    message: t_with_args(
                        "validation.duplicate_designator",
                        &self.locale,
                        &[("value", value.as_str()), ("count", count.as_str())],
                    ),
                    rows,
                }
            })
            .collect()
    }
}

impl Default for TableValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            crate::engine::merger::DEFAULT_MERGE_KEY,
            crate::i18n::DEFAULT_LOCALE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_required_field() {
        let table = RawTable::from_records(
            vec!["Designator", "Footprint"],
            vec![vec!["R1", "0402"], vec!["R2", ""], vec!["R3", "nan"]],
        );
        let messages = TableValidator::default().validate(&table);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].field, "Footprint");
        assert_eq!(messages[0].rows, vec![1, 2]);
        assert_eq!(messages[0].message, "Найдены пустые значения в поле Footprint");
    }

    #[test]
    fn test_missing_required_column_is_skipped() {
        let table = RawTable::from_records(vec!["Designator"], vec![vec!["R1"]]);
        assert!(TableValidator::default().validate(&table).is_empty());
    }

    #[test]
    fn test_duplicate_designators_reported_as_info() {
        let table = RawTable::from_records(
            vec!["Designator", "Footprint"],
            vec![vec!["R1", "0402"], vec!["R1", "0402"]],
        );
        let messages = TableValidator::new(vec![], "Designator", "en").validate(&table);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, ValidationLevel::Info);
        assert_eq!(messages[0].message, "Designator R1 occurs 2 times");
    }
}
