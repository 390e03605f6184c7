// ==========================================
// маршрутная карта - 路线卡行/页/文档模型
// ==========================================
// 依据: ГОСТ 3.1118 Форма 4 / Форма 3б
// ==========================================

use crate::domain::types::{PageKind, RowType};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 默认产品名称
pub const DEFAULT_PRODUCT_NAME: &str = "Печатный узел";

/// 默认日期格式（dd.mm.YYYY）
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

// ==========================================
// RouteRow - 路线卡行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRow {
    #[serde(rename = "type")]
    pub row_type: RowType,
    pub number: String,      // 类型字母 + 两位序号，如 "О01"
    pub sequence: usize,     // 数字序号（工序/工步共享计数）
    pub name: String,
    pub equipment: String,
    pub material: String,
    pub time_prep: String,   // 预留，当前恒为空
    pub time_piece: String,  // 工步: 数量；工序: 空
    pub source_row: usize,   // 合并表中的来源行（0 起）
}

impl RouteRow {
    /// 行号文本: 类型字母 + 至少两位的零填充序号
    pub fn format_number(row_type: RowType, sequence: usize) -> String {
        format!("{}{:02}", row_type.code(), sequence)
    }

    pub fn is_operation(&self) -> bool {
        self.row_type == RowType::Operation
    }
}

// ==========================================
// RoutePage - 分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePage {
    pub number: usize, // 页码（1 起）
    pub kind: PageKind,
    pub rows: Vec<RouteRow>,
}

impl RoutePage {
    pub fn is_first(&self) -> bool {
        self.kind == PageKind::First
    }
}

// ==========================================
// DocumentInfo - 文档元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub product_name: String,
    pub designation: String,
    pub developer: String,
    pub date: String,
}

impl DocumentInfo {
    pub fn with_defaults(product_name: &str, date_format: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            designation: String::new(),
            developer: String::new(),
            date: Local::now().format(date_format).to_string(),
        }
    }
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_PRODUCT_NAME, DEFAULT_DATE_FORMAT)
    }
}

// ==========================================
// RouteCardDocument - 渲染器输入
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCardDocument {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub info: DocumentInfo,
    pub total_rows: usize,
    pub pages: Vec<RoutePage>,
}

impl RouteCardDocument {
    pub fn new(info: DocumentInfo, pages: Vec<RoutePage>) -> Self {
        let total_rows = pages.iter().map(|p| p.rows.len()).sum();
        Self {
            generation_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            info,
            total_rows,
            pages,
        }
    }

    /// 无数据文档（渲染为"无数据"状态，而非错误）
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RouteRow> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_zero_padded() {
        assert_eq!(RouteRow::format_number(RowType::Operation, 1), "О01");
        assert_eq!(RouteRow::format_number(RowType::Transition, 12), "Т12");
        assert_eq!(RouteRow::format_number(RowType::Transition, 105), "Т105");
    }

    #[test]
    fn test_default_document_info() {
        let info = DocumentInfo::default();
        assert_eq!(info.product_name, "Печатный узел");
        assert!(info.designation.is_empty());
        // dd.mm.YYYY
        assert_eq!(info.date.len(), 10);
        assert_eq!(&info.date[2..3], ".");
    }

    #[test]
    fn test_empty_document() {
        let doc = RouteCardDocument::new(DocumentInfo::default(), Vec::new());
        assert!(doc.is_empty());
        assert_eq!(doc.total_rows, 0);
    }
}
