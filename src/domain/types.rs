// ==========================================
// маршрутная карта - 领域类型定义
// ==========================================
// 依据: ГОСТ 3.1118 行类型代码
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 行类型 (Row Type)
// ==========================================
// 序列化格式: 单字母西里尔代码（与文档一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowType {
    #[serde(rename = "О")]
    Operation, // 工序
    #[serde(rename = "Т")]
    Transition, // 工步（元件）
}

impl RowType {
    /// 单字母代码（西里尔字母 О / Т）
    pub fn code(&self) -> char {
        match self {
            RowType::Operation => 'О',
            RowType::Transition => 'Т',
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 页面类型 (Page Kind)
// ==========================================
// First: 第一页表单（Форма 4）
// Continuation: 续页表单（Форма 3б）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageKind {
    First,
    Continuation,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::First => write!(f, "FIRST"),
            PageKind::Continuation => write!(f, "CONTINUATION"),
        }
    }
}

// ==========================================
// 逻辑字段 (Logical Field)
// ==========================================
// 通过同义列名探测解析的六个逻辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Operation,
    Designator,
    Description,
    Quantity,
    Equipment,
    Material,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::Operation,
        LogicalField::Designator,
        LogicalField::Description,
        LogicalField::Quantity,
        LogicalField::Equipment,
        LogicalField::Material,
    ];
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalField::Operation => "operation",
            LogicalField::Designator => "designator",
            LogicalField::Description => "description",
            LogicalField::Quantity => "quantity",
            LogicalField::Equipment => "equipment",
            LogicalField::Material => "material",
        };
        write!(f, "{}", name)
    }
}
