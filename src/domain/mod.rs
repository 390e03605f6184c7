// ==========================================
// маршрутная карта - 领域层
// ==========================================
// 职责: 表格、路线卡行/页、文档元数据
// ==========================================

pub mod route;
pub mod table;
pub mod types;

// 重导出核心类型
pub use route::{DocumentInfo, RouteCardDocument, RoutePage, RouteRow};
pub use table::{CellValue, RawTable, TableEditError, TableRow};
pub use types::{LogicalField, PageKind, RowType};
