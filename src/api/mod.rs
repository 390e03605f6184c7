// ==========================================
// маршрутная карта - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行与编辑器调用
// ==========================================

pub mod error;
pub mod route_card_api;
pub mod session;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use route_card_api::{document_info_or_default, BuiltDocument, GenerationSummary, RouteCardApi};
pub use session::{RouteCardSession, TableSide};
