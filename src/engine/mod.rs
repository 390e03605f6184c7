// ==========================================
// маршрутная карта - 引擎层
// ==========================================
// 职责: 合并 → 分类/分组 → 分页（纯函数，无缓存、无全局状态）
// 流程: Merger → RouteBuilder → Paginator
// ==========================================

pub mod error;
pub mod field_resolver;
pub mod merger;
pub mod paginator;
pub mod route_builder;
pub mod validator;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use field_resolver::{FieldResolver, FieldSynonyms, ResolvedField};
pub use merger::{merge, JoinOrder, MergeOptions, MergeStrategy, MergedTable, Merger, PositionalFallback};
pub use paginator::{paginate, Paginator, CONTINUATION_PAGE_CAPACITY, FIRST_PAGE_CAPACITY};
pub use route_builder::{
    build_route_rows, normalize_quantity, DuplicateDesignatorPolicy, RouteBuildOptions,
    RouteBuildOutcome, RouteBuilder,
};
pub use validator::{TableValidator, ValidationLevel, ValidationMessage};
