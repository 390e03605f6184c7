// ==========================================
// маршрутная карта - 核心库
// ==========================================
// 依据: ГОСТ 3.1118 маршрутная карта (Форма 4 / Форма 3б)
// 流程: 加载 → 合并 → 分类/分组 → 分页 → 渲染
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与路线卡模型
pub mod domain;

// 导入层 - 外部文件
pub mod importer;

// 引擎层 - 合并 / 构建 / 分页
pub mod engine;

// 配置层
pub mod config;

// 渲染层 - 文档输出
pub mod render;

// API 层
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CellValue, DocumentInfo, LogicalField, PageKind, RawTable, RouteCardDocument, RoutePage,
    RouteRow, RowType, TableEditError, TableRow,
};

pub use engine::{
    build_route_rows, merge, paginate, MergeOptions, MergedTable, Merger, Paginator,
    RouteBuilder, TableValidator,
};

pub use api::{ApiError, ApiResult, RouteCardApi, RouteCardSession, TableSide};
pub use config::{ConfigManager, RouteCardConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "маршрутная карта";
