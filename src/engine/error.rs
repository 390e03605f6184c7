// ==========================================
// маршрутная карта - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 合并错误 =====
    #[error("两表缺少共同合并键 '{key}'，按位置合并已被策略禁止")]
    PositionalMergeRejected { key: String },

    #[error("按位置合并行数不一致: 元件表 {elements} 行, 工艺表 {process} 行")]
    RowCountMismatch { elements: usize, process: usize },

    // ===== 分页错误 =====
    #[error("页容量必须大于 0: {field}")]
    InvalidCapacity { field: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
