// ==========================================
// маршрутная карта - API层错误类型
// ==========================================
// 职责: 汇总导入/引擎/渲染/配置/编辑错误，给出显式原因
// ==========================================

use crate::config::ConfigError;
use crate::domain::table::TableEditError;
use crate::engine::EngineError;
use crate::importer::ImportError;
use crate::render::RenderError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("表格编辑失败: {0}")]
    EditError(String),

    // ==========================================
    // 处理错误
    // ==========================================
    #[error("合并失败: {0}")]
    MergeError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("文档输出失败: {0}")]
    RenderError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFormat(ext) => {
                ApiError::InvalidInput(format!("不支持的输入格式: {}", ext))
            }
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidCapacity { .. } => ApiError::ConfigError(err.to_string()),
            EngineError::Other(err) => ApiError::Other(err),
            other => ApiError::MergeError(other.to_string()),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnsupportedFormat(ext) => {
                ApiError::InvalidInput(format!("不支持的输出格式: {}", ext))
            }
            other => ApiError::RenderError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<TableEditError> for ApiError {
    fn from(err: TableEditError) -> Self {
        ApiError::EditError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
