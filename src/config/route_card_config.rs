// ==========================================
// маршрутная карта - 路线卡配置项
// ==========================================
// 职责: 分页容量、合并策略、字段同义名、文档默认值
// 说明: 全部字段带默认值，配置文件只需写需要覆写的项
// ==========================================

use crate::config::config_manager::{ConfigError, ConfigResult};
use crate::domain::route::{DocumentInfo, DEFAULT_DATE_FORMAT, DEFAULT_PRODUCT_NAME};
use crate::engine::{
    EngineResult, MergeOptions, Merger, Paginator, RouteBuildOptions, RouteBuilder,
    TableValidator, CONTINUATION_PAGE_CAPACITY, FIRST_PAGE_CAPACITY,
};
use crate::engine::validator::DEFAULT_REQUIRED_FIELDS;
use crate::i18n::DEFAULT_LOCALE;
use serde::{Deserialize, Serialize};

// ==========================================
// PaginationConfig - 分页容量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub first_page_capacity: usize,
    pub continuation_page_capacity: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            first_page_capacity: FIRST_PAGE_CAPACITY,
            continuation_page_capacity: CONTINUATION_PAGE_CAPACITY,
        }
    }
}

// ==========================================
// RouteCardConfig - 全量配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteCardConfig {
    pub pagination: PaginationConfig,
    pub merge: MergeOptions,
    pub route: RouteBuildOptions,
    pub required_fields: Vec<String>,
    pub locale: String,
    pub default_product_name: String,
    pub date_format: String,
}

impl Default for RouteCardConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            merge: MergeOptions::default(),
            route: RouteBuildOptions::default(),
            required_fields: DEFAULT_REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            locale: DEFAULT_LOCALE.to_string(),
            default_product_name: DEFAULT_PRODUCT_NAME.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl RouteCardConfig {
    /// 校验配置值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pagination.first_page_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pagination.first_page_capacity".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.pagination.continuation_page_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pagination.continuation_page_capacity".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.merge.key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "merge.key".to_string(),
                message: "合并键不能为空".to_string(),
            });
        }
        if self.date_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "date_format".to_string(),
                message: "日期格式不能为空".to_string(),
            });
        }
        Ok(())
    }

    pub fn merger(&self) -> Merger {
        Merger::new(self.merge.clone())
    }

    pub fn route_builder(&self) -> RouteBuilder {
        RouteBuilder::new(self.route.clone())
    }

    pub fn paginator(&self) -> EngineResult<Paginator> {
        Paginator::new(
            self.pagination.first_page_capacity,
            self.pagination.continuation_page_capacity,
        )
    }

    pub fn validator(&self) -> TableValidator {
        TableValidator::new(
            self.required_fields.clone(),
            self.merge.key.clone(),
            self.locale.clone(),
        )
    }

    /// 未提供文档信息时使用的默认值（日期取当天）
    pub fn default_document_info(&self) -> DocumentInfo {
        DocumentInfo::with_defaults(&self.default_product_name, &self.date_format)
    }
}
