// ==========================================
// маршрутная карта - 配置层
// ==========================================
// 职责: 路线卡生成配置管理（JSON 文件 + 默认值）
// ==========================================

pub mod config_manager;
pub mod route_card_config;

// 重导出核心配置类型
pub use config_manager::{default_config_path, ConfigError, ConfigManager, ConfigResult, CONFIG_PATH_ENV};
pub use route_card_config::{PaginationConfig, RouteCardConfig};
