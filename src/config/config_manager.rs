// ==========================================
// маршрутная карта - 配置管理器
// ==========================================
// 职责: 配置加载、校验、保存
// 存储: JSON 文件（缺失时使用默认配置）
// 路径: $ROUTE_CARD_CONFIG > 用户配置目录/route-card/config.json
// ==========================================

use crate::config::route_card_config::RouteCardConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "ROUTE_CARD_CONFIG";

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 ROUTE_CARD_CONFIG（非空时）
/// - 用户配置目录/route-card/config.json
/// - 回退: ./route_card_config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("route-card").join(CONFIG_FILE_NAME),
        None => PathBuf::from("./route_card_config.json"),
    }
}

// ==========================================
// ConfigManager
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    config: RouteCardConfig,
}

impl ConfigManager {
    /// 使用内存中的配置创建（不绑定文件）
    pub fn new(config: RouteCardConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { path: None, config })
    }

    /// 从文件加载配置
    ///
    /// 文件不存在时使用默认配置；存在但无法解析时报错
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let config: RouteCardConfig =
                serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            info!(path = %path.display(), "已加载配置文件");
            config
        } else {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            RouteCardConfig::default()
        };

        config.validate()?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            config,
        })
    }

    /// 从默认路径加载
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(default_config_path())
    }

    pub fn config(&self) -> &RouteCardConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 替换配置（校验通过后生效）
    pub fn update(&mut self, config: RouteCardConfig) -> ConfigResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// 保存到指定路径（自动创建父目录）
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let write_err = |e: &dyn std::fmt::Display| ConfigError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err(&e))?;
        }
        let json = serde_json::to_string_pretty(&self.config).map_err(|e| write_err(&e))?;
        fs::write(path, json).map_err(|e| write_err(&e))?;

        info!(path = %path.display(), "配置已保存");
        Ok(())
    }

    /// 保存到加载时的路径
    pub fn save(&self) -> ConfigResult<()> {
        let path = self.path.clone().unwrap_or_else(default_config_path);
        self.save_to(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            path: None,
            config: RouteCardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(manager.config(), &RouteCardConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = RouteCardConfig::default();
        config.pagination.first_page_capacity = 12;
        config.locale = "en".to_string();
        let manager = ConfigManager::new(config.clone()).unwrap();
        manager.save_to(&path).unwrap();

        let reloaded = ConfigManager::load(&path).unwrap();
        assert_eq!(reloaded.config(), &config);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ConfigManager::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_value_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "pagination": { "first_page_capacity": 0 } }"#).unwrap();

        assert!(matches!(
            ConfigManager::load(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
