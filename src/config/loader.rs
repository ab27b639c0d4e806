//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 环境变量前缀 `ZIPVIEW_`，层级分隔符 `__`
///
/// # 环境变量示例
/// - `ZIPVIEW_STORAGE__DATA_DIR=/var/lib/zipview`
/// - `ZIPVIEW_STORAGE__CACHE_ENABLED=false`
/// - `ZIPVIEW_ARCHIVE__MAX_ENTRY_BYTES=0`
/// - `ZIPVIEW_SESSION__RECENT_LIMIT=20`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("storage.data_dir", "data")?
        .set_default("storage.cache_enabled", true)?
        .set_default("storage.max_cache_bytes", 0)?
        .set_default("archive.toc_file_name", "toc.json")?
        .set_default("archive.max_entry_bytes", 256_u64 * 1024 * 1024)?
        .set_default("session.recent_limit", 10)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("ZIPVIEW")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.storage.cache_enabled && config.storage.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty when cache is enabled".to_string(),
        ));
    }

    if config.archive.toc_file_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TOC file name cannot be empty".to_string(),
        ));
    }

    if config.session.recent_limit == 0 {
        return Err(ConfigError::ValidationError(
            "Recent list limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Data Directory: {:?}", config.storage.data_dir);
    tracing::info!("Cache Enabled: {}", config.storage.cache_enabled);
    if config.storage.cache_enabled {
        tracing::info!("Database: {:?}", config.storage.database_path());
        tracing::info!("Max Cache Bytes: {}", config.storage.max_cache_bytes);
    }
    tracing::info!("TOC File Name: {}", config.archive.toc_file_name);
    tracing::info!("Max Entry Bytes: {}", config.archive.max_entry_bytes);
    tracing::info!("Recent Limit: {}", config.session.recent_limit);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
