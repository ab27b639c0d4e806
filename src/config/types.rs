//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::{ArchiveLoaderConfig, SessionStoreConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 压缩包导入配置
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// 阅读会话配置
    #[serde(default)]
    pub session: SessionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 数据目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// 是否启用页面缓存与会话记录持久化
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// 页面缓存上限（字节），0 表示不限制；超出上限的页面直接内嵌为 data URL
    #[serde(default)]
    pub max_cache_bytes: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_enabled: true,
            max_cache_bytes: 0,
        }
    }
}

impl StorageConfig {
    /// sled 数据库路径
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("zipview.sled")
    }
}

/// 压缩包导入配置
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// 目录描述文件名
    #[serde(default = "default_toc_file_name")]
    pub toc_file_name: String,

    /// 单个条目的最大解压大小（字节），0 表示不限制
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,
}

fn default_toc_file_name() -> String {
    "toc.json".to_string()
}

fn default_max_entry_bytes() -> u64 {
    256 * 1024 * 1024
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            toc_file_name: default_toc_file_name(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

impl From<&ArchiveConfig> for ArchiveLoaderConfig {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            toc_file_name: config.toc_file_name.clone(),
            max_entry_bytes: config.max_entry_bytes,
        }
    }
}

/// 阅读会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// 最近打开列表长度
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_recent_limit() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl From<&SessionConfig> for SessionStoreConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            recent_limit: config.recent_limit,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert!(config.storage.cache_enabled);
        assert_eq!(config.archive.toc_file_name, "toc.json");
        assert_eq!(config.session.recent_limit, 10);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_database_path() {
        let config = StorageConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("data/zipview.sled"));
    }

    #[test]
    fn test_into_loader_config() {
        let archive = ArchiveConfig {
            toc_file_name: "index.json".to_string(),
            max_entry_bytes: 42,
        };
        let loader = ArchiveLoaderConfig::from(&archive);
        assert_eq!(loader.toc_file_name, "index.json");
        assert_eq!(loader.max_entry_bytes, 42);
    }
}
