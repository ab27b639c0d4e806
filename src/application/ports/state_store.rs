//! State Store Port - 持久化小记录
//!
//! 保存缓存清单、上次打开的漫画、显示偏好和最近打开列表。
//! 只保存 JSON 文本，页面二进制内容走 BlobCachePort。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::page::TocItem;

/// 缓存清单
pub const MANIFEST_KEY: &str = "zip-cache-manifest";
/// 上次打开的漫画
pub const LAST_OPENED_KEY: &str = "last-comic";
/// 显示偏好
pub const PREFERENCES_KEY: &str = "zip-viewer-settings";
/// 最近打开列表
pub const RECENT_KEY: &str = "recent-comics";

/// State Store 错误
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("State store unavailable")]
    Unavailable,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 清单中的页面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

/// 缓存清单: 页面名 → 缓存 key，外加目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheManifest {
    pub file_key: String,
    pub pages: Vec<ManifestPage>,
    #[serde(default)]
    pub toc: Vec<TocItem>,
}

/// 上次打开记录中的页面
///
/// 按顺序尝试 `cache_key`、`data_url`、`url` 恢复内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 上次打开的漫画
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOpened {
    pub pages: Vec<PersistedPage>,
    #[serde(default)]
    pub toc: Vec<TocItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<CacheManifest> for LastOpened {
    fn from(manifest: CacheManifest) -> Self {
        Self {
            pages: manifest
                .pages
                .into_iter()
                .map(|p| PersistedPage {
                    name: p.name,
                    cache_key: p.cache_key,
                    ..Default::default()
                })
                .collect(),
            toc: manifest.toc,
            name: None,
        }
    }
}

/// 最近打开的条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub name: String,
    pub opened_at: DateTime<Utc>,
    pub page_count: usize,
    pub size: u64,
}

/// State Store Port
///
/// key → JSON 文本
#[async_trait]
pub trait StateStorePort: Send + Sync {
    /// 当前环境是否提供持久存储
    fn is_available(&self) -> bool;

    async fn read(&self, key: &str) -> Result<Option<String>, StateStoreError>;

    async fn write(&self, key: &str, value: String) -> Result<(), StateStoreError>;

    async fn remove(&self, key: &str) -> Result<(), StateStoreError>;
}

/// 读取并反序列化记录
pub async fn load_record<T: DeserializeOwned>(
    store: &dyn StateStorePort,
    key: &str,
) -> Result<Option<T>, StateStoreError> {
    match store.read(key).await? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StateStoreError::SerializationError(e.to_string())),
        None => Ok(None),
    }
}

/// 序列化并保存记录
pub async fn save_record<T: Serialize + Sync>(
    store: &dyn StateStorePort,
    key: &str,
    record: &T,
) -> Result<(), StateStoreError> {
    let json =
        serde_json::to_string(record).map_err(|e| StateStoreError::SerializationError(e.to_string()))?;
    store.write(key, json).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_opened_json_shape() {
        let record = LastOpened {
            pages: vec![PersistedPage {
                name: "001.png".to_string(),
                cache_key: Some("book.zip:1:0/001.png".to_string()),
                ..Default::default()
            }],
            toc: vec![TocItem::new("001.png", 0)],
            name: Some("book.zip".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["pages"][0]["cacheKey"], "book.zip:1:0/001.png");
        assert!(json["pages"][0].get("dataUrl").is_none());
        assert_eq!(json["toc"][0]["page"], 0);
        assert_eq!(json["name"], "book.zip");
    }

    #[test]
    fn test_manifest_converts_to_last_opened() {
        let manifest = CacheManifest {
            file_key: "k".to_string(),
            pages: vec![ManifestPage {
                name: "a.png".to_string(),
                cache_key: Some("k/a.png".to_string()),
            }],
            toc: Vec::new(),
        };
        let record = LastOpened::from(manifest);
        assert_eq!(record.pages[0].cache_key.as_deref(), Some("k/a.png"));
        assert!(record.name.is_none());
    }
}
