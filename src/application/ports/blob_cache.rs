//! Blob Cache Port - 页面内容缓存
//!
//! 定义页面二进制内容缓存的抽象接口，具体实现使用 Sled。
//! 部分运行环境没有持久化能力，此时实现应报告不可用而非报错。

use async_trait::async_trait;
use thiserror::Error;

/// Blob Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache unavailable")]
    Unavailable,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache full: {size} bytes would exceed limit of {limit} bytes")]
    CapacityExceeded { size: u64, limit: u64 },
}

/// 缓存中的页面内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl CachedBlob {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size_bytes: u64,
    pub max_size_bytes: u64,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Blob Cache Port
///
/// key → 二进制内容，所有操作幂等，`put` 覆盖已有 key。
/// 写入成功的内容在下一次 `clear_all` 之前不会消失；容量不足时 `put` 返回错误
#[async_trait]
pub trait BlobCachePort: Send + Sync {
    /// 当前环境是否提供持久缓存
    fn is_available(&self) -> bool;

    /// 存储页面内容
    async fn put(&self, key: &str, blob: CachedBlob) -> Result<(), CacheError>;

    /// 根据 key 获取页面内容
    async fn get(&self, key: &str) -> Result<Option<CachedBlob>, CacheError>;

    /// 清空全部缓存
    async fn clear_all(&self) -> Result<(), CacheError>;

    /// 获取缓存统计信息
    async fn stats(&self) -> CacheStats;
}
