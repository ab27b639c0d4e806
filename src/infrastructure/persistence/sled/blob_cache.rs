//! Sled-based Page Blob Cache Implementation

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Tree;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{BlobCachePort, CacheError, CacheStats, CachedBlob};

/// 页面缓存所在的 tree
const PAGES_TREE: &str = "pages";

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InternalCacheEntry {
    bytes: Vec<u8>,
    content_type: String,
    size_bytes: u64,
    content_hash: String,
    created_at: i64,
}

/// Sled 页面缓存
///
/// `max_size_bytes > 0` 时为硬上限：超出时拒绝写入，已写入的页面不会被淘汰
pub struct SledBlobCache {
    tree: Tree,
    max_size_bytes: u64,
    current_size: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl SledBlobCache {
    /// 在已打开的数据库上创建缓存
    pub fn new(db: &sled::Db, max_size_bytes: u64) -> Result<Self, CacheError> {
        let tree = db
            .open_tree(PAGES_TREE)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        let current_size = Self::calculate_total_size(&tree)?;

        tracing::info!(
            max_size_bytes = max_size_bytes,
            current_size = current_size,
            entries = tree.len(),
            "SledBlobCache initialized"
        );

        Ok(Self {
            tree,
            max_size_bytes,
            current_size: AtomicU64::new(current_size),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    /// 计算所有条目的总大小
    fn calculate_total_size(tree: &Tree) -> Result<u64, CacheError> {
        let mut total = 0u64;
        for item in tree.iter() {
            let (_, value) = item.map_err(|e| CacheError::DatabaseError(e.to_string()))?;
            if let Ok(entry) = bincode::deserialize::<InternalCacheEntry>(&value) {
                total += entry.size_bytes;
            }
        }
        Ok(total)
    }

    /// 已有条目的大小（不存在时为 0）
    fn stored_size(&self, key: &str) -> Result<u64, CacheError> {
        let old = self
            .tree
            .get(key)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(old
            .and_then(|v| bincode::deserialize::<InternalCacheEntry>(&v).ok())
            .map(|entry| entry.size_bytes)
            .unwrap_or(0))
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.tree
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl BlobCachePort for SledBlobCache {
    fn is_available(&self) -> bool {
        true
    }

    async fn put(&self, key: &str, blob: CachedBlob) -> Result<(), CacheError> {
        let size = blob.bytes.len() as u64;
        let replaced = self.stored_size(key)?;

        if self.max_size_bytes > 0 {
            let projected = self
                .current_size
                .load(Ordering::Relaxed)
                .saturating_sub(replaced)
                + size;
            if projected > self.max_size_bytes {
                tracing::debug!(
                    cache_key = %key,
                    size_bytes = size,
                    max_size_bytes = self.max_size_bytes,
                    "Page rejected, cache full"
                );
                return Err(CacheError::CapacityExceeded {
                    size: projected,
                    limit: self.max_size_bytes,
                });
            }
        }

        let entry = InternalCacheEntry {
            content_hash: format!("{:x}", md5::compute(&blob.bytes)),
            bytes: blob.bytes,
            content_type: blob.content_type,
            size_bytes: size,
            created_at: Utc::now().timestamp_millis(),
        };

        let entry_bytes =
            bincode::serialize(&entry).map_err(|e| CacheError::SerializationError(e.to_string()))?;

        self.tree
            .insert(key, entry_bytes)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        self.current_size.fetch_sub(replaced, Ordering::Relaxed);
        self.current_size.fetch_add(size, Ordering::Relaxed);

        tracing::debug!(
            cache_key = %key,
            size_bytes = size,
            content_hash = %entry.content_hash,
            "Page cached"
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CachedBlob>, CacheError> {
        match self.tree.get(key) {
            Ok(Some(data)) => {
                let entry: InternalCacheEntry = bincode::deserialize(&data)
                    .map_err(|e| CacheError::SerializationError(e.to_string()))?;
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(CachedBlob::new(entry.bytes, entry.content_type)))
            }
            Ok(None) => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => Err(CacheError::DatabaseError(e.to_string())),
        }
    }

    async fn clear_all(&self) -> Result<(), CacheError> {
        let entries = self.tree.len();
        self.tree
            .clear()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        self.current_size.store(0, Ordering::Relaxed);
        tracing::info!(entries = entries, "Page cache cleared");
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.tree.len(),
            total_size_bytes: self.current_size.load(Ordering::Relaxed),
            max_size_bytes: self.max_size_bytes,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}
