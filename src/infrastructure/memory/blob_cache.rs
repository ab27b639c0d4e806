//! In-Memory Blob Cache Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{BlobCachePort, CacheError, CacheStats, CachedBlob};

/// 内存页面缓存（进程内有效，主要用于测试）
#[derive(Default)]
pub struct InMemoryBlobCache {
    blobs: DashMap<String, CachedBlob>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl InMemoryBlobCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobCachePort for InMemoryBlobCache {
    fn is_available(&self) -> bool {
        true
    }

    async fn put(&self, key: &str, blob: CachedBlob) -> Result<(), CacheError> {
        self.blobs.insert(key.to_string(), blob);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CachedBlob>, CacheError> {
        let blob = self.blobs.get(key).map(|b| b.clone());
        let counter = if blob.is_some() {
            &self.hit_count
        } else {
            &self.miss_count
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(blob)
    }

    async fn clear_all(&self) -> Result<(), CacheError> {
        self.blobs.clear();
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.blobs.len(),
            total_size_bytes: self.blobs.iter().map(|b| b.bytes.len() as u64).sum(),
            max_size_bytes: 0,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blob_lifecycle() {
        let cache = InMemoryBlobCache::new();

        cache.put("k", CachedBlob::new(vec![1, 2], "image/png")).await.unwrap();
        cache.put("k", CachedBlob::new(vec![3], "image/png")).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().unwrap().bytes, vec![3]);
        assert!(cache.get("x").await.unwrap().is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);

        cache.clear_all().await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
    }
}
