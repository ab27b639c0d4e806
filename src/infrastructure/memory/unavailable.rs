//! 无持久化能力的环境
//!
//! 读取总是未命中，写入静默忽略，`is_available()` 返回 false

use async_trait::async_trait;

use crate::application::ports::{
    BlobCachePort, CacheError, CacheStats, CachedBlob, StateStoreError, StateStorePort,
};

/// 不可用的页面缓存
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBlobCache;

#[async_trait]
impl BlobCachePort for UnavailableBlobCache {
    fn is_available(&self) -> bool {
        false
    }

    async fn put(&self, _key: &str, _blob: CachedBlob) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<CachedBlob>, CacheError> {
        Ok(None)
    }

    async fn clear_all(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// 不可用的会话记录存储
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStateStore;

#[async_trait]
impl StateStorePort for UnavailableStateStore {
    fn is_available(&self) -> bool {
        false
    }

    async fn read(&self, _key: &str) -> Result<Option<String>, StateStoreError> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _value: String) -> Result<(), StateStoreError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StateStoreError> {
        Ok(())
    }
}
