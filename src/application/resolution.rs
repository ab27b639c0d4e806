//! Page Resolution - 恢复会话时的页面内容解析
//!
//! 按固定顺序尝试各个解析器，每个解析器给出明确的命中/未命中:
//! 1. 缓存 key → BlobCachePort
//! 2. 内嵌 data URL
//! 3. 原始引用（本地文件路径）

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{BlobCachePort, PersistedPage};
use crate::domain::page::{decode_data_url, ContentHandles, PageContent};

/// 单个解析器的结果
#[derive(Debug)]
pub enum Resolution {
    Hit(PageContent),
    Miss,
}

/// 页面内容解析器
#[async_trait]
pub trait PageResolver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, page: &PersistedPage) -> Resolution;
}

/// 通过缓存 key 从页面缓存读取
pub struct CacheKeyResolver {
    cache: Arc<dyn BlobCachePort>,
    handles: ContentHandles,
}

impl CacheKeyResolver {
    pub fn new(cache: Arc<dyn BlobCachePort>, handles: ContentHandles) -> Self {
        Self { cache, handles }
    }
}

#[async_trait]
impl PageResolver for CacheKeyResolver {
    fn name(&self) -> &'static str {
        "cache_key"
    }

    async fn resolve(&self, page: &PersistedPage) -> Resolution {
        let Some(key) = page.cache_key.as_deref() else {
            return Resolution::Miss;
        };
        if !self.cache.is_available() {
            return Resolution::Miss;
        }
        match self.cache.get(key).await {
            Ok(Some(blob)) => Resolution::Hit(self.handles.create(blob.bytes, blob.content_type)),
            Ok(None) => Resolution::Miss,
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Cache read failed");
                Resolution::Miss
            }
        }
    }
}

/// 解码内嵌的 data URL
pub struct EmbeddedDataUrlResolver {
    handles: ContentHandles,
}

impl EmbeddedDataUrlResolver {
    pub fn new(handles: ContentHandles) -> Self {
        Self { handles }
    }
}

#[async_trait]
impl PageResolver for EmbeddedDataUrlResolver {
    fn name(&self) -> &'static str {
        "data_url"
    }

    async fn resolve(&self, page: &PersistedPage) -> Resolution {
        let Some(data_url) = page.data_url.as_deref() else {
            return Resolution::Miss;
        };
        match decode_data_url(data_url) {
            Some((mime, bytes)) => Resolution::Hit(self.handles.create(bytes, mime)),
            None => {
                tracing::warn!(page = %page.name, "Malformed data URL");
                Resolution::Miss
            }
        }
    }
}

/// 直接读取原始引用指向的本地文件
pub struct RawReferenceResolver {
    handles: ContentHandles,
}

impl RawReferenceResolver {
    pub fn new(handles: ContentHandles) -> Self {
        Self { handles }
    }
}

#[async_trait]
impl PageResolver for RawReferenceResolver {
    fn name(&self) -> &'static str {
        "raw_reference"
    }

    async fn resolve(&self, page: &PersistedPage) -> Resolution {
        let Some(url) = page.url.as_deref() else {
            return Resolution::Miss;
        };
        let path = url.strip_prefix("file://").unwrap_or(url);
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let content_type = crate::domain::page::content_type_for(&page.name);
                Resolution::Hit(self.handles.create(bytes, content_type))
            }
            Err(e) => {
                tracing::debug!(page = %page.name, path = %path, error = %e, "Raw reference unreadable");
                Resolution::Miss
            }
        }
    }
}

/// 解析器链
pub struct ResolverChain {
    resolvers: Vec<Box<dyn PageResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn PageResolver>>) -> Self {
        Self { resolvers }
    }

    /// 标准顺序: 缓存 key → data URL → 原始引用
    pub fn standard(cache: Arc<dyn BlobCachePort>, handles: ContentHandles) -> Self {
        Self::new(vec![
            Box::new(CacheKeyResolver::new(cache, handles.clone())),
            Box::new(EmbeddedDataUrlResolver::new(handles.clone())),
            Box::new(RawReferenceResolver::new(handles)),
        ])
    }

    /// 依次尝试，返回第一个命中的内容及解析器名
    pub async fn resolve(&self, page: &PersistedPage) -> Option<(PageContent, &'static str)> {
        for resolver in &self.resolvers {
            if let Resolution::Hit(content) = resolver.resolve(page).await {
                return Some((content, resolver.name()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CachedBlob;
    use crate::domain::page::encode_data_url;
    use crate::infrastructure::memory::{InMemoryBlobCache, UnavailableBlobCache};

    fn page(name: &str) -> PersistedPage {
        PersistedPage {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cache_key_wins_over_data_url() {
        let cache = Arc::new(InMemoryBlobCache::new());
        cache.put("k/a.png", CachedBlob::new(vec![1], "image/png")).await.unwrap();
        let chain = ResolverChain::standard(cache, ContentHandles::new());

        let mut p = page("a.png");
        p.cache_key = Some("k/a.png".to_string());
        p.data_url = Some(encode_data_url("image/png", &[2]));

        let (content, source) = chain.resolve(&p).await.unwrap();
        assert_eq!(source, "cache_key");
        assert_eq!(content.bytes(), &[1]);
    }

    #[tokio::test]
    async fn test_falls_back_to_data_url_on_cache_miss() {
        let chain = ResolverChain::standard(Arc::new(InMemoryBlobCache::new()), ContentHandles::new());

        let mut p = page("a.png");
        p.cache_key = Some("k/missing.png".to_string());
        p.data_url = Some(encode_data_url("image/jpeg", &[7, 8]));

        let (content, source) = chain.resolve(&p).await.unwrap();
        assert_eq!(source, "data_url");
        assert_eq!(content.content_type(), "image/jpeg");
        assert_eq!(content.bytes(), &[7, 8]);
    }

    #[tokio::test]
    async fn test_raw_reference_is_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.png");
        std::fs::write(&path, [9u8; 3]).unwrap();

        let chain = ResolverChain::standard(Arc::new(UnavailableBlobCache), ContentHandles::new());
        let mut p = page("c.png");
        p.cache_key = Some("k/c.png".to_string());
        p.data_url = Some("data:image/png;base64,!!".to_string());
        p.url = Some(format!("file://{}", path.display()));

        let (content, source) = chain.resolve(&p).await.unwrap();
        assert_eq!(source, "raw_reference");
        assert_eq!(content.bytes(), &[9, 9, 9]);
    }

    #[tokio::test]
    async fn test_unresolvable_page() {
        let chain = ResolverChain::standard(Arc::new(InMemoryBlobCache::new()), ContentHandles::new());
        assert!(chain.resolve(&page("ghost.png")).await.is_none());
    }

    #[tokio::test]
    async fn test_each_resolver_reports_miss_in_isolation() {
        let handles = ContentHandles::new();
        let p = page("a.png");
        assert!(matches!(
            EmbeddedDataUrlResolver::new(handles.clone()).resolve(&p).await,
            Resolution::Miss
        ));
        assert!(matches!(
            RawReferenceResolver::new(handles.clone()).resolve(&p).await,
            Resolution::Miss
        ));
        assert!(matches!(
            CacheKeyResolver::new(Arc::new(InMemoryBlobCache::new()), handles).resolve(&p).await,
            Resolution::Miss
        ));
    }
}
