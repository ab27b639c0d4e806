//! Page Context - Entities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 页面内容句柄
///
/// 克隆共享同一份数据；最后一个克隆被释放时句柄计数减一。
#[derive(Clone)]
pub struct PageContent {
    inner: Arc<ContentInner>,
}

struct ContentInner {
    bytes: Vec<u8>,
    content_type: String,
    live: Arc<AtomicUsize>,
}

impl Drop for ContentInner {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

impl PageContent {
    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.inner.content_type
    }

    pub fn len(&self) -> usize {
        self.inner.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bytes.is_empty()
    }

    /// 两个句柄是否指向同一份内容
    pub fn same_handle(&self, other: &PageContent) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for PageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContent")
            .field("content_type", &self.inner.content_type)
            .field("len", &self.inner.bytes.len())
            .finish()
    }
}

/// 内容句柄登记
///
/// 所有 `PageContent` 都经由这里创建，便于统计仍存活的句柄数量
#[derive(Debug, Clone, Default)]
pub struct ContentHandles {
    live: Arc<AtomicUsize>,
}

impl ContentHandles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Vec<u8>, content_type: impl Into<String>) -> PageContent {
        self.live.fetch_add(1, Ordering::Relaxed);
        PageContent {
            inner: Arc::new(ContentInner {
                bytes,
                content_type: content_type.into(),
                live: self.live.clone(),
            }),
        }
    }

    /// 当前存活的句柄数
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

/// 页面
///
/// - `name`: 压缩包内的相对路径，在同一会话内唯一
/// - `cache_key`: 页面缓存中的 key（缓存可用时）
/// - `data_url`: 缓存不可用时内嵌的自包含编码
#[derive(Debug, Clone)]
pub struct PageEntry {
    pub name: String,
    pub content: PageContent,
    pub cache_key: Option<String>,
    pub data_url: Option<String>,
}

impl PageEntry {
    pub fn new(name: impl Into<String>, content: PageContent) -> Self {
        Self {
            name: name.into(),
            content,
            cache_key: None,
            data_url: None,
        }
    }

    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = Some(cache_key.into());
        self
    }

    pub fn with_data_url(mut self, data_url: impl Into<String>) -> Self {
        self.data_url = Some(data_url.into());
        self
    }
}
