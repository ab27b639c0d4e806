//! Session Store - 阅读会话状态机
//!
//! 显式传递的会话对象（无全局单例）:
//! - 所有修改都通过 `&mut self`，不会交错执行
//! - 页面内容句柄归 SessionStore 所有，替换时先释放旧句柄再安装新句柄
//! - 只持久化显示偏好与清单记录，页面内容经缓存 key 间接恢复

use chrono::Utc;
use std::sync::Arc;

use crate::application::ports::{
    load_record, save_record, BlobCachePort, CacheManifest, LastOpened, PersistedPage,
    RecentEntry, StateStorePort, LAST_OPENED_KEY, MANIFEST_KEY, PREFERENCES_KEY, RECENT_KEY,
};
use crate::application::resolution::ResolverChain;
use crate::domain::page::{ArchiveError, ContentHandles, PageEntry, TocItem};
use crate::domain::session::{Locale, Preferences, ReadingDirection, ReadingSession, Theme};

/// 会话配置
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// 最近打开列表的最大条目数
    pub recent_limit: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self { recent_limit: 10 }
    }
}

/// 阅读会话存储
pub struct SessionStore {
    session: ReadingSession,
    state_store: Arc<dyn StateStorePort>,
    resolvers: ResolverChain,
    handles: ContentHandles,
    config: SessionStoreConfig,
}

impl SessionStore {
    pub fn new(
        blob_cache: Arc<dyn BlobCachePort>,
        state_store: Arc<dyn StateStorePort>,
        handles: ContentHandles,
        config: SessionStoreConfig,
    ) -> Self {
        let resolvers = ResolverChain::standard(blob_cache, handles.clone());
        Self::with_resolvers(state_store, resolvers, handles, config)
    }

    /// 使用自定义解析器链
    pub fn with_resolvers(
        state_store: Arc<dyn StateStorePort>,
        resolvers: ResolverChain,
        handles: ContentHandles,
        config: SessionStoreConfig,
    ) -> Self {
        Self {
            session: ReadingSession::default(),
            state_store,
            resolvers,
            handles,
            config,
        }
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    /// 仍存活的页面内容句柄数
    pub fn live_handles(&self) -> usize {
        self.handles.live_count()
    }

    /// 恢复显示偏好，返回是否找到记录
    pub async fn restore_preferences(&mut self) -> bool {
        if !self.state_store.is_available() {
            return false;
        }
        match load_record::<Preferences>(self.state_store.as_ref(), PREFERENCES_KEY).await {
            Ok(Some(preferences)) => {
                tracing::debug!(?preferences, "Preferences restored");
                self.session.set_preferences(preferences);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read preferences, using defaults");
                false
            }
        }
    }

    /// 替换页面与目录，索引归零，并持久化清单记录
    ///
    /// 记录中只包含页面名、缓存 key 与内嵌编码，不含原始内容
    pub async fn set_pages(&mut self, pages: Vec<PageEntry>, toc: Vec<TocItem>, name: Option<&str>) {
        let record = LastOpened {
            pages: pages
                .iter()
                .map(|p| PersistedPage {
                    name: p.name.clone(),
                    cache_key: p.cache_key.clone(),
                    data_url: p.data_url.clone(),
                    url: None,
                })
                .collect(),
            toc: toc.clone(),
            name: name.map(str::to_string),
        };

        self.install(pages, toc);

        if self.state_store.is_available() {
            if let Err(e) = save_record(self.state_store.as_ref(), LAST_OPENED_KEY, &record).await {
                tracing::warn!(error = %e, "Failed to persist last opened comic");
            }
        }
    }

    /// 从持久化记录恢复上次的会话
    ///
    /// 无法解析的页面被丢弃；一个页面都没有恢复时返回 `false`
    pub async fn hydrate_from_cache(&mut self) -> bool {
        if !self.state_store.is_available() {
            tracing::debug!("State store unavailable, skipping hydration");
            return false;
        }
        let Some(record) = self.read_last_opened().await else {
            return false;
        };

        let total = record.pages.len();
        let mut pages = Vec::with_capacity(total);
        // 原索引 -> 恢复后的索引
        let mut restored_index = Vec::with_capacity(total);
        for persisted in &record.pages {
            match self.resolvers.resolve(persisted).await {
                Some((content, source)) => {
                    tracing::trace!(page = %persisted.name, source, "Page resolved");
                    let mut page = PageEntry::new(persisted.name.clone(), content);
                    page.cache_key = persisted.cache_key.clone();
                    page.data_url = persisted.data_url.clone();
                    restored_index.push(Some(pages.len()));
                    pages.push(page);
                }
                None => {
                    tracing::debug!(page = %persisted.name, "Page unresolvable, dropped");
                    restored_index.push(None);
                }
            }
        }

        let dropped = total - pages.len();
        if dropped > 0 {
            tracing::warn!(total, dropped, "Session restored with missing pages");
        }
        if pages.is_empty() {
            tracing::info!(total, "No pages could be restored, forgetting last opened comic");
            self.forget_last_opened().await;
            return false;
        }

        let page_count = pages.len();
        // 目录项跟随其页面；页面被丢弃时目录项一并丢弃
        let toc = record
            .toc
            .into_iter()
            .filter_map(|item| {
                let page = restored_index.get(item.page).copied().flatten()?;
                Some(TocItem::new(item.title, page))
            })
            .collect();
        self.install(pages, toc);

        tracing::info!(
            name = record.name.as_deref().unwrap_or("<unnamed>"),
            pages = page_count,
            "Session hydrated from cache"
        );
        true
    }

    pub fn set_current_index(&mut self, index: isize) {
        self.session.set_current_index(index);
    }

    pub fn next(&mut self) {
        self.session.next();
    }

    pub fn prev(&mut self) {
        self.session.prev();
    }

    pub fn go_to_page(&mut self, number: usize) {
        self.session.go_to_page(number);
    }

    pub fn set_slider_position(&mut self, position: usize) {
        self.session.set_slider_position(position);
    }

    pub async fn toggle_spread(&mut self) {
        self.session.toggle_spread();
        self.persist_preferences().await;
    }

    pub async fn toggle_gapless(&mut self) {
        self.session.toggle_gapless();
        self.persist_preferences().await;
    }

    pub async fn toggle_direction(&mut self) {
        self.session.toggle_direction();
        self.persist_preferences().await;
    }

    pub async fn set_direction(&mut self, direction: ReadingDirection) {
        self.session.set_direction(direction);
        self.persist_preferences().await;
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.session.set_theme(theme);
        self.persist_preferences().await;
    }

    pub async fn set_locale(&mut self, locale: Locale) {
        self.session.set_locale(locale);
        self.persist_preferences().await;
    }

    pub fn begin_loading(&mut self) {
        self.session.begin_loading();
    }

    /// 导入失败: 结束加载并显示可关闭的提示，页面保持不变
    pub fn fail_loading(&mut self, error: &ArchiveError) {
        self.session.finish_loading();
        self.session.set_notice(error.to_string());
    }

    pub fn finish_loading(&mut self) {
        self.session.finish_loading();
    }

    pub fn dismiss_notice(&mut self) {
        self.session.dismiss_notice();
    }

    /// 最近打开列表，最新的在前
    pub async fn recent(&self) -> Vec<RecentEntry> {
        if !self.state_store.is_available() {
            return Vec::new();
        }
        match load_record::<Vec<RecentEntry>>(self.state_store.as_ref(), RECENT_KEY).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read recent list");
                Vec::new()
            }
        }
    }

    /// 记录一次打开（同名条目移到最前）
    pub async fn record_recent(&mut self, name: &str, page_count: usize, size: u64) {
        if !self.state_store.is_available() {
            return;
        }
        let mut entries = self.recent().await;
        entries.retain(|e| e.name != name);
        entries.insert(
            0,
            RecentEntry {
                name: name.to_string(),
                opened_at: Utc::now(),
                page_count,
                size,
            },
        );
        entries.truncate(self.config.recent_limit);

        if let Err(e) = save_record(self.state_store.as_ref(), RECENT_KEY, &entries).await {
            tracing::warn!(error = %e, "Failed to persist recent list");
        }
    }

    /// 先释放旧句柄，再安装新页面
    fn install(&mut self, pages: Vec<PageEntry>, toc: Vec<TocItem>) {
        let previous = self.session.replace_pages(pages, toc);
        let released = previous.len();
        drop(previous);
        tracing::debug!(
            released,
            installed = self.session.page_count(),
            live_handles = self.handles.live_count(),
            "Pages installed"
        );
    }

    async fn read_last_opened(&self) -> Option<LastOpened> {
        let store = self.state_store.as_ref();
        match load_record::<LastOpened>(store, LAST_OPENED_KEY).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Last opened record unreadable"),
        }
        match load_record::<CacheManifest>(store, MANIFEST_KEY).await {
            Ok(manifest) => manifest.map(LastOpened::from),
            Err(e) => {
                tracing::warn!(error = %e, "Cache manifest unreadable");
                None
            }
        }
    }

    async fn forget_last_opened(&self) {
        for key in [LAST_OPENED_KEY, MANIFEST_KEY] {
            if let Err(e) = self.state_store.remove(key).await {
                tracing::warn!(key, error = %e, "Failed to remove stale session record");
            }
        }
    }

    async fn persist_preferences(&self) {
        if !self.state_store.is_available() {
            return;
        }
        let preferences = self.session.preferences();
        if let Err(e) = save_record(self.state_store.as_ref(), PREFERENCES_KEY, preferences).await {
            tracing::warn!(error = %e, "Failed to persist preferences");
        }
    }
}
