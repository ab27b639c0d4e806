//! Session Query Handlers

use crate::application::queries::session_queries::*;
use crate::application::session_store::SessionStore;

/// GetSessionSnapshot Handler
pub struct GetSessionSnapshotHandler;

impl GetSessionSnapshotHandler {
    pub async fn handle(&self, store: &SessionStore, query: GetSessionSnapshot) -> SessionSnapshot {
        let session = store.session();
        let pages = session.pages();

        let visible = session
            .visible_indices()
            .into_iter()
            .map(|index| VisiblePage {
                index,
                name: pages[index].name.clone(),
                content_type: pages[index].content.content_type().to_string(),
            })
            .collect();

        let recent = if query.include_recent {
            store.recent().await
        } else {
            Vec::new()
        };

        SessionSnapshot {
            page_count: session.page_count(),
            current_index: session.current_index(),
            visible,
            slider_position: session.slider_position(),
            toc: session.toc().to_vec(),
            preferences: session.preferences().clone(),
            loading: session.is_loading(),
            notice: session.notice().map(str::to_string),
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session_store::SessionStoreConfig;
    use crate::domain::page::{ContentHandles, PageEntry};
    use crate::domain::session::ReadingDirection;
    use crate::infrastructure::memory::{InMemoryBlobCache, InMemoryStateStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_snapshot_spread_rtl() {
        let handles = ContentHandles::new();
        let mut store = SessionStore::new(
            Arc::new(InMemoryBlobCache::new()),
            Arc::new(InMemoryStateStore::new()),
            handles.clone(),
            SessionStoreConfig::default(),
        );
        let pages = (1..=4)
            .map(|i| PageEntry::new(format!("{}.jpg", i), handles.create(vec![i], "image/jpeg")))
            .collect();
        store.set_pages(pages, Vec::new(), Some("s.zip")).await;
        store.toggle_spread().await;
        store.set_direction(ReadingDirection::Rtl).await;

        let snapshot = GetSessionSnapshotHandler
            .handle(&store, GetSessionSnapshot::default())
            .await;
        let names: Vec<&str> = snapshot.visible.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["2.jpg", "1.jpg"]);
        assert_eq!(snapshot.slider_position, 4);
        assert_eq!(snapshot.page_count, 4);
        assert!(snapshot.recent.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_of_empty_session() {
        let store = SessionStore::new(
            Arc::new(InMemoryBlobCache::new()),
            Arc::new(InMemoryStateStore::new()),
            ContentHandles::new(),
            SessionStoreConfig::default(),
        );
        let snapshot = GetSessionSnapshotHandler
            .handle(&store, GetSessionSnapshot { include_recent: true })
            .await;
        assert_eq!(snapshot.page_count, 0);
        assert!(snapshot.visible.is_empty());
        assert!(snapshot.notice.is_none());
    }
}
