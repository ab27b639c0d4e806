//! Sled-based State Store Implementation

use async_trait::async_trait;
use sled::Tree;

use crate::application::ports::{StateStoreError, StateStorePort};

/// 会话记录所在的 tree
const STATE_TREE: &str = "state";

/// Sled 会话记录存储
pub struct SledStateStore {
    tree: Tree,
}

impl SledStateStore {
    pub fn new(db: &sled::Db) -> Result<Self, StateStoreError> {
        let tree = db
            .open_tree(STATE_TREE)
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;
        Ok(Self { tree })
    }
}

#[async_trait]
impl StateStorePort for SledStateStore {
    fn is_available(&self) -> bool {
        true
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        let Some(value) = self
            .tree
            .get(key)
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(None);
        };
        String::from_utf8(value.to_vec())
            .map(Some)
            .map_err(|e| StateStoreError::SerializationError(e.to_string()))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StateStoreError> {
        self.tree
            .insert(key, value.into_bytes())
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;
        // 记录很小，写入后立即落盘
        self.tree
            .flush()
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;
        tracing::trace!(key = %key, "State record written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        self.tree
            .remove(key)
            .map_err(|e| StateStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{load_record, save_record, PREFERENCES_KEY};
    use crate::domain::session::{Preferences, ReadingDirection};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_write_remove() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path().join("state.sled")).unwrap();
        let store = SledStateStore::new(&db).unwrap();

        assert!(store.read("missing").await.unwrap().is_none());
        store.write("k", "{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("{\"a\":1}"));
        store.remove("k").await.unwrap();
        assert!(store.read("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_typed_records() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path().join("state.sled")).unwrap();
        let store = SledStateStore::new(&db).unwrap();

        let prefs = Preferences {
            reading_direction: ReadingDirection::Rtl,
            gapless: true,
            ..Default::default()
        };
        save_record(&store, PREFERENCES_KEY, &prefs).await.unwrap();

        let loaded: Preferences = load_record(&store, PREFERENCES_KEY).await.unwrap().unwrap();
        assert_eq!(loaded, prefs);
    }
}
