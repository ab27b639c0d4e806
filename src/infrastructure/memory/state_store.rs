//! In-Memory State Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{StateStoreError, StateStorePort};

/// 内存会话记录存储
#[derive(Default)]
pub struct InMemoryStateStore {
    records: DashMap<String, String>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStorePort for InMemoryStateStore {
    fn is_available(&self) -> bool {
        true
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StateStoreError> {
        Ok(self.records.get(key).map(|v| v.clone()))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StateStoreError> {
        self.records.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        self.records.remove(key);
        Ok(())
    }
}
