//! Sled 持久化
//!
//! 页面缓存与会话记录共用一个数据库，分别存放在不同的 tree 中

mod blob_cache;
mod state_store;

pub use blob_cache::SledBlobCache;
pub use state_store::SledStateStore;

use std::path::Path;

use crate::application::ports::CacheError;

/// 打开（或创建）数据库
pub fn open_database(path: impl AsRef<Path>) -> Result<sled::Db, CacheError> {
    let path = path.as_ref();
    let db = sled::open(path).map_err(|e| CacheError::DatabaseError(e.to_string()))?;
    tracing::info!(db_path = %path.display(), "Sled database opened");
    Ok(db)
}
