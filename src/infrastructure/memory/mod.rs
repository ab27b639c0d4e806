//! Memory Layer - In-Memory Adapters
//!
//! 内存版页面缓存与会话记录存储，以及无持久化能力时使用的占位实现

mod blob_cache;
mod state_store;
mod unavailable;

pub use blob_cache::InMemoryBlobCache;
pub use state_store::InMemoryStateStore;
pub use unavailable::{UnavailableBlobCache, UnavailableStateStore};
