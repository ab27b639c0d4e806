//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod archive_reader;
mod blob_cache;
mod state_store;

pub use archive_reader::{ArchiveEntryMeta, ArchiveOpenerPort, ArchiveReaderPort};
pub use blob_cache::{BlobCachePort, CacheError, CacheStats, CachedBlob};
pub use state_store::{
    load_record, save_record, CacheManifest, LastOpened, ManifestPage, PersistedPage,
    RecentEntry, StateStoreError, StateStorePort, LAST_OPENED_KEY, MANIFEST_KEY,
    PREFERENCES_KEY, RECENT_KEY,
};
