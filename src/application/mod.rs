//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（BlobCache、StateStore、ArchiveReader）
//! - loader: 压缩包导入流程
//! - resolution: 恢复会话时的页面解析器链
//! - session_store: 阅读会话状态机
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod loader;
pub mod ports;
pub mod queries;
pub mod resolution;
pub mod session_store;

// Re-exports
pub use commands::{handlers::LoadArchiveHandler, LoadArchive, LoadArchiveResponse};

pub use error::ApplicationError;

pub use loader::{ArchiveLoader, ArchiveLoaderConfig, LoadedArchive};

pub use ports::{
    // Archive reader
    ArchiveEntryMeta,
    ArchiveOpenerPort,
    ArchiveReaderPort,
    // Blob cache
    BlobCachePort,
    CacheError,
    CacheStats,
    CachedBlob,
    // State store
    CacheManifest,
    LastOpened,
    PersistedPage,
    RecentEntry,
    StateStoreError,
    StateStorePort,
};

pub use queries::{handlers::GetSessionSnapshotHandler, GetSessionSnapshot, SessionSnapshot, VisiblePage};

pub use resolution::{PageResolver, Resolution, ResolverChain};

pub use session_store::{SessionStore, SessionStoreConfig};
