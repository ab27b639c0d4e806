//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod memory;
pub mod persistence;

pub use adapters::{read_archive_file, ZipArchiveOpener};
pub use memory::{InMemoryBlobCache, InMemoryStateStore, UnavailableBlobCache, UnavailableStateStore};
pub use persistence::{open_database, SledBlobCache, SledStateStore};
