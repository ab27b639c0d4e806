//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod archive;

pub use archive::{read_archive_file, ZipArchiveOpener};
