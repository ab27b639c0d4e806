//! Page Context - 页面限界上下文
//!
//! 职责:
//! - 页面与内容句柄
//! - 目录项与目录合成
//! - 压缩包身份（缓存命名空间）
//! - 无缓存环境下的内嵌编码

mod data_url;
mod entities;
mod errors;
mod value_objects;

pub use data_url::{decode_data_url, encode_data_url};
pub use entities::{ContentHandles, PageContent, PageEntry};
pub use errors::ArchiveError;
pub use value_objects::{
    content_type_for, is_image_name, synthesize_toc, ArchiveFile, ArchiveIdentity, TocItem,
    IMAGE_EXTENSIONS,
};
