//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Page Context: 页面、目录、压缩包身份
//! - Reading Session Context: 阅读位置与显示偏好

pub mod page;
pub mod session;

// 共享的自然排序
mod natural_sort;

pub use natural_sort::{natural_cmp, sort_natural};
