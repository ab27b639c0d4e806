//! Reading Session Context - 阅读会话限界上下文
//!
//! 职责:
//! - 当前位置与翻页（单页/双页、左到右/右到左）
//! - 可见页面推导
//! - 用户显示偏好

mod aggregate;
mod preferences;

pub use aggregate::ReadingSession;
pub use preferences::{Locale, Preferences, ReadingDirection, Theme};
