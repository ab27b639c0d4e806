//! Session Queries - 会话视图查询

use crate::application::ports::RecentEntry;
use crate::domain::page::TocItem;
use crate::domain::session::Preferences;

/// 获取会话快照
#[derive(Debug, Clone, Default)]
pub struct GetSessionSnapshot {
    /// 是否附带最近打开列表
    pub include_recent: bool,
}

/// 可见页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePage {
    pub index: usize,
    pub name: String,
    pub content_type: String,
}

/// 会话快照，供展示层渲染
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub page_count: usize,
    pub current_index: usize,
    /// 按视觉顺序（从左到右）
    pub visible: Vec<VisiblePage>,
    pub slider_position: usize,
    pub toc: Vec<TocItem>,
    pub preferences: Preferences,
    pub loading: bool,
    pub notice: Option<String>,
    pub recent: Vec<RecentEntry>,
}
