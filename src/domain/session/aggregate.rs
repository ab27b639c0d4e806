//! Reading Session - Aggregate Root

use super::{Locale, Preferences, ReadingDirection, Theme};
use crate::domain::page::{PageEntry, TocItem};

/// 阅读会话聚合根
///
/// 不变量:
/// - `0 <= current_index < max(page_count, 1)`，无页面时为 0
/// - 页面与目录整体替换，不做增量修改
/// - 切换显示偏好不改变 `current_index`
#[derive(Debug, Default)]
pub struct ReadingSession {
    pages: Vec<PageEntry>,
    toc: Vec<TocItem>,
    current_index: usize,
    preferences: Preferences,
    loading: bool,
    notice: Option<String>,
}

impl ReadingSession {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    /// 整体替换页面与目录，索引归零
    ///
    /// 返回被替换下来的页面，由调用方负责释放
    pub fn replace_pages(&mut self, pages: Vec<PageEntry>, toc: Vec<TocItem>) -> Vec<PageEntry> {
        self.toc = toc;
        self.current_index = 0;
        std::mem::replace(&mut self.pages, pages)
    }

    /// 设置当前索引（自动裁剪）
    pub fn set_current_index(&mut self, index: isize) {
        self.current_index = self.clamp_index(index);
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    /// 跳到第 `number` 页（从 1 开始）
    pub fn go_to_page(&mut self, number: usize) {
        self.set_current_index(number as isize - 1);
    }

    /// 进度条上的位置（从 1 开始）
    ///
    /// 右到左阅读时进度条镜像: `position = page_count - index`
    pub fn slider_position(&self) -> usize {
        match self.preferences.reading_direction {
            ReadingDirection::Ltr => self.current_index + 1,
            ReadingDirection::Rtl => self.page_count().saturating_sub(self.current_index),
        }
    }

    pub fn set_slider_position(&mut self, position: usize) {
        let index = match self.preferences.reading_direction {
            ReadingDirection::Ltr => position as isize - 1,
            ReadingDirection::Rtl => self.page_count() as isize - position as isize,
        };
        self.set_current_index(index);
    }

    pub fn toggle_spread(&mut self) {
        self.preferences.spread = !self.preferences.spread;
    }

    pub fn toggle_gapless(&mut self) {
        self.preferences.gapless = !self.preferences.gapless;
    }

    pub fn toggle_direction(&mut self) {
        self.preferences.reading_direction = self.preferences.reading_direction.toggled();
    }

    pub fn set_direction(&mut self, direction: ReadingDirection) {
        self.preferences.reading_direction = direction;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.theme = theme;
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.preferences.locale = locale;
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// 当前可见页面的索引，按视觉顺序（从左到右）排列
    ///
    /// - 单页: `[cur]`
    /// - 双页 + 左到右: `[cur, cur + 1]`
    /// - 双页 + 右到左: `[cur + 1, cur]`
    ///
    /// 越界索引被过滤
    pub fn visible_indices(&self) -> Vec<usize> {
        if self.pages.is_empty() {
            return Vec::new();
        }
        let cur = self.current_index;
        if !self.preferences.spread {
            return vec![cur];
        }
        let mut indices: Vec<usize> = [cur, cur + 1]
            .into_iter()
            .filter(|&i| i < self.pages.len())
            .collect();
        if self.preferences.reading_direction == ReadingDirection::Rtl {
            indices.reverse();
        }
        indices
    }

    pub fn visible_pages(&self) -> Vec<&PageEntry> {
        self.visible_indices()
            .into_iter()
            .filter_map(|i| self.pages.get(i))
            .collect()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.notice = None;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // Getters
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn toc(&self) -> &[TocItem] {
        &self.toc
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_page(&self) -> Option<&PageEntry> {
        self.pages.get(self.current_index)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn step(&mut self, forward: isize) {
        let size = if self.preferences.spread { 2 } else { 1 };
        let delta = size * forward * self.preferences.reading_direction.sign();
        self.set_current_index(self.current_index as isize + delta);
    }

    fn clamp_index(&self, index: isize) -> usize {
        if self.pages.is_empty() {
            return 0;
        }
        index.clamp(0, self.pages.len() as isize - 1) as usize
    }
}
