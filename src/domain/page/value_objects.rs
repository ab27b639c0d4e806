//! Page Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 支持的图片扩展名（小写）
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif", ".bmp"];

/// 判断条目名是否为图片
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// 根据扩展名推断 content type
pub fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or_default();
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// 目录项
///
/// 不变量: `0 <= page < page_count`，在导入时完成裁剪
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub title: String,
    pub page: usize,
}

impl TocItem {
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }

    /// 从不可信的页码构造，裁剪到 `[0, page_count - 1]`
    ///
    /// 没有页面时不存在合法页码，返回 `None`
    pub fn clamped(title: impl Into<String>, page: i64, page_count: usize) -> Option<Self> {
        let last = page_count.checked_sub(1)? as i64;
        Some(Self::new(title, page.clamp(0, last) as usize))
    }
}

/// 为每一页生成一个目录项，标题取文件名
pub fn synthesize_toc<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<TocItem> {
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let base = name.rsplit('/').next().unwrap_or_default();
            let title = if base.is_empty() {
                format!("Page {}", index + 1)
            } else {
                base.to_string()
            };
            TocItem::new(title, index)
        })
        .collect()
}

/// 压缩包身份
///
/// 由文件名、字节数、修改时间确定性地生成，用作页面缓存 key 的命名空间
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveIdentity(String);

impl ArchiveIdentity {
    pub fn new(name: &str, size: u64, modified: Option<DateTime<Utc>>) -> Self {
        let modified_ms = modified.map(|m| m.timestamp_millis()).unwrap_or(0);
        Self(format!("{}:{}:{}", name, size, modified_ms))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 页面在缓存中的 key: `{identity}/{entry}`
    pub fn cache_key(&self, entry_name: &str) -> String {
        format!("{}/{}", self.0, entry_name)
    }
}

impl std::fmt::Display for ArchiveIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 待导入的压缩包文件
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub modified: Option<DateTime<Utc>>,
}

impl ArchiveFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            bytes,
            modified,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn identity(&self) -> ArchiveIdentity {
        ArchiveIdentity::new(&self.name, self.size(), self.modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_image_name_filter() {
        assert!(is_image_name("a/b/001.JPG"));
        assert!(is_image_name("cover.webp"));
        assert!(!is_image_name("toc.json"));
        assert!(!is_image_name("readme.txt"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("x.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("x.avif"), "image/avif");
        assert_eq!(content_type_for("x"), "application/octet-stream");
    }

    #[test]
    fn test_toc_clamp_high() {
        let item = TocItem::clamped("Finale", 999, 5).unwrap();
        assert_eq!(item.page, 4);
    }

    #[test]
    fn test_toc_clamp_negative() {
        assert_eq!(TocItem::clamped("Intro", -3, 5).unwrap().page, 0);
    }

    #[test]
    fn test_toc_item_dropped_without_pages() {
        assert!(TocItem::clamped("Nothing", 0, 0).is_none());
        assert!(TocItem::clamped("Nothing", 7, 0).is_none());
    }

    #[test]
    fn test_synthesize_toc_uses_base_name() {
        let toc = synthesize_toc(["vol1/a.png", "vol1/b.png", "c.png"]);
        assert_eq!(toc.len(), 3);
        assert_eq!(toc[0], TocItem::new("a.png", 0));
        assert_eq!(toc[1], TocItem::new("b.png", 1));
        assert_eq!(toc[2], TocItem::new("c.png", 2));
    }

    #[test]
    fn test_synthesize_toc_empty_base_name() {
        let toc = synthesize_toc(["dir/"]);
        assert_eq!(toc[0].title, "Page 1");
    }

    #[test]
    fn test_archive_identity_is_deterministic() {
        let modified = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ArchiveIdentity::new("book.zip", 42, Some(modified));
        let b = ArchiveIdentity::new("book.zip", 42, Some(modified));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "book.zip:42:1700000000000");
        assert_eq!(a.cache_key("p/1.png"), "book.zip:42:1700000000000/p/1.png");
    }
}
