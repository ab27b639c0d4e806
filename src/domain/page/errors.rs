//! Page Context - Errors

use thiserror::Error;

/// 压缩包导入错误
///
/// 任一条目失败都会中止整次导入，不提交部分页面
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("无法解析压缩包: {0}")]
    Unreadable(String),

    #[error("页面解码失败: {entry}: {reason}")]
    EntryDecode { entry: String, reason: String },

    #[error("页面过大: {entry} ({size} 字节，上限 {limit} 字节)")]
    EntryTooLarge { entry: String, size: u64, limit: u64 },
}

impl ArchiveError {
    pub fn entry_decode(entry: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::EntryDecode {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }

    /// 失败条目名（若有）
    pub fn entry(&self) -> Option<&str> {
        match self {
            Self::Unreadable(_) => None,
            Self::EntryDecode { entry, .. } | Self::EntryTooLarge { entry, .. } => Some(entry),
        }
    }
}
