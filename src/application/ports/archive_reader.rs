//! Archive Reader Port - 压缩包解析
//!
//! 列出目录并按名读取条目，具体实现见 infrastructure/adapters/archive

use crate::domain::page::ArchiveError;

/// 目录中的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntryMeta {
    pub name: String,
    pub is_dir: bool,
    /// 解压后大小（来自目录，不可信）
    pub size: u64,
}

/// 已打开的压缩包
pub trait ArchiveReaderPort: Send {
    /// 目录中的全部条目
    fn entries(&self) -> &[ArchiveEntryMeta];

    /// 解压指定条目
    ///
    /// `limit > 0` 时最多读出 `limit` 字节，超出返回 `ArchiveError::EntryTooLarge`；
    /// 目录中声明的大小不可信，上限按实际解压出的字节数判断
    fn read_entry(&mut self, name: &str, limit: u64) -> Result<Vec<u8>, ArchiveError>;
}

/// 压缩包打开器
pub trait ArchiveOpenerPort: Send + Sync {
    /// 解析压缩包目录，格式损坏或不支持时返回 `ArchiveError::Unreadable`
    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReaderPort>, ArchiveError>;
}
