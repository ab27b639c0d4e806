//! Archive Commands - 压缩包相关命令

use crate::domain::page::ArchiveFile;

/// 打开压缩包命令
#[derive(Debug, Clone)]
pub struct LoadArchive {
    pub file: ArchiveFile,
}

/// 打开压缩包响应
#[derive(Debug, Clone)]
pub struct LoadArchiveResponse {
    pub name: String,
    pub file_key: String,
    pub page_count: usize,
    pub toc_len: usize,
}
