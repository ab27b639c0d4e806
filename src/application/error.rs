//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::domain::page::ArchiveError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 压缩包导入失败（唯一对用户可见的错误）
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl ApplicationError {
    /// 展示给用户的提示文本
    pub fn notice(&self) -> String {
        self.to_string()
    }
}
