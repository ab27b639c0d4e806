//! Archive Adapters
//!
//! Zip 解析，以及从本地路径读取待导入的文件

mod zip_reader;

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::domain::page::ArchiveFile;

pub use zip_reader::{ZipArchiveOpener, ZipArchiveReader};

/// 从本地路径读取压缩包（文件名、内容与修改时间）
pub async fn read_archive_file(path: impl AsRef<Path>) -> std::io::Result<ArchiveFile> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(ArchiveFile::new(name, bytes, modified))
}

/// 测试用压缩包构造与篡改
#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    const LOCAL_HEADER_SIG: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
    const CENTRAL_HEADER_SIG: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];

    /// 所有条目均不压缩
    pub fn stored_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// 单个 deflate 条目
    pub fn deflated_zip(name: &str, data: &[u8]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(name, options).unwrap();
        writer.write_all(data).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// 改写第一个条目在本地头与中央目录中声明的解压大小
    pub fn forge_declared_size(zip: &mut [u8], size: u32) {
        let local = find(zip, &LOCAL_HEADER_SIG).unwrap();
        zip[local + 22..local + 26].copy_from_slice(&size.to_le_bytes());
        let central = find(zip, &CENTRAL_HEADER_SIG).unwrap();
        zip[central + 24..central + 28].copy_from_slice(&size.to_le_bytes());
    }

    /// 翻转不压缩条目数据的第一个字节，使 CRC 校验失败
    pub fn corrupt_payload(zip: &mut [u8], payload: &[u8]) {
        let at = find(zip, payload).unwrap();
        zip[at] ^= 0xff;
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_archive_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vol1.cbz");
        tokio::fs::write(&path, b"PK").await.unwrap();

        let file = read_archive_file(&path).await.unwrap();
        assert_eq!(file.name, "vol1.cbz");
        assert_eq!(file.size(), 2);
        assert!(file.modified.is_some());
        assert!(file.identity().as_str().starts_with("vol1.cbz:2:"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        assert!(read_archive_file("/definitely/not/here.zip").await.is_err());
    }
}
