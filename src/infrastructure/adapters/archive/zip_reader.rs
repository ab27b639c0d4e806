//! Zip Reader - 基于 zip crate 的压缩包解析
//!
//! 实现 ArchiveOpenerPort / ArchiveReaderPort

use std::io::{Cursor, Read};

use crate::application::ports::{ArchiveEntryMeta, ArchiveOpenerPort, ArchiveReaderPort};
use crate::domain::page::ArchiveError;

/// 不限制大小时的最大预分配
const MAX_PREALLOC_BYTES: u64 = 8 * 1024 * 1024;

/// Zip 打开器
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveOpener;

impl ArchiveOpenerPort for ZipArchiveOpener {
    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReaderPort>, ArchiveError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ArchiveError::Unreadable(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| ArchiveError::Unreadable(e.to_string()))?;
            entries.push(ArchiveEntryMeta {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                size: file.size(),
            });
        }

        tracing::debug!(entries = entries.len(), "Zip directory parsed");

        Ok(Box::new(ZipArchiveReader { archive, entries }))
    }
}

/// 已打开的 Zip 压缩包
pub struct ZipArchiveReader {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
    entries: Vec<ArchiveEntryMeta>,
}

impl ArchiveReaderPort for ZipArchiveReader {
    fn entries(&self) -> &[ArchiveEntryMeta] {
        &self.entries
    }

    fn read_entry(&mut self, name: &str, limit: u64) -> Result<Vec<u8>, ArchiveError> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| ArchiveError::entry_decode(name, e))?;

        // 声明大小只用于预分配，且不超过上限
        let cap = if limit > 0 { limit } else { MAX_PREALLOC_BYTES };
        let mut bytes = Vec::with_capacity(file.size().min(cap) as usize);

        if limit == 0 {
            file.read_to_end(&mut bytes)
                .map_err(|e| ArchiveError::entry_decode(name, e))?;
            return Ok(bytes);
        }

        file.take(limit + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::entry_decode(name, e))?;
        if bytes.len() as u64 > limit {
            return Err(ArchiveError::EntryTooLarge {
                entry: name.to_string(),
                size: bytes.len() as u64,
                limit,
            });
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::archive::test_support::{
        corrupt_payload, deflated_zip, forge_declared_size, stored_zip,
    };
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    fn build_zip() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("chapter1/", SimpleFileOptions::default()).unwrap();
        writer
            .start_file(
                "chapter1/01.png",
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            )
            .unwrap();
        writer.write_all(&[7u8; 64]).unwrap();
        writer
            .start_file(
                "notes.txt",
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
            )
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_lists_entries() {
        let reader = ZipArchiveOpener.open(build_zip()).unwrap();
        let entries = reader.entries();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_dir);
        assert_eq!(entries[1].name, "chapter1/01.png");
        assert_eq!(entries[1].size, 64);
        assert!(!entries[2].is_dir);
    }

    #[test]
    fn test_reads_stored_and_deflated() {
        let mut reader = ZipArchiveOpener.open(build_zip()).unwrap();

        assert_eq!(reader.read_entry("chapter1/01.png", 0).unwrap(), vec![7u8; 64]);
        assert_eq!(reader.read_entry("notes.txt", 0).unwrap(), b"hello");
    }

    #[test]
    fn test_missing_entry_is_decode_error() {
        let mut reader = ZipArchiveOpener.open(build_zip()).unwrap();
        let err = reader.read_entry("nope.png", 0).unwrap_err();
        assert_eq!(err.entry(), Some("nope.png"));
    }

    #[test]
    fn test_limit_applies_to_decoded_bytes() {
        let mut reader = ZipArchiveOpener.open(build_zip()).unwrap();

        assert_eq!(reader.read_entry("chapter1/01.png", 64).unwrap().len(), 64);
        let err = reader.read_entry("chapter1/01.png", 63).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::EntryTooLarge { size: 64, limit: 63, .. }
        ));
    }

    #[test]
    fn test_understated_size_is_caught() {
        let mut bytes = deflated_zip("a.png", &vec![0u8; 64 * 1024]);
        forge_declared_size(&mut bytes, 1);

        let mut reader = ZipArchiveOpener.open(bytes).unwrap();
        assert_eq!(reader.entries()[0].size, 1);

        let err = reader.read_entry("a.png", 1000).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::EntryTooLarge { limit: 1000, .. }
        ));
        assert_eq!(err.entry(), Some("a.png"));
    }

    #[test]
    fn test_checksum_mismatch_is_decode_error() {
        let mut bytes = stored_zip(&[("a.png", b"FIRST-PAGE"), ("b.png", b"SECOND-PAGE")]);
        corrupt_payload(&mut bytes, b"SECOND-PAGE");

        let mut reader = ZipArchiveOpener.open(bytes).unwrap();
        assert_eq!(reader.read_entry("a.png", 0).unwrap(), b"FIRST-PAGE");
        let err = reader.read_entry("b.png", 0).unwrap_err();
        assert!(matches!(err, ArchiveError::EntryDecode { .. }));
        assert_eq!(err.entry(), Some("b.png"));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let result = ZipArchiveOpener.open(b"not a zip at all".to_vec());
        assert!(matches!(result, Err(ArchiveError::Unreadable(_))));
    }
}
