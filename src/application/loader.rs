//! Archive Loader - 压缩包导入流程
//!
//! 压缩包 → 有序页面 + 目录:
//! 1. 解析目录，筛选图片条目（忽略目录项）
//! 2. 自然排序，得到固定的页面顺序
//! 3. 逐个解压（顺序执行，限制内存峰值）
//! 4. 清空旧缓存后发布页面；缓存不可用时内嵌 data URL
//! 5. 读取 `toc.json` 或合成目录
//! 6. 写入缓存清单

use serde::Deserialize;
use std::sync::Arc;

use crate::application::ports::{
    save_record, ArchiveEntryMeta, ArchiveOpenerPort, ArchiveReaderPort, BlobCachePort,
    CacheManifest, CachedBlob, ManifestPage, StateStorePort, MANIFEST_KEY,
};
use crate::domain::page::{
    content_type_for, encode_data_url, is_image_name, synthesize_toc, ArchiveError, ArchiveFile,
    ArchiveIdentity, ContentHandles, PageContent, PageEntry, TocItem,
};
use crate::domain::sort_natural;

/// 导入配置
#[derive(Debug, Clone)]
pub struct ArchiveLoaderConfig {
    /// 目录描述文件名（忽略大小写，任意层级）
    pub toc_file_name: String,
    /// 单个条目的最大解压大小（字节），0 表示不限制
    pub max_entry_bytes: u64,
}

impl Default for ArchiveLoaderConfig {
    fn default() -> Self {
        Self {
            toc_file_name: "toc.json".to_string(),
            max_entry_bytes: 0,
        }
    }
}

/// 导入结果
#[derive(Debug)]
pub struct LoadedArchive {
    pub pages: Vec<PageEntry>,
    pub toc: Vec<TocItem>,
    pub file_key: ArchiveIdentity,
}

/// `toc.json` 中的条目（不可信）
///
/// `page` 接受任意 JSON 数字（含 `2.0` 这类浮点写法），非数字的条目被丢弃
#[derive(Debug, Deserialize)]
struct RawTocItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    page: serde_json::Value,
}

impl RawTocItem {
    fn into_toc_item(self, page_count: usize) -> Option<TocItem> {
        let Some(page) = self.page.as_f64() else {
            tracing::warn!(title = %self.title, page = %self.page, "Toc item without numeric page, skipped");
            return None;
        };
        // `as` 对超出范围的浮点数饱和转换，NaN 为 0
        TocItem::clamped(self.title, page.trunc() as i64, page_count)
    }
}

/// 压缩包导入器
pub struct ArchiveLoader {
    opener: Arc<dyn ArchiveOpenerPort>,
    blob_cache: Arc<dyn BlobCachePort>,
    state_store: Arc<dyn StateStorePort>,
    handles: ContentHandles,
    config: ArchiveLoaderConfig,
}

impl ArchiveLoader {
    pub fn new(
        opener: Arc<dyn ArchiveOpenerPort>,
        blob_cache: Arc<dyn BlobCachePort>,
        state_store: Arc<dyn StateStorePort>,
        handles: ContentHandles,
        config: ArchiveLoaderConfig,
    ) -> Self {
        Self {
            opener,
            blob_cache,
            state_store,
            handles,
            config,
        }
    }

    /// 导入压缩包
    ///
    /// 任一条目解压失败都会中止整次导入；旧缓存只在全部条目解压成功后才被清空。
    /// 压缩包内容直接移交给解析器，不做复制
    pub async fn load(&self, file: ArchiveFile) -> Result<LoadedArchive, ArchiveError> {
        let file_key = file.identity();
        let ArchiveFile { name, bytes, .. } = file;
        let mut reader = self.opener.open(bytes)?;

        let image_entries = select_image_entries(reader.entries());
        let toc_entry = find_toc_entry(reader.entries(), &self.config.toc_file_name);

        tracing::info!(
            archive = %name,
            file_key = %file_key,
            entries = reader.entries().len(),
            images = image_entries.len(),
            has_toc = toc_entry.is_some(),
            "Archive directory parsed"
        );

        let decoded = self.decode_entries(reader.as_mut(), &image_entries)?;
        let pages = self.publish(&file_key, decoded).await;

        let toc = match toc_entry {
            Some(name) => self
                .read_toc(reader.as_mut(), &name, pages.len())
                .unwrap_or_else(|| synthesize_page_toc(&pages)),
            None => synthesize_page_toc(&pages),
        };

        self.write_manifest(&file_key, &pages, &toc).await;

        tracing::info!(
            archive = %name,
            pages = pages.len(),
            toc_items = toc.len(),
            "Archive loaded"
        );

        Ok(LoadedArchive {
            pages,
            toc,
            file_key,
        })
    }

    /// 顺序解压所有图片条目
    fn decode_entries(
        &self,
        reader: &mut dyn ArchiveReaderPort,
        entries: &[ArchiveEntryMeta],
    ) -> Result<Vec<(String, PageContent)>, ArchiveError> {
        let limit = self.config.max_entry_bytes;
        let mut decoded = Vec::with_capacity(entries.len());

        for entry in entries {
            if limit > 0 && entry.size > limit {
                return Err(ArchiveError::EntryTooLarge {
                    entry: entry.name.clone(),
                    size: entry.size,
                    limit,
                });
            }
            // 声明大小不可信，解压时再次按上限截断
            let bytes = reader.read_entry(&entry.name, limit)?;
            let content = self.handles.create(bytes, content_type_for(&entry.name));
            tracing::debug!(entry = %entry.name, size = content.len(), "Entry decoded");
            decoded.push((entry.name.clone(), content));
        }

        Ok(decoded)
    }

    /// 发布页面内容
    ///
    /// 缓存可用: 先清空旧缓存，再以 `{file_key}/{entry}` 写入；
    /// 缓存不可用或写入失败: 内嵌 data URL
    async fn publish(
        &self,
        file_key: &ArchiveIdentity,
        decoded: Vec<(String, PageContent)>,
    ) -> Vec<PageEntry> {
        let mut cache_ready = self.blob_cache.is_available();
        if cache_ready {
            if let Err(e) = self.blob_cache.clear_all().await {
                tracing::warn!(error = %e, "Failed to clear page cache, embedding pages instead");
                cache_ready = false;
            }
        } else {
            tracing::info!("Page cache unavailable, embedding pages as data URLs");
        }

        let mut pages = Vec::with_capacity(decoded.len());
        for (name, content) in decoded {
            let page = PageEntry::new(name.clone(), content.clone());
            if cache_ready {
                let key = file_key.cache_key(&name);
                let blob = CachedBlob::new(content.bytes().to_vec(), content.content_type());
                match self.blob_cache.put(&key, blob).await {
                    Ok(()) => {
                        pages.push(page.with_cache_key(key));
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(entry = %name, error = %e, "Cache write failed, embedding page");
                    }
                }
            }
            let data_url = encode_data_url(content.content_type(), content.bytes());
            pages.push(page.with_data_url(data_url));
        }
        pages
    }

    /// 读取并裁剪 `toc.json`；解析失败返回 `None`，由调用方合成目录
    fn read_toc(
        &self,
        reader: &mut dyn ArchiveReaderPort,
        name: &str,
        page_count: usize,
    ) -> Option<Vec<TocItem>> {
        let parsed = reader
            .read_entry(name, self.config.max_entry_bytes)
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                serde_json::from_slice::<Vec<RawTocItem>>(&bytes).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| item.into_toc_item(page_count))
                    .collect(),
            ),
            Err(reason) => {
                tracing::warn!(entry = %name, error = %reason, "Failed to parse toc, synthesizing");
                None
            }
        }
    }

    async fn write_manifest(&self, file_key: &ArchiveIdentity, pages: &[PageEntry], toc: &[TocItem]) {
        if !self.blob_cache.is_available() || !self.state_store.is_available() {
            return;
        }
        let manifest = CacheManifest {
            file_key: file_key.as_str().to_string(),
            pages: pages
                .iter()
                .map(|p| ManifestPage {
                    name: p.name.clone(),
                    cache_key: p.cache_key.clone(),
                })
                .collect(),
            toc: toc.to_vec(),
        };
        if let Err(e) = save_record(self.state_store.as_ref(), MANIFEST_KEY, &manifest).await {
            tracing::warn!(error = %e, "Failed to persist cache manifest");
        }
    }
}

/// 筛选图片条目并按自然顺序排序
fn select_image_entries(entries: &[ArchiveEntryMeta]) -> Vec<ArchiveEntryMeta> {
    let mut images: Vec<ArchiveEntryMeta> = entries
        .iter()
        .filter(|e| !e.is_dir && is_image_name(&e.name))
        .cloned()
        .collect();
    sort_natural(&mut images, |e| e.name.as_str());
    images
}

/// 查找目录描述文件（文件名忽略大小写，任意层级）
fn find_toc_entry(entries: &[ArchiveEntryMeta], toc_file_name: &str) -> Option<String> {
    let target = toc_file_name.to_lowercase();
    entries
        .iter()
        .filter(|e| !e.is_dir)
        .find(|e| e.name.to_lowercase().ends_with(&target))
        .map(|e| e.name.clone())
}

fn synthesize_page_toc(pages: &[PageEntry]) -> Vec<TocItem> {
    synthesize_toc(pages.iter().map(|p| p.name.as_str()))
}
