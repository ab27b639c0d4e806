//! Archive Command Handlers

use std::sync::Arc;

use crate::application::commands::archive_commands::*;
use crate::application::error::ApplicationError;
use crate::application::loader::ArchiveLoader;
use crate::application::session_store::SessionStore;

/// LoadArchive Handler - 导入压缩包并替换当前会话
///
/// 同一 SessionStore 上同时只允许一次导入
pub struct LoadArchiveHandler {
    loader: Arc<ArchiveLoader>,
}

impl LoadArchiveHandler {
    pub fn new(loader: Arc<ArchiveLoader>) -> Self {
        Self { loader }
    }

    pub async fn handle(
        &self,
        store: &mut SessionStore,
        cmd: LoadArchive,
    ) -> Result<LoadArchiveResponse, ApplicationError> {
        store.begin_loading();

        let name = cmd.file.name.clone();
        let size = cmd.file.size();

        let loaded = match self.loader.load(cmd.file).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(archive = %name, error = %e, "Failed to load archive");
                store.fail_loading(&e);
                return Err(e.into());
            }
        };

        let page_count = loaded.pages.len();
        let toc_len = loaded.toc.len();
        let file_key = loaded.file_key.as_str().to_string();

        store
            .set_pages(loaded.pages, loaded.toc, Some(name.as_str()))
            .await;
        store.record_recent(&name, page_count, size).await;
        store.finish_loading();

        tracing::info!(
            archive = %name,
            file_key = %file_key,
            page_count,
            "Archive opened"
        );

        Ok(LoadArchiveResponse {
            name,
            file_key,
            page_count,
            toc_len,
        })
    }
}
