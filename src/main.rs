//! Zipview - 压缩包漫画阅读器
//!
//! 无界面启动流程：加载配置、恢复上次会话，可选导入命令行指定的压缩包

use std::sync::Arc;

use zipview::application::ports::{BlobCachePort, StateStorePort};
use zipview::application::{
    ArchiveLoader, GetSessionSnapshot, GetSessionSnapshotHandler, LoadArchive,
    LoadArchiveHandler, SessionStore,
};
use zipview::config::{load_config, print_config, AppConfig};
use zipview::domain::page::ContentHandles;
use zipview::infrastructure::{
    open_database, read_archive_file, SledBlobCache, SledStateStore, UnavailableBlobCache,
    UnavailableStateStore, ZipArchiveOpener,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Zipview - 压缩包漫画阅读器");
    print_config(&config);

    let (blob_cache, state_store) = open_stores(&config).await;

    let handles = ContentHandles::new();
    let loader = ArchiveLoader::new(
        Arc::new(ZipArchiveOpener),
        blob_cache.clone(),
        state_store.clone(),
        handles.clone(),
        (&config.archive).into(),
    );
    let handler = LoadArchiveHandler::new(Arc::new(loader));
    let mut store = SessionStore::new(
        blob_cache.clone(),
        state_store,
        handles,
        (&config.session).into(),
    );

    store.restore_preferences().await;
    if store.hydrate_from_cache().await {
        tracing::info!(pages = store.session().page_count(), "Previous session restored");
    }

    if let Some(path) = std::env::args().nth(1) {
        let file = read_archive_file(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        match handler.handle(&mut store, LoadArchive { file }).await {
            Ok(response) => tracing::info!(
                archive = %response.name,
                pages = response.page_count,
                toc = response.toc_len,
                "Archive loaded"
            ),
            Err(e) => tracing::error!(path = %path, error = %e, "Archive rejected"),
        }
    }

    let snapshot = GetSessionSnapshotHandler
        .handle(&store, GetSessionSnapshot { include_recent: true })
        .await;
    let cache_stats = blob_cache.stats().await;

    tracing::info!(
        pages = snapshot.page_count,
        current = snapshot.current_index,
        visible = ?snapshot.visible.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        toc = snapshot.toc.len(),
        recent = snapshot.recent.len(),
        cached_pages = cache_stats.total_entries,
        cached_bytes = cache_stats.total_size_bytes,
        "Session ready"
    );

    Ok(())
}

/// 初始化日志
fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},zipview={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 打开页面缓存与会话记录存储
///
/// 未启用或数据库打开失败时退回到不可用实现，阅读器仍可使用
async fn open_stores(config: &AppConfig) -> (Arc<dyn BlobCachePort>, Arc<dyn StateStorePort>) {
    let unavailable = || -> (Arc<dyn BlobCachePort>, Arc<dyn StateStorePort>) {
        (Arc::new(UnavailableBlobCache), Arc::new(UnavailableStateStore))
    };

    if !config.storage.cache_enabled {
        tracing::info!("Page cache disabled");
        return unavailable();
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.storage.data_dir).await {
        tracing::warn!(error = %e, "Failed to create data directory, running without cache");
        return unavailable();
    }

    let db = match open_database(config.storage.database_path()) {
        Ok(db) => db,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to open database, running without cache");
            return unavailable();
        }
    };

    let blob_cache = match SledBlobCache::new(&db, config.storage.max_cache_bytes) {
        Ok(cache) => cache,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to open page cache, running without cache");
            return unavailable();
        }
    };
    let state_store = match SledStateStore::new(&db) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to open state store, running without cache");
            return unavailable();
        }
    };

    (Arc::new(blob_cache), Arc::new(state_store))
}
