use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        LmsError::cache_plugin_not_found(format!("Cache backend '{name}' not found in registry"))
    })?;
    constructor().await.map(Arc::from)
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != "moka" => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to memory cache");
            let cache = build_cache("moka").await?;
            warn!("Successfully created fallback Moka (in-memory) cache backend");
            Ok(cache)
        }
        Err(e) => Err(e),
    }
}

/// 清理已过期的黑名单记录
async fn purge_blacklist(storage: &Arc<dyn Storage>) {
    let now = chrono::Utc::now().timestamp();
    match storage.purge_expired_blacklisted_tokens(now).await {
        Ok(0) => debug!("No expired blacklisted tokens to purge"),
        Ok(count) => info!("Purged {} expired blacklisted token(s)", count),
        Err(e) => warn!("Failed to purge expired blacklisted tokens: {}", e),
    }
}

/// 上传目录不存在时创建
fn ensure_upload_dir() -> Result<()> {
    let dir = &AppConfig::get().upload.dir;
    std::fs::create_dir_all(dir).map_err(|e| {
        LmsError::file_operation(format!("Failed to create upload directory {dir}: {e}"))
    })
}

/// 准备服务器启动的上下文
/// 包括 TLS 加密后端、存储、缓存和上传目录
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    purge_blacklist(&storage).await;
    ensure_upload_dir()?;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
