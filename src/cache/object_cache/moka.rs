use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct CachedValue {
    data: String,
    ttl: Duration,
}

/// 每个条目按写入时携带的 TTL 过期
struct PerEntryExpiry;

impl Expiry<String, CachedValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, CachedValue>,
    default_ttl: u64,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Self::with_settings(config.cache.memory.max_capacity, config.cache.default_ttl)
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Result<Self, String> {
        if default_ttl == 0 {
            return Err("cache.default_ttl must be greater than 0".to_string());
        }

        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Ok(Self { inner, default_ttl })
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(value.data)
            }
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        self.inner
            .insert(
                key,
                CachedValue {
                    data: value,
                    ttl: Duration::from_secs(ttl),
                },
            )
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();

        assert_eq!(cache.get_raw("blacklist:a").await, CacheResult::NotFound);

        cache
            .insert_raw("blacklist:a".into(), "1".into(), 0)
            .await;
        assert_eq!(
            cache.get_raw("blacklist:a").await,
            CacheResult::Found("1".to_string())
        );

        cache.remove("blacklist:a").await;
        assert_eq!(cache.get_raw("blacklist:a").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_with_own_ttl() {
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();
        cache.insert_raw("short".into(), "v".into(), 1).await;
        cache.insert_raw("long".into(), "v".into(), 0).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert!(matches!(cache.get_raw("long").await, CacheResult::Found(_)));
    }

    #[test]
    fn test_zero_default_ttl_rejected() {
        assert!(MokaCacheWrapper::with_settings(100, 0).is_err());
    }
}
