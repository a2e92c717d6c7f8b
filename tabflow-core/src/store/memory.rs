//! In-memory cache store backed by moka.
//!
//! moka gives us lock-free concurrent access (distinct keys never contend)
//! and per-entry expiry through its [`Expiry`] policy; the engine carries a
//! different TTL per namespace, so the TTL travels with each entry rather
//! than being fixed at cache construction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use super::{CacheKey, CacheStore, CacheValue, StoreResult};

#[derive(Clone)]
struct Entry {
    value: Arc<CacheValue>,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    // An overwrite replaces the expiry along with the value.
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// A process-local [`CacheStore`] with per-entry TTL.
pub struct MemoryStore {
    cache: Cache<String, Entry>,
}

impl MemoryStore {
    /// Create a store holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn put(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> StoreResult<()> {
        let entry = Entry {
            value: Arc::new(value),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CacheValue>>> {
        Ok(self
            .cache
            .get(&key.to_string())
            .await
            .map(|entry| entry.value))
    }

    async fn delete(&self, key: &CacheKey) -> StoreResult<bool> {
        Ok(self.cache.remove(&key.to_string()).await.is_some())
    }
}
