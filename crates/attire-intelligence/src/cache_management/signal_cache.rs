use super::SignalCacheConfig;
use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use std::time::Duration;

/// Key/value store for serialized provider answers
#[async_trait]
pub trait SignalCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;

    async fn insert(&self, key: String, value: Value);

    async fn invalidate_all(&self);

    async fn entry_count(&self) -> u64;
}

/// Bounded cache with per-entry time-to-live
pub struct MokaSignalCache {
    inner: Cache<String, Value>,
}

impl MokaSignalCache {
    pub fn new(config: &SignalCacheConfig) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_seconds))
                .build(),
        }
    }
}

#[async_trait]
impl SignalCache for MokaSignalCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: String, value: Value) {
        self.inner.insert(key, value).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

/// Cache that never stores anything
pub struct NoopSignalCache;

#[async_trait]
impl SignalCache for NoopSignalCache {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn insert(&self, _key: String, _value: Value) {}

    async fn invalidate_all(&self) {}

    async fn entry_count(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_moka_cache_round_trip() {
        let cache = MokaSignalCache::new(&SignalCacheConfig::default());
        cache.insert("venue:church".to_string(), json!({"strictness": 8})).await;
        assert_eq!(cache.get("venue:church").await, Some(json!({"strictness": 8})));
        assert_eq!(cache.entry_count().await, 1);

        cache.invalidate_all().await;
        assert_eq!(cache.get("venue:church").await, None);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_noop_cache_stores_nothing() {
        let cache = NoopSignalCache;
        cache.insert("venue:church".to_string(), json!(1)).await;
        assert_eq!(cache.get("venue:church").await, None);
        assert_eq!(cache.entry_count().await, 0);
    }
}
