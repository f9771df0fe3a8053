//! Read-through caching decorators for the slow, rarely-changing providers

use super::SignalCache;
use crate::shared_state::AtomicCounters;
use crate::signals::{
    CareerProfile, CareerProvider, CulturalProvider, RegionalColorGuide, ReligiousGuidance, SignalResult,
    VenueProfile, VenueProvider,
};
use crate::utils::TextUtils;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Answers (including "no match") are cached; errors are not
async fn read_through<T, F, Fut>(
    cache: &dyn SignalCache,
    counters: &AtomicCounters,
    key: String,
    lookup: F,
) -> SignalResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = SignalResult<T>>,
{
    if let Some(value) = cache.get(&key).await {
        match serde_json::from_value::<Option<T>>(value) {
            Ok(answer) => {
                counters.inc_cache_hit();
                debug!("Signal cache hit for {}", key);
                return Ok(answer);
            }
            Err(e) => warn!("Discarding undecodable cache entry {}: {}", key, e),
        }
    }

    counters.inc_cache_miss();
    let answer = lookup().await?;
    match serde_json::to_value(&answer) {
        Ok(value) => cache.insert(key, value).await,
        Err(e) => warn!("Failed to encode signal for cache key {}: {}", key, e),
    }
    Ok(answer)
}

pub struct CachedVenueProvider {
    inner: Arc<dyn VenueProvider>,
    cache: Arc<dyn SignalCache>,
    counters: Arc<AtomicCounters>,
}

impl CachedVenueProvider {
    pub fn new(inner: Arc<dyn VenueProvider>, cache: Arc<dyn SignalCache>, counters: Arc<AtomicCounters>) -> Self {
        Self { inner, cache, counters }
    }
}

#[async_trait]
impl VenueProvider for CachedVenueProvider {
    async fn venue(&self, venue_type: &str) -> SignalResult<VenueProfile> {
        let key = format!("venue:{}", TextUtils::normalize_key(venue_type));
        read_through(self.cache.as_ref(), &self.counters, key, || self.inner.venue(venue_type)).await
    }
}

pub struct CachedCareerProvider {
    inner: Arc<dyn CareerProvider>,
    cache: Arc<dyn SignalCache>,
    counters: Arc<AtomicCounters>,
}

impl CachedCareerProvider {
    pub fn new(inner: Arc<dyn CareerProvider>, cache: Arc<dyn SignalCache>, counters: Arc<AtomicCounters>) -> Self {
        Self { inner, cache, counters }
    }
}

#[async_trait]
impl CareerProvider for CachedCareerProvider {
    async fn career_stage(&self, key: &str) -> SignalResult<CareerProfile> {
        let cache_key = format!("career:{}", TextUtils::normalize_key(key));
        read_through(self.cache.as_ref(), &self.counters, cache_key, || self.inner.career_stage(key)).await
    }

    async fn typical_stage_for_age(&self, age: u32) -> SignalResult<CareerProfile> {
        let cache_key = format!("career_age:{}", age);
        read_through(self.cache.as_ref(), &self.counters, cache_key, || self.inner.typical_stage_for_age(age)).await
    }
}

pub struct CachedCulturalProvider {
    inner: Arc<dyn CulturalProvider>,
    cache: Arc<dyn SignalCache>,
    counters: Arc<AtomicCounters>,
}

impl CachedCulturalProvider {
    pub fn new(inner: Arc<dyn CulturalProvider>, cache: Arc<dyn SignalCache>, counters: Arc<AtomicCounters>) -> Self {
        Self { inner, cache, counters }
    }
}

#[async_trait]
impl CulturalProvider for CachedCulturalProvider {
    async fn regional_colors(&self, region: &str) -> SignalResult<RegionalColorGuide> {
        let key = format!("region:{}", TextUtils::normalize_key(region));
        read_through(self.cache.as_ref(), &self.counters, key, || self.inner.regional_colors(region)).await
    }

    async fn religious_guidance(&self, religion: &str) -> SignalResult<ReligiousGuidance> {
        let key = format!("religion:{}", TextUtils::normalize_key(religion));
        read_through(self.cache.as_ref(), &self.counters, key, || self.inner.religious_guidance(religion)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache_management::{MokaSignalCache, SignalCacheConfig};
    use crate::signals::{Lighting, SignalError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingVenues {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl VenueProvider for CountingVenues {
        async fn venue(&self, venue_type: &str) -> SignalResult<VenueProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SignalError::unavailable("venue", "offline"));
            }
            if venue_type == "church" {
                Ok(Some(VenueProfile { strictness: 8, primary_lighting: Lighting::Tungsten }))
            } else {
                Ok(None)
            }
        }
    }

    fn cached(inner: Arc<CountingVenues>) -> (CachedVenueProvider, Arc<AtomicCounters>) {
        let counters = Arc::new(AtomicCounters::new());
        let cache: Arc<dyn SignalCache> = Arc::new(MokaSignalCache::new(&SignalCacheConfig::default()));
        (CachedVenueProvider::new(inner, cache, counters.clone()), counters)
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let inner = Arc::new(CountingVenues { calls: AtomicUsize::new(0), fail: false });
        let (provider, counters) = cached(inner.clone());

        let first = provider.venue("church").await.unwrap();
        let second = provider.venue("Church").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(counters.cache_hits.load(Ordering::Relaxed), 1);
        assert_eq!(counters.cache_misses.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_no_match_is_cached() {
        let inner = Arc::new(CountingVenues { calls: AtomicUsize::new(0), fail: false });
        let (provider, _) = cached(inner.clone());

        assert_eq!(provider.venue("submarine").await, Ok(None));
        assert_eq!(provider.venue("submarine").await, Ok(None));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = Arc::new(CountingVenues { calls: AtomicUsize::new(0), fail: true });
        let (provider, _) = cached(inner.clone());

        assert!(provider.venue("church").await.is_err());
        assert!(provider.venue("church").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
