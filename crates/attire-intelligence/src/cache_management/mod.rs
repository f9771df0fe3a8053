// src/cache_management/mod.rs

//! Signal cache - bounded, time-limited memoization of provider lookups
//!
//! The cache is injected into providers rather than living inside them, so a single
//! bounded instance can be shared, swapped for a no-op in tests, or flushed on shutdown.

pub mod cache_config;
pub mod cached_providers;
pub mod signal_cache;

pub use cache_config::SignalCacheConfig;
pub use cached_providers::{CachedCareerProvider, CachedCulturalProvider, CachedVenueProvider};
pub use signal_cache::{MokaSignalCache, NoopSignalCache, SignalCache};

use std::sync::Arc;
use tracing::info;

/// Create the signal cache described by `config`
pub fn create_signal_cache(config: &SignalCacheConfig) -> Arc<dyn SignalCache> {
    if config.enabled {
        info!(
            "Signal cache enabled: {} entries, {}s TTL",
            config.max_entries, config.ttl_seconds
        );
        Arc::new(MokaSignalCache::new(config))
    } else {
        info!("Signal cache disabled");
        Arc::new(NoopSignalCache)
    }
}
