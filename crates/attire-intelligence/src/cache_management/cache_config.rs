use serde::{Deserialize, Serialize};

/// Signal cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCacheConfig {
    pub enabled: bool,

    /// Upper bound on cached lookups
    pub max_entries: u64,

    /// Seconds an entry lives after insertion
    pub ttl_seconds: u64,
}

impl Default for SignalCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            ttl_seconds: 4 * 60 * 60,
        }
    }
}
