//! Built-in in-memory signal providers
//!
//! Every catalog ships with bundled defaults and can be replaced by a JSON file of the
//! same shape placed in the configured data directory.

pub mod career;
pub mod cultural;
pub mod fabric;
pub mod persona;
pub mod pricing;
pub mod seasonal;
pub mod tags;
pub mod trends;
pub mod venue;

pub use career::StaticCareerProvider;
pub use cultural::StaticCulturalProvider;
pub use fabric::{FabricPerformanceRow, StaticFabricPerformanceProvider};
pub use persona::{PersonaProfile, StaticPersonaProvider};
pub use pricing::StaticPriceTierProvider;
pub use seasonal::{StaticCalendarProvider, StaticSeasonalProvider};
pub use tags::{StaticTagMappingProvider, TagMappingTable};
pub use trends::StaticTrendForecastProvider;
pub use venue::StaticVenueProvider;

use crate::utils::TextUtils;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Map keyed by normalized lookup keys
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, T>")]
pub struct KeyedCatalog<T> {
    entries: BTreeMap<String, T>,
}

impl<T> From<BTreeMap<String, T>> for KeyedCatalog<T> {
    fn from(raw: BTreeMap<String, T>) -> Self {
        let mut catalog = Self::new();
        for (key, value) in raw {
            catalog.insert(&key, value);
        }
        catalog
    }
}

impl<T> Default for KeyedCatalog<T> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<T> KeyedCatalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: T) {
        self.entries.insert(TextUtils::normalize_key(key), value);
    }

    pub fn with(mut self, key: &str, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Exact normalized lookup
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(&TextUtils::normalize_key(key))
    }

    /// Exact lookup, then the first entry whose key contains or is contained in the query
    pub fn get_partial(&self, key: &str) -> Option<(&str, &T)> {
        let normalized = TextUtils::normalize_key(key);
        if normalized.is_empty() {
            return None;
        }
        if let Some((k, v)) = self.entries.get_key_value(&normalized) {
            return Some((k.as_str(), v));
        }
        self.entries
            .iter()
            .find(|(k, _)| normalized.contains(k.as_str()) || k.contains(normalized.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read `<dir>/<file_name>` as JSON when the directory is configured and the file exists
pub fn load_override<T: DeserializeOwned>(dir: Option<&Path>, file_name: &str) -> anyhow::Result<Option<T>> {
    let Some(dir) = dir else {
        return Ok(None);
    };
    let path = dir.join(file_name);
    if !path.exists() {
        debug!("No catalog override at {}, using bundled defaults", path.display());
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let parsed = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
    info!("Loaded catalog override from {}", path.display());
    Ok(Some(parsed))
}
