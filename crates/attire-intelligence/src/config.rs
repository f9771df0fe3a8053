// attire-intelligence/src/config.rs

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
#[cfg(feature = "cli")]
use tracing::warn;

use crate::cache_management::SignalCacheConfig;
use crate::context_engine::OrchestratorConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory holding JSON catalog overrides
    pub data_dir: Option<PathBuf>,
    pub cache: SignalCacheConfig,
    pub orchestrator: OrchestratorConfig,
    /// Pins the monthly calendar signal; the current month when unset
    pub calendar_month: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let data_dir = lookup("ATTIRE_DATA_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        let cache = SignalCacheConfig {
            enabled: parse_or(&lookup, "SIGNAL_CACHE_ENABLED", defaults.cache.enabled)?,
            max_entries: parse_or(&lookup, "SIGNAL_CACHE_MAX_ENTRIES", defaults.cache.max_entries)?,
            ttl_seconds: parse_or(&lookup, "SIGNAL_CACHE_TTL_SECONDS", defaults.cache.ttl_seconds)?,
        };

        let persona_occasions = match lookup("PERSONA_OCCASIONS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.orchestrator.persona_occasions.clone(),
        };

        let orchestrator = OrchestratorConfig {
            enabled: parse_or(&lookup, "CONTEXT_ENGINE_ENABLED", defaults.orchestrator.enabled)?,
            persona_occasions,
            wedding_forecast_depth: parse_or(
                &lookup,
                "WEDDING_FORECAST_DEPTH",
                defaults.orchestrator.wedding_forecast_depth,
            )?,
        };

        let calendar_month = match lookup("CALENDAR_MONTH") {
            Some(raw) => {
                let month: u32 = raw.trim().parse().context("CALENDAR_MONTH must be a number")?;
                if !(1..=12).contains(&month) {
                    anyhow::bail!("CALENDAR_MONTH must be between 1 and 12, got {}", month);
                }
                Some(month)
            }
            None => None,
        };

        info!(
            "Context configuration: cache {} ({} entries, {}s TTL), persona occasions [{}], forecast depth {}",
            if cache.enabled { "on" } else { "off" },
            cache.max_entries,
            cache.ttl_seconds,
            orchestrator.persona_occasions.join(", "),
            orchestrator.wedding_forecast_depth
        );

        Ok(Self {
            data_dir,
            cache,
            orchestrator,
            calendar_month,
        })
    }
}

#[cfg(feature = "cli")]
fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}. Using system environment variables.", e);
    } else {
        info!("Loaded environment variables from .env file");
    }
}

#[cfg(not(feature = "cli"))]
fn load_dotenv() {}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.cache.ttl_seconds, 14400);
        assert!(config.orchestrator.enabled);
        assert_eq!(config.orchestrator.persona_occasions, ["prom"]);
        assert_eq!(config.orchestrator.wedding_forecast_depth, 5);
        assert_eq!(config.calendar_month, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ATTIRE_DATA_DIR", "/srv/catalogs"),
            ("SIGNAL_CACHE_ENABLED", "false"),
            ("SIGNAL_CACHE_TTL_SECONDS", "60"),
            ("PERSONA_OCCASIONS", "prom, homecoming"),
            ("WEDDING_FORECAST_DEPTH", "3"),
            ("CALENDAR_MONTH", "10"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/catalogs")));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.orchestrator.persona_occasions, ["prom", "homecoming"]);
        assert_eq!(config.orchestrator.wedding_forecast_depth, 3);
        assert_eq!(config.calendar_month, Some(10));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("SIGNAL_CACHE_MAX_ENTRIES", "lots")]).is_err());
        assert!(config_from(&[("CALENDAR_MONTH", "13")]).is_err());
        assert!(config_from(&[("CONTEXT_ENGINE_ENABLED", "maybe")]).is_err());
    }
}
