//! Shared state for the context builder
//!
//! Holds the signal providers, the cache that fronts them, and the counters every
//! build reports into. Constructed once and shared behind an `Arc`.

use anyhow::Context;
use std::path::Path;
use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
use serde::Serialize;
use tracing::info;

use crate::{
    cache_management::{
        create_signal_cache, CachedCareerProvider, CachedCulturalProvider, CachedVenueProvider, SignalCache,
    },
    config::Config,
    context_engine::ContextOrchestrator,
    signals::{
        catalog::{
            career, cultural, fabric, load_override, persona, pricing, seasonal, tags, trends, venue,
            StaticCalendarProvider, StaticCareerProvider, StaticCulturalProvider, StaticFabricPerformanceProvider,
            StaticPersonaProvider, StaticPriceTierProvider, StaticSeasonalProvider, StaticTagMappingProvider,
            StaticTrendForecastProvider, StaticVenueProvider,
        },
        CalendarProvider, CareerProvider, CulturalProvider, FabricPerformanceProvider, PersonaProvider,
        PriceTierProvider, SeasonalProvider, TagMappingProvider, TrendForecastProvider, VenueProvider,
    },
};

/// Atomic counters for build metrics
#[derive(Debug, Default)]
pub struct AtomicCounters {
    pub builds_total: AtomicUsize,
    pub fallbacks_total: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub cache_misses: AtomicUsize,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub builds_total: usize,
    pub fallbacks_total: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl AtomicCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_builds(&self) -> usize {
        self.builds_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn inc_fallbacks(&self) -> usize {
        self.fallbacks_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn inc_cache_hit(&self) -> usize {
        self.cache_hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn inc_cache_miss(&self) -> usize {
        self.cache_misses.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            builds_total: self.builds_total.load(Ordering::Relaxed),
            fallbacks_total: self.fallbacks_total.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}

/// One handle per signal source the context engine reads
#[derive(Clone)]
pub struct SignalProviders {
    pub venue: Arc<dyn VenueProvider>,
    pub career: Arc<dyn CareerProvider>,
    pub cultural: Arc<dyn CulturalProvider>,
    pub seasonal: Arc<dyn SeasonalProvider>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub fabric_performance: Arc<dyn FabricPerformanceProvider>,
    pub tag_mapping: Arc<dyn TagMappingProvider>,
    pub persona: Arc<dyn PersonaProvider>,
    pub trends: Arc<dyn TrendForecastProvider>,
    pub price_tiers: Arc<dyn PriceTierProvider>,
}

impl SignalProviders {
    /// Bundled catalogs, calendar pinned to the current month
    pub fn with_defaults() -> Self {
        Self {
            venue: Arc::new(StaticVenueProvider::with_defaults()),
            career: Arc::new(StaticCareerProvider::with_defaults()),
            cultural: Arc::new(StaticCulturalProvider::with_defaults()),
            seasonal: Arc::new(StaticSeasonalProvider::with_defaults()),
            calendar: Arc::new(StaticCalendarProvider::current_month(seasonal::default_calendar_table())),
            fabric_performance: Arc::new(StaticFabricPerformanceProvider::with_defaults()),
            tag_mapping: Arc::new(StaticTagMappingProvider::with_defaults()),
            persona: Arc::new(StaticPersonaProvider::with_defaults()),
            trends: Arc::new(StaticTrendForecastProvider::with_defaults()),
            price_tiers: Arc::new(StaticPriceTierProvider::with_defaults()),
        }
    }

    /// Pin the calendar signal to a fixed month
    pub fn with_calendar_month(mut self, month: u32) -> Self {
        self.calendar = Arc::new(StaticCalendarProvider::for_month(month));
        self
    }

    /// Catalogs from `data_dir` where an override file exists, bundled defaults otherwise
    pub fn load(data_dir: Option<&Path>, month: Option<u32>) -> anyhow::Result<Self> {
        let calendar_table =
            load_override(data_dir, seasonal::CALENDAR_FILE)?.unwrap_or_else(seasonal::default_calendar_table);
        let calendar = match month {
            Some(month) => StaticCalendarProvider::new(month, calendar_table),
            None => StaticCalendarProvider::current_month(calendar_table),
        };
        info!("Monthly calendar signal pinned to month {}", calendar.month());

        let tag_table: tags::TagMappingTable =
            load_override(data_dir, tags::TAG_MAPPING_FILE)?.unwrap_or_else(tags::default_tag_table);
        tag_table
            .priority_rules
            .validate()
            .with_context(|| format!("Invalid priority rules in {}", tags::TAG_MAPPING_FILE))?;

        Ok(Self {
            venue: Arc::new(StaticVenueProvider::new(
                load_override(data_dir, venue::VENUES_FILE)?.unwrap_or_else(venue::default_venues),
            )),
            career: Arc::new(StaticCareerProvider::new(
                load_override(data_dir, career::CAREER_FILE)?.unwrap_or_else(career::default_career_table),
            )),
            cultural: Arc::new(StaticCulturalProvider::new(
                load_override(data_dir, cultural::CULTURAL_FILE)?.unwrap_or_else(cultural::default_cultural_table),
            )),
            seasonal: Arc::new(StaticSeasonalProvider::new(
                load_override(data_dir, seasonal::SEASONAL_FILE)?.unwrap_or_else(seasonal::default_seasonal_table),
            )),
            calendar: Arc::new(calendar),
            fabric_performance: Arc::new(StaticFabricPerformanceProvider::new(
                load_override(data_dir, fabric::FABRIC_PERFORMANCE_FILE)?.unwrap_or_else(fabric::default_fabric_rows),
            )),
            tag_mapping: Arc::new(StaticTagMappingProvider::new(tag_table)),
            persona: Arc::new(StaticPersonaProvider::new(
                load_override(data_dir, persona::PERSONA_FILE)?.unwrap_or_else(persona::default_personas),
            )),
            trends: Arc::new(StaticTrendForecastProvider::new(
                load_override(data_dir, trends::TREND_FORECAST_FILE)?.unwrap_or_else(trends::default_trend_colors),
            )),
            price_tiers: Arc::new(StaticPriceTierProvider::new(
                load_override(data_dir, pricing::PRICE_TIER_FILE)?.unwrap_or_else(pricing::default_price_tiers),
            )),
        })
    }
}

/// Core shared state container
pub struct SharedSignalState {
    /// Providers as the engine sees them, with the slow lookups fronted by the cache
    pub providers: SignalProviders,

    pub cache: Arc<dyn SignalCache>,

    /// Configuration (read-only after initialization)
    pub config: Arc<Config>,

    pub counters: Arc<AtomicCounters>,
}

impl SharedSignalState {
    pub fn init(config: Config) -> anyhow::Result<Arc<Self>> {
        info!("Initializing shared signal state");

        let counters = Arc::new(AtomicCounters::new());
        let cache = create_signal_cache(&config.cache);
        let mut providers = SignalProviders::load(config.data_dir.as_deref(), config.calendar_month)?;

        providers.venue = Arc::new(CachedVenueProvider::new(providers.venue, cache.clone(), counters.clone()));
        providers.career = Arc::new(CachedCareerProvider::new(providers.career, cache.clone(), counters.clone()));
        providers.cultural =
            Arc::new(CachedCulturalProvider::new(providers.cultural, cache.clone(), counters.clone()));

        Ok(Arc::new(Self {
            providers,
            cache,
            config: Arc::new(config),
            counters,
        }))
    }

    pub fn orchestrator(&self) -> ContextOrchestrator {
        ContextOrchestrator::new(&self.providers, self.config.orchestrator.clone(), self.counters.clone())
    }

    pub async fn shutdown(&self) {
        self.cache.invalidate_all().await;
        let snapshot = self.counters.snapshot();
        info!(
            "Shutting down: {} builds, {} fallbacks, {} cache hits, {} cache misses",
            snapshot.builds_total, snapshot.fallbacks_total, snapshot.cache_hits, snapshot.cache_misses
        );
    }
}
