//! Signal providers - typed contracts for every intelligence source the fusion core reads
//!
//! Each lookup resolves to `Ok(Some(_))` for a valid answer, `Ok(None)` for "no match",
//! or a [`SignalError`] when the source is unavailable or answered with a payload that
//! fails validation. Sub-builders treat the last three identically.

pub mod catalog;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{
    CareerProfile, ColorAppropriateness, FabricQuery, FabricRanking, Climate, Lighting,
    MonthlyFabrics, MonthlyPalette, PersonaHints, PersonaMatch, PriceRange, PriceTierTable,
    RegionalColorGuide, ReligiousGuidance, SeasonFabrics, SeasonPalette, TagMatch, TierName,
    TierPricing, TrendColor, VenueProfile, PERSONA_BOOST,
};

/// Failure reported by a signal provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("{source_name} unavailable: {reason}")]
    Unavailable { source_name: &'static str, reason: String },

    #[error("{source_name} returned malformed data: field `{field}` {reason}")]
    Malformed {
        source_name: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl SignalError {
    pub fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        SignalError::Unavailable { source_name, reason: reason.into() }
    }

    pub fn malformed(source_name: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        SignalError::Malformed { source_name, field, reason: reason.into() }
    }
}

pub type SignalResult<T> = Result<Option<T>, SignalError>;

/// Payloads check their own invariants at the provider boundary
pub trait Validate {
    fn validate(&self) -> Result<(), SignalError>;
}

/// Validate a lookup result, turning an invalid payload into `SignalError::Malformed`
pub fn validated<T: Validate>(result: SignalResult<T>) -> SignalResult<T> {
    match result {
        Ok(Some(value)) => {
            value.validate()?;
            Ok(Some(value))
        }
        other => other,
    }
}

#[async_trait]
pub trait VenueProvider: Send + Sync {
    async fn venue(&self, venue_type: &str) -> SignalResult<VenueProfile>;
}

#[async_trait]
pub trait CareerProvider: Send + Sync {
    /// Career stage keyed by role level or occupation
    async fn career_stage(&self, key: &str) -> SignalResult<CareerProfile>;

    async fn typical_stage_for_age(&self, age: u32) -> SignalResult<CareerProfile>;
}

#[async_trait]
pub trait CulturalProvider: Send + Sync {
    async fn regional_colors(&self, region: &str) -> SignalResult<RegionalColorGuide>;

    async fn religious_guidance(&self, religion: &str) -> SignalResult<ReligiousGuidance>;
}

#[async_trait]
pub trait SeasonalProvider: Send + Sync {
    async fn palette(&self, season: &str) -> SignalResult<SeasonPalette>;

    async fn fabrics(&self, season: &str) -> SignalResult<SeasonFabrics>;
}

/// Recurring monthly calendar signal
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn monthly_palette(&self) -> SignalResult<MonthlyPalette>;

    async fn monthly_fabrics(&self) -> SignalResult<MonthlyFabrics>;
}

#[async_trait]
pub trait FabricPerformanceProvider: Send + Sync {
    async fn recommend(&self, query: &FabricQuery) -> SignalResult<FabricRanking>;
}

#[async_trait]
pub trait TagMappingProvider: Send + Sync {
    async fn occasion_tags(
        &self,
        occasion: &str,
        season: Option<&str>,
        venue: Option<&str>,
    ) -> SignalResult<TagMatch>;

    async fn venue_tags(&self, venue: &str) -> SignalResult<TagMatch>;

    async fn season_tags(&self, season: &str) -> SignalResult<TagMatch>;

    async fn style_tags(&self, style: &str) -> SignalResult<TagMatch>;
}

#[async_trait]
pub trait PersonaProvider: Send + Sync {
    async fn detect(&self, hints: &PersonaHints) -> SignalResult<PersonaMatch>;
}

#[async_trait]
pub trait TrendForecastProvider: Send + Sync {
    /// Top `limit` forecast colors ordered by rank (rank 1 first)
    async fn top_ranked(&self, limit: usize) -> SignalResult<Vec<TrendColor>>;

    async fn by_season(&self, season: &str) -> SignalResult<Vec<TrendColor>>;
}

#[async_trait]
pub trait PriceTierProvider: Send + Sync {
    async fn tier_table(&self) -> SignalResult<PriceTierTable>;
}
