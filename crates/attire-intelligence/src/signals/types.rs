//! Payload types returned by signal providers

use super::{SignalError, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primary lighting of a venue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Lighting {
    Tungsten,
    Fluorescent,
    Natural,
    Led,
    Incandescent,
    Mixed,
    Other(String),
}

impl Lighting {
    pub fn as_str(&self) -> &str {
        match self {
            Lighting::Tungsten => "tungsten",
            Lighting::Fluorescent => "fluorescent",
            Lighting::Natural => "natural",
            Lighting::Led => "led",
            Lighting::Incandescent => "incandescent",
            Lighting::Mixed => "mixed",
            Lighting::Other(name) => name,
        }
    }
}

impl From<String> for Lighting {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tungsten" => Lighting::Tungsten,
            "fluorescent" => Lighting::Fluorescent,
            "natural" => Lighting::Natural,
            "led" => Lighting::Led,
            "incandescent" => Lighting::Incandescent,
            "mixed" => Lighting::Mixed,
            other => Lighting::Other(other.to_string()),
        }
    }
}

impl From<Lighting> for String {
    fn from(value: Lighting) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueProfile {
    /// Dress code strictness, 1-10
    pub strictness: u8,
    pub primary_lighting: Lighting,
}

impl Validate for VenueProfile {
    fn validate(&self) -> Result<(), SignalError> {
        if !(1..=10).contains(&self.strictness) {
            return Err(SignalError::malformed(
                "venue",
                "strictness",
                format!("{} is outside 1-10", self.strictness),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerProfile {
    pub stage: String,
    pub formality_score: u8,
    /// Average total wardrobe investment for the stage
    pub investment: f64,
    pub quality_label: String,
}

impl Validate for CareerProfile {
    fn validate(&self) -> Result<(), SignalError> {
        if !(1..=10).contains(&self.formality_score) {
            return Err(SignalError::malformed(
                "career",
                "formality_score",
                format!("{} is outside 1-10", self.formality_score),
            ));
        }
        if !self.investment.is_finite() || self.investment < 0.0 {
            return Err(SignalError::malformed("career", "investment", "must be a non-negative number"));
        }
        if self.quality_label.trim().is_empty() {
            return Err(SignalError::malformed("career", "quality_label", "is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAppropriateness {
    pub color: String,
    /// 0-10, below 4 is a taboo, above 7 is preferred
    pub appropriateness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RegionalColorGuide {
    pub colors: Vec<ColorAppropriateness>,
}

impl Validate for RegionalColorGuide {
    fn validate(&self) -> Result<(), SignalError> {
        match self.colors.iter().find(|c| c.appropriateness > 10 || c.color.trim().is_empty()) {
            Some(bad) => Err(SignalError::malformed(
                "cultural",
                "appropriateness",
                format!("invalid entry for color `{}` ({})", bad.color, bad.appropriateness),
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReligiousGuidance {
    pub preferred_colors: Vec<String>,
    pub dress_code: String,
}

impl Validate for ReligiousGuidance {
    fn validate(&self) -> Result<(), SignalError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SeasonPalette {
    pub primary: Vec<String>,
    #[serde(default)]
    pub accent: Vec<String>,
}

impl Validate for SeasonPalette {
    fn validate(&self) -> Result<(), SignalError> {
        if self.primary.is_empty() {
            return Err(SignalError::malformed("seasonal", "primary", "is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SeasonFabrics {
    pub excellent: Vec<String>,
    #[serde(default)]
    pub good: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

impl Validate for SeasonFabrics {
    fn validate(&self) -> Result<(), SignalError> {
        if self.excellent.is_empty() {
            return Err(SignalError::malformed("seasonal", "excellent", "is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPalette {
    pub month: u32,
    pub colors: Vec<String>,
}

impl Validate for MonthlyPalette {
    fn validate(&self) -> Result<(), SignalError> {
        if !(1..=12).contains(&self.month) {
            return Err(SignalError::malformed("calendar", "month", format!("{} is not a month", self.month)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFabrics {
    pub month: u32,
    pub fabrics: Vec<String>,
}

impl Validate for MonthlyFabrics {
    fn validate(&self) -> Result<(), SignalError> {
        if !(1..=12).contains(&self.month) {
            return Err(SignalError::malformed("calendar", "month", format!("{} is not a month", self.month)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Hot,
    Mild,
    Cold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricQuery {
    pub occasion: Option<String>,
    pub climate: Climate,
    pub photography: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FabricRanking {
    /// Best first
    pub fabrics: Vec<String>,
    #[serde(default)]
    pub reasoning: Vec<String>,
}

impl Validate for FabricRanking {
    fn validate(&self) -> Result<(), SignalError> {
        Ok(())
    }
}

/// Boost carried by persona tags; tag-mapping boosts stay strictly below it
pub const PERSONA_BOOST: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagMatch {
    pub tags: Vec<String>,
    pub boost: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl Validate for TagMatch {
    fn validate(&self) -> Result<(), SignalError> {
        if !self.boost.is_finite() || self.boost < 1.0 {
            return Err(SignalError::malformed("tag_mapping", "boost", format!("{} is below 1.0", self.boost)));
        }
        if self.boost >= PERSONA_BOOST {
            return Err(SignalError::malformed(
                "tag_mapping",
                "boost",
                format!("{} reaches the persona boost {}", self.boost, PERSONA_BOOST),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersonaHints {
    pub style: Option<String>,
    pub color: Option<String>,
    pub personality: Option<String>,
}

impl PersonaHints {
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.color.is_none() && self.personality.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaMatch {
    pub name: String,
    pub display_name: String,
    pub tags: Vec<String>,
    pub colors: Vec<String>,
    pub styling_notes: String,
    pub confidence: f64,
}

impl Validate for PersonaMatch {
    fn validate(&self) -> Result<(), SignalError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SignalError::malformed("persona", "confidence", format!("{} is outside 0-1", self.confidence)));
        }
        if self.name.trim().is_empty() {
            return Err(SignalError::malformed("persona", "name", "is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendColor {
    pub rank: u32,
    pub color: String,
    pub market_share_pct: f64,
    pub trend_driver: String,
    #[serde(default)]
    pub suit_colors: Vec<String>,
    #[serde(default)]
    pub best_seasons: Vec<String>,
}

impl Validate for Vec<TrendColor> {
    fn validate(&self) -> Result<(), SignalError> {
        for trend in self {
            if trend.rank == 0 {
                return Err(SignalError::malformed("trend_forecast", "rank", format!("`{}` has rank 0", trend.color)));
            }
            if !(0.0..=100.0).contains(&trend.market_share_pct) {
                return Err(SignalError::malformed(
                    "trend_forecast",
                    "market_share_pct",
                    format!("`{}` has share {}", trend.color, trend.market_share_pct),
                ));
            }
        }
        Ok(())
    }
}

/// Named price/quality bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    Entry,
    Mid,
    Premium,
    Luxury,
}

impl TierName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierName::Entry => "entry",
            TierName::Mid => "mid",
            TierName::Premium => "premium",
            TierName::Luxury => "luxury",
        }
    }

    /// One tier up; luxury caps
    pub fn promote(self) -> Self {
        match self {
            TierName::Entry => TierName::Mid,
            TierName::Mid => TierName::Premium,
            TierName::Premium | TierName::Luxury => TierName::Luxury,
        }
    }

    pub fn default_quality_label(&self) -> &'static str {
        match self {
            TierName::Entry => "starter",
            TierName::Mid => "professional",
            TierName::Premium => "senior_professional",
            TierName::Luxury => "executive",
        }
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPricing {
    pub min_investment: f64,
    pub max_investment: f64,
    pub quality_level: String,
    pub suit: PriceRange,
    pub shirt: PriceRange,
    pub tie: PriceRange,
    pub shoes: PriceRange,
    /// Fraction of `max_investment` available for accessories
    pub max_accessory_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceTierTable {
    pub tiers: BTreeMap<TierName, TierPricing>,
}

impl PriceTierTable {
    pub fn get(&self, tier: TierName) -> Option<&TierPricing> {
        self.tiers.get(&tier)
    }
}

impl Validate for PriceTierTable {
    fn validate(&self) -> Result<(), SignalError> {
        for (name, tier) in &self.tiers {
            let investment = PriceRange::new(tier.min_investment, tier.max_investment);
            let ranges = [investment, tier.suit, tier.shirt, tier.tie, tier.shoes];
            if ranges.iter().any(|r| !r.is_valid()) {
                return Err(SignalError::malformed(
                    "price_tier",
                    "range",
                    format!("tier `{}` has an inverted or negative range", name),
                ));
            }
            if !(0.0..=1.0).contains(&tier.max_accessory_pct) {
                return Err(SignalError::malformed(
                    "price_tier",
                    "max_accessory_pct",
                    format!("tier `{}` has {}", name, tier.max_accessory_pct),
                ));
            }
        }
        Ok(())
    }
}
