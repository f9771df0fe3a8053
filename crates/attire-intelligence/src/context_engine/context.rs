//! The fused decision object returned by the context builder

use crate::signals::{PriceRange, TierName};
use serde::{Deserialize, Serialize};

pub const MIN_FORMALITY: i32 = 1;
pub const MAX_FORMALITY: i32 = 10;

pub const FALLBACK_SIGNAL: &str = "fallback";
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
pub const FALLBACK_REASONING: &str =
    "Using general recommendations; enhance your profile for personalized suggestions";

/// Closed formality interval on the 1-10 scale, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct FormalityRange {
    min: u8,
    max: u8,
}

impl FormalityRange {
    /// Clamps both ends to 1-10; an inverted pair collapses onto `max`
    pub fn new(min: i32, max: i32) -> Self {
        let max = max.clamp(MIN_FORMALITY, MAX_FORMALITY);
        let min = min.clamp(MIN_FORMALITY, MAX_FORMALITY).min(max);
        Self { min: min as u8, max: max as u8 }
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, level: u8) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

impl Default for FormalityRange {
    fn default() -> Self {
        Self::new(5, 8)
    }
}

impl From<[u8; 2]> for FormalityRange {
    fn from([min, max]: [u8; 2]) -> Self {
        Self::new(min as i32, max as i32)
    }
}

impl From<FormalityRange> for [u8; 2] {
    fn from(range: FormalityRange) -> Self {
        [range.min, range.max]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorFilters {
    pub preferred: Vec<String>,
    pub avoid: Vec<String>,
    pub photograph_well: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FabricPreferences {
    pub recommended: Vec<String>,
    pub avoid: Vec<String>,
    pub performance_priorities: Vec<String>,
}

/// Per-item price guidance read from the tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub suit: PriceRange,
    pub shirt: PriceRange,
    pub tie: PriceRange,
    /// `floor(max_investment * max_accessory_pct)`
    pub accessory_cap: f64,
    pub shoe_range: PriceRange,
    pub shoe_tier: TierName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub range: TierName,
    pub min_investment: f64,
    pub max_investment: f64,
    pub quality_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PriceBreakdown>,
}

impl Default for PriceTier {
    fn default() -> Self {
        Self {
            range: TierName::Mid,
            min_investment: 200.0,
            max_investment: 400.0,
            quality_level: TierName::Mid.default_quality_label().to_string(),
            breakdown: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitGuidance {
    pub style: String,
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_standard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagBoost {
    pub tag: String,
    pub boost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductTags {
    /// Deduplicated, first-seen order
    pub all_tags: Vec<String>,
    /// One entry per contributing source; a tag may appear more than once
    pub boosts: Vec<TagBoost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub formality_range: FormalityRange,
    pub color_filters: ColorFilters,
    pub fabric_preferences: FabricPreferences,
    pub price_tier: PriceTier,
    pub fit_guidance: FitGuidance,
    pub product_tags: ProductTags,
    pub max_recommendations: u8,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    pub signals_used: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RecommendationContext {
    /// Safe default returned when the build fails; `reasoning` is whatever was
    /// accumulated before the failure
    pub fn fallback(mut reasoning: Vec<String>) -> Self {
        reasoning.push(FALLBACK_REASONING.to_string());
        Self {
            formality_range: FormalityRange::default(),
            color_filters: ColorFilters {
                preferred: strings(&["navy", "charcoal", "black"]),
                avoid: Vec::new(),
                photograph_well: strings(&["navy", "charcoal"]),
            },
            fabric_preferences: FabricPreferences {
                recommended: strings(&["worsted_wool", "wool_blend"]),
                avoid: Vec::new(),
                performance_priorities: strings(&["durability"]),
            },
            price_tier: PriceTier::default(),
            fit_guidance: FitGuidance {
                style: "classic".to_string(),
                details: strings(&["Regular fit", "Notch lapel"]),
                industry_standard: None,
            },
            product_tags: ProductTags::default(),
            max_recommendations: 10,
            reasoning,
            confidence: FALLBACK_CONFIDENCE,
            signals_used: vec![FALLBACK_SIGNAL.to_string()],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.signals_used.len() == 1 && self.signals_used[0] == FALLBACK_SIGNAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formality_range_clamps_and_orders() {
        let range = FormalityRange::new(12, 15);
        assert_eq!((range.min(), range.max()), (10, 10));
        let range = FormalityRange::new(-3, 2);
        assert_eq!((range.min(), range.max()), (1, 2));
        let inverted = FormalityRange::new(9, 4);
        assert!(inverted.min() <= inverted.max());
    }

    #[test]
    fn test_formality_range_serializes_as_pair() {
        let json = serde_json::to_string(&FormalityRange::new(6, 9)).unwrap();
        assert_eq!(json, "[6,9]");
        let parsed: FormalityRange = serde_json::from_str("[7,10]").unwrap();
        assert!(parsed.contains(8));
    }

    #[test]
    fn test_fallback_keeps_prior_reasoning() {
        let context = RecommendationContext::fallback(vec!["Church setting requires formality level 7-9".to_string()]);
        assert!(context.is_fallback());
        assert_eq!(context.confidence, 0.5);
        assert_eq!(context.reasoning.len(), 2);
        assert_eq!(context.reasoning.last().map(String::as_str), Some(FALLBACK_REASONING));
        assert_eq!(context.price_tier.range, TierName::Mid);
        assert_eq!(context.price_tier.quality_level, "professional");
    }

    #[test]
    fn test_price_tier_serializes_range_name() {
        let value = serde_json::to_value(PriceTier::default()).unwrap();
        assert_eq!(value["range"], "mid");
        assert!(value.get("breakdown").is_none());
    }
}
