//! Price tier from career stage and occasion importance
//!
//! Tiered mode reads a fixed price-tier table; fallback mode derives the band from
//! career investment when the table is missing or lacks the selected tier. Both modes
//! pick the tier name with the same base-tier rules.

use crate::context_engine::context::{PriceBreakdown, PriceTier};
use crate::context_engine::formality::{career_profile, CAREER_SIGNAL};
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{CareerProfile, CareerProvider, PriceTierProvider, PriceTierTable, TierName};
use crate::utils::TextUtils;
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

pub const PRICE_TABLE_SIGNAL: &str = "price_tier_table";

/// Occasions at or above this multiplier step up one tier
const PROMOTION_THRESHOLD: f64 = 1.5;
const SUIT_SHARE_OF_INVESTMENT: f64 = 0.35;
const BAND_LOW: f64 = 0.6;
const BAND_HIGH: f64 = 1.4;
const DEFAULT_BAND: (f64, f64) = (200.0, 400.0);

lazy_static! {
    static ref OCCASION_IMPORTANCE: HashMap<&'static str, f64> = {
        let mut m = HashMap::new();
        m.insert("wedding", 1.5);
        m.insert("gala", 1.5);
        m.insert("prom", 1.3);
        m.insert("interview", 1.2);
        m.insert("funeral", 1.0);
        m.insert("business", 1.0);
        m.insert("casual", 0.9);
        m
    };
}

pub fn importance_multiplier(occasion: Option<&str>) -> f64 {
    occasion.and_then(|o| OCCASION_IMPORTANCE.get(o).copied()).unwrap_or(1.0)
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| TextUtils::contains_ignore_case(text, n))
}

/// Base tier from role level, occupation and age; `mid` when nothing fires
pub fn base_tier(request: &RecommendationRequest) -> TierName {
    let mut tier = request.role_level().and_then(|role| {
        if contains_any(role, &["c-level", "c_level", "chief", "executive"]) {
            Some(TierName::Luxury)
        } else if contains_any(role, &["director", "vp", "vice president"]) {
            Some(TierName::Premium)
        } else if contains_any(role, &["manager", "senior"]) {
            Some(TierName::Mid)
        } else if contains_any(role, &["entry", "junior", "intern"]) {
            Some(TierName::Entry)
        } else {
            None
        }
    });

    if request.occupation().map_or(false, |o| contains_any(o, &["lawyer", "attorney", "banker", "consultant"])) {
        tier = Some(tier.unwrap_or(TierName::Mid).max(TierName::Premium));
    }

    match request.age {
        Some(age) if age > 40 => tier = Some(tier.unwrap_or(TierName::Mid).max(TierName::Mid)),
        Some(age) if age < 25 && tier.is_none() => tier = Some(TierName::Entry),
        _ => {}
    }

    tier.unwrap_or(TierName::Mid)
}

pub struct PriceTierCalculator {
    career: Arc<dyn CareerProvider>,
    tiers: Arc<dyn PriceTierProvider>,
}

impl PriceTierCalculator {
    pub fn new(career: Arc<dyn CareerProvider>, tiers: Arc<dyn PriceTierProvider>) -> Self {
        Self { career, tiers }
    }

    async fn career_for_pricing(&self, request: &RecommendationRequest) -> Option<CareerProfile> {
        if let Some(profile) = career_profile(self.career.as_ref(), request).await {
            return Some(profile);
        }
        let age = request.age?;
        accept(CAREER_SIGNAL, &age.to_string(), self.career.typical_stage_for_age(age).await)
    }

    pub async fn calculate(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> PriceTier {
        let occasion = request.occasion_key();
        let multiplier = importance_multiplier(occasion.as_deref());
        let base = base_tier(request);

        let table = accept(PRICE_TABLE_SIGNAL, "tier_table", self.tiers.tier_table().await);
        if let Some(table) = table {
            if let Some(tier) = Self::tiered(&table, base, multiplier, occasion.as_deref(), trace) {
                return tier;
            }
        }

        let career = self.career_for_pricing(request).await;
        Self::fallback(base, career.as_ref(), multiplier, occasion.as_deref(), trace)
    }

    fn tiered(
        table: &PriceTierTable,
        base: TierName,
        multiplier: f64,
        occasion: Option<&str>,
        trace: &mut SignalTrace,
    ) -> Option<PriceTier> {
        let promoted = multiplier >= PROMOTION_THRESHOLD;
        let tier = if promoted { base.promote() } else { base };
        let Some(pricing) = table.get(tier) else {
            tracing::warn!("Price tier table has no `{}` tier, using career-based pricing", tier);
            return None;
        };

        let min = pricing.min_investment.round();
        let max = pricing.max_investment.round();
        trace.contribute(
            PRICE_TABLE_SIGNAL,
            format!("{} tier: ${}-${} ({})", TextUtils::title_case(tier.as_str()), min, max, pricing.quality_level),
        );
        if promoted && tier != base {
            if let Some(occasion) = occasion {
                trace.reason(format!(
                    "{} is a significant occasion, stepping up from {} to {} tier",
                    TextUtils::title_case(occasion),
                    base,
                    tier
                ));
            }
        }

        let accessory_cap = (pricing.max_investment * pricing.max_accessory_pct).floor();
        let mut shoe_range = pricing.shoes;
        let mut shoe_tier = tier;
        if accessory_cap < pricing.shoes.min {
            let entry_shoes = table.get(TierName::Entry).map(|entry| entry.shoes);
            trace.reason(format!(
                "Accessory budget ${} is below the {} tier shoe minimum ${}; recommending entry-tier shoes",
                accessory_cap, tier, pricing.shoes.min
            ));
            if let Some(shoes) = entry_shoes {
                shoe_range = shoes;
                shoe_tier = TierName::Entry;
            }
        }

        Some(PriceTier {
            range: tier,
            min_investment: min,
            max_investment: max,
            quality_level: pricing.quality_level.clone(),
            breakdown: Some(PriceBreakdown {
                suit: pricing.suit,
                shirt: pricing.shirt,
                tie: pricing.tie,
                accessory_cap,
                shoe_range,
                shoe_tier,
            }),
        })
    }

    fn fallback(
        base: TierName,
        career: Option<&CareerProfile>,
        multiplier: f64,
        occasion: Option<&str>,
        trace: &mut SignalTrace,
    ) -> PriceTier {
        let (mut min, mut max, quality_level) = match career {
            Some(profile) => {
                let suit_budget = profile.investment * SUIT_SHARE_OF_INVESTMENT;
                (suit_budget * BAND_LOW, suit_budget * BAND_HIGH, profile.quality_label.clone())
            }
            None => (DEFAULT_BAND.0, DEFAULT_BAND.1, base.default_quality_label().to_string()),
        };

        if let Some(profile) = career {
            trace.contribute(
                CAREER_SIGNAL,
                format!(
                    "{} career stage suggests {} tier: ${}-${}",
                    TextUtils::title_case(&profile.stage),
                    base,
                    min.round(),
                    max.round()
                ),
            );
        }

        if multiplier > 1.0 {
            min *= multiplier;
            max *= multiplier;
            if let Some(occasion) = occasion {
                trace.reason(format!(
                    "{} is a significant occasion, worth investing in quality",
                    TextUtils::title_case(occasion)
                ));
            }
        }

        let min = min.max(0.0).round();
        let max = max.max(0.0).round().max(min);
        PriceTier {
            range: base,
            min_investment: min,
            max_investment: max,
            quality_level,
            breakdown: None,
        }
    }
}

#[async_trait]
impl PipelineStep for PriceTierCalculator {
    fn name(&self) -> &'static str {
        "price_tier"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.price_tier = Some(self.calculate(request, trace).await);
        Ok(())
    }
}
