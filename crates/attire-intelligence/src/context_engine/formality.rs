//! Formality band from venue strictness, occasion and career stage

use crate::context_engine::context::FormalityRange;
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{CareerProfile, CareerProvider, VenueProvider};
use crate::utils::TextUtils;
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

pub const VENUE_SIGNAL: &str = "venue_intelligence";
pub const OCCASION_SIGNAL: &str = "occasion_analysis";
pub const CAREER_SIGNAL: &str = "career_intelligence";

const DEFAULT_BAND: (i32, i32) = (5, 8);

pub struct OccasionAdjustment {
    pub min_delta: i32,
    pub max_delta: i32,
    pub reasoning: &'static str,
}

lazy_static! {
    pub static ref OCCASION_FORMALITY: HashMap<&'static str, OccasionAdjustment> = {
        let mut m = HashMap::new();
        m.insert("wedding", OccasionAdjustment { min_delta: 1, max_delta: 2, reasoning: "Weddings call for elevated formality and refined presentation" });
        m.insert("prom", OccasionAdjustment { min_delta: 0, max_delta: 2, reasoning: "Prom is a formal occasion deserving of polished attire" });
        m.insert("interview", OccasionAdjustment { min_delta: 2, max_delta: 2, reasoning: "Job interviews require professional, conservative presentation" });
        m.insert("funeral", OccasionAdjustment { min_delta: 2, max_delta: 2, reasoning: "Funerals require respectful, conservative attire" });
        m.insert("gala", OccasionAdjustment { min_delta: 3, max_delta: 3, reasoning: "Gala events demand black-tie or formal evening wear" });
        m.insert("business", OccasionAdjustment { min_delta: 0, max_delta: 1, reasoning: "Business settings call for professional attire" });
        m.insert("casual", OccasionAdjustment { min_delta: -2, max_delta: -1, reasoning: "Casual occasions allow for more relaxed styling" });
        m
    };
}

/// Career profile keyed by role level first, then occupation
pub(crate) async fn career_profile(career: &dyn CareerProvider, request: &RecommendationRequest) -> Option<CareerProfile> {
    for key in [request.role_level(), request.occupation()].into_iter().flatten() {
        if let Some(profile) = accept(CAREER_SIGNAL, key, career.career_stage(key).await) {
            return Some(profile);
        }
    }
    None
}

pub struct FormalityResolver {
    venue: Arc<dyn VenueProvider>,
    career: Arc<dyn CareerProvider>,
}

impl FormalityResolver {
    pub fn new(venue: Arc<dyn VenueProvider>, career: Arc<dyn CareerProvider>) -> Self {
        Self { venue, career }
    }

    pub async fn resolve(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> FormalityRange {
        let mut band = FormalityRange::new(DEFAULT_BAND.0, DEFAULT_BAND.1);

        // Venue re-centres the band around its strictness
        if let Some(venue) = request.venue_key() {
            if let Some(profile) = accept(VENUE_SIGNAL, &venue, self.venue.venue(&venue).await) {
                let strictness = profile.strictness as i32;
                band = FormalityRange::new(strictness - 1, strictness + 1);
                trace.contribute(
                    VENUE_SIGNAL,
                    format!(
                        "{} setting requires formality level {}-{}",
                        TextUtils::title_case(&venue),
                        band.min(),
                        band.max()
                    ),
                );
            }
        }

        if let Some(occasion) = request.occasion_key() {
            if let Some(adjustment) = OCCASION_FORMALITY.get(occasion.as_str()) {
                band = FormalityRange::new(
                    band.min() as i32 + adjustment.min_delta,
                    band.max() as i32 + adjustment.max_delta,
                );
                trace.contribute(OCCASION_SIGNAL, adjustment.reasoning);
            }
        }

        // Career only tightens from below, and never past the current ceiling
        if let Some(profile) = career_profile(self.career.as_ref(), request).await {
            let score = profile.formality_score as i32;
            let raised = (band.min() as i32).max(score - 1).min(band.max() as i32);
            band = FormalityRange::new(raised, band.max() as i32);
            let label = request
                .occupation()
                .or(request.role_level())
                .map(TextUtils::title_case)
                .unwrap_or_else(|| "Professional".to_string());
            trace.contribute(CAREER_SIGNAL, format!("{} role suggests formality level {}/10", label, score));
        }

        band
    }
}

#[async_trait]
impl PipelineStep for FormalityResolver {
    fn name(&self) -> &'static str {
        "formality"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.formality_range = Some(self.resolve(request, trace).await);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::catalog::{StaticCareerProvider, StaticVenueProvider};
    use crate::signals::{SignalError, SignalResult, VenueProfile};

    struct BrokenVenues;

    #[async_trait]
    impl VenueProvider for BrokenVenues {
        async fn venue(&self, _: &str) -> SignalResult<VenueProfile> {
            Err(SignalError::unavailable("venue", "connection refused"))
        }
    }

    fn resolver() -> FormalityResolver {
        FormalityResolver::new(Arc::new(StaticVenueProvider::with_defaults()), Arc::new(StaticCareerProvider::with_defaults()))
    }

    fn request(venue: Option<&str>, occasion: Option<&str>, role: Option<&str>) -> RecommendationRequest {
        RecommendationRequest {
            venue_type: venue.map(str::to_string),
            occasion: occasion.map(str::to_string),
            role_level: role.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_default_band_without_signals() {
        let mut trace = SignalTrace::new();
        let band = resolver().resolve(&RecommendationRequest::default(), &mut trace).await;
        assert_eq!((band.min(), band.max()), (5, 8));
        assert!(trace.reasoning().is_empty());
        assert!(trace.signals_used().is_empty());
    }

    #[tokio::test]
    async fn test_church_wedding() {
        let mut trace = SignalTrace::new();
        let band = resolver().resolve(&request(Some("church"), Some("wedding"), None), &mut trace).await;
        // church strictness 8 -> [7, 9], wedding +1/+2 -> [8, 10]
        assert_eq!((band.min(), band.max()), (8, 10));
        assert_eq!(trace.signals_used(), [VENUE_SIGNAL, OCCASION_SIGNAL]);
        assert_eq!(trace.reasoning()[0], "Church setting requires formality level 7-9");
    }

    #[tokio::test]
    async fn test_casual_lowers_band_and_clamps() {
        let mut trace = SignalTrace::new();
        let band = resolver().resolve(&request(Some("beach"), Some("casual"), None), &mut trace).await;
        // beach strictness 4 -> [3, 5], casual -2/-1 -> [1, 4]
        assert_eq!((band.min(), band.max()), (1, 4));
    }

    #[tokio::test]
    async fn test_career_raises_floor_without_inverting() {
        let mut trace = SignalTrace::new();
        let band = resolver().resolve(&request(Some("barn"), Some("casual"), Some("executive")), &mut trace).await;
        // barn 4 -> [3, 5], casual -> [1, 4], executive score 9 raises floor but caps at 4
        assert_eq!((band.min(), band.max()), (4, 4));
        assert!(trace.has_signal(CAREER_SIGNAL));
    }

    #[tokio::test]
    async fn test_unknown_occasion_is_skipped() {
        let mut trace = SignalTrace::new();
        let band = resolver().resolve(&request(None, Some("barbecue"), None), &mut trace).await;
        assert_eq!((band.min(), band.max()), (5, 8));
        assert!(!trace.has_signal(OCCASION_SIGNAL));
    }

    #[tokio::test]
    async fn test_venue_failure_is_swallowed() {
        let resolver = FormalityResolver::new(Arc::new(BrokenVenues), Arc::new(StaticCareerProvider::with_defaults()));
        let mut trace = SignalTrace::new();
        let band = resolver.resolve(&request(Some("church"), Some("wedding"), None), &mut trace).await;
        assert_eq!((band.min(), band.max()), (6, 10));
        assert!(!trace.has_signal(VENUE_SIGNAL));
        assert!(trace.has_signal(OCCASION_SIGNAL));
    }
}
