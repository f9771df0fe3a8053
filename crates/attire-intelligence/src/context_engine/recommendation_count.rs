//! How many products to show, from decision-fatigue thresholds

use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::SignalTrace;
use async_trait::async_trait;

pub const FATIGUE_COUNT: u8 = 3;
pub const PERSONALIZED_COUNT: u8 = 5;
pub const BROWSING_COUNT: u8 = 10;

/// Minutes after which the fatigue override applies
pub const LONG_SESSION_MINUTES: f64 = 25.0;

/// Count plus the one reasoning line describing the branch taken
pub fn recommendation_count(request: &RecommendationRequest) -> (u8, &'static str) {
    if request.session_duration.map_or(false, |minutes| minutes > LONG_SESSION_MINUTES) {
        return (
            FATIGUE_COUNT,
            "Simplified selection, focused on top choices to reduce decision fatigue",
        );
    }
    let known_customer = request.customer_id().is_some() || (request.age.is_some() && request.occupation().is_some());
    if known_customer {
        (
            PERSONALIZED_COUNT,
            "Showing 5 personalized recommendations for optimal decision-making",
        )
    } else {
        (
            BROWSING_COUNT,
            "Showing a curated selection of 10 to help you find the perfect fit",
        )
    }
}

pub struct RecommendationCountPolicy;

#[async_trait]
impl PipelineStep for RecommendationCountPolicy {
    fn name(&self) -> &'static str {
        "recommendation_count"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        let (count, line) = recommendation_count(request);
        draft.max_recommendations = Some(count);
        trace.reason(line);
        Ok(())
    }
}

/// Final step: confidence from how many distinct sources contributed
pub struct ConfidenceAggregator;

#[async_trait]
impl PipelineStep for ConfidenceAggregator {
    fn name(&self) -> &'static str {
        "confidence"
    }

    async fn apply(
        &self,
        _request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.confidence = Some(trace.confidence());
        Ok(())
    }
}
