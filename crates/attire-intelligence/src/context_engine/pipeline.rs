//! Ordered pipeline of named build steps
//!
//! Precedence between sub-builders is the order steps are pushed, so it can be
//! inspected and tested directly instead of living in a chain of inline calls.

use crate::context_engine::context::{
    ColorFilters, FabricPreferences, FitGuidance, FormalityRange, PriceTier, ProductTags, RecommendationContext,
};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::SignalTrace;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Context fields filled in step by step
#[derive(Debug, Clone, Default)]
pub struct ContextDraft {
    pub formality_range: Option<FormalityRange>,
    pub color_filters: Option<ColorFilters>,
    pub fabric_preferences: Option<FabricPreferences>,
    pub price_tier: Option<PriceTier>,
    pub fit_guidance: Option<FitGuidance>,
    pub product_tags: Option<ProductTags>,
    pub max_recommendations: Option<u8>,
    pub confidence: Option<f64>,
}

impl ContextDraft {
    /// Assemble the final context; every field must have been produced
    pub fn finish(self, trace: &SignalTrace) -> Result<RecommendationContext> {
        Ok(RecommendationContext {
            formality_range: self.formality_range.context("formality range was not resolved")?,
            color_filters: self.color_filters.context("color filters were not built")?,
            fabric_preferences: self.fabric_preferences.context("fabric preferences were not built")?,
            price_tier: self.price_tier.context("price tier was not calculated")?,
            fit_guidance: self.fit_guidance.context("fit guidance was not built")?,
            product_tags: self.product_tags.context("product tags were not built")?,
            max_recommendations: self.max_recommendations.context("recommendation count was not set")?,
            confidence: self.confidence.unwrap_or_else(|| trace.confidence()),
            reasoning: trace.reasoning().to_vec(),
            signals_used: trace.signals_used().to_vec(),
        })
    }
}

#[async_trait]
pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> Result<()>;
}

#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl PipelineStep + 'static) {
        self.steps.push(Box::new(step));
    }

    pub fn with(mut self, step: impl PipelineStep + 'static) -> Self {
        self.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Apply every step in order and assemble the context.
    /// `trace` is owned by the caller so reasoning survives a failed run.
    pub async fn run(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> Result<RecommendationContext> {
        let mut draft = ContextDraft::default();
        for step in &self.steps {
            debug!("Running context step `{}`", step.name());
            step.apply(request, &mut draft, trace)
                .await
                .with_context(|| format!("context step `{}` failed", step.name()))?;
        }
        draft.finish(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl PipelineStep for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn apply(&self, _: &RecommendationRequest, _: &mut ContextDraft, trace: &mut SignalTrace) -> Result<()> {
            trace.reason(self.0);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl PipelineStep for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn apply(&self, _: &RecommendationRequest, _: &mut ContextDraft, _: &mut SignalTrace) -> Result<()> {
            anyhow::bail!("collaborator exploded")
        }
    }

    #[tokio::test]
    async fn test_steps_run_in_push_order() {
        let pipeline = Pipeline::new().with(Named("first")).with(Named("second"));
        assert_eq!(pipeline.step_names(), vec!["first", "second"]);

        let mut trace = SignalTrace::new();
        // Nothing fills the draft, so assembly fails after both steps ran
        let result = pipeline.run(&RecommendationRequest::default(), &mut trace).await;
        assert!(result.is_err());
        assert_eq!(trace.reasoning(), ["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_step_stops_the_run() {
        let pipeline = Pipeline::new().with(Named("first")).with(Failing).with(Named("never"));
        let mut trace = SignalTrace::new();
        let err = pipeline.run(&RecommendationRequest::default(), &mut trace).await.unwrap_err();
        assert!(format!("{:#}", err).contains("context step `failing` failed"));
        assert_eq!(trace.reasoning(), ["first"]);
    }
}
