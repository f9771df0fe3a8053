use crate::context_engine::{
    colors::ColorFilterBuilder,
    context::RecommendationContext,
    fabrics::FabricPreferenceBuilder,
    fit::FitGuidanceBuilder,
    formality::FormalityResolver,
    persona::PersonaEnhancer,
    pipeline::Pipeline,
    pricing::PriceTierCalculator,
    recommendation_count::{ConfidenceAggregator, RecommendationCountPolicy},
    request::RecommendationRequest,
    tags::ProductTagFilter,
    trace::SignalTrace,
};
use crate::shared_state::{AtomicCounters, SignalProviders};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fuses every signal source into one recommendation context
pub struct ContextOrchestrator {
    pipeline: Pipeline,
    config: OrchestratorConfig,
    counters: Arc<AtomicCounters>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub enabled: bool,
    /// Occasions the persona step runs for
    pub persona_occasions: Vec<String>,
    /// How many ranked trend colors a wedding reads
    pub wedding_forecast_depth: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            persona_occasions: vec!["prom".to_string()],
            wedding_forecast_depth: 5,
        }
    }
}

impl ContextOrchestrator {
    pub fn new(providers: &SignalProviders, config: OrchestratorConfig, counters: Arc<AtomicCounters>) -> Self {
        let pipeline = Pipeline::new()
            .with(FormalityResolver::new(providers.venue.clone(), providers.career.clone()))
            .with(ColorFilterBuilder::new(
                providers.venue.clone(),
                providers.cultural.clone(),
                providers.seasonal.clone(),
                providers.calendar.clone(),
                providers.trends.clone(),
                config.wedding_forecast_depth,
            ))
            .with(FabricPreferenceBuilder::new(
                providers.seasonal.clone(),
                providers.fabric_performance.clone(),
                providers.calendar.clone(),
            ))
            .with(PriceTierCalculator::new(providers.career.clone(), providers.price_tiers.clone()))
            .with(FitGuidanceBuilder)
            .with(ProductTagFilter::new(providers.tag_mapping.clone()))
            .with(PersonaEnhancer::new(providers.persona.clone(), &config.persona_occasions))
            .with(RecommendationCountPolicy)
            .with(ConfidenceAggregator);

        Self::with_pipeline(pipeline, config, counters)
    }

    /// Run a caller-assembled pipeline under the same fallback handling
    pub fn with_pipeline(pipeline: Pipeline, config: OrchestratorConfig, counters: Arc<AtomicCounters>) -> Self {
        info!("Context orchestrator initialized with steps: {}", pipeline.step_names().join(" -> "));
        Self { pipeline, config, counters }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.pipeline.step_names()
    }

    /// Build a context for the request. Never fails: any error or panic in the
    /// pipeline yields the fallback context carrying the reasoning gathered so far.
    pub async fn build_context(&self, request: &RecommendationRequest) -> RecommendationContext {
        self.counters.inc_builds();
        let mut trace = SignalTrace::new();

        if !self.config.enabled {
            warn!("Context engine disabled, returning fallback context");
            self.counters.inc_fallbacks();
            return RecommendationContext::fallback(Vec::new());
        }

        let outcome = AssertUnwindSafe(self.pipeline.run(request, &mut trace))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(context)) => {
                debug!(
                    "Built context from {} signals (confidence {:.2})",
                    context.signals_used.len(),
                    context.confidence
                );
                context
            }
            Ok(Err(e)) => {
                error!("Context build failed, using fallback: {:#}", e);
                self.counters.inc_fallbacks();
                RecommendationContext::fallback(trace.reasoning().to_vec())
            }
            Err(_) => {
                error!("Context build panicked, using fallback");
                self.counters.inc_fallbacks();
                RecommendationContext::fallback(trace.reasoning().to_vec())
            }
        }
    }
}
