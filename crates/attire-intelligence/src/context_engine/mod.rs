//! Context engine module - Fuses signal sources into a recommendation context

pub mod colors;
pub mod context;
pub mod fabrics;
pub mod fit;
pub mod formality;
pub mod orchestrator;
pub mod persona;
pub mod pipeline;
pub mod pricing;
pub mod recommendation_count;
pub mod request;
pub mod tags;
pub mod trace;

pub use colors::ColorFilterBuilder;
pub use context::{
    ColorFilters, FabricPreferences, FitGuidance, FormalityRange, PriceBreakdown, PriceTier, ProductTags,
    RecommendationContext, TagBoost,
};
pub use fabrics::FabricPreferenceBuilder;
pub use fit::{FitGuidanceBuilder, FitRule, FIT_RULES};
pub use formality::FormalityResolver;
pub use orchestrator::{ContextOrchestrator, OrchestratorConfig};
pub use persona::PersonaEnhancer;
pub use pipeline::{ContextDraft, Pipeline, PipelineStep};
pub use pricing::PriceTierCalculator;
pub use recommendation_count::{recommendation_count, ConfidenceAggregator, RecommendationCountPolicy};
pub use request::RecommendationRequest;
pub use tags::ProductTagFilter;
pub use trace::{confidence_for, SignalTrace};

/// Default Context Orchestrator over the built-in catalogs
pub fn create_default_orchestrator() -> ContextOrchestrator {
    let providers = crate::shared_state::SignalProviders::with_defaults();
    let counters = std::sync::Arc::new(crate::shared_state::AtomicCounters::new());
    ContextOrchestrator::new(&providers, OrchestratorConfig::default(), counters)
}
