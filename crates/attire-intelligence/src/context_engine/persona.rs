//! Occasion-gated persona boost

use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::tags::merge_tags;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{PersonaProvider, TagMatch};
pub use crate::signals::PERSONA_BOOST;
use crate::utils::{extend_unique, TextUtils};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;

pub const PERSONA_SIGNAL: &str = "persona_detection";

pub struct PersonaEnhancer {
    persona: Arc<dyn PersonaProvider>,
    occasions: Vec<String>,
}

impl PersonaEnhancer {
    pub fn new(persona: Arc<dyn PersonaProvider>, occasions: &[String]) -> Self {
        Self {
            persona,
            occasions: occasions.iter().map(|o| TextUtils::normalize_key(o)).collect(),
        }
    }

    pub fn applies_to(&self, request: &RecommendationRequest) -> bool {
        request
            .occasion_key()
            .map_or(false, |occasion| self.occasions.contains(&occasion))
    }
}

#[async_trait]
impl PipelineStep for PersonaEnhancer {
    fn name(&self) -> &'static str {
        "persona"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        if !self.applies_to(request) {
            return Ok(());
        }
        let hints = request.persona_hints();
        if hints.is_empty() {
            return Ok(());
        }
        let Some(persona) = accept(PERSONA_SIGNAL, "hints", self.persona.detect(&hints).await) else {
            return Ok(());
        };

        let tags = draft.product_tags.as_mut().context("product tags must be built before persona")?;
        merge_tags(
            tags,
            &TagMatch {
                tags: persona.tags.clone(),
                boost: PERSONA_BOOST,
                reasoning: String::new(),
            },
        );

        let colors = draft.color_filters.as_mut().context("color filters must be built before persona")?;
        let conflicts: Vec<&String> = persona.colors.iter().filter(|c| colors.avoid.contains(c)).collect();
        extend_unique(&mut colors.preferred, persona.colors.iter().cloned());

        trace.contribute(PERSONA_SIGNAL, format!("{} persona: {}", persona.display_name, persona.styling_notes));
        if !conflicts.is_empty() {
            trace.reason(format!(
                "{} persona favors {}, which other signals advise avoiding",
                persona.display_name,
                conflicts.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_engine::context::{ColorFilters, ProductTags};
    use crate::signals::catalog::StaticPersonaProvider;

    fn enhancer() -> PersonaEnhancer {
        PersonaEnhancer::new(Arc::new(StaticPersonaProvider::with_defaults()), &["prom".to_string()])
    }

    fn draft() -> ContextDraft {
        ContextDraft {
            product_tags: Some(ProductTags::default()),
            color_filters: Some(ColorFilters::default()),
            ..Default::default()
        }
    }

    fn prom(color: &str) -> RecommendationRequest {
        RecommendationRequest {
            occasion: Some("Prom".into()),
            color_preference: Some(color.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_prom_emerald_boosts_main_character() {
        let mut draft = draft();
        let mut trace = SignalTrace::new();
        enhancer().apply(&prom("emerald"), &mut draft, &mut trace).await.unwrap();

        let tags = draft.product_tags.unwrap();
        assert!(tags.boosts.iter().any(|b| b.tag == "velvet-blazer" && b.boost == PERSONA_BOOST));
        assert!(draft.color_filters.unwrap().preferred.contains(&"emerald_green".to_string()));
        assert_eq!(trace.signals_used(), [PERSONA_SIGNAL]);
        assert!(trace.reasoning()[0].starts_with("Main Character Energy persona:"));
    }

    #[tokio::test]
    async fn test_other_occasions_are_gated_out() {
        let mut draft = draft();
        let mut trace = SignalTrace::new();
        let request = RecommendationRequest { occasion: Some("wedding".into()), ..prom("emerald") };
        enhancer().apply(&request, &mut draft, &mut trace).await.unwrap();
        assert!(draft.product_tags.unwrap().boosts.is_empty());
        assert!(trace.reasoning().is_empty());
    }

    #[tokio::test]
    async fn test_no_match_is_silent() {
        let mut draft = draft();
        let mut trace = SignalTrace::new();
        enhancer().apply(&prom("polka_dot"), &mut draft, &mut trace).await.unwrap();
        assert!(trace.reasoning().is_empty());
        assert!(trace.signals_used().is_empty());
    }

    #[tokio::test]
    async fn test_avoided_color_is_called_out() {
        let mut draft = draft();
        draft.color_filters.as_mut().unwrap().avoid.push("burgundy".to_string());
        let mut trace = SignalTrace::new();
        enhancer().apply(&prom("emerald"), &mut draft, &mut trace).await.unwrap();
        assert!(trace.reasoning().iter().any(|l| l.contains("burgundy") && l.contains("avoiding")));
    }
}
