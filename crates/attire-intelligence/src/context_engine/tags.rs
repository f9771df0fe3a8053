//! Product tag union across occasion, venue, season and style vocabularies

use crate::context_engine::context::{ProductTags, TagBoost};
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{TagMappingProvider, TagMatch};
use crate::utils::{extend_unique, TextUtils};
use async_trait::async_trait;
use futures::future::{join_all, OptionFuture};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

pub const TAG_SIGNAL: &str = "product_tag_mapping";

lazy_static! {
    static ref IMPLIED_STYLE: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("prom", "bold");
        m.insert("gala", "luxury");
        m.insert("wedding", "classic");
        m.insert("interview", "classic");
        m.insert("business", "classic");
        m.insert("funeral", "classic");
        m.insert("casual", "relaxed");
        m
    };
}

/// Explicit style preference first, then the style the occasion implies
pub fn styles_for(request: &RecommendationRequest) -> Vec<String> {
    let mut styles: Vec<String> = request.style_preference().map(TextUtils::normalize_key).into_iter().collect();
    if let Some(implied) = request.occasion_key().and_then(|o| IMPLIED_STYLE.get(o.as_str()).copied()) {
        extend_unique(&mut styles, [implied]);
    }
    styles
}

/// Union tags into `tags`, keeping one boost entry per source even for repeated tags
pub fn merge_tags(tags: &mut ProductTags, matched: &TagMatch) {
    extend_unique(&mut tags.all_tags, matched.tags.iter().cloned());
    tags.boosts.extend(matched.tags.iter().map(|tag| TagBoost {
        tag: tag.clone(),
        boost: matched.boost,
    }));
}

pub struct ProductTagFilter {
    tag_mapping: Arc<dyn TagMappingProvider>,
}

impl ProductTagFilter {
    pub fn new(tag_mapping: Arc<dyn TagMappingProvider>) -> Self {
        Self { tag_mapping }
    }

    pub async fn build(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> ProductTags {
        let occasion = request.occasion_key();
        let venue = request.venue_key();
        let season = request.season_key();
        let styles = styles_for(request);

        let mapping = self.tag_mapping.as_ref();
        let (occasion_res, venue_res, season_res, style_res) = futures::join!(
            OptionFuture::from(
                occasion
                    .as_deref()
                    .map(|o| mapping.occasion_tags(o, season.as_deref(), venue.as_deref()))
            ),
            OptionFuture::from(venue.as_deref().map(|v| mapping.venue_tags(v))),
            OptionFuture::from(season.as_deref().map(|s| mapping.season_tags(s))),
            join_all(styles.iter().map(|s| mapping.style_tags(s))),
        );

        let mut sources = vec![
            (occasion.as_deref(), occasion_res),
            (venue.as_deref(), venue_res),
            (season.as_deref(), season_res),
        ];
        sources.extend(styles.iter().map(|s| Some(s.as_str())).zip(style_res.into_iter().map(Some)));

        let mut tags = ProductTags::default();
        for (key, result) in sources {
            let (Some(key), Some(result)) = (key, result) else {
                continue;
            };
            if let Some(matched) = accept(TAG_SIGNAL, key, result) {
                if matched.tags.is_empty() {
                    continue;
                }
                merge_tags(&mut tags, &matched);
                trace.contribute(TAG_SIGNAL, matched.reasoning.clone());
            }
        }
        tags
    }
}

#[async_trait]
impl PipelineStep for ProductTagFilter {
    fn name(&self) -> &'static str {
        "product_tags"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.product_tags = Some(self.build(request, trace).await);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::catalog::StaticTagMappingProvider;

    fn filter() -> ProductTagFilter {
        ProductTagFilter::new(Arc::new(StaticTagMappingProvider::with_defaults()))
    }

    #[test]
    fn test_implied_style() {
        let prom = RecommendationRequest { occasion: Some("Prom".into()), ..Default::default() };
        assert_eq!(styles_for(&prom), ["bold"]);
        let explicit = RecommendationRequest {
            occasion: Some("prom".into()),
            style_preference: Some("Modern".into()),
            ..Default::default()
        };
        assert_eq!(styles_for(&explicit), ["modern", "bold"]);
        let same = RecommendationRequest {
            occasion: Some("gala".into()),
            style_preference: Some("luxury".into()),
            ..Default::default()
        };
        assert_eq!(styles_for(&same), ["luxury"]);
        assert!(styles_for(&RecommendationRequest::default()).is_empty());
    }

    #[tokio::test]
    async fn test_explicit_style_keeps_implied_tags() {
        let prom = RecommendationRequest { occasion: Some("prom".into()), ..Default::default() };
        let mut trace = SignalTrace::new();
        let implied_only = filter().build(&prom, &mut trace).await;

        let styled = RecommendationRequest { style_preference: Some("modern".into()), ..prom };
        let mut trace = SignalTrace::new();
        let tags = filter().build(&styled, &mut trace).await;
        assert!(tags.all_tags.contains(&"sequin".to_string()));
        assert!(implied_only.all_tags.iter().all(|t| tags.all_tags.contains(t)));
        let modern_at = tags.all_tags.iter().position(|t| t == "slim-fit");
        let bold_at = tags.all_tags.iter().position(|t| t == "sequin");
        assert!(modern_at.is_some());
        assert!(modern_at < bold_at);
    }

    #[tokio::test]
    async fn test_prom_gets_bold_style_tags() {
        let mut trace = SignalTrace::new();
        let request = RecommendationRequest { occasion: Some("prom".into()), ..Default::default() };
        let tags = filter().build(&request, &mut trace).await;
        assert!(tags.all_tags.contains(&"prom".to_string()));
        assert!(tags.all_tags.contains(&"sequin".to_string()));
        assert_eq!(trace.signals_used(), [TAG_SIGNAL]);
        assert_eq!(trace.reasoning().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_tags_keep_every_boost() {
        let mut trace = SignalTrace::new();
        let request = RecommendationRequest {
            occasion: Some("wedding".into()),
            venue_type: Some("church".into()),
            ..Default::default()
        };
        let tags = filter().build(&request, &mut trace).await;
        let church: Vec<_> = tags.boosts.iter().filter(|b| b.tag == "church-wedding").collect();
        assert_eq!(church.len(), 2);
        assert_eq!(church[0].boost, 2.0);
        assert_eq!(church[1].boost, 1.3);
        assert_eq!(tags.all_tags.iter().filter(|t| *t == "church-wedding").count(), 1);
    }

    #[tokio::test]
    async fn test_no_inputs_no_tags() {
        let mut trace = SignalTrace::new();
        let tags = filter().build(&RecommendationRequest::default(), &mut trace).await;
        assert!(tags.all_tags.is_empty());
        assert!(trace.reasoning().is_empty());
    }
}
