use async_trait::async_trait;
use attire_intelligence::context_engine::context::FALLBACK_SIGNAL;
use attire_intelligence::signals::catalog::StaticTrendForecastProvider;
use attire_intelligence::signals::{SignalError, SignalResult, VenueProfile, VenueProvider};
use attire_intelligence::{
    AtomicCounters, ContextOrchestrator, OrchestratorConfig, RecommendationContext, RecommendationRequest,
    SignalProviders,
};
use proptest::prelude::*;
use std::sync::Arc;

const FIXED_MONTH: u32 = 6;

struct UnreachableVenues;

#[async_trait]
impl VenueProvider for UnreachableVenues {
    async fn venue(&self, _: &str) -> SignalResult<VenueProfile> {
        Err(SignalError::unavailable("venue", "connection refused"))
    }
}

fn providers() -> SignalProviders {
    SignalProviders::with_defaults().with_calendar_month(FIXED_MONTH)
}

fn orchestrator_with(providers: SignalProviders) -> ContextOrchestrator {
    ContextOrchestrator::new(&providers, OrchestratorConfig::default(), Arc::new(AtomicCounters::new()))
}

fn orchestrator() -> ContextOrchestrator {
    orchestrator_with(providers())
}

fn build(request: &RecommendationRequest) -> RecommendationContext {
    tokio_test::block_on(orchestrator().build_context(request))
}

fn has_signal(context: &RecommendationContext, signal: &str) -> bool {
    context.signals_used.iter().any(|s| s == signal)
}

#[tokio::test]
async fn church_wedding_is_formal() {
    let request = RecommendationRequest {
        venue_type: Some("church".into()),
        occasion: Some("wedding".into()),
        ..Default::default()
    };
    let context = orchestrator().build_context(&request).await;

    assert!(context.formality_range.min() >= 6);
    assert!(has_signal(&context, "venue_intelligence"));
    assert!(has_signal(&context, "occasion_analysis"));
    assert!(!context.is_fallback());
}

#[tokio::test]
async fn wedding_reads_forecast_only_when_available() {
    let request = RecommendationRequest { occasion: Some("wedding".into()), ..Default::default() };

    let with_forecast = orchestrator().build_context(&request).await;
    assert!(has_signal(&with_forecast, "wedding_forecast"));
    assert!(with_forecast.reasoning.iter().any(|l| l.starts_with("Wedding trend #1: Sage Green")));
    assert!(with_forecast.color_filters.preferred.contains(&"sage_green".to_string()));

    let mut no_forecast = providers();
    no_forecast.trends = Arc::new(StaticTrendForecastProvider::new(Vec::new()));
    let without = orchestrator_with(no_forecast).build_context(&request).await;
    assert!(!has_signal(&without, "wedding_forecast"));
    assert!(!without.reasoning.iter().any(|l| l.starts_with("Wedding trend")));
    assert!(without.confidence < with_forecast.confidence);
}

#[tokio::test]
async fn long_session_limits_choices() {
    let request = RecommendationRequest {
        session_duration: Some(40.0),
        customer_id: Some("c-1001".into()),
        ..Default::default()
    };
    let context = orchestrator().build_context(&request).await;
    assert_eq!(context.max_recommendations, 3);
    assert!(context.reasoning.iter().any(|l| l.contains("decision fatigue")));
}

#[tokio::test]
async fn prom_persona_boost() {
    let request = RecommendationRequest {
        occasion: Some("prom".into()),
        color_preference: Some("emerald".into()),
        ..Default::default()
    };
    let context = orchestrator().build_context(&request).await;

    assert!(context.product_tags.boosts.iter().any(|b| b.boost == 2.5));
    assert!(context.color_filters.preferred.contains(&"emerald_green".to_string()));
    assert!(has_signal(&context, "persona_detection"));
}

#[tokio::test]
async fn failing_venue_source_still_builds() {
    let mut broken = providers();
    broken.venue = Arc::new(UnreachableVenues);
    let request = RecommendationRequest {
        venue_type: Some("church".into()),
        occasion: Some("wedding".into()),
        season: Some("fall".into()),
        ..Default::default()
    };
    let context = orchestrator_with(broken).build_context(&request).await;

    assert!(!context.is_fallback());
    assert!(!has_signal(&context, "venue_intelligence"));
    assert!(!has_signal(&context, "lighting_analysis"));
    assert!(has_signal(&context, "occasion_analysis"));
    assert!(!context.signals_used.iter().any(|s| s == FALLBACK_SIGNAL));
}

#[tokio::test]
async fn context_serializes_with_formality_pair() {
    let request = RecommendationRequest { venue_type: Some("church".into()), ..Default::default() };
    let context = orchestrator().build_context(&request).await;
    let json = serde_json::to_value(&context).unwrap();
    assert_eq!(json["formality_range"], serde_json::json!([7, 9]));
    assert!(json["signals_used"].is_array());
}

fn maybe(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(options).prop_map(str::to_string))
}

fn contains_all(before: &[String], after: &[String]) -> bool {
    before.iter().all(|item| after.contains(item))
}

/// Fields that only ever add to a context: venue, season, use case, region, religion, style
fn optional_field(request: &mut RecommendationRequest, index: usize) -> &mut Option<String> {
    match index {
        0 => &mut request.venue_type,
        1 => &mut request.season,
        2 => &mut request.use_case,
        3 => &mut request.cultural_region,
        4 => &mut request.religious_context,
        _ => &mut request.style_preference,
    }
}

prop_compose! {
    fn request_strategy()(
        occasion in maybe(&["wedding", "prom", "gala", "interview", "business", "funeral", "casual", "barbecue"]),
        venue_type in maybe(&["church", "beach", "barn", "office", "ballroom", "rooftop", "spaceship"]),
        season in maybe(&["spring", "summer", "fall", "winter", "monsoon"]),
        occupation in maybe(&["lawyer", "banker", "consultant", "creative", "executive", "teacher"]),
        role_level in maybe(&["intern", "manager", "director", "executive"]),
        cultural_region in maybe(&["south_asian", "east_asian", "midwest", "atlantis"]),
        religious_context in maybe(&["catholic", "protestant", "pastafarian"]),
        color_preference in maybe(&["emerald", "navy", "burgundy", "polka_dot"]),
        use_case in maybe(&["travel", "photography"]),
        customer_id in maybe(&["c-1", "c-2"]),
        age in proptest::option::of(16u32..80),
        session_duration in proptest::option::of(0.0f64..90.0),
    ) -> RecommendationRequest {
        RecommendationRequest {
            occasion,
            venue_type,
            season,
            occupation,
            role_level,
            cultural_region,
            religious_context,
            color_preference,
            use_case,
            customer_id,
            age,
            session_duration,
            ..Default::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn context_is_always_well_formed(request in request_strategy()) {
        let context = build(&request);
        let range = context.formality_range;
        prop_assert!(1 <= range.min() && range.min() <= range.max() && range.max() <= 10);
        prop_assert!(context.price_tier.min_investment >= 0.0);
        prop_assert!(context.price_tier.min_investment <= context.price_tier.max_investment);
        prop_assert!(!context.price_tier.quality_level.is_empty());
        prop_assert!([3u8, 5, 10].contains(&context.max_recommendations));
        prop_assert!((0.0..=1.0).contains(&context.confidence));
        prop_assert!(!context.is_fallback());

        let mut seen = std::collections::HashSet::new();
        prop_assert!(context.signals_used.iter().all(|s| seen.insert(s.clone())));
        let mut seen_tags = std::collections::HashSet::new();
        prop_assert!(context.product_tags.all_tags.iter().all(|t| seen_tags.insert(t.clone())));
    }

    #[test]
    fn long_sessions_always_get_three(request in request_strategy(), minutes in 25.5f64..240.0) {
        let request = RecommendationRequest { session_duration: Some(minutes), ..request };
        prop_assert_eq!(build(&request).max_recommendations, 3);
    }

    #[test]
    fn builds_are_deterministic(request in request_strategy()) {
        prop_assert_eq!(build(&request), build(&request));
    }

    #[test]
    fn more_signals_never_lower_confidence(
        request in request_strategy(),
        venue in maybe(&["church", "beach", "ballroom"]),
        region in maybe(&["south_asian", "midwest"]),
        religion in maybe(&["catholic", "protestant"]),
    ) {
        let base = RecommendationRequest {
            venue_type: None,
            cultural_region: None,
            religious_context: None,
            ..request
        };
        let enriched = RecommendationRequest {
            venue_type: venue,
            cultural_region: region,
            religious_context: religion,
            ..base.clone()
        };
        let before = build(&base);
        let after = build(&enriched);

        prop_assert!(before.signals_used.iter().all(|s| after.signals_used.contains(s)));
        prop_assert!(after.confidence >= before.confidence);
    }

    #[test]
    fn added_field_keeps_every_earlier_pick(
        request in request_strategy(),
        donor in request_strategy(),
        style in maybe(&["bold", "modern", "classic", "luxury", "relaxed"]),
        index in 0usize..6,
    ) {
        // no color hint, so a style hint can only introduce a persona, never swap one
        let mut base = RecommendationRequest { color_preference: None, ..request };
        *optional_field(&mut base, index) = None;
        let mut donor = RecommendationRequest { style_preference: style, ..donor };
        let mut enriched = base.clone();
        *optional_field(&mut enriched, index) = optional_field(&mut donor, index).clone();

        let before = build(&base);
        let after = build(&enriched);

        prop_assert!(contains_all(&before.color_filters.preferred, &after.color_filters.preferred));
        prop_assert!(contains_all(&before.color_filters.avoid, &after.color_filters.avoid));
        prop_assert!(contains_all(&before.color_filters.photograph_well, &after.color_filters.photograph_well));
        prop_assert!(contains_all(
            &before.fabric_preferences.recommended,
            &after.fabric_preferences.recommended
        ));
        prop_assert!(contains_all(&before.product_tags.all_tags, &after.product_tags.all_tags));
        prop_assert!(contains_all(&before.signals_used, &after.signals_used));
    }
}
