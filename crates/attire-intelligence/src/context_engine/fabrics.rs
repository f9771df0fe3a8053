//! Fabric preferences from season, venue, use case, performance data and calendar

use crate::context_engine::colors::month_name;
use crate::context_engine::context::FabricPreferences;
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{CalendarProvider, Climate, FabricPerformanceProvider, FabricQuery, SeasonalProvider};
use crate::utils::extend_unique;
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

pub const SEASONAL_FABRIC_SIGNAL: &str = "seasonal_fabric_analysis";
pub const VENUE_FABRIC_SIGNAL: &str = "venue_fabric_analysis";
pub const USE_CASE_SIGNAL: &str = "use_case_analysis";
pub const PERFORMANCE_SIGNAL: &str = "fabric_performance";
pub const CALENDAR_FABRIC_SIGNAL: &str = "monthly_fabric_calendar";

const PERFORMANCE_PICKS: usize = 3;
const PHOTOGRAPHED_OCCASIONS: &[&str] = &["wedding", "prom", "gala"];

pub struct FabricTable {
    pub recommended: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub priorities: &'static [&'static str],
    pub reasoning: Option<&'static str>,
}

lazy_static! {
    /// Used when the seasonal provider has no fabric data
    static ref FALLBACK_SEASON_FABRICS: HashMap<&'static str, FabricTable> = {
        let mut m = HashMap::new();
        m.insert("spring", FabricTable {
            recommended: &["lightweight_wool", "cotton_blend", "linen_blend"],
            avoid: &["heavy_wool", "velvet"],
            priorities: &["breathability", "comfort"],
            reasoning: None,
        });
        m.insert("summer", FabricTable {
            recommended: &["linen", "cotton", "tropical_wool", "lightweight_wool"],
            avoid: &["heavy_wool", "flannel", "velvet"],
            priorities: &["breathability", "moisture_wicking", "lightweight"],
            reasoning: None,
        });
        m.insert("fall", FabricTable {
            recommended: &["worsted_wool", "tweed", "flannel"],
            avoid: &["linen", "lightweight_cotton"],
            priorities: &["warmth", "durability"],
            reasoning: None,
        });
        m.insert("winter", FabricTable {
            recommended: &["heavy_wool", "flannel", "cashmere_blend", "velvet"],
            avoid: &["linen", "lightweight_wool"],
            priorities: &["warmth", "insulation"],
            reasoning: None,
        });
        m
    };

    static ref VENUE_FABRICS: HashMap<&'static str, FabricTable> = {
        let mut m = HashMap::new();
        m.insert("outdoor", FabricTable {
            recommended: &["lightweight_wool", "linen_blend", "cotton_blend"],
            avoid: &[],
            priorities: &["breathability", "wrinkle_resistance"],
            reasoning: Some("Outdoor venues benefit from breathable, weather-appropriate fabrics"),
        });
        m.insert("church", FabricTable {
            recommended: &["worsted_wool", "wool_blend"],
            avoid: &[],
            priorities: &["durability", "formality"],
            reasoning: Some("Church settings call for traditional, refined fabric choices"),
        });
        m.insert("beach", FabricTable {
            recommended: &["linen", "cotton", "tropical_wool"],
            avoid: &[],
            priorities: &["breathability", "lightweight", "moisture_wicking"],
            reasoning: Some("Beach venues require lightweight, breathable fabrics"),
        });
        m.insert("ballroom", FabricTable {
            recommended: &["worsted_wool", "silk_blend", "wool_blend"],
            avoid: &[],
            priorities: &["formality", "appearance"],
            reasoning: Some("Ballroom settings showcase refined, premium fabrics"),
        });
        m
    };
}

static UNKNOWN_SEASON_FABRICS: FabricTable = FabricTable {
    recommended: &["worsted_wool", "wool_blend"],
    avoid: &[],
    priorities: &["versatility"],
    reasoning: None,
};

static UNKNOWN_VENUE_FABRICS: FabricTable = FabricTable {
    recommended: &["worsted_wool"],
    avoid: &[],
    priorities: &["versatility"],
    reasoning: None,
};

const TRAVEL_FABRICS: &[&str] = &["wrinkle_resistant_blend", "stretch_wool"];
const TRAVEL_PRIORITIES: &[&str] = &["wrinkle_resistance", "packability"];

pub fn climate_for_season(season: Option<&str>) -> Climate {
    match season {
        Some("summer") => Climate::Hot,
        Some("winter") => Climate::Cold,
        _ => Climate::Mild,
    }
}

pub fn venue_fabrics(venue: &str) -> &'static FabricTable {
    VENUE_FABRICS.get(venue).unwrap_or(&UNKNOWN_VENUE_FABRICS)
}

pub struct FabricPreferenceBuilder {
    seasonal: Arc<dyn SeasonalProvider>,
    performance: Arc<dyn FabricPerformanceProvider>,
    calendar: Arc<dyn CalendarProvider>,
}

impl FabricPreferenceBuilder {
    pub fn new(
        seasonal: Arc<dyn SeasonalProvider>,
        performance: Arc<dyn FabricPerformanceProvider>,
        calendar: Arc<dyn CalendarProvider>,
    ) -> Self {
        Self { seasonal, performance, calendar }
    }

    /// One query per combination of the request's ranking inputs that names an occasion or a
    /// season, most specific first. A field added to the request only adds queries.
    fn performance_queries(request: &RecommendationRequest) -> Vec<FabricQuery> {
        let occasion = request.occasion_key();
        let season = request.season_key();
        let photo_use_case = request.use_case_key().as_deref() == Some("photography");

        let occasions = match &occasion {
            Some(o) => vec![Some(o.clone()), None],
            None => vec![None],
        };
        let seasons = match &season {
            Some(s) => vec![Some(s.clone()), None],
            None => vec![None],
        };
        let photo_flags: &[bool] = if photo_use_case { &[true, false] } else { &[false] };

        let mut queries: Vec<FabricQuery> = Vec::new();
        for occasion in &occasions {
            for season in &seasons {
                if occasion.is_none() && season.is_none() {
                    continue;
                }
                for &photo in photo_flags {
                    let query = FabricQuery {
                        climate: climate_for_season(season.as_deref()),
                        photography: photo
                            || occasion.as_deref().map_or(false, |o| PHOTOGRAPHED_OCCASIONS.contains(&o)),
                        occasion: occasion.clone(),
                    };
                    if !queries.contains(&query) {
                        queries.push(query);
                    }
                }
            }
        }
        queries
    }

    pub async fn build(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> FabricPreferences {
        let season = request.season_key();
        let queries = Self::performance_queries(request);

        let (season_fabrics, rankings, monthly) = futures::join!(
            async {
                match &season {
                    Some(key) => accept(SEASONAL_FABRIC_SIGNAL, key, self.seasonal.fabrics(key).await),
                    None => None,
                }
            },
            futures::future::join_all(queries.iter().map(|q| async move {
                accept(PERFORMANCE_SIGNAL, "fabric_query", self.performance.recommend(q).await)
            })),
            async { accept(CALENDAR_FABRIC_SIGNAL, "current_month", self.calendar.monthly_fabrics().await) },
        );

        let mut prefs = FabricPreferences::default();

        if let Some(key) = &season {
            match season_fabrics {
                Some(data) => {
                    extend_unique(&mut prefs.recommended, data.excellent.iter().chain(data.good.iter()).cloned());
                    extend_unique(&mut prefs.avoid, data.avoid.iter().cloned());
                    extend_unique(&mut prefs.performance_priorities, data.characteristics.iter().cloned());
                }
                None => {
                    let table = FALLBACK_SEASON_FABRICS.get(key.as_str()).unwrap_or(&UNKNOWN_SEASON_FABRICS);
                    extend_unique(&mut prefs.recommended, table.recommended.iter().copied());
                    extend_unique(&mut prefs.avoid, table.avoid.iter().copied());
                    extend_unique(&mut prefs.performance_priorities, table.priorities.iter().copied());
                }
            }
            if let Some(lead) = prefs.recommended.first() {
                trace.contribute(
                    SEASONAL_FABRIC_SIGNAL,
                    format!("For {}, we recommend {} for optimal comfort", key, lead),
                );
            }
        }

        if let Some(venue) = request.venue_key() {
            let table = venue_fabrics(&venue);
            extend_unique(&mut prefs.recommended, table.recommended.iter().copied());
            extend_unique(&mut prefs.performance_priorities, table.priorities.iter().copied());
            if let Some(line) = table.reasoning {
                trace.contribute(VENUE_FABRIC_SIGNAL, line);
            }
        }

        if request.use_case_key().as_deref() == Some("travel") {
            extend_unique(&mut prefs.recommended, TRAVEL_FABRICS.iter().copied());
            extend_unique(&mut prefs.performance_priorities, TRAVEL_PRIORITIES.iter().copied());
            trace.contribute(USE_CASE_SIGNAL, "For travel: prioritizing wrinkle-resistant and packable fabrics");
        }

        let mut picks: Vec<String> = Vec::new();
        let mut notes: Vec<String> = Vec::new();
        for ranking in rankings.into_iter().flatten() {
            extend_unique(&mut picks, ranking.fabrics.into_iter().take(PERFORMANCE_PICKS));
            extend_unique(&mut notes, ranking.reasoning);
        }
        if !picks.is_empty() {
            extend_unique(&mut prefs.recommended, picks.iter().cloned());
            let mut line = format!("Fabric performance data favors {}", picks.join(", "));
            if !notes.is_empty() {
                line.push_str(&format!(" ({})", notes.join("; ").to_lowercase()));
            }
            trace.contribute(PERFORMANCE_SIGNAL, line);
        }

        if let Some(monthly) = monthly.filter(|m| !m.fabrics.is_empty()) {
            extend_unique(&mut prefs.recommended, monthly.fabrics.iter().cloned());
            trace.contribute(
                CALENDAR_FABRIC_SIGNAL,
                format!("{} calendar suggests {}", month_name(monthly.month), monthly.fabrics.join(", ")),
            );
        }

        prefs
    }
}

#[async_trait]
impl PipelineStep for FabricPreferenceBuilder {
    fn name(&self) -> &'static str {
        "fabrics"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.fabric_preferences = Some(self.build(request, trace).await);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::catalog::seasonal::CalendarTable;
    use crate::signals::catalog::{StaticCalendarProvider, StaticFabricPerformanceProvider, StaticSeasonalProvider};

    fn builder() -> FabricPreferenceBuilder {
        FabricPreferenceBuilder::new(
            Arc::new(StaticSeasonalProvider::with_defaults()),
            Arc::new(StaticFabricPerformanceProvider::with_defaults()),
            Arc::new(StaticCalendarProvider::new(3, CalendarTable::default())),
        )
    }

    #[tokio::test]
    async fn test_summer_fabrics_from_provider() {
        let request = RecommendationRequest { season: Some("summer".to_string()), ..Default::default() };
        let mut trace = SignalTrace::new();
        let prefs = builder().build(&request, &mut trace).await;
        assert_eq!(prefs.recommended[0], "linen");
        assert!(prefs.avoid.contains(&"flannel".to_string()));
        assert!(prefs.performance_priorities.contains(&"breathability".to_string()));
        assert_eq!(trace.reasoning()[0], "For summer, we recommend linen for optimal comfort");
        assert!(trace.has_signal(PERFORMANCE_SIGNAL));
    }

    #[tokio::test]
    async fn test_travel_override() {
        let request = RecommendationRequest { use_case: Some("travel".to_string()), ..Default::default() };
        let mut trace = SignalTrace::new();
        let prefs = builder().build(&request, &mut trace).await;
        assert_eq!(prefs.recommended, vec!["wrinkle_resistant_blend", "stretch_wool"]);
        assert_eq!(prefs.performance_priorities, vec!["wrinkle_resistance", "packability"]);
        assert_eq!(trace.signals_used(), [USE_CASE_SIGNAL]);
    }

    #[tokio::test]
    async fn test_unknown_venue_adds_versatile_default_silently() {
        let request = RecommendationRequest { venue_type: Some("submarine".to_string()), ..Default::default() };
        let mut trace = SignalTrace::new();
        let prefs = builder().build(&request, &mut trace).await;
        assert_eq!(prefs.recommended, vec!["worsted_wool"]);
        assert!(trace.reasoning().is_empty());
    }

    #[tokio::test]
    async fn test_wedding_query_asks_for_photography() {
        let request = RecommendationRequest { occasion: Some("wedding".to_string()), ..Default::default() };
        let queries = FabricPreferenceBuilder::performance_queries(&request);
        assert_eq!(queries.len(), 1);
        assert!(queries[0].photography);
        assert_eq!(queries[0].climate, Climate::Mild);

        let mut trace = SignalTrace::new();
        let prefs = builder().build(&request, &mut trace).await;
        assert_eq!(prefs.recommended[0], "velvet");
        assert_eq!(prefs.recommended.len(), PERFORMANCE_PICKS);
    }

    #[test]
    fn test_no_ranking_without_occasion_or_season() {
        let request = RecommendationRequest { use_case: Some("photography".to_string()), ..Default::default() };
        assert!(FabricPreferenceBuilder::performance_queries(&request).is_empty());
    }

    #[tokio::test]
    async fn test_added_fields_keep_earlier_picks() {
        let base = RecommendationRequest { occasion: Some("business".to_string()), ..Default::default() };
        let mut trace = SignalTrace::new();
        let before = builder().build(&base, &mut trace).await;
        assert!(before.recommended.contains(&"super_110s_wool".to_string()));

        let enriched = [
            RecommendationRequest { season: Some("summer".to_string()), ..base.clone() },
            RecommendationRequest { use_case: Some("photography".to_string()), ..base.clone() },
            RecommendationRequest {
                season: Some("winter".to_string()),
                use_case: Some("photography".to_string()),
                ..base.clone()
            },
        ];
        for request in &enriched {
            let mut trace = SignalTrace::new();
            let after = builder().build(request, &mut trace).await;
            for fabric in &before.recommended {
                assert!(after.recommended.contains(fabric), "{:?} dropped {}", request, fabric);
            }
        }
    }

    #[test]
    fn test_queries_cover_every_input_combination() {
        let request = RecommendationRequest {
            occasion: Some("business".to_string()),
            season: Some("summer".to_string()),
            use_case: Some("photography".to_string()),
            ..Default::default()
        };
        let queries = FabricPreferenceBuilder::performance_queries(&request);
        assert_eq!(queries[0].occasion.as_deref(), Some("business"));
        assert_eq!(queries[0].climate, Climate::Hot);
        assert!(queries[0].photography);
        assert!(queries.contains(&FabricQuery {
            occasion: Some("business".to_string()),
            climate: Climate::Mild,
            photography: false,
        }));
        assert!(queries.iter().all(|q| q.occasion.is_some() || q.climate != Climate::Mild));
        assert_eq!(queries.len(), 6);
    }

    #[test]
    fn test_climate_mapping() {
        assert_eq!(climate_for_season(Some("summer")), Climate::Hot);
        assert_eq!(climate_for_season(Some("winter")), Climate::Cold);
        assert_eq!(climate_for_season(Some("fall")), Climate::Mild);
        assert_eq!(climate_for_season(None), Climate::Mild);
    }
}
