//! Color filters from culture, venue lighting, season, calendar and wedding trends

use crate::context_engine::context::ColorFilters;
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::{accept, SignalTrace};
use crate::signals::{
    CalendarProvider, CulturalProvider, Lighting, SeasonalProvider, TrendForecastProvider, VenueProvider,
};
use crate::utils::{extend_unique, TextUtils};
use async_trait::async_trait;
use chrono::Month;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

pub const RELIGIOUS_SIGNAL: &str = "religious_context";
pub const CULTURAL_SIGNAL: &str = "cultural_adaptation";
pub const LIGHTING_SIGNAL: &str = "lighting_analysis";
pub const SEASONAL_SIGNAL: &str = "seasonal_analysis";
pub const CALENDAR_SIGNAL: &str = "monthly_calendar";
pub const FORECAST_SIGNAL: &str = "wedding_forecast";

/// Appropriateness strictly below this is a taboo
const TABOO_BELOW: u8 = 4;
/// Appropriateness strictly above this is preferred
const PREFERRED_ABOVE: u8 = 7;
const FORECAST_REASONING_LINES: usize = 3;

pub struct LightingColors {
    pub photograph_well: &'static [&'static str],
    pub reasoning: &'static str,
}

lazy_static! {
    static ref LIGHTING_COLORS: HashMap<&'static str, LightingColors> = {
        let mut m = HashMap::new();
        m.insert("tungsten", LightingColors {
            photograph_well: &["navy", "charcoal", "burgundy"],
            reasoning: "Under tungsten lighting, these colors maintain depth and photograph beautifully",
        });
        m.insert("incandescent", LightingColors {
            photograph_well: &["navy", "charcoal", "burgundy"],
            reasoning: "Warm incandescent light keeps deep colors rich in photos",
        });
        m.insert("fluorescent", LightingColors {
            photograph_well: &["charcoal", "black", "dark_grey"],
            reasoning: "Fluorescent lighting works best with neutral, darker tones",
        });
        m.insert("natural", LightingColors {
            photograph_well: &["navy", "light_grey", "tan", "sage_green"],
            reasoning: "Natural lighting showcases these colors with true, vibrant tones",
        });
        m.insert("led", LightingColors {
            photograph_well: &["navy", "charcoal", "burgundy", "emerald_green"],
            reasoning: "LED lighting brings out the richness in these colors",
        });
        m
    };

    /// Used when the seasonal provider has no palette
    static ref FALLBACK_SEASON_COLORS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("spring", &["light_blue", "sage_green", "tan", "light_grey"]);
        m.insert("summer", &["light_blue", "white", "tan", "sage_green"]);
        m.insert("fall", &["burgundy", "chocolate_brown", "hunter_green", "charcoal", "terracotta"]);
        m.insert("winter", &["navy", "charcoal", "black", "burgundy", "emerald_green"]);
        m
    };
}

const UNLIT_COLORS: &[&str] = &["navy", "charcoal"];
const UNLIT_REASONING: &str = "Lighting at this venue varies, so dependable dark neutrals photograph best";
const UNKNOWN_SEASON_COLORS: &[&str] = &["navy", "charcoal"];

/// Photograph-well colors for a lighting type; mixed or unknown lighting gets dark neutrals
pub fn lighting_colors(lighting: &Lighting) -> (&'static [&'static str], &'static str) {
    match LIGHTING_COLORS.get(lighting.as_str()) {
        Some(entry) => (entry.photograph_well, entry.reasoning),
        None => (UNLIT_COLORS, UNLIT_REASONING),
    }
}

pub fn fallback_season_colors(season: &str) -> &'static [&'static str] {
    FALLBACK_SEASON_COLORS.get(season).copied().unwrap_or(UNKNOWN_SEASON_COLORS)
}

pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("Month {}", month))
}

pub struct ColorFilterBuilder {
    venue: Arc<dyn VenueProvider>,
    cultural: Arc<dyn CulturalProvider>,
    seasonal: Arc<dyn SeasonalProvider>,
    calendar: Arc<dyn CalendarProvider>,
    trends: Arc<dyn TrendForecastProvider>,
    forecast_depth: usize,
}

impl ColorFilterBuilder {
    pub fn new(
        venue: Arc<dyn VenueProvider>,
        cultural: Arc<dyn CulturalProvider>,
        seasonal: Arc<dyn SeasonalProvider>,
        calendar: Arc<dyn CalendarProvider>,
        trends: Arc<dyn TrendForecastProvider>,
        forecast_depth: usize,
    ) -> Self {
        Self { venue, cultural, seasonal, calendar, trends, forecast_depth }
    }

    pub async fn build(&self, request: &RecommendationRequest, trace: &mut SignalTrace) -> ColorFilters {
        let religion = request.religion_key();
        let region = request.region_key();
        let venue = request.venue_key();
        let season = request.season_key();
        let forecast_on = request.is_occasion("wedding") && self.forecast_depth > 0;

        // Independent lookups, issued together and applied in precedence order below
        let (religious, regional, venue_profile, palette, monthly, forecast, seasonal_forecast) = futures::join!(
            async {
                match &religion {
                    Some(key) => accept(RELIGIOUS_SIGNAL, key, self.cultural.religious_guidance(key).await),
                    None => None,
                }
            },
            async {
                match &region {
                    Some(key) => accept(CULTURAL_SIGNAL, key, self.cultural.regional_colors(key).await),
                    None => None,
                }
            },
            async {
                match &venue {
                    Some(key) => accept(LIGHTING_SIGNAL, key, self.venue.venue(key).await),
                    None => None,
                }
            },
            async {
                match &season {
                    Some(key) => accept(SEASONAL_SIGNAL, key, self.seasonal.palette(key).await),
                    None => None,
                }
            },
            async { accept(CALENDAR_SIGNAL, "current_month", self.calendar.monthly_palette().await) },
            async {
                if forecast_on {
                    accept(FORECAST_SIGNAL, "top_ranked", self.trends.top_ranked(self.forecast_depth).await)
                } else {
                    None
                }
            },
            async {
                match &season {
                    Some(key) if forecast_on => accept(FORECAST_SIGNAL, key, self.trends.by_season(key).await),
                    _ => None,
                }
            },
        );

        let mut filters = ColorFilters::default();

        if let (Some(key), Some(guidance)) = (&religion, religious) {
            if !guidance.preferred_colors.is_empty() {
                extend_unique(&mut filters.preferred, guidance.preferred_colors.iter().cloned());
                let mut line = format!(
                    "{} dress code favors {}",
                    TextUtils::title_case(key),
                    guidance.preferred_colors.join(", ")
                );
                if !guidance.dress_code.trim().is_empty() {
                    line.push_str(&format!(" ({})", guidance.dress_code.trim()));
                }
                trace.contribute(RELIGIOUS_SIGNAL, line);
            }
        }

        if let Some(guide) = regional {
            let taboos: Vec<&str> = guide
                .colors
                .iter()
                .filter(|c| c.appropriateness < TABOO_BELOW)
                .map(|c| c.color.as_str())
                .collect();
            let favored: Vec<&str> = guide
                .colors
                .iter()
                .filter(|c| c.appropriateness > PREFERRED_ABOVE)
                .map(|c| c.color.as_str())
                .collect();
            extend_unique(&mut filters.avoid, taboos.iter().copied());
            extend_unique(&mut filters.preferred, favored.iter().copied());
            if !taboos.is_empty() {
                trace.contribute(CULTURAL_SIGNAL, format!("Cultural context: avoiding {}", taboos.join(", ")));
            } else if !favored.is_empty() {
                trace.contribute(CULTURAL_SIGNAL, format!("Cultural context favors {}", favored.join(", ")));
            }
        }

        if let Some(profile) = venue_profile {
            let (colors, reasoning) = lighting_colors(&profile.primary_lighting);
            extend_unique(&mut filters.photograph_well, colors.iter().copied());
            trace.contribute(LIGHTING_SIGNAL, reasoning);
        }

        if let Some(key) = &season {
            let colors: Vec<String> = match palette {
                Some(palette) => palette.primary.iter().chain(palette.accent.iter()).cloned().collect(),
                None => fallback_season_colors(key).iter().map(|c| c.to_string()).collect(),
            };
            extend_unique(&mut filters.preferred, colors.iter().cloned());
            let lead: Vec<&str> = colors.iter().take(3).map(String::as_str).collect();
            trace.contribute(
                SEASONAL_SIGNAL,
                format!("{} season favors {}", TextUtils::title_case(key), lead.join(", ")),
            );
        }

        if let Some(monthly) = monthly.filter(|m| !m.colors.is_empty()) {
            extend_unique(&mut filters.preferred, monthly.colors.iter().cloned());
            trace.contribute(
                CALENDAR_SIGNAL,
                format!("{} calendar highlights {}", month_name(monthly.month), monthly.colors.join(", ")),
            );
        }

        if let Some(trends) = forecast.filter(|t| !t.is_empty()) {
            for trend in &trends {
                extend_unique(&mut filters.preferred, std::iter::once(trend.color.clone()));
                extend_unique(&mut filters.preferred, trend.suit_colors.iter().cloned());
            }
            for trend in trends.iter().take(FORECAST_REASONING_LINES) {
                trace.reason(format!(
                    "Wedding trend #{}: {} at {:.1}% market share, driven by {}",
                    trend.rank,
                    TextUtils::title_case(&trend.color),
                    trend.market_share_pct,
                    trend.trend_driver.to_lowercase()
                ));
            }
            trace.record(FORECAST_SIGNAL);
        }

        // Seasonal trends past the ranked depth still count for a wedding in that season
        if let (Some(key), Some(trends)) = (&season, seasonal_forecast.filter(|t| !t.is_empty())) {
            let colors: Vec<&str> = trends.iter().map(|t| t.color.as_str()).collect();
            extend_unique(&mut filters.preferred, colors.iter().copied());
            trace.contribute(
                FORECAST_SIGNAL,
                format!("{} weddings are trending toward {}", TextUtils::title_case(key), colors.join(", ")),
            );
        }

        filters
    }
}

#[async_trait]
impl PipelineStep for ColorFilterBuilder {
    fn name(&self) -> &'static str {
        "colors"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.color_filters = Some(self.build(request, trace).await);
        Ok(())
    }
}
