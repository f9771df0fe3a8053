use super::KeyedCatalog;
use crate::signals::{validated, SignalError, SignalResult, TagMatch, TagMappingProvider, PERSONA_BOOST};
use crate::utils::{extend_unique, TextUtils};
use async_trait::async_trait;
use serde::Deserialize;

pub const TAG_MAPPING_FILE: &str = "product_tags.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OccasionTags {
    #[serde(default)]
    pub primary_tags: Vec<String>,
    #[serde(default)]
    pub seasonal_tags: Vec<String>,
    #[serde(default)]
    pub venue_tags: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeasonTags {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fabrics: Vec<String>,
}

/// Named boost constant per vocabulary
#[derive(Debug, Clone, Deserialize)]
pub struct TagPriorityRules {
    pub exact_match_boost: f64,
    pub seasonal_match_boost: f64,
    pub venue_match_boost: f64,
    pub style_match_boost: f64,
}

impl TagPriorityRules {
    /// Every boost must be at least 1.0 and stay below the persona boost
    pub fn validate(&self) -> Result<(), SignalError> {
        let rules = [
            ("exact_match_boost", self.exact_match_boost),
            ("seasonal_match_boost", self.seasonal_match_boost),
            ("venue_match_boost", self.venue_match_boost),
            ("style_match_boost", self.style_match_boost),
        ];
        for (field, boost) in rules {
            if !(1.0..PERSONA_BOOST).contains(&boost) {
                return Err(SignalError::malformed(
                    "tag_mapping",
                    field,
                    format!("{} is outside [1.0, {})", boost, PERSONA_BOOST),
                ));
            }
        }
        Ok(())
    }
}

impl Default for TagPriorityRules {
    fn default() -> Self {
        Self {
            exact_match_boost: 2.0,
            seasonal_match_boost: 1.5,
            venue_match_boost: 1.3,
            style_match_boost: 1.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TagMappingTable {
    #[serde(default)]
    pub occasions: KeyedCatalog<OccasionTags>,
    #[serde(default)]
    pub venues: KeyedCatalog<Vec<String>>,
    #[serde(default)]
    pub seasons: KeyedCatalog<SeasonTags>,
    #[serde(default)]
    pub styles: KeyedCatalog<Vec<String>>,
    #[serde(default)]
    pub priority_rules: TagPriorityRules,
}

pub struct StaticTagMappingProvider {
    table: TagMappingTable,
}

impl StaticTagMappingProvider {
    pub fn new(table: TagMappingTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_tag_table())
    }

    fn flat_match(catalog: &KeyedCatalog<Vec<String>>, key: &str, boost: f64, kind: &str) -> SignalResult<TagMatch> {
        let Some((matched_key, tags)) = catalog.get_partial(key) else {
            return Ok(None);
        };
        let mut unique = Vec::new();
        extend_unique(&mut unique, tags.iter().cloned());
        let reasoning = if matched_key == TextUtils::normalize_key(key) {
            format!("{} {} matched {} product tags", key, kind, unique.len())
        } else {
            format!("Partial match for {} found {}", key, matched_key)
        };
        validated(Ok(Some(TagMatch { tags: unique, boost, reasoning })))
    }
}

impl Default for StaticTagMappingProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl TagMappingProvider for StaticTagMappingProvider {
    async fn occasion_tags(
        &self,
        occasion: &str,
        season: Option<&str>,
        venue: Option<&str>,
    ) -> SignalResult<TagMatch> {
        let boost = self.table.priority_rules.exact_match_boost;
        let Some((matched_key, data)) = self.table.occasions.get_partial(occasion) else {
            return Ok(None);
        };

        let mut tags = Vec::new();
        extend_unique(&mut tags, data.primary_tags.iter().cloned());

        let reasoning = if matched_key == TextUtils::normalize_key(occasion) {
            if let Some(season) = season.map(TextUtils::normalize_tag) {
                extend_unique(&mut tags, data.seasonal_tags.iter().filter(|t| t.contains(&season)).cloned());
            }
            if let Some(venue) = venue.map(TextUtils::normalize_tag) {
                extend_unique(&mut tags, data.venue_tags.iter().filter(|t| t.contains(&venue)).cloned());
            }
            extend_unique(&mut tags, data.style_tags.iter().cloned());
            format!("{} occasion matched {} product tags", occasion, tags.len())
        } else {
            format!("Partial match for {} found {}", occasion, matched_key)
        };

        validated(Ok(Some(TagMatch { tags, boost, reasoning })))
    }

    async fn venue_tags(&self, venue: &str) -> SignalResult<TagMatch> {
        Self::flat_match(&self.table.venues, venue, self.table.priority_rules.venue_match_boost, "venue")
    }

    async fn season_tags(&self, season: &str) -> SignalResult<TagMatch> {
        let Some(data) = self.table.seasons.get(season) else {
            return Ok(None);
        };
        let mut tags = Vec::new();
        extend_unique(&mut tags, data.tags.iter().cloned());
        extend_unique(&mut tags, data.fabrics.iter().cloned());
        let reasoning = format!("{} season matched {} product tags", season, tags.len());
        validated(Ok(Some(TagMatch {
            tags,
            boost: self.table.priority_rules.seasonal_match_boost,
            reasoning,
        })))
    }

    async fn style_tags(&self, style: &str) -> SignalResult<TagMatch> {
        Self::flat_match(&self.table.styles, style, self.table.priority_rules.style_match_boost, "style")
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn occasion(primary: &[&str], seasonal: &[&str], venue: &[&str], style: &[&str]) -> OccasionTags {
    OccasionTags {
        primary_tags: strings(primary),
        seasonal_tags: strings(seasonal),
        venue_tags: strings(venue),
        style_tags: strings(style),
    }
}

pub fn default_tag_table() -> TagMappingTable {
    TagMappingTable {
        occasions: KeyedCatalog::new()
            .with(
                "wedding",
                occasion(
                    &["wedding", "groom", "groomsmen"],
                    &["spring-wedding", "summer-wedding", "fall-wedding", "winter-wedding"],
                    &["outdoor-wedding", "church-wedding", "beach-wedding", "barn-wedding", "garden-wedding"],
                    &["formal"],
                ),
            )
            .with("prom", occasion(&["prom", "homecoming"], &["spring-prom"], &[], &["statement", "formal"]))
            .with("gala", occasion(&["gala", "black-tie"], &["winter-gala"], &["ballroom-gala"], &["tuxedo"]))
            .with("interview", occasion(&["interview", "business"], &[], &[], &["conservative"]))
            .with("business", occasion(&["business", "office"], &[], &[], &["professional"]))
            .with("funeral", occasion(&["funeral", "memorial"], &[], &[], &["conservative", "dark-tones"]))
            .with("casual", occasion(&["smart-casual"], &["summer-casual"], &[], &["relaxed"])),
        venues: KeyedCatalog::new()
            .with("outdoor", strings(&["outdoor-wedding", "garden-wedding", "vineyard-wedding", "barn-wedding"]))
            .with("church", strings(&["church-wedding", "traditional", "ceremony"]))
            .with("beach", strings(&["beach-wedding", "destination", "linen"]))
            .with("ballroom", strings(&["ballroom-gala", "black-tie", "evening"]))
            .with("barn", strings(&["barn-wedding", "rustic"])),
        seasons: KeyedCatalog::new()
            .with("spring", SeasonTags { tags: strings(&["spring-wedding", "spring-prom"]), fabrics: strings(&["lightweight-wool"]) })
            .with("summer", SeasonTags { tags: strings(&["summer-wedding", "destination"]), fabrics: strings(&["linen", "cotton"]) })
            .with("fall", SeasonTags { tags: strings(&["fall-wedding"]), fabrics: strings(&["tweed", "flannel"]) })
            .with("winter", SeasonTags { tags: strings(&["winter-wedding", "holiday-event"]), fabrics: strings(&["velvet"]) }),
        styles: KeyedCatalog::new()
            .with("bold", strings(&["shiny", "sequin", "satin", "metallic", "statement"]))
            .with("luxury", strings(&["velvet", "silk", "tuxedo", "premium"]))
            .with("classic", strings(&["timeless", "navy-suit", "notch-lapel"]))
            .with("modern", strings(&["slim-fit", "contemporary"]))
            .with("relaxed", strings(&["unstructured", "linen", "smart-casual"])),
        priority_rules: TagPriorityRules::default(),
    }
}
