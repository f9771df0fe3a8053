use super::KeyedCatalog;
use crate::signals::{
    validated, ColorAppropriateness, CulturalProvider, RegionalColorGuide, ReligiousGuidance, SignalResult,
};
use async_trait::async_trait;
use serde::Deserialize;

pub const CULTURAL_FILE: &str = "cultural.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CulturalTable {
    #[serde(default)]
    pub regions: KeyedCatalog<RegionalColorGuide>,
    #[serde(default)]
    pub religions: KeyedCatalog<ReligiousGuidance>,
}

pub struct StaticCulturalProvider {
    table: CulturalTable,
}

impl StaticCulturalProvider {
    pub fn new(table: CulturalTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_cultural_table())
    }
}

impl Default for StaticCulturalProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CulturalProvider for StaticCulturalProvider {
    async fn regional_colors(&self, region: &str) -> SignalResult<RegionalColorGuide> {
        validated(Ok(self.table.regions.get(region).cloned()))
    }

    async fn religious_guidance(&self, religion: &str) -> SignalResult<ReligiousGuidance> {
        validated(Ok(self.table.religions.get(religion).cloned()))
    }
}

fn guide(levels: &[(&str, u8)]) -> RegionalColorGuide {
    RegionalColorGuide {
        colors: levels
            .iter()
            .map(|(color, appropriateness)| ColorAppropriateness {
                color: color.to_string(),
                appropriateness: *appropriateness,
            })
            .collect(),
    }
}

fn guidance(colors: &[&str], dress_code: &str) -> ReligiousGuidance {
    ReligiousGuidance {
        preferred_colors: colors.iter().map(|c| c.to_string()).collect(),
        dress_code: dress_code.to_string(),
    }
}

pub fn default_cultural_table() -> CulturalTable {
    CulturalTable {
        regions: KeyedCatalog::new()
            .with("general", guide(&[("navy", 8), ("charcoal", 8), ("black", 7)]))
            .with("detroit", guide(&[("navy", 9), ("charcoal", 8), ("burgundy", 8), ("bright_orange", 3)]))
            .with("midwest", guide(&[("navy", 9), ("charcoal", 8), ("tan", 6), ("neon_green", 2)]))
            .with("south", guide(&[("light_grey", 8), ("tan", 8), ("seersucker_blue", 8), ("black", 5)]))
            .with("northeast", guide(&[("charcoal", 9), ("navy", 9), ("black", 8), ("bright_yellow", 3)]))
            .with("south_asian", guide(&[("red", 9), ("gold", 8), ("maroon", 8), ("white", 3), ("black", 3)]))
            .with("east_asian", guide(&[("red", 9), ("gold", 8), ("navy", 7), ("white", 2)]))
            .with("middle_eastern", guide(&[("navy", 8), ("charcoal", 8), ("white", 7), ("bright_pink", 3)])),
        religions: KeyedCatalog::new()
            .with("catholic", guidance(&["navy", "charcoal", "grey"], "Conservative dark suit; jacket stays on during the ceremony"))
            .with("protestant", guidance(&["navy", "charcoal", "light_grey"], "Classic business formal"))
            .with("jewish", guidance(&["navy", "charcoal", "black"], "Dark suit; kippah is provided at most ceremonies"))
            .with("muslim", guidance(&["navy", "charcoal", "grey"], "Modest cut, long sleeves, avoid flashy accents"))
            .with("hindu", guidance(&["maroon", "gold", "cream"], "Festive colors welcome; avoid all-black ensembles"))
            .with("orthodox", guidance(&["black", "charcoal", "navy"], "Conservative dark suit and tie")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_region_lookup_is_normalized() {
        let provider = StaticCulturalProvider::with_defaults();
        let guide = provider.regional_colors("South Asian").await.unwrap().unwrap();
        assert!(guide.colors.iter().any(|c| c.color == "white" && c.appropriateness < 4));
    }

    #[tokio::test]
    async fn test_religion_lookup() {
        let provider = StaticCulturalProvider::with_defaults();
        let catholic = provider.religious_guidance("catholic").await.unwrap().unwrap();
        assert_eq!(catholic.preferred_colors[0], "navy");
        assert_eq!(provider.religious_guidance("pastafarian").await, Ok(None));
    }

    #[test]
    fn test_partial_json_table_defaults_missing_sections() {
        let table: CulturalTable =
            serde_json::from_str(r#"{"regions": {"Pacific Northwest": {"colors": [{"color": "forest_green", "appropriateness": 9}]}}}"#)
                .unwrap();
        assert!(table.regions.get("pacific_northwest").is_some());
        assert!(table.religions.is_empty());
    }
}
