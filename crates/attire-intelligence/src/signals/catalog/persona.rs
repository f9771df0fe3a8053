use super::KeyedCatalog;
use crate::signals::{validated, PersonaHints, PersonaMatch, PersonaProvider, SignalResult};
use crate::utils::TextUtils;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PERSONA_FILE: &str = "personas.json";

const STYLE_VIBE_SCORE: u32 = 3;
const STYLE_TAG_SCORE: u32 = 2;
const EXACT_COLOR_SCORE: u32 = 5;
const COLOR_FAMILY_SCORE: u32 = 3;
const PERSONALITY_SCORE: u32 = 4;
/// Score that maps to full confidence
const FULL_CONFIDENCE_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub display_name: String,
    pub vibe: String,
    #[serde(default)]
    pub best_for: String,
    pub product_tags: Vec<String>,
    pub recommended_colors: Vec<String>,
    #[serde(default)]
    pub styling_notes: String,
}

/// Thematic styling archetypes scored against style, color and personality hints
pub struct StaticPersonaProvider {
    personas: KeyedCatalog<PersonaProfile>,
}

impl StaticPersonaProvider {
    pub fn new(personas: KeyedCatalog<PersonaProfile>) -> Self {
        Self { personas }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_personas())
    }

    fn score(profile: &PersonaProfile, hints: &PersonaHints) -> u32 {
        let vibe = profile.vibe.to_lowercase();
        let mut score = 0;

        if let Some(style) = hints.style.as_deref().map(str::to_lowercase).filter(|s| !s.is_empty()) {
            if vibe.contains(&style) || profile.best_for.to_lowercase().contains(&style) {
                score += STYLE_VIBE_SCORE;
            }
            if profile.product_tags.iter().any(|tag| tag.to_lowercase().contains(&style)) {
                score += STYLE_TAG_SCORE;
            }
        }

        if let Some(color) = hints.color.as_deref().map(TextUtils::normalize_key).filter(|c| !c.is_empty()) {
            let colors = &profile.recommended_colors;
            if colors.iter().any(|c| TextUtils::normalize_key(c) == color) {
                score += EXACT_COLOR_SCORE;
            } else if colors.iter().any(|c| TextUtils::same_family(&color, c)) {
                score += COLOR_FAMILY_SCORE;
            }
        }

        if let Some(personality) = hints.personality.as_deref().map(str::to_lowercase).filter(|p| !p.is_empty()) {
            if vibe.contains(&personality) {
                score += PERSONALITY_SCORE;
            }
        }

        score
    }
}

impl Default for StaticPersonaProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl PersonaProvider for StaticPersonaProvider {
    async fn detect(&self, hints: &PersonaHints) -> SignalResult<PersonaMatch> {
        if hints.is_empty() {
            return Ok(None);
        }

        // Strictly greater keeps the first persona in key order on ties
        let mut best: Option<(&String, &PersonaProfile, u32)> = None;
        for (name, profile) in self.personas.iter() {
            let score = Self::score(profile, hints);
            if score > best.map_or(0, |(_, _, s)| s) {
                best = Some((name, profile, score));
            }
        }

        let Some((name, profile, score)) = best else {
            debug!("No persona matched hints {:?}", hints);
            return Ok(None);
        };

        validated(Ok(Some(PersonaMatch {
            name: name.clone(),
            display_name: profile.display_name.clone(),
            tags: profile.product_tags.clone(),
            colors: profile.recommended_colors.clone(),
            styling_notes: profile.styling_notes.clone(),
            confidence: (score as f64 / FULL_CONFIDENCE_SCORE).min(1.0),
        })))
    }
}

fn persona(
    display_name: &str,
    vibe: &str,
    best_for: &str,
    tags: &[&str],
    colors: &[&str],
    styling_notes: &str,
) -> PersonaProfile {
    PersonaProfile {
        display_name: display_name.to_string(),
        vibe: vibe.to_string(),
        best_for: best_for.to_string(),
        product_tags: tags.iter().map(|t| t.to_string()).collect(),
        recommended_colors: colors.iter().map(|c| c.to_string()).collect(),
        styling_notes: styling_notes.to_string(),
    }
}

pub fn default_personas() -> KeyedCatalog<PersonaProfile> {
    KeyedCatalog::new()
        .with(
            "main_character",
            persona(
                "Main Character Energy",
                "Bold, confident, impossible to miss",
                "Students who want every photo to be about them",
                &["statement", "velvet-blazer", "bold-color", "shawl-lapel"],
                &["emerald_green", "royal_blue", "burgundy"],
                "Let the jacket carry the look; keep the shirt and tie quiet",
            ),
        )
        .with(
            "old_money",
            persona(
                "Old Money",
                "Quiet, polished, timeless elegance",
                "Classic dressers who prefer understated luxury",
                &["classic", "double-breasted", "pocket-square", "tailored"],
                &["navy", "charcoal", "cream", "camel"],
                "Perfect tailoring over loud color; a silk pocket square is the only flourish",
            ),
        )
        .with(
            "dark_academia",
            persona(
                "Dark Academia",
                "Moody, intellectual, vintage romantic",
                "Bookish students who love texture and earth tones",
                &["tweed", "textured", "vintage", "earth-tones"],
                &["chocolate_brown", "hunter_green", "burgundy", "charcoal"],
                "Layer textures and keep metals antique brass rather than silver",
            ),
        )
        .with(
            "clean_minimalist",
            persona(
                "Clean Minimalist",
                "Sleek, modern, monochrome and sharp",
                "Modern dressers who want clean lines and zero clutter",
                &["slim-fit", "monochrome", "modern", "minimal"],
                &["black", "white", "light_grey"],
                "One color head to toe; skip the pocket square",
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(style: Option<&str>, color: Option<&str>, personality: Option<&str>) -> PersonaHints {
        PersonaHints {
            style: style.map(|s| s.to_string()),
            color: color.map(|s| s.to_string()),
            personality: personality.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn test_color_family_matches_persona() {
        let provider = StaticPersonaProvider::with_defaults();
        let matched = provider.detect(&hints(None, Some("emerald"), None)).await.unwrap().unwrap();
        assert_eq!(matched.name, "main_character");
        assert!(matched.colors.contains(&"emerald_green".to_string()));
        assert!((matched.confidence - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_exact_color_and_personality_accumulate() {
        let provider = StaticPersonaProvider::with_defaults();
        let matched = provider
            .detect(&hints(None, Some("Emerald Green"), Some("bold")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.name, "main_character");
        assert!((matched.confidence - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_style_hint_scores_vibe_and_tags() {
        let provider = StaticPersonaProvider::with_defaults();
        let matched = provider.detect(&hints(Some("vintage"), None, None)).await.unwrap().unwrap();
        assert_eq!(matched.name, "dark_academia");
        assert_eq!(matched.display_name, "Dark Academia");
    }

    #[tokio::test]
    async fn test_no_hints_or_no_match_is_none() {
        let provider = StaticPersonaProvider::with_defaults();
        assert_eq!(provider.detect(&PersonaHints::default()).await, Ok(None));
        assert_eq!(provider.detect(&hints(None, Some("chartreuse"), None)).await, Ok(None));
    }
}
