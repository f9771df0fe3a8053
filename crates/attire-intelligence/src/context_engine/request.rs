//! Input to the context builder

use crate::signals::PersonaHints;
use crate::utils::TextUtils;
use serde::{Deserialize, Serialize};

/// Everything the caller knows about the customer and the occasion.
/// Every field is optional; an absent field means the signal does not apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationRequest {
    // Target colors
    pub suit_color: Option<String>,
    pub shirt_color: Option<String>,
    pub tie_color: Option<String>,

    // Persona hints
    pub style_preference: Option<String>,
    pub color_preference: Option<String>,
    pub personality: Option<String>,

    // Occasion
    pub occasion: Option<String>,
    pub venue_type: Option<String>,
    pub season: Option<String>,

    // Customer
    pub age: Option<u32>,
    pub occupation: Option<String>,
    pub role_level: Option<String>,
    pub customer_id: Option<String>,

    // Culture
    pub cultural_region: Option<String>,
    pub religious_context: Option<String>,

    /// Minutes spent browsing this session
    pub session_duration: Option<f64>,
    pub choices_viewed: Option<u32>,

    /// "travel", "photography", "video_call", ...
    pub use_case: Option<String>,
}

fn key(field: &Option<String>) -> Option<String> {
    field.as_deref().map(TextUtils::normalize_key).filter(|k| !k.is_empty())
}

fn text(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

impl RecommendationRequest {
    pub fn occasion_key(&self) -> Option<String> {
        key(&self.occasion)
    }

    pub fn venue_key(&self) -> Option<String> {
        key(&self.venue_type)
    }

    pub fn season_key(&self) -> Option<String> {
        key(&self.season)
    }

    pub fn use_case_key(&self) -> Option<String> {
        key(&self.use_case)
    }

    pub fn region_key(&self) -> Option<String> {
        key(&self.cultural_region)
    }

    pub fn religion_key(&self) -> Option<String> {
        key(&self.religious_context)
    }

    pub fn role_level(&self) -> Option<&str> {
        text(&self.role_level)
    }

    pub fn occupation(&self) -> Option<&str> {
        text(&self.occupation)
    }

    pub fn customer_id(&self) -> Option<&str> {
        text(&self.customer_id)
    }

    pub fn style_preference(&self) -> Option<&str> {
        text(&self.style_preference)
    }

    pub fn is_occasion(&self, occasion: &str) -> bool {
        self.occasion_key().as_deref() == Some(occasion)
    }

    /// Style, color and personality hints for persona detection.
    /// An explicit color preference wins over the requested suit color.
    pub fn persona_hints(&self) -> PersonaHints {
        PersonaHints {
            style: text(&self.style_preference).map(str::to_string),
            color: text(&self.color_preference)
                .or_else(|| text(&self.suit_color))
                .map(str::to_string),
            personality: text(&self.personality).map(str::to_string),
        }
    }
}
