use super::KeyedCatalog;
use crate::signals::{validated, Lighting, SignalResult, VenueProfile, VenueProvider};
use async_trait::async_trait;

pub const VENUES_FILE: &str = "venues.json";

pub struct StaticVenueProvider {
    venues: KeyedCatalog<VenueProfile>,
}

impl StaticVenueProvider {
    pub fn new(venues: KeyedCatalog<VenueProfile>) -> Self {
        Self { venues }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_venues())
    }
}

impl Default for StaticVenueProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl VenueProvider for StaticVenueProvider {
    async fn venue(&self, venue_type: &str) -> SignalResult<VenueProfile> {
        validated(Ok(self.venues.get(venue_type).cloned()))
    }
}

fn venue(strictness: u8, primary_lighting: Lighting) -> VenueProfile {
    VenueProfile { strictness, primary_lighting }
}

pub fn default_venues() -> KeyedCatalog<VenueProfile> {
    KeyedCatalog::new()
        .with("church", venue(8, Lighting::Tungsten))
        .with("cathedral", venue(9, Lighting::Tungsten))
        .with("synagogue", venue(8, Lighting::Tungsten))
        .with("mosque", venue(8, Lighting::Natural))
        .with("temple", venue(7, Lighting::Natural))
        .with("ballroom", venue(9, Lighting::Tungsten))
        .with("hotel_ballroom", venue(9, Lighting::Led))
        .with("museum", venue(8, Lighting::Led))
        .with("courthouse", venue(8, Lighting::Fluorescent))
        .with("office", venue(6, Lighting::Fluorescent))
        .with("country_club", venue(7, Lighting::Natural))
        .with("restaurant", venue(6, Lighting::Incandescent))
        .with("rooftop", venue(6, Lighting::Natural))
        .with("outdoor", venue(5, Lighting::Natural))
        .with("garden", venue(5, Lighting::Natural))
        .with("vineyard", venue(5, Lighting::Natural))
        .with("barn", venue(4, Lighting::Mixed))
        .with("beach", venue(4, Lighting::Natural))
}
