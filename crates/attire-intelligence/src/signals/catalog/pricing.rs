use crate::signals::{validated, PriceRange, PriceTierProvider, PriceTierTable, SignalResult, TierName, TierPricing};
use async_trait::async_trait;

pub const PRICE_TIER_FILE: &str = "price_tiers.json";

pub struct StaticPriceTierProvider {
    table: PriceTierTable,
}

impl StaticPriceTierProvider {
    pub fn new(table: PriceTierTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_price_tiers())
    }
}

impl Default for StaticPriceTierProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl PriceTierProvider for StaticPriceTierProvider {
    async fn tier_table(&self) -> SignalResult<PriceTierTable> {
        if self.table.tiers.is_empty() {
            return Ok(None);
        }
        validated(Ok(Some(self.table.clone())))
    }
}

#[allow(clippy::too_many_arguments)]
fn tier(
    investment: (f64, f64),
    quality_level: &str,
    suit: (f64, f64),
    shirt: (f64, f64),
    tie: (f64, f64),
    shoes: (f64, f64),
    max_accessory_pct: f64,
) -> TierPricing {
    TierPricing {
        min_investment: investment.0,
        max_investment: investment.1,
        quality_level: quality_level.to_string(),
        suit: PriceRange::new(suit.0, suit.1),
        shirt: PriceRange::new(shirt.0, shirt.1),
        tie: PriceRange::new(tie.0, tie.1),
        shoes: PriceRange::new(shoes.0, shoes.1),
        max_accessory_pct,
    }
}

pub fn default_price_tiers() -> PriceTierTable {
    let mut table = PriceTierTable::default();
    table.tiers.insert(
        TierName::Entry,
        tier((200.0, 500.0), "starter", (150.0, 300.0), (30.0, 60.0), (20.0, 40.0), (80.0, 150.0), 0.10),
    );
    table.tiers.insert(
        TierName::Mid,
        tier((400.0, 900.0), "professional", (300.0, 550.0), (50.0, 100.0), (30.0, 70.0), (150.0, 300.0), 0.20),
    );
    table.tiers.insert(
        TierName::Premium,
        tier((800.0, 1800.0), "senior_professional", (600.0, 1100.0), (90.0, 180.0), (60.0, 120.0), (250.0, 450.0), 0.12),
    );
    table.tiers.insert(
        TierName::Luxury,
        tier((1500.0, 4000.0), "executive", (1200.0, 2500.0), (150.0, 350.0), (100.0, 250.0), (400.0, 900.0), 0.15),
    );
    table
}
