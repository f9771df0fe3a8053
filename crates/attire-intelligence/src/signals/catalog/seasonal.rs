use super::KeyedCatalog;
use crate::signals::{
    validated, CalendarProvider, MonthlyFabrics, MonthlyPalette, SeasonFabrics, SeasonPalette, SeasonalProvider,
    SignalResult,
};
use async_trait::async_trait;
use chrono::Datelike;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const SEASONAL_FILE: &str = "seasonal.json";
pub const CALENDAR_FILE: &str = "calendar.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeasonalTable {
    #[serde(default)]
    pub palettes: KeyedCatalog<SeasonPalette>,
    #[serde(default)]
    pub fabrics: KeyedCatalog<SeasonFabrics>,
}

/// Seasonal color and fabric data
pub struct StaticSeasonalProvider {
    table: SeasonalTable,
}

impl StaticSeasonalProvider {
    pub fn new(table: SeasonalTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_seasonal_table())
    }
}

impl Default for StaticSeasonalProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl SeasonalProvider for StaticSeasonalProvider {
    async fn palette(&self, season: &str) -> SignalResult<SeasonPalette> {
        validated(Ok(self.table.palettes.get(season).cloned()))
    }

    async fn fabrics(&self, season: &str) -> SignalResult<SeasonFabrics> {
        validated(Ok(self.table.fabrics.get(season).cloned()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_seasonal_table() -> SeasonalTable {
    let palette = |primary: &[&str], accent: &[&str]| SeasonPalette {
        primary: strings(primary),
        accent: strings(accent),
    };
    let fabrics = |excellent: &[&str], good: &[&str], avoid: &[&str], characteristics: &[&str]| SeasonFabrics {
        excellent: strings(excellent),
        good: strings(good),
        avoid: strings(avoid),
        characteristics: strings(characteristics),
    };

    SeasonalTable {
        palettes: KeyedCatalog::new()
            .with("spring", palette(&["light_grey", "tan", "light_blue"], &["sage_green", "lavender"]))
            .with("summer", palette(&["light_grey", "tan", "white"], &["light_blue", "sage_green"]))
            .with("fall", palette(&["charcoal", "chocolate_brown", "burgundy"], &["hunter_green", "terracotta"]))
            .with("winter", palette(&["navy", "charcoal", "black"], &["burgundy", "emerald_green"])),
        fabrics: KeyedCatalog::new()
            .with(
                "spring",
                fabrics(&["lightweight_wool", "cotton_blend"], &["linen_blend"], &["heavy_wool", "velvet"], &["breathability", "comfort"]),
            )
            .with(
                "summer",
                fabrics(&["linen", "tropical_wool"], &["cotton", "lightweight_wool"], &["heavy_wool", "flannel", "velvet"], &["breathability", "moisture_wicking"]),
            )
            .with(
                "fall",
                fabrics(&["worsted_wool", "tweed"], &["flannel"], &["linen", "seersucker"], &["warmth", "durability"]),
            )
            .with(
                "winter",
                fabrics(&["heavy_wool", "flannel"], &["cashmere_blend", "velvet"], &["linen", "lightweight_wool"], &["warmth", "insulation"]),
            ),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalendarTable {
    #[serde(default)]
    pub palettes: BTreeMap<u32, Vec<String>>,
    #[serde(default)]
    pub fabrics: BTreeMap<u32, Vec<String>>,
}

/// Monthly calendar signal pinned to one month
pub struct StaticCalendarProvider {
    month: u32,
    table: CalendarTable,
}

impl StaticCalendarProvider {
    pub fn new(month: u32, table: CalendarTable) -> Self {
        Self { month, table }
    }

    pub fn for_month(month: u32) -> Self {
        Self::new(month, default_calendar_table())
    }

    /// Pinned to the month at construction time (UTC)
    pub fn current_month(table: CalendarTable) -> Self {
        Self::new(chrono::Utc::now().month(), table)
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendarProvider {
    async fn monthly_palette(&self) -> SignalResult<MonthlyPalette> {
        let palette = self.table.palettes.get(&self.month).map(|colors| MonthlyPalette {
            month: self.month,
            colors: colors.clone(),
        });
        validated(Ok(palette))
    }

    async fn monthly_fabrics(&self) -> SignalResult<MonthlyFabrics> {
        let fabrics = self.table.fabrics.get(&self.month).map(|fabrics| MonthlyFabrics {
            month: self.month,
            fabrics: fabrics.clone(),
        });
        validated(Ok(fabrics))
    }
}

pub fn default_calendar_table() -> CalendarTable {
    let palettes: [(u32, &[&str]); 12] = [
        (1, &["navy", "charcoal", "burgundy"]),
        (2, &["burgundy", "black", "blush"]),
        (3, &["light_grey", "sage_green"]),
        (4, &["light_blue", "tan", "lavender"]),
        (5, &["light_grey", "sage_green", "dusty_blue"]),
        (6, &["tan", "light_blue", "white"]),
        (7, &["white", "light_grey", "tan"]),
        (8, &["tan", "sage_green"]),
        (9, &["charcoal", "terracotta", "olive"]),
        (10, &["chocolate_brown", "burgundy", "hunter_green"]),
        (11, &["charcoal", "burgundy", "camel"]),
        (12, &["black", "emerald_green", "navy"]),
    ];
    let fabrics: [(u32, &[&str]); 12] = [
        (1, &["flannel", "heavy_wool"]),
        (2, &["flannel", "velvet"]),
        (3, &["worsted_wool"]),
        (4, &["lightweight_wool", "cotton_blend"]),
        (5, &["lightweight_wool", "linen_blend"]),
        (6, &["linen", "tropical_wool"]),
        (7, &["linen", "seersucker"]),
        (8, &["tropical_wool", "linen_blend"]),
        (9, &["worsted_wool"]),
        (10, &["tweed", "worsted_wool"]),
        (11, &["flannel", "tweed"]),
        (12, &["velvet", "heavy_wool"]),
    ];
    CalendarTable {
        palettes: palettes.iter().map(|(m, c)| (*m, strings(c))).collect(),
        fabrics: fabrics.iter().map(|(m, f)| (*m, strings(f))).collect(),
    }
}
