use crate::signals::{validated, SignalResult, TrendColor, TrendForecastProvider};
use async_trait::async_trait;

pub const TREND_FORECAST_FILE: &str = "wedding_forecast.json";

/// Ranked wedding color forecast
pub struct StaticTrendForecastProvider {
    colors: Vec<TrendColor>,
}

impl StaticTrendForecastProvider {
    /// Colors are kept sorted by rank regardless of input order
    pub fn new(mut colors: Vec<TrendColor>) -> Self {
        colors.sort_by_key(|c| c.rank);
        Self { colors }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_trend_colors())
    }
}

impl Default for StaticTrendForecastProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl TrendForecastProvider for StaticTrendForecastProvider {
    async fn top_ranked(&self, limit: usize) -> SignalResult<Vec<TrendColor>> {
        if self.colors.is_empty() || limit == 0 {
            return Ok(None);
        }
        validated(Ok(Some(self.colors.iter().take(limit).cloned().collect())))
    }

    async fn by_season(&self, season: &str) -> SignalResult<Vec<TrendColor>> {
        let season = season.trim().to_lowercase();
        let matching: Vec<TrendColor> = self
            .colors
            .iter()
            .filter(|c| c.best_seasons.iter().any(|s| s.to_lowercase() == season))
            .cloned()
            .collect();
        if matching.is_empty() {
            return Ok(None);
        }
        validated(Ok(Some(matching)))
    }
}

fn trend(rank: u32, color: &str, share: f64, driver: &str, suits: &[&str], seasons: &[&str]) -> TrendColor {
    TrendColor {
        rank,
        color: color.to_string(),
        market_share_pct: share,
        trend_driver: driver.to_string(),
        suit_colors: suits.iter().map(|s| s.to_string()).collect(),
        best_seasons: seasons.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_trend_colors() -> Vec<TrendColor> {
    vec![
        trend(1, "sage_green", 18.5, "Garden and greenery weddings", &["light_grey", "tan"], &["spring", "summer"]),
        trend(2, "dusty_blue", 15.2, "Soft coastal palettes", &["navy", "light_grey"], &["spring", "summer", "fall"]),
        trend(3, "terracotta", 12.0, "Desert and boho venues", &["tan", "chocolate_brown"], &["fall"]),
        trend(4, "burgundy", 10.4, "Moody romantic receptions", &["charcoal", "navy"], &["fall", "winter"]),
        trend(5, "champagne", 9.1, "Period drama inspired elegance", &["light_grey", "cream"], &["spring", "winter"]),
        trend(6, "emerald_green", 7.5, "Jewel-tone evening weddings", &["black", "charcoal"], &["winter"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_top_ranked_orders_by_rank() {
        let mut colors = default_trend_colors();
        colors.reverse();
        let provider = StaticTrendForecastProvider::new(colors);
        let top = provider.top_ranked(3).await.unwrap().unwrap();
        let names: Vec<&str> = top.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(names, vec!["sage_green", "dusty_blue", "terracotta"]);
    }

    #[tokio::test]
    async fn test_by_season_filters() {
        let provider = StaticTrendForecastProvider::with_defaults();
        let winter = provider.by_season("Winter").await.unwrap().unwrap();
        assert!(winter.iter().all(|c| c.best_seasons.contains(&"winter".to_string())));
        assert_eq!(provider.by_season("monsoon").await, Ok(None));
    }

    #[tokio::test]
    async fn test_empty_forecast_is_no_match() {
        let provider = StaticTrendForecastProvider::new(Vec::new());
        assert_eq!(provider.top_ranked(5).await, Ok(None));
    }
}
