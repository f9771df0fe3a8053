use crate::signals::{validated, Climate, FabricPerformanceProvider, FabricQuery, FabricRanking, SignalResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const FABRIC_PERFORMANCE_FILE: &str = "fabric_performance.json";

/// Ranked list length returned per query
const MAX_RANKED: usize = 5;
const MIN_PHOTO_SCORE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricPerformanceRow {
    pub fabric_type: String,
    pub durability: u8,
    pub wrinkle_resistance: u8,
    pub breathability: u8,
    pub care_difficulty: u8,
    /// Average of flash, natural, studio and color-accuracy scores
    pub photo_score: f64,
}

impl FabricPerformanceRow {
    fn overall(&self) -> u32 {
        self.durability as u32 + self.wrinkle_resistance as u32 + self.breathability as u32
    }
}

pub struct StaticFabricPerformanceProvider {
    rows: Vec<FabricPerformanceRow>,
}

impl StaticFabricPerformanceProvider {
    pub fn new(rows: Vec<FabricPerformanceRow>) -> Self {
        Self { rows }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_fabric_rows())
    }
}

impl Default for StaticFabricPerformanceProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl FabricPerformanceProvider for StaticFabricPerformanceProvider {
    async fn recommend(&self, query: &FabricQuery) -> SignalResult<FabricRanking> {
        if self.rows.is_empty() {
            return Ok(None);
        }

        let mut reasoning = Vec::new();
        let mut min_breathability = 0;
        let mut min_durability = 0;
        let mut min_wrinkle_resistance = 0;
        let mut max_care_difficulty = 10;

        match query.climate {
            Climate::Hot => {
                min_breathability = 8;
                reasoning.push("High breathability for hot climate".to_string());
            }
            Climate::Cold => {
                min_durability = 7;
                reasoning.push("Durable fabrics for cold weather".to_string());
            }
            Climate::Mild => {}
        }

        let professional = matches!(
            query.occasion.as_deref(),
            Some("business") | Some("formal") | Some("interview") | Some("gala")
        );
        if professional {
            min_wrinkle_resistance = 6;
            max_care_difficulty = 8;
            reasoning.push("Wrinkle-resistant for professional appearance".to_string());
        }

        let mut candidates: Vec<&FabricPerformanceRow> = self
            .rows
            .iter()
            .filter(|row| {
                row.breathability >= min_breathability
                    && row.durability >= min_durability
                    && row.wrinkle_resistance >= min_wrinkle_resistance
                    && row.care_difficulty <= max_care_difficulty
            })
            .collect();
        candidates.sort_by(|a, b| b.overall().cmp(&a.overall()));

        if query.photography {
            let mut photogenic: Vec<&FabricPerformanceRow> = candidates
                .iter()
                .copied()
                .filter(|row| row.photo_score >= MIN_PHOTO_SCORE)
                .collect();
            photogenic.sort_by(|a, b| b.photo_score.total_cmp(&a.photo_score));
            if !photogenic.is_empty() {
                reasoning.push(format!(
                    "Filtered for photography: {} fabrics with photo performance score >= {}/10",
                    photogenic.len(),
                    MIN_PHOTO_SCORE
                ));
                candidates = photogenic;
            }
        }

        let ranking = FabricRanking {
            fabrics: candidates
                .into_iter()
                .take(MAX_RANKED)
                .map(|row| row.fabric_type.clone())
                .collect(),
            reasoning,
        };
        validated(Ok(Some(ranking)))
    }
}

fn row(fabric_type: &str, durability: u8, wrinkle: u8, breathability: u8, care: u8, photo: f64) -> FabricPerformanceRow {
    FabricPerformanceRow {
        fabric_type: fabric_type.to_string(),
        durability,
        wrinkle_resistance: wrinkle,
        breathability,
        care_difficulty: care,
        photo_score: photo,
    }
}

pub fn default_fabric_rows() -> Vec<FabricPerformanceRow> {
    vec![
        row("super_110s_wool", 9, 8, 7, 5, 8.5),
        row("super_130s_wool", 7, 7, 8, 7, 9.0),
        row("tropical_wool", 7, 7, 9, 5, 7.5),
        row("wool_blend", 8, 8, 6, 4, 7.0),
        row("linen", 5, 2, 10, 6, 6.5),
        row("linen_blend", 6, 5, 9, 5, 6.5),
        row("cotton", 6, 4, 8, 4, 6.0),
        row("stretch_wool", 7, 9, 7, 4, 7.5),
        row("flannel", 8, 6, 4, 6, 7.0),
        row("tweed", 10, 8, 3, 5, 6.0),
        row("velvet", 5, 5, 3, 9, 9.5),
        row("polyester_blend", 8, 9, 3, 2, 4.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(occasion: Option<&str>, climate: Climate, photography: bool) -> FabricQuery {
        FabricQuery { occasion: occasion.map(|s| s.to_string()), climate, photography }
    }

    #[tokio::test]
    async fn test_hot_climate_requires_breathability() {
        let provider = StaticFabricPerformanceProvider::with_defaults();
        let ranking = provider.recommend(&query(None, Climate::Hot, false)).await.unwrap().unwrap();
        assert!(!ranking.fabrics.is_empty());
        assert!(ranking.fabrics.iter().all(|f| f != "tweed" && f != "velvet"));
        assert_eq!(ranking.reasoning[0], "High breathability for hot climate");
    }

    #[tokio::test]
    async fn test_photography_sorts_by_photo_score() {
        let provider = StaticFabricPerformanceProvider::with_defaults();
        let ranking = provider.recommend(&query(Some("wedding"), Climate::Mild, true)).await.unwrap().unwrap();
        assert_eq!(ranking.fabrics[0], "velvet");
        assert!(!ranking.fabrics.contains(&"polyester_blend".to_string()));
        assert!(ranking.fabrics.len() <= MAX_RANKED);
    }

    #[tokio::test]
    async fn test_empty_table_is_no_match() {
        let provider = StaticFabricPerformanceProvider::new(Vec::new());
        assert_eq!(provider.recommend(&query(None, Climate::Mild, false)).await, Ok(None));
    }
}
