use crate::signals::{validated, CareerProfile, CareerProvider, SignalResult};
use crate::utils::TextUtils;
use async_trait::async_trait;
use serde::Deserialize;

pub const CAREER_FILE: &str = "career_stages.json";

/// One keyword rule; the first rule whose any keyword appears in the key wins
#[derive(Debug, Clone, Deserialize)]
pub struct StageRule {
    pub keywords: Vec<String>,
    pub profile: CareerProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgeBand {
    /// Exclusive upper bound; `None` is open-ended
    pub below: Option<u32>,
    pub profile: CareerProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareerTable {
    pub role_rules: Vec<StageRule>,
    pub occupation_rules: Vec<StageRule>,
    pub age_bands: Vec<AgeBand>,
}

pub struct StaticCareerProvider {
    table: CareerTable,
}

impl StaticCareerProvider {
    pub fn new(table: CareerTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_career_table())
    }

    fn match_rules<'a>(rules: &'a [StageRule], key: &str) -> Option<&'a CareerProfile> {
        rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| TextUtils::contains_ignore_case(key, kw)))
            .map(|rule| &rule.profile)
    }
}

impl Default for StaticCareerProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CareerProvider for StaticCareerProvider {
    async fn career_stage(&self, key: &str) -> SignalResult<CareerProfile> {
        let profile = Self::match_rules(&self.table.role_rules, key)
            .or_else(|| Self::match_rules(&self.table.occupation_rules, key))
            .cloned();
        validated(Ok(profile))
    }

    async fn typical_stage_for_age(&self, age: u32) -> SignalResult<CareerProfile> {
        let profile = self
            .table
            .age_bands
            .iter()
            .find(|band| band.below.map_or(true, |limit| age < limit))
            .map(|band| band.profile.clone());
        validated(Ok(profile))
    }
}

fn profile(stage: &str, formality_score: u8, investment: f64, quality_label: &str) -> CareerProfile {
    CareerProfile {
        stage: stage.to_string(),
        formality_score,
        investment,
        quality_label: quality_label.to_string(),
    }
}

fn rule(keywords: &[&str], profile: CareerProfile) -> StageRule {
    StageRule {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        profile,
    }
}

pub fn default_career_table() -> CareerTable {
    CareerTable {
        role_rules: vec![
            rule(&["c-level", "c_level", "chief", "executive"], profile("executive", 9, 8000.0, "executive")),
            rule(&["director", "vp", "vice president"], profile("director", 8, 5000.0, "senior_professional")),
            rule(&["manager", "senior"], profile("manager", 7, 3000.0, "professional")),
            rule(&["associate", "mid"], profile("mid_level", 6, 2000.0, "professional")),
            rule(&["entry", "junior", "intern", "graduate"], profile("entry_level", 5, 1200.0, "starter")),
        ],
        occupation_rules: vec![
            rule(&["lawyer", "attorney", "banker", "consultant"], profile("senior_professional", 8, 5000.0, "senior_professional")),
            rule(&["accountant", "finance"], profile("professional", 7, 3000.0, "professional")),
            rule(&["teacher", "engineer"], profile("professional", 6, 2000.0, "professional")),
            rule(&["creative", "designer", "artist"], profile("creative", 5, 1500.0, "professional")),
        ],
        age_bands: vec![
            AgeBand { below: Some(25), profile: profile("entry_level", 5, 1200.0, "starter") },
            AgeBand { below: Some(32), profile: profile("mid_level", 6, 2000.0, "professional") },
            AgeBand { below: Some(40), profile: profile("manager", 7, 3000.0, "professional") },
            AgeBand { below: Some(50), profile: profile("director", 8, 5000.0, "senior_professional") },
            AgeBand { below: None, profile: profile("executive", 8, 6000.0, "executive") },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_role_keywords_resolve_stage() {
        let provider = StaticCareerProvider::with_defaults();
        let vp = provider.career_stage("Senior VP").await.unwrap().unwrap();
        // "director/vp" is listed before "manager/senior"
        assert_eq!(vp.stage, "director");
        assert_eq!(vp.formality_score, 8);
    }

    #[tokio::test]
    async fn test_occupation_keywords_resolve_stage() {
        let provider = StaticCareerProvider::with_defaults();
        let lawyer = provider.career_stage("lawyer").await.unwrap().unwrap();
        assert_eq!(lawyer.formality_score, 8);
        assert_eq!(provider.career_stage("astronaut").await, Ok(None));
    }

    #[tokio::test]
    async fn test_age_bands() {
        let provider = StaticCareerProvider::with_defaults();
        assert_eq!(provider.typical_stage_for_age(22).await.unwrap().unwrap().stage, "entry_level");
        assert_eq!(provider.typical_stage_for_age(35).await.unwrap().unwrap().stage, "manager");
        assert_eq!(provider.typical_stage_for_age(70).await.unwrap().unwrap().stage, "executive");
    }
}
