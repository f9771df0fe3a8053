//! Fit guidance from occupation archetypes and age bands

use crate::context_engine::context::FitGuidance;
use crate::context_engine::pipeline::{ContextDraft, PipelineStep};
use crate::context_engine::request::RecommendationRequest;
use crate::context_engine::trace::SignalTrace;
use crate::utils::{extend_unique, TextUtils};
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const OCCUPATION_FIT_SIGNAL: &str = "occupation_fit_analysis";
pub const AGE_FIT_SIGNAL: &str = "age_fit_analysis";

struct Archetype {
    style: &'static str,
    details: &'static [&'static str],
    industry_standard: &'static str,
}

const DEFAULT_ARCHETYPE: Archetype = Archetype {
    style: "classic",
    details: &["Regular fit"],
    industry_standard: "Professional standards suggest classic, versatile styling",
};

lazy_static! {
    static ref OCCUPATION_ARCHETYPES: HashMap<&'static str, Archetype> = {
        let mut m = HashMap::new();
        m.insert("lawyer", Archetype {
            style: "classic",
            details: &["Structured shoulders", "Peak lapels", "Conservative cut"],
            industry_standard: "Legal professionals prefer traditional, authoritative styling",
        });
        m.insert("banker", Archetype {
            style: "classic",
            details: &["Structured fit", "Conservative styling", "Peak or notch lapels"],
            industry_standard: "Banking industry standards call for traditional business attire",
        });
        m.insert("consultant", Archetype {
            style: "modern",
            details: &["Slim fit", "Contemporary cut", "Clean lines"],
            industry_standard: "Consulting professionals favor modern, polished looks",
        });
        m.insert("creative", Archetype {
            style: "modern",
            details: &["Slim or tailored fit", "Contemporary styling", "Fashion-forward details"],
            industry_standard: "Creative industries embrace modern, expressive styling",
        });
        m.insert("executive", Archetype {
            style: "classic",
            details: &["Tailored fit", "Premium construction", "Refined details"],
            industry_standard: "Executive presence calls for impeccable tailoring",
        });
        m
    };
}

/// A fit rule reads the request and adjusts the guidance in place
pub struct FitRule {
    pub name: &'static str,
    pub apply: fn(&RecommendationRequest, &mut FitGuidance, &mut SignalTrace),
}

/// Applied in order: occupation sets the baseline, age overrides the style last
pub const FIT_RULES: &[FitRule] = &[
    FitRule { name: "occupation", apply: occupation_rule },
    FitRule { name: "age", apply: age_rule },
];

fn baseline() -> FitGuidance {
    FitGuidance {
        style: DEFAULT_ARCHETYPE.style.to_string(),
        details: DEFAULT_ARCHETYPE.details.iter().map(|d| d.to_string()).collect(),
        industry_standard: Some(DEFAULT_ARCHETYPE.industry_standard.to_string()),
    }
}

fn occupation_rule(request: &RecommendationRequest, fit: &mut FitGuidance, trace: &mut SignalTrace) {
    let Some(occupation) = request.occupation() else {
        return;
    };
    let key = TextUtils::normalize_key(occupation);
    let archetype = OCCUPATION_ARCHETYPES.get(key.as_str()).unwrap_or(&DEFAULT_ARCHETYPE);

    fit.style = archetype.style.to_string();
    fit.details = archetype.details.iter().map(|d| d.to_string()).collect();
    fit.industry_standard = Some(archetype.industry_standard.to_string());
    trace.contribute(
        OCCUPATION_FIT_SIGNAL,
        format!(
            "{} - {} fit with {}",
            archetype.industry_standard,
            archetype.style,
            archetype.details[0].to_lowercase()
        ),
    );
}

fn age_rule(request: &RecommendationRequest, fit: &mut FitGuidance, trace: &mut SignalTrace) {
    let Some(age) = request.age else {
        return;
    };
    let (style, details): (&str, &[&str]) = match age {
        0..=24 => ("modern", &["Slim or modern fit", "Contemporary styling"]),
        25..=39 => ("modern", &["Tailored fit", "Clean lines"]),
        _ => ("classic", &["Classic fit", "Traditional styling"]),
    };
    fit.style = style.to_string();
    extend_unique(&mut fit.details, details.iter().copied());
    trace.contribute(AGE_FIT_SIGNAL, format!("At {}, a {} fit keeps the look current", age, style));
}

pub struct FitGuidanceBuilder;

impl FitGuidanceBuilder {
    pub fn build(request: &RecommendationRequest, trace: &mut SignalTrace) -> FitGuidance {
        let mut fit = baseline();
        for rule in FIT_RULES {
            (rule.apply)(request, &mut fit, trace);
        }
        fit
    }
}

#[async_trait]
impl PipelineStep for FitGuidanceBuilder {
    fn name(&self) -> &'static str {
        "fit"
    }

    async fn apply(
        &self,
        request: &RecommendationRequest,
        draft: &mut ContextDraft,
        trace: &mut SignalTrace,
    ) -> anyhow::Result<()> {
        draft.fit_guidance = Some(Self::build(request, trace));
        Ok(())
    }
}
