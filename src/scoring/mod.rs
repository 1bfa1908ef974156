//! MRI recommendation engine.

pub mod tier;
pub mod urgency;
pub mod weights;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{nlp::ner::Entity, rules::Rules};

/// Score returned when the analysis could not be completed.
pub const FALLBACK_SCORE: f64 = 0.3;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },
}

/// Explainable recommendation for one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation_score: f64,
    pub reasons: Vec<String>,
    pub urgent_indicators: Vec<String>,
    pub symptom_count: usize,
    pub severity_mentioned: bool,
    pub duration_mentioned: bool,
    pub red_flags_detected: bool,
    /// Set when this is the cautious fallback rather than a completed analysis.
    #[serde(default)]
    pub degraded: bool,
}

impl Recommendation {
    /// Fallback result: visible, moderate, and flagged as degraded.
    pub fn fallback(error: &ScoringError) -> Self {
        Self {
            recommendation_score: FALLBACK_SCORE,
            reasons: vec![
                format!("Error in analysis: {error}"),
                "Consider medical consultation".to_string(),
            ],
            urgent_indicators: Vec::new(),
            symptom_count: 0,
            severity_mentioned: false,
            duration_mentioned: false,
            red_flags_detected: false,
            degraded: true,
        }
    }

    pub fn tier(&self) -> tier::RecommendationTier {
        tier::RecommendationTier::from_score(self.recommendation_score)
    }
}

/// Stateless scorer over a shared rule set.
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: Arc<Rules>,
}

impl Recommender {
    pub fn new(rules: Arc<Rules>) -> Self {
        Self { rules }
    }

    /// Score entities against the rule tables. Never fails: internal errors
    /// yield `Recommendation::fallback`.
    pub fn recommend(&self, entities: &[Entity], text: &str) -> Recommendation {
        match self.try_recommend(entities, text) {
            Ok(recommendation) => recommendation,
            Err(err) => {
                warn!(error = %err, "recommendation degraded to fallback");
                Recommendation::fallback(&err)
            }
        }
    }

    pub fn try_recommend(
        &self,
        entities: &[Entity],
        text: &str,
    ) -> Result<Recommendation, ScoringError> {
        let tables = self.rules.tables();
        let symptoms = entity_texts(entities, Entity::is_symptom);
        let durations = entity_texts(entities, Entity::is_duration);
        let severities = entity_texts(entities, Entity::is_severity);
        let text_lower = text.to_lowercase();

        let symptom_score = finite(
            "symptom score",
            weights::symptom_score(&symptoms, &tables.symptom_weights),
        )?;
        let duration_modifier = finite(
            "duration modifier",
            weights::weight_modifier(&durations, &text_lower, &tables.duration_weights),
        )?;
        let severity_modifier = finite(
            "severity modifier",
            weights::weight_modifier(&severities, &text_lower, &tables.severity_weights),
        )?;
        let red_flag_score =
            weights::red_flag_score(&tables.red_flag_combinations, &symptoms, &text_lower);

        let base = (symptom_score * (1.0 + duration_modifier + severity_modifier)).max(0.0);
        let score = finite("final score", (base + red_flag_score).min(1.0))?;
        let red_flags_detected = red_flag_score > 0.0;

        debug!(
            symptom_score,
            duration_modifier,
            severity_modifier,
            red_flag_score,
            score,
            "scored note"
        );

        let mut urgent_indicators = urgency::urgent_indicators(&self.rules, &text_lower, &symptoms);
        for indicator in urgency::score_urgency(&self.rules, entities).indicators {
            if !urgent_indicators.contains(&indicator) {
                urgent_indicators.push(indicator);
            }
        }

        Ok(Recommendation {
            recommendation_score: score,
            reasons: self.reasons(&symptoms, &durations, &severities, red_flags_detected),
            urgent_indicators,
            symptom_count: symptoms.len(),
            severity_mentioned: !severities.is_empty(),
            duration_mentioned: !durations.is_empty(),
            red_flags_detected,
            degraded: false,
        })
    }

    fn reasons(
        &self,
        symptoms: &[String],
        durations: &[String],
        severities: &[String],
        red_flags: bool,
    ) -> Vec<String> {
        let weights = &self.rules.tables().symptom_weights;
        let mut reasons = Vec::new();

        if !symptoms.is_empty() {
            let preview: Vec<&str> = symptoms.iter().take(3).map(String::as_str).collect();
            reasons.push(format!(
                "Detected {} neurological symptom(s): {}",
                symptoms.len(),
                preview.join(", ")
            ));
            let high_risk: Vec<&str> = symptoms
                .iter()
                .filter(|s| weights.get(s.as_str()).is_some_and(|w| *w > 0.7))
                .map(String::as_str)
                .collect();
            if !high_risk.is_empty() {
                reasons.push(format!("High-risk symptoms identified: {}", high_risk.join(", ")));
            }
        }
        if !severities.is_empty() {
            reasons.push(format!("Severity indicators mentioned: {}", severities.join(", ")));
        }
        if !durations.is_empty() {
            reasons.push(format!("Duration information provided: {}", durations.join(", ")));
        }
        if red_flags {
            reasons.push("Red flag symptom combinations detected".to_string());
        }
        if symptoms.is_empty() {
            reasons.push("No specific neurological symptoms clearly identified".to_string());
            reasons.push("Consider more detailed symptom assessment".to_string());
        }
        if symptoms.len() >= 3 {
            reasons.push("Multiple symptoms warrant investigation".to_string());
        }
        reasons
    }
}

fn entity_texts(entities: &[Entity], keep: fn(&Entity) -> bool) -> Vec<String> {
    entities
        .iter()
        .filter(|e| keep(e))
        .map(|e| e.text.to_lowercase())
        .collect()
}

fn finite(stage: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFinite { stage })
    }
}
