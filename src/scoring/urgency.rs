//! Urgency sub-score and urgent indicator scan.

use serde::{Deserialize, Serialize};

use crate::{nlp::ner::Entity, rules::Rules};

pub const URGENT_SYMPTOM_POINTS: f64 = 0.3;
pub const SEVERE_POINTS: f64 = 0.2;
pub const ACUTE_ONSET_POINTS: f64 = 0.15;

/// Indicator added once when any severe-pain pattern matches.
pub const SEVERE_PAIN_INDICATOR: &str = "Severe pain intensity reported";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    pub score: f64,
    pub indicators: Vec<String>,
}

/// Additive urgency score over entity keywords, clamped to `[0, 1]`.
///
/// Every keyword contained in an entity counts, so "seizures" scores for both
/// "seizure" and "seizures".
pub fn score_urgency(rules: &Rules, entities: &[Entity]) -> UrgencyAssessment {
    let tables = &rules.tables().urgency;
    let mut score = 0.0;
    let mut indicators = Vec::new();

    for entity in entities.iter().filter(|e| e.is_symptom()) {
        let lower = entity.text.to_lowercase();
        for keyword in &tables.high_urgency_symptoms {
            if lower.contains(keyword.as_str()) {
                score += URGENT_SYMPTOM_POINTS;
                indicators.push(format!("Urgent symptom: {}", entity.text));
            }
        }
    }
    for entity in entities.iter().filter(|e| e.is_severity()) {
        let lower = entity.text.to_lowercase();
        for keyword in &tables.severe_indicators {
            if lower.contains(keyword.as_str()) {
                score += SEVERE_POINTS;
                indicators.push(format!("High severity: {}", entity.text));
            }
        }
    }
    for entity in entities.iter().filter(|e| e.is_duration()) {
        let lower = entity.text.to_lowercase();
        if tables
            .acute_onset_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
        {
            score += ACUTE_ONSET_POINTS;
            indicators.push(format!("Acute onset: {}", entity.text));
        }
    }

    UrgencyAssessment {
        score: f64::min(score, 1.0).max(0.0),
        indicators,
    }
}

/// Urgent keywords found in the text or symptom list, plus at most one
/// severe-pain indicator.
pub fn urgent_indicators(rules: &Rules, text_lower: &str, symptoms: &[String]) -> Vec<String> {
    let haystack = format!("{text_lower} {}", symptoms.join(" "));
    let mut indicators: Vec<String> = rules
        .tables()
        .urgent_keywords
        .iter()
        .filter(|keyword| haystack.contains(keyword.as_str()))
        .map(|keyword| format!("Urgent indicator detected: {keyword}"))
        .collect();
    if rules
        .urgent_patterns()
        .iter()
        .any(|pattern| pattern.is_match(text_lower))
    {
        indicators.push(SEVERE_PAIN_INDICATOR.to_string());
    }
    indicators
}
