//! Supplementary clinical features reported alongside the recommendation.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{nlp::ner::Entity, rules::Rules};

static MEASUREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(mg|mcg|ml|cc|kg|lbs?|cm|mm|inch(?:es)?|degrees?|bpm|mmhg)\b",
    )
    .expect("valid regex")
});
static RATIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*(out of|/|of)\s*(\d+(?:\.\d+)?)\b").expect("valid regex")
});
static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b").expect("valid regex"));

/// Label used when nothing in a lexicon matches.
pub const UNKNOWN: &str = "unknown";
/// Symptom category used when no variation matches.
pub const OTHER: &str = "other";
/// Urgency of a symptom absent from the urgency table.
pub const DEFAULT_SYMPTOM_URGENCY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Quantity,
    PainScale,
}

/// Numeric value found in a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    pub text: String,
}

/// Coarse clinical picture derived from the note and its entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalProfile {
    pub symptom_categories: IndexMap<String, Vec<String>>,
    /// Urgency of each distinct symptom mention.
    pub symptom_urgency: IndexMap<String, f64>,
    pub severity_level: String,
    pub duration_type: String,
    pub frequency_type: String,
    pub red_flag_phrases: Vec<String>,
    pub measurements: Vec<Measurement>,
}

pub fn profile(rules: &Rules, entities: &[Entity], text: &str) -> ClinicalProfile {
    let mut symptom_categories: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut urgency = IndexMap::new();
    for entity in entities.iter().filter(|e| e.is_symptom()) {
        urgency
            .entry(entity.text.to_lowercase())
            .or_insert_with(|| symptom_urgency(rules, &entity.text));
        let members = symptom_categories
            .entry(symptom_category(rules, &entity.text))
            .or_default();
        if !members.contains(&entity.text) {
            members.push(entity.text.clone());
        }
    }
    let lexicon = &rules.tables().lexicon;
    ClinicalProfile {
        symptom_categories,
        symptom_urgency: urgency,
        severity_level: first_group(&lexicon.severity_levels, text).unwrap_or(UNKNOWN).to_string(),
        duration_type: first_group(&lexicon.duration_types, text).unwrap_or(UNKNOWN).to_string(),
        frequency_type: first_group(&lexicon.frequency_types, text)
            .unwrap_or(UNKNOWN)
            .to_string(),
        red_flag_phrases: red_flag_phrases(rules, text),
        measurements: measurements(text),
    }
}

/// Category of the first lexicon group with a variation contained in `symptom`.
pub fn symptom_category(rules: &Rules, symptom: &str) -> String {
    first_group(&rules.tables().lexicon.symptom_categories, symptom)
        .unwrap_or(OTHER)
        .to_string()
}

/// Urgency of a symptom: the first urgency key contained in it, else the entry
/// for its category, else `DEFAULT_SYMPTOM_URGENCY`.
pub fn symptom_urgency(rules: &Rules, symptom: &str) -> f64 {
    let table = &rules.tables().lexicon.symptom_urgency;
    let lower = symptom.to_lowercase();
    table
        .iter()
        .find(|(key, _)| lower.contains(key.as_str()))
        .map(|(_, score)| *score)
        .or_else(|| table.get(&symptom_category(rules, symptom)).copied())
        .unwrap_or(DEFAULT_SYMPTOM_URGENCY)
}

fn first_group<'a>(groups: &'a IndexMap<String, Vec<String>>, text: &str) -> Option<&'a str> {
    let lower = text.to_lowercase();
    groups
        .iter()
        .find(|(_, variations)| variations.iter().any(|v| lower.contains(v.as_str())))
        .map(|(name, _)| name.as_str())
}

/// Red-flag phrases and urgent patterns present in the note.
pub fn red_flag_phrases(rules: &Rules, text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let lexicon = &rules.tables().lexicon;
    let mut found: Vec<String> = lexicon
        .red_flag_phrases
        .iter()
        .filter(|phrase| lower.contains(phrase.to_lowercase().as_str()))
        .cloned()
        .collect();
    for (pattern, source) in rules
        .red_flag_patterns()
        .iter()
        .zip(&lexicon.red_flag_patterns)
    {
        if pattern.is_match(&lower) && !found.contains(source) {
            found.push(source.clone());
        }
    }
    found
}

/// Quantities with units and pain-scale ratings. Dates are skipped. A slash
/// ratio reads as a pain scale when the value does not exceed the scale
/// (`7/10`), otherwise as a quantity with a `/N` unit (`120/80`).
pub fn measurements(text: &str) -> Vec<Measurement> {
    let lower = text.to_lowercase();
    let dates: Vec<(usize, usize)> = DATE
        .find_iter(&lower)
        .map(|m| (m.start(), m.end()))
        .collect();
    let in_date = |start: usize, end: usize| dates.iter().any(|&(s, e)| start < e && end > s);

    let mut found = Vec::new();
    for caps in MEASUREMENT.captures_iter(&lower) {
        let Some(whole) = caps.get(0) else { continue };
        let Ok(value) = caps[1].parse::<f64>() else {
            continue;
        };
        if in_date(whole.start(), whole.end()) {
            continue;
        }
        found.push(Measurement {
            kind: MeasurementKind::Quantity,
            value,
            unit: Some(caps[2].to_string()),
            scale: None,
            text: whole.as_str().to_string(),
        });
    }
    for caps in RATIO.captures_iter(&lower) {
        let Some(whole) = caps.get(0) else { continue };
        let (Ok(value), Ok(scale)) = (caps[1].parse::<f64>(), caps[3].parse::<f64>()) else {
            continue;
        };
        if in_date(whole.start(), whole.end()) || scale == 0.0 {
            continue;
        }
        let measurement = if value <= scale {
            Measurement {
                kind: MeasurementKind::PainScale,
                value,
                unit: None,
                scale: Some(scale),
                text: whole.as_str().to_string(),
            }
        } else if &caps[2] == "/" {
            Measurement {
                kind: MeasurementKind::Quantity,
                value,
                unit: Some(format!("/{}", &caps[3])),
                scale: None,
                text: whole.as_str().to_string(),
            }
        } else {
            continue;
        };
        found.push(measurement);
    }
    found
}

/// Entity counts per label, in first-seen order.
pub fn entity_summary(entities: &[Entity]) -> IndexMap<String, usize> {
    let mut summary = IndexMap::new();
    for entity in entities {
        *summary.entry(entity.label.clone()).or_insert(0) += 1;
    }
    summary
}
