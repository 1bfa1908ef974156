//! Proximity-based symptom relationships for reporting.

use serde::{Deserialize, Serialize};

use crate::nlp::ner::Entity;

/// Maximum midpoint distance (in characters) for two entities to be related.
pub const MAX_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    SymptomDuration,
    SymptomSeverity,
}

/// A symptom paired with the duration or severity mention nearest to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub entities: [Entity; 2],
    pub confidence: f64,
}

/// Link each symptom to its nearest duration and severity entity. `text` is
/// the text the entity offsets were taken from; distances are counted in its
/// characters.
pub fn analyze(entities: &[Entity], text: &str) -> Vec<Relationship> {
    let symptoms: Vec<&Entity> = entities.iter().filter(|e| e.is_symptom()).collect();
    let durations: Vec<&Entity> = entities.iter().filter(|e| e.is_duration()).collect();
    let severities: Vec<&Entity> = entities.iter().filter(|e| e.is_severity()).collect();

    let mut relationships = Vec::new();
    for symptom in symptoms {
        if let Some(duration) = closest(symptom, &durations, text) {
            relationships.push(relate(RelationKind::SymptomDuration, symptom, duration));
        }
        if let Some(severity) = closest(symptom, &severities, text) {
            relationships.push(relate(RelationKind::SymptomSeverity, symptom, severity));
        }
    }
    relationships
}

/// Nearest candidate by midpoint; ties keep the earliest. `None` past `MAX_DISTANCE`.
pub fn closest<'a>(
    target: &Entity,
    candidates: &[&'a Entity],
    text: &str,
) -> Option<&'a Entity> {
    let anchor = target.char_midpoint(text);
    let mut best: Option<(&'a Entity, f64)> = None;
    for &candidate in candidates {
        let distance = (anchor - candidate.char_midpoint(text)).abs();
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((candidate, distance));
        }
    }
    best.filter(|(_, distance)| *distance < MAX_DISTANCE)
        .map(|(entity, _)| entity)
}

fn relate(kind: RelationKind, symptom: &Entity, other: &Entity) -> Relationship {
    Relationship {
        kind,
        entities: [symptom.clone(), other.clone()],
        confidence: symptom.confidence.min(other.confidence),
    }
}
