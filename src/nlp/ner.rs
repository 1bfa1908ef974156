//! Medical entity recognition: pluggable tagger plus rule-table patterns.

use std::{collections::HashSet, sync::Arc};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::rules::Rules;

/// Well-known entity labels. Labels stay plain strings because rule tables and
/// taggers may introduce their own.
pub mod labels {
    pub const SYMPTOM: &str = "SYMPTOM";
    pub const SYMPTOMS: &str = "SYMPTOMS";
    pub const DURATION: &str = "DURATION";
    pub const SEVERITY: &str = "SEVERITY";
    pub const FREQUENCY: &str = "FREQUENCY";
    pub const TEST: &str = "TEST";
    pub const ANATOMY: &str = "ANATOMY";
}

/// Confidence assigned to tagger spans.
pub const TAGGER_CONFIDENCE: f64 = 0.8;
/// Confidence assigned to rule-table matches.
pub const RULE_CONFIDENCE: f64 = 0.6;

fn caller_confidence() -> f64 {
    1.0
}

/// Tagged span with byte offsets relative to the text it was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default = "caller_confidence")]
    pub confidence: f64,
}

impl Entity {
    /// Build an entity with a label and no span, as supplied by callers of `recommend`.
    pub fn labelled(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start: 0,
            end: 0,
            confidence: caller_confidence(),
        }
    }

    pub fn is_symptom(&self) -> bool {
        self.label == labels::SYMPTOM || self.label == labels::SYMPTOMS
    }

    pub fn is_duration(&self) -> bool {
        self.label == labels::DURATION
    }

    pub fn is_severity(&self) -> bool {
        self.label == labels::SEVERITY
    }

    /// Span midpoint in characters of `text`, the text the offsets refer to.
    /// Offsets that do not fall on a character boundary of `text` (e.g.
    /// caller-supplied entities) are taken as they are.
    pub fn char_midpoint(&self, text: &str) -> f64 {
        (char_position(text, self.start) + char_position(text, self.end)) as f64 / 2.0
    }
}

fn char_position(text: &str, byte: usize) -> usize {
    text.get(..byte)
        .map_or(byte, |prefix| prefix.chars().count())
}

/// Span reported by an external tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Pluggable named-entity tagger. Implementations must be safe to call from
/// several threads at once.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>>;
}

/// Tagger that never finds anything; recognition falls back to rule tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTagger;

impl Tagger for NullTagger {
    fn tag(&self, _text: &str) -> Result<Vec<TaggedSpan>> {
        Ok(Vec::new())
    }
}

/// Merges tagger output with rule-table matches into a deduplicated entity list.
#[derive(Clone)]
pub struct Recognizer {
    rules: Arc<Rules>,
    tagger: Option<Arc<dyn Tagger>>,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("tagger", &self.tagger.is_some())
            .finish()
    }
}

impl Recognizer {
    pub fn new(rules: Arc<Rules>, tagger: Option<Arc<dyn Tagger>>) -> Self {
        Self { rules, tagger }
    }

    /// Extract entities: tagger spans first, then rule matches, deduplicated on
    /// `(lowercased text, label)` keeping the first occurrence.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = self.extract_with_tagger(text);
        let tagged = entities.len();
        entities.extend(self.extract_with_rules(text));
        let merged = deduplicate(entities);
        debug!(tagged, total = merged.len(), "extracted entities");
        merged
    }

    fn extract_with_tagger(&self, text: &str) -> Vec<Entity> {
        let Some(tagger) = &self.tagger else {
            return Vec::new();
        };
        match tagger.tag(text) {
            Ok(spans) => spans
                .into_iter()
                .filter_map(|span| {
                    if span.start >= span.end || span.end > text.len() {
                        debug!(?span, "dropping tagger span with invalid offsets");
                        return None;
                    }
                    Some(Entity {
                        text: span.text,
                        label: span.label,
                        start: span.start,
                        end: span.end,
                        confidence: TAGGER_CONFIDENCE,
                    })
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "tagger failed; continuing with rule-based entities");
                Vec::new()
            }
        }
    }

    fn extract_with_rules(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for category in self.rules.categories() {
            for pattern in &category.patterns {
                for m in pattern.find_iter(text) {
                    if m.start() == m.end() {
                        continue;
                    }
                    entities.push(Entity {
                        text: m.as_str().to_string(),
                        label: category.label.clone(),
                        start: m.start(),
                        end: m.end(),
                        confidence: RULE_CONFIDENCE,
                    });
                }
            }
        }
        entities
    }
}

/// First occurrence wins; confidences are not re-averaged.
pub fn deduplicate(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|entity| seen.insert((entity.text.to_lowercase(), entity.label.clone())))
        .collect()
}
