//! Dictionary-backed tagger built from the ruler phrase table.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    nlp::ner::{TaggedSpan, Tagger},
    rules::Rules,
};

/// Phrase tagger that keeps the longest non-overlapping matches, earliest first.
#[derive(Debug, Clone)]
pub struct DictionaryTagger {
    rules: Arc<Rules>,
}

impl DictionaryTagger {
    pub fn new(rules: Arc<Rules>) -> Self {
        Self { rules }
    }
}

impl Tagger for DictionaryTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let mut candidates = Vec::new();
        for phrase in self.rules.ruler() {
            for m in phrase.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                candidates.push(TaggedSpan {
                    text: m.as_str().to_string(),
                    label: phrase.label.clone(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        Ok(filter_spans(candidates))
    }
}

fn filter_spans(mut candidates: Vec<TaggedSpan>) -> Vec<TaggedSpan> {
    candidates.sort_by(|a, b| {
        (b.end - b.start)
            .cmp(&(a.end - a.start))
            .then(a.start.cmp(&b.start))
    });
    let mut kept: Vec<TaggedSpan> = Vec::new();
    for span in candidates {
        if kept
            .iter()
            .all(|other| span.end <= other.start || span.start >= other.end)
        {
            kept.push(span);
        }
    }
    kept.sort_by_key(|span| span.start);
    kept
}
