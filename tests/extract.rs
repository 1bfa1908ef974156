use std::{collections::HashSet, sync::Arc};

use anyhow::anyhow;
use mri_advisor::{
    nlp::ner::{
        labels, Entity, NullTagger, Recognizer, TaggedSpan, Tagger, RULE_CONFIDENCE,
        TAGGER_CONFIDENCE,
    },
    rules::Rules,
    Pipeline,
};

struct FailingTagger;

impl Tagger for FailingTagger {
    fn tag(&self, _text: &str) -> anyhow::Result<Vec<TaggedSpan>> {
        Err(anyhow!("model unavailable"))
    }
}

struct SloppyTagger;

impl Tagger for SloppyTagger {
    fn tag(&self, text: &str) -> anyhow::Result<Vec<TaggedSpan>> {
        Ok(vec![
            TaggedSpan {
                text: "Headache".into(),
                label: "SYMPTOM".into(),
                start: 0,
                end: 8,
            },
            TaggedSpan {
                text: "ghost".into(),
                label: "SYMPTOM".into(),
                start: 4,
                end: text.len() + 10,
            },
            TaggedSpan {
                text: String::new(),
                label: "SYMPTOM".into(),
                start: 3,
                end: 3,
            },
        ])
    }
}

fn rules() -> Arc<Rules> {
    Arc::new(Rules::builtin().expect("builtin rules"))
}

fn find<'a>(entities: &'a [Entity], text: &str, label: &str) -> Option<&'a Entity> {
    entities
        .iter()
        .find(|e| e.text.eq_ignore_ascii_case(text) && e.label == label)
}

#[test]
fn tagger_entities_take_priority_over_rule_duplicates() {
    let pipeline = Pipeline::builtin().unwrap();
    let text = "sudden severe headache with confusion";
    let entities = pipeline.extract_entities(text);

    let severe = find(&entities, "severe", labels::SEVERITY).expect("severity found");
    assert_eq!(severe.confidence, TAGGER_CONFIDENCE);
    assert!(find(&entities, "headache", labels::SYMPTOM).is_some());
    assert!(find(&entities, "confusion", labels::SYMPTOM).is_some());
    let sudden = find(&entities, "sudden", labels::DURATION).expect("duration found");
    assert_eq!(sudden.confidence, RULE_CONFIDENCE);
    assert!(find(&entities, "headache", labels::SYMPTOMS).is_some());
}

#[test]
fn offsets_point_back_into_the_source_text() {
    let pipeline = Pipeline::builtin().unwrap();
    let text = "patient has had headaches for 3 weeks, now with blurred vision and mild nausea daily";
    for entity in pipeline.extract_entities(text) {
        assert!(entity.start < entity.end && entity.end <= text.len());
        assert_eq!(&text[entity.start..entity.end], entity.text);
    }
}

#[test]
fn numeric_durations_prefer_the_longest_phrase() {
    let pipeline = Pipeline::builtin().unwrap();
    let entities = pipeline.extract_entities("headaches for 3 weeks");
    let tagged = find(&entities, "3 weeks", labels::DURATION).expect("tagged duration");
    assert_eq!(tagged.confidence, TAGGER_CONFIDENCE);
    assert!(find(&entities, "for 3", labels::DURATION).is_none());
    assert!(find(&entities, "for 3 weeks", labels::DURATION).is_some());
}

#[test]
fn no_duplicate_text_label_pairs() {
    let pipeline = Pipeline::builtin().unwrap();
    let entities = pipeline.extract_entities("Headache, headache and HEADACHE with severe severe pain");
    let mut seen = HashSet::new();
    for entity in &entities {
        assert!(seen.insert((entity.text.to_lowercase(), entity.label.clone())));
    }
}

#[test]
fn failing_tagger_falls_back_to_rules() {
    let failing: Arc<dyn Tagger> = Arc::new(FailingTagger);
    let recognizer = Recognizer::new(rules(), Some(failing));
    let entities = recognizer.extract("severe headache");
    let headache = find(&entities, "headache", labels::SYMPTOMS).expect("rule entity");
    assert_eq!(headache.confidence, RULE_CONFIDENCE);
    assert!(entities.iter().all(|e| e.confidence == RULE_CONFIDENCE));
}

#[test]
fn invalid_tagger_spans_are_dropped() {
    let sloppy: Arc<dyn Tagger> = Arc::new(SloppyTagger);
    let recognizer = Recognizer::new(rules(), Some(sloppy));
    let entities = recognizer.extract("headache since monday");
    assert!(find(&entities, "ghost", labels::SYMPTOM).is_none());
    assert!(entities.iter().all(|e| !e.text.is_empty()));
    let tagged = find(&entities, "headache", labels::SYMPTOM).expect("valid span kept");
    assert_eq!(tagged.text, "Headache");
}

#[test]
fn works_without_any_tagger() {
    let null: Arc<dyn Tagger> = Arc::new(NullTagger);
    for tagger in [None, Some(null)] {
        let recognizer = Recognizer::new(rules(), tagger);
        let entities = recognizer.extract("intermittent dizziness");
        assert!(find(&entities, "dizziness", labels::SYMPTOMS).is_some());
        assert!(find(&entities, "intermittent", labels::DURATION).is_some());
        assert!(find(&entities, "intermittent", labels::SEVERITY).is_some());
    }
}
