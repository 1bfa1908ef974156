use mri_advisor::{
    nlp::{
        ner::Entity,
        relations::{analyze, RelationKind},
    },
    Pipeline,
};

fn entity(text: &str, label: &str, start: usize, confidence: f64) -> Entity {
    Entity {
        text: text.to_string(),
        label: label.to_string(),
        start,
        end: start + text.len(),
        confidence,
    }
}

#[test]
fn pairs_symptom_with_nearby_duration_and_severity() {
    let entities = vec![
        entity("severe", "SEVERITY", 0, 0.8),
        entity("headache", "SYMPTOM", 7, 0.8),
        entity("3 days", "DURATION", 20, 0.6),
    ];
    let relationships = analyze(&entities, "severe headache for 3 days");
    assert_eq!(relationships.len(), 2);
    assert_eq!(relationships[0].kind, RelationKind::SymptomDuration);
    assert_eq!(relationships[0].entities[1].text, "3 days");
    assert_eq!(relationships[0].confidence, 0.6);
    assert_eq!(relationships[1].kind, RelationKind::SymptomSeverity);
    assert_eq!(relationships[1].confidence, 0.8);
}

#[test]
fn distant_duration_is_not_related_even_when_closest() {
    let entities = vec![
        entity("headache", "SYMPTOM", 0, 0.8),
        entity("2 weeks", "DURATION", 150, 0.8),
    ];
    assert!(analyze(&entities, "").is_empty());
}

#[test]
fn ties_keep_the_first_candidate() {
    let entities = vec![
        entity("confusion", "SYMPTOMS", 20, 0.6),
        entity("acute", "DURATION", 10, 0.6),
        entity("acute", "DURATION", 34, 0.6),
    ];
    let relationships = analyze(&entities, "");
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].entities[1].start, 10);
}

#[test]
fn relationship_serialises_with_type_tag() {
    let entities = vec![
        entity("nausea", "SYMPTOM", 0, 0.8),
        entity("mild", "SEVERITY", 10, 0.8),
    ];
    let json = serde_json::to_value(&analyze(&entities, "")[0]).unwrap();
    assert_eq!(json["type"], "symptom_severity");
}

#[test]
fn distance_is_counted_in_characters_not_bytes() {
    // 70 two-byte letters: 83 characters apart, 153 bytes apart.
    let text = format!("headache {} for 3 days", "é".repeat(70));
    let start = text.find("3 days").unwrap();
    let entities = vec![
        entity("headache", "SYMPTOM", 0, 0.8),
        entity("3 days", "DURATION", start, 0.8),
    ];
    let relationships = analyze(&entities, &text);
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].kind, RelationKind::SymptomDuration);
}

#[test]
fn accented_notes_keep_their_relationships() {
    let pipeline = Pipeline::builtin().unwrap();
    let note = pipeline.normalize(&format!("headache {} for 3 days", "é".repeat(70)));
    let entities = pipeline.extract_entities(&note);
    let relationships = pipeline.relationships(&entities, &note);
    assert!(relationships.iter().any(|r| {
        r.kind == RelationKind::SymptomDuration
            && r.entities[0].text == "headache"
            && r.entities[1].text.contains("3 days")
    }));
}

#[test]
fn wide_characters_still_count_towards_the_cutoff() {
    let text = format!("headache {} for 3 days", "é".repeat(120));
    let start = text.find("3 days").unwrap();
    let entities = vec![
        entity("headache", "SYMPTOM", 0, 0.8),
        entity("3 days", "DURATION", start, 0.8),
    ];
    assert!(analyze(&entities, &text).is_empty());
}
