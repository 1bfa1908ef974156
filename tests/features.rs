use mri_advisor::{
    nlp::features::{
        entity_summary, measurements, red_flag_phrases, symptom_category, symptom_urgency,
        MeasurementKind, DEFAULT_SYMPTOM_URGENCY, OTHER, UNKNOWN,
    },
    nlp::ner::Entity,
    rules::{RuleSet, Rules},
    Pipeline,
};

fn rules() -> Rules {
    Rules::builtin().expect("builtin rules")
}

#[test]
fn quantities_and_pain_scales_are_read() {
    let found = measurements("took 500 mg, temp 38.5 degrees, pain 7/10 and 8 out of 10");
    assert_eq!(found.len(), 4);

    assert_eq!(found[0].kind, MeasurementKind::Quantity);
    assert_eq!(found[0].value, 500.0);
    assert_eq!(found[0].unit.as_deref(), Some("mg"));
    assert_eq!(found[1].value, 38.5);
    assert_eq!(found[1].unit.as_deref(), Some("degrees"));

    assert_eq!(found[2].kind, MeasurementKind::PainScale);
    assert_eq!((found[2].value, found[2].scale), (7.0, Some(10.0)));
    assert_eq!(found[3].text, "8 out of 10");
    assert_eq!(found[3].scale, Some(10.0));
}

#[test]
fn dates_and_bare_words_are_not_measurements() {
    let found = measurements("seen on 1/2/2024, bp 120/80, pain 3 in the morning");
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].kind, MeasurementKind::Quantity);
    assert_eq!(found[0].value, 120.0);
    assert_eq!(found[0].unit.as_deref(), Some("/80"));
}

#[test]
fn symptoms_map_to_lexicon_categories() {
    let rules = rules();
    assert_eq!(symptom_category(&rules, "Throbbing migraine"), "headache");
    assert_eq!(symptom_category(&rules, "blurred vision"), "vision_problems");
    assert_eq!(symptom_category(&rules, "tinnitus"), OTHER);
}

#[test]
fn symptom_urgency_prefers_phrases_then_categories() {
    let rules = rules();
    assert_eq!(symptom_urgency(&rules, "severe headache episodes"), 0.9);
    assert_eq!(symptom_urgency(&rules, "numb left hand"), 0.6);
    assert_eq!(symptom_urgency(&rules, "tinnitus"), DEFAULT_SYMPTOM_URGENCY);
}

#[test]
fn profile_reports_severity_duration_and_frequency() {
    let pipeline = Pipeline::builtin().unwrap();
    let profile = pipeline.analyze("mild occasional fatigue").profile;
    assert_eq!(profile.severity_level, "mild");
    assert_eq!(profile.duration_type, "intermittent");
    assert_eq!(profile.frequency_type, UNKNOWN);
    assert_eq!(profile.symptom_categories["weakness"], vec!["fatigue".to_string()]);
    assert_eq!(profile.symptom_urgency["fatigue"], 0.7);

    let daily = pipeline.analyze("headaches every day for 2 weeks").profile;
    assert_eq!(daily.frequency_type, "daily");
}

#[test]
fn profile_falls_back_to_unknown() {
    let pipeline = Pipeline::builtin().unwrap();
    let profile = pipeline.analyze("patient reports tinnitus").profile;
    assert_eq!(profile.severity_level, UNKNOWN);
    assert_eq!(profile.duration_type, UNKNOWN);
    assert_eq!(profile.frequency_type, UNKNOWN);
    assert!(profile.symptom_categories.is_empty());
    assert!(profile.red_flag_phrases.is_empty());
}

#[test]
fn red_flags_combine_phrases_and_patterns() {
    let rules = rules();
    let found = red_flag_phrases(&rules, "Sudden severe headache, worst headache of my life");
    assert_eq!(
        found,
        vec![
            "sudden severe headache".to_string(),
            "worst headache.*life".to_string(),
            "sudden.*severe.*headache".to_string(),
        ]
    );
}

#[test]
fn red_flag_listed_as_phrase_and_pattern_is_reported_once() {
    let mut tables = RuleSet::default();
    tables.lexicon.red_flag_patterns = vec!["status epilepticus".to_string()];
    let rules = Rules::compile(tables).unwrap();
    let found = red_flag_phrases(&rules, "history of status epilepticus");
    assert_eq!(found, vec!["status epilepticus".to_string()]);
}

#[test]
fn entity_summary_counts_labels_in_first_seen_order() {
    let entities = vec![
        Entity::labelled("severe", "SEVERITY"),
        Entity::labelled("headache", "SYMPTOM"),
        Entity::labelled("mild", "SEVERITY"),
    ];
    let summary = entity_summary(&entities);
    let counts: Vec<(&str, usize)> = summary.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(counts, [("SEVERITY", 2), ("SYMPTOM", 1)]);
}
