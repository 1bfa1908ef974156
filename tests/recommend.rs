use std::sync::Arc;

use mri_advisor::{
    nlp::ner::Entity,
    rules::Rules,
    scoring::{
        tier::RecommendationTier,
        urgency::{score_urgency, SEVERE_PAIN_INDICATOR},
        weights, Recommendation, Recommender, ScoringError, FALLBACK_SCORE,
    },
    Pipeline,
};

fn recommender() -> (Arc<Rules>, Recommender) {
    let rules = Arc::new(Rules::builtin().expect("builtin rules"));
    (rules.clone(), Recommender::new(rules))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn sudden_severe_headache_with_confusion_is_strongly_recommended() {
    let (_, recommender) = recommender();
    let entities = vec![
        Entity::labelled("headache", "SYMPTOM"),
        Entity::labelled("confusion", "SYMPTOM"),
        Entity::labelled("severe", "SEVERITY"),
        Entity::labelled("sudden", "DURATION"),
    ];
    let rec = recommender.recommend(&entities, "sudden severe headache with confusion");

    assert!(approx(rec.recommendation_score, 1.0));
    assert!(rec.red_flags_detected);
    assert!(!rec.degraded);
    assert_eq!(rec.symptom_count, 2);
    assert!(rec.severity_mentioned && rec.duration_mentioned);
    assert!(rec
        .urgent_indicators
        .contains(&"Urgent indicator detected: confusion".to_string()));
    assert!(rec
        .reasons
        .contains(&"Red flag symptom combinations detected".to_string()));
    assert!(rec
        .reasons
        .contains(&"High-risk symptoms identified: confusion".to_string()));
    assert_eq!(rec.tier(), RecommendationTier::StronglyRecommended);
}

#[test]
fn mild_occasional_fatigue_stays_low() {
    let pipeline = Pipeline::builtin().unwrap();
    let analysis = pipeline.analyze("mild occasional fatigue");
    let rec = &analysis.recommendation;

    assert!(approx(rec.recommendation_score, 0.14), "{}", rec.recommendation_score);
    assert!(!rec.red_flags_detected);
    assert!(rec.urgent_indicators.is_empty());
    assert_eq!(rec.reasons[0], "Detected 1 neurological symptom(s): fatigue");
    assert_eq!(analysis.tier, RecommendationTier::NotImmediatelyNecessary);
}

#[test]
fn empty_input_yields_zero_with_guidance() {
    let (_, recommender) = recommender();
    let rec = recommender.recommend(&[], "");
    assert_eq!(rec.recommendation_score, 0.0);
    assert_eq!(rec.symptom_count, 0);
    assert_eq!(
        rec.reasons,
        vec![
            "No specific neurological symptoms clearly identified".to_string(),
            "Consider more detailed symptom assessment".to_string(),
        ]
    );
    assert!(!rec.degraded);
}

#[test]
fn recommendation_is_deterministic() {
    let pipeline = Pipeline::builtin().unwrap();
    let note = "Pt c/o worst headache of my life, pain 10/10, with blurred vision and vomiting";
    assert_eq!(pipeline.analyze(note), pipeline.analyze(note));
}

#[test]
fn partial_symptom_match_uses_reduced_weight() {
    let (rules, recommender) = recommender();
    let table = &rules.tables().symptom_weights;
    assert_eq!(weights::symptom_weight("throbbing headache", table), Some(0.6 * 0.8));
    assert_eq!(weights::symptom_weight("tinnitus", table), None);

    let rec = recommender.recommend(&[Entity::labelled("throbbing headache", "SYMPTOM")], "");
    assert!(approx(rec.recommendation_score, 0.48));
}

#[test]
fn multiple_matches_earn_a_bonus() {
    let (rules, _) = recommender();
    let table = &rules.tables().symptom_weights;
    let two = ["nausea".to_string(), "vomiting".to_string()];
    assert!(approx(weights::symptom_score(&two, table), 0.35 * 1.1));
    let three = ["nausea".to_string(), "vomiting".to_string(), "dizziness".to_string()];
    assert!(approx(weights::symptom_score(&three, table), 0.4 * 1.2));
}

#[test]
fn modifiers_follow_the_strongest_matching_keyword() {
    let (rules, _) = recommender();
    let tables = rules.tables();
    let sudden = ["sudden".to_string()];
    assert!(approx(weights::weight_modifier(&sudden, "", &tables.duration_weights), 0.4));
    let mild = ["mild".to_string()];
    assert!(approx(weights::weight_modifier(&mild, "", &tables.severity_weights), -0.3));
    assert_eq!(weights::weight_modifier(&[], "severe", &tables.severity_weights), 0.0);
}

#[test]
fn red_flag_contribution_is_capped() {
    let (rules, _) = recommender();
    let symptoms: Vec<String> = ["headache", "confusion", "seizure", "weakness"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let score = weights::red_flag_score(&rules.tables().red_flag_combinations, &symptoms, "");
    assert_eq!(score, weights::RED_FLAG_CAP);
}

#[test]
fn severe_pain_indicator_is_reported_once() {
    let (_, recommender) = recommender();
    let text = "pain 10 out of 10, worst headache of my life";
    let rec = recommender.recommend(&[Entity::labelled("headache", "SYMPTOM")], text);
    let hits = rec
        .urgent_indicators
        .iter()
        .filter(|i| i.as_str() == SEVERE_PAIN_INDICATOR)
        .count();
    assert_eq!(hits, 1);
    assert!(rec
        .urgent_indicators
        .contains(&"Urgent indicator detected: worst headache".to_string()));
}

#[test]
fn many_symptoms_are_called_out() {
    let (_, recommender) = recommender();
    let entities: Vec<Entity> = ["nausea", "dizziness", "fatigue"]
        .iter()
        .map(|s| Entity::labelled(*s, "SYMPTOMS"))
        .collect();
    let rec = recommender.recommend(&entities, "");
    assert!(rec
        .reasons
        .contains(&"Multiple symptoms warrant investigation".to_string()));
}

#[test]
fn urgency_counts_each_matching_keyword() {
    let (rules, _) = recommender();
    let entities = vec![
        Entity::labelled("seizures", "SYMPTOM"),
        Entity::labelled("severe", "SEVERITY"),
        Entity::labelled("sudden", "DURATION"),
    ];
    let urgency = score_urgency(&rules, &entities);
    assert!(approx(urgency.score, 0.95));
    assert_eq!(urgency.indicators.len(), 4);
    assert_eq!(urgency.indicators[3], "Acute onset: sudden");

    let mut more = entities.clone();
    more.push(Entity::labelled("confusion", "SYMPTOM"));
    assert_eq!(score_urgency(&rules, &more).score, 1.0);
}

#[test]
fn tiers_follow_score_bands() {
    assert_eq!(RecommendationTier::from_score(0.8), RecommendationTier::StronglyRecommended);
    assert_eq!(RecommendationTier::from_score(0.79), RecommendationTier::Recommended);
    assert_eq!(RecommendationTier::from_score(0.6), RecommendationTier::Recommended);
    assert_eq!(RecommendationTier::from_score(0.4), RecommendationTier::MayBeBeneficial);
    assert_eq!(RecommendationTier::from_score(0.39), RecommendationTier::NotImmediatelyNecessary);
}

#[test]
fn fallback_is_moderate_and_flagged() {
    let rec = Recommendation::fallback(&ScoringError::NonFinite { stage: "final score" });
    assert_eq!(rec.recommendation_score, FALLBACK_SCORE);
    assert!(rec.degraded);
    assert_eq!(rec.reasons[0], "Error in analysis: final score produced a non-finite value");
    assert_eq!(rec.reasons[1], "Consider medical consultation");
    assert_eq!(rec.tier(), RecommendationTier::NotImmediatelyNecessary);
}
