//! Weight-table arithmetic behind the recommendation score.

use indexmap::IndexMap;

/// Share of a table weight granted to a partial (substring) symptom match.
pub const PARTIAL_MATCH_FACTOR: f64 = 0.8;
/// Points added per fully present red-flag combination.
pub const RED_FLAG_POINTS: f64 = 0.3;
/// Ceiling on the total red-flag contribution.
pub const RED_FLAG_CAP: f64 = 0.5;

/// Weight for one symptom: exact table hit, else 80% of the first key that
/// contains or is contained in the symptom.
pub fn symptom_weight(symptom: &str, weights: &IndexMap<String, f64>) -> Option<f64> {
    if let Some(weight) = weights.get(symptom) {
        return Some(*weight);
    }
    weights
        .iter()
        .find(|(key, _)| symptom.contains(key.as_str()) || key.contains(symptom))
        .map(|(_, weight)| weight * PARTIAL_MATCH_FACTOR)
}

/// Average weight over matched symptoms with a bonus for several matches, capped at 1.
pub fn symptom_score(symptoms: &[String], weights: &IndexMap<String, f64>) -> f64 {
    let matched: Vec<f64> = symptoms
        .iter()
        .filter_map(|symptom| symptom_weight(symptom, weights))
        .collect();
    if matched.is_empty() {
        return 0.0;
    }
    let mut average = matched.iter().sum::<f64>() / matched.len() as f64;
    if matched.len() > 2 {
        average *= 1.2;
    } else if matched.len() > 1 {
        average *= 1.1;
    }
    average.min(1.0)
}

/// Largest `weight - 0.5` over table keys found in any mention or the whole
/// text. Zero when there are no mentions or nothing matches.
pub fn weight_modifier(
    mentions: &[String],
    text_lower: &str,
    weights: &IndexMap<String, f64>,
) -> f64 {
    if mentions.is_empty() {
        return 0.0;
    }
    let mut modifier: Option<f64> = None;
    for mention in mentions {
        for (key, weight) in weights {
            if mention.contains(key.as_str()) || text_lower.contains(key.as_str()) {
                let candidate = weight - 0.5;
                modifier = Some(modifier.map_or(candidate, |m| m.max(candidate)));
            }
        }
    }
    modifier.unwrap_or(0.0)
}

/// Whether every member of a combination appears in a symptom or in the text.
pub fn combination_present(combination: &[String], symptoms: &[String], text_lower: &str) -> bool {
    combination.iter().all(|member| {
        text_lower.contains(member.as_str()) || symptoms.iter().any(|s| s.contains(member.as_str()))
    })
}

/// Sum of red-flag points for complete combinations, capped.
pub fn red_flag_score(combinations: &[Vec<String>], symptoms: &[String], text_lower: &str) -> f64 {
    let hits = combinations
        .iter()
        .filter(|combination| combination_present(combination, symptoms, text_lower))
        .count();
    (hits as f64 * RED_FLAG_POINTS).min(RED_FLAG_CAP)
}
