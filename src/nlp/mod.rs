//! Note analysis pipeline: normalise, recognise, relate, score.

pub mod features;
pub mod ner;
pub mod normalize;
pub mod relations;
pub mod ruler;

use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::{Settings, TaggerBackend},
    rules::Rules,
    scoring::{
        tier::RecommendationTier,
        urgency::{self, UrgencyAssessment},
        Recommendation, Recommender,
    },
};

use self::{
    features::ClinicalProfile,
    ner::{Entity, Recognizer, Tagger},
    normalize::TextNormalizer,
    relations::Relationship,
    ruler::DictionaryTagger,
};

/// Full report for one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub normalized_text: String,
    pub entities: Vec<Entity>,
    pub entity_summary: IndexMap<String, usize>,
    pub relationships: Vec<Relationship>,
    pub urgency: UrgencyAssessment,
    pub recommendation: Recommendation,
    pub tier: RecommendationTier,
    pub advice: String,
    pub profile: ClinicalProfile,
}

/// Wires the stages together over one shared rule set. Cheap to clone and
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Arc<Rules>,
    normalizer: TextNormalizer,
    recognizer: Recognizer,
    recommender: Recommender,
}

impl Pipeline {
    pub fn new(rules: Arc<Rules>, tagger: Option<Arc<dyn Tagger>>) -> Self {
        Self {
            normalizer: TextNormalizer::new(rules.tables().abbreviations.clone()),
            recognizer: Recognizer::new(rules.clone(), tagger),
            recommender: Recommender::new(rules.clone()),
            rules,
        }
    }

    /// Built-in rules with the dictionary tagger.
    pub fn builtin() -> Result<Self> {
        let rules = Arc::new(Rules::builtin().context("compiling built-in rules")?);
        let tagger: Arc<dyn Tagger> = Arc::new(DictionaryTagger::new(rules.clone()));
        Ok(Self::new(rules, Some(tagger)))
    }

    /// Load rule tables and select the tagger backend. Rule defects are fatal.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let rules = Rules::load(settings.rules_path.as_deref()).with_context(|| {
            match &settings.rules_path {
                Some(path) => format!("loading rules from {}", path.display()),
                None => "compiling built-in rules".to_string(),
            }
        })?;
        let rules = Arc::new(rules);
        let tagger: Option<Arc<dyn Tagger>> = match settings.tagger {
            TaggerBackend::Dictionary => {
                Some(Arc::new(DictionaryTagger::new(rules.clone())) as Arc<dyn Tagger>)
            }
            TaggerBackend::None => None,
        };
        info!(
            version = %rules.tables().version,
            tagger = ?settings.tagger,
            "analysis pipeline ready"
        );
        Ok(Self::new(rules, tagger))
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn normalize(&self, raw_text: &str) -> String {
        self.normalizer.clean(raw_text)
    }

    pub fn extract_entities(&self, normalized_text: &str) -> Vec<Entity> {
        self.recognizer.extract(normalized_text)
    }

    pub fn recommend(&self, entities: &[Entity], normalized_text: &str) -> Recommendation {
        self.recommender.recommend(entities, normalized_text)
    }

    pub fn relationships(&self, entities: &[Entity], normalized_text: &str) -> Vec<Relationship> {
        relations::analyze(entities, normalized_text)
    }

    pub fn urgency(&self, entities: &[Entity]) -> UrgencyAssessment {
        urgency::score_urgency(&self.rules, entities)
    }

    /// Run every stage on a raw note.
    pub fn analyze(&self, raw_text: &str) -> Analysis {
        let normalized_text = self.normalize(raw_text);
        let entities = self.extract_entities(&normalized_text);
        let relationships = self.relationships(&entities, &normalized_text);
        let urgency = self.urgency(&entities);
        let recommendation = self.recommend(&entities, &normalized_text);
        let tier = recommendation.tier();
        let profile = features::profile(&self.rules, &entities, &normalized_text);
        debug!(
            entities = entities.len(),
            relationships = relationships.len(),
            score = recommendation.recommendation_score,
            "analysed note"
        );
        Analysis {
            entity_summary: features::entity_summary(&entities),
            normalized_text,
            entities,
            relationships,
            urgency,
            advice: tier.advice().to_string(),
            tier,
            recommendation,
            profile,
        }
    }
}
