//! Request and response bodies for the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nlp::{ner::Entity, relations::Relationship, Analysis};

#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesRequest {
    pub text: String,
    /// Normalise before tagging (default true).
    #[serde(default = "default_true")]
    pub normalize: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    pub entities: Vec<Entity>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResponse {
    pub normalized_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitiesResponse {
    pub text: String,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub analyzed_at: DateTime<Utc>,
    pub rules_version: String,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub rules_version: String,
    pub version: &'static str,
}
