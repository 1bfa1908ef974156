//! Clinical note triage: entity extraction and explainable MRI recommendation scoring.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod nlp;
pub mod rules;
pub mod scoring;

pub use nlp::{ner::Entity, Analysis, Pipeline};
pub use scoring::Recommendation;
