//! CLI entry-point for entity extraction.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::InputArgs,
    config::Settings,
    nlp::{ner::Entity, relations::Relationship, Pipeline},
};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Skip normalisation and tag the text as given.
    #[arg(long)]
    pub raw: bool,
    /// Include symptom relationships.
    #[arg(long)]
    pub relationships: bool,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct Extraction {
    text: String,
    entities: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relationships: Option<Vec<Relationship>>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let note = args.input.read()?;
    let text = if args.raw {
        note
    } else {
        pipeline.normalize(&note)
    };
    let entities = pipeline.extract_entities(&text);
    let relationships = args
        .relationships
        .then(|| pipeline.relationships(&entities, &text));
    super::print_json(
        &Extraction {
            text,
            entities,
            relationships,
        },
        args.pretty,
    )
}
