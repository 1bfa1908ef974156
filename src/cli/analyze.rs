//! CLI entry-point for full note analysis.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{cli::InputArgs, config::Settings, nlp::Pipeline};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Pretty-print the JSON report.
    #[arg(long)]
    pub pretty: bool,
    /// Print only the recommendation instead of the full report.
    #[arg(long)]
    pub recommendation_only: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let note = args.input.read()?;
    let analysis = pipeline.analyze(&note);
    info!(
        score = analysis.recommendation.recommendation_score,
        tier = ?analysis.tier,
        "analysis complete"
    );
    if args.recommendation_only {
        super::print_json(&analysis.recommendation, args.pretty)
    } else {
        super::print_json(&analysis, args.pretty)
    }
}
