//! CLI entry-point for rule table inspection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    rules::{RuleSet, Rules},
};

/// Args for the `rules` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Print the active rule tables as JSON (built-in unless a rule file is set).
    Dump,
    /// Validate a rule file and report what it contains.
    Check {
        /// Rule file to validate.
        path: PathBuf,
    },
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    match args.action {
        Action::Dump => {
            let tables = match &settings.rules_path {
                Some(path) => RuleSet::from_path(path)?,
                None => RuleSet::default(),
            };
            super::print_json(&tables, true)
        }
        Action::Check { path } => {
            let rules = Rules::load(Some(path.as_path()))
                .with_context(|| format!("validating {}", path.display()))?;
            let tables = rules.tables();
            info!(path = %path.display(), version = %tables.version, "rule file is valid");
            println!(
                "ok: version {} ({} symptom weights, {} red-flag combinations, {} patterns)",
                tables.version,
                tables.symptom_weights.len(),
                tables.red_flag_combinations.len(),
                rules.categories().iter().map(|c| c.patterns.len()).sum::<usize>(),
            );
            Ok(())
        }
    }
}
