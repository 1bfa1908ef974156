//! Command-line interface wiring for mri-advisor.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

use crate::config::Settings;

pub mod analyze;
pub mod extract;
pub mod normalize;
pub mod rules;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Explainable MRI recommendations from clinical notes",
    long_about = None
)]
pub struct Cli {
    /// JSON rule file overriding the built-in tables (also `MRI_RULES_PATH`).
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        let settings = settings.with_rules_path(self.rules);
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Normalize(args) => normalize::run(args, settings).await,
            Commands::Extract(args) => extract::run(args, settings).await,
            Commands::Rules(args) => rules::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Produce the full analysis report for a note.
    Analyze(analyze::Args),
    /// Print the normalised form of a note.
    Normalize(normalize::Args),
    /// List entities recognised in a note.
    Extract(extract::Args),
    /// Inspect or validate rule tables.
    Rules(rules::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
}

/// Where the note text comes from. Defaults to stdin.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct InputArgs {
    /// Note text given inline.
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
    /// Read the note from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return read_file(path);
        }
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading note from stdin")?;
        Ok(buffer)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Write a value to stdout as JSON.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
