//! Runtime configuration utilities for mri-advisor.

use std::{env, path::PathBuf, str::FromStr};

use serde::Deserialize;
use tracing::warn;

/// Entity tagger used alongside the rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerBackend {
    /// Phrase dictionary built from the ruler table.
    #[default]
    Dictionary,
    /// Rule-table patterns only.
    None,
}

impl FromStr for TaggerBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dictionary" | "ruler" => Ok(Self::Dictionary),
            "none" | "off" | "rules" => Ok(Self::None),
            other => Err(format!("unknown tagger backend {other:?}")),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// JSON rule file overriding the built-in tables.
    pub rules_path: Option<PathBuf>,
    /// Tagger backend.
    pub tagger: TaggerBackend,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let rules_path = env::var("MRI_RULES_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let tagger = match env::var("MRI_TAGGER") {
            Ok(raw) => raw.parse().unwrap_or_else(|err: String| {
                warn!(%err, "falling back to dictionary tagger");
                TaggerBackend::Dictionary
            }),
            Err(_) => TaggerBackend::default(),
        };

        Ok(Self { rules_path, tagger })
    }

    /// Override the rule file, e.g. from a CLI flag.
    pub fn with_rules_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.rules_path = path;
        }
        self
    }
}
