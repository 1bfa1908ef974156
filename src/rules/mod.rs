//! Static rule tables driving recognition and scoring.
//!
//! Tables are plain data (`RuleSet`) so they can be edited as JSON without
//! touching code. `Rules` is the validated, compiled form shared read-only by
//! every stage of the pipeline.

mod defaults;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Matches a numeric token inside ruler phrases (`#` placeholder).
const NUMBER_TOKEN: &str =
    r"(?:\d+(?:\.\d+)?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";

/// Failures detected while loading or compiling rule tables. All are fatal at startup.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("reading rule file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing rule file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid pattern in {table}: {pattern}")]
    InvalidPattern {
        table: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("weight for {key:?} in {table} must be within [0, 1], got {weight}")]
    WeightOutOfRange {
        table: &'static str,
        key: String,
        weight: f64,
    },
    #[error("empty entry in {table}")]
    EmptyEntry { table: String },
    #[error("abbreviation {0:?} must be a single token")]
    MultiTokenAbbreviation(String),
    #[error("abbreviation {0:?} may only contain letters, digits, '_', '-' and '/'")]
    UnmatchableAbbreviation(String),
}

/// One phrase of the dictionary tagger. `#` stands for a number token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerPattern {
    pub label: String,
    pub phrase: String,
}

/// Keyword lists used by the urgency scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyTables {
    pub high_urgency_symptoms: Vec<String>,
    pub severe_indicators: Vec<String>,
    pub acute_onset_keywords: Vec<String>,
}

impl Default for UrgencyTables {
    fn default() -> Self {
        defaults::urgency()
    }
}

/// Variation lexicons for the clinical profile attached to analysis reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub symptom_categories: IndexMap<String, Vec<String>>,
    pub severity_levels: IndexMap<String, Vec<String>>,
    pub duration_types: IndexMap<String, Vec<String>>,
    pub frequency_types: IndexMap<String, Vec<String>>,
    /// Per-symptom urgency, keyed by symptom phrase or symptom category.
    pub symptom_urgency: IndexMap<String, f64>,
    pub red_flag_phrases: Vec<String>,
    pub red_flag_patterns: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        defaults::lexicon()
    }
}

/// Editable configuration tables. Missing tables fall back to the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub version: String,
    pub symptom_weights: IndexMap<String, f64>,
    pub duration_weights: IndexMap<String, f64>,
    pub severity_weights: IndexMap<String, f64>,
    pub red_flag_combinations: Vec<Vec<String>>,
    pub urgent_keywords: Vec<String>,
    pub urgent_patterns: Vec<String>,
    pub abbreviations: IndexMap<String, String>,
    pub category_patterns: IndexMap<String, Vec<String>>,
    pub ruler: Vec<RulerPattern>,
    pub urgency: UrgencyTables,
    pub lexicon: Lexicon,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: "builtin-1".to_string(),
            symptom_weights: defaults::symptom_weights(),
            duration_weights: defaults::duration_weights(),
            severity_weights: defaults::severity_weights(),
            red_flag_combinations: defaults::red_flag_combinations(),
            urgent_keywords: defaults::urgent_keywords(),
            urgent_patterns: defaults::urgent_patterns(),
            abbreviations: defaults::abbreviations(),
            category_patterns: defaults::category_patterns(),
            ruler: defaults::ruler(),
            urgency: UrgencyTables::default(),
            lexicon: Lexicon::default(),
        }
    }
}

impl RuleSet {
    /// Read a JSON rule file.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RuleError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Keyword tables are matched against lower-cased text.
    fn fold_case(&mut self) {
        for table in [
            &mut self.symptom_weights,
            &mut self.duration_weights,
            &mut self.severity_weights,
            &mut self.lexicon.symptom_urgency,
        ] {
            let folded: IndexMap<String, f64> =
                table.drain(..).map(|(k, w)| (k.to_lowercase(), w)).collect();
            *table = folded;
        }
        let lists = [
            &mut self.urgent_keywords,
            &mut self.urgency.high_urgency_symptoms,
            &mut self.urgency.severe_indicators,
            &mut self.urgency.acute_onset_keywords,
            &mut self.lexicon.red_flag_phrases,
        ];
        for list in lists
            .into_iter()
            .chain(self.red_flag_combinations.iter_mut())
            .chain(self.lexicon.symptom_categories.values_mut())
            .chain(self.lexicon.severity_levels.values_mut())
            .chain(self.lexicon.duration_types.values_mut())
            .chain(self.lexicon.frequency_types.values_mut())
        {
            for value in list.iter_mut() {
                *value = value.to_lowercase();
            }
        }
    }

    fn validate(&self) -> Result<(), RuleError> {
        check_weights("symptom_weights", &self.symptom_weights)?;
        check_weights("duration_weights", &self.duration_weights)?;
        check_weights("severity_weights", &self.severity_weights)?;
        check_weights("lexicon.symptom_urgency", &self.lexicon.symptom_urgency)?;

        for combination in &self.red_flag_combinations {
            if combination.is_empty() {
                return Err(empty("red_flag_combinations"));
            }
            check_non_empty("red_flag_combinations", combination)?;
        }
        check_non_empty("urgent_keywords", &self.urgent_keywords)?;
        check_non_empty(
            "urgency.high_urgency_symptoms",
            &self.urgency.high_urgency_symptoms,
        )?;
        check_non_empty("urgency.severe_indicators", &self.urgency.severe_indicators)?;
        check_non_empty(
            "urgency.acute_onset_keywords",
            &self.urgency.acute_onset_keywords,
        )?;
        check_non_empty("lexicon.red_flag_phrases", &self.lexicon.red_flag_phrases)?;
        for (table, groups) in [
            ("lexicon.symptom_categories", &self.lexicon.symptom_categories),
            ("lexicon.severity_levels", &self.lexicon.severity_levels),
            ("lexicon.duration_types", &self.lexicon.duration_types),
            ("lexicon.frequency_types", &self.lexicon.frequency_types),
        ] {
            for variations in groups.values() {
                check_non_empty(table, variations)?;
            }
        }

        for abbreviation in self.abbreviations.keys() {
            if abbreviation.trim().is_empty() {
                return Err(empty("abbreviations"));
            }
            if abbreviation.split_whitespace().count() > 1 {
                return Err(RuleError::MultiTokenAbbreviation(abbreviation.clone()));
            }
            // The normaliser splits tokens at punctuation and strips other
            // symbols before lookup.
            if !abbreviation.trim().chars().all(is_abbreviation_char) {
                return Err(RuleError::UnmatchableAbbreviation(abbreviation.clone()));
            }
        }
        for category in self.category_patterns.keys() {
            if category.trim().is_empty() {
                return Err(empty("category_patterns"));
            }
        }
        for pattern in &self.ruler {
            if pattern.label.trim().is_empty() || pattern.phrase.trim().is_empty() {
                return Err(empty("ruler"));
            }
        }
        Ok(())
    }
}

fn is_abbreviation_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/')
}

fn empty(table: &str) -> RuleError {
    RuleError::EmptyEntry {
        table: table.to_string(),
    }
}

fn check_weights(table: &'static str, weights: &IndexMap<String, f64>) -> Result<(), RuleError> {
    for (key, weight) in weights {
        if key.is_empty() {
            return Err(empty(table));
        }
        if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
            return Err(RuleError::WeightOutOfRange {
                table,
                key: key.clone(),
                weight: *weight,
            });
        }
    }
    Ok(())
}

fn check_non_empty(table: &str, values: &[String]) -> Result<(), RuleError> {
    if values.iter().any(|value| value.is_empty()) {
        return Err(empty(table));
    }
    Ok(())
}

/// Regex patterns of one recognizer category, labelled by the upper-cased category name.
#[derive(Debug, Clone)]
pub struct CategoryPatterns {
    pub label: String,
    pub patterns: Vec<Regex>,
}

/// A compiled dictionary-tagger phrase.
#[derive(Debug, Clone)]
pub struct CompiledPhrase {
    pub label: String,
    pub regex: Regex,
}

/// Validated rule tables with every pattern compiled.
#[derive(Debug, Clone)]
pub struct Rules {
    tables: RuleSet,
    categories: Vec<CategoryPatterns>,
    ruler: Vec<CompiledPhrase>,
    urgent_patterns: Vec<Regex>,
    red_flag_patterns: Vec<Regex>,
}

impl Rules {
    /// Validate tables and compile all patterns.
    pub fn compile(mut tables: RuleSet) -> Result<Self, RuleError> {
        tables.validate()?;
        tables.fold_case();

        let mut categories = Vec::with_capacity(tables.category_patterns.len());
        for (category, patterns) in &tables.category_patterns {
            let table = format!("category_patterns.{category}");
            let compiled = patterns
                .iter()
                .map(|pattern| compile_pattern(&table, pattern))
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(CategoryPatterns {
                label: category.to_uppercase(),
                patterns: compiled,
            });
        }

        let ruler = tables
            .ruler
            .iter()
            .map(|pattern| {
                compile_pattern("ruler", &phrase_regex(&pattern.phrase)).map(|regex| {
                    CompiledPhrase {
                        label: pattern.label.clone(),
                        regex,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let urgent_patterns = tables
            .urgent_patterns
            .iter()
            .map(|pattern| compile_pattern("urgent_patterns", pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let red_flag_patterns = tables
            .lexicon
            .red_flag_patterns
            .iter()
            .map(|pattern| compile_pattern("lexicon.red_flag_patterns", pattern))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            version = %tables.version,
            categories = categories.len(),
            ruler = ruler.len(),
            "compiled rule tables"
        );
        Ok(Self {
            tables,
            categories,
            ruler,
            urgent_patterns,
            red_flag_patterns,
        })
    }

    /// Built-in tables.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::compile(RuleSet::default())
    }

    /// Load from a JSON file when given, otherwise use the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self, RuleError> {
        match path {
            Some(path) => Self::compile(RuleSet::from_path(path)?),
            None => Self::builtin(),
        }
    }

    pub fn tables(&self) -> &RuleSet {
        &self.tables
    }

    pub fn categories(&self) -> &[CategoryPatterns] {
        &self.categories
    }

    pub fn ruler(&self) -> &[CompiledPhrase] {
        &self.ruler
    }

    pub fn urgent_patterns(&self) -> &[Regex] {
        &self.urgent_patterns
    }

    pub fn red_flag_patterns(&self) -> &[Regex] {
        &self.red_flag_patterns
    }
}

fn compile_pattern(table: &str, pattern: &str) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            table: table.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

/// Turn a ruler phrase into a whole-word regex, tolerant of repeated whitespace.
fn phrase_regex(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(|token| {
            if token == "#" {
                NUMBER_TOKEN.to_string()
            } else {
                regex::escape(token)
            }
        })
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!(r"\b{body}\b")
}
