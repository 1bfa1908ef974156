//! Clinical note clean-up ahead of entity recognition.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-./,;:()]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([,.;:]+)\s*").expect("valid regex"));
static OPEN_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\s*").expect("valid regex"));
static CLOSE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\)\s*").expect("valid regex"));
static UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(mg|mcg|ml|cc|kg|lbs|lb|cm|mm|inches|inch)\b").expect("valid regex")
});
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b").expect("valid regex")
});
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)\b").expect("valid regex"));

/// Characters stripped from a token before abbreviation lookup.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':'];

/// Normalises free-text notes: strips noise, expands abbreviations and
/// canonicalises spacing, measurements and dates.
///
/// Total over all inputs and idempotent: `clean(clean(x)) == clean(x)`.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    abbreviations: IndexMap<String, String>,
}

impl TextNormalizer {
    pub fn new(abbreviations: IndexMap<String, String>) -> Self {
        let abbreviations = abbreviations
            .into_iter()
            .map(|(abbr, full)| (abbr.to_lowercase(), full))
            .collect();
        Self { abbreviations }
    }

    pub fn clean(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let stripped = DISALLOWED.replace_all(text, " ");
        let collapsed = collapse(&stripped);
        // Spacing runs before expansion as well, so tokens glued by punctuation
        // ("pt.hx") are expanded on the first pass rather than the second.
        let spaced = normalize_spacing(&collapsed);
        let expanded = self.expand_abbreviations(&spaced);
        let spaced = normalize_spacing(&expanded);
        collapse(&normalize_formatting(&spaced))
    }

    fn expand_abbreviations(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                let core = word.trim_end_matches(TRAILING_PUNCTUATION);
                match self.abbreviations.get(&core.to_lowercase()) {
                    Some(full) => format!("{full}{}", &word[core.len()..]),
                    None => word.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn collapse(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// One space after punctuation clusters, none before; decimals and clock
/// times ("5.5", "10:30") are left intact.
fn normalize_spacing(text: &str) -> String {
    let spaced = PUNCTUATION.replace_all(text, |caps: &Captures| {
        let whole = &caps[0];
        let cluster = &caps[1];
        let Some(m) = caps.get(0) else {
            return whole.to_string();
        };
        let between_digits = whole.len() == 1
            && text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit())
            && text[m.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
        if between_digits {
            whole.to_string()
        } else {
            format!("{cluster} ")
        }
    });
    let spaced = OPEN_PAREN.replace_all(&spaced, " (");
    let spaced = CLOSE_PAREN.replace_all(&spaced, ") ");
    collapse(&spaced)
}

fn normalize_formatting(text: &str) -> String {
    let text = UNIT.replace_all(text, "${1}${2}");
    let text = DATE.replace_all(&text, "${1}/${2}/${3}");
    TIME.replace_all(&text, "${1}:${2}${3}").into_owned()
}
