//! Utterance normalization.
//!
//! Turns one finalized transcript into the lowercase, single-spaced form the
//! matcher works on. Common recognition slips for brand and product names
//! are repaired and filler words are dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finalized transcript from a single recognition session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text exactly as delivered by the recognizer or keyboard
    pub raw: String,
    /// Case-folded, trimmed, repaired text
    pub normalized: String,
    /// When the transcript was received
    pub received_at: DateTime<Utc>,
}

impl Utterance {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self {
            raw,
            normalized,
            received_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Phrase repairs applied after case folding, longest first.
const REPAIRS: &[(&str, &str)] = &[
    ("buffalo wild wings", "bww"),
    ("b w w", "bww"),
    ("b-dubs", "bww"),
    ("bdubs", "bww"),
    ("sonic drive-in", "sonic"),
    ("sonic drive in", "sonic"),
    ("arby's", "arbys"),
    ("forty analyzer", "fortianalyzer"),
    ("forte analyzer", "fortianalyzer"),
    ("forti analyzer", "fortianalyzer"),
    ("forty gate", "fortigate"),
    ("forte gate", "fortigate"),
    ("forti gate", "fortigate"),
    ("webfilters", "web filters"),
    ("webfilter", "web filter"),
];

const FILLER_WORDS: &[&str] = &["um", "uh", "er", "like", "actually", "basically", "please"];

const FILLER_PHRASES: &[&str] = &["you know", "could you", "can you", "i want to", "i'd like to"];

/// Normalize raw utterance text.
///
/// Lowercases, strips punctuation the recognizer tends to append, repairs
/// known misrecognitions and collapses whitespace. Apostrophes and hyphens
/// inside words are kept so that repairs such as `arby's` still apply.
pub fn normalize(raw: &str) -> String {
    let mut text: String = raw
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '.' | ',' | '!' | '?' | ';' | ':' | '"' => ' ',
            '\u{2019}' => '\'',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect();

    text = collapse_whitespace(&text);

    for (from, to) in REPAIRS {
        if text.contains(from) {
            text = replace_words(&text, from, to);
        }
    }

    for phrase in FILLER_PHRASES {
        if text.contains(phrase) {
            text = replace_words(&text, phrase, "");
        }
    }

    text.split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace `from` with `to` only where it is aligned on word boundaries.
fn replace_words(text: &str, from: &str, to: &str) -> String {
    let padded = format!(" {} ", text);
    let needle = format!(" {} ", from);
    let replacement = if to.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", to)
    };
    collapse_whitespace(&padded.replace(&needle, &replacement))
}

/// True when `needle` occurs in `haystack` as a run of whole words.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    format!(" {} ", haystack).contains(&format!(" {} ", needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_fold_and_trim() {
        assert_eq!(normalize("  Investigate BWW Store 155.  "), "investigate bww store 155");
    }

    #[test]
    fn test_brand_repairs() {
        assert_eq!(
            normalize("Investigate Buffalo Wild Wings store 155"),
            "investigate bww store 155"
        );
        assert_eq!(normalize("Show Arby's overview"), "show arbys overview");
        assert_eq!(normalize("check sonic drive-in store 12"), "check sonic store 12");
    }

    #[test]
    fn test_product_repairs() {
        assert_eq!(normalize("go to forty analyzer"), "go to fortianalyzer");
    }

    #[test]
    fn test_fillers_removed() {
        assert_eq!(normalize("um, go back please"), "go back");
        assert_eq!(normalize("can you show me more details?"), "show me more details");
    }

    #[test]
    fn test_repairs_respect_word_boundaries() {
        // "like" is filler only as a whole word
        assert_eq!(normalize("search for likely phishing"), "search for likely phishing");
    }

    #[test]
    fn test_contains_words() {
        assert!(contains_words("show me more details", "more details"));
        assert!(!contains_words("go backwards", "go back"));
        assert!(!contains_words("anything", ""));
    }

    #[test]
    fn test_utterance_empty() {
        assert!(Utterance::new("  ... ").is_empty());
        assert!(!Utterance::new("help").is_empty());
    }
}
