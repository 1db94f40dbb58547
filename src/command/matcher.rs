//! Layered command resolution.
//!
//! exact phrase → word-aligned substring → grammar scan → fallbacks.
//! Returns `None` when nothing claims the utterance.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::brand::find_brand;
use super::grammar::{Grammar, PhraseTable};
use super::timeframe::is_timeframe_phrase;
use super::types::Intent;

static STORE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:store|location|restaurant|site|number|#)\s*(\d{1,6})\b|\b(\d{2,6})\b")
        .expect("Invalid regex")
});

static SEARCH_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:search|find|look\s+up|look\s+for|grep|query)\s+(?:the\s+)?(?:logs?\s+)?(?:for\s+)?(.+)$")
        .expect("Invalid regex")
});

static TRAILING_TIMEFRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(?:from|over|in|during|for)\s+(?:the\s+)?(.+)$").expect("Invalid regex")
});

/// Which fallback extractor claimed an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    StoreInvestigation,
    LogSearch,
}

/// Resolution layer that produced the intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum MatchStage {
    ExactPhrase,
    Substring { phrase: &'static str },
    Grammar { ordinal: usize, id: &'static str },
    Fallback { kind: FallbackKind },
}

impl MatchStage {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactPhrase => "exact",
            Self::Substring { .. } => "substring",
            Self::Grammar { .. } => "grammar",
            Self::Fallback { .. } => "fallback",
        }
    }
}

/// A resolved utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub intent: Intent,
    pub stage: MatchStage,
}

/// Matches normalized utterances against phrases, grammar and fallbacks.
#[derive(Debug)]
pub struct CommandMatcher {
    phrases: PhraseTable,
    grammar: Grammar,
}

impl Default for CommandMatcher {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandMatcher {
    pub fn new(phrases: PhraseTable, grammar: Grammar) -> Self {
        Self { phrases, grammar }
    }

    pub fn standard() -> Self {
        Self::new(PhraseTable::standard(), Grammar::standard())
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn phrases(&self) -> &PhraseTable {
        &self.phrases
    }

    /// Resolve normalized text to an intent.
    pub fn resolve(&self, text: &str) -> Option<Resolution> {
        if text.is_empty() {
            return None;
        }

        if let Some(intent) = self.phrases.exact(text) {
            debug!("Exact phrase match: {}", text);
            return Some(Resolution {
                intent: intent.clone(),
                stage: MatchStage::ExactPhrase,
            });
        }

        if let Some((phrase, intent)) = self.phrases.substring(text) {
            debug!("Substring match on '{}': {}", phrase, text);
            return Some(Resolution {
                intent: intent.clone(),
                stage: MatchStage::Substring { phrase },
            });
        }

        if let Some((rule, intent)) = self.grammar.scan(text) {
            debug!("Grammar rule #{} {} matched: {}", rule.ordinal, rule.id, text);
            return Some(Resolution {
                intent,
                stage: MatchStage::Grammar {
                    ordinal: rule.ordinal,
                    id: rule.id,
                },
            });
        }

        if let Some(intent) = extract_store_investigation(text) {
            return Some(Resolution {
                intent,
                stage: MatchStage::Fallback {
                    kind: FallbackKind::StoreInvestigation,
                },
            });
        }

        if let Some(intent) = extract_log_search(text) {
            return Some(Resolution {
                intent,
                stage: MatchStage::Fallback {
                    kind: FallbackKind::LogSearch,
                },
            });
        }

        debug!("No match: {}", text);
        None
    }
}

// ============================================================================
// Fallback Extractors
// ============================================================================

/// A known brand alias plus a store number anywhere in the text.
pub fn extract_store_investigation(text: &str) -> Option<Intent> {
    let brand = find_brand(text)?;
    let caps = STORE_NUMBER.captures(text)?;
    let store_id = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
    Some(Intent::InvestigateStore {
        brand: brand.code().to_lowercase(),
        store_id,
        focus: None,
    })
}

/// Free text after a search verb, with an optional trailing timeframe.
pub fn extract_log_search(text: &str) -> Option<Intent> {
    let caps = SEARCH_LEAD.captures(text)?;
    let rest = caps.get(1)?.as_str().trim();

    let (query, timeframe) = match TRAILING_TIMEFRAME.captures(rest) {
        Some(tail) if is_timeframe_phrase(&tail[2]) => {
            (tail[1].trim().to_string(), Some(tail[2].trim().to_string()))
        }
        _ => (rest.to_string(), None),
    };

    if query.is_empty() {
        return None;
    }

    Some(Intent::SearchLogs {
        query,
        brand: find_brand(text).map(|b| b.code().to_lowercase()),
        source: None,
        timeframe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::normalizer::normalize;
    use crate::command::types::Section;

    fn resolve(raw: &str) -> Option<Resolution> {
        CommandMatcher::standard().resolve(&normalize(raw))
    }

    #[test]
    fn test_exact_phrase_first() {
        let r = resolve("Go back").unwrap();
        assert_eq!(r.stage, MatchStage::ExactPhrase);
        assert_eq!(r.intent, Intent::GoBack);
    }

    #[test]
    fn test_substring_before_grammar() {
        let r = resolve("Show me more details").unwrap();
        assert_eq!(
            r.stage,
            MatchStage::Substring {
                phrase: "more details"
            }
        );
        assert_eq!(r.intent, Intent::ShowMore);
    }

    #[test]
    fn test_grammar_stage() {
        let r = resolve("Investigate BWW store 155").unwrap();
        assert!(matches!(
            r.stage,
            MatchStage::Grammar {
                id: "investigation.store",
                ..
            }
        ));
    }

    #[test]
    fn test_threat_summary_not_read_as_brand() {
        for raw in ["Show threat summary", "Show me the threat summary"] {
            let r = resolve(raw).unwrap();
            assert!(matches!(
                r.stage,
                MatchStage::Grammar {
                    id: "investigation.threat_intel",
                    ..
                }
            ));
            assert_eq!(
                r.intent,
                Intent::ThreatIntelligence {
                    brand: None,
                    timeframe: None,
                }
            );
        }
        assert!(!matches!(
            resolve("show system dashboard").map(|r| r.intent),
            Some(Intent::BrandOverview { .. })
        ));
    }

    #[test]
    fn test_navigation_via_grammar() {
        let r = resolve("open the reports tab").unwrap();
        assert_eq!(
            r.intent,
            Intent::Navigate {
                section: Section::Reports
            }
        );
    }

    #[test]
    fn test_store_fallback() {
        let r = resolve("what's going on at buffalo wild wings 155").unwrap();
        assert_eq!(
            r.stage,
            MatchStage::Fallback {
                kind: FallbackKind::StoreInvestigation
            }
        );
        assert_eq!(
            r.intent,
            Intent::InvestigateStore {
                brand: "bww".to_string(),
                store_id: "155".to_string(),
                focus: None,
            }
        );
    }

    #[test]
    fn test_store_fallback_needs_known_brand() {
        assert!(extract_store_investigation("wendys store 155").is_none());
        assert!(extract_store_investigation("sonic is slow").is_none());
    }

    #[test]
    fn test_log_search_fallback() {
        let r = resolve("look up failed logins over the last week").unwrap();
        assert_eq!(
            r.stage,
            MatchStage::Fallback {
                kind: FallbackKind::LogSearch
            }
        );
        assert_eq!(
            r.intent,
            Intent::SearchLogs {
                query: "failed logins".to_string(),
                brand: None,
                source: None,
                timeframe: Some("last week".to_string()),
            }
        );
    }

    #[test]
    fn test_log_search_keeps_non_timeframe_tail() {
        let intent = extract_log_search("find blocked requests from sonic").unwrap();
        assert_eq!(
            intent,
            Intent::SearchLogs {
                query: "blocked requests from sonic".to_string(),
                brand: Some("sonic".to_string()),
                source: None,
                timeframe: None,
            }
        );
    }

    #[test]
    fn test_unrecognized() {
        assert!(resolve("order a large pizza").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("   ").is_none());
    }
}
