//! Command grammar.
//!
//! An ordered list of regex rules, each tagged with an id and a domain. The
//! first rule whose pattern matches and whose builder accepts the captures
//! wins. Rules overlap on purpose; registration order is the only
//! precedence, so the order below is part of the contract.

use std::collections::HashMap;

use regex::{Captures, Regex};

use super::brand::Brand;
use super::timeframe::is_timeframe_phrase;
use super::types::*;

/// Builds an intent from the captures of a structural match. Returning
/// `None` declines the match and lets the scan continue.
pub type IntentBuilder = fn(&Captures<'_>) -> Option<Intent>;

/// Capture for a brand word, after normalization.
const BRAND: &str = r"([a-z][a-z0-9'\-]*)";
/// Capture for a store number.
const STORE: &str = r"(\d{1,6})";

// ============================================================================
// Command Pattern
// ============================================================================

/// One grammar rule.
pub struct CommandPattern {
    /// 1-based registration position
    pub ordinal: usize,
    /// Stable rule tag, `domain.name`
    pub id: &'static str,
    pub domain: Domain,
    regex: Regex,
    build: IntentBuilder,
}

impl CommandPattern {
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Apply the rule to normalized text.
    pub fn apply(&self, text: &str) -> Option<Intent> {
        let caps = self.regex.captures(text)?;
        (self.build)(&caps)
    }
}

impl std::fmt::Debug for CommandPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPattern")
            .field("ordinal", &self.ordinal)
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

// ============================================================================
// Grammar
// ============================================================================

/// Ordered collection of command patterns. Built once, immutable after.
#[derive(Debug, Default)]
pub struct Grammar {
    patterns: Vec<CommandPattern>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. `{brand}` and `{store}` in the pattern expand to the
    /// shared capture groups.
    ///
    /// Panics if the pattern is not a valid regex; rules are compiled once
    /// from constants at startup.
    pub fn register(
        &mut self,
        id: &'static str,
        domain: Domain,
        pattern: &str,
        build: IntentBuilder,
    ) -> &mut Self {
        let expanded = pattern.replace("{brand}", BRAND).replace("{store}", STORE);
        let regex = Regex::new(&expanded).expect("Invalid regex");
        self.patterns.push(CommandPattern {
            ordinal: self.patterns.len() + 1,
            id,
            domain,
            regex,
            build,
        });
        self
    }

    pub fn patterns(&self) -> &[CommandPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scan rules in registration order and return the first accepted match.
    pub fn scan(&self, text: &str) -> Option<(&CommandPattern, Intent)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.apply(text).map(|intent| (pattern, intent)))
    }

    /// The dashboard command grammar.
    pub fn standard() -> Self {
        let mut g = Self::new();

        // Emergency
        g.register(
            "emergency.alert",
            Domain::Emergency,
            r"^(?:emergency|red alert|security incident|security emergency)(?:\s+alert)?(?:\s+(?:at|for|in|on))?(?:\s+{brand}\s+(?:store|location)\s+(?:number\s+)?{store})?(?:\s+(.+))?$",
            build_emergency,
        );
        g.register(
            "emergency.attack",
            Domain::Emergency,
            r"^(?:we(?:'re| are) under attack|(?:possible|active|security) breach(?: detected)?|breach detected|network (?:is )?down)(?:\s+(?:at|in|for)\s+{brand})?(?:\s+(?:store|location)\s+{store})?$",
            build_attack,
        );

        // Follow-ups
        g.register(
            "system.go_back",
            Domain::System,
            r"^(?:go|take me|navigate)\s+back(?:\s+(?:to\s+)?(?:the\s+)?(?:previous|last)(?:\s+(?:view|screen|page|section))?)?$|^(?:back|previous|undo)$",
            |_| Some(Intent::GoBack),
        );
        g.register(
            "system.show_more",
            Domain::System,
            r"^(?:show|tell|give)\s+(?:me\s+)?more(?:\s+(?:details?|info(?:rmation)?|about\s+(?:that|this|it)))?$|^(?:more|expand|details|drill down)$",
            |_| Some(Intent::ShowMore),
        );

        // Navigation
        g.register(
            "navigation.section",
            Domain::Navigation,
            r"^(?:go\s+to|show(?:\s+me)?|open|navigate\s+to|switch\s+to|take\s+me\s+to|display)\s+(?:the\s+)?(overview|home|dashboard|main|investigations?|investigate|stores|fortianalyzer|logs?|security\s+logs|web\s+filter(?:s|ing)?|filters|reports?|reporting|analytics|intelligence|ltm|settings|preferences)(?:\s+(?:page|section|tab|view|screen))?$",
            build_navigate,
        );
        g.register(
            "navigation.brand_overview",
            Domain::Navigation,
            r"^(?:show|open|display|give)\s+(?:me\s+)?(?:the\s+)?{brand}\s+(?:brand\s+)?(?:overview|summary|dashboard)$",
            build_brand_overview,
        );
        g.register(
            "navigation.overview_of_brand",
            Domain::Navigation,
            r"^(?:(?:show|open|display|give)\s+(?:me\s+)?)?(?:the\s+)?(?:overview|summary)\s+(?:of|for)\s+{brand}$",
            build_brand_overview,
        );

        // Investigation
        g.register(
            "investigation.store",
            Domain::Investigation,
            r"^(?:investigate|check|analyze|examine|inspect|look\s+at|pull\s+up)\s+{brand}\s+(?:store|location|restaurant|site)\s+(?:number\s+|#)?{store}(?:\s+(?:for|focusing\s+on|focus\s+on|regarding|about)\s+(.+))?$",
            build_store_investigation,
        );
        g.register(
            "investigation.store_first",
            Domain::Investigation,
            r"^(?:investigate|check|analyze|examine|inspect)\s+(?:store|location)\s+(?:number\s+|#)?{store}\s+(?:for|at|from|of)\s+{brand}$",
            build_store_first_investigation,
        );
        g.register(
            "investigation.security_analysis",
            Domain::Investigation,
            r"^(?:run|start|perform)\s+(?:an?\s+)?(?:security\s+)?(?:analysis|investigation|check)\s+(?:for|on|of)\s+{brand}\s+(?:store|location)\s+{store}$",
            build_store_investigation,
        );
        g.register(
            "investigation.security_status",
            Domain::Investigation,
            r"^check\s+(?:the\s+)?security\s+(?:status\s+|health\s+)?(?:for|of|at)\s+{brand}\s+(?:store|location)\s+{store}$",
            build_store_investigation,
        );

        // Bulk
        g.register(
            "bulk.all_stores",
            Domain::Bulk,
            r"^(check|scan|sweep|analyze|investigate|audit)\s+(?:all|every|each)\s+(?:{brand}\s+)?(?:stores?|locations?|restaurants?|sites?)(?:\s+(?:for|regarding|looking\s+for)\s+(.+))?$",
            build_bulk,
        );
        g.register(
            "bulk.fleet",
            Domain::Bulk,
            r"^(?:run|perform|start)\s+(?:an?\s+)?(?:bulk|fleet[\s\-]?wide|global)\s+(security\s+check|scan|analysis|check)(?:\s+(?:on|across|for)\s+(?:all\s+)?(?:{brand}\s+)?(?:stores|locations))?(?:\s+for\s+(.+))?$",
            build_bulk,
        );

        // Search
        g.register(
            "search.in_source_logs",
            Domain::Search,
            r"^(?:search|find|look)\s+(?:for\s+)?(.+?)\s+in\s+(?:the\s+)?(fortianalyzer|analyzer|web\s+filter|webfilter|firewall|fortigate|traffic)\s+logs?(?:\s+(?:from|for|over|in|during)\s+(?:the\s+)?(.+))?$",
            build_source_search,
        );
        g.register(
            "search.in_brand_logs",
            Domain::Search,
            r"^(?:search|find|look)\s+(?:for\s+)?(.+?)\s+in\s+(?:the\s+)?{brand}\s+logs?(?:\s+(?:from|for|over|in|during)\s+(?:the\s+)?(.+))?$",
            build_brand_search,
        );
        g.register(
            "search.logs_for",
            Domain::Search,
            r"^search\s+(?:the\s+)?logs?\s+for\s+(.+?)(?:\s+(?:from|over|in|during)\s+(?:the\s+)?((?:last|past|previous)\s+.+|today|yesterday|this\s+week|this\s+month))?$",
            build_plain_search,
        );
        g.register(
            "search.show_logs",
            Domain::Search,
            r"^(?:show|display|get)\s+(?:me\s+)?(?:the\s+)?logs?\s+(?:for|matching|about|containing|with)\s+(.+?)(?:\s+(?:from|over|in|during)\s+(?:the\s+)?((?:last|past|previous)\s+.+|today|yesterday))?$",
            build_plain_search,
        );

        // Security events, threats, web filtering
        g.register(
            "investigation.severity_events",
            Domain::Investigation,
            r"^(?:show|display|list|find|get)\s+(?:me\s+)?(?:all\s+|the\s+)?(critical|severe|high|medium|moderate|low|minor)\s+(?:severity\s+)?(?:security\s+)?(?:events?|alerts?|incidents?)(?:\s+(?:for|at|from|in)\s+{brand})?$",
            build_security_events,
        );
        g.register(
            "investigation.filter_by_severity",
            Domain::Investigation,
            r"^filter\s+(?:security\s+)?(?:events?|alerts?)\s+(?:by|to)\s+(critical|severe|high|medium|moderate|low|minor)(?:\s+severity)?(?:\s+(?:for|at)\s+{brand})?$",
            build_security_events,
        );
        g.register(
            "investigation.bare_severity",
            Domain::Investigation,
            r"^(critical|high)\s+(?:security\s+)?(?:events?|alerts?)(?:\s+(?:for|at)\s+{brand})?$",
            build_security_events,
        );
        g.register(
            "investigation.threat_intel",
            Domain::Investigation,
            r"^(?:check|show|get|fetch|display)\s+(?:me\s+)?(?:the\s+)?threat\s+(?:intel(?:ligence)?|summary|landscape)(?:\s+(?:for|on|at)\s+{brand})?(?:\s+(?:for|over|from|in|during)\s+(?:the\s+)?(.+))?$",
            build_threat_intelligence,
        );
        g.register(
            "investigation.threats_for",
            Domain::Investigation,
            r"^(?:what\s+are\s+the\s+)?(?:current\s+)?threats\s+(?:for|at|against)\s+{brand}(?:\s+(?:over|for|in|from|during)\s+(?:the\s+)?(.+))?$",
            build_threat_intelligence,
        );
        g.register(
            "investigation.web_filter",
            Domain::Investigation,
            r"^(?:show|check|get|display|what(?:'s|\s+is))\s+(?:me\s+)?(?:the\s+)?web\s+filter(?:s|ing)?(?:\s+(?:status|policies|policy|stats|statistics|health))?(?:\s+(?:for|at)\s+{brand}(?:\s+(?:store|location)\s+{store})?)?$",
            build_web_filter,
        );

        // System
        g.register(
            "system.health",
            Domain::System,
            r"^(?:check|test|verify|show|what(?:'s|\s+is))\s+(?:the\s+)?(?:system|connection|connections|connectivity|api|service|services|network)(?:\s+(?:health|status))?(?:\s+check)?$",
            |_| Some(Intent::SystemHealth),
        );
        g.register(
            "system.help",
            Domain::System,
            r"^(?:help|what\s+can\s+(?:i|you)\s+(?:say|do)|(?:list|show)\s+(?:voice\s+)?commands|voice\s+commands)$",
            |_| Some(Intent::Help),
        );
        g.register(
            "system.stop",
            Domain::System,
            r"^(?:stop|cancel|quiet|silence|shut\s+up|be\s+quiet)(?:\s+(?:talking|speaking|speech|reading))?$",
            |_| Some(Intent::StopSpeaking),
        );
        g.register(
            "system.repeat",
            Domain::System,
            r"^(?:repeat|say\s+(?:that|it)\s+again|what\s+did\s+you\s+say)(?:\s+that)?$",
            |_| Some(Intent::Repeat),
        );

        // Reporting
        g.register(
            "reporting.generate",
            Domain::Reporting,
            r"^(?:generate|create|build|run|prepare|make)\s+(?:me\s+)?(?:an?\s+|the\s+)?(?:(security|compliance|pci|executive|summary|threat|traffic|bandwidth)\s+)?report(?:\s+for\s+{brand}(?:\s+(?:store|location)\s+{store})?)?(?:\s+(?:for|over|covering|from)\s+(?:the\s+)?(.+))?$",
            build_report,
        );
        g.register(
            "reporting.report_on",
            Domain::Reporting,
            r"^(?:(security|compliance|executive|threat|traffic)\s+)?report\s+(?:for|on)\s+{brand}(?:\s+(?:store|location)\s+{store})?$",
            build_report,
        );

        // Intelligence (capability-gated in the handlers)
        g.register(
            "analytics.patterns",
            Domain::Analytics,
            r"^(?:analyze|show|find|detect)\s+(?:me\s+)?(?:the\s+)?(?:security\s+|network\s+|threat\s+)?patterns?(?:\s+(?:for|in|at)\s+{brand})?$|^what\s+patterns?\s+do\s+you\s+see.*$",
            build_patterns,
        );
        g.register(
            "analytics.predict",
            Domain::Analytics,
            r"^(?:predict|forecast)\s+(?:security\s+|network\s+)?(?:issues|problems|threats|failures|outages|incidents)?(?:\s+for\s+{brand})?(?:\s+(?:over|for|in|during)\s+(?:the\s+)?(.+)|\s+(next\s+.+|tomorrow))?$",
            build_prediction,
        );
        g.register(
            "analytics.correlation",
            Domain::Analytics,
            r"^(?:(?:show|run|find|perform)\s+)?(?:me\s+)?(?:the\s+)?(?:cross[\s\-]brand\s+)?correlations?(?:\s+analysis)?$|^correlate\b.*$",
            |_| {
                Some(Intent::Intelligence {
                    request: IntelligenceIntent::Correlation,
                })
            },
        );
        g.register(
            "analytics.attack_paths",
            Domain::Analytics,
            r"^(?:show|find|analyze|map|trace)\s+(?:me\s+)?(?:the\s+)?(?:possible\s+)?attack\s+paths?(?:\s+(?:for|to|at|into)\s+{brand})?$",
            build_attack_paths,
        );
        g.register(
            "analytics.insights",
            Domain::Analytics,
            r"^(?:show|give|get|display)\s+(?:me\s+)?(?:the\s+)?(?:ai\s+|network\s+|security\s+)?insights?$",
            |_| {
                Some(Intent::Intelligence {
                    request: IntelligenceIntent::Insights,
                })
            },
        );

        g
    }
}

// ============================================================================
// Intent Builders
// ============================================================================

fn text(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Captured brand word, dropped when it is a filler word.
fn brand(caps: &Captures<'_>, index: usize) -> Option<String> {
    text(caps, index).filter(|word| !is_common_word(word))
}

/// A brand slot sometimes swallows a timeframe ("report for today").
fn brand_or_timeframe(
    brand: Option<String>,
    timeframe: Option<String>,
) -> (Option<String>, Option<String>) {
    match brand {
        Some(word) if timeframe.is_none() && is_timeframe_phrase(&word) => (None, Some(word)),
        other => (other, timeframe),
    }
}

fn is_common_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "a" | "an" | "my" | "me" | "this" | "that" | "all" | "our" | "every" | "each"
    )
}

fn build_emergency(caps: &Captures<'_>) -> Option<Intent> {
    let mut description = text(caps, 3);
    let brand_word = brand(caps, 1).or_else(|| {
        description
            .as_deref()
            .and_then(super::brand::find_brand)
            .map(|b| b.code().to_lowercase())
    });
    if description
        .as_deref()
        .is_some_and(|d| Brand::from_alias(d).is_some())
    {
        description = None;
    }
    Some(Intent::Emergency {
        brand: brand_word,
        store_id: text(caps, 2),
        description,
    })
}

fn build_attack(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::Emergency {
        brand: brand(caps, 1),
        store_id: text(caps, 2),
        description: text(caps, 0),
    })
}

fn build_navigate(caps: &Captures<'_>) -> Option<Intent> {
    let spoken = text(caps, 1)?;
    let spoken = spoken.split_whitespace().collect::<Vec<_>>().join(" ");
    Section::from_spoken(&spoken).map(|section| Intent::Navigate { section })
}

/// Overview rules only take known brand aliases; the slot is wide enough
/// to swallow nouns like "threat" or "system" otherwise.
fn build_brand_overview(caps: &Captures<'_>) -> Option<Intent> {
    brand(caps, 1)
        .filter(|word| Brand::from_alias(word).is_some())
        .map(|brand| Intent::BrandOverview { brand })
}

fn build_store_investigation(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::InvestigateStore {
        brand: brand(caps, 1)?,
        store_id: text(caps, 2)?,
        focus: text(caps, 3),
    })
}

fn build_store_first_investigation(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::InvestigateStore {
        brand: brand(caps, 2)?,
        store_id: text(caps, 1)?,
        focus: None,
    })
}

fn build_bulk(caps: &Captures<'_>) -> Option<Intent> {
    let verb = text(caps, 1)?;
    Some(Intent::BulkOperation {
        action: BulkAction::from_verb(&verb),
        brand: brand(caps, 2),
        focus: text(caps, 3),
    })
}

fn build_source_search(caps: &Captures<'_>) -> Option<Intent> {
    let source = text(caps, 2)?;
    let source = source.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(Intent::SearchLogs {
        query: text(caps, 1)?,
        brand: None,
        source: LogSource::parse(&source),
        timeframe: text(caps, 3),
    })
}

fn build_brand_search(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::SearchLogs {
        query: text(caps, 1)?,
        brand: brand(caps, 2),
        source: None,
        timeframe: text(caps, 3),
    })
}

fn build_plain_search(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::SearchLogs {
        query: text(caps, 1)?,
        brand: None,
        source: None,
        timeframe: text(caps, 2),
    })
}

fn build_security_events(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::SecurityEvents {
        severity: Severity::parse(&text(caps, 1)?)?,
        brand: brand(caps, 2),
    })
}

fn build_threat_intelligence(caps: &Captures<'_>) -> Option<Intent> {
    let (brand, timeframe) = brand_or_timeframe(brand(caps, 1), text(caps, 2));
    Some(Intent::ThreatIntelligence { brand, timeframe })
}

fn build_web_filter(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::WebFilterStatus {
        brand: brand(caps, 1),
        store_id: text(caps, 2),
    })
}

fn build_report(caps: &Captures<'_>) -> Option<Intent> {
    let report_type = text(caps, 1)
        .and_then(|t| ReportType::parse(&t))
        .unwrap_or_default();
    let (brand, timeframe) = brand_or_timeframe(brand(caps, 2), text(caps, 4));
    Some(Intent::GenerateReport {
        report_type,
        brand,
        store_id: text(caps, 3),
        timeframe,
    })
}

fn build_patterns(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::Intelligence {
        request: IntelligenceIntent::PatternAnalysis {
            brand: brand(caps, 1),
        },
    })
}

fn build_prediction(caps: &Captures<'_>) -> Option<Intent> {
    let (brand, timeframe) =
        brand_or_timeframe(brand(caps, 1), text(caps, 2).or_else(|| text(caps, 3)));
    Some(Intent::Intelligence {
        request: IntelligenceIntent::Prediction { brand, timeframe },
    })
}

fn build_attack_paths(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::Intelligence {
        request: IntelligenceIntent::AttackPaths {
            brand: brand(caps, 1),
        },
    })
}

// ============================================================================
// Exact Phrase Table
// ============================================================================

/// Fixed phrases checked before the grammar. Iteration order is the
/// insertion order below; the substring pass relies on it.
#[derive(Debug, Clone)]
pub struct PhraseTable {
    entries: Vec<(&'static str, Intent)>,
    index: HashMap<&'static str, usize>,
}

impl PhraseTable {
    pub fn new(entries: Vec<(&'static str, Intent)>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, (phrase, _)) in entries.iter().enumerate() {
            index.entry(*phrase).or_insert(position);
        }
        Self { entries, index }
    }

    /// The dashboard phrase table.
    pub fn standard() -> Self {
        let overview = Intent::Navigate {
            section: Section::Overview,
        };
        Self::new(vec![
            ("go back", Intent::GoBack),
            ("previous view", Intent::GoBack),
            ("show more", Intent::ShowMore),
            ("more details", Intent::ShowMore),
            ("tell me more", Intent::ShowMore),
            ("what can i say", Intent::Help),
            ("voice help", Intent::Help),
            ("stop talking", Intent::StopSpeaking),
            ("stop speaking", Intent::StopSpeaking),
            ("be quiet", Intent::StopSpeaking),
            ("repeat that", Intent::Repeat),
            ("say that again", Intent::Repeat),
            ("system status", Intent::SystemHealth),
            ("system health", Intent::SystemHealth),
            ("connection status", Intent::SystemHealth),
            ("check connections", Intent::SystemHealth),
            ("go home", overview.clone()),
            ("main dashboard", overview.clone()),
            ("show dashboard", overview),
        ])
    }

    /// O(1) lookup of an exact phrase.
    pub fn exact(&self, text: &str) -> Option<&Intent> {
        self.index.get(text).map(|&position| &self.entries[position].1)
    }

    /// First entry, in table order, whose phrase contains the text or is
    /// contained in it. Containment is word-aligned. A single word that
    /// appears in a phrase resolves to it: "show" is show more, "check" is
    /// system health.
    pub fn substring(&self, text: &str) -> Option<(&'static str, &Intent)> {
        if text.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(phrase, _)| {
                super::normalizer::contains_words(text, phrase)
                    || super::normalizer::contains_words(phrase, text)
            })
            .map(|(phrase, intent)| (*phrase, intent))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Intent)> {
        self.entries.iter().map(|(phrase, intent)| (*phrase, intent))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
