//! Timeframe phrase normalization.
//!
//! Spoken phrases map to the duration codes the data service accepts.
//! Phrases outside the table are passed through unchanged and left for the
//! service to interpret.

const TIMEFRAMES: &[(&str, &str)] = &[
    ("last hour", "1h"),
    ("past hour", "1h"),
    ("hour", "1h"),
    ("1 hour", "1h"),
    ("one hour", "1h"),
    ("recent", "1h"),
    ("right now", "1h"),
    ("last 4 hours", "4h"),
    ("last four hours", "4h"),
    ("4 hours", "4h"),
    ("last 12 hours", "12h"),
    ("last twelve hours", "12h"),
    ("12 hours", "12h"),
    ("today", "24h"),
    ("last day", "24h"),
    ("past day", "24h"),
    ("day", "24h"),
    ("last 24 hours", "24h"),
    ("24 hours", "24h"),
    ("yesterday", "24h"),
    ("last week", "7d"),
    ("past week", "7d"),
    ("this week", "7d"),
    ("week", "7d"),
    ("7 days", "7d"),
    ("last 7 days", "7d"),
    ("last seven days", "7d"),
    ("last month", "30d"),
    ("past month", "30d"),
    ("this month", "30d"),
    ("month", "30d"),
    ("30 days", "30d"),
    ("last 30 days", "30d"),
    ("tomorrow", "24h"),
    ("next day", "24h"),
    ("next week", "7d"),
    ("next month", "30d"),
    ("last quarter", "90d"),
    ("quarter", "90d"),
    ("90 days", "90d"),
    ("last 90 days", "90d"),
];

/// Canonical codes accepted by the data service.
pub const CANONICAL_CODES: &[&str] = &["1h", "4h", "12h", "24h", "7d", "30d", "90d"];

/// Normalize a spoken timeframe phrase.
///
/// Leading articles are ignored. Canonical codes map to themselves.
pub fn normalize_timeframe(phrase: &str) -> String {
    let key = phrase.trim().to_lowercase();
    let key = key.strip_prefix("the ").unwrap_or(&key);
    let key = key.strip_prefix("over ").unwrap_or(key);

    if CANONICAL_CODES.contains(&key) {
        return key.to_string();
    }

    TIMEFRAMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| phrase.trim().to_string())
}

/// True when the text is a timeframe phrase rather than, say, a brand.
pub fn is_timeframe_phrase(text: &str) -> bool {
    let normalized = normalize_timeframe(text);
    CANONICAL_CODES.contains(&normalized.as_str())
}

/// Length of a duration code in hours (`"7d"` → 168).
pub fn timeframe_hours(code: &str) -> Option<u64> {
    let code = code.trim();
    if let Some(hours) = code.strip_suffix('h') {
        hours.parse().ok()
    } else if let Some(days) = code.strip_suffix('d') {
        days.parse::<u64>().ok()?.checked_mul(24)
    } else {
        None
    }
}

/// Pick a default timeframe from an investigation focus phrase.
///
/// The focus text is otherwise unused; it only steers how far back the
/// investigation looks. Keywords match whole words, allowing a plural or
/// `-ly` ending ("outages", "weekly").
pub fn timeframe_for_focus(focus: &str, default: &str) -> String {
    let focus = focus.to_lowercase();
    let words: Vec<&str> = focus
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if mentions(&words, &["now", "current", "recent", "active", "ongoing", "outage", "down"]) {
        "1h".to_string()
    } else if mentions(&words, &["week", "trend", "pattern", "history"]) {
        "7d".to_string()
    } else if mentions(&words, &["month"]) {
        "30d".to_string()
    } else {
        default.to_string()
    }
}

fn mentions(words: &[&str], keywords: &[&str]) -> bool {
    words.iter().any(|&word| {
        let stem = word
            .strip_suffix("ly")
            .or_else(|| word.strip_suffix('s'))
            .unwrap_or(word);
        keywords.contains(&word) || keywords.contains(&stem)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_phrases() {
        assert_eq!(normalize_timeframe("last hour"), "1h");
        assert_eq!(normalize_timeframe("the last week"), "7d");
        assert_eq!(normalize_timeframe("Today"), "24h");
        assert_eq!(normalize_timeframe("last 30 days"), "30d");
    }

    #[test]
    fn test_canonical_codes_are_fixed_points() {
        for code in CANONICAL_CODES {
            assert_eq!(normalize_timeframe(code), *code);
        }
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(normalize_timeframe("since tuesday"), "since tuesday");
        assert_eq!(normalize_timeframe("  fortnight "), "fortnight");
    }

    #[test]
    fn test_is_timeframe_phrase() {
        assert!(is_timeframe_phrase("today"));
        assert!(is_timeframe_phrase("the last week"));
        assert!(!is_timeframe_phrase("bww"));
    }

    #[test]
    fn test_timeframe_hours() {
        assert_eq!(timeframe_hours("1h"), Some(1));
        assert_eq!(timeframe_hours("7d"), Some(168));
        assert_eq!(timeframe_hours("since tuesday"), None);
    }

    #[test]
    fn test_timeframe_hours_overflow_is_unusable() {
        assert_eq!(timeframe_hours("999999999999999999d"), None);
        assert_eq!(timeframe_hours("99999999999999999999h"), None);
        assert_eq!(timeframe_hours("768614336404564650d"), Some(768614336404564650 * 24));
    }

    #[test]
    fn test_focus_timeframe() {
        assert_eq!(timeframe_for_focus("current outage", "24h"), "1h");
        assert_eq!(timeframe_for_focus("weekly trends", "24h"), "7d");
        assert_eq!(timeframe_for_focus("malware", "24h"), "24h");
        assert_eq!(timeframe_for_focus("recent outages", "24h"), "1h");
        assert_eq!(timeframe_for_focus("monthly review", "24h"), "30d");
    }

    #[test]
    fn test_focus_keywords_match_whole_words() {
        assert_eq!(timeframe_for_focus("unknown downloads", "24h"), "24h");
        assert_eq!(timeframe_for_focus("inactive accounts", "24h"), "24h");
        assert_eq!(timeframe_for_focus("knowledge base", "24h"), "24h");
        assert_eq!(timeframe_for_focus("network down", "24h"), "1h");
    }
}
