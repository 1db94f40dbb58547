//! Payload to speech.
//!
//! All functions here are pure. Result announcements run three to six
//! sentences; confirmations and fixed messages are shorter.

use crate::command::{BrandCode, IntelligenceIntent, ReportType, Section, Severity};

use super::payload::*;

/// Upper bound on sentences in one announcement.
pub const MAX_SENTENCES: usize = 6;

pub const UNRECOGNIZED: &str =
    "Command not recognized. Say help to hear the commands you can use.";
pub const NO_ADDITIONAL_DETAILS: &str = "No additional details available.";
pub const NO_DETAILS_FOR_VIEW: &str = "No additional details are available for this view.";
pub const INTELLIGENCE_UNAVAILABLE: &str = "The intelligence subsystem is not available.";
pub const RETURNING_TO_OVERVIEW: &str = "Returning to the overview.";
pub const NOTHING_TO_REPEAT: &str = "There is nothing to repeat yet.";

// ============================================================================
// Tiers
// ============================================================================

/// Quality tier for a block rate in percent.
pub fn threat_tier(rate: f64) -> &'static str {
    if rate > 95.0 {
        "excellent"
    } else if rate > 90.0 {
        "good"
    } else {
        "needs attention"
    }
}

/// Quality tier for a 0-100 health score.
pub fn health_tier(score: f64) -> &'static str {
    if score > 90.0 {
        "excellent"
    } else if score > 75.0 {
        "good"
    } else if score > 50.0 {
        "fair"
    } else {
        "poor"
    }
}

/// Recommendations derived from threat counts. Never empty.
pub fn threat_recommendations(counts: &ThreatCounts) -> Vec<&'static str> {
    let mut recommendations = Vec::new();
    if counts.total_threats > 1000 {
        recommendations.push("High threat volume detected, consider additional security measures.");
    }
    if counts.block_rate() < 90.0 {
        recommendations.push("Threat block rate is below 90 percent, review security policies.");
    }
    if recommendations.is_empty() {
        recommendations.push("Threat protection is operating effectively.");
    }
    recommendations
}

/// Spoken form of a timeframe code.
pub fn describe_timeframe(code: &str) -> String {
    match code {
        "1h" => "the last hour".to_string(),
        "4h" => "the last 4 hours".to_string(),
        "12h" => "the last 12 hours".to_string(),
        "24h" => "the last 24 hours".to_string(),
        "7d" => "the last 7 days".to_string(),
        "30d" => "the last 30 days".to_string(),
        "90d" => "the last 90 days".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Sentence Builder
// ============================================================================

#[derive(Debug, Default)]
struct Sentences(Vec<String>);

impl Sentences {
    fn push(&mut self, sentence: impl Into<String>) {
        let sentence = sentence.into();
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return;
        }
        if sentence.ends_with(['.', '!', '?']) {
            self.0.push(sentence.to_string());
        } else {
            self.0.push(format!("{}.", sentence));
        }
    }

    fn finish(self) -> String {
        self.0
            .into_iter()
            .take(MAX_SENTENCES)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

fn scope(brand: Option<&BrandCode>) -> String {
    brand
        .map(|b| b.display_name().to_string())
        .unwrap_or_else(|| "all brands".to_string())
}

// ============================================================================
// Result Announcements
// ============================================================================

/// Speak a result payload.
pub fn announce(payload: &ResultPayload) -> String {
    match payload {
        ResultPayload::BrandOverview { brand, summary } => announce_brand_overview(brand, summary),
        ResultPayload::StoreInvestigation(investigation) => {
            announce_store_investigation(investigation)
        }
        ResultPayload::StoreLogs {
            brand,
            store_id,
            logs,
        } => announce_store_logs(brand, store_id, logs),
        ResultPayload::Threats {
            brand,
            timeframe,
            summary,
        } => announce_threats(brand.as_ref(), timeframe, summary),
        ResultPayload::LogSearch(summary) => announce_log_search(summary),
        ResultPayload::SecurityEvents(summary) => announce_security_events(summary),
        ResultPayload::WebFilter(status) => announce_web_filter(status),
        ResultPayload::Report(report) => announce_report(report),
        ResultPayload::SystemStatus(status) => announce_system_status(status),
        ResultPayload::Bulk(summary) => announce_bulk(summary),
        ResultPayload::Intelligence(findings) => announce_intelligence(findings),
    }
}

pub fn announce_brand_overview(brand: &BrandCode, summary: &BrandSummary) -> String {
    let mut s = Sentences::default();
    s.push(format!("{} overview loaded", brand.display_name()));
    if summary.total_stores == 0 {
        s.push("No store count was reported");
    } else {
        s.push(format!(
            "{} of {} stores are online",
            summary.online_stores, summary.total_stores
        ));
    }
    s.push(format!(
        "Average health score is {:.0}, rated {}",
        summary.health_score,
        health_tier(summary.health_score)
    ));
    if summary.offline_stores > 0 {
        s.push(format!(
            "{} offline",
            plural(summary.offline_stores, "store is", "stores are")
        ));
    }
    if summary.critical_alerts > 0 {
        s.push(format!(
            "{} need attention",
            plural(summary.critical_alerts, "critical alert", "critical alerts")
        ));
    }
    s.finish()
}

pub fn announce_store_investigation(investigation: &StoreInvestigation) -> String {
    let health = &investigation.health;
    let blocking = &investigation.blocking;
    let mut s = Sentences::default();
    s.push(format!(
        "Investigation of {} store {} complete",
        investigation.brand.display_name(),
        investigation.store_id
    ));
    s.push(format!(
        "Security health score is {:.0} out of 100, rated {}",
        health.health_score,
        health_tier(health.health_score)
    ));
    if health.critical_events > 0 {
        s.push(format!(
            "{} in {}",
            plural(health.critical_events, "critical security event", "critical security events"),
            describe_timeframe(&investigation.timeframe)
        ));
    } else {
        s.push(format!(
            "No critical security events in {}",
            describe_timeframe(&investigation.timeframe)
        ));
    }
    s.push(format!(
        "{} blocked out of {}",
        plural(blocking.total_blocks, "request", "requests"),
        blocking.total_requests
    ));
    if let Some(top) = blocking.top_blocked_categories.first() {
        s.push(format!("Most blocked category is {}", top.name));
    }
    if let Some(recommendation) = health.recommendations.first() {
        s.push(recommendation.as_str());
    }
    s.finish()
}

pub fn announce_store_logs(brand: &BrandCode, store_id: &str, logs: &LogSearchSummary) -> String {
    let mut s = Sentences::default();
    s.push(format!(
        "Showing detailed logs for {} store {}",
        brand.display_name(),
        store_id
    ));
    s.push(format!(
        "{} found",
        plural(logs.match_count(), "log entry", "log entries")
    ));
    if logs.analysis.insights.is_empty() {
        s.push("No notable activity stands out in these logs");
    } else {
        for insight in logs.analysis.insights.iter().take(3) {
            s.push(insight.as_str());
        }
    }
    s.finish()
}

pub fn announce_threats(brand: Option<&BrandCode>, timeframe: &str, summary: &ThreatSummary) -> String {
    let counts = &summary.threat_summary;
    let rate = counts.block_rate();
    let mut s = Sentences::default();
    s.push(format!(
        "Threat intelligence for {} over {}",
        scope(brand),
        describe_timeframe(timeframe)
    ));
    s.push(format!(
        "{} detected and {} blocked",
        plural(counts.total_threats, "threat", "threats"),
        counts.blocked_threats
    ));
    s.push(format!("Block rate is {:.1} percent, rated {}", rate, threat_tier(rate)));
    if let Some(top) = summary.top_threats.first() {
        s.push(format!(
            "Top threat is {} with {}",
            top.name,
            plural(top.count, "event", "events")
        ));
    }
    if !summary.affected_stores.is_empty() {
        s.push(format!(
            "{} affected",
            plural(summary.affected_stores.len() as u64, "store", "stores")
        ));
    }
    if let Some(recommendation) = threat_recommendations(counts).first() {
        s.push(*recommendation);
    }
    s.finish()
}

pub fn announce_log_search(summary: &LogSearchSummary) -> String {
    let count = summary.match_count();
    let mut s = Sentences::default();
    match summary.query.as_deref() {
        Some(query) => s.push(format!("Search for {} complete", query)),
        None => s.push("Log search complete"),
    }
    let mut found = format!("Found {}", plural(count, "matching log entry", "matching log entries"));
    if let Some(brand) = summary.brand_filter.as_deref() {
        found.push_str(&format!(" for {}", BrandCode::normalize(brand).display_name()));
    }
    if let Some(timeframe) = summary.timeframe.as_deref() {
        found.push_str(&format!(" in {}", describe_timeframe(timeframe)));
    }
    s.push(found);
    if count == 0 {
        s.push("Try a broader timeframe or a different search term");
    } else {
        s.push("Results are shown in the FortiAnalyzer section");
    }
    if let Some(insight) = summary.analysis.insights.first() {
        s.push(insight.as_str());
    }
    s.finish()
}

pub fn announce_security_events(summary: &SecurityEventsSummary) -> String {
    let severity = summary.severity.as_str();
    let count = summary.events.match_count();
    let mut s = Sentences::default();
    match summary.brand.as_ref() {
        Some(brand) => s.push(format!(
            "Filtering {} security events for {}",
            severity,
            brand.display_name()
        )),
        None => s.push(format!("Filtering {} security events across all brands", severity)),
    }
    s.push(format!("Found {} {} events", count, severity));
    if count == 0 {
        s.push(format!("No {} events need review", severity));
    } else {
        s.push("Review them in the FortiAnalyzer section");
    }
    if summary.severity == Severity::Critical && count > 0 {
        s.push("Critical events should be investigated immediately");
    }
    s.finish()
}

pub fn announce_web_filter(status: &WebFilterStatus) -> String {
    let mut s = Sentences::default();
    match (status.brand.as_deref(), status.store_id.as_deref()) {
        (Some(brand), Some(store)) => s.push(format!(
            "Web filter status for {} store {}",
            BrandCode::normalize(brand).display_name(),
            store
        )),
        (Some(brand), None) => s.push(format!(
            "Web filter policies for {}",
            BrandCode::normalize(brand).display_name()
        )),
        _ => s.push("Web filter status loaded"),
    }
    if status.server_running {
        s.push("The web filter server is running");
    } else {
        s.push("The web filter server is not running");
    }
    s.push(format!(
        "{} and {}",
        plural(status.active_policies.len() as u64, "active policy", "active policies"),
        plural(
            status.blocked_categories.len() as u64,
            "blocked category",
            "blocked categories"
        )
    ));
    let effectiveness = &status.filter_effectiveness;
    if effectiveness.total_requests > 0 {
        s.push(format!(
            "Blocked {} of {} requests, {:.1} percent",
            effectiveness.blocked_requests,
            effectiveness.total_requests,
            block_rate(effectiveness.blocked_requests, effectiveness.total_requests)
        ));
    }
    if !status.features.is_empty() {
        let available = status.features.iter().filter(|f| f.available).count();
        s.push(format!(
            "{} of {} features available",
            available,
            status.features.len()
        ));
    }
    s.finish()
}

pub fn announce_report(report: &ReportSummary) -> String {
    let info = &report.report_info;
    let summary = &report.executive_summary;
    let rate = report.block_rate();
    let mut s = Sentences::default();

    let brand = info
        .brand
        .as_deref()
        .map(|b| BrandCode::normalize(b).display_name().to_string())
        .unwrap_or_else(|| "all brands".to_string());
    let mut title = format!("{} report generated for {}", report_type_name(report.report_type), brand);
    if let Some(store) = info.store_id.as_deref() {
        title.push_str(&format!(" store {}", store));
    }
    s.push(title);

    match summary.overall_security_posture.as_deref() {
        Some(posture) => s.push(format!("Overall security posture is {}", posture)),
        None => s.push("Overall security posture was not reported"),
    }
    s.push(format!(
        "Threat block rate is {:.1} percent, rated {}",
        rate,
        threat_tier(rate)
    ));
    s.push(format!(
        "{} analyzed",
        plural(summary.total_events_analyzed, "event", "events")
    ));
    let pci = &report.compliance_status.pci_compliance;
    if let Some(status) = pci.status.as_deref() {
        s.push(format!(
            "PCI compliance is {} with a score of {:.1}",
            status, pci.score
        ));
    }
    if let Some(finding) = summary
        .key_findings
        .first()
        .or_else(|| report.recommendations.first())
    {
        s.push(finding.as_str());
    }
    s.finish()
}

fn report_type_name(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Security => "Security",
        ReportType::Compliance => "Compliance",
        ReportType::Executive => "Executive",
        ReportType::Threat => "Threat",
        ReportType::Traffic => "Traffic",
    }
}

pub fn announce_system_status(status: &SystemStatus) -> String {
    let mut s = Sentences::default();
    s.push("System status check complete");
    if status.integrations_available {
        s.push("All integrations are available");
    } else {
        s.push("Integrations are running with limited functionality");
    }
    if status.active_managers.is_empty() {
        match status.unified_platform_status.as_deref() {
            Some(platform) => s.push(format!(
                "Platform status is {}",
                platform.replace('_', " ")
            )),
            None => s.push("No integration managers reported"),
        }
    } else {
        s.push(format!(
            "{} active",
            plural(
                status.active_managers.len() as u64,
                "integration manager is",
                "integration managers are"
            )
        ));
    }
    if status.intelligence_available {
        s.push("The intelligence subsystem is available");
    } else {
        s.push(INTELLIGENCE_UNAVAILABLE);
    }
    s.finish()
}

pub fn announce_bulk(summary: &BulkSummary) -> String {
    let mut s = Sentences::default();
    s.push(format!(
        "Bulk {} complete across {}",
        summary.action.as_str(),
        plural(summary.brands.len() as u64, "brand", "brands")
    ));
    if summary.brands.is_empty() {
        s.push("No store data was returned");
        s.push("Check the data service connection and try again");
    } else {
        let (online, total) =
            summary
                .brands
                .iter()
                .fold((0u64, 0u64), |(online, total), (_, b)| {
                    (
                        online.saturating_add(b.online_stores),
                        total.saturating_add(b.total_stores),
                    )
                });
        s.push(format!("{} of {} stores are online", online, total));
        if let Some((brand, worst)) = summary
            .brands
            .iter()
            .min_by(|a, b| a.1.health_score.total_cmp(&b.1.health_score))
        {
            s.push(format!(
                "Lowest average health is {} at {:.0}, rated {}",
                brand.display_name(),
                worst.health_score,
                health_tier(worst.health_score)
            ));
        }
    }
    if !summary.failed.is_empty() {
        let names: Vec<_> = summary.failed.iter().map(|b| b.display_name()).collect();
        s.push(format!("Could not load data for {}", names.join(" and ")));
    }
    if let Some(focus) = summary.focus.as_deref() {
        s.push(format!("Focus was {}", focus));
    }
    s.finish()
}

pub fn announce_intelligence(findings: &IntelligenceFindings) -> String {
    let mut s = Sentences::default();
    match findings {
        IntelligenceFindings::Patterns { brand, findings } => {
            match brand {
                Some(brand) => s.push(format!(
                    "Pattern analysis complete for {}",
                    brand.display_name()
                )),
                None => s.push("Pattern analysis complete"),
            }
            pattern_sentences(&mut s, findings);
        }
        IntelligenceFindings::Correlation(findings) => {
            s.push("Cross-brand correlation analysis complete");
            pattern_sentences(&mut s, findings);
        }
        IntelligenceFindings::Predictions { brand, findings } => {
            let horizon = findings.time_horizon_days.max(1);
            match brand {
                Some(brand) => s.push(format!(
                    "Predictive analysis for {} over the next {}",
                    brand.display_name(),
                    plural(horizon, "day", "days")
                )),
                None => s.push(format!(
                    "Predictive analysis over the next {}",
                    plural(horizon, "day", "days")
                )),
            }
            s.push(format!(
                "{} generated, {} with high probability",
                plural(findings.predictions_generated, "prediction", "predictions"),
                findings.summary.high_probability_events
            ));
            s.push(format!(
                "{} rated critical or high",
                plural(findings.summary.critical_predictions, "prediction is", "predictions are")
            ));
            if let Some(top) = findings.predictions.first() {
                s.push(format!(
                    "Most likely: {} at {:.0} percent probability",
                    top.description.trim_end_matches('.'),
                    top.probability * 100.0
                ));
            }
        }
        IntelligenceFindings::AttackPaths { brand, findings } => {
            match brand {
                Some(brand) => s.push(format!(
                    "Attack path analysis complete for {}",
                    brand.display_name()
                )),
                None => s.push("Attack path analysis complete"),
            }
            s.push(format!(
                "{} analyzed, {} high risk",
                plural(findings.attack_paths_analyzed, "path", "paths"),
                findings.summary.high_risk_paths
            ));
            s.push(format!(
                "{} of three hops or fewer",
                plural(findings.summary.short_attack_paths, "path is", "paths are")
            ));
            if let Some(path) = findings
                .attack_paths
                .iter()
                .max_by(|a, b| a.risk_score.total_cmp(&b.risk_score))
            {
                s.push(format!(
                    "Highest risk runs from {} to {}",
                    path.source_node, path.target_node
                ));
            }
        }
        IntelligenceFindings::Insights(insights) => {
            let activity = &insights.ltm_analytics.recent_activity;
            s.push("Network insights loaded");
            s.push(format!(
                "{} detected in the last 24 hours",
                plural(activity.patterns_detected_24h, "pattern", "patterns")
            ));
            s.push(format!(
                "{} generated, {} critical",
                plural(activity.predictions_generated, "prediction", "predictions"),
                activity.critical_predictions
            ));
            if let Some(insight) = insights.ltm_analytics.voice_insights.first() {
                s.push(insight.description.as_str());
            }
            if let Some(health) = insights.system_health.as_deref() {
                s.push(format!("System health is {}", health));
            }
        }
    }
    s.finish()
}

fn pattern_sentences(s: &mut Sentences, findings: &PatternFindings) {
    s.push(format!(
        "{} detected, {} with high confidence",
        plural(findings.patterns_detected, "pattern", "patterns"),
        findings.summary.high_confidence_patterns
    ));
    if findings.summary.critical_severity > 0 {
        s.push(format!(
            "{} critical",
            plural(findings.summary.critical_severity, "pattern is", "patterns are")
        ));
    } else {
        s.push("None of them are critical");
    }
    if let Some(top) = findings.patterns.first() {
        s.push(format!("Most significant: {}", top.description));
    }
}

// ============================================================================
// Confirmations
// ============================================================================

pub fn navigating_to(section: Section) -> String {
    format!("Navigating to {}.", section.display_name())
}

pub fn loading(what: &str) -> String {
    format!("Loading {}.", what)
}

/// Generic failure for a data call. The view is left as it is.
pub fn failure(what: &str) -> String {
    format!(
        "Unable to complete the {}. The data service did not respond. Please try again.",
        what
    )
}

pub fn intelligence_request(request: &IntelligenceIntent) -> String {
    format!("Running {}.", request.display_name())
}

pub fn restored(section: Section) -> String {
    format!("Returning to {}.", section.display_name())
}

pub fn emergency_alert(brand: Option<&BrandCode>, store_id: Option<&str>, description: Option<&str>) -> String {
    let mut s = Sentences::default();
    s.push("Emergency mode activated");
    match (brand, store_id) {
        (Some(brand), Some(store)) => {
            s.push(format!("Focusing on {} store {}", brand.display_name(), store))
        }
        (Some(brand), None) => s.push(format!("Focusing on {}", brand.display_name())),
        _ => s.push("Focusing on all brands"),
    }
    if let Some(description) = description {
        s.push(format!("Reported issue: {}", description));
    }
    s.push("Searching critical security events from the last hour");
    s.finish()
}

/// Section-aware command suggestions.
pub fn help(section: Section) -> String {
    let suggestions: &[&str] = match section {
        Section::Investigation => &[
            "investigate bww store 155",
            "check web filter status for bww store 155",
            "show more details",
        ],
        Section::FortiAnalyzer => &[
            "search logs for malware over the last hour",
            "show critical security events",
            "check threat intelligence for sonic",
        ],
        Section::Reports => &[
            "generate a security report for arbys",
            "compliance report for bww store 155",
            "go back",
        ],
        _ => &[
            "investigate bww store 155",
            "show the sonic overview",
            "check system status",
        ],
    };
    let mut s = Sentences::default();
    s.push("Here are some things you can say");
    for suggestion in suggestions {
        s.push(format!("Try: {}", suggestion));
    }
    s.push("Say go back to return to the previous view");
    s.finish()
}
