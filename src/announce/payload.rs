//! Typed response payloads, one per endpoint family.
//!
//! Every field defaults when missing. Numeric fields also accept strings
//! such as `"94.4%"` or `"1,250"`, and arrays where a count is expected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{BrandCode, BulkAction, ReportType, Severity};
use crate::error::{Result, ServiceError};
use crate::service::Endpoint;

// ============================================================================
// Lenient Field Parsing
// ============================================================================

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn to_f64(value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s
                .trim()
                .trim_end_matches('%')
                .trim()
                .replace(',', "")
                .parse()
                .unwrap_or(0.0),
            Value::Array(items) => items.len() as f64,
            _ => 0.0,
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(to_f64(&Value::deserialize(d)?))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(to_f64(&Value::deserialize(d)?).max(0.0).round() as u64)
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            other => Some(to_f64(&other)),
        })
    }
}

/// Decode a payload, mapping shape errors to a malformed-response error.
pub fn decode<T: DeserializeOwned>(endpoint: &Endpoint, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        ServiceError::Malformed {
            endpoint: endpoint.path.clone(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Descend into `data` (and then `inner`) when the service wraps its body.
pub fn unwrap_envelope(value: Value, inner: &str) -> Value {
    let value = match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    match value {
        Value::Object(mut map) if map.get(inner).is_some_and(Value::is_object) => {
            map.remove(inner).unwrap_or_default()
        }
        other => other,
    }
}

/// Blocked over total as a percentage. A zero total counts as one.
pub fn block_rate(blocked: u64, total: u64) -> f64 {
    blocked as f64 * 100.0 / total.max(1) as f64
}

// ============================================================================
// Shared Pieces
// ============================================================================

/// A named item with a count, e.g. a top threat or blocked category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedCount {
    #[serde(alias = "category", alias = "url")]
    pub name: String,
    #[serde(deserialize_with = "lenient::count")]
    pub count: u64,
    pub severity: Option<String>,
}

// ============================================================================
// Brand and Store
// ============================================================================

/// `brands/{brand}/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandSummary {
    pub brand: Option<String>,
    #[serde(alias = "store_count", deserialize_with = "lenient::count")]
    pub total_stores: u64,
    #[serde(alias = "stores_online", deserialize_with = "lenient::count")]
    pub online_stores: u64,
    #[serde(alias = "stores_offline", deserialize_with = "lenient::count")]
    pub offline_stores: u64,
    #[serde(alias = "average_health_score", deserialize_with = "lenient::number")]
    pub health_score: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub critical_alerts: u64,
}

/// `stores/{brand}/{store}/security`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthMetrics {
    pub device_name: Option<String>,
    #[serde(alias = "security_score", deserialize_with = "lenient::number")]
    pub health_score: f64,
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub security_events: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub critical_events: u64,
    pub recommendations: Vec<String>,
}

impl HealthMetrics {
    pub fn from_response(endpoint: &Endpoint, value: Value) -> Result<Self> {
        decode(endpoint, unwrap_envelope(value, "store_security_health"))
    }
}

/// `stores/{brand}/{store}/url-blocking`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingSummary {
    #[serde(alias = "total_events", deserialize_with = "lenient::count")]
    pub total_requests: u64,
    #[serde(alias = "blocked_requests", deserialize_with = "lenient::count")]
    pub total_blocks: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub users_affected: u64,
    #[serde(alias = "top_categories")]
    pub top_blocked_categories: Vec<NamedCount>,
}

impl BlockingSummary {
    pub fn from_response(endpoint: &Endpoint, value: Value) -> Result<Self> {
        decode(endpoint, unwrap_envelope(value, "url_blocking_summary"))
    }
}

/// Health and blocking results for one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreInvestigation {
    pub brand: BrandCode,
    pub store_id: String,
    pub timeframe: String,
    pub health: HealthMetrics,
    pub blocking: BlockingSummary,
}

// ============================================================================
// FortiAnalyzer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatCounts {
    #[serde(deserialize_with = "lenient::count")]
    pub total_threats: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub blocked_threats: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub malware_detections: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub intrusion_attempts: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub web_filtering_blocks: u64,
}

impl ThreatCounts {
    pub fn block_rate(&self) -> f64 {
        block_rate(self.blocked_threats, self.total_threats)
    }
}

/// `fortianalyzer/threats/{brand}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatSummary {
    pub brand: Option<String>,
    pub timeframe: Option<String>,
    pub threat_summary: ThreatCounts,
    pub top_threats: Vec<NamedCount>,
    pub affected_stores: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ThreatSummary {
    /// Combine per-brand summaries into one fleet-wide summary.
    pub fn merge(summaries: impl IntoIterator<Item = ThreatSummary>) -> Self {
        let mut merged = ThreatSummary::default();
        for summary in summaries {
            let counts = &mut merged.threat_summary;
            let other = &summary.threat_summary;
            counts.total_threats = counts.total_threats.saturating_add(other.total_threats);
            counts.blocked_threats = counts.blocked_threats.saturating_add(other.blocked_threats);
            counts.malware_detections =
                counts.malware_detections.saturating_add(other.malware_detections);
            counts.intrusion_attempts =
                counts.intrusion_attempts.saturating_add(other.intrusion_attempts);
            counts.web_filtering_blocks =
                counts.web_filtering_blocks.saturating_add(other.web_filtering_blocks);

            if merged.timeframe.is_none() {
                merged.timeframe = summary.timeframe;
            }
            merged.top_threats.extend(summary.top_threats);
            for store in summary.affected_stores {
                if !merged.affected_stores.contains(&store) {
                    merged.affected_stores.push(store);
                }
            }
        }
        merged.top_threats.sort_by(|a, b| b.count.cmp(&a.count));
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogAnalysis {
    #[serde(deserialize_with = "lenient::count")]
    pub total_events: u64,
    pub insights: Vec<String>,
}

/// `fortianalyzer/search` and `fortianalyzer/logs/{brand}/{store}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSearchSummary {
    pub query: Option<String>,
    pub brand_filter: Option<String>,
    pub device_name: Option<String>,
    pub timeframe: Option<String>,
    #[serde(alias = "total_logs", deserialize_with = "lenient::count")]
    pub total_matches: u64,
    pub results: Vec<Value>,
    pub analysis: LogAnalysis,
    pub message: Option<String>,
}

impl LogSearchSummary {
    /// Reported total, or the number of returned results when absent.
    pub fn match_count(&self) -> u64 {
        if self.total_matches == 0 {
            self.results.len() as u64
        } else {
            self.total_matches
        }
    }
}

/// Severity-filtered events, read from a log search.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityEventsSummary {
    pub severity: Severity,
    pub brand: Option<BrandCode>,
    pub events: LogSearchSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportInfo {
    pub brand: Option<String>,
    pub store_id: Option<String>,
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutiveSummary {
    pub overall_security_posture: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_events_analyzed: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub threats_blocked: u64,
    /// Arrives either as a number or as a percentage string
    #[serde(deserialize_with = "lenient::optional_number")]
    pub threat_block_rate: Option<f64>,
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceItem {
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceStatus {
    pub pci_compliance: ComplianceItem,
}

/// `fortianalyzer/reports/{brand}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    #[serde(skip)]
    pub report_type: ReportType,
    pub report_info: ReportInfo,
    pub executive_summary: ExecutiveSummary,
    pub compliance_status: ComplianceStatus,
    pub recommendations: Vec<String>,
}

impl ReportSummary {
    /// Reported block rate, else derived from blocked over analyzed.
    pub fn block_rate(&self) -> f64 {
        let summary = &self.executive_summary;
        summary
            .threat_block_rate
            .unwrap_or_else(|| block_rate(summary.threats_blocked, summary.total_events_analyzed))
    }
}

// ============================================================================
// Web Filters
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterEffectiveness {
    #[serde(deserialize_with = "lenient::count")]
    pub blocked_requests: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub total_requests: u64,
}

/// `webfilters/status`, `webfilters/policies` and `webfilters/{brand}/{store}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebFilterStatus {
    pub brand: Option<String>,
    pub store_id: Option<String>,
    pub server_running: bool,
    pub application_ready: bool,
    pub features: Vec<Feature>,
    #[serde(alias = "policies")]
    pub active_policies: Vec<Value>,
    pub blocked_categories: Vec<Value>,
    pub filter_effectiveness: FilterEffectiveness,
}

// ============================================================================
// System
// ============================================================================

/// `integration/status`, plus the probed intelligence capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub integrations_available: bool,
    pub unified_platform_status: Option<String>,
    pub active_managers: Vec<String>,
    pub integrated_projects: serde_json::Map<String, Value>,
    #[serde(skip)]
    pub intelligence_available: bool,
}

/// Per-brand results of a bulk operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkSummary {
    pub action: BulkAction,
    pub focus: Option<String>,
    pub brands: Vec<(BrandCode, BrandSummary)>,
    pub failed: Vec<BrandCode>,
}

// ============================================================================
// Intelligence
// ============================================================================

/// A detected pattern, prediction or insight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(alias = "analysis_summary")]
    pub description: String,
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub confidence: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub probability: f64,
    pub affected_entity: Option<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternStats {
    #[serde(deserialize_with = "lenient::count")]
    pub high_confidence_patterns: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub critical_severity: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub total_recommendations: u64,
}

/// `ltm/patterns/analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFindings {
    #[serde(deserialize_with = "lenient::count")]
    pub patterns_detected: u64,
    pub patterns: Vec<Finding>,
    pub summary: PatternStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionStats {
    #[serde(deserialize_with = "lenient::count")]
    pub high_confidence_predictions: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub high_probability_events: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub critical_predictions: u64,
}

/// `ltm/predictions/generate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionFindings {
    #[serde(deserialize_with = "lenient::count")]
    pub predictions_generated: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub time_horizon_days: u64,
    pub predictions: Vec<Finding>,
    pub summary: PredictionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPath {
    pub source_node: String,
    pub target_node: String,
    #[serde(deserialize_with = "lenient::number")]
    pub risk_score: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub shortest_path_length: u64,
    pub analysis_summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPathStats {
    #[serde(deserialize_with = "lenient::count")]
    pub high_risk_paths: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub short_attack_paths: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub total_potential_paths: u64,
}

/// `ltm/graph/attack-paths`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPathFindings {
    #[serde(deserialize_with = "lenient::count")]
    pub attack_paths_analyzed: u64,
    pub attack_paths: Vec<AttackPath>,
    pub summary: AttackPathStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivity {
    #[serde(deserialize_with = "lenient::count")]
    pub patterns_detected_24h: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub predictions_generated: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub high_confidence_patterns: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub critical_predictions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelligenceAnalytics {
    pub recent_activity: RecentActivity,
    pub voice_insights: Vec<Finding>,
}

/// `ltm/analytics/insights`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightFindings {
    pub ltm_analytics: IntelligenceAnalytics,
    pub system_health: Option<String>,
}

/// Intelligence results, one variant per request kind.
#[derive(Debug, Clone, PartialEq)]
pub enum IntelligenceFindings {
    Patterns {
        brand: Option<BrandCode>,
        findings: PatternFindings,
    },
    Correlation(PatternFindings),
    Predictions {
        brand: Option<BrandCode>,
        findings: PredictionFindings,
    },
    AttackPaths {
        brand: Option<BrandCode>,
        findings: AttackPathFindings,
    },
    Insights(InsightFindings),
}

// ============================================================================
// Result Payload
// ============================================================================

/// Everything the announcer knows how to speak.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    BrandOverview {
        brand: BrandCode,
        summary: BrandSummary,
    },
    StoreInvestigation(StoreInvestigation),
    StoreLogs {
        brand: BrandCode,
        store_id: String,
        logs: LogSearchSummary,
    },
    Threats {
        brand: Option<BrandCode>,
        timeframe: String,
        summary: ThreatSummary,
    },
    LogSearch(LogSearchSummary),
    SecurityEvents(SecurityEventsSummary),
    WebFilter(WebFilterStatus),
    Report(ReportSummary),
    SystemStatus(SystemStatus),
    Bulk(BulkSummary),
    Intelligence(IntelligenceFindings),
}
