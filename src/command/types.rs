//! Types for the voice command system.

use serde::{Deserialize, Serialize};

// ============================================================================
// Dashboard Sections
// ============================================================================

/// Top-level dashboard sections a command can navigate to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Overview,
    Investigation,
    FortiAnalyzer,
    WebFilters,
    Reports,
    Analytics,
    Intelligence,
    Settings,
}

impl Section {
    /// Element id of the section on the dashboard page.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Investigation => "investigation",
            Self::FortiAnalyzer => "fortianalyzer",
            Self::WebFilters => "webfilters",
            Self::Reports => "reports",
            Self::Analytics => "analytics",
            Self::Intelligence => "intelligence",
            Self::Settings => "settings",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Investigation => "store investigation",
            Self::FortiAnalyzer => "FortiAnalyzer logs",
            Self::WebFilters => "web filters",
            Self::Reports => "reports",
            Self::Analytics => "analytics",
            Self::Intelligence => "network intelligence",
            Self::Settings => "settings",
        }
    }

    /// Parse a spoken section name.
    pub fn from_spoken(name: &str) -> Option<Self> {
        match name.trim() {
            "overview" | "home" | "dashboard" | "main" => Some(Self::Overview),
            "investigation" | "investigations" | "investigate" | "stores" => {
                Some(Self::Investigation)
            }
            "fortianalyzer" | "logs" | "log" | "security logs" => Some(Self::FortiAnalyzer),
            "web filters" | "web filter" | "web filtering" | "filters" => Some(Self::WebFilters),
            "reports" | "report" | "reporting" => Some(Self::Reports),
            "analytics" => Some(Self::Analytics),
            "intelligence" | "ltm" => Some(Self::Intelligence),
            "settings" | "preferences" => Some(Self::Settings),
            _ => None,
        }
    }
}

// ============================================================================
// Intent Fields
// ============================================================================

/// Security event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "critical" | "severe" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" | "moderate" => Some(Self::Medium),
            "low" | "minor" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Kind of report to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Security,
    Compliance,
    Executive,
    Threat,
    Traffic,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Compliance => "compliance",
            Self::Executive => "executive",
            Self::Threat => "threat",
            Self::Traffic => "traffic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "security" => Some(Self::Security),
            "compliance" | "pci" => Some(Self::Compliance),
            "executive" | "summary" => Some(Self::Executive),
            "threat" => Some(Self::Threat),
            "traffic" | "bandwidth" => Some(Self::Traffic),
            _ => None,
        }
    }
}

/// Log source a search can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    FortiAnalyzer,
    WebFilter,
    Firewall,
    Traffic,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FortiAnalyzer => "fortianalyzer",
            Self::WebFilter => "webfilter",
            Self::Firewall => "firewall",
            Self::Traffic => "traffic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "fortianalyzer" | "analyzer" => Some(Self::FortiAnalyzer),
            "web filter" | "webfilter" | "web" => Some(Self::WebFilter),
            "firewall" | "fortigate" => Some(Self::Firewall),
            "traffic" => Some(Self::Traffic),
            _ => None,
        }
    }
}

/// What a bulk operation does to every store in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    SecurityCheck,
    Scan,
    Analyze,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityCheck => "security check",
            Self::Scan => "scan",
            Self::Analyze => "analysis",
        }
    }

    pub fn from_verb(verb: &str) -> Self {
        match verb.trim() {
            "scan" | "sweep" => Self::Scan,
            "analyze" | "analysis" | "investigate" => Self::Analyze,
            _ => Self::SecurityCheck,
        }
    }
}

// ============================================================================
// Intent
// ============================================================================

/// Intelligence-subsystem intents. All of them are capability-gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelligenceIntent {
    PatternAnalysis { brand: Option<String> },
    Prediction { brand: Option<String>, timeframe: Option<String> },
    Correlation,
    AttackPaths { brand: Option<String> },
    Insights,
}

impl IntelligenceIntent {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PatternAnalysis { .. } => "pattern analysis",
            Self::Prediction { .. } => "predictive analysis",
            Self::Correlation => "correlation analysis",
            Self::AttackPaths { .. } => "attack path analysis",
            Self::Insights => "network insights",
        }
    }
}

/// Structured interpretation of one utterance.
///
/// Brand and timeframe fields hold the captured text; handlers normalize
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Navigate {
        section: Section,
    },
    BrandOverview {
        brand: String,
    },
    InvestigateStore {
        brand: String,
        store_id: String,
        focus: Option<String>,
    },
    SearchLogs {
        query: String,
        brand: Option<String>,
        source: Option<LogSource>,
        timeframe: Option<String>,
    },
    SecurityEvents {
        severity: Severity,
        brand: Option<String>,
    },
    ThreatIntelligence {
        brand: Option<String>,
        timeframe: Option<String>,
    },
    WebFilterStatus {
        brand: Option<String>,
        store_id: Option<String>,
    },
    SystemHealth,
    GenerateReport {
        report_type: ReportType,
        brand: Option<String>,
        store_id: Option<String>,
        timeframe: Option<String>,
    },
    ShowMore,
    GoBack,
    Emergency {
        brand: Option<String>,
        store_id: Option<String>,
        description: Option<String>,
    },
    BulkOperation {
        action: BulkAction,
        brand: Option<String>,
        focus: Option<String>,
    },
    Intelligence {
        request: IntelligenceIntent,
    },
    Help,
    StopSpeaking,
    Repeat,
}

impl Intent {
    /// Stable intent name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::BrandOverview { .. } => "brand_overview",
            Self::InvestigateStore { .. } => "store_investigation",
            Self::SearchLogs { .. } => "log_search",
            Self::SecurityEvents { .. } => "security_events",
            Self::ThreatIntelligence { .. } => "threat_intelligence",
            Self::WebFilterStatus { .. } => "web_filter_status",
            Self::SystemHealth => "system_health",
            Self::GenerateReport { .. } => "generate_report",
            Self::ShowMore => "show_more",
            Self::GoBack => "go_back",
            Self::Emergency { .. } => "emergency",
            Self::BulkOperation { .. } => "bulk_operation",
            Self::Intelligence { .. } => "intelligence",
            Self::Help => "help",
            Self::StopSpeaking => "stop_speaking",
            Self::Repeat => "repeat",
        }
    }
}

/// Grammar domains. Used to group rules and in the pattern listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Navigation,
    Investigation,
    Search,
    Reporting,
    System,
    Emergency,
    Bulk,
    Analytics,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Investigation => "investigation",
            Self::Search => "search",
            Self::Reporting => "reporting",
            Self::System => "system",
            Self::Emergency => "emergency",
            Self::Bulk => "bulk",
            Self::Analytics => "analytics",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_from_spoken() {
        assert_eq!(Section::from_spoken("home"), Some(Section::Overview));
        assert_eq!(Section::from_spoken("web filters"), Some(Section::WebFilters));
        assert_eq!(Section::from_spoken("logs"), Some(Section::FortiAnalyzer));
        assert_eq!(Section::from_spoken("kitchen"), None);
    }

    #[test]
    fn test_intent_serializes_with_tag() {
        let intent = Intent::InvestigateStore {
            brand: "bww".to_string(),
            store_id: "155".to_string(),
            focus: None,
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["intent"], "investigate_store");
        assert_eq!(json["store_id"], "155");
        assert_eq!(intent.name(), "store_investigation");
    }

    #[test]
    fn test_field_parsers() {
        assert_eq!(Severity::parse("severe"), Some(Severity::Critical));
        assert_eq!(ReportType::parse("pci"), Some(ReportType::Compliance));
        assert_eq!(LogSource::parse("web filter"), Some(LogSource::WebFilter));
        assert_eq!(BulkAction::from_verb("check"), BulkAction::SecurityCheck);
    }
}
