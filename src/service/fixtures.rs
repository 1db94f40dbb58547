//! Canned-payload data service for offline use and tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, ServiceError};

use super::{DataService, Endpoint, EndpointFamily, ServiceResponse};

/// Serves a fixed JSON body per endpoint family and records every call.
///
/// A body registered for an exact path wins over the family body. Families
/// or paths marked as failing return a connection error.
#[derive(Default)]
pub struct StaticDataService {
    responses: HashMap<EndpointFamily, Value>,
    path_responses: HashMap<String, Value>,
    failing_families: HashSet<EndpointFamily>,
    failing_paths: HashSet<String>,
    calls: Mutex<Vec<Endpoint>>,
}

impl StaticDataService {
    /// An empty service. Every call fails with a missing-fixture error.
    pub fn new() -> Self {
        Self::default()
    }

    /// A service loaded with realistic dashboard payloads.
    pub fn demo() -> Self {
        let mut service = Self::new();
        for (family, body) in demo_payloads() {
            service.responses.insert(family, body);
        }
        service
    }

    pub fn with_response(mut self, family: EndpointFamily, body: Value) -> Self {
        self.responses.insert(family, body);
        self
    }

    pub fn with_path_response(mut self, path: &str, body: Value) -> Self {
        self.path_responses.insert(path.to_string(), body);
        self
    }

    pub fn failing(mut self, family: EndpointFamily) -> Self {
        self.failing_families.insert(family);
        self
    }

    pub fn failing_path(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    pub fn without(mut self, family: EndpointFamily) -> Self {
        self.responses.remove(&family);
        self
    }

    /// Every endpoint called so far, oldest first.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, family: EndpointFamily) -> usize {
        self.calls.lock().iter().filter(|e| e.family == family).count()
    }
}

#[async_trait]
impl DataService for StaticDataService {
    async fn call(&self, endpoint: &Endpoint) -> Result<ServiceResponse> {
        debug!("static GET {}", endpoint);
        self.calls.lock().push(endpoint.clone());

        if self.failing_families.contains(&endpoint.family)
            || self.failing_paths.contains(&endpoint.path)
        {
            return Err(ServiceError::Connection {
                endpoint: endpoint.path.clone(),
                message: "connection refused".to_string(),
            }
            .into());
        }

        let body = self
            .path_responses
            .get(&endpoint.path)
            .or_else(|| self.responses.get(&endpoint.family))
            .cloned()
            .ok_or_else(|| ServiceError::NoFixture(endpoint.path.clone()))?;

        Ok(ServiceResponse::from_json(body))
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn demo_payloads() -> Vec<(EndpointFamily, Value)> {
    vec![
        (
            EndpointFamily::BrandOverview,
            json!({
                "success": true,
                "total_stores": 120,
                "online_stores": 117,
                "offline_stores": 3,
                "average_health_score": 91.5,
                "critical_alerts": 2
            }),
        ),
        (
            EndpointFamily::StoreSecurity,
            json!({
                "success": true,
                "data": {
                    "store_security_health": {
                        "device_name": "FGT-STORE-155",
                        "security_score": 87,
                        "status": "online",
                        "security_events": 42,
                        "critical_events": 1,
                        "recommendations": ["Review the blocked malware downloads at this store."]
                    }
                }
            }),
        ),
        (
            EndpointFamily::UrlBlocking,
            json!({
                "success": true,
                "data": {
                    "url_blocking_summary": {
                        "total_requests": 15420,
                        "total_blocks": 312,
                        "users_affected": 18,
                        "top_blocked_categories": [
                            {"category": "Malicious Websites", "count": 140},
                            {"category": "Phishing", "count": 95}
                        ]
                    }
                }
            }),
        ),
        (
            EndpointFamily::StoreLogs,
            json!({
                "success": true,
                "device_name": "FGT-STORE-155",
                "timeframe": "24h",
                "total_logs": 1840,
                "analysis": {
                    "total_events": 1840,
                    "insights": ["Traffic volume is within the normal range."]
                }
            }),
        ),
        (
            EndpointFamily::Threats,
            json!({
                "success": true,
                "timeframe": "24h",
                "threat_summary": {
                    "total_threats": 1250,
                    "blocked_threats": 1180,
                    "malware_detections": 45,
                    "intrusion_attempts": 23,
                    "web_filtering_blocks": 1112
                },
                "top_threats": [
                    {"name": "Malicious.URL.Generic", "count": 156, "severity": "high"},
                    {"name": "Trojan.Win32.Agent", "count": 23, "severity": "critical"}
                ],
                "affected_stores": ["00155", "00234"]
            }),
        ),
        (
            EndpointFamily::LogSearch,
            json!({
                "success": true,
                "total_matches": 27,
                "results": [],
                "analysis": {"insights": ["Most matches come from two stores."]}
            }),
        ),
        (
            EndpointFamily::Report,
            json!({
                "success": true,
                "executive_summary": {
                    "overall_security_posture": "strong",
                    "total_events_analyzed": 12450,
                    "threats_blocked": 1180,
                    "threat_block_rate": "94.4%",
                    "key_findings": ["Web filtering prevented most threats."]
                },
                "compliance_status": {
                    "pci_compliance": {"status": "compliant", "score": 98.5}
                },
                "recommendations": ["Enable additional logging for critical stores."]
            }),
        ),
        (
            EndpointFamily::WebFilterStatus,
            json!({
                "success": true,
                "server_running": true,
                "application_ready": true,
                "features": [
                    {"name": "URL filtering", "available": true},
                    {"name": "Category blocking", "available": true},
                    {"name": "Custom policies", "available": false}
                ]
            }),
        ),
        (
            EndpointFamily::StoreWebFilter,
            json!({
                "success": true,
                "server_running": true,
                "active_policies": [{"name": "default"}, {"name": "guest-wifi"}],
                "blocked_categories": ["gambling", "malware", "phishing"],
                "filter_effectiveness": {"blocked_requests": 312, "total_requests": 15420}
            }),
        ),
        (
            EndpointFamily::WebFilterPolicies,
            json!({
                "success": true,
                "server_running": true,
                "policies": [{"name": "default"}, {"name": "guest-wifi"}, {"name": "kiosk"}]
            }),
        ),
        (
            EndpointFamily::IntegrationStatus,
            json!({
                "success": true,
                "integrations_available": true,
                "unified_platform_status": "fully_operational",
                "active_managers": ["fortimanager", "fortianalyzer", "webfilters"]
            }),
        ),
        (
            EndpointFamily::IntelligenceStatus,
            json!({
                "success": true,
                "ltm_enabled": true,
                "status": {"system_health": "healthy"}
            }),
        ),
        (
            EndpointFamily::Patterns,
            json!({
                "success": true,
                "patterns_detected": 4,
                "patterns": [
                    {
                        "description": "Repeated login failures at the same three stores each evening.",
                        "severity": "high",
                        "confidence": 0.86
                    }
                ],
                "summary": {"high_confidence_patterns": 2, "critical_severity": 1}
            }),
        ),
        (
            EndpointFamily::Predictions,
            json!({
                "success": true,
                "predictions_generated": 3,
                "time_horizon_days": 7,
                "predictions": [
                    {"description": "Elevated phishing volume at Sonic stores.", "probability": 0.72}
                ],
                "summary": {"high_probability_events": 1, "critical_predictions": 0}
            }),
        ),
        (
            EndpointFamily::AttackPaths,
            json!({
                "success": true,
                "attack_paths_analyzed": 5,
                "attack_paths": [
                    {"source_node": "guest-wifi", "target_node": "pos-network", "risk_score": 0.81, "shortest_path_length": 3}
                ],
                "summary": {"high_risk_paths": 1, "short_attack_paths": 2}
            }),
        ),
        (
            EndpointFamily::Insights,
            json!({
                "success": true,
                "ltm_analytics": {
                    "recent_activity": {
                        "patterns_detected_24h": 6,
                        "predictions_generated": 3,
                        "critical_predictions": 1
                    },
                    "voice_insights": [
                        {"description": "Threat volume is trending down this week."}
                    ]
                },
                "system_health": "healthy"
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_covers_every_family() {
        let service = StaticDataService::demo();
        let endpoints = [
            Endpoint::brand_overview("BWW"),
            Endpoint::store_security("BWW", "155"),
            Endpoint::url_blocking("BWW", "155", "24h"),
            Endpoint::store_logs("BWW", "155", "24h"),
            Endpoint::threats("BWW", "24h"),
            Endpoint::log_search("malware", None, "24h"),
            Endpoint::report("BWW", None, "24h", "security"),
            Endpoint::web_filter_status(),
            Endpoint::store_web_filter("BWW", "155"),
            Endpoint::web_filter_policies("BWW"),
            Endpoint::integration_status(),
            Endpoint::intelligence_status(),
            Endpoint::patterns(24, None),
            Endpoint::predictions(7, None),
            Endpoint::attack_paths(None),
            Endpoint::insights(),
        ];
        for endpoint in &endpoints {
            let response = service.call(endpoint).await.unwrap();
            assert!(response.success, "{} not successful", endpoint);
        }
        assert_eq!(service.calls().len(), endpoints.len());
    }

    #[tokio::test]
    async fn test_failing_and_missing() {
        let service = StaticDataService::demo()
            .failing(EndpointFamily::Threats)
            .without(EndpointFamily::Insights);

        let err = service.call(&Endpoint::threats("BWW", "24h")).await.unwrap_err();
        assert!(err.to_string().contains("fortianalyzer/threats/BWW"));

        let err = service.call(&Endpoint::insights()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::VoiceError::Service(ServiceError::NoFixture(_))
        ));
        assert_eq!(service.call_count(EndpointFamily::Threats), 1);
    }

    #[tokio::test]
    async fn test_path_override() {
        let service = StaticDataService::demo()
            .with_path_response("brands/SONIC/overview", json!({"success": true, "total_stores": 7}))
            .failing_path("brands/ARBYS/overview");

        let sonic = service.call(&Endpoint::brand_overview("SONIC")).await.unwrap();
        assert_eq!(sonic.payload["total_stores"], 7);
        let bww = service.call(&Endpoint::brand_overview("BWW")).await.unwrap();
        assert_eq!(bww.payload["total_stores"], 120);
        assert!(service.call(&Endpoint::brand_overview("ARBYS")).await.is_err());
    }
}
