//! Dashboard data service.
//!
//! Handlers talk to the data service only through [`DataService`]. The
//! HTTP implementation calls the dashboard REST API; the static one serves
//! canned payloads for offline use and tests.

mod fixtures;
mod http;

pub use fixtures::StaticDataService;
pub use http::HttpDataService;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, ServiceError};

// ============================================================================
// Endpoints
// ============================================================================

/// Endpoint family. Decides which payload shape a response is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointFamily {
    BrandOverview,
    StoreSecurity,
    UrlBlocking,
    StoreLogs,
    Threats,
    LogSearch,
    Report,
    WebFilterStatus,
    StoreWebFilter,
    WebFilterPolicies,
    IntegrationStatus,
    IntelligenceStatus,
    Patterns,
    Predictions,
    AttackPaths,
    Insights,
}

/// A data service request: a path below `/api/` plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub family: EndpointFamily,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(family: EndpointFamily, path: impl Into<String>) -> Self {
        Self {
            family,
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Add a query parameter.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Add a query parameter when present.
    pub fn param_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn brand_overview(brand: &str) -> Self {
        Self::new(EndpointFamily::BrandOverview, format!("brands/{}/overview", brand))
    }

    pub fn store_security(brand: &str, store_id: &str) -> Self {
        Self::new(
            EndpointFamily::StoreSecurity,
            format!("stores/{}/{}/security", brand, store_id),
        )
    }

    pub fn url_blocking(brand: &str, store_id: &str, period: &str) -> Self {
        Self::new(
            EndpointFamily::UrlBlocking,
            format!("stores/{}/{}/url-blocking", brand, store_id),
        )
        .param("period", period)
    }

    pub fn store_logs(brand: &str, store_id: &str, timeframe: &str) -> Self {
        Self::new(
            EndpointFamily::StoreLogs,
            format!("fortianalyzer/logs/{}/{}", brand, store_id),
        )
        .param("timeframe", timeframe)
    }

    pub fn threats(brand: &str, timeframe: &str) -> Self {
        Self::new(EndpointFamily::Threats, format!("fortianalyzer/threats/{}", brand))
            .param("timeframe", timeframe)
    }

    pub fn log_search(query: &str, brand: Option<&str>, timeframe: &str) -> Self {
        Self::new(EndpointFamily::LogSearch, "fortianalyzer/search")
            .param("query", query)
            .param_opt("brand", brand)
            .param("timeframe", timeframe)
    }

    pub fn report(brand: &str, store_id: Option<&str>, timeframe: &str, report_type: &str) -> Self {
        Self::new(EndpointFamily::Report, format!("fortianalyzer/reports/{}", brand))
            .param_opt("store_id", store_id)
            .param("timeframe", timeframe)
            .param("report_type", report_type)
    }

    pub fn web_filter_status() -> Self {
        Self::new(EndpointFamily::WebFilterStatus, "webfilters/status")
    }

    pub fn store_web_filter(brand: &str, store_id: &str) -> Self {
        Self::new(
            EndpointFamily::StoreWebFilter,
            format!("webfilters/{}/{}", brand, store_id),
        )
    }

    pub fn web_filter_policies(brand: &str) -> Self {
        Self::new(EndpointFamily::WebFilterPolicies, "webfilters/policies").param("brand", brand)
    }

    pub fn integration_status() -> Self {
        Self::new(EndpointFamily::IntegrationStatus, "integration/status")
    }

    pub fn intelligence_status() -> Self {
        Self::new(EndpointFamily::IntelligenceStatus, "ltm/status")
    }

    pub fn patterns(window_hours: u64, brand: Option<&str>) -> Self {
        Self::new(EndpointFamily::Patterns, "ltm/patterns/analyze")
            .param("time_window_hours", window_hours.to_string())
            .param_opt("brand", brand)
    }

    pub fn correlation(window_hours: u64) -> Self {
        Self::new(EndpointFamily::Patterns, "ltm/patterns/analyze")
            .param("time_window_hours", window_hours.to_string())
            .param("pattern_types", "brand_correlation")
    }

    pub fn predictions(horizon_days: u64, entity: Option<&str>) -> Self {
        Self::new(EndpointFamily::Predictions, "ltm/predictions/generate")
            .param("time_horizon_days", horizon_days.to_string())
            .param_opt("entities", entity)
    }

    pub fn attack_paths(target: Option<&str>) -> Self {
        Self::new(EndpointFamily::AttackPaths, "ltm/graph/attack-paths")
            .param_opt("target_entities", target)
    }

    pub fn insights() -> Self {
        Self::new(EndpointFamily::Insights, "ltm/analytics/insights")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

// ============================================================================
// Responses
// ============================================================================

/// A decoded data service response.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub success: bool,
    pub payload: Value,
    pub error: Option<String>,
}

impl ServiceResponse {
    /// Read the `success` and `error` members of a JSON body. A missing
    /// `success` counts as failure.
    pub fn from_json(payload: Value) -> Self {
        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let error = payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            success,
            payload,
            error,
        }
    }

    /// The payload of a successful response, or a rejection error.
    pub fn into_payload(self, endpoint: &Endpoint) -> Result<Value> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(ServiceError::Rejected {
                endpoint: endpoint.path.clone(),
                message: self.error.unwrap_or_else(|| "unknown error".to_string()),
            }
            .into())
        }
    }
}

// ============================================================================
// Service Trait
// ============================================================================

/// Asynchronous access to the dashboard data service.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Issue one request.
    async fn call(&self, endpoint: &Endpoint) -> Result<ServiceResponse>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Build the data service the configuration asks for.
pub fn create_service(config: &Config) -> Result<Arc<dyn DataService>> {
    if config.service.offline {
        Ok(Arc::new(StaticDataService::demo()))
    } else {
        Ok(Arc::new(HttpDataService::from_config(&config.service)?))
    }
}
