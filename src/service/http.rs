//! REST implementation of the data service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

use super::{DataService, Endpoint, ServiceResponse};

/// Calls `{base_url}/api/{endpoint}` and decodes the JSON body.
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}/api/{}", self.base_url, endpoint.path)
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn call(&self, endpoint: &Endpoint) -> Result<ServiceResponse> {
        let url = self.url_for(endpoint);
        debug!("GET {}", endpoint);

        let response = self
            .client
            .get(&url)
            .query(&endpoint.query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout {
                        endpoint: endpoint.path.clone(),
                    }
                } else {
                    ServiceError::Connection {
                        endpoint: endpoint.path.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint: endpoint.path.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body: Value = response.json().await.map_err(|e| ServiceError::Malformed {
            endpoint: endpoint.path.clone(),
            message: e.to_string(),
        })?;

        Ok(ServiceResponse::from_json(body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let service = HttpDataService::new("http://localhost:5000/", 5).unwrap();
        assert_eq!(
            service.url_for(&Endpoint::store_security("BWW", "155")),
            "http://localhost:5000/api/stores/BWW/155/security"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_service_error() {
        // nothing listens on port 9 locally
        let service = HttpDataService::new("http://127.0.0.1:9", 2).unwrap();
        let err = service
            .call(&Endpoint::integration_status())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::VoiceError::Service(
                ServiceError::Connection { .. } | ServiceError::Timeout { .. }
            )
        ));
    }
}
