use tracing::warn;

use crate::announce::payload::{decode, LogSearchSummary, SecurityEventsSummary, ThreatSummary};
use crate::announce::ResultPayload;
use crate::command::{Brand, BrandCode, Section, Severity};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

impl DispatchEngine {
    pub(crate) async fn security_events(
        &mut self,
        severity: Severity,
        brand: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        let timeframe = self.timeframe(None);

        self.navigate(NavigationState {
            section: Section::FortiAnalyzer,
            brand: brand.clone(),
            severity: Some(severity),
            timeframe: Some(timeframe.clone()),
            ..Default::default()
        });
        self.push_context(ContextKind::SecurityEvents);
        self.settle().await;
        self.surface.trigger(PageAction::FilterEvents);

        let endpoint = Endpoint::log_search(
            &format!("severity:{}", severity.as_str()),
            brand.as_ref().map(BrandCode::code),
            &timeframe,
        )
        .param("severity", severity.as_str());
        let events: LogSearchSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
        self.speak(&ResultPayload::SecurityEvents(SecurityEventsSummary {
            severity,
            brand,
            events,
        }));
        Ok(())
    }

    /// Threat summary for one brand, or merged across every brand.
    pub(crate) async fn threat_intelligence(
        &mut self,
        brand: Option<&str>,
        timeframe: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        let timeframe = self.timeframe(timeframe);

        self.navigate(NavigationState {
            section: Section::FortiAnalyzer,
            brand: brand.clone(),
            timeframe: Some(timeframe.clone()),
            ..Default::default()
        });
        self.push_context(ContextKind::ThreatIntelligence);
        self.settle().await;
        self.surface.trigger(PageAction::LoadThreats);

        let summary = match &brand {
            Some(code) => {
                let endpoint = Endpoint::threats(code.code(), &timeframe);
                decode::<ThreatSummary>(&endpoint, self.fetch(&endpoint).await?)?
            }
            None => {
                let mut summaries = Vec::new();
                let mut last_error = None;
                for known in Brand::ALL {
                    let endpoint = Endpoint::threats(known.code(), &timeframe);
                    let result = match self.fetch(&endpoint).await {
                        Ok(body) => decode::<ThreatSummary>(&endpoint, body),
                        Err(e) => Err(e),
                    };
                    match result {
                        Ok(summary) => summaries.push(summary),
                        Err(e) => {
                            warn!("threats for {} unavailable: {}", known, e);
                            last_error = Some(e);
                        }
                    }
                }
                if summaries.is_empty() {
                    if let Some(e) = last_error {
                        return Err(e);
                    }
                }
                ThreatSummary::merge(summaries)
            }
        };

        self.speak(&ResultPayload::Threats {
            brand,
            timeframe,
            summary,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::command::{Section, Severity};
    use crate::engine::testing::{demo, harness};
    use crate::service::{EndpointFamily, StaticDataService};
    use serde_json::json;

    #[tokio::test]
    async fn test_security_events() {
        let mut h = demo();
        h.engine.dispatch("show critical security events for bww").await;

        let state = h.engine.state();
        assert_eq!(state.section, Section::FortiAnalyzer);
        assert_eq!(state.severity, Some(Severity::Critical));

        let call = &h.service.calls()[0];
        assert_eq!(call.query_value("severity"), Some("critical"));
        assert_eq!(call.query_value("brand"), Some("BWW"));

        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("Filtering critical security events for Buffalo Wild Wings."));
        assert!(text.contains("investigated immediately"));
    }

    #[tokio::test]
    async fn test_threats_for_brand() {
        let mut h = demo();
        h.engine
            .dispatch("check threat intelligence for sonic over the last week")
            .await;

        let calls = h.service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "fortianalyzer/threats/SONIC");
        assert_eq!(calls[0].query_value("timeframe"), Some("7d"));

        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("Threat intelligence for Sonic Drive-In over the last 7 days."));
        assert!(text.contains("Block rate is 94.4 percent, rated good"));
    }

    #[tokio::test]
    async fn test_threats_all_brands_merged() {
        let mut h = demo();
        h.engine.dispatch("show threat summary").await;

        assert_eq!(h.service.call_count(EndpointFamily::Threats), 3);
        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("Threat intelligence for all brands"));
        assert!(text.contains("3750 threats detected and 3540 blocked"));
    }

    #[tokio::test]
    async fn test_zero_threats() {
        let mut h = harness(StaticDataService::demo().with_response(
            EndpointFamily::Threats,
            json!({"success": true, "threat_summary": {"total_threats": 0, "blocked_threats": 0}}),
        ));
        h.engine.dispatch("threats for bww").await;
        let text = h.engine.last_announcement().unwrap();
        assert!(text.contains("0.0 percent, rated needs attention"));
    }

    #[tokio::test]
    async fn test_rejected_response_is_failure() {
        let mut h = harness(StaticDataService::demo().with_response(
            EndpointFamily::Threats,
            json!({"success": false, "error": "FortiAnalyzer unreachable"}),
        ));
        h.engine.dispatch("threats for bww").await;
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .starts_with("Unable to complete the threat intelligence request."));
        assert_eq!(h.engine.state().section, Section::FortiAnalyzer);
    }
}
