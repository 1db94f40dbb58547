use tracing::debug;

use crate::announce::announcer::intelligence_request;
use crate::announce::payload::{
    decode, AttackPathFindings, InsightFindings, IntelligenceFindings, PatternFindings,
    PredictionFindings,
};
use crate::announce::{ResultPayload, INTELLIGENCE_UNAVAILABLE};
use crate::command::{timeframe_hours, BrandCode, IntelligenceIntent, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::NavigationState;
use crate::service::Endpoint;

/// Correlation always looks back one week.
const CORRELATION_WINDOW_HOURS: u64 = 168;
const DEFAULT_HORIZON_DAYS: u64 = 7;

impl DispatchEngine {
    pub(crate) async fn intelligence(&mut self, request: &IntelligenceIntent) -> Result<()> {
        if !self.intelligence_available {
            debug!("{} skipped, subsystem unavailable", request.display_name());
            self.output.say(INTELLIGENCE_UNAVAILABLE);
            return Ok(());
        }

        let brand = match request {
            IntelligenceIntent::PatternAnalysis { brand }
            | IntelligenceIntent::Prediction { brand, .. }
            | IntelligenceIntent::AttackPaths { brand } => {
                brand.as_deref().map(BrandCode::normalize)
            }
            IntelligenceIntent::Correlation | IntelligenceIntent::Insights => None,
        };

        self.navigate(NavigationState {
            section: Section::Intelligence,
            brand: brand.clone(),
            ..Default::default()
        });
        self.push_context(ContextKind::Intelligence);
        self.output.say(intelligence_request(request));
        self.settle().await;

        let code = brand.as_ref().map(BrandCode::code);
        let findings = match request {
            IntelligenceIntent::PatternAnalysis { .. } => {
                let window = timeframe_hours(&self.timeframe(None)).unwrap_or(24);
                let endpoint = Endpoint::patterns(window, code);
                let findings: PatternFindings = decode(&endpoint, self.fetch(&endpoint).await?)?;
                IntelligenceFindings::Patterns { brand, findings }
            }
            IntelligenceIntent::Prediction { timeframe, .. } => {
                let horizon = timeframe
                    .as_deref()
                    .and_then(|t| timeframe_hours(&self.timeframe(Some(t))))
                    .map(|hours| (hours / 24).max(1))
                    .unwrap_or(DEFAULT_HORIZON_DAYS);
                let endpoint = Endpoint::predictions(horizon, code);
                let mut findings: PredictionFindings =
                    decode(&endpoint, self.fetch(&endpoint).await?)?;
                if findings.time_horizon_days == 0 {
                    findings.time_horizon_days = horizon;
                }
                IntelligenceFindings::Predictions { brand, findings }
            }
            IntelligenceIntent::Correlation => {
                let endpoint = Endpoint::correlation(CORRELATION_WINDOW_HOURS);
                let findings: PatternFindings = decode(&endpoint, self.fetch(&endpoint).await?)?;
                IntelligenceFindings::Correlation(findings)
            }
            IntelligenceIntent::AttackPaths { .. } => {
                let endpoint = Endpoint::attack_paths(code);
                let findings: AttackPathFindings =
                    decode(&endpoint, self.fetch(&endpoint).await?)?;
                IntelligenceFindings::AttackPaths { brand, findings }
            }
            IntelligenceIntent::Insights => {
                let endpoint = Endpoint::insights();
                let findings: InsightFindings = decode(&endpoint, self.fetch(&endpoint).await?)?;
                IntelligenceFindings::Insights(findings)
            }
        };

        self.speak(&ResultPayload::Intelligence(findings));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::announce::INTELLIGENCE_UNAVAILABLE;
    use crate::command::Section;
    use crate::context::ContextKind;
    use crate::engine::testing::demo;
    use crate::service::EndpointFamily;

    #[tokio::test]
    async fn test_unavailable_makes_no_call() {
        let mut h = demo();
        h.engine.dispatch("analyze security patterns for bww").await;

        assert_eq!(h.engine.last_announcement(), Some(INTELLIGENCE_UNAVAILABLE));
        assert!(h.service.calls().is_empty());
        assert!(h.engine.context().is_empty());
        assert_eq!(h.engine.state().section, Section::Overview);
    }

    #[tokio::test]
    async fn test_pattern_analysis() {
        let mut h = demo();
        h.engine.set_intelligence_available(true);
        h.engine.dispatch("analyze security patterns for bww").await;

        assert_eq!(h.engine.state().section, Section::Intelligence);
        assert_eq!(
            h.engine.context().peek().map(|e| e.kind()),
            Some(ContextKind::Intelligence)
        );
        let call = &h.service.calls()[0];
        assert_eq!(call.query_value("time_window_hours"), Some("24"));
        assert_eq!(call.query_value("brand"), Some("BWW"));

        let spoken = h.synth.spoken();
        assert!(spoken
            .iter()
            .any(|a| a.text == "Running pattern analysis."));
        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("Pattern analysis complete for Buffalo Wild Wings."));
        assert!(text.contains("4 patterns detected, 2 with high confidence"));
    }

    #[tokio::test]
    async fn test_prediction_horizon() {
        let mut h = demo();
        h.engine.set_intelligence_available(true);
        h.engine.dispatch("predict security issues for bww next week").await;

        let call = &h.service.calls()[0];
        assert_eq!(call.query_value("time_horizon_days"), Some("7"));
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .contains("over the next 7 days"));

        h.engine.dispatch("forecast outages tomorrow").await;
        assert_eq!(h.service.calls()[1].query_value("time_horizon_days"), Some("1"));
    }

    #[tokio::test]
    async fn test_prediction_oversized_timeframe_uses_default_horizon() {
        let mut h = demo();
        h.engine.set_intelligence_available(true);
        h.engine.dispatch("predict threats over 999999999999999999d").await;
        assert_eq!(h.service.calls()[0].query_value("time_horizon_days"), Some("7"));
    }

    #[tokio::test]
    async fn test_correlation_and_insights() {
        let mut h = demo();
        h.engine.set_intelligence_available(true);
        h.engine.dispatch("show correlation analysis").await;
        assert_eq!(
            h.service.calls()[0].query_value("pattern_types"),
            Some("brand_correlation")
        );
        assert_eq!(h.service.calls()[0].query_value("time_window_hours"), Some("168"));

        h.engine.dispatch("give me insights").await;
        assert_eq!(h.service.call_count(EndpointFamily::Insights), 1);
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .contains("6 patterns detected in the last 24 hours"));
    }

    #[tokio::test]
    async fn test_attack_paths() {
        let mut h = demo();
        h.engine.set_intelligence_available(true);
        h.engine.dispatch("show attack paths to sonic").await;
        assert_eq!(
            h.service.calls()[0].query_value("target_entities"),
            Some("SONIC")
        );
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .contains("Highest risk runs from guest-wifi to pos-network"));
    }
}
