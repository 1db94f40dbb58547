use crate::announce::payload::{decode, LogSearchSummary};
use crate::announce::ResultPayload;
use crate::command::{BrandCode, LogSource, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

impl DispatchEngine {
    pub(crate) async fn search_logs(
        &mut self,
        query: &str,
        brand: Option<&str>,
        source: Option<LogSource>,
        timeframe: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        let timeframe = self.timeframe(timeframe);

        self.navigate(NavigationState {
            section: Section::FortiAnalyzer,
            brand: brand.clone(),
            query: Some(query.to_string()),
            timeframe: Some(timeframe.clone()),
            ..Default::default()
        });
        self.push_context(ContextKind::LogSearch);
        self.settle().await;
        self.surface.trigger(PageAction::SearchLogs);

        let endpoint = Endpoint::log_search(query, brand.as_ref().map(BrandCode::code), &timeframe)
            .param_opt("source", source.map(|s| s.as_str()));
        let mut summary: LogSearchSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
        summary.query.get_or_insert_with(|| query.to_string());
        summary.timeframe.get_or_insert(timeframe);
        if summary.brand_filter.is_none() {
            summary.brand_filter = brand.map(|b| b.code().to_string());
        }
        self.speak(&ResultPayload::LogSearch(summary));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::command::Section;
    use crate::context::ContextKind;
    use crate::engine::testing::{demo, harness};
    use crate::service::StaticDataService;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_logs() {
        let mut h = demo();
        h.engine
            .dispatch("search logs for malware over the last hour")
            .await;

        let state = h.engine.state();
        assert_eq!(state.section, Section::FortiAnalyzer);
        assert_eq!(state.query.as_deref(), Some("malware"));
        assert_eq!(state.timeframe.as_deref(), Some("1h"));
        assert_eq!(
            h.engine.context().peek().map(|e| e.kind()),
            Some(ContextKind::LogSearch)
        );

        let call = &h.service.calls()[0];
        assert_eq!(call.query_value("query"), Some("malware"));
        assert_eq!(call.query_value("timeframe"), Some("1h"));

        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("Search for malware complete."));
        assert!(text.contains("Found 27 matching log entries in the last hour"));
    }

    #[tokio::test]
    async fn test_search_default_timeframe_and_source() {
        let mut h = demo();
        h.engine
            .dispatch("find blocked downloads in the firewall logs")
            .await;
        let call = &h.service.calls()[0];
        assert_eq!(call.query_value("timeframe"), Some("24h"));
        assert_eq!(call.query_value("source"), Some("firewall"));
    }

    #[tokio::test]
    async fn test_search_with_no_results() {
        let mut h = harness(StaticDataService::demo().with_response(
            crate::service::EndpointFamily::LogSearch,
            json!({"success": true, "results": []}),
        ));
        h.engine.dispatch("search logs for ransomware").await;
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .contains("Try a broader timeframe"));
    }
}
