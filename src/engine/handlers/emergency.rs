use tracing::warn;

use crate::announce::announcer::{announce, emergency_alert};
use crate::announce::payload::{decode, LogSearchSummary};
use crate::announce::ResultPayload;
use crate::command::{BrandCode, Section, Severity};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

/// Emergencies always look at the last hour.
const EMERGENCY_TIMEFRAME: &str = "1h";

impl DispatchEngine {
    /// Alert first, then force navigation and search critical events.
    pub(crate) async fn emergency(
        &mut self,
        brand: Option<&str>,
        store_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        warn!(
            brand = brand.as_ref().map(BrandCode::code),
            store = store_id,
            "Emergency raised"
        );
        self.output
            .alert(emergency_alert(brand.as_ref(), store_id, description));

        let query = description.unwrap_or("critical").to_string();
        let section = if store_id.is_some() && brand.is_some() {
            Section::Investigation
        } else {
            Section::FortiAnalyzer
        };
        self.navigate(NavigationState {
            section,
            brand: brand.clone(),
            store_id: store_id.map(str::to_string),
            query: Some(query.clone()),
            timeframe: Some(EMERGENCY_TIMEFRAME.to_string()),
            severity: Some(Severity::Critical),
            ..Default::default()
        });
        self.push_context(ContextKind::Emergency);
        self.settle().await;
        self.surface.trigger(PageAction::SearchLogs);

        let endpoint = Endpoint::log_search(
            &query,
            brand.as_ref().map(BrandCode::code),
            EMERGENCY_TIMEFRAME,
        )
        .param("severity", Severity::Critical.as_str())
        .param_opt("store_id", store_id);
        let mut summary: LogSearchSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
        summary.query.get_or_insert(query);
        summary
            .timeframe
            .get_or_insert_with(|| EMERGENCY_TIMEFRAME.to_string());

        self.output
            .alert(announce(&ResultPayload::LogSearch(summary)));
        Ok(())
    }
}
