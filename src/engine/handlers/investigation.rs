use crate::announce::payload::{
    decode, BlockingSummary, HealthMetrics, StoreInvestigation, WebFilterStatus,
};
use crate::announce::ResultPayload;
use crate::command::{timeframe_for_focus, BrandCode, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

impl DispatchEngine {
    pub(crate) async fn investigate_store(
        &mut self,
        brand: &str,
        store_id: &str,
        focus: Option<&str>,
    ) -> Result<()> {
        let brand = BrandCode::normalize(brand);
        let default = &self.config.dispatch.default_timeframe;
        let timeframe = match focus {
            Some(focus) => timeframe_for_focus(focus, default),
            None => default.clone(),
        };

        self.navigate(NavigationState {
            section: Section::Investigation,
            brand: Some(brand.clone()),
            store_id: Some(store_id.to_string()),
            timeframe: Some(timeframe.clone()),
            ..Default::default()
        });
        self.push_context(ContextKind::Investigation);
        self.settle().await;
        self.surface.trigger(PageAction::RunInvestigation);

        let security = Endpoint::store_security(brand.code(), store_id);
        let blocking = Endpoint::url_blocking(brand.code(), store_id, &timeframe);
        let (security_body, blocking_body) =
            tokio::try_join!(self.fetch(&security), self.fetch(&blocking))?;

        let investigation = StoreInvestigation {
            health: HealthMetrics::from_response(&security, security_body)?,
            blocking: BlockingSummary::from_response(&blocking, blocking_body)?,
            brand,
            store_id: store_id.to_string(),
            timeframe,
        };
        self.speak(&ResultPayload::StoreInvestigation(investigation));
        Ok(())
    }

    pub(crate) async fn web_filter_status(
        &mut self,
        brand: Option<&str>,
        store_id: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        self.navigate(NavigationState {
            section: Section::WebFilters,
            brand: brand.clone(),
            store_id: store_id.map(str::to_string),
            ..Default::default()
        });
        self.push_context(ContextKind::WebFilterStatus);
        self.settle().await;
        self.surface.trigger(PageAction::LoadWebFilters);

        let endpoint = match (&brand, store_id) {
            (Some(brand), Some(store)) => Endpoint::store_web_filter(brand.code(), store),
            (Some(brand), None) => Endpoint::web_filter_policies(brand.code()),
            _ => Endpoint::web_filter_status(),
        };
        let mut status: WebFilterStatus = decode(&endpoint, self.fetch(&endpoint).await?)?;
        if status.brand.is_none() {
            status.brand = brand.map(|b| b.code().to_string());
        }
        if status.store_id.is_none() {
            status.store_id = store_id.map(str::to_string);
        }
        self.speak(&ResultPayload::WebFilter(status));
        Ok(())
    }
}
