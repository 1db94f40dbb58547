use crate::announce::payload::{decode, ReportSummary};
use crate::announce::ResultPayload;
use crate::command::{BrandCode, ReportType, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

/// Path segment used when a report names no brand.
const ALL_BRANDS: &str = "ALL";

impl DispatchEngine {
    pub(crate) async fn generate_report(
        &mut self,
        report_type: ReportType,
        brand: Option<&str>,
        store_id: Option<&str>,
        timeframe: Option<&str>,
    ) -> Result<()> {
        let brand = brand.map(BrandCode::normalize);
        let timeframe = self.timeframe(timeframe);

        self.navigate(NavigationState {
            section: Section::Reports,
            brand: brand.clone(),
            store_id: store_id.map(str::to_string),
            timeframe: Some(timeframe.clone()),
            report_type: Some(report_type),
            ..Default::default()
        });
        self.push_context(ContextKind::ReportGeneration);
        self.settle().await;
        self.surface.trigger(PageAction::GenerateReport);

        let endpoint = Endpoint::report(
            brand.as_ref().map(BrandCode::code).unwrap_or(ALL_BRANDS),
            store_id,
            &timeframe,
            report_type.as_str(),
        );
        let mut report: ReportSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
        report.report_type = report_type;
        let info = &mut report.report_info;
        if info.brand.is_none() {
            info.brand = brand.map(|b| b.code().to_string());
        }
        if info.store_id.is_none() {
            info.store_id = store_id.map(str::to_string);
        }
        info.timeframe.get_or_insert(timeframe);

        self.speak(&ResultPayload::Report(report));
        Ok(())
    }
}
