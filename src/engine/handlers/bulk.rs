use tracing::{info, warn};

use crate::announce::payload::{decode, BrandSummary, BulkSummary};
use crate::announce::ResultPayload;
use crate::command::{Brand, BrandCode, BulkAction, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::{NavigationState, PageAction};
use crate::service::Endpoint;

impl DispatchEngine {
    /// Brand overviews for every brand in scope, one after another.
    ///
    /// A partial result is still announced; only a sweep where every brand
    /// failed counts as a failure.
    pub(crate) async fn bulk_operation(
        &mut self,
        action: BulkAction,
        brand: Option<&str>,
        focus: Option<String>,
    ) -> Result<()> {
        let scope: Vec<BrandCode> = match brand.map(BrandCode::normalize) {
            Some(code) => vec![code],
            None => Brand::ALL.into_iter().map(BrandCode::Known).collect(),
        };
        info!("Bulk {} across {} brand(s)", action.as_str(), scope.len());

        self.navigate(NavigationState {
            section: Section::Overview,
            brand: brand.map(BrandCode::normalize),
            query: focus.clone(),
            ..Default::default()
        });
        self.push_context(ContextKind::BulkOperation);
        self.settle().await;
        self.surface.trigger(PageAction::RunBulkOperation);

        let mut brands = Vec::with_capacity(scope.len());
        let mut failed = Vec::new();
        let mut last_error = None;
        for code in scope {
            let endpoint = Endpoint::brand_overview(code.code());
            let result = match self.fetch(&endpoint).await {
                Ok(body) => decode::<BrandSummary>(&endpoint, body),
                Err(e) => Err(e),
            };
            match result {
                Ok(summary) => brands.push((code, summary)),
                Err(e) => {
                    warn!("bulk {} skipped {}: {}", action.as_str(), code, e);
                    failed.push(code);
                    last_error = Some(e);
                }
            }
        }

        if brands.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        self.speak(&ResultPayload::Bulk(BulkSummary {
            action,
            focus,
            brands,
            failed,
        }));
        Ok(())
    }
}
