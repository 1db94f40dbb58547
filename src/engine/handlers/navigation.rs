use crate::announce::announcer::navigating_to;
use crate::announce::payload::{decode, BrandSummary};
use crate::announce::ResultPayload;
use crate::command::{BrandCode, Section};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::NavigationState;
use crate::service::Endpoint;

impl DispatchEngine {
    pub(crate) fn navigate_to(&mut self, section: Section) {
        self.navigate(NavigationState {
            section,
            ..Default::default()
        });
        if section == Section::Settings {
            self.settings_open = true;
        }
        self.push_context(ContextKind::Navigation);
        self.output.say(navigating_to(section));
    }

    pub(crate) async fn brand_overview(&mut self, brand: &str) -> Result<()> {
        let brand = BrandCode::normalize(brand);
        self.navigate(NavigationState {
            section: Section::Overview,
            brand: Some(brand.clone()),
            ..Default::default()
        });
        self.push_context(ContextKind::BrandOverview);
        self.settle().await;

        let endpoint = Endpoint::brand_overview(brand.code());
        let summary: BrandSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
        self.speak(&ResultPayload::BrandOverview { brand, summary });
        Ok(())
    }
}
