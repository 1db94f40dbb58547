use tracing::debug;

use crate::announce::announcer::{restored, NO_DETAILS_FOR_VIEW};
use crate::announce::payload::{decode, LogSearchSummary, ThreatSummary};
use crate::announce::{ResultPayload, NO_ADDITIONAL_DETAILS, RETURNING_TO_OVERVIEW};
use crate::context::{ContextKind, ContextStack};
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::navigation::NavigationState;
use crate::service::Endpoint;

impl DispatchEngine {
    /// Expand the most recent view. Leaves state and context alone.
    pub(crate) async fn show_more(&mut self) -> Result<()> {
        let Some(entry) = self.context.peek() else {
            self.output.say(NO_ADDITIONAL_DETAILS);
            return Ok(());
        };
        let kind = entry.kind();
        let snapshot = entry.snapshot().clone();
        debug!("Expanding {} view", kind.as_str());

        let timeframe = snapshot
            .timeframe
            .clone()
            .unwrap_or_else(|| self.config.dispatch.default_timeframe.clone());

        let payload = match (kind, &snapshot.brand, &snapshot.store_id) {
            (
                ContextKind::Investigation | ContextKind::Emergency,
                Some(brand),
                Some(store_id),
            ) => {
                let endpoint = Endpoint::store_logs(brand.code(), store_id, &timeframe);
                let logs: LogSearchSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
                ResultPayload::StoreLogs {
                    brand: brand.clone(),
                    store_id: store_id.clone(),
                    logs,
                }
            }
            (ContextKind::BrandOverview, Some(brand), _) => {
                let endpoint = Endpoint::threats(brand.code(), &timeframe);
                let summary: ThreatSummary = decode(&endpoint, self.fetch(&endpoint).await?)?;
                ResultPayload::Threats {
                    brand: Some(brand.clone()),
                    timeframe,
                    summary,
                }
            }
            _ => {
                self.output.say(NO_DETAILS_FOR_VIEW);
                return Ok(());
            }
        };

        self.speak(&payload);
        Ok(())
    }

    /// Drop the current view and restore the one before it.
    pub(crate) fn go_back(&mut self) {
        self.context.pop();

        match self.context.peek() {
            Some(previous) => {
                let section = previous.snapshot().section;
                ContextStack::restore(previous, &mut self.state);
                self.state.apply_to(self.surface.as_ref());
                self.output.say(restored(section));
            }
            None => {
                self.navigate(NavigationState::default());
                self.output.say(RETURNING_TO_OVERVIEW);
            }
        }
    }
}
