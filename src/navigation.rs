//! Dashboard navigation state and the host surface it is mirrored to.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{BrandCode, ReportType, Section, Severity};

/// What the dashboard is currently showing.
///
/// Context entries hold immutable copies of this; going back assigns a copy
/// over the live state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub section: Section,
    pub brand: Option<BrandCode>,
    pub store_id: Option<String>,
    pub query: Option<String>,
    pub timeframe: Option<String>,
    pub severity: Option<Severity>,
    pub report_type: Option<ReportType>,
}

impl NavigationState {
    /// Switch section, clearing the per-view fields.
    pub fn enter(&mut self, section: Section) {
        *self = Self {
            section,
            ..Self::default()
        };
    }

    /// Field assignment from a snapshot. Idempotent.
    pub fn restore(&mut self, snapshot: &NavigationState) {
        self.clone_from(snapshot);
    }

    /// Push every field to the host surface.
    pub fn apply_to(&self, surface: &dyn Surface) {
        surface.show_section(self.section);
        let fields = [
            (InputField::Brand, self.brand.as_ref().map(|b| b.code().to_string())),
            (InputField::StoreId, self.store_id.clone()),
            (InputField::Query, self.query.clone()),
            (InputField::Timeframe, self.timeframe.clone()),
            (
                InputField::Severity,
                self.severity.map(|s| s.as_str().to_string()),
            ),
            (
                InputField::ReportType,
                self.report_type.map(|r| r.as_str().to_string()),
            ),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                surface.set_field(field, &value);
            }
        }
    }
}

// ============================================================================
// Host Surface
// ============================================================================

/// Input fields handlers populate before triggering a page action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Brand,
    StoreId,
    Query,
    Timeframe,
    Severity,
    ReportType,
}

/// Page-level actions the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    RunInvestigation,
    SearchLogs,
    FilterEvents,
    LoadThreats,
    LoadWebFilters,
    GenerateReport,
    RunBulkOperation,
}

/// The dashboard page. Setters are opaque; nothing is read back.
pub trait Surface: Send + Sync {
    fn show_section(&self, section: Section);

    fn set_field(&self, field: InputField, value: &str);

    fn trigger(&self, action: PageAction);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SurfaceEvent {
    ShowSection { section: Section },
    SetField { field: InputField, value: String },
    Trigger { action: PageAction },
}

/// Surface that records every call. Used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn last_section(&self) -> Option<Section> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::ShowSection { section } => Some(*section),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Surface for RecordingSurface {
    fn show_section(&self, section: Section) {
        debug!("surface: show {}", section.id());
        self.events.lock().push(SurfaceEvent::ShowSection { section });
    }

    fn set_field(&self, field: InputField, value: &str) {
        self.events.lock().push(SurfaceEvent::SetField {
            field,
            value: value.to_string(),
        });
    }

    fn trigger(&self, action: PageAction) {
        self.events.lock().push(SurfaceEvent::Trigger { action });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Brand;

    fn investigation() -> NavigationState {
        NavigationState {
            section: Section::Investigation,
            brand: Some(BrandCode::Known(Brand::Bww)),
            store_id: Some("155".to_string()),
            timeframe: Some("24h".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enter_clears_fields() {
        let mut state = investigation();
        state.enter(Section::Reports);
        assert_eq!(state.section, Section::Reports);
        assert!(state.brand.is_none());
        assert!(state.store_id.is_none());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let snapshot = investigation();
        let mut state = NavigationState::default();
        state.restore(&snapshot);
        assert_eq!(state, snapshot);
        state.restore(&snapshot);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_apply_to_surface() {
        let surface = RecordingSurface::new();
        investigation().apply_to(&surface);

        let events = surface.events();
        assert_eq!(
            events[0],
            SurfaceEvent::ShowSection {
                section: Section::Investigation
            }
        );
        assert!(events.contains(&SurfaceEvent::SetField {
            field: InputField::Brand,
            value: "BWW".to_string()
        }));
        assert!(events.contains(&SurfaceEvent::SetField {
            field: InputField::StoreId,
            value: "155".to_string()
        }));
        assert_eq!(surface.last_section(), Some(Section::Investigation));
    }
}
