//! Bounded multi-turn context.
//!
//! Each handled intent pushes a snapshot of the navigation state it left
//! behind. "go back" and "show more" read the stack; nothing else does.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::navigation::NavigationState;

/// Maximum number of entries kept.
pub const CONTEXT_CAPACITY: usize = 10;

/// What produced a context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Investigation,
    LogSearch,
    SecurityEvents,
    ThreatIntelligence,
    WebFilterStatus,
    ReportGeneration,
    BrandOverview,
    Navigation,
    SystemHealth,
    Emergency,
    BulkOperation,
    Intelligence,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investigation => "investigation",
            Self::LogSearch => "log_search",
            Self::SecurityEvents => "security_events",
            Self::ThreatIntelligence => "threat_intelligence",
            Self::WebFilterStatus => "web_filter_status",
            Self::ReportGeneration => "report_generation",
            Self::BrandOverview => "brand_overview",
            Self::Navigation => "navigation",
            Self::SystemHealth => "system_health",
            Self::Emergency => "emergency",
            Self::BulkOperation => "bulk_operation",
            Self::Intelligence => "intelligence",
        }
    }
}

/// One prior view. The snapshot is shared and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    kind: ContextKind,
    snapshot: Arc<NavigationState>,
    timestamp: DateTime<Utc>,
}

impl ContextEntry {
    pub fn new(kind: ContextKind, snapshot: NavigationState) -> Self {
        Self {
            kind,
            snapshot: Arc::new(snapshot),
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn snapshot(&self) -> &NavigationState {
        &self.snapshot
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Most recent entry last.
#[derive(Debug, Clone)]
pub struct ContextStack {
    entries: VecDeque<ContextEntry>,
    capacity: usize,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    pub fn new() -> Self {
        Self::with_capacity(CONTEXT_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest past capacity.
    pub fn push(&mut self, kind: ContextKind, snapshot: NavigationState) -> &ContextEntry {
        self.entries.push_back(ContextEntry::new(kind, snapshot));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        // just pushed
        &self.entries[self.entries.len() - 1]
    }

    pub fn peek(&self) -> Option<&ContextEntry> {
        self.entries.back()
    }

    pub fn pop(&mut self) -> Option<ContextEntry> {
        self.entries.pop_back()
    }

    /// Assign the entry's snapshot over the live state. Issues no calls.
    pub fn restore(entry: &ContextEntry, state: &mut NavigationState) {
        state.restore(entry.snapshot());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
