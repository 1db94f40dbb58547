//! Netops Voice: command recognition and dispatch for the restaurant
//! network operations dashboard.
//!
//! Spoken or typed utterances are normalized, matched against an ordered
//! grammar, and dispatched to async handlers that navigate the dashboard,
//! query the data service, and announce the result through speech and
//! live-region sinks.

pub mod announce;
pub mod command;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod navigation;
pub mod output;
pub mod recognition;
pub mod service;
pub mod shortcuts;

pub use announce::{announce, ResultPayload};
pub use command::{
    normalize, Brand, BrandCode, CommandMatcher, Intent, MatchStage, Resolution, Section,
};
pub use config::Config;
pub use context::{ContextEntry, ContextKind, ContextStack};
pub use engine::{DispatchEngine, DispatchOutcome};
pub use error::{ConfigError, Result, ServiceError, VoiceError};
pub use metrics::{get_metrics, Metrics, MetricsSnapshot};
pub use navigation::{NavigationState, PageAction, RecordingSurface, Surface};
pub use output::{
    Announcement, OutputHub, RecordingSynthesizer, SpeechSynthesizer, TracingSynthesizer,
};
pub use recognition::{RecognitionError, RecognitionSession};
pub use service::{create_service, DataService, Endpoint, HttpDataService, StaticDataService};
pub use shortcuts::{KeyChord, ShortcutAction, ShortcutMap};
