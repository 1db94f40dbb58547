//! Utterance understanding: normalization, grammar and matching.

pub mod brand;
pub mod grammar;
pub mod matcher;
pub mod normalizer;
pub mod timeframe;
pub mod types;

pub use brand::{find_brand, Brand, BrandCode};
pub use grammar::{CommandPattern, Grammar, IntentBuilder, PhraseTable};
pub use matcher::{CommandMatcher, FallbackKind, MatchStage, Resolution};
pub use normalizer::{normalize, Utterance};
pub use timeframe::{normalize_timeframe, timeframe_for_focus, timeframe_hours};
pub use types::*;
