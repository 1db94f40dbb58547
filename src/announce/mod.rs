//! Result payloads and their spoken summaries.

pub mod announcer;
pub mod payload;

pub use announcer::{
    announce, describe_timeframe, health_tier, threat_recommendations, threat_tier,
    INTELLIGENCE_UNAVAILABLE, MAX_SENTENCES, NOTHING_TO_REPEAT, NO_ADDITIONAL_DETAILS,
    RETURNING_TO_OVERVIEW, UNRECOGNIZED,
};
pub use payload::{block_rate, ResultPayload};
