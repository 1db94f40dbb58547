//! Intent handlers, one file per domain.
//!
//! Every data handler follows the same order: replace the navigation state,
//! push a context snapshot, settle, call the data service, announce. A
//! failed call leaves the new state and context entry in place.

mod bulk;
mod emergency;
mod follow_up;
mod intelligence;
mod investigation;
mod navigation;
mod reporting;
mod search;
mod security;
mod system;
