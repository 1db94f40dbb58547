//! Integration tests for the voice dispatch engine.
//!
//! Every test drives the public [`netops_voice::DispatchEngine`] API
//! against the static data service, a recording surface and a recording
//! synthesizer. No network access is needed.

#[path = "integration/test_scenarios.rs"]
mod test_scenarios;

#[path = "integration/test_context.rs"]
mod test_context;

#[path = "integration/test_config.rs"]
mod test_config;
