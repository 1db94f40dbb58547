//! Configuration for the voice dispatch engine.

pub mod settings;

pub use settings::*;
