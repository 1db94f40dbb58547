//! CLI module for the netops-voice command line.
//!
//! Commands drive a [`netops_voice::DispatchEngine`] directly; the
//! dashboard surface is replaced by a recording one and speech goes to
//! the log.

mod commands;
mod output;

pub use commands::*;
