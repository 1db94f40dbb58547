//! Speech-input session state and error mapping.
//!
//! Acoustic recognition happens on the platform. This module only tracks
//! whether a session is active and turns platform error codes into the
//! messages spoken back to the operator.

use serde::Serialize;
use thiserror::Error;

/// Error reported by the platform speech-input service. The display text
/// is what gets spoken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("No speech was detected. Please try again.")]
    NoSpeech,

    #[error("Voice recognition needs a network connection. Please check your connection.")]
    Network,

    #[error("Microphone access was denied. Please allow microphone access to use voice commands.")]
    NotAllowed,

    #[error("Voice recognition encountered an error. Please try again.")]
    Other(String),
}

impl RecognitionError {
    /// Map a platform error code.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            "not-allowed" | "service-not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::Network => "network",
            Self::NotAllowed => "not-allowed",
            Self::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Listening,
}

/// One recognition session at a time. Activating while listening stops the
/// session instead of queuing another.
#[derive(Debug, Default)]
pub struct RecognitionSession {
    state: SessionState,
}

impl RecognitionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening, or stop if already listening. Returns the new state.
    pub fn toggle(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Idle => SessionState::Listening,
            SessionState::Listening => SessionState::Idle,
        };
        self.state
    }

    /// Start listening. Returns false when a session is already active.
    pub fn start(&mut self) -> bool {
        if self.state == SessionState::Listening {
            return false;
        }
        self.state = SessionState::Listening;
        true
    }

    /// Called when a session produces a transcript, errors or ends.
    pub fn finish(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }
}
