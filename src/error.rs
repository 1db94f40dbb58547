//! Error types for the voice dispatch engine.
//!
//! Only library plumbing fails with these types. Recognition misses, data
//! call failures and unavailable subsystems are recovered inside the engine
//! and surface as announcements instead.

use thiserror::Error;

/// Main error type for netops-voice operations.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Invalid key chord: {0}")]
    InvalidChord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while talking to the dashboard data service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Connection to {endpoint} failed: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Request to {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },

    #[error("{endpoint} reported failure: {message}")]
    Rejected { endpoint: String, message: String },

    #[error("No canned response for {0}")]
    NoFixture(String),
}

/// Result type alias for netops-voice operations.
pub type Result<T> = std::result::Result<T, VoiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VoiceError::Config(ConfigError::MissingField("service.base_url".to_string()));
        assert!(err.to_string().contains("service.base_url"));
    }

    #[test]
    fn test_service_error_conversion() {
        let err: VoiceError = ServiceError::Status {
            endpoint: "stores/BWW/155/security".to_string(),
            status: 502,
        }
        .into();
        assert!(matches!(err, VoiceError::Service(_)));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VoiceError = io_err.into();
        assert!(matches!(err, VoiceError::Io(_)));
    }
}
