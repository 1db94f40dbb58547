//! Configuration settings for the voice dispatch engine.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub speech: SpeechConfig,
    pub dispatch: DispatchConfig,
    pub intelligence: IntelligenceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("netops-voice.toml"),
            dirs::config_dir()
                .map(|p| p.join("netops-voice/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".netops-voice/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if !self.service.offline && self.service.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("service.base_url".to_string()).into());
        }

        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Invalid("service.timeout_secs must be > 0".to_string()).into());
        }

        for (name, value) in [
            ("speech.rate", self.speech.rate),
            ("speech.emergency_rate", self.speech.emergency_rate),
        ] {
            if !(0.1..=10.0).contains(&value) {
                return Err(
                    ConfigError::Invalid(format!("{} must be between 0.1 and 10.0", name)).into(),
                );
            }
        }

        if !(0.0..=2.0).contains(&self.speech.pitch) {
            return Err(ConfigError::Invalid("speech.pitch must be between 0 and 2".to_string()).into());
        }

        if !(0.0..=1.0).contains(&self.speech.volume) {
            return Err(ConfigError::Invalid("speech.volume must be between 0 and 1".to_string()).into());
        }

        Ok(())
    }
}

/// Dashboard data service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the dashboard REST API (without the `/api` suffix)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Serve canned payloads instead of calling the network
    pub offline: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            offline: false,
        }
    }
}

/// Speech output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether spoken output is enabled at startup
    pub enabled: bool,
    /// Normal speaking rate
    pub rate: f32,
    /// Speaking rate used for emergency announcements
    pub emergency_rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Preferred voice name, if the platform offers a choice
    pub voice: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            emergency_rate: 1.2,
            pitch: 1.0,
            volume: 0.8,
            voice: None,
        }
    }
}

/// Dispatch behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Pause between a section change and the dependent data call, in
    /// milliseconds. Ordering never depends on it.
    pub settle_delay_ms: u64,
    /// Timeframe used when an utterance names none
    pub default_timeframe: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 0,
            default_timeframe: "24h".to_string(),
        }
    }
}

/// Intelligence subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelligenceConfig {
    /// Probe the intelligence subsystem at startup. When false the
    /// capability stays off.
    pub probe: bool,
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self { probe: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:5000");
        assert_eq!(config.dispatch.default_timeframe, "24h");
        assert_eq!(config.dispatch.settle_delay_ms, 0);
        assert!(config.intelligence.probe);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [service]
            base_url = "http://dashboard.internal:8080"
            timeout_secs = 10

            [speech]
            rate = 1.1
            emergency_rate = 1.4
            voice = "Samantha"

            [dispatch]
            settle_delay_ms = 250
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.service.base_url, "http://dashboard.internal:8080");
        assert_eq!(config.service.timeout_secs, 10);
        assert_eq!(config.speech.voice.as_deref(), Some("Samantha"));
        assert_eq!(config.dispatch.settle_delay_ms, 250);
        assert_eq!(config.dispatch.default_timeframe, "24h");
    }

    #[test]
    fn test_validate_missing_base_url() {
        let toml = r#"
            [service]
            base_url = ""
        "#;

        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_offline_allows_empty_base_url() {
        let toml = r#"
            [service]
            base_url = ""
            offline = true
        "#;

        assert!(Config::from_str(toml).is_ok());
    }

    #[test]
    fn test_validate_volume_range() {
        let toml = r#"
            [speech]
            volume = 3.0
        "#;

        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\noffline = true\n").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.service.offline);
    }
}
