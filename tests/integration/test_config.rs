//! Configuration loading and its effect on a running engine.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use netops_voice::output::SpeechEvent;
use netops_voice::{
    create_service, Config, DispatchEngine, RecordingSurface, RecordingSynthesizer,
    StaticDataService, VoiceError,
};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_file_round_trip() {
    let file = write_config(
        r#"
[service]
base_url = "http://dashboard.internal:8080"
timeout_secs = 5

[speech]
rate = 1.1
emergency_rate = 1.4

[dispatch]
settle_delay_ms = 250
default_timeframe = "4h"
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.service.base_url, "http://dashboard.internal:8080");
    assert_eq!(config.service.timeout_secs, 5);
    assert_eq!(config.speech.emergency_rate, 1.4);
    assert_eq!(config.dispatch.settle_delay_ms, 250);
    assert_eq!(config.dispatch.default_timeframe, "4h");
    assert!(config.intelligence.probe);
}

#[test]
fn test_invalid_config_is_rejected() {
    let file = write_config("[speech]\nrate = 0.0\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(VoiceError::Config(_))
    ));

    let file = write_config("[service\nbase_url = ");
    assert!(Config::from_file(file.path()).is_err());
}

#[tokio::test]
async fn test_offline_service_from_config() {
    let config = Config::from_str("[service]\noffline = true\n").unwrap();
    let service = create_service(&config).unwrap();
    assert_eq!(service.name(), "static");

    let mut engine = DispatchEngine::start(
        config,
        service,
        Arc::new(RecordingSurface::new()),
        Arc::new(RecordingSynthesizer::new()),
    )
    .await;
    assert!(engine.intelligence_available());

    engine.dispatch("show the arbys overview").await;
    assert!(engine
        .last_announcement()
        .unwrap()
        .starts_with("Arby's overview loaded."));
}

#[tokio::test]
async fn test_default_timeframe_from_config() {
    let config = Config::from_str("[dispatch]\ndefault_timeframe = \"12h\"\n").unwrap();
    let service = Arc::new(StaticDataService::demo());
    let mut engine = DispatchEngine::new(
        config,
        service.clone(),
        Arc::new(RecordingSurface::new()),
        Arc::new(RecordingSynthesizer::new()),
    );

    engine.dispatch("threats for sonic").await;
    assert_eq!(service.calls()[0].query_value("timeframe"), Some("12h"));
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_orders_navigation_before_call() {
    let config = Config::from_str("[dispatch]\nsettle_delay_ms = 500\n").unwrap();
    let service = Arc::new(StaticDataService::demo());
    let surface = Arc::new(RecordingSurface::new());
    let mut engine = DispatchEngine::new(
        config,
        service.clone(),
        surface.clone(),
        Arc::new(RecordingSynthesizer::new()),
    );

    let started = tokio::time::Instant::now();
    engine.dispatch("show the sonic overview").await;
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(!surface.events().is_empty());
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test]
async fn test_disabled_speech_still_updates_regions() {
    let config = Config::from_str("[speech]\nenabled = false\n").unwrap();
    let synth = Arc::new(RecordingSynthesizer::new());
    let mut engine = DispatchEngine::new(
        config,
        Arc::new(StaticDataService::demo()),
        Arc::new(RecordingSurface::new()),
        synth.clone(),
    );

    engine.dispatch("go to reports").await;
    assert!(synth
        .events()
        .iter()
        .all(|e| !matches!(e, SpeechEvent::Spoke(_))));
    assert_eq!(
        engine.output().status_region().text(),
        "Navigating to reports."
    );
}
