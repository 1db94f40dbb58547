//! Context stack behaviour through the engine: show more, go back and the
//! capacity bound.

use std::sync::Arc;

use netops_voice::command::Section;
use netops_voice::context::ContextKind;
use netops_voice::navigation::SurfaceEvent;
use netops_voice::service::EndpointFamily;
use netops_voice::{
    Config, DispatchEngine, RecordingSurface, RecordingSynthesizer, StaticDataService,
};

fn engine() -> (DispatchEngine, Arc<StaticDataService>, Arc<RecordingSurface>) {
    let service = Arc::new(StaticDataService::demo());
    let surface = Arc::new(RecordingSurface::new());
    let engine = DispatchEngine::new(
        Config::default(),
        service.clone(),
        surface.clone(),
        Arc::new(RecordingSynthesizer::new()),
    );
    (engine, service, surface)
}

#[tokio::test]
async fn test_show_more_on_empty_stack() {
    let (mut engine, service, surface) = engine();
    engine.dispatch("show more").await;

    assert_eq!(
        engine.last_announcement(),
        Some("No additional details available.")
    );
    assert!(engine.context().is_empty());
    assert!(service.calls().is_empty());
    assert!(surface.events().is_empty());
}

#[tokio::test]
async fn test_go_back_with_single_entry() {
    let (mut engine, _, surface) = engine();
    engine.dispatch("investigate sonic store 22").await;
    surface.clear();

    engine.dispatch("go back").await;
    assert!(engine.context().is_empty());
    assert_eq!(engine.state().section, Section::Overview);
    assert!(engine.state().brand.is_none());
    assert_eq!(surface.last_section(), Some(Section::Overview));
    assert_eq!(engine.last_announcement(), Some("Returning to the overview."));

    // Nothing left to pop
    engine.dispatch("go back").await;
    assert_eq!(engine.state().section, Section::Overview);
    assert!(engine.context().is_empty());
}

#[tokio::test]
async fn test_eleventh_push_evicts_oldest() {
    let (mut engine, _, _) = engine();
    engine.dispatch("go to settings").await;
    for i in 0..10 {
        let command = if i % 2 == 0 {
            "go to reports"
        } else {
            "go to analytics"
        };
        engine.dispatch(command).await;
    }

    assert_eq!(engine.context().len(), 10);
    assert!(engine
        .context()
        .iter()
        .all(|entry| entry.snapshot().section != Section::Settings));

    let mut restored = Vec::new();
    while !engine.context().is_empty() {
        engine.dispatch("go back").await;
        restored.push(engine.state().section);
    }
    assert!(!restored.contains(&Section::Settings));
    assert_eq!(restored.last(), Some(&Section::Overview));
}

#[tokio::test]
async fn test_go_back_restores_without_refetch() {
    let (mut engine, service, surface) = engine();
    engine
        .dispatch("check threat intelligence for sonic over the last week")
        .await;
    engine.dispatch("investigate bww store 155").await;
    let calls = service.calls().len();
    surface.clear();

    engine.dispatch("go back").await;
    let state = engine.state();
    assert_eq!(state.section, Section::FortiAnalyzer);
    assert_eq!(state.timeframe.as_deref(), Some("7d"));
    assert_eq!(
        engine.context().peek().map(|e| e.kind()),
        Some(ContextKind::ThreatIntelligence)
    );
    assert_eq!(service.calls().len(), calls);
    assert!(surface.events().contains(&SurfaceEvent::ShowSection {
        section: Section::FortiAnalyzer
    }));
}

#[tokio::test]
async fn test_show_more_reads_top_entry() {
    let (mut engine, service, _) = engine();
    engine.dispatch("show the bww overview").await;
    engine.dispatch("go to reports").await;

    // The top entry is a plain navigation: nothing to expand
    engine.dispatch("show more").await;
    assert_eq!(service.call_count(EndpointFamily::Threats), 0);

    engine.dispatch("go back").await;
    engine.dispatch("show more").await;
    assert_eq!(service.call_count(EndpointFamily::Threats), 1);
    assert_eq!(engine.context().len(), 1);
}
