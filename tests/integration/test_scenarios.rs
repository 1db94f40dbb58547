//! End-to-end command scenarios.

use std::sync::Arc;

use netops_voice::command::{Brand, BrandCode, Section};
use netops_voice::context::ContextKind;
use netops_voice::navigation::{InputField, PageAction, SurfaceEvent};
use netops_voice::output::Priority;
use netops_voice::service::EndpointFamily;
use netops_voice::{
    Config, DispatchEngine, DispatchOutcome, MatchStage, RecordingSurface, RecordingSynthesizer,
    StaticDataService,
};

struct Rig {
    engine: DispatchEngine,
    service: Arc<StaticDataService>,
    surface: Arc<RecordingSurface>,
    synth: Arc<RecordingSynthesizer>,
}

fn setup(service: StaticDataService) -> Rig {
    let service = Arc::new(service);
    let surface = Arc::new(RecordingSurface::new());
    let synth = Arc::new(RecordingSynthesizer::new());
    let engine = DispatchEngine::new(
        Config::default(),
        service.clone(),
        surface.clone(),
        synth.clone(),
    );
    Rig {
        engine,
        service,
        surface,
        synth,
    }
}

#[tokio::test]
async fn test_investigate_store_end_to_end() {
    let mut rig = setup(StaticDataService::demo());
    let outcome = rig.engine.dispatch("  Investigate BWW store 155!  ").await;

    match outcome {
        DispatchOutcome::Handled { resolution } => {
            assert!(matches!(resolution.stage, MatchStage::Grammar { .. }));
            assert_eq!(resolution.intent.name(), "store_investigation");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let state = rig.engine.state();
    assert_eq!(state.section, Section::Investigation);
    assert_eq!(state.brand, Some(BrandCode::Known(Brand::Bww)));
    assert_eq!(state.store_id.as_deref(), Some("155"));

    let events = rig.surface.events();
    assert_eq!(
        events.first(),
        Some(&SurfaceEvent::ShowSection {
            section: Section::Investigation
        })
    );
    assert!(events.contains(&SurfaceEvent::SetField {
        field: InputField::StoreId,
        value: "155".to_string()
    }));
    assert!(events.contains(&SurfaceEvent::Trigger {
        action: PageAction::RunInvestigation
    }));

    assert_eq!(rig.service.call_count(EndpointFamily::StoreSecurity), 1);
    assert_eq!(rig.service.call_count(EndpointFamily::UrlBlocking), 1);

    let spoken = rig.synth.spoken();
    let last = spoken.last().unwrap();
    assert_eq!(last.priority, Priority::Polite);
    assert!(last
        .text
        .starts_with("Investigation of Buffalo Wild Wings store 155 complete."));
    assert_eq!(
        rig.engine.output().status_region().text(),
        last.text.as_str()
    );
}

#[tokio::test]
async fn test_unrecognized_input_changes_nothing() {
    let mut rig = setup(StaticDataService::demo());
    rig.engine.dispatch("go to reports").await;
    let state = rig.engine.state().clone();
    let depth = rig.engine.context().len();
    let events = rig.surface.events().len();

    let outcome = rig.engine.dispatch("order me a pizza").await;
    assert_eq!(outcome, DispatchOutcome::Unrecognized);
    assert_eq!(rig.engine.state(), &state);
    assert_eq!(rig.engine.context().len(), depth);
    assert_eq!(rig.surface.events().len(), events);
    assert!(rig.service.calls().is_empty());
    assert!(rig
        .engine
        .last_announcement()
        .unwrap()
        .starts_with("Command not recognized."));
}

#[tokio::test]
async fn test_failed_call_keeps_navigation() {
    let mut rig = setup(StaticDataService::demo().failing(EndpointFamily::StoreSecurity));
    rig.engine.dispatch("investigate arbys store 234").await;

    assert_eq!(rig.engine.state().section, Section::Investigation);
    assert_eq!(rig.engine.state().store_id.as_deref(), Some("234"));
    assert_eq!(
        rig.engine.context().peek().map(|e| e.kind()),
        Some(ContextKind::Investigation)
    );
    assert_eq!(
        rig.engine.last_announcement(),
        Some(
            "Unable to complete the store investigation. \
             The data service did not respond. Please try again."
        )
    );
}

#[tokio::test]
async fn test_fallback_log_search() {
    let mut rig = setup(StaticDataService::demo());
    let outcome = rig
        .engine
        .dispatch("look up ransomware over the last hour")
        .await;
    assert!(outcome.is_handled());
    if let DispatchOutcome::Handled { resolution } = outcome {
        assert!(matches!(resolution.stage, MatchStage::Fallback { .. }));
    }
    assert_eq!(rig.engine.state().section, Section::FortiAnalyzer);
    let call = &rig.service.calls()[0];
    assert_eq!(call.query_value("query"), Some("ransomware"));
    assert_eq!(call.query_value("timeframe"), Some("1h"));
}

#[tokio::test]
async fn test_emergency_is_assertive() {
    let mut rig = setup(StaticDataService::demo());
    rig.engine
        .dispatch("emergency at sonic store 22 payment terminals down")
        .await;

    let spoken = rig.synth.spoken();
    assert!(spoken.iter().all(|a| a.priority == Priority::Assertive));
    assert_eq!(
        rig.engine.output().alert_region().text(),
        spoken.last().unwrap().text
    );
    assert_eq!(rig.engine.state().section, Section::Investigation);
}

#[tokio::test]
async fn test_intelligence_gated_by_probe() {
    let mut rig = setup(StaticDataService::demo().failing(EndpointFamily::IntelligenceStatus));
    assert!(!rig.engine.probe_intelligence().await);
    let calls = rig.service.calls().len();

    rig.engine.dispatch("give me insights").await;
    assert_eq!(
        rig.engine.last_announcement(),
        Some("The intelligence subsystem is not available.")
    );
    assert_eq!(rig.service.calls().len(), calls);
    assert!(rig.engine.context().is_empty());

    let mut rig = setup(StaticDataService::demo());
    assert!(rig.engine.probe_intelligence().await);
    rig.engine.dispatch("give me insights").await;
    assert_eq!(rig.engine.state().section, Section::Intelligence);
    assert_eq!(rig.service.call_count(EndpointFamily::Insights), 1);
}

#[tokio::test]
async fn test_shortcut_help() {
    let mut rig = setup(StaticDataService::demo());
    let action = rig.engine.handle_key("Ctrl+Shift+H").await.unwrap();
    assert!(action.is_some());
    assert!(rig
        .engine
        .last_announcement()
        .unwrap()
        .starts_with("Here are some things you can say."));

    assert!(rig.engine.handle_key("Ctrl+Shift+Q").await.unwrap().is_none());
    assert!(rig.engine.handle_key("Q").await.is_err());
}
