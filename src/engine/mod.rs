//! The dispatch engine.
//!
//! Owns the matcher, the context stack, the navigation state and the output
//! hub. One utterance is handled at a time: `dispatch` takes `&mut self`, so
//! a handler's state mutation, data call and announcement complete before
//! the next utterance is looked at.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::announce::{self, ResultPayload, UNRECOGNIZED};
use crate::command::{normalize_timeframe, CommandMatcher, Intent, Resolution, Utterance};
use crate::config::Config;
use crate::context::{ContextKind, ContextStack};
use crate::error::{Result, VoiceError};
use crate::metrics::{get_metrics, Metrics};
use crate::navigation::{NavigationState, Surface};
use crate::output::{OutputHub, SpeechSynthesizer};
use crate::recognition::{RecognitionError, RecognitionSession, SessionState};
use crate::service::{DataService, Endpoint};
use crate::shortcuts::{KeyChord, ShortcutAction, ShortcutMap};

/// What happened to one utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Handled { resolution: Resolution },
    Unrecognized,
    Empty,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}

pub struct DispatchEngine {
    matcher: CommandMatcher,
    context: ContextStack,
    state: NavigationState,
    service: Arc<dyn DataService>,
    surface: Arc<dyn Surface>,
    output: OutputHub,
    session: RecognitionSession,
    shortcuts: ShortcutMap,
    config: Config,
    intelligence_available: bool,
    voice_enabled: bool,
    settings_open: bool,
}

impl DispatchEngine {
    /// Build an engine. The intelligence capability starts off; see
    /// [`DispatchEngine::probe_intelligence`].
    pub fn new(
        config: Config,
        service: Arc<dyn DataService>,
        surface: Arc<dyn Surface>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let output = OutputHub::new(synthesizer, config.speech.clone());
        Self {
            matcher: CommandMatcher::standard(),
            context: ContextStack::new(),
            state: NavigationState::default(),
            service,
            surface,
            output,
            session: RecognitionSession::new(),
            shortcuts: ShortcutMap::standard(),
            config,
            intelligence_available: false,
            voice_enabled: true,
            settings_open: false,
        }
    }

    /// Build an engine and probe the intelligence subsystem once.
    pub async fn start(
        config: Config,
        service: Arc<dyn DataService>,
        surface: Arc<dyn Surface>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let mut engine = Self::new(config, service, surface, synthesizer);
        engine.probe_intelligence().await;
        engine
    }

    /// Ask the data service whether the intelligence subsystem is up.
    pub async fn probe_intelligence(&mut self) -> bool {
        if !self.config.intelligence.probe {
            self.intelligence_available = false;
            return false;
        }

        let endpoint = Endpoint::intelligence_status();
        self.intelligence_available = match self.service.call(&endpoint).await {
            Ok(response) => response.success,
            Err(e) => {
                debug!("intelligence probe failed: {}", e);
                false
            }
        };
        info!(
            "Intelligence subsystem {}",
            if self.intelligence_available {
                "available"
            } else {
                "not available"
            }
        );
        self.intelligence_available
    }

    pub fn set_intelligence_available(&mut self, available: bool) {
        self.intelligence_available = available;
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Recognize and handle one utterance.
    pub async fn dispatch(&mut self, raw: &str) -> DispatchOutcome {
        let metrics = get_metrics();
        metrics.utterances_total.inc();

        let utterance = Utterance::new(raw);
        if utterance.is_empty() {
            return DispatchOutcome::Empty;
        }

        let Some(resolution) = self.matcher.resolve(&utterance.normalized) else {
            info!("Unrecognized: {}", utterance.normalized);
            metrics.dispatch_misses_total.inc();
            self.output.say(UNRECOGNIZED);
            return DispatchOutcome::Unrecognized;
        };

        info!(
            intent = resolution.intent.name(),
            stage = resolution.stage.label(),
            "Dispatching: {}",
            utterance.normalized
        );
        metrics.record_match(resolution.stage.label(), resolution.intent.name());

        {
            let _timer = Metrics::start_timer(&metrics.handler_duration_seconds);
            self.handle(resolution.intent.clone()).await;
        }
        metrics.context_depth.set(self.context.len() as i64);

        DispatchOutcome::Handled { resolution }
    }

    /// A final transcript from the recognizer. Ends the session.
    pub async fn on_transcript(&mut self, transcript: &str) -> DispatchOutcome {
        self.session.finish();
        self.dispatch(transcript).await
    }

    /// A recognizer error code. Ends the session and speaks the mapped
    /// message.
    pub fn on_recognition_error(&mut self, code: &str) -> RecognitionError {
        self.session.finish();
        let error = RecognitionError::from_code(code);
        warn!("Recognition error: {}", error.code());
        self.output.say(error.to_string());
        error
    }

    /// Start listening, or stop if a session is already active.
    pub fn toggle_listening(&mut self) -> SessionState {
        if !self.voice_enabled {
            self.output.say("Voice control is turned off.");
            return self.session.state();
        }
        let state = self.session.toggle();
        match state {
            SessionState::Listening => self.output.say("Listening."),
            SessionState::Idle => self.output.say("Stopped listening."),
        };
        state
    }

    /// Run the action bound to a chord. Unbound chords do nothing.
    pub async fn handle_shortcut(&mut self, chord: &KeyChord) -> Option<ShortcutAction> {
        let action = self.shortcuts.lookup(chord)?;
        debug!("Shortcut {} → {:?}", chord, action);
        match action {
            ShortcutAction::ToggleVoice => {
                self.voice_enabled = !self.voice_enabled;
                if !self.voice_enabled {
                    self.session.finish();
                }
                let text = if self.voice_enabled {
                    "Voice control enabled."
                } else {
                    "Voice control disabled."
                };
                self.output.say(text);
            }
            ShortcutAction::StartListening => {
                self.toggle_listening();
            }
            ShortcutAction::StopOutput => self.output.stop(),
            ShortcutAction::Help => self.handle(Intent::Help).await,
            ShortcutAction::ToggleSettings => {
                self.settings_open = !self.settings_open;
                let text = if self.settings_open {
                    "Voice settings opened."
                } else {
                    "Voice settings closed."
                };
                self.output.say(text);
            }
        }
        Some(action)
    }

    /// Parse a chord string and run its action.
    pub async fn handle_key(&mut self, chord: &str) -> Result<Option<ShortcutAction>> {
        let chord: KeyChord = chord.parse()?;
        Ok(self.handle_shortcut(&chord).await)
    }

    // ========================================================================
    // Intent Routing
    // ========================================================================

    async fn handle(&mut self, intent: Intent) {
        let subject = failure_subject(&intent);
        let result = match intent {
            Intent::Navigate { section } => {
                self.navigate_to(section);
                Ok(())
            }
            Intent::BrandOverview { brand } => self.brand_overview(&brand).await,
            Intent::InvestigateStore {
                brand,
                store_id,
                focus,
            } => {
                self.investigate_store(&brand, &store_id, focus.as_deref())
                    .await
            }
            Intent::SearchLogs {
                query,
                brand,
                source,
                timeframe,
            } => {
                self.search_logs(&query, brand.as_deref(), source, timeframe.as_deref())
                    .await
            }
            Intent::SecurityEvents { severity, brand } => {
                self.security_events(severity, brand.as_deref()).await
            }
            Intent::ThreatIntelligence { brand, timeframe } => {
                self.threat_intelligence(brand.as_deref(), timeframe.as_deref())
                    .await
            }
            Intent::WebFilterStatus { brand, store_id } => {
                self.web_filter_status(brand.as_deref(), store_id.as_deref())
                    .await
            }
            Intent::SystemHealth => self.system_health().await,
            Intent::GenerateReport {
                report_type,
                brand,
                store_id,
                timeframe,
            } => {
                self.generate_report(
                    report_type,
                    brand.as_deref(),
                    store_id.as_deref(),
                    timeframe.as_deref(),
                )
                .await
            }
            Intent::ShowMore => self.show_more().await,
            Intent::GoBack => {
                self.go_back();
                Ok(())
            }
            Intent::Emergency {
                brand,
                store_id,
                description,
            } => {
                self.emergency(brand.as_deref(), store_id.as_deref(), description.as_deref())
                    .await
            }
            Intent::BulkOperation {
                action,
                brand,
                focus,
            } => self.bulk_operation(action, brand.as_deref(), focus).await,
            Intent::Intelligence { request } => self.intelligence(&request).await,
            Intent::Help => {
                self.help();
                Ok(())
            }
            Intent::StopSpeaking => {
                self.output.stop();
                Ok(())
            }
            Intent::Repeat => {
                self.repeat();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report_failure(subject, &e);
        }
    }

    // ========================================================================
    // Handler Plumbing
    // ========================================================================

    /// Replace the navigation state and mirror it to the surface.
    fn navigate(&mut self, next: NavigationState) {
        self.state = next;
        self.state.apply_to(self.surface.as_ref());
    }

    fn push_context(&mut self, kind: ContextKind) {
        let entry = self.context.push(kind, self.state.clone());
        debug!("Context push: {} (depth {})", entry.kind().as_str(), self.context.len());
    }

    /// Pause between a section change and the dependent call.
    async fn settle(&self) {
        let delay = self.config.dispatch.settle_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    /// Call an endpoint and return the payload of a successful response.
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value> {
        self.service.call(endpoint).await?.into_payload(endpoint)
    }

    /// Normalized timeframe, or the configured default.
    fn timeframe(&self, captured: Option<&str>) -> String {
        captured
            .map(normalize_timeframe)
            .unwrap_or_else(|| self.config.dispatch.default_timeframe.clone())
    }

    fn speak(&mut self, payload: &ResultPayload) {
        let text = announce::announce(payload);
        self.output.say(text);
    }

    fn report_failure(&mut self, subject: &str, error: &VoiceError) {
        warn!("{} failed: {}", subject, error);
        get_metrics().handler_errors_total.inc();
        self.output.say(announce::announcer::failure(subject));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    pub fn output(&self) -> &OutputHub {
        &self.output
    }

    pub fn matcher(&self) -> &CommandMatcher {
        &self.matcher
    }

    pub fn session(&self) -> &RecognitionSession {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn intelligence_available(&self) -> bool {
        self.intelligence_available
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Text of the most recent announcement.
    pub fn last_announcement(&self) -> Option<&str> {
        self.output.last().map(|a| a.text.as_str())
    }
}

/// Phrase used in the failure announcement for an intent.
fn failure_subject(intent: &Intent) -> &'static str {
    match intent {
        Intent::Navigate { .. } => "navigation",
        Intent::BrandOverview { .. } => "brand overview",
        Intent::InvestigateStore { .. } => "store investigation",
        Intent::SearchLogs { .. } => "log search",
        Intent::SecurityEvents { .. } => "security event search",
        Intent::ThreatIntelligence { .. } => "threat intelligence request",
        Intent::WebFilterStatus { .. } => "web filter check",
        Intent::SystemHealth => "system status check",
        Intent::GenerateReport { .. } => "report generation",
        Intent::ShowMore => "detail request",
        Intent::GoBack => "navigation",
        Intent::Emergency { .. } => "emergency search",
        Intent::BulkOperation { .. } => "bulk operation",
        Intent::Intelligence { request } => request.display_name(),
        Intent::Help | Intent::StopSpeaking | Intent::Repeat => "request",
    }
}
