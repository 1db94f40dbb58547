//! Announcement output.
//!
//! Every announcement goes to two live text regions and, when speech is on,
//! to the speech synthesizer. Audio is last-writer-wins: a new announcement
//! cancels whatever is still playing. Live regions are never cancelled.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SpeechConfig;
use crate::metrics::get_metrics;

// ============================================================================
// Announcement
// ============================================================================

/// Speech prosody hints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prosody {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Prosody {
    pub fn normal(config: &SpeechConfig) -> Self {
        Self {
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }

    /// Elevated rate and full volume.
    pub fn emergency(config: &SpeechConfig) -> Self {
        Self {
            rate: config.emergency_rate,
            pitch: config.pitch,
            volume: 1.0,
        }
    }
}

/// Assistive-technology priority of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Polite,
    Assertive,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    pub text: String,
    pub prosody: Prosody,
    pub priority: Priority,
    pub voice: Option<String>,
}

// ============================================================================
// Speech Synthesizer
// ============================================================================

/// Platform speech output.
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking. Returns immediately.
    fn speak(&self, announcement: &Announcement);

    /// Stop whatever is being spoken.
    fn cancel(&self);

    fn name(&self) -> &str;
}

/// Writes announcements to the log instead of an audio device.
#[derive(Debug, Default)]
pub struct TracingSynthesizer;

impl SpeechSynthesizer for TracingSynthesizer {
    fn speak(&self, announcement: &Announcement) {
        info!(
            rate = announcement.prosody.rate,
            priority = announcement.priority.as_str(),
            "speak: {}",
            announcement.text
        );
    }

    fn cancel(&self) {
        debug!("speech cancelled");
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Spoke(Announcement),
    Cancelled,
}

/// Keeps every speak and cancel call in order.
#[derive(Debug, Default)]
pub struct RecordingSynthesizer {
    events: Mutex<Vec<SpeechEvent>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SpeechEvent> {
        self.events.lock().clone()
    }

    /// Spoken announcements only.
    pub fn spoken(&self) -> Vec<Announcement> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SpeechEvent::Spoke(a) => Some(a.clone()),
                SpeechEvent::Cancelled => None,
            })
            .collect()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, announcement: &Announcement) {
        self.events.lock().push(SpeechEvent::Spoke(announcement.clone()));
    }

    fn cancel(&self) {
        self.events.lock().push(SpeechEvent::Cancelled);
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ============================================================================
// Live Regions
// ============================================================================

/// A text region read by assistive technology.
#[derive(Debug)]
pub struct LiveRegion {
    priority: Priority,
    text: RwLock<String>,
    updates: Mutex<u64>,
}

impl LiveRegion {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            text: RwLock::new(String::new()),
            updates: Mutex::new(0),
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set(&self, text: &str) {
        *self.text.write() = text.to_string();
        *self.updates.lock() += 1;
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn updates(&self) -> u64 {
        *self.updates.lock()
    }
}

// ============================================================================
// Output Hub
// ============================================================================

/// Fans announcements out to the synthesizer and both live regions.
pub struct OutputHub {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    status_region: Arc<LiveRegion>,
    alert_region: Arc<LiveRegion>,
    speech: SpeechConfig,
    last: Option<Announcement>,
}

impl OutputHub {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, speech: SpeechConfig) -> Self {
        Self {
            synthesizer,
            status_region: Arc::new(LiveRegion::new(Priority::Polite)),
            alert_region: Arc::new(LiveRegion::new(Priority::Assertive)),
            speech,
            last: None,
        }
    }

    /// Normal announcement.
    pub fn say(&mut self, text: impl Into<String>) -> &Announcement {
        let announcement = Announcement {
            text: text.into(),
            prosody: Prosody::normal(&self.speech),
            priority: Priority::Polite,
            voice: self.speech.voice.clone(),
        };
        self.emit(announcement)
    }

    /// Emergency announcement at the elevated rate.
    pub fn alert(&mut self, text: impl Into<String>) -> &Announcement {
        let announcement = Announcement {
            text: text.into(),
            prosody: Prosody::emergency(&self.speech),
            priority: Priority::Assertive,
            voice: self.speech.voice.clone(),
        };
        self.emit(announcement)
    }

    /// Update both live regions, then replace any audio in flight.
    pub fn emit(&mut self, announcement: Announcement) -> &Announcement {
        self.status_region.set(&announcement.text);
        self.alert_region.set(&announcement.text);

        if self.speech.enabled {
            self.synthesizer.cancel();
            self.synthesizer.speak(&announcement);
        }

        get_metrics().announcements_total.inc();
        self.last.insert(announcement)
    }

    /// Speak the last announcement again.
    pub fn repeat(&mut self) -> Option<&Announcement> {
        let last = self.last.clone()?;
        Some(self.emit(last))
    }

    /// Stop audio. Live regions keep their text.
    pub fn stop(&self) {
        self.synthesizer.cancel();
    }

    pub fn set_speech_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.synthesizer.cancel();
        }
        self.speech.enabled = enabled;
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech.enabled
    }

    pub fn last(&self) -> Option<&Announcement> {
        self.last.as_ref()
    }

    pub fn status_region(&self) -> Arc<LiveRegion> {
        Arc::clone(&self.status_region)
    }

    pub fn alert_region(&self) -> Arc<LiveRegion> {
        Arc::clone(&self.alert_region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> (OutputHub, Arc<RecordingSynthesizer>) {
        let synth = Arc::new(RecordingSynthesizer::new());
        let hub = OutputHub::new(synth.clone(), SpeechConfig::default());
        (hub, synth)
    }

    #[test]
    fn test_cancel_before_speak() {
        let (mut hub, synth) = hub();
        hub.say("first");
        hub.say("second");
        let events = synth.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], SpeechEvent::Cancelled);
        assert!(matches!(&events[3], SpeechEvent::Spoke(a) if a.text == "second"));
    }

    #[test]
    fn test_both_regions_updated() {
        let (mut hub, _) = hub();
        hub.say("store 155 loaded");
        assert_eq!(hub.status_region().text(), "store 155 loaded");
        assert_eq!(hub.alert_region().text(), "store 155 loaded");
        assert_eq!(hub.status_region().priority(), Priority::Polite);
        assert_eq!(hub.alert_region().priority(), Priority::Assertive);
    }

    #[test]
    fn test_regions_updated_with_speech_off() {
        let (mut hub, synth) = hub();
        hub.set_speech_enabled(false);
        hub.say("quiet");
        assert_eq!(hub.status_region().text(), "quiet");
        assert!(synth.spoken().is_empty());
    }

    #[test]
    fn test_stop_keeps_region_text() {
        let (mut hub, synth) = hub();
        hub.say("hello");
        hub.stop();
        assert_eq!(synth.events().last(), Some(&SpeechEvent::Cancelled));
        assert_eq!(hub.alert_region().text(), "hello");
    }

    #[test]
    fn test_alert_uses_emergency_prosody() {
        let (mut hub, _) = hub();
        let config = SpeechConfig::default();
        let announcement = hub.alert("emergency").clone();
        assert_eq!(announcement.prosody.rate, config.emergency_rate);
        assert_eq!(announcement.priority, Priority::Assertive);
    }

    #[test]
    fn test_repeat() {
        let (mut hub, synth) = hub();
        assert!(hub.repeat().is_none());
        hub.say("again");
        hub.repeat();
        assert_eq!(synth.spoken().len(), 2);
        assert_eq!(hub.status_region().updates(), 2);
    }
}
