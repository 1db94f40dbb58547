use crate::announce::announcer::help;
use crate::announce::payload::{decode, SystemStatus};
use crate::announce::{ResultPayload, NOTHING_TO_REPEAT};
use crate::context::ContextKind;
use crate::engine::DispatchEngine;
use crate::error::Result;
use crate::service::Endpoint;

impl DispatchEngine {
    /// Connection health. Stays on the current section.
    pub(crate) async fn system_health(&mut self) -> Result<()> {
        self.push_context(ContextKind::SystemHealth);

        let endpoint = Endpoint::integration_status();
        let mut status: SystemStatus = decode(&endpoint, self.fetch(&endpoint).await?)?;
        status.intelligence_available = self.intelligence_available;
        self.speak(&ResultPayload::SystemStatus(status));
        Ok(())
    }

    pub(crate) fn help(&mut self) {
        self.output.say(help(self.state.section));
    }

    pub(crate) fn repeat(&mut self) {
        if self.output.repeat().is_none() {
            self.output.say(NOTHING_TO_REPEAT);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::announce::NOTHING_TO_REPEAT;
    use crate::command::Section;
    use crate::context::ContextKind;
    use crate::engine::testing::demo;
    use crate::output::SpeechEvent;

    #[tokio::test]
    async fn test_system_health() {
        let mut h = demo();
        h.engine.probe_intelligence().await;
        h.engine.dispatch("check system status").await;

        assert_eq!(h.engine.state().section, Section::Overview);
        let text = h.engine.last_announcement().unwrap();
        assert!(text.starts_with("System status check complete."));
        assert!(text.contains("3 integration managers are active"));
        assert!(text.contains("The intelligence subsystem is available"));
    }

    #[tokio::test]
    async fn test_go_back_after_health_check_keeps_view() {
        let mut h = demo();
        h.engine.dispatch("go to reports").await;
        h.engine.dispatch("check system status").await;
        assert_eq!(h.engine.context().len(), 2);
        assert_eq!(
            h.engine.context().peek().map(|e| e.kind()),
            Some(ContextKind::SystemHealth)
        );
        let calls = h.service.calls().len();

        h.engine.dispatch("go back").await;
        assert_eq!(h.engine.state().section, Section::Reports);
        assert_eq!(h.engine.context().len(), 1);
        assert_eq!(h.service.calls().len(), calls);
    }

    #[tokio::test]
    async fn test_help_follows_section() {
        let mut h = demo();
        h.engine.dispatch("go to logs").await;
        h.engine.dispatch("what can i say").await;
        assert!(h
            .engine
            .last_announcement()
            .unwrap()
            .contains("search logs for malware"));
        assert_eq!(h.engine.context().len(), 1);
    }

    #[tokio::test]
    async fn test_repeat() {
        let mut h = demo();
        h.engine.dispatch("repeat that").await;
        assert_eq!(h.engine.last_announcement(), Some(NOTHING_TO_REPEAT));

        h.engine.dispatch("go to analytics").await;
        h.engine.dispatch("say that again").await;
        let spoken = h.synth.spoken();
        let n = spoken.len();
        assert_eq!(spoken[n - 1].text, spoken[n - 2].text);
    }

    #[tokio::test]
    async fn test_stop_speaking_cancels_audio_only() {
        let mut h = demo();
        h.engine.dispatch("go to reports").await;
        h.engine.dispatch("stop talking").await;
        assert_eq!(h.synth.events().last(), Some(&SpeechEvent::Cancelled));
        assert_eq!(
            h.engine.output().status_region().text(),
            "Navigating to reports."
        );
    }
}
