use crate::{NarrationError, Result};
use speech_services::{pcm, AudioSink, NarrationService, NARRATION_SAMPLE_RATE_HZ};
use tracing::{debug, warn};

/// Completion notification observed through [`NarrationController::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationEvent {
    /// The current source finished playing naturally.
    Finished,
}

/// Drives question narration: loading -> speaking -> idle.
///
/// The speaking/loading flags are private; they move only through `speak`,
/// `stop` and `poll`, so dependent state can never be set independently.
pub struct NarrationController<N: NarrationService, S: AudioSink> {
    service: N,
    sink: Option<S>,
    is_loading: bool,
    is_speaking: bool,
    last_error: Option<String>,
}

impl<N: NarrationService, S: AudioSink> NarrationController<N, S> {
    pub fn new(service: N) -> Self {
        Self {
            service,
            sink: None,
            is_loading: false,
            is_speaking: false,
            last_error: None,
        }
    }

    /// Install the audio sink. Happens exactly once, on the first
    /// user-gesture-triggered ready action; the sink is reused for the
    /// whole session.
    pub fn install_sink(&mut self, sink: S) -> Result<()> {
        if self.sink.is_some() {
            return Err(NarrationError::SinkAlreadyInstalled);
        }
        self.sink = Some(sink);
        Ok(())
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Request, decode and play narration for `text`.
    ///
    /// Any in-flight playback is stopped and replaced. On failure the
    /// controller ends up idle (`is_speaking == false`) with the error
    /// recorded for the replay affordance, and the error is returned.
    pub fn speak(&mut self, text: &str) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(NarrationError::SinkNotInstalled)?;
        self.is_loading = true;
        self.last_error = None;

        let outcome = Self::fetch_and_play(&mut self.service, sink, text);
        self.is_loading = false;
        match outcome {
            Ok(()) => {
                self.is_speaking = true;
                debug!(chars = text.len(), "narration playing");
                Ok(())
            }
            Err(e) => {
                self.is_speaking = false;
                warn!(error = %e, "narration failed; awaiting manual replay");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn fetch_and_play(service: &mut N, sink: &mut S, text: &str) -> Result<()> {
        let payload = service.synthesize(text)?;
        let samples = pcm::decode_pcm16(&pcm::decode_base64(&payload)?)?;
        sink.resume()?;
        // Replace, never overlap.
        sink.stop();
        sink.play(&samples, NARRATION_SAMPLE_RATE_HZ)?;
        Ok(())
    }

    /// Observe natural playback completion.
    pub fn poll(&mut self) -> Option<NarrationEvent> {
        let sink = self.sink.as_mut()?;
        if sink.poll_ended() {
            self.is_speaking = false;
            debug!("narration finished");
            return Some(NarrationEvent::Finished);
        }
        None
    }

    /// Abort playback. Idempotent; aborted playback produces no
    /// `Finished` event.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.stop();
        }
        self.is_speaking = false;
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a source is actually playing right now, regardless of flags.
    pub fn sink_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.is_playing())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speech_services::{MockNarration, MockSink};

    fn controller_with_sink() -> (NarrationController<MockNarration, MockSink>, MockSink) {
        let mut c = NarrationController::new(MockNarration::default());
        let sink = MockSink::new();
        c.install_sink(sink.clone()).unwrap();
        (c, sink)
    }

    #[test]
    fn speak_requires_installed_sink() {
        let mut c: NarrationController<MockNarration, MockSink> =
            NarrationController::new(MockNarration::default());
        assert!(matches!(
            c.speak("hello"),
            Err(NarrationError::SinkNotInstalled)
        ));
        assert!(!c.is_speaking());
        assert!(!c.is_loading());
    }

    #[test]
    fn sink_installs_exactly_once() {
        let (mut c, _sink) = controller_with_sink();
        assert!(matches!(
            c.install_sink(MockSink::new()),
            Err(NarrationError::SinkAlreadyInstalled)
        ));
    }

    #[test]
    fn speak_transitions_to_speaking_and_finishes() {
        let (mut c, sink) = controller_with_sink();
        c.speak("Tell me about a time you led a team.").unwrap();
        assert!(c.is_speaking());
        assert!(!c.is_loading());
        assert!(c.poll().is_none());

        sink.finish();
        assert_eq!(c.poll(), Some(NarrationEvent::Finished));
        assert!(!c.is_speaking());
        assert!(c.poll().is_none());
    }

    #[test]
    fn service_failure_resolves_idle_with_recorded_error() {
        let service = MockNarration::default();
        let mut c = NarrationController::new(service.clone());
        c.install_sink(MockSink::new()).unwrap();

        service.fail_next_request();
        assert!(c.speak("question").is_err());
        assert!(!c.is_speaking());
        assert!(!c.is_loading());
        assert!(c.last_error().is_some());
        // Replay succeeds afterwards.
        c.speak("question").unwrap();
        assert!(c.is_speaking());
        assert!(c.last_error().is_none());
    }

    #[test]
    fn new_speak_replaces_current_source() {
        let (mut c, sink) = controller_with_sink();
        c.speak("first question").unwrap();
        c.speak("second question").unwrap();
        assert!(c.is_speaking());
        assert_eq!(sink.play_count(), 2);
        assert!(
            sink.stop_count() >= 1,
            "old source must be stopped, not overlapped"
        );
    }

    #[test]
    fn resume_precedes_every_play() {
        let mut c = NarrationController::new(MockNarration::default());
        let sink = MockSink::suspended();
        c.install_sink(sink.clone()).unwrap();
        c.speak("question").unwrap();
        assert_eq!(sink.resume_count(), 1);
        c.speak("again").unwrap();
        assert_eq!(sink.resume_count(), 2);
    }

    #[test]
    fn stop_aborts_without_finished_event() {
        let (mut c, _sink) = controller_with_sink();
        c.speak("question").unwrap();
        c.stop();
        assert!(!c.is_speaking());
        assert!(c.poll().is_none());
        c.stop(); // idempotent
    }
}
