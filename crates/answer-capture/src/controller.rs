use crate::phrase::{self, ScanOutcome};
use crate::{Result, RestartSupervisor};
use speech_services::{TranscriptionEvent, TranscriptionStream};
use std::time::Instant;
use tracing::{debug, warn};

/// Notifications observed through [`AnswerCaptureController::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The start phrase was detected; the answer window is open.
    CaptureStarted,
    /// The end phrase was detected; carries the final answer text.
    AnswerCommitted(String),
}

/// Segments free speech into one committed answer per question turn.
///
/// Owns the per-question transcript buffer exclusively. The buffer is reset
/// by the orchestrator whenever narration starts and by the controller
/// itself on commit, so partial speech never leaks across questions and a
/// turn commits at most once.
pub struct AnswerCaptureController<T: TranscriptionStream> {
    stream: T,
    supervisor: RestartSupervisor,
    transcript: String,
    current_answer: String,
    capturing: bool,
    should_listen: bool,
}

impl<T: TranscriptionStream> AnswerCaptureController<T> {
    pub fn new(stream: T) -> Self {
        Self::with_supervisor(stream, RestartSupervisor::default())
    }

    pub fn with_supervisor(stream: T, supervisor: RestartSupervisor) -> Self {
        Self {
            stream,
            supervisor,
            transcript: String::new(),
            current_answer: String::new(),
            capturing: false,
            should_listen: false,
        }
    }

    /// Start listening. Idempotent: a stream that is already starting or
    /// active is left alone, so racing restarts are harmless.
    pub fn begin_listening(&mut self) -> Result<()> {
        self.should_listen = true;
        self.stream.start()?;
        Ok(())
    }

    /// Halt the stream and any scheduled restart. Safe when already
    /// stopped.
    pub fn stop_listening(&mut self) {
        self.should_listen = false;
        self.supervisor.cancel();
        self.stream.stop();
    }

    /// Clear the per-question buffer. Called when narration starts so old
    /// partial speech cannot leak into the next question.
    pub fn reset_transcript(&mut self) {
        self.transcript.clear();
        self.current_answer.clear();
        self.capturing = false;
    }

    /// Drain stream events and apply the command protocol. Returns the
    /// first notable event; call repeatedly to drain.
    pub fn poll(&mut self, now: Instant) -> Option<CaptureEvent> {
        if !self.should_listen {
            // Stale events delivered after stop (or after a commit ended
            // the turn) must not re-open an answer window.
            while self.stream.poll().is_some() {}
            return None;
        }
        while let Some(event) = self.stream.poll() {
            match event {
                TranscriptionEvent::Transcript(text) => {
                    self.transcript = text;
                    if let Some(out) = self.apply_protocol() {
                        return Some(out);
                    }
                }
                TranscriptionEvent::Error(kind) if kind.is_transient() => {
                    // no-speech / aborted: business as usual
                }
                TranscriptionEvent::Error(kind) => {
                    warn!(?kind, "transcription error; stream stays supervised");
                }
                TranscriptionEvent::Ended => {
                    if self.should_listen {
                        debug!("transcription stream ended unexpectedly; scheduling restart");
                        self.supervisor.note_stream_ended(now);
                    }
                }
            }
        }
        // A single cumulative result can both open and close the answer
        // window; re-apply so the commit behind a just-returned
        // CaptureStarted is not missed.
        self.apply_protocol()
    }

    /// Run due restarts. A failed start is rescheduled.
    pub fn tick(&mut self, now: Instant) {
        if self.should_listen && self.supervisor.restart_due(now) {
            if let Err(e) = self.stream.start() {
                warn!(error = %e, "transcription restart failed");
                self.supervisor.note_stream_ended(now);
            }
        }
    }

    fn apply_protocol(&mut self) -> Option<CaptureEvent> {
        if !self.capturing {
            if phrase::contains_start(&self.transcript) {
                self.capturing = true;
                debug!("start phrase detected; capturing answer");
                return Some(CaptureEvent::CaptureStarted);
            }
            return None;
        }
        match phrase::scan_capturing(&self.transcript) {
            ScanOutcome::Incomplete(candidate) => {
                self.current_answer = candidate;
                None
            }
            ScanOutcome::Committed(answer) => {
                self.current_answer = answer.clone();
                // Turn over: stop the stream and reset for the next question.
                self.stop_listening();
                self.transcript.clear();
                self.capturing = false;
                debug!(chars = answer.len(), "answer committed");
                Some(CaptureEvent::AnswerCommitted(answer))
            }
        }
    }

    pub fn is_listening(&self) -> bool {
        self.stream.is_active()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Live answer candidate; also backs the manual-advance affordance.
    pub fn current_answer(&self) -> &str {
        &self.current_answer
    }
}
