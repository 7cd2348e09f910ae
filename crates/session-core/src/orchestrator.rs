use crate::{EndReason, Phase, Question, Result, SessionError};
use answer_capture::{AnswerCaptureController, CaptureEvent};
use narration::{NarrationController, NarrationEvent};
use proctor_guard::{EnvironmentSignal, Violation, ViolationDetector};
use speech_services::{AudioSink, MediaRecorder, NarrationService, TranscriptionStream};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{info, warn};

/// Strikes that force termination.
pub const MAX_STRIKES: usize = 3;

/// Observable session events, drained through [`SessionOrchestrator::tick`]
/// (violations come back directly from `observe_environment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// Narration for `questions[index]` was requested.
    QuestionStarted { index: usize },
    /// Narration is over; listening for the start phrase.
    CaptureArmed,
    /// The start phrase was heard; the answer window is open.
    CaptureStarted,
    /// An answer was committed for `questions[index]`.
    AnswerCommitted { index: usize, answer: String },
    /// A proctoring violation was recorded.
    Warning { strikes: usize, message: String },
    /// Third strike: the session is over, answers so far stand.
    Terminated,
    /// Every question was answered, or the caller ended the session.
    SessionComplete,
}

/// Drives one live interview session across its collaborators.
///
/// Owns the narration and answer-capture controllers plus the media
/// recorder, and holds the only mutable session state (cursor, committed
/// answers, strikes, phase). Narration and capture are mutually exclusive
/// by construction: every path into `Narrating` force-stops capture, and
/// every path into `AwaitingAnswerStart` confirms playback has stopped.
pub struct SessionOrchestrator<N, S, T, R>
where
    N: NarrationService,
    S: AudioSink,
    T: TranscriptionStream,
    R: MediaRecorder,
{
    narration: NarrationController<N, S>,
    capture: AnswerCaptureController<T>,
    recorder: R,
    detector: ViolationDetector,
    session_id: String,
    role: String,
    questions: Vec<Question>,
    current_index: usize,
    committed_answers: Vec<String>,
    strikes: Vec<Violation>,
    phase: Phase,
    pending: VecDeque<SessionNotice>,
}

impl<N, S, T, R> SessionOrchestrator<N, S, T, R>
where
    N: NarrationService,
    S: AudioSink,
    T: TranscriptionStream,
    R: MediaRecorder,
{
    /// Begin a session over an ordered, non-empty question sequence.
    /// The session sits in `AwaitingReady` until the user-gesture gate.
    pub fn start(
        service: N,
        stream: T,
        recorder: R,
        session_id: impl Into<String>,
        role: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let session_id = session_id.into();
        let role = role.into();
        info!(%session_id, %role, questions = questions.len(), "session created");
        Ok(Self {
            narration: NarrationController::new(service),
            capture: AnswerCaptureController::new(stream),
            recorder,
            detector: ViolationDetector::new(),
            session_id,
            role,
            questions,
            current_index: 0,
            committed_answers: Vec::new(),
            strikes: Vec::new(),
            phase: Phase::AwaitingReady,
            pending: VecDeque::new(),
        })
    }

    /// User-gesture gate. Starts the recorder (a failure is fatal: the
    /// session stays in `AwaitingReady` and the error surfaces), installs
    /// the audio sink exactly once, then enters the first question.
    pub fn ready_acknowledged(&mut self, sink: S) -> Result<()> {
        if self.phase != Phase::AwaitingReady {
            return Err(SessionError::InvalidPhase {
                operation: "ready acknowledgement",
                phase: self.phase,
            });
        }
        self.recorder.start().map_err(SessionError::RecorderStart)?;
        self.narration.install_sink(sink)?;
        self.enter_question(0);
        Ok(())
    }

    /// Pump the session. Polls narration completion and, in listening
    /// phases, capture events and stream restarts. Returns the notices
    /// raised since the last call. After `Ended` nothing new is produced.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionNotice> {
        if !self.phase.is_terminal() {
            if self.narration.poll() == Some(NarrationEvent::Finished)
                && self.phase == Phase::Narrating
            {
                self.arm_capture();
            }
            if self.phase.is_listening_phase() {
                self.capture.tick(now);
                while let Some(event) = self.capture.poll(now) {
                    match event {
                        CaptureEvent::CaptureStarted => {
                            self.phase = Phase::CapturingAnswer;
                            self.pending.push_back(SessionNotice::CaptureStarted);
                        }
                        CaptureEvent::AnswerCommitted(answer) => {
                            self.commit_answer(answer);
                            break;
                        }
                    }
                }
            } else {
                // Stale provider events delivered outside a listening
                // phase must not survive into the next question turn.
                let _ = self.capture.poll(now);
            }
        }
        self.pending.drain(..).collect()
    }

    /// Feed one environment transition. Violations are ignored before the
    /// ready gate and after the end; otherwise each one is a strike and
    /// the third tears the session down from any phase.
    pub fn observe_environment(&mut self, signal: EnvironmentSignal) -> Option<SessionNotice> {
        if self.phase == Phase::AwaitingReady || self.phase.is_terminal() {
            return None;
        }
        let kind = self.detector.observe(signal)?;
        let violation = Violation::now(kind);
        self.strikes.push(violation);
        let strikes = self.strikes.len();
        warn!(?kind, strikes, "proctoring violation");
        if strikes >= MAX_STRIKES {
            self.finish(EndReason::Strikeout);
        }
        Some(SessionNotice::Warning {
            strikes,
            message: kind.message().to_string(),
        })
    }

    /// Manual advance. Commits the live answer candidate for the current
    /// question; requires an open session, a listening phase and a
    /// non-empty candidate.
    pub fn next_question(&mut self) -> Result<()> {
        if self.phase.is_terminal() {
            return Err(SessionError::SessionOver);
        }
        if !self.phase.is_listening_phase() {
            return Err(SessionError::InvalidPhase {
                operation: "manual advance",
                phase: self.phase,
            });
        }
        let answer = self.capture.current_answer().trim().to_string();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.commit_answer(answer);
        Ok(())
    }

    /// Manual retry of the current question's narration. On failure the
    /// session falls through to listening, same as an automatic entry.
    pub fn replay_question(&mut self) -> Result<()> {
        if self.phase.is_terminal() {
            return Err(SessionError::SessionOver);
        }
        if self.phase == Phase::AwaitingReady {
            return Err(SessionError::InvalidPhase {
                operation: "replay",
                phase: self.phase,
            });
        }
        match self.speak_current() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.arm_capture();
                Err(e)
            }
        }
    }

    /// Stop all media and finalize the answer list. Missing answers are
    /// absent, never padded. Safe to call on an already-ended session.
    pub fn end_session(&mut self) -> Vec<String> {
        if !self.phase.is_terminal() {
            self.finish(EndReason::Normal);
        }
        self.committed_answers.clone()
    }

    fn enter_question(&mut self, index: usize) {
        self.current_index = index;
        if let Err(e) = self.speak_current() {
            // Narration failure resolves early: the question text is on
            // screen and the user can replay; listening proceeds.
            warn!(error = %e, index, "narration failed; proceeding to listening");
            self.arm_capture();
        }
    }

    fn speak_current(&mut self) -> Result<()> {
        // The stream must never transcribe our own narration.
        self.capture.stop_listening();
        self.capture.reset_transcript();
        self.phase = Phase::Narrating;
        self.pending.push_back(SessionNotice::QuestionStarted {
            index: self.current_index,
        });
        let text = self
            .questions
            .get(self.current_index)
            .map(|q| q.question.clone())
            .unwrap_or_default();
        self.narration.speak(&text)?;
        Ok(())
    }

    fn arm_capture(&mut self) {
        // Confirm nothing is still playing before listening starts.
        if self.narration.sink_playing() {
            self.narration.stop();
        }
        self.capture.reset_transcript();
        self.phase = Phase::AwaitingAnswerStart;
        if let Err(e) = self.capture.begin_listening() {
            warn!(error = %e, "transcription failed to start; replay re-arms it");
        }
        self.pending.push_back(SessionNotice::CaptureArmed);
    }

    fn commit_answer(&mut self, answer: String) {
        self.phase = Phase::Advancing;
        self.capture.stop_listening();
        let index = self.current_index;
        self.committed_answers.push(answer.clone());
        info!(index, chars = answer.len(), "answer committed");
        self.pending
            .push_back(SessionNotice::AnswerCommitted { index, answer });
        if index + 1 < self.questions.len() {
            self.enter_question(index + 1);
        } else {
            self.finish(EndReason::Normal);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.capture.stop_listening();
        self.narration.stop();
        self.recorder.stop();
        self.phase = Phase::Ended(reason);
        self.pending.push_back(match reason {
            EndReason::Normal => SessionNotice::SessionComplete,
            EndReason::Strikeout => SessionNotice::Terminated,
        });
        info!(
            phase = %self.phase,
            answers = self.committed_answers.len(),
            strikes = self.strikes.len(),
            "session ended"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn committed_answers(&self) -> &[String] {
        &self.committed_answers
    }

    pub fn strikes(&self) -> &[Violation] {
        &self.strikes
    }

    pub fn is_speaking(&self) -> bool {
        self.narration.is_speaking()
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_listening()
    }

    /// Last narration failure, for the replay affordance.
    pub fn narration_error(&self) -> Option<&str> {
        self.narration.last_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionKind;
    use speech_services::{MockNarration, MockRecorder, MockSink, MockTranscription};

    type TestOrchestrator =
        SessionOrchestrator<MockNarration, MockSink, MockTranscription, MockRecorder>;

    struct Rig {
        o: TestOrchestrator,
        tts: MockNarration,
        stream: MockTranscription,
        sink: MockSink,
        recorder: MockRecorder,
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q_{i}"),
                kind: QuestionKind::Behavioral,
                question: format!("Question number {i}?"),
            })
            .collect()
    }

    fn rig_with_recorder(n: usize, recorder: MockRecorder) -> Rig {
        let tts = MockNarration::default();
        let stream = MockTranscription::new();
        let o = SessionOrchestrator::start(
            tts.clone(),
            stream.clone(),
            recorder.clone(),
            "sess_test",
            "QA Engineer",
            questions(n),
        )
        .unwrap();
        Rig {
            o,
            tts,
            stream,
            sink: MockSink::new(),
            recorder,
        }
    }

    fn rig(n: usize) -> Rig {
        rig_with_recorder(n, MockRecorder::new())
    }

    fn check_invariants(o: &TestOrchestrator) {
        assert!(
            !(o.is_speaking() && o.is_listening()),
            "narration and capture were live at the same time"
        );
        assert!(o.committed_answers().len() <= o.current_index() + 1);
    }

    /// Finish the current narration and speak one full verbal turn.
    fn answer_current(r: &mut Rig, t: Instant, text: &str) -> Vec<SessionNotice> {
        r.sink.finish();
        let mut notices = r.o.tick(t);
        check_invariants(&r.o);
        r.stream
            .push_transcript(format!("my answer {text} this is my answer"));
        notices.extend(r.o.tick(t));
        check_invariants(&r.o);
        notices
    }

    #[test]
    fn a_session_needs_questions() {
        let result = TestOrchestrator::start(
            MockNarration::default(),
            MockTranscription::new(),
            MockRecorder::new(),
            "sess_empty",
            "QA Engineer",
            Vec::new(),
        );
        assert!(matches!(result, Err(SessionError::NoQuestions)));
    }

    #[test]
    fn ready_gate_starts_recording_and_narrates_question_zero() {
        let mut r = rig(3);
        assert_eq!(r.o.phase(), Phase::AwaitingReady);
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        assert_eq!(r.o.phase(), Phase::Narrating);
        assert!(r.o.is_speaking());
        assert!(!r.o.is_listening());
        assert!(r.recorder.is_recording());
        assert_eq!(r.sink.play_count(), 1);
        let notices = r.o.tick(Instant::now());
        assert_eq!(notices, vec![SessionNotice::QuestionStarted { index: 0 }]);
        // The gate is one-shot.
        assert!(matches!(
            r.o.ready_acknowledged(MockSink::new()),
            Err(SessionError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn recorder_failure_is_fatal_to_the_ready_transition() {
        let mut r = rig_with_recorder(3, MockRecorder::failing());
        let result = r.o.ready_acknowledged(r.sink.clone());
        assert!(matches!(result, Err(SessionError::RecorderStart(_))));
        assert_eq!(r.o.phase(), Phase::AwaitingReady);
        assert_eq!(r.sink.play_count(), 0);
        assert!(r.o.tick(Instant::now()).is_empty());
    }

    #[test]
    fn three_question_session_runs_to_normal_completion() {
        let mut r = rig(3);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        assert_eq!(r.o.tick(t), vec![SessionNotice::QuestionStarted { index: 0 }]);

        let notices = answer_current(&mut r, t, "it works great");
        assert_eq!(
            notices,
            vec![
                SessionNotice::CaptureArmed,
                SessionNotice::CaptureStarted,
                SessionNotice::AnswerCommitted {
                    index: 0,
                    answer: "it works great".to_string()
                },
                SessionNotice::QuestionStarted { index: 1 },
            ]
        );
        assert_eq!(r.o.current_index(), 1);
        assert!(r.o.is_speaking(), "next narration begins automatically");

        answer_current(&mut r, t, "second answer");
        let notices = answer_current(&mut r, t, "third answer");
        assert!(notices.contains(&SessionNotice::SessionComplete));

        assert_eq!(r.o.phase(), Phase::Ended(EndReason::Normal));
        assert_eq!(
            r.o.committed_answers(),
            ["it works great", "second answer", "third answer"]
        );
        assert!(!r.recorder.is_recording());
        assert!(!r.o.is_speaking());
        assert!(!r.o.is_listening());

        // Nothing is processed after the end.
        r.stream.push_transcript("my answer late this is my answer");
        assert!(r.o.tick(t).is_empty());
        assert_eq!(r.o.committed_answers().len(), 3);
    }

    #[test]
    fn three_visibility_strikes_terminate_from_any_phase() {
        let mut r = rig(3);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        r.o.tick(t);

        // Strike 1 while narrating.
        let n = r.o.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true });
        assert_eq!(
            n,
            Some(SessionNotice::Warning {
                strikes: 1,
                message: "Tab switch detected".to_string()
            })
        );
        assert!(r
            .o
            .observe_environment(EnvironmentSignal::VisibilityChanged { hidden: false })
            .is_none());

        // Strike 2 while awaiting the start phrase.
        r.sink.finish();
        r.o.tick(t);
        assert_eq!(r.o.phase(), Phase::AwaitingAnswerStart);
        let n = r.o.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true });
        assert!(matches!(n, Some(SessionNotice::Warning { strikes: 2, .. })));
        r.o.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: false });

        // Strike 3 while capturing.
        r.stream.push_transcript("my answer so far");
        r.o.tick(t);
        assert_eq!(r.o.phase(), Phase::CapturingAnswer);
        let n = r.o.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true });
        assert!(matches!(n, Some(SessionNotice::Warning { strikes: 3, .. })));

        assert_eq!(r.o.phase(), Phase::Ended(EndReason::Strikeout));
        assert!(!r.o.is_speaking());
        assert!(!r.o.is_listening());
        assert!(!r.recorder.is_recording());
        assert_eq!(r.o.tick(t), vec![SessionNotice::Terminated]);

        // Strikes are final; nothing runs afterwards.
        assert!(r
            .o
            .observe_environment(EnvironmentSignal::VisibilityChanged { hidden: false })
            .is_none());
        r.stream.push_transcript("my answer late this is my answer");
        assert!(r.o.tick(t).is_empty());
        assert!(r.o.committed_answers().is_empty());
        assert_eq!(r.o.strikes().len(), 3);
        assert_eq!(r.o.end_session(), Vec::<String>::new());
    }

    #[test]
    fn held_degraded_state_is_a_single_strike() {
        let mut r = rig(1);
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        assert!(r
            .o
            .observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true })
            .is_some());
        assert!(r
            .o
            .observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true })
            .is_none());
        assert_eq!(r.o.strikes().len(), 1);
    }

    #[test]
    fn violations_before_the_ready_gate_are_ignored() {
        let mut r = rig(1);
        assert!(r
            .o
            .observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true })
            .is_none());
        assert!(r.o.strikes().is_empty());
    }

    #[test]
    fn manual_advance_commits_the_live_candidate() {
        let mut r = rig(2);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        assert!(matches!(
            r.o.next_question(),
            Err(SessionError::InvalidPhase { .. })
        ));

        r.sink.finish();
        r.o.tick(t);
        assert!(matches!(r.o.next_question(), Err(SessionError::EmptyAnswer)));

        r.stream.push_transcript("my answer partial thought");
        r.o.tick(t);
        assert_eq!(r.o.phase(), Phase::CapturingAnswer);
        r.o.next_question().unwrap();

        assert_eq!(r.o.committed_answers(), ["partial thought"]);
        assert_eq!(r.o.current_index(), 1);
        assert_eq!(r.o.phase(), Phase::Narrating);
        let notices = r.o.tick(t);
        assert!(notices.contains(&SessionNotice::AnswerCommitted {
            index: 0,
            answer: "partial thought".to_string()
        }));
        assert!(notices.contains(&SessionNotice::QuestionStarted { index: 1 }));
    }

    #[test]
    fn narration_failure_falls_through_to_listening_and_replay_recovers() {
        let mut r = rig(1);
        let t = Instant::now();
        r.tts.fail_next_request();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        assert_eq!(r.o.phase(), Phase::AwaitingAnswerStart);
        assert!(r.o.is_listening());
        assert!(r.o.narration_error().is_some());
        let notices = r.o.tick(t);
        assert_eq!(
            notices,
            vec![
                SessionNotice::QuestionStarted { index: 0 },
                SessionNotice::CaptureArmed
            ]
        );

        r.o.replay_question().unwrap();
        assert_eq!(r.o.phase(), Phase::Narrating);
        assert!(r.o.is_speaking());
        assert!(!r.o.is_listening());
        assert!(r.o.narration_error().is_none());
    }

    #[test]
    fn replay_is_rejected_before_ready_and_after_the_end() {
        let mut r = rig(1);
        assert!(matches!(
            r.o.replay_question(),
            Err(SessionError::InvalidPhase { .. })
        ));
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        r.o.end_session();
        assert!(matches!(r.o.replay_question(), Err(SessionError::SessionOver)));
        assert!(matches!(r.o.next_question(), Err(SessionError::SessionOver)));
    }

    #[test]
    fn ending_mid_session_returns_the_answers_committed_so_far() {
        let mut r = rig(3);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        r.o.tick(t);
        answer_current(&mut r, t, "only answer");

        let answers = r.o.end_session();
        assert_eq!(answers, ["only answer"]);
        assert_eq!(r.o.phase(), Phase::Ended(EndReason::Normal));
        assert!(!r.recorder.is_recording());
        assert_eq!(r.o.tick(t), vec![SessionNotice::SessionComplete]);

        // Idempotent.
        assert_eq!(r.o.end_session(), ["only answer"]);
        assert!(r.o.tick(t).is_empty());
    }

    #[test]
    fn stream_restart_cannot_race_the_next_narration() {
        let mut r = rig(2);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        r.sink.finish();
        r.o.tick(t);
        assert_eq!(r.stream.start_count(), 1);

        // The provider drops the stream, then the turn commits before the
        // delayed restart fires. The commit must cancel the restart.
        r.stream.end_stream();
        r.stream
            .push_transcript("my answer quick one this is my answer");
        r.o.tick(t);
        assert_eq!(r.o.committed_answers(), ["quick one"]);
        assert_eq!(r.o.phase(), Phase::Narrating);

        r.o.tick(t + std::time::Duration::from_millis(200));
        assert!(r.o.is_speaking());
        assert!(!r.o.is_listening(), "restart fired during narration");
        check_invariants(&r.o);
    }

    #[test]
    fn stale_events_during_narration_never_leak_into_the_next_turn() {
        let mut r = rig(2);
        let t = Instant::now();
        r.o.ready_acknowledged(r.sink.clone()).unwrap();
        r.o.tick(t);
        answer_current(&mut r, t, "first");
        assert_eq!(r.o.phase(), Phase::Narrating);

        // A late provider event arrives while question 1 is narrated.
        r.stream.push_transcript("my answer stale this is my answer");
        r.o.tick(t);
        assert_eq!(r.o.committed_answers(), ["first"]);

        let notices = answer_current(&mut r, t, "real");
        assert!(notices.contains(&SessionNotice::AnswerCommitted {
            index: 1,
            answer: "real".to_string()
        }));
        assert_eq!(r.o.committed_answers(), ["first", "real"]);
    }
}
