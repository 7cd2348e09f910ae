//! Interview Session Demo
//!
//! Runs one mock interview end to end: environment pre-check →
//! duplicate-instance probe → ready gate → narrated questions answered with
//! the verbal command protocol → final report. `--strikeout` simulates three
//! tab switches instead of answering.

use anyhow::Result;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use proctor_guard::{MockPresenceChannel, ProctorMonitor};
use session_core::{
    evaluate_environment, EnvironmentCheck, EnvironmentSignal, MockBackend, MockEnvironmentCheck,
    Phase, PreCheckOutcome, SessionBackend, SessionNotice, SessionOrchestrator,
};
use speech_services::{MockNarration, MockRecorder, MockSink, MockTranscription};

type DemoSession = SessionOrchestrator<MockNarration, MockSink, MockTranscription, MockRecorder>;

#[derive(Parser)]
#[command(name = "interview-demo")]
#[command(about = "First Round AI Interview Session Demo")]
struct Args {
    /// Interview role to practice for
    #[arg(long, default_value = "QA Engineer")]
    role: String,

    /// Simulate three tab switches instead of answering the questions
    #[arg(long)]
    strikeout: bool,
}

const SCRIPTED_ANSWERS: [&str; 3] = [
    "I broke the problem down with the stakeholder and we shipped the critical path first",
    "I lean on semantic markup and I test every flow with only a keyboard",
    "I would clarify the requirements and deliver a small vertical slice early",
];

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();
    info!(role = %args.role, "starting interview demo");

    if !pre_check()? {
        return Ok(());
    }

    let mut backend = MockBackend::new();
    let created = backend.create_session(&args.role)?;
    info!(
        session = %created.session_id,
        questions = created.questions.len(),
        "session created"
    );

    let stream = MockTranscription::new();
    let sink = MockSink::new();
    let mut session = SessionOrchestrator::start(
        MockNarration::default(),
        stream.clone(),
        MockRecorder::new(),
        created.session_id,
        args.role.clone(),
        created.questions,
    )?;

    // The user-gesture gate: starts recording and installs the audio sink.
    session.ready_acknowledged(sink.clone())?;

    if args.strikeout {
        run_strikeout(&mut session, &sink);
    } else {
        run_interview(&mut session, &stream, &sink);
    }

    let answers = session.end_session();
    info!(
        phase = %session.phase(),
        answers = answers.len(),
        strikes = session.strikes().len(),
        "session over"
    );

    let report = backend.finish_session(session.session_id(), session.role())?;
    info!(report = %report.report_id, summary = %report.summary);
    info!(
        avg_clarity = report.metrics.avg_clarity,
        avg_relevance = report.metrics.avg_relevance,
        duration_sec = report.metrics.duration_sec,
        "metrics"
    );
    for item in &report.items {
        info!(
            question = %item.question,
            clarity = item.feedback.clarity.score,
            relevance = item.feedback.relevance.score,
            suggestion = %item.feedback.overall_suggestion,
        );
    }

    info!("interview demo completed");
    Ok(())
}

/// Camera frame analysis plus the duplicate-instance probe. Either failure
/// blocks the session from being created at all.
fn pre_check() -> Result<bool> {
    let mut check = MockEnvironmentCheck::default();
    let person_count = check.analyze_frame(&[])?;
    match evaluate_environment(person_count) {
        PreCheckOutcome::Passed => info!(person_count, "environment check passed"),
        PreCheckOutcome::NoPerson => {
            warn!("no person detected on camera; cannot start");
            return Ok(false);
        }
        PreCheckOutcome::MultiplePeople => {
            warn!(person_count, "multiple people detected; cannot start");
            return Ok(false);
        }
    }

    let (channel, _peer) = MockPresenceChannel::pair();
    let mut monitor = ProctorMonitor::new(channel);
    monitor.start_silent();
    monitor.poll_channel();
    if monitor.duplicate_session_detected() {
        warn!("another interview session is already open");
        return Ok(false);
    }
    Ok(true)
}

/// Answer every question through the verbal command protocol.
fn run_interview(session: &mut DemoSession, stream: &MockTranscription, sink: &MockSink) {
    let mut now = Instant::now();
    for _ in 0..64 {
        if session.phase().is_terminal() {
            break;
        }
        if session.is_speaking() {
            // Playback reaches its natural end.
            sink.finish();
        }
        if session.phase() == Phase::AwaitingAnswerStart {
            let text = SCRIPTED_ANSWERS
                .get(session.current_index())
                .copied()
                .unwrap_or("that covers it");
            stream.push_transcript(format!("my answer {text} this is my answer"));
        }
        for notice in session.tick(now) {
            report_notice(&notice);
        }
        now += Duration::from_millis(100);
    }
}

/// Switch tabs three times; the third strike terminates the session.
fn run_strikeout(session: &mut DemoSession, sink: &MockSink) {
    let mut now = Instant::now();
    for _ in 0..8 {
        if session.phase().is_terminal() {
            break;
        }
        if session.is_speaking() {
            sink.finish();
        }
        if let Some(notice) =
            session.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: true })
        {
            report_notice(&notice);
        }
        session.observe_environment(EnvironmentSignal::VisibilityChanged { hidden: false });
        for notice in session.tick(now) {
            report_notice(&notice);
        }
        now += Duration::from_millis(100);
    }
}

fn report_notice(notice: &SessionNotice) {
    match notice {
        SessionNotice::QuestionStarted { index } => info!(index, "question narration started"),
        SessionNotice::CaptureArmed => info!("listening for the start phrase"),
        SessionNotice::CaptureStarted => info!("answer window open"),
        SessionNotice::AnswerCommitted { index, answer } => {
            info!(index, %answer, "answer committed");
        }
        SessionNotice::Warning { strikes, message } => {
            warn!(strikes, %message, "proctoring warning");
        }
        SessionNotice::Terminated => warn!("session terminated by strikeout"),
        SessionNotice::SessionComplete => info!("all questions answered"),
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
