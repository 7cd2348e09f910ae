//! session-core: live interview session orchestration
//!
//! Coordinates narration, verbal answer capture, proctoring strikes and the
//! media recorder for one interview session. The orchestrator holds the only
//! mutable session state (phase, question cursor, committed answers,
//! strikes) and guarantees narration and capture never run at the same
//! time. Backends (session creation, report generation, pre-check frame
//! analysis) are trait seams with mock implementations behind the
//! default-on `mock` feature.

mod phase;
pub use phase::{EndReason, Phase};

mod types;
pub use types::{
    AnswerFeedback, Question, QuestionKind, Report, ReportItem, ReportMetrics, ScoredNote,
    StarAnalysis,
};

mod backend;
pub use backend::{
    evaluate_environment, CreatedSession, EnvironmentCheck, PreCheckOutcome, SessionBackend,
};

mod orchestrator;
pub use orchestrator::{SessionNotice, SessionOrchestrator, MAX_STRIKES};

mod error;
pub use error::{Result, SessionError};

pub use proctor_guard::{EnvironmentSignal, Violation, ViolationKind};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockBackend, MockEnvironmentCheck};
