use crate::Phase;
use thiserror::Error;

pub type Result<T, E = SessionError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session needs at least one question")]
    NoQuestions,

    #[error("{operation} is not allowed in phase {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("no answer captured yet for the current question")]
    EmptyAnswer,

    #[error("the session has already ended")]
    SessionOver,

    #[error("recorder failed to start: {0}")]
    RecorderStart(#[source] speech_services::SpeechError),

    #[error(transparent)]
    Narration(#[from] narration::NarrationError),

    #[error("backend failure: {0}")]
    Backend(String),
}
