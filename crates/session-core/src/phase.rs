use std::fmt;

/// Why a session reached its terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every question was answered (or the caller ended the session).
    Normal,
    /// The third proctoring strike forced termination.
    Strikeout,
}

/// Orchestrator phase. Exactly one is active at a time; every dependent
/// flag (speaking, listening) is derived from transitions of this enum
/// rather than set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user-gesture ready acknowledgement.
    AwaitingReady,
    /// The current question is being spoken.
    Narrating,
    /// Listening for the start phrase.
    AwaitingAnswerStart,
    /// The answer window is open.
    CapturingAnswer,
    /// An answer was committed; moving to the next question or the end.
    Advancing,
    /// Terminal. No further events are processed.
    Ended(EndReason),
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended(_))
    }

    /// Phases in which the capture stream may legitimately run.
    pub fn is_listening_phase(self) -> bool {
        matches!(self, Self::AwaitingAnswerStart | Self::CapturingAnswer)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingReady => "awaiting-ready",
            Self::Narrating => "narrating",
            Self::AwaitingAnswerStart => "awaiting-answer-start",
            Self::CapturingAnswer => "capturing-answer",
            Self::Advancing => "advancing",
            Self::Ended(EndReason::Normal) => "ended",
            Self::Ended(EndReason::Strikeout) => "ended-strikeout",
        };
        f.write_str(name)
    }
}
