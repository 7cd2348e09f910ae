use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Kinds of proctoring violations that count as strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The application tab/window lost visibility.
    TabHidden,
    /// The session left fullscreen.
    FullscreenExited,
}

impl ViolationKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::TabHidden => "Tab switch detected",
            Self::FullscreenExited => "Fullscreen exit detected",
        }
    }
}

/// One detected violation occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub at: OffsetDateTime,
}

impl Violation {
    pub fn now(kind: ViolationKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            at: OffsetDateTime::now_utc(),
        }
    }
}

/// Environment transitions fed to the monitor by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentSignal {
    VisibilityChanged { hidden: bool },
    FullscreenChanged { fullscreen: bool },
    /// The window regained focus; re-probe for duplicate instances.
    FocusGained,
}

/// Messages exchanged on the shared presence channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceMessage {
    /// "Is anyone else running?"
    Ping,
    /// "Yes, I am."
    Ack,
}
