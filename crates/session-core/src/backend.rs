use crate::{Question, Report, Result};

/// Everything `create_session` hands back.
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub session_id: String,
    pub questions: Vec<Question>,
}

/// Session-creation and report service. Opaque to the orchestrator; the
/// demo wires a mock, production wires an HTTP client.
pub trait SessionBackend {
    fn create_session(&mut self, role: &str) -> Result<CreatedSession>;

    fn finish_session(&mut self, session_id: &str, role: &str) -> Result<Report>;
}

/// One-shot camera frame analysis used during pre-check only. Not part of
/// the live-session loop.
pub trait EnvironmentCheck {
    /// Number of people visible in the frame.
    fn analyze_frame(&mut self, frame: &[u8]) -> Result<u32>;
}

/// Pre-check verdict derived from a person count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreCheckOutcome {
    Passed,
    NoPerson,
    MultiplePeople,
}

pub fn evaluate_environment(person_count: u32) -> PreCheckOutcome {
    match person_count {
        0 => PreCheckOutcome::NoPerson,
        1 => PreCheckOutcome::Passed,
        _ => PreCheckOutcome::MultiplePeople,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_person_passes_pre_check() {
        assert_eq!(evaluate_environment(0), PreCheckOutcome::NoPerson);
        assert_eq!(evaluate_environment(1), PreCheckOutcome::Passed);
        assert_eq!(evaluate_environment(2), PreCheckOutcome::MultiplePeople);
        assert_eq!(evaluate_environment(5), PreCheckOutcome::MultiplePeople);
    }
}
