use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Restart scheduling for the transcription stream.
///
/// The provider routinely drops continuous streams; capture restarts them
/// after a short fixed delay. A sliding-window budget bounds the restart
/// rate so a persistently failing provider defers further attempts to the
/// end of the window instead of spinning.
#[derive(Debug)]
pub struct RestartSupervisor {
    delay: Duration,
    window: Duration,
    max_restarts: u32,
    pending_at: Option<Instant>,
    history: VecDeque<Instant>,
}

impl RestartSupervisor {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_RESTARTS: u32 = 20;

    pub fn new(delay: Duration, max_restarts: u32, window: Duration) -> Self {
        Self {
            delay,
            window,
            max_restarts: max_restarts.max(1),
            pending_at: None,
            history: VecDeque::new(),
        }
    }

    /// Note that the stream ended while it should still be running.
    /// Schedules a restart; an already pending restart is left in place.
    pub fn note_stream_ended(&mut self, now: Instant) {
        if self.pending_at.is_some() {
            return;
        }
        self.prune(now);
        let due = if self.history.len() as u32 >= self.max_restarts {
            // Budget exhausted: defer to when the oldest attempt ages out.
            match self.history.front() {
                Some(oldest) => (*oldest + self.window).max(now + self.delay),
                None => now + self.delay,
            }
        } else {
            now + self.delay
        };
        self.pending_at = Some(due);
    }

    /// Whether a scheduled restart has become due. Consumes the pending
    /// slot and records the attempt against the budget.
    pub fn restart_due(&mut self, now: Instant) -> bool {
        match self.pending_at {
            Some(due) if due <= now => {
                self.pending_at = None;
                self.prune(now);
                self.history.push_back(now);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending_at = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending_at.is_some()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(front) = self.history.front() {
            if now.duration_since(*front) >= self.window {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RestartSupervisor {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_DELAY,
            Self::DEFAULT_MAX_RESTARTS,
            Self::DEFAULT_WINDOW,
        )
    }
}
