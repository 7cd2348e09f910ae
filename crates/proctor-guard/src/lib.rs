//! proctor-guard: environment monitoring for proctored sessions
//!
//! Watches environment signals (tab visibility, fullscreen state) and a
//! shared presence channel for duplicate application instances. Violations
//! are edge-triggered (one per discrete occurrence, never flooding on held
//! state) and reported both as return values and through an optional
//! callback. Strike bookkeeping belongs to the session orchestrator, not
//! here; the duplicate-session flag is advisory only.

mod types;
pub use types::{EnvironmentSignal, PresenceMessage, Violation, ViolationKind};

mod traits;
pub use traits::PresenceChannel;

mod monitor;
pub use monitor::{ProctorMonitor, ViolationDetector};

mod error;
pub use error::{ProctorError, Result};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockPresenceChannel;
