//! narration: question playback controller
//!
//! Wraps a [`NarrationService`] and an [`AudioSink`] into the controller the
//! session orchestrator drives: request synthesized audio for a question,
//! decode it, play it through the (lazily installed) sink, and report a
//! single completion event. Playback replaces, never overlaps; service and
//! decode failures resolve early and are retried only by explicit replay.

mod controller;
pub use controller::{NarrationController, NarrationEvent};

mod error;
pub use error::{NarrationError, Result};
