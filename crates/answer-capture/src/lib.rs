//! answer-capture: verbal answer segmentation over a transcription stream
//!
//! Listens to a continuous transcription stream and applies the spoken
//! command protocol: "my answer" opens the answer window, "this is my
//! answer" closes and commits it. The stream is supervised: if the provider
//! drops it while capture should still be running, it is restarted after a
//! short delay, under a rate budget so a persistently failing provider
//! cannot spin the loop.

mod phrase;
pub use phrase::{scan_capturing, ScanOutcome, END_PHRASE, START_PHRASE};

mod supervisor;
pub use supervisor::RestartSupervisor;

mod controller;
pub use controller::{AnswerCaptureController, CaptureEvent};

mod error;
pub use error::{CaptureError, Result};
