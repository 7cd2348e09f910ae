//! speech-services: collaborator seams for narration, transcription and media
//!
//! This crate defines the traits the interview session core talks through:
//! a narration (text-to-speech) service, a continuous transcription stream,
//! an audio output sink and a media recorder. The default build enables a
//! `mock` backend so the full session protocol can run and be tested on any
//! host without audio hardware or network access.

mod types;
pub use types::{
    NarrationConfig, TranscriptionConfig, TranscriptionErrorKind, TranscriptionEvent,
};

mod error;
pub use error::{Result, SpeechError};

mod traits;
pub use traits::{AudioSink, MediaRecorder, NarrationService, TranscriptionStream};

pub mod pcm;
pub use pcm::{NARRATION_CHANNELS, NARRATION_SAMPLE_RATE_HZ};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockNarration, MockRecorder, MockSink, MockTranscription};
