use serde::{Deserialize, Serialize};

/// Configuration for a narration (text-to-speech) request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    pub voice: Option<String>,
    pub sample_rate_hz: u32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            voice: None,
            sample_rate_hz: crate::pcm::NARRATION_SAMPLE_RATE_HZ,
        }
    }
}

/// Configuration for a continuous transcription stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub language: Option<String>,
    /// Keep the stream open across utterances.
    #[serde(default = "default_true")]
    pub continuous: bool,
    /// Deliver interim (non-final) results as they arrive.
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: Some("en-US".to_string()),
            continuous: true,
            interim_results: true,
        }
    }
}

/// Non-fatal vs. reportable transcription error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptionErrorKind {
    /// No speech detected before the provider gave up. Ignored.
    NoSpeech,
    /// The stream was aborted mid-flight. Ignored.
    Aborted,
    /// Audio input failure.
    Audio,
    /// Provider/network failure.
    Network,
    Other,
}

impl TranscriptionErrorKind {
    /// Errors the capture loop swallows without logging.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::NoSpeech | Self::Aborted)
    }
}

/// One observation from a transcription stream.
///
/// `Transcript` carries the full transcript-so-far (interim and final
/// results combined); consumers recompute their view from it rather than
/// splicing increments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionEvent {
    Transcript(String),
    /// The stream stopped on its own (provider timeout, etc.).
    Ended,
    Error(TranscriptionErrorKind),
}
