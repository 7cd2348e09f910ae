use thiserror::Error;

pub type Result<T, E = SpeechError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("narration service failure: {0}")]
    Service(String),
    #[error("invalid audio payload: {0}")]
    Decode(&'static str),
    #[error("audio sink failure: {0}")]
    Sink(String),
    #[error("recorder failure: {0}")]
    Recorder(String),
    #[error("transcription stream failure: {0}")]
    Stream(String),
}
