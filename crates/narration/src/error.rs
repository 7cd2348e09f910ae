use thiserror::Error;

pub type Result<T, E = NarrationError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("audio sink not installed; ready gesture has not happened")]
    SinkNotInstalled,
    #[error("audio sink already installed")]
    SinkAlreadyInstalled,
    #[error(transparent)]
    Speech(#[from] speech_services::SpeechError),
}
