use thiserror::Error;

pub type Result<T, E = CaptureError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Speech(#[from] speech_services::SpeechError),
}
