use thiserror::Error;

pub type Result<T, E = ProctorError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ProctorError {
    #[error("presence channel failure: {0}")]
    Channel(String),
}
