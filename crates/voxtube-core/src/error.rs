use thiserror::Error;

/// Setup and infrastructure errors.
///
/// Failures a user should hear about go through
/// [`PipelineFailure`](crate::types::PipelineFailure) instead.
#[derive(Debug, Error)]
pub enum VoxtubeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoxtubeError>;
