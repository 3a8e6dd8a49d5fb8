//! Worker error types.

use thiserror::Error;

use flick_models::MovieId;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("movie {0} not found")]
    MovieNotFound(MovieId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("media error: {0}")]
    Media(#[from] flick_media::MediaError),

    #[error("storage error: {0}")]
    Store(#[from] flick_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
