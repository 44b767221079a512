//! Error types for resolving and reading content references
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content reference has an empty file name")]
    EmptyFileName,

    #[error("File not found in the archive: {0}")]
    FileNotFound(String),

    #[error("File is larger than 2 GiB: {0}")]
    FileTooLarge(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blocking read task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ContentError {
    fn from(err: tokio::task::JoinError) -> Self {
        ContentError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
