//! Unified error types for Kumquat.
//!
//! This module provides a unified error type that encompasses errors from
//! opening an EPUB container and from resolving its content, presenting a
//! consistent API to users.
use thiserror::Error;

use crate::epub::ContentError;

/// Main error type for Kumquat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container could not be found at the given location
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Corrupted or malformed container
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// A content entry could not be resolved or read
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Result type for Kumquat operations.
pub type Result<T> = std::result::Result<T, Error>;
