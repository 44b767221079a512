//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from external
//! error types to the unified Error type.

#[cfg(feature = "zip")]
use super::types::Error;

#[cfg(feature = "zip")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(msg) => Error::CorruptedFile(msg.to_string()),
            other => Error::ZipError(other.to_string()),
        }
    }
}
