//! Unified error types for Kumquat.
//!
//! Errors raised while opening a container and while reading its content are
//! folded into one [`Error`] type.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
