//! Fallback policy for manifest items whose archive entry is missing.
//!
//! Real-world EPUB files are frequently inconsistent with their own manifest.
//! A [`MissingFileHandler`] decides, per reference, whether reading such an
//! item should fail, produce substitute content, or produce empty content.

use std::fmt;
use std::io::Read;

use crate::epub::content_type::ContentType;

/// Details of the missing item handed to a [`MissingFileHandler`].
#[derive(Debug, Clone, Copy)]
pub struct MissingFileContext<'a> {
    /// The manifest href
    pub file_name: &'a str,
    /// The archive member name that was looked up
    pub file_path: &'a str,
    pub content_type: ContentType,
    /// Declared media type, verbatim
    pub media_type: &'a str,
}

/// What to do about a missing entry.
pub enum MissingFileAction {
    /// Use this stream's content in place of the missing entry.
    Replace(Box<dyn Read + Send>),
    /// Treat the entry as present and empty.
    Suppress,
    /// Report the entry as not found.
    Propagate,
}

impl MissingFileAction {
    /// Replace the missing entry with an in-memory buffer.
    pub fn replace_with(content: impl Into<Vec<u8>>) -> Self {
        MissingFileAction::Replace(Box::new(std::io::Cursor::new(content.into())))
    }
}

impl fmt::Debug for MissingFileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingFileAction::Replace(_) => f.write_str("Replace(..)"),
            MissingFileAction::Suppress => f.write_str("Suppress"),
            MissingFileAction::Propagate => f.write_str("Propagate"),
        }
    }
}

/// Strategy invoked when a content reference's archive entry does not exist.
///
/// The handler is invoked synchronously, at most once per reference if it
/// answers [`MissingFileAction::Replace`] or [`MissingFileAction::Suppress`];
/// a [`MissingFileAction::Propagate`] answer is not remembered, so the handler
/// is consulted again on the next read.
pub trait MissingFileHandler: Send + Sync {
    fn on_missing(&self, ctx: &MissingFileContext<'_>) -> MissingFileAction;
}

impl<F> MissingFileHandler for F
where
    F: Fn(&MissingFileContext<'_>) -> MissingFileAction + Send + Sync,
{
    fn on_missing(&self, ctx: &MissingFileContext<'_>) -> MissingFileAction {
        self(ctx)
    }
}

/// Handler that serves every missing entry as empty content.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressMissing;

impl MissingFileHandler for SuppressMissing {
    fn on_missing(&self, ctx: &MissingFileContext<'_>) -> MissingFileAction {
        tracing::debug!(file = ctx.file_path, "suppressing missing file");
        MissingFileAction::Suppress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MissingFileContext<'static> {
        MissingFileContext {
            file_name: "a.css",
            file_path: "OEBPS/a.css",
            content_type: ContentType::Css,
            media_type: "text/css",
        }
    }

    #[test]
    fn test_suppress_missing() {
        assert!(matches!(SuppressMissing.on_missing(&ctx()), MissingFileAction::Suppress));
    }

    #[test]
    fn test_closure_handler() {
        let handler = |ctx: &MissingFileContext<'_>| {
            if ctx.content_type.is_stylesheet() {
                MissingFileAction::replace_with("/* empty */")
            } else {
                MissingFileAction::Propagate
            }
        };

        let MissingFileAction::Replace(mut stream) = handler.on_missing(&ctx()) else {
            panic!("expected a replacement");
        };
        let mut content = String::new();
        stream.read_to_string(&mut content).unwrap();
        assert_eq!(content, "/* empty */");
        assert_eq!(format!("{:?}", MissingFileAction::Propagate), "Propagate");
    }
}
