//! Kumquat - lazy, type-aware content indexing for EPUB packages
//!
//! This library indexes the manifest of an EPUB container and gives typed,
//! on-demand access to each entry without loading the whole archive into
//! memory.
//!
//! # Features
//!
//! - **Classification**: Map declared media types to a closed set of content types
//! - **Content index**: Markup, stylesheets, images, fonts and all files, keyed by href
//! - **Cover and navigation**: Resolve the cover image and navigation document
//! - **Lazy references**: Read bytes, text or streams only when asked, blocking or async
//! - **Missing files**: Substitute or suppress entries the manifest names but the archive lacks
//!
//! # Example - Indexing an EPUB file
//!
//! ```no_run
//! use std::sync::Arc;
//! use kumquat::epub::{build_index, ManifestItem, ManifestProperties, ZipEpubArchive};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = Arc::new(ZipEpubArchive::open("book.epub")?);
//!
//! // Manifest items come from the caller's OPF parser
//! let manifest = vec![
//!     ManifestItem::new("ch1", "text/ch1.xhtml", "application/xhtml+xml"),
//!     ManifestItem::new("cover", "images/cover.jpg", "image/jpeg")
//!         .with_properties(ManifestProperties::COVER_IMAGE),
//! ];
//!
//! let index = build_index(&manifest, "OEBPS", archive, None);
//! for (href, chapter) in index.html() {
//!     println!("{}: {} chars", href, chapter.read_text()?.len());
//! }
//! if let Some(cover) = index.cover() {
//!     println!("cover: {} bytes", cover.read_bytes()?.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Substituting missing files
//!
//! ```
//! use std::sync::Arc;
//! use kumquat::epub::{
//!     ContentIndexBuilder, ManifestItem, MemoryArchive, MissingFileAction, MissingFileContext,
//! };
//!
//! let archive = Arc::new(MemoryArchive::new());
//! let placeholder = |ctx: &MissingFileContext<'_>| {
//!     if ctx.content_type.is_stylesheet() {
//!         MissingFileAction::replace_with(b"/* missing */".to_vec())
//!     } else {
//!         MissingFileAction::Propagate
//!     }
//! };
//!
//! let index = ContentIndexBuilder::new(archive)
//!     .missing_file_handler(Arc::new(placeholder))
//!     .build(&[ManifestItem::new("css", "style.css", "text/css")], "OEBPS");
//!
//! assert_eq!(index.css()["style.css"].read_text().unwrap(), "/* missing */");
//! ```

/// Common types and utilities shared across the crate
pub mod common;

/// EPUB manifest indexing and lazy content access
pub mod epub;

pub use common::{Error, Result};
pub use epub::{ContentError, ContentIndex, ContentRef, ContentType};
