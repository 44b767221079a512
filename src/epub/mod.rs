//! EPUB content indexing.
//!
//! This module turns the manifest of an EPUB package into a [`ContentIndex`]
//! of lazy references. It covers:
//!
//! - Media type classification into a closed [`ContentType`] set
//! - Categorized collections for markup, stylesheets, images and fonts
//! - Cover image and navigation document discovery
//! - On-demand reads from the container, with a pluggable policy for
//!   manifest items missing from the archive
//!
//! Parsing of the OPF and NCX documents is left to the caller.

pub mod archive;
pub mod constants;
pub mod content_type;
mod decode;
pub mod error;
pub mod index;
pub mod manifest;
pub mod missing;
pub mod path;
pub mod reference;

// Re-export commonly used types
pub use archive::{ArchiveEntry, EpubArchive, MemoryArchive};
#[cfg(feature = "zip")]
pub use archive::ZipEpubArchive;
pub use content_type::{classify, ContentCategory, ContentType};
pub use error::ContentError;
pub use index::{build_index, ContentIndex, ContentIndexBuilder, IndexOptions};
pub use manifest::{EpubVersion, ManifestItem, ManifestProperties};
pub use missing::{MissingFileAction, MissingFileContext, MissingFileHandler, SuppressMissing};
pub use reference::{ByteContentRef, ContentFile, ContentRef, ContentSource, TextContentRef};
