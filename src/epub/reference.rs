//! Lazy references to manifest items.
//!
//! A reference knows where its content lives but reads nothing until asked.
//! Every read resolves the reference again:
//!
//! 1. a cached replacement entry, if one exists, is used directly;
//! 2. an empty file name is rejected;
//! 3. the archive is asked for the entry;
//! 4. a missing entry is handed to the [`MissingFileHandler`], whose
//!    replacement or suppression is cached for the lifetime of the reference;
//! 5. entries larger than the size limit are rejected;
//! 6. the entry is opened and read.
//!
//! Clones of a reference share the same state, so an item that appears in
//! several collections of a [`ContentIndex`](crate::epub::ContentIndex)
//! consults its handler at most once.

use std::fmt;
use std::io::{Cursor, Read};
use std::ops::Deref;
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::OnceCell;

use crate::epub::archive::{ArchiveEntry, EpubArchive};
use crate::epub::constants::MAX_ENTRY_SIZE;
use crate::epub::content_type::{classify, ContentCategory, ContentType};
use crate::epub::decode::decode_text;
use crate::epub::error::{ContentError, Result};
use crate::epub::missing::{MissingFileAction, MissingFileContext, MissingFileHandler};

/// Where references read from: the archive, the missing-file policy and the
/// size limit shared by every reference of one package.
#[derive(Clone)]
pub struct ContentSource {
    archive: Arc<dyn EpubArchive>,
    missing_file_handler: Option<Arc<dyn MissingFileHandler>>,
    max_entry_size: u64,
}

impl ContentSource {
    pub fn new(archive: Arc<dyn EpubArchive>) -> Self {
        Self {
            archive,
            missing_file_handler: None,
            max_entry_size: MAX_ENTRY_SIZE,
        }
    }

    pub fn with_missing_file_handler(mut self, handler: Arc<dyn MissingFileHandler>) -> Self {
        self.missing_file_handler = Some(handler);
        self
    }

    /// Lower the size limit. Values above 2^31 - 1 are clamped.
    pub fn with_max_entry_size(mut self, max_entry_size: u64) -> Self {
        self.max_entry_size = max_entry_size.min(MAX_ENTRY_SIZE);
        self
    }

    #[inline]
    pub fn archive(&self) -> &Arc<dyn EpubArchive> {
        &self.archive
    }

    #[inline]
    pub fn max_entry_size(&self) -> u64 {
        self.max_entry_size
    }

    /// Create a reference, choosing the text or binary variant from the
    /// classified media type.
    pub fn reference(
        &self,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        media_type: impl Into<String>,
    ) -> ContentRef {
        let media_type = media_type.into();
        let content_type = classify(&media_type);
        let file = ContentFile {
            inner: Arc::new(ContentFileInner {
                file_name: file_name.into(),
                file_path: file_path.into(),
                content_type,
                media_type,
                source: self.clone(),
                replacement: OnceCell::new(),
            }),
        };

        match content_type.category() {
            ContentCategory::Text => ContentRef::Text(TextContentRef(file)),
            ContentCategory::Binary => ContentRef::Binary(ByteContentRef(file)),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSource")
            .field("archive", &self.archive)
            .field("missing_file_handler", &self.missing_file_handler.is_some())
            .field("max_entry_size", &self.max_entry_size)
            .finish()
    }
}

struct ContentFileInner {
    file_name: String,
    file_path: String,
    content_type: ContentType,
    media_type: String,
    source: ContentSource,
    /// Stand-in for a missing archive entry, written at most once
    replacement: OnceCell<Bytes>,
}

/// State and read operations shared by both reference variants.
#[derive(Clone)]
pub struct ContentFile {
    inner: Arc<ContentFileInner>,
}

enum Resolved {
    Entry(ArchiveEntry),
    Replacement(Bytes),
}

impl Resolved {
    fn len(&self) -> u64 {
        match self {
            Resolved::Entry(entry) => entry.len(),
            Resolved::Replacement(data) => data.len() as u64,
        }
    }
}

impl ContentFile {
    /// The manifest href
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.inner.file_name
    }

    /// The archive member name the href resolves to
    #[inline]
    pub fn file_path(&self) -> &str {
        &self.inner.file_path
    }

    #[inline]
    pub fn content_type(&self) -> ContentType {
        self.inner.content_type
    }

    /// The declared media type, verbatim
    #[inline]
    pub fn media_type(&self) -> &str {
        &self.inner.media_type
    }

    #[inline]
    pub fn category(&self) -> ContentCategory {
        self.inner.content_type.category()
    }

    /// Whether a replacement entry has been cached for this reference.
    pub fn is_replaced(&self) -> bool {
        self.inner.replacement.get().is_some()
    }

    /// Whether two references share the same underlying state.
    pub fn ptr_eq(&self, other: &ContentFile) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Size of the content in bytes, resolved without reading it.
    pub fn len(&self) -> Result<u64> {
        Ok(self.resolve()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Read the whole content.
    pub fn read_bytes(&self) -> Result<Bytes> {
        match self.resolve()? {
            Resolved::Replacement(data) => Ok(data),
            Resolved::Entry(entry) => {
                // The declared length may understate the stream.
                let limit = self.inner.source.max_entry_size;
                let stream = self.inner.source.archive.open(&entry)?;
                let mut buf = Vec::with_capacity(entry.len() as usize);
                stream.take(limit + 1).read_to_end(&mut buf)?;
                if buf.len() as u64 > limit {
                    return Err(ContentError::FileTooLarge(self.inner.file_path.clone()));
                }
                Ok(Bytes::from(buf))
            },
        }
    }

    /// Non-blocking variant of [`ContentFile::read_bytes`].
    ///
    /// A cached replacement is returned without suspending. Otherwise the
    /// whole of [`ContentFile::read_bytes`] runs on tokio's blocking pool,
    /// including the archive lookup, any missing-file handler call and the
    /// size check.
    pub async fn read_bytes_async(&self) -> Result<Bytes> {
        if let Some(data) = self.inner.replacement.get() {
            return Ok(data.clone());
        }
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.read_bytes()).await?
    }

    /// Open a fresh stream positioned at the start of the content.
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self.resolve()? {
            Resolved::Replacement(data) => Ok(Box::new(Cursor::new(data))),
            Resolved::Entry(entry) => Ok(self.inner.source.archive.open(&entry)?),
        }
    }

    fn resolve(&self) -> Result<Resolved> {
        let inner = &self.inner;

        if let Some(data) = inner.replacement.get() {
            return Ok(Resolved::Replacement(data.clone()));
        }
        if inner.file_name.is_empty() {
            return Err(ContentError::EmptyFileName);
        }

        let resolved = match inner.source.archive.entry(&inner.file_path) {
            Some(entry) => Resolved::Entry(entry),
            None => Resolved::Replacement(self.replacement_for_missing()?),
        };

        if resolved.len() > inner.source.max_entry_size {
            return Err(ContentError::FileTooLarge(inner.file_path.clone()));
        }
        Ok(resolved)
    }

    fn replacement_for_missing(&self) -> Result<Bytes> {
        let inner = &self.inner;
        let Some(handler) = inner.source.missing_file_handler.as_deref() else {
            return Err(ContentError::FileNotFound(inner.file_path.clone()));
        };

        // Concurrent first reads block here until one initializer finishes;
        // a failed initializer leaves the cell empty.
        inner
            .replacement
            .get_or_try_init(|| {
                let ctx = MissingFileContext {
                    file_name: &inner.file_name,
                    file_path: &inner.file_path,
                    content_type: inner.content_type,
                    media_type: &inner.media_type,
                };

                match handler.on_missing(&ctx) {
                    MissingFileAction::Replace(stream) => {
                        let limit = inner.source.max_entry_size;
                        let mut buf = Vec::new();
                        stream.take(limit + 1).read_to_end(&mut buf)?;
                        if buf.len() as u64 > limit {
                            return Err(ContentError::FileTooLarge(inner.file_path.clone()));
                        }
                        tracing::debug!(
                            file = %inner.file_path,
                            len = buf.len(),
                            "replaced missing file"
                        );
                        Ok(Bytes::from(buf))
                    },
                    MissingFileAction::Suppress => {
                        tracing::debug!(file = %inner.file_path, "suppressed missing file");
                        Ok(Bytes::new())
                    },
                    MissingFileAction::Propagate => {
                        Err(ContentError::FileNotFound(inner.file_path.clone()))
                    },
                }
            })
            .cloned()
    }
}

impl fmt::Debug for ContentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentFile")
            .field("file_name", &self.inner.file_name)
            .field("file_path", &self.inner.file_path)
            .field("content_type", &self.inner.content_type)
            .field("media_type", &self.inner.media_type)
            .field("replaced", &self.is_replaced())
            .finish()
    }
}

/// Reference to a text item (markup, stylesheets, NCX, ...).
#[derive(Debug, Clone)]
pub struct TextContentRef(ContentFile);

impl TextContentRef {
    /// Read and decode the whole content.
    pub fn read_text(&self) -> Result<String> {
        let data = self.0.read_bytes()?;
        Ok(decode_text(&data, self.0.content_type()))
    }

    /// Non-blocking variant of [`TextContentRef::read_text`].
    pub async fn read_text_async(&self) -> Result<String> {
        let data = self.0.read_bytes_async().await?;
        Ok(decode_text(&data, self.0.content_type()))
    }
}

impl Deref for TextContentRef {
    type Target = ContentFile;

    fn deref(&self) -> &ContentFile {
        &self.0
    }
}

/// Reference to a binary item (images, fonts, media, unknown types).
#[derive(Debug, Clone)]
pub struct ByteContentRef(ContentFile);

impl Deref for ByteContentRef {
    type Target = ContentFile;

    fn deref(&self) -> &ContentFile {
        &self.0
    }
}

/// A reference of either variant; the variant is fixed at construction.
#[derive(Debug, Clone)]
pub enum ContentRef {
    Text(TextContentRef),
    Binary(ByteContentRef),
}

impl ContentRef {
    #[inline]
    pub fn file(&self) -> &ContentFile {
        match self {
            ContentRef::Text(text) => &text.0,
            ContentRef::Binary(bytes) => &bytes.0,
        }
    }

    pub fn as_text(&self) -> Option<&TextContentRef> {
        match self {
            ContentRef::Text(text) => Some(text),
            ContentRef::Binary(_) => None,
        }
    }

    pub fn as_binary(&self) -> Option<&ByteContentRef> {
        match self {
            ContentRef::Binary(bytes) => Some(bytes),
            ContentRef::Text(_) => None,
        }
    }
}

impl Deref for ContentRef {
    type Target = ContentFile;

    fn deref(&self) -> &ContentFile {
        self.file()
    }
}
