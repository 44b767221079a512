//! Categorized content index of an EPUB package.
//!
//! The index is built from the package manifest. Each manifest item becomes one
//! lazy reference, filed under `all_files` and, depending on its content type,
//! under exactly one of the markup, stylesheet, image or font collections.
//! Building an index never fails and never reads entry content.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::epub::archive::EpubArchive;
use crate::epub::constants::MAX_ENTRY_SIZE;
use crate::epub::content_type::ContentType;
use crate::epub::manifest::{EpubVersion, ManifestItem};
use crate::epub::missing::MissingFileHandler;
use crate::epub::path::resolve_href;
use crate::epub::reference::{ByteContentRef, ContentRef, ContentSource, TextContentRef};

/// Options for building a [`ContentIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// EPUB version of the package document
    pub version: EpubVersion,
    /// Manifest id named by `<meta name="cover" content="...">`
    pub cover_id: Option<String>,
    /// Manifest id named by the spine's `toc` attribute
    pub toc_id: Option<String>,
    /// Largest entry a reference will read; clamped to 2^31 - 1
    pub max_entry_size: u64,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            version: EpubVersion::default(),
            cover_id: None,
            toc_id: None,
            max_entry_size: MAX_ENTRY_SIZE,
        }
    }
}

/// Content of an EPUB package, keyed by manifest href.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    html: HashMap<String, TextContentRef>,
    css: HashMap<String, TextContentRef>,
    images: HashMap<String, ByteContentRef>,
    fonts: HashMap<String, ByteContentRef>,
    all_files: HashMap<String, ContentRef>,
    navigation_html_file: Option<TextContentRef>,
    cover: Option<ByteContentRef>,
    ncx: Option<TextContentRef>,
}

impl ContentIndex {
    /// XHTML, DTBook and OEB 1 documents
    #[inline]
    pub fn html(&self) -> &HashMap<String, TextContentRef> {
        &self.html
    }

    /// CSS and OEB 1 stylesheets
    #[inline]
    pub fn css(&self) -> &HashMap<String, TextContentRef> {
        &self.css
    }

    #[inline]
    pub fn images(&self) -> &HashMap<String, ByteContentRef> {
        &self.images
    }

    #[inline]
    pub fn fonts(&self) -> &HashMap<String, ByteContentRef> {
        &self.fonts
    }

    /// Every manifest item, including those in no other collection
    #[inline]
    pub fn all_files(&self) -> &HashMap<String, ContentRef> {
        &self.all_files
    }

    /// The EPUB 3 navigation document
    #[inline]
    pub fn navigation_html_file(&self) -> Option<&TextContentRef> {
        self.navigation_html_file.as_ref()
    }

    #[inline]
    pub fn cover(&self) -> Option<&ByteContentRef> {
        self.cover.as_ref()
    }

    /// The EPUB 2 navigation control file
    #[inline]
    pub fn ncx(&self) -> Option<&TextContentRef> {
        self.ncx.as_ref()
    }

    /// Look up any item by its manifest href.
    pub fn get(&self, href: &str) -> Option<&ContentRef> {
        self.all_files.get(href)
    }

    pub fn len(&self) -> usize {
        self.all_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_files.is_empty()
    }

    /// File a reference under `all_files`, dropping an earlier item with the
    /// same href from its category collection.
    fn insert(&mut self, href: &str, reference: ContentRef) {
        if self.all_files.insert(href.to_string(), reference).is_none() {
            return;
        }

        tracing::debug!(href, "duplicate manifest href, keeping the last occurrence");
        self.html.remove(href);
        self.css.remove(href);
        self.images.remove(href);
        self.fonts.remove(href);
    }
}

/// Builds [`ContentIndex`]es over one archive.
#[derive(Debug, Clone)]
pub struct ContentIndexBuilder {
    source: ContentSource,
    options: IndexOptions,
}

impl ContentIndexBuilder {
    pub fn new(archive: Arc<dyn EpubArchive>) -> Self {
        Self {
            source: ContentSource::new(archive),
            options: IndexOptions::default(),
        }
    }

    /// Policy consulted by every reference whose archive entry is missing.
    pub fn missing_file_handler(mut self, handler: Arc<dyn MissingFileHandler>) -> Self {
        self.source = self.source.with_missing_file_handler(handler);
        self
    }

    pub fn options(mut self, options: IndexOptions) -> Self {
        self.source = self.source.with_max_entry_size(options.max_entry_size);
        self.options = options;
        self
    }

    /// Index the manifest `items`, whose hrefs are relative to `content_dir`.
    ///
    /// Items are processed in manifest order, and a repeated href replaces the
    /// earlier item. When several surviving items carry the `nav` or
    /// `cover-image` marker, the last one wins. A `nav` marker only designates
    /// a markup document and a `cover-image` marker only an image.
    pub fn build(&self, items: &[ManifestItem], content_dir: &str) -> ContentIndex {
        let mut index = ContentIndex::default();

        for item in items {
            let file_path = resolve_href(content_dir, &item.href);
            let reference = self
                .source
                .reference(item.href.as_str(), file_path, item.media_type.as_str());
            let content_type = reference.content_type();
            index.insert(&item.href, reference.clone());

            match reference {
                ContentRef::Text(text) => {
                    if content_type.is_markup() {
                        index.html.insert(item.href.clone(), text);
                    } else if content_type.is_stylesheet() {
                        index.css.insert(item.href.clone(), text);
                    }
                },
                ContentRef::Binary(bytes) => {
                    if content_type.is_image() {
                        index.images.insert(item.href.clone(), bytes);
                    } else if content_type.is_font() {
                        index.fonts.insert(item.href.clone(), bytes);
                    }
                },
            }

            if (item.is_nav() && !content_type.is_markup())
                || (item.is_cover_image() && !content_type.is_image())
            {
                tracing::debug!(
                    id = %item.id,
                    href = %item.href,
                    %content_type,
                    "ignoring marker on an item of the wrong content type"
                );
            }
        }

        index.navigation_html_file = last_surviving(items, |item| {
            item.is_nav() && index.html.contains_key(&item.href)
        })
        .and_then(|href| index.html.get(href).cloned());
        index.cover = last_surviving(items, |item| {
            item.is_cover_image() && index.images.contains_key(&item.href)
        })
        .and_then(|href| index.images.get(href).cloned());
        if index.cover.is_none() {
            index.cover = self.cover_from_hint(&index, items);
        }
        index.ncx = self.ncx_for(&index, items);

        tracing::debug!(
            files = index.all_files.len(),
            html = index.html.len(),
            css = index.css.len(),
            images = index.images.len(),
            fonts = index.fonts.len(),
            nav = index.navigation_html_file.is_some(),
            cover = index.cover.is_some(),
            "built content index"
        );
        index
    }

    /// Cover named by the `<meta name="cover">` id, if it is an image.
    fn cover_from_hint(
        &self,
        index: &ContentIndex,
        items: &[ManifestItem],
    ) -> Option<ByteContentRef> {
        let href = href_for_id(items, self.options.cover_id.as_deref()?)?;
        index.images.get(href).cloned()
    }

    /// EPUB 2 table of contents: the spine `toc` item, or failing that (for
    /// EPUB 2 packages only) the last NCX item of the manifest.
    fn ncx_for(&self, index: &ContentIndex, items: &[ManifestItem]) -> Option<TextContentRef> {
        let as_ncx = |href: &str| {
            index
                .all_files
                .get(href)
                .and_then(ContentRef::as_text)
                .filter(|text| text.content_type() == ContentType::DtbookNcx)
                .cloned()
        };

        if let Some(toc_id) = self.options.toc_id.as_deref() {
            return href_for_id(items, toc_id).and_then(as_ncx);
        }
        if self.options.version != EpubVersion::Epub2 {
            return None;
        }
        items
            .iter()
            .rev()
            .find_map(|item| as_ncx(&item.href))
    }
}

/// Href of the last item satisfying `marked`, among items not replaced by a
/// later item with the same href.
fn last_surviving<'a>(
    items: &'a [ManifestItem],
    marked: impl Fn(&ManifestItem) -> bool,
) -> Option<&'a str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .rev()
        .filter(|&item| seen.insert(item.href.as_str()))
        .find(|&item| marked(item))
        .map(|item| item.href.as_str())
}

/// Href of the last manifest item with the given id.
fn href_for_id<'a>(items: &'a [ManifestItem], id: &str) -> Option<&'a str> {
    items
        .iter()
        .rev()
        .find(|item| item.id == id)
        .map(|item| item.href.as_str())
}

/// Build a content index with default options.
pub fn build_index(
    items: &[ManifestItem],
    content_dir: &str,
    archive: Arc<dyn EpubArchive>,
    missing_file_handler: Option<Arc<dyn MissingFileHandler>>,
) -> ContentIndex {
    let mut builder = ContentIndexBuilder::new(archive);
    if let Some(handler) = missing_file_handler {
        builder = builder.missing_file_handler(handler);
    }
    builder.build(items, content_dir)
}
