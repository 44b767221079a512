//! Text decoding for content references.
//!
//! The encoding is taken from, in order: a byte order mark, the XML
//! declaration (XML-based content) or the `@charset` rule (stylesheets), and
//! finally UTF-8. Malformed sequences are replaced rather than rejected.

use encoding_rs::Encoding;
use memchr::memmem;

use crate::common::bom::strip_bom;
use crate::epub::content_type::ContentType;

/// Only the first bytes of a document are searched for a declaration.
const PROLOGUE_LEN: usize = 1024;

/// Decode `data` as text of the given content type.
pub(crate) fn decode_text(data: &[u8], content_type: ContentType) -> String {
    let (bom, rest) = strip_bom(data);
    let encoding = match bom {
        Some(kind) => kind.encoding(),
        None => declared_encoding(rest, content_type).unwrap_or(encoding_rs::UTF_8),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(rest);
    if had_errors {
        tracing::trace!(encoding = encoding.name(), "replaced malformed sequences while decoding");
    }
    text.into_owned()
}

fn declared_encoding(data: &[u8], content_type: ContentType) -> Option<&'static Encoding> {
    let prologue = &data[..data.len().min(PROLOGUE_LEN)];
    let label = if content_type.is_xml_based() {
        xml_declared_label(prologue)
    } else if content_type.is_stylesheet() {
        css_charset_label(prologue)
    } else {
        None
    }?;
    Encoding::for_label(label)
}

/// `encoding` pseudo-attribute of a leading `<?xml ... ?>` declaration.
fn xml_declared_label(prologue: &[u8]) -> Option<&[u8]> {
    if !prologue.starts_with(b"<?xml") {
        return None;
    }
    let end = memmem::find(prologue, b"?>")?;
    let decl = &prologue[..end];
    let pos = memmem::find(decl, b"encoding")? + b"encoding".len();
    let rest = trim_ascii_start(&decl[pos..]);
    let rest = trim_ascii_start(rest.strip_prefix(b"=")?);
    quoted(rest)
}

/// Label of a leading `@charset "...";` rule.
fn css_charset_label(prologue: &[u8]) -> Option<&[u8]> {
    let rest = prologue.strip_prefix(b"@charset ")?;
    quoted(rest)
}

/// Contents of a single- or double-quoted string at the start of `data`.
fn quoted(data: &[u8]) -> Option<&[u8]> {
    let (&quote, rest) = data.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = memchr::memchr(quote, rest)?;
    Some(&rest[..end])
}

#[inline]
fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let skip = data.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &data[skip..]
}
