//! Byte Order Mark (BOM) detection for text content.
//!
//! Entries inside an EPUB container are usually UTF-8, but XHTML and CSS files
//! produced by older tooling occasionally carry a UTF-16 BOM.

use encoding_rs::Encoding;

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)] // No need to check for empty BOMs
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// The text encoding announced by this BOM.
    #[inline]
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            BomKind::Utf8 => encoding_rs::UTF_8,
            BomKind::Utf16Le => encoding_rs::UTF_16LE,
            BomKind::Utf16Be => encoding_rs::UTF_16BE,
        }
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Detects a BOM at the start of `data`.
pub fn detect_bom(data: &[u8]) -> Option<BomKind> {
    if data.starts_with(&UTF8_BOM) {
        return Some(BomKind::Utf8);
    }
    if data.starts_with(&UTF16_BE_BOM) {
        return Some(BomKind::Utf16Be);
    }
    if data.starts_with(&UTF16_LE_BOM) {
        return Some(BomKind::Utf16Le);
    }
    None
}

/// Returns `data` without its leading BOM, if any, together with the BOM kind.
pub fn strip_bom(data: &[u8]) -> (Option<BomKind>, &[u8]) {
    match detect_bom(data) {
        Some(kind) => (Some(kind), &data[kind.len()..]),
        None => (None, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_utf8_bom() {
        let data = [0xEF, 0xBB, 0xBF, b'a'];
        assert_eq!(detect_bom(&data), Some(BomKind::Utf8));
        assert_eq!(strip_bom(&data).1, b"a");
    }

    #[test]
    fn detects_utf16_boms() {
        assert_eq!(detect_bom(&[0xFF, 0xFE, 0x41, 0x00]), Some(BomKind::Utf16Le));
        assert_eq!(detect_bom(&[0xFE, 0xFF, 0x00, 0x41]), Some(BomKind::Utf16Be));
        assert_eq!(BomKind::Utf16Le.encoding(), encoding_rs::UTF_16LE);
    }

    #[test]
    fn no_bom_leaves_data_untouched() {
        let (kind, rest) = strip_bom(b"<html/>");
        assert!(kind.is_none());
        assert_eq!(rest, b"<html/>");
        assert_eq!(detect_bom(&[]), None);
    }
}
