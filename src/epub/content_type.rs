//! Classification of manifest media types.
//!
//! Every media type string maps to exactly one [`ContentType`]; strings that are
//! not in the table map to [`ContentType::Other`]. Matching is exact and
//! case-sensitive, mirroring how reading systems compare `media-type` values.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Closed classification of the media types found in EPUB manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// XHTML 1.1 / HTML5 content document
    Xhtml11,
    /// DAISY DTBook document
    Dtbook,
    /// DAISY navigation control file (the EPUB 2 table of contents)
    DtbookNcx,
    /// OEB 1.x document
    Oeb1Document,
    /// Generic XML
    Xml,
    /// CSS stylesheet
    Css,
    /// OEB 1.x stylesheet
    Oeb1Css,
    ImageGif,
    ImageJpeg,
    ImagePng,
    ImageSvg,
    ImageWebp,
    FontTruetype,
    FontOpentype,
    FontWoff,
    FontWoff2,
    /// SMIL media overlay
    Smil,
    /// JavaScript / ECMAScript
    Script,
    /// Pronunciation lexicon
    Pls,
    AudioMpeg,
    AudioMp4,
    AudioOgg,
    VideoMp4,
    VideoWebm,
    /// Any media type not listed above
    Other,
}

/// Whether a content type is read as decoded text or as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentCategory {
    Text,
    Binary,
}

/// Media type lookup table (O(1), built at compile time)
static MEDIA_TYPES: phf::Map<&'static str, ContentType> = phf_map! {
    "application/xhtml+xml" => ContentType::Xhtml11,
    "application/x-dtbook+xml" => ContentType::Dtbook,
    "application/x-dtbncx+xml" => ContentType::DtbookNcx,
    "text/x-oeb1-document" => ContentType::Oeb1Document,
    "application/xml" => ContentType::Xml,
    "text/css" => ContentType::Css,
    "text/x-oeb1-css" => ContentType::Oeb1Css,
    "image/gif" => ContentType::ImageGif,
    "image/jpeg" => ContentType::ImageJpeg,
    "image/png" => ContentType::ImagePng,
    "image/svg+xml" => ContentType::ImageSvg,
    "image/webp" => ContentType::ImageWebp,
    "font/truetype" => ContentType::FontTruetype,
    "font/ttf" => ContentType::FontTruetype,
    "application/x-font-truetype" => ContentType::FontTruetype,
    "font/opentype" => ContentType::FontOpentype,
    "font/otf" => ContentType::FontOpentype,
    "application/font-sfnt" => ContentType::FontOpentype,
    "application/vnd.ms-opentype" => ContentType::FontOpentype,
    "application/x-font-opentype" => ContentType::FontOpentype,
    "font/woff" => ContentType::FontWoff,
    "application/font-woff" => ContentType::FontWoff,
    "font/woff2" => ContentType::FontWoff2,
    "application/smil+xml" => ContentType::Smil,
    "application/javascript" => ContentType::Script,
    "application/ecmascript" => ContentType::Script,
    "text/javascript" => ContentType::Script,
    "application/pls+xml" => ContentType::Pls,
    "audio/mpeg" => ContentType::AudioMpeg,
    "audio/mp4" => ContentType::AudioMp4,
    "audio/ogg" => ContentType::AudioOgg,
    "audio/ogg; codecs=opus" => ContentType::AudioOgg,
    "video/mp4" => ContentType::VideoMp4,
    "video/webm" => ContentType::VideoWebm,
};

/// Map a declared media type to its content type.
///
/// Never fails: unknown or malformed strings yield [`ContentType::Other`].
#[inline]
pub fn classify(media_type: &str) -> ContentType {
    MEDIA_TYPES
        .get(media_type)
        .copied()
        .unwrap_or(ContentType::Other)
}

impl ContentType {
    /// Whether the content is read as text or bytes.
    pub const fn category(self) -> ContentCategory {
        match self {
            ContentType::Xhtml11
            | ContentType::Dtbook
            | ContentType::DtbookNcx
            | ContentType::Oeb1Document
            | ContentType::Xml
            | ContentType::Css
            | ContentType::Oeb1Css
            | ContentType::Smil
            | ContentType::Pls => ContentCategory::Text,
            _ => ContentCategory::Binary,
        }
    }

    /// Content documents that belong in the reading-order markup collection.
    pub const fn is_markup(self) -> bool {
        matches!(
            self,
            ContentType::Xhtml11 | ContentType::Dtbook | ContentType::Oeb1Document
        )
    }

    pub const fn is_stylesheet(self) -> bool {
        matches!(self, ContentType::Css | ContentType::Oeb1Css)
    }

    pub const fn is_image(self) -> bool {
        matches!(
            self,
            ContentType::ImageGif
                | ContentType::ImageJpeg
                | ContentType::ImagePng
                | ContentType::ImageSvg
                | ContentType::ImageWebp
        )
    }

    pub const fn is_font(self) -> bool {
        matches!(
            self,
            ContentType::FontTruetype
                | ContentType::FontOpentype
                | ContentType::FontWoff
                | ContentType::FontWoff2
        )
    }

    /// XML-based formats, whose prologue may declare an encoding.
    pub const fn is_xml_based(self) -> bool {
        matches!(
            self,
            ContentType::Xhtml11
                | ContentType::Dtbook
                | ContentType::DtbookNcx
                | ContentType::Xml
                | ContentType::Smil
                | ContentType::Pls
                | ContentType::ImageSvg
        )
    }
}

impl FromStr for ContentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(classify(s))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentCategory::Text => f.write_str("text"),
            ContentCategory::Binary => f.write_str("binary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::constants::media_type;
    use proptest::prelude::*;

    #[test]
    fn test_known_media_types() {
        assert_eq!(classify(media_type::XHTML), ContentType::Xhtml11);
        assert_eq!(classify(media_type::DTBOOK_NCX), ContentType::DtbookNcx);
        assert_eq!(classify(media_type::OEB1_CSS), ContentType::Oeb1Css);
        assert_eq!(classify(media_type::JPEG), ContentType::ImageJpeg);
        assert_eq!(classify(media_type::SVG), ContentType::ImageSvg);
        assert_eq!(classify(media_type::FONT_TTF), ContentType::FontTruetype);
        assert_eq!(classify(media_type::MS_OPENTYPE), ContentType::FontOpentype);
        assert_eq!(classify(media_type::AUDIO_OGG_OPUS), ContentType::AudioOgg);
    }

    #[test]
    fn test_unknown_media_types_are_other() {
        assert_eq!(classify(""), ContentType::Other);
        assert_eq!(classify("video/x-matroska"), ContentType::Other);
        // Matching is case-sensitive
        assert_eq!(classify("Text/CSS"), ContentType::Other);
        assert_eq!(classify(" text/css"), ContentType::Other);
        assert_eq!(ContentType::Other.category(), ContentCategory::Binary);
    }

    #[test]
    fn test_categories() {
        for text in [
            ContentType::Xhtml11,
            ContentType::Dtbook,
            ContentType::DtbookNcx,
            ContentType::Oeb1Document,
            ContentType::Xml,
            ContentType::Css,
            ContentType::Oeb1Css,
            ContentType::Smil,
            ContentType::Pls,
        ] {
            assert_eq!(text.category(), ContentCategory::Text, "{text}");
        }
        for binary in [
            ContentType::ImageGif,
            ContentType::ImageJpeg,
            ContentType::ImagePng,
            ContentType::ImageSvg,
            ContentType::FontTruetype,
            ContentType::FontOpentype,
            ContentType::VideoMp4,
            ContentType::Script,
            ContentType::Other,
        ] {
            assert_eq!(binary.category(), ContentCategory::Binary, "{binary}");
        }
        for script in ["application/javascript", "application/ecmascript", "text/javascript"] {
            assert_eq!(classify(script).category(), ContentCategory::Binary, "{script}");
        }
    }

    #[test]
    fn test_every_table_entry_has_one_bucket_at_most() {
        for (mime, ty) in MEDIA_TYPES.entries() {
            let buckets = [ty.is_markup(), ty.is_stylesheet(), ty.is_image(), ty.is_font()]
                .iter()
                .filter(|b| **b)
                .count();
            assert!(buckets <= 1, "{mime} falls into {buckets} buckets");
            assert_eq!(classify(mime), *ty);
        }
    }

    #[test]
    fn test_from_str() {
        let ty: ContentType = "text/css".parse().unwrap();
        assert_eq!(ty, ContentType::Css);
    }

    proptest! {
        #[test]
        fn prop_classify_is_total_and_deterministic(s in ".*") {
            let first = classify(&s);
            prop_assert_eq!(first, classify(&s));
            if !MEDIA_TYPES.contains_key(s.as_str()) {
                prop_assert_eq!(first, ContentType::Other);
                prop_assert_eq!(first.category(), ContentCategory::Binary);
            }
        }
    }
}
