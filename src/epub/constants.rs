/// Constant values related to EPUB packages.
///
/// This module contains media types (MIME types) that identify the format of a
/// manifest item, and the manifest `properties` markers recognized by the index.

/// Media types declared by manifest items
pub mod media_type {
    // Markup and document formats
    pub const XHTML: &str = "application/xhtml+xml";
    pub const DTBOOK: &str = "application/x-dtbook+xml";
    pub const DTBOOK_NCX: &str = "application/x-dtbncx+xml";
    pub const OEB1_DOCUMENT: &str = "text/x-oeb1-document";
    pub const XML: &str = "application/xml";
    pub const SMIL: &str = "application/smil+xml";
    pub const PLS: &str = "application/pls+xml";

    // Stylesheets
    pub const CSS: &str = "text/css";
    pub const OEB1_CSS: &str = "text/x-oeb1-css";

    // Scripts
    pub const JAVASCRIPT: &str = "application/javascript";
    pub const ECMASCRIPT: &str = "application/ecmascript";
    pub const TEXT_JAVASCRIPT: &str = "text/javascript";

    // Images
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const SVG: &str = "image/svg+xml";
    pub const WEBP: &str = "image/webp";

    // Fonts
    pub const FONT_TRUETYPE: &str = "font/truetype";
    pub const FONT_TTF: &str = "font/ttf";
    pub const X_FONT_TRUETYPE: &str = "application/x-font-truetype";
    pub const FONT_OPENTYPE: &str = "font/opentype";
    pub const FONT_OTF: &str = "font/otf";
    pub const FONT_SFNT: &str = "application/font-sfnt";
    pub const MS_OPENTYPE: &str = "application/vnd.ms-opentype";
    pub const X_FONT_OPENTYPE: &str = "application/x-font-opentype";
    pub const FONT_WOFF: &str = "font/woff";
    pub const APPLICATION_FONT_WOFF: &str = "application/font-woff";
    pub const FONT_WOFF2: &str = "font/woff2";

    // Audio and video
    pub const AUDIO_MPEG: &str = "audio/mpeg";
    pub const AUDIO_MP4: &str = "audio/mp4";
    pub const AUDIO_OGG: &str = "audio/ogg";
    pub const AUDIO_OGG_OPUS: &str = "audio/ogg; codecs=opus";
    pub const VIDEO_MP4: &str = "video/mp4";
    pub const VIDEO_WEBM: &str = "video/webm";
}

/// Tokens of the manifest item `properties` attribute
pub mod property {
    pub const COVER_IMAGE: &str = "cover-image";
    pub const NAV: &str = "nav";
    pub const SCRIPTED: &str = "scripted";
    pub const MATHML: &str = "mathml";
    pub const SVG: &str = "svg";
    pub const REMOTE_RESOURCES: &str = "remote-resources";
    pub const SWITCH: &str = "switch";
}

/// Largest entry, in bytes, that a content reference will buffer (2^31 - 1).
pub const MAX_ENTRY_SIZE: u64 = i32::MAX as u64;
