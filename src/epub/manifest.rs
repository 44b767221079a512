//! Manifest items as consumed by the content index.
//!
//! Parsing the OPF package document is the job of the caller; this module only
//! defines the shape of what that parser hands over.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::epub::constants::property;

bitflags! {
    /// Markers from the manifest item `properties` attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ManifestProperties: u8 {
        /// The item is the publication's cover image
        const COVER_IMAGE = 0x01;
        /// The item is the EPUB 3 navigation document
        const NAV = 0x02;
        const SCRIPTED = 0x04;
        const MATHML = 0x08;
        const SVG = 0x10;
        const REMOTE_RESOURCES = 0x20;
        const SWITCH = 0x40;
    }
}

impl ManifestProperties {
    /// Parse a space-separated `properties` attribute value.
    ///
    /// Unknown tokens are ignored.
    pub fn parse(value: &str) -> Self {
        value
            .split_ascii_whitespace()
            .fold(Self::empty(), |acc, token| acc | Self::from_token(token))
    }

    fn from_token(token: &str) -> Self {
        match token {
            property::COVER_IMAGE => Self::COVER_IMAGE,
            property::NAV => Self::NAV,
            property::SCRIPTED => Self::SCRIPTED,
            property::MATHML => Self::MATHML,
            property::SVG => Self::SVG,
            property::REMOTE_RESOURCES => Self::REMOTE_RESOURCES,
            property::SWITCH => Self::SWITCH,
            _ => Self::empty(),
        }
    }
}

/// EPUB version of the package document.
///
/// Cover and table-of-contents discovery differ between EPUB 2 and EPUB 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EpubVersion {
    Epub2,
    #[default]
    Epub3,
}

/// One `<item>` of the package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: String,
    /// Path relative to the package document's directory
    pub href: String,
    /// Declared media type, kept verbatim
    pub media_type: String,
    #[serde(default)]
    pub properties: ManifestProperties,
    /// Id of the fallback item, if any
    #[serde(default)]
    pub fallback: Option<String>,
    /// Id of the SMIL media overlay, if any
    #[serde(default)]
    pub media_overlay: Option<String>,
}

impl ManifestItem {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the property markers.
    pub fn with_properties(mut self, properties: ManifestProperties) -> Self {
        self.properties = properties;
        self
    }

    #[inline]
    pub fn is_cover_image(&self) -> bool {
        self.properties.contains(ManifestProperties::COVER_IMAGE)
    }

    #[inline]
    pub fn is_nav(&self) -> bool {
        self.properties.contains(ManifestProperties::NAV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let props = ManifestProperties::parse("nav scripted");
        assert!(props.contains(ManifestProperties::NAV));
        assert!(props.contains(ManifestProperties::SCRIPTED));
        assert!(!props.contains(ManifestProperties::COVER_IMAGE));
    }

    #[test]
    fn test_parse_properties_ignores_unknown_tokens() {
        let props = ManifestProperties::parse("  cover-image\tfoo  ");
        assert_eq!(props, ManifestProperties::COVER_IMAGE);
        assert!(ManifestProperties::parse("").is_empty());
        // Tokens are case-sensitive
        assert!(ManifestProperties::parse("NAV").is_empty());
    }

    #[test]
    fn test_manifest_item_markers() {
        let item = ManifestItem::new("c", "cover.jpg", "image/jpeg")
            .with_properties(ManifestProperties::COVER_IMAGE);
        assert!(item.is_cover_image());
        assert!(!item.is_nav());
        assert!(item.fallback.is_none());
    }
}
