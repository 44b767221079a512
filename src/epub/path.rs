//! Resolution of manifest hrefs to archive member names.
//!
//! Manifest hrefs are URLs relative to the package document's directory (the
//! content root). Archive member names have no leading slash and use forward
//! slashes as separators.

use std::borrow::Cow;

/// Directory portion of the package document path.
///
/// For example, "OEBPS" for "OEBPS/content.opf", and "" for "content.opf".
pub fn content_dir_of(package_path: &str) -> &str {
    match package_path.rfind('/') {
        Some(pos) => &package_path[..pos],
        None => "",
    }
}

/// Resolve a manifest href against the content root.
///
/// Percent-encoded sequences in the href are decoded and "." / ".." segments
/// are normalized. Segments that would climb above the archive root are
/// dropped.
pub fn resolve_href(content_dir: &str, href: &str) -> String {
    let href = decode_href(href);
    let joined = join_paths(content_dir, &href);
    normalize_path(&joined)
}

/// Percent-decode an href, falling back to the raw text on invalid UTF-8.
fn decode_href(href: &str) -> Cow<'_, str> {
    if !href.contains('%') {
        return Cow::Borrowed(href);
    }
    match urlencoding::decode(href) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(href),
    }
}

/// Helper function to join two paths using forward slashes
fn join_paths(base: &str, rel: &str) -> String {
    if base.is_empty() || rel.starts_with('/') {
        rel.to_string()
    } else if base.ends_with('/') {
        format!("{}{}", base, rel)
    } else {
        format!("{}/{}", base, rel)
    }
}

/// Helper function to normalize a path (resolve ".." and ".")
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            // Skip empty and current directory markers
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }

    parts.join("/")
}
