//! URL handling module for site2md
//!
//! This module decides which discovered links belong in the crawl, normalizes
//! them into [`CrawlTarget`]s and derives the crawl domain and site name.

mod domain;
mod normalize;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Re-export main functions
pub use domain::{site_domain, site_name};
pub use normalize::{normalize_target, parse_target, CrawlTarget};

/// File extensions that never lead to an HTML document
pub const SKIP_EXTENSIONS: &[&str] = &[
    "pdf", "mp4", "mov", "avi", "mp3", "wav", "zip", "tar", "gz", "rar", "7z", "exe", "doc",
    "docx", "ppt", "pptx", "xls", "xlsx", "rtf", "odt", "swf", "apk", "dmg", "iso", "ogg", "webm",
    "mkv", "flv", "wmv", "m4v",
];

/// href prefixes that never point at another page
const NON_NAVIGABLE_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "data:", "#"];

#[allow(clippy::expect_used)]
static SKIP_EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternatives = SKIP_EXTENSIONS
        .iter()
        .map(|ext| regex::escape(ext))
        .collect::<Vec<_>>()
        .join("|");
    // Built from the constant list above
    Regex::new(&format!(r"(?i)\.({})$", alternatives)).expect("extension regex is valid")
});

/// Returns true if a raw href can lead to another page at all
///
/// Rejects `mailto:`, `tel:`, `javascript:` and `data:` links, in-page
/// fragments and empty values before they are resolved.
pub fn is_navigable(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() {
        return false;
    }

    let lowered = href.to_ascii_lowercase();
    !NON_NAVIGABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Returns true if the URL points at a non-HTML resource
///
/// Only the path is checked. The host and the query string are ignored, so
/// `/file.pdf?dl=1` is a resource while `/viewer?file=guide.pdf` is a page.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site2md::url::is_skippable_resource;
///
/// let pdf = Url::parse("https://site.com/file.pdf?dl=1").unwrap();
/// assert!(is_skippable_resource(&pdf));
///
/// let post = Url::parse("https://site.com/blog/post").unwrap();
/// assert!(!is_skippable_resource(&post));
/// ```
pub fn is_skippable_resource(url: &Url) -> bool {
    SKIP_EXTENSION_PATTERN.is_match(url.path())
}

/// Returns true if an absolute URL belongs in a crawl of `domain`
///
/// # Arguments
///
/// * `url` - The resolved link target
/// * `domain` - The crawl domain as `host[:port]` (see [`site_domain`])
///
/// # Returns
///
/// `true` only for http(s) URLs on exactly the crawl domain that do not
/// point at a skippable resource.
pub fn is_crawlable(url: &Url, domain: &str) -> bool {
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    match site_domain(url) {
        Some(host) if host == domain => !is_skippable_resource(url),
        _ => false,
    }
}

/// Resolves a raw href found on `base` and returns its crawl target, if any
///
/// This is the full classifier pipeline applied to every discovered link.
pub fn classify_link(base: &Url, href: &str, domain: &str) -> Option<CrawlTarget> {
    if !is_navigable(href) {
        return None;
    }

    let resolved = base.join(href.trim()).ok()?;
    if !is_crawlable(&resolved, domain) {
        return None;
    }

    normalize_target(&resolved).ok()
}
