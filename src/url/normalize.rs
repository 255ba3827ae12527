use crate::UrlError;
use std::fmt;
use url::Url;

/// A normalized crawl target: scheme, host, port and path only
///
/// Two links that differ only in query string or fragment produce the same
/// target, so the frontier visits the page once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlTarget(Url);

impl CrawlTarget {
    /// Returns the normalized URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the normalized URL as a string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Normalizes an absolute URL into a crawl target
///
/// # Normalization Steps
///
/// 1. Reject anything other than http and https
/// 2. Reject URLs without a host
/// 3. Drop the query string
/// 4. Drop the fragment
///
/// The path is kept exactly as the site serves it: `/about` and `/about/`
/// stay distinct targets.
///
/// # Returns
///
/// * `Ok(CrawlTarget)` - Normalized target
/// * `Err(UrlError)` - Unsupported scheme or missing host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site2md::url::normalize_target;
///
/// let url = Url::parse("https://example.com/contact?ref=footer#form").unwrap();
/// let target = normalize_target(&url).unwrap();
/// assert_eq!(target.as_str(), "https://example.com/contact");
/// ```
pub fn normalize_target(url: &Url) -> Result<CrawlTarget, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);

    Ok(CrawlTarget(url))
}

/// Parses a URL string and normalizes it into a crawl target
pub fn parse_target(url_str: &str) -> Result<CrawlTarget, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_target(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_query() {
        let result = parse_target("https://example.com/contact?ref=footer").unwrap();
        assert_eq!(result.as_str(), "https://example.com/contact");
    }

    #[test]
    fn test_remove_fragment() {
        let result = parse_target("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_variants_are_equal() {
        let a = parse_target("https://example.com/a?x=1").unwrap();
        let b = parse_target("https://example.com/a?y=2#z").unwrap();
        let c = parse_target("https://example.com/a").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_keeps_port_and_scheme() {
        let result = parse_target("http://127.0.0.1:8080/docs").unwrap();
        assert_eq!(result.as_str(), "http://127.0.0.1:8080/docs");
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let with = parse_target("https://example.com/about/").unwrap();
        let without = parse_target("https://example.com/about").unwrap();
        assert_ne!(with, without);
    }

    #[test]
    fn test_lowercase_host() {
        let result = parse_target("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = parse_target("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = parse_target("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = parse_target("not a url");
        assert!(matches!(result.unwrap_err(), UrlError::Parse(_)));
    }
}
