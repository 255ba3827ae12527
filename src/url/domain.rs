use url::Url;

/// Extracts the crawl domain (`host[:port]`) from a URL
///
/// The host is lowercased. A non-default port is part of the identity, and
/// `www.` is kept: `www.example.com` and `example.com` are different sites.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host[:port]`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site2md::url::site_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(site_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(site_domain(&url), Some("localhost:8080".to_string()));
/// ```
pub fn site_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Derives the short site name used for output directories
///
/// Strips a leading `www.` and the final TLD label:
/// `https://www.example.com` becomes `example` and `docs.example.org`
/// becomes `docs.example`. Characters outside `[A-Za-z0-9_.-]` are replaced
/// so the name is always safe as a directory component.
pub fn site_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let name = match host.rsplit_once('.') {
        Some((rest, _tld)) if !rest.is_empty() => rest,
        _ => host,
    };

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "site".to_string()
    } else {
        sanitized
    }
}
