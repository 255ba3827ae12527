//! HTML parser for link discovery
//!
//! Links are read from the raw rendered markup (before content extraction)
//! so navigation menus still feed the frontier even though they never reach
//! the Markdown output.

use crate::url::{classify_link, CrawlTarget};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from a rendered page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// In-domain crawl targets, in document order, without duplicates
    pub links: Vec<CrawlTarget>,
}

/// Parses page markup and collects its crawlable links
///
/// Every `<a href>` is resolved against `base_url` (the final URL after
/// redirects) and run through the URL classifier; only same-domain,
/// navigable, non-resource targets survive.
///
/// # Arguments
///
/// * `html` - The full page markup
/// * `base_url` - The URL the page was actually served from
/// * `domain` - The crawl domain (`host[:port]`)
///
/// # Example
///
/// ```
/// use site2md::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<title>Home</title><a href="/about">About</a><a href="https://other.com/">x</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &base_url, "example.com");
/// assert_eq!(parsed.title, Some("Home".to_string()));
/// assert_eq!(parsed.links.len(), 1);
/// ```
pub fn parse_page(html: &str, base_url: &Url, domain: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url, domain),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all crawlable links from the HTML document
fn extract_links(document: &Html, base_url: &Url, domain: &str) -> Vec<CrawlTarget> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(target) = classify_link(base_url, href, domain) {
            if seen.insert(target.clone()) {
                links.push(target);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        parse_page(html, &base_url(), "example.com")
            .links
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url(), "example.com");
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url(), "example.com");
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_relative_links_resolved() {
        let html = r#"<a href="/other">A</a><a href="sibling">B</a>"#;
        assert_eq!(
            links(html),
            vec!["https://example.com/other", "https://example.com/sibling"]
        );
    }

    #[test]
    fn test_resolved_against_final_url() {
        let html = r#"<a href="next">Next</a>"#;
        let base = Url::parse("https://example.com/docs/start").unwrap();
        let parsed = parse_page(html, &base, "example.com");
        assert_eq!(parsed.links[0].as_str(), "https://example.com/docs/next");
    }

    #[test]
    fn test_other_domains_dropped() {
        let html = r#"<a href="https://other.com/page">X</a><a href="https://www.example.com/">Y</a>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_non_navigable_dropped() {
        let html = r##"
            <a href="javascript:void(0)">js</a>
            <a href="mailto:test@example.com">mail</a>
            <a href="tel:+1234567890">tel</a>
            <a href="data:text/html,hi">data</a>
            <a href="#section">jump</a>
            <a href="">empty</a>
        "##;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_resources_dropped() {
        let html = r#"<a href="/brochure.pdf">PDF</a><a href="/video.mp4?t=3">Video</a>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_query_variants_collapse() {
        let html = r#"
            <a href="/contact?ref=footer">A</a>
            <a href="/contact">B</a>
            <a href="/contact#form">C</a>
        "#;
        assert_eq!(links(html), vec!["https://example.com/contact"]);
    }

    #[test]
    fn test_links_inside_nav_are_followed() {
        let html = r#"<nav><a href="/docs">Docs</a></nav><main>Body</main>"#;
        assert_eq!(links(html), vec!["https://example.com/docs"]);
    }
}
