//! Sitemap discovery
//!
//! Sitemaps are best-effort seeds. Every failure (network, status, parse) is
//! logged at debug level and ignored; a site without a sitemap is normal.

use crate::url::{is_crawlable, normalize_target, CrawlTarget};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Well-known sitemap locations, relative to the site origin, tried in order
pub const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap/sitemap.xml"];

#[allow(clippy::expect_used)]
static LOC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // <loc>, <ns:loc>, optional CDATA wrapper
    Regex::new(r"(?is)<(?:[a-z0-9_-]+:)?loc\b[^>]*>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</(?:[a-z0-9_-]+:)?loc\s*>")
        .expect("loc regex is valid")
});

#[allow(clippy::expect_used)]
static SITEMAP_INDEX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:[a-z0-9_-]+:)?sitemapindex\b").expect("sitemapindex regex is valid")
});

#[allow(clippy::expect_used)]
static XML_ENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("entity regex is valid")
});

/// Returns every `<loc>` value in a sitemap or sitemap index, in order
pub fn parse_locs(xml: &str) -> Vec<String> {
    LOC_PATTERN
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_xml_entities(m.as_str().trim()))
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Returns true if the document is a sitemap index rather than a URL set
pub fn is_sitemap_index(xml: &str) -> bool {
    SITEMAP_INDEX_PATTERN.is_match(xml)
}

/// Decodes the predefined XML entities and numeric character references in
/// one pass, so `&amp;#38;` stays `&#38;`
fn decode_xml_entities(text: &str) -> String {
    XML_ENTITY_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => numeric_reference(entity),
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn numeric_reference(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// Collects in-domain crawl targets from the site's sitemaps
///
/// Tries each of [`SITEMAP_PATHS`] at the origin of `start_url` and merges
/// the results. A sitemap index has its child sitemaps fetched one level
/// deep. Only URLs on `domain` that the classifier accepts are returned.
///
/// # Arguments
///
/// * `client` - HTTP client; its timeout bounds every request
/// * `start_url` - Any URL of the site
/// * `domain` - The crawl domain (`host[:port]`)
pub async fn discover_sitemap_targets(
    client: &Client,
    start_url: &Url,
    domain: &str,
) -> Vec<CrawlTarget> {
    let mut targets = Vec::new();
    let mut seen = HashSet::new();

    for path in SITEMAP_PATHS {
        let Ok(sitemap_url) = start_url.join(path) else {
            continue;
        };

        let Some(xml) = fetch_sitemap(client, &sitemap_url).await else {
            continue;
        };

        let mut locs = Vec::new();
        if is_sitemap_index(&xml) {
            for child in parse_locs(&xml) {
                let Ok(child_url) = Url::parse(&child) else {
                    continue;
                };
                if let Some(child_xml) = fetch_sitemap(client, &child_url).await {
                    locs.extend(parse_locs(&child_xml));
                }
            }
        } else {
            locs = parse_locs(&xml);
        }

        for loc in locs {
            let Ok(url) = Url::parse(&loc) else {
                continue;
            };
            if !is_crawlable(&url, domain) {
                continue;
            }
            if let Ok(target) = normalize_target(&url) {
                if seen.insert(target.clone()) {
                    targets.push(target);
                }
            }
        }
    }

    tracing::info!("Found {} URLs from sitemaps", targets.len());
    targets
}

async fn fetch_sitemap(client: &Client, url: &Url) -> Option<String> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Sitemap {} unavailable: {}", url, e);
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        tracing::debug!("Sitemap {} returned {}", url, response.status());
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::debug!("Sitemap {} body unreadable: {}", url, e);
            None
        }
    }
}
