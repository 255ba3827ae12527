//! Crawler module for rendering and processing a site
//!
//! This module contains the core crawling logic, including:
//! - Page rendering through WebDriver or plain HTTP
//! - Sitemap discovery for seeding
//! - The breadth-first frontier
//! - Link discovery
//! - Overall crawl coordination

mod coordinator;
mod frontier;
mod parser;
mod renderer;
mod sitemap;

pub use coordinator::CrawlSession;
pub use frontier::Frontier;
pub use parser::{parse_page, ParsedPage};
pub use renderer::{
    build_http_client, HttpRenderer, PageRenderer, PageResult, RenderError, RenderedPage,
    WebDriverRenderer,
};
pub use sitemap::{discover_sitemap_targets, is_sitemap_index, parse_locs, SITEMAP_PATHS};

use crate::config::{Config, RendererBackend};
use crate::extract::ExtractionRules;
use crate::output::{aggregate_site, CrawlStats, SiteLayout};
use crate::url::{normalize_target, site_name};
use crate::CrawlError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub stats: CrawlStats,
    /// The per-page Markdown tree
    pub pages_dir: PathBuf,
    /// Aggregate file and its page count, when aggregation ran
    pub aggregate: Option<(PathBuf, usize)>,
}

/// Builds the renderer selected in the configuration
///
/// # Returns
///
/// * `Ok(Box<dyn PageRenderer>)` - Ready renderer
/// * `Err(RenderError)` - WebDriver session or HTTP client could not be set up
pub async fn build_renderer(config: &Config) -> Result<Box<dyn PageRenderer>, RenderError> {
    match config.renderer.backend {
        RendererBackend::WebDriver => Ok(Box::new(WebDriverRenderer::connect(config).await?)),
        RendererBackend::Http => Ok(Box::new(HttpRenderer::new(config)?)),
    }
}

/// Runs a complete crawl of the site `start_url` belongs to
///
/// This is the main entry point. It will:
/// 1. Derive the site layout and create the page directory
/// 2. Build the renderer
/// 3. Seed the frontier with the start URL and sitemap URLs
/// 4. Crawl until the frontier is exhausted
/// 5. Close the renderer
/// 6. Write the aggregate document
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `start_url` - Where the crawl begins
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (individual pages may have failed)
/// * `Err(CrawlError)` - Setup failed before crawling, or the aggregate
///   could not be written
///
/// # Example
///
/// ```no_run
/// use site2md::config::Config;
/// use site2md::crawler::crawl;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let start = Url::parse("https://example.com/")?;
/// let report = crawl(Config::default(), &start).await?;
/// println!("{} pages saved", report.stats.saved);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, start_url: &Url) -> Result<CrawlReport, CrawlError> {
    // Everything that can fail is checked before a browser session is opened
    normalize_target(start_url)?;
    ExtractionRules::from_config(&config.extraction)?;
    let layout = SiteLayout::new(&config.output, start_url);
    std::fs::create_dir_all(&layout.pages_dir)?;
    let sitemap_client = build_http_client(
        config.renderer.user_agent.as_deref(),
        Duration::from_millis(config.crawler.sitemap_timeout_ms),
    )?;

    let use_sitemaps = config.crawler.use_sitemaps;
    let aggregate = config.output.aggregate;
    let renderer = build_renderer(&config).await?;

    let mut session = CrawlSession::new(config, start_url, renderer, &layout.pages_dir)?;

    if use_sitemaps {
        let targets = discover_sitemap_targets(&sitemap_client, start_url, session.domain()).await;
        let added = session.seed(targets);
        tracing::debug!("{} sitemap URLs added to the frontier", added);
    }

    let stats = session.run().await.clone();
    session.close().await;

    let aggregate = if aggregate {
        let count = aggregate_site(
            &layout.pages_dir,
            &layout.aggregate_file,
            &site_name(start_url),
            start_url.as_str(),
        )?;
        Some((layout.aggregate_file.clone(), count))
    } else {
        None
    };

    Ok(CrawlReport {
        stats,
        pages_dir: layout.pages_dir,
        aggregate,
    })
}

/// Rebuilds the aggregate from an existing page tree without crawling
///
/// # Returns
///
/// * `Ok((PathBuf, usize))` - Aggregate path and page count
/// * `Err(CrawlError)` - Reading the tree or writing the aggregate failed
pub fn aggregate_only(config: &Config, start_url: &Url) -> Result<(PathBuf, usize), CrawlError> {
    let layout = SiteLayout::new(&config.output, start_url);
    let count = aggregate_site(
        &layout.pages_dir,
        &layout.aggregate_file,
        &site_name(start_url),
        start_url.as_str(),
    )?;
    Ok((layout.aggregate_file, count))
}
