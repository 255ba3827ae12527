//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that composes the frontier, the page
//! renderer, the content extractor, the Markdown serializer and the path
//! mapper. One session drives one renderer; pages are visited strictly one
//! after another.

use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_page;
use crate::crawler::renderer::{PageRenderer, RenderError, RenderedPage};
use crate::extract::{extract_main, ExtractionRules};
use crate::output::{fragment_to_markdown, map_url_to_path, write_page, CrawlStats, OutputError};
use crate::state::{FrontierState, PageOutcome};
use crate::url::{is_skippable_resource, site_domain, CrawlTarget};
use crate::{CrawlError, UrlError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Owns everything one crawl needs: configuration, frontier, renderer,
/// compiled extraction rules and counters
pub struct CrawlSession {
    config: Config,
    domain: String,
    frontier: Frontier,
    renderer: Box<dyn PageRenderer>,
    rules: ExtractionRules,
    pages_dir: PathBuf,
    stats: CrawlStats,
}

impl CrawlSession {
    /// Creates a new crawl session
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `start_url` - The page the crawl starts from; fixes the crawl domain
    /// * `renderer` - Page renderer the session drives
    /// * `pages_dir` - Directory receiving the per-page Markdown tree
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Frontier seeded with the start URL
    /// * `Err(CrawlError)` - Invalid start URL, bad extraction rules, or the
    ///   page directory could not be created
    pub fn new(
        config: Config,
        start_url: &Url,
        renderer: Box<dyn PageRenderer>,
        pages_dir: &Path,
    ) -> Result<Self, CrawlError> {
        let start = crate::url::normalize_target(start_url)?;
        let domain = site_domain(start.as_url()).ok_or(UrlError::MissingDomain)?;
        let rules = ExtractionRules::from_config(&config.extraction)?;

        std::fs::create_dir_all(pages_dir).map_err(|e| {
            OutputError::Write(format!("cannot create {}: {}", pages_dir.display(), e))
        })?;

        let mut frontier = Frontier::new(config.crawler.max_pages);
        frontier.seed(std::iter::once(start));

        Ok(Self {
            config,
            domain,
            frontier,
            renderer,
            rules,
            pages_dir: pages_dir.to_path_buf(),
            stats: CrawlStats::new(),
        })
    }

    /// Adds sitemap-derived targets as depth-0 peers of the start URL
    ///
    /// # Returns
    ///
    /// The number of targets that were new to the frontier
    pub fn seed<I>(&mut self, targets: I) -> usize
    where
        I: IntoIterator<Item = CrawlTarget>,
    {
        self.frontier.seed(targets)
    }

    /// Runs the main crawl loop until the frontier is exhausted
    ///
    /// This is the core crawling logic that:
    /// 1. Takes the next target from the frontier
    /// 2. Skips non-document resources without counting them
    /// 3. Renders the page with a hard timeout
    /// 4. Extracts, converts and writes the page
    /// 5. Feeds discovered links back into the frontier
    ///
    /// Individual page failures never abort the run.
    pub async fn run(&mut self) -> &CrawlStats {
        tracing::info!(
            "Starting crawl of {} with {} renderer ({} seeds, ceiling {})",
            self.domain,
            self.renderer.name(),
            self.frontier.len(),
            self.config.crawler.max_pages
        );

        while let Some(target) = self.frontier.next_target() {
            let outcome = self.process_target(&target).await;
            self.stats.record(outcome);

            tracing::info!(
                "[{}] {} ({}, {} queued)",
                outcome,
                target,
                self.stats.progress_line(),
                self.frontier.len()
            );
        }

        self.stats.finish();
        tracing::info!(
            "Crawl complete: {} in {}s",
            self.stats.progress_line(),
            self.stats.duration_seconds()
        );

        &self.stats
    }

    /// Processes one dequeued target and reports its outcome
    async fn process_target(&mut self, target: &CrawlTarget) -> PageOutcome {
        if is_skippable_resource(target.as_url()) {
            tracing::debug!("Skipping non-HTML resource: {}", target);
            return PageOutcome::Skipped;
        }

        self.frontier.record_attempt();
        tracing::debug!("Fetching #{}: {}", self.frontier.attempts(), target);

        let page = match self.render_with_timeout(target.as_url()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed: {}", e);
                return PageOutcome::Failed;
            }
        };

        let outcome = self.save_page(target, &page);
        self.discover_links(&page);
        outcome
    }

    /// Renders a page, bounded by the navigation timeout plus the settle delay
    async fn render_with_timeout(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let timeout_ms =
            self.config.crawler.navigation_timeout_ms + self.config.crawler.settle_delay_ms;

        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.renderer.render(url))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                timeout_ms,
            }),
        }
    }

    /// Extracts, converts and writes one page
    fn save_page(&self, target: &CrawlTarget, page: &RenderedPage) -> PageOutcome {
        let fragment = extract_main(&page.markup, &self.rules);
        let markdown = fragment_to_markdown(&fragment);
        let path = map_url_to_path(target.as_str());

        match write_page(&self.pages_dir, &path, target.as_str(), &markdown) {
            Ok(written) => {
                tracing::debug!("Wrote {}", written.display());
                if markdown.is_empty() {
                    PageOutcome::Empty
                } else {
                    PageOutcome::Saved
                }
            }
            Err(e) => {
                tracing::error!("Failed to write {} for {}: {}", path, target, e);
                PageOutcome::Failed
            }
        }
    }

    /// Feeds links from the raw markup back into the frontier
    fn discover_links(&mut self, page: &RenderedPage) {
        let parsed = parse_page(&page.markup, &page.url, &self.domain);
        if let Some(title) = &parsed.title {
            tracing::debug!("Title: {}", title);
        }

        let added = parsed
            .links
            .into_iter()
            .filter(|link| self.frontier.push(link.clone()))
            .count();

        self.stats.record_links(added);
        if added > 0 {
            tracing::debug!("Queued {} new links from {}", added, page.url);
        }
    }

    /// Closes the renderer session
    pub async fn close(&self) {
        if let Err(e) = self.renderer.close().await {
            tracing::warn!("Error closing {} renderer: {}", self.renderer.name(), e);
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn frontier_state(&self) -> FrontierState {
        self.frontier.state()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }
}
