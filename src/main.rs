//! site2md main entry point
//!
//! This is the command-line interface for the site2md crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use site2md::config::{load_config_with_hash, validate, Config, RendererBackend};
use site2md::crawler::{aggregate_only, crawl};
use site2md::output::SiteLayout;
use site2md::url::{normalize_target, site_domain, site_name};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// site2md: mirror a JavaScript-rendered website as Markdown
///
/// site2md renders every page of one site in a browser, keeps only the main
/// content, writes one Markdown file per page and finally concatenates them
/// into a single document.
#[derive(Parser, Debug)]
#[command(name = "site2md")]
#[command(version)]
#[command(about = "Crawl a website into Markdown files", long_about = None)]
struct Cli {
    /// URL the crawl starts from; its host defines the crawl domain
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the per-site page tree
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Directory receiving the aggregate document
    #[arg(long, value_name = "DIR")]
    aggregate_dir: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Page renderer to use
    #[arg(long, value_enum)]
    renderer: Option<BackendArg>,

    /// WebDriver server endpoint
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,

    /// Do not seed the crawl from sitemaps
    #[arg(long)]
    no_sitemap: bool,

    /// Skip building the aggregate document
    #[arg(long, conflicts_with = "aggregate_only")]
    no_aggregate: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "aggregate_only")]
    dry_run: bool,

    /// Rebuild the aggregate from an existing page tree and exit
    #[arg(long, conflicts_with = "dry_run")]
    aggregate_only: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Webdriver,
    Http,
}

impl From<BackendArg> for RendererBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Webdriver => RendererBackend::WebDriver,
            BackendArg::Http => RendererBackend::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    let start_url = Url::parse(&cli.url).with_context(|| format!("invalid URL: {}", cli.url))?;
    normalize_target(&start_url).with_context(|| format!("cannot crawl {}", cli.url))?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &start_url);
    } else if cli.aggregate_only {
        handle_aggregate_only(&config, &start_url)?;
    } else {
        handle_crawl(config, &start_url).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site2md=info,warn"),
            1 => EnvFilter::new("site2md=debug,info"),
            2 => EnvFilter::new("site2md=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Folds command-line flags over the file (or default) configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.pages_root = dir.clone();
    }
    if let Some(dir) = &cli.aggregate_dir {
        config.output.aggregate_root = dir.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(backend) = cli.renderer {
        config.renderer.backend = backend.into();
    }
    if let Some(endpoint) = &cli.webdriver_url {
        config.renderer.webdriver_url = endpoint.clone();
    }
    if cli.no_sitemap {
        config.crawler.use_sitemaps = false;
    }
    if cli.no_aggregate {
        config.output.aggregate = false;
    }
}

/// Handles the --dry-run mode: shows the resolved plan without crawling
fn handle_dry_run(config: &Config, start_url: &Url) {
    let layout = SiteLayout::new(&config.output, start_url);

    println!("=== site2md Dry Run ===\n");

    println!("Target:");
    println!("  Start URL: {}", start_url);
    println!(
        "  Domain: {}",
        site_domain(start_url).unwrap_or_else(|| "-".to_string())
    );
    println!("  Site name: {}", site_name(start_url));

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!(
        "  Navigation timeout: {}ms",
        config.crawler.navigation_timeout_ms
    );
    println!("  Use sitemaps: {}", config.crawler.use_sitemaps);

    println!("\nRenderer:");
    match config.renderer.backend {
        RendererBackend::WebDriver => {
            println!("  Backend: webdriver");
            println!("  Endpoint: {}", config.renderer.webdriver_url);
            println!("  Headless: {}", config.renderer.headless);
            println!(
                "  Window: {}x{}",
                config.renderer.window_width, config.renderer.window_height
            );
        }
        RendererBackend::Http => println!("  Backend: http"),
    }
    if let Some(agent) = &config.renderer.user_agent {
        println!("  User agent: {}", agent);
    }

    println!("\nOutput:");
    println!("  Pages: {}", layout.pages_dir.display());
    if config.output.aggregate {
        println!("  Aggregate: {}", layout.aggregate_file.display());
    } else {
        println!("  Aggregate: disabled");
    }

    println!("\nExtraction:");
    println!("  Stripped tags: {}", config.extraction.strip_tags.join(", "));
    println!("  Boilerplate rules: {}", config.extraction.boilerplate.len());
    println!(
        "  Content probes: {}",
        config.extraction.content_probes.len()
    );
    println!("  Cleanup rules: {}", config.extraction.cleanup.len());

    println!("\n✓ Configuration is valid");
}

/// Handles the --aggregate-only mode: rebuilds the aggregate document
fn handle_aggregate_only(config: &Config, start_url: &Url) -> anyhow::Result<()> {
    let (path, count) = aggregate_only(config, start_url).context("aggregation failed")?;
    println!("✓ Aggregated {} pages into {}", count, path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, start_url: &Url) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (max {} pages, {:?} renderer)",
        start_url,
        config.crawler.max_pages,
        config.renderer.backend
    );

    let report = match crawl(config, start_url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    report.stats.print_summary();
    println!("Pages written to: {}", report.pages_dir.display());
    if let Some((path, count)) = &report.aggregate {
        println!("Aggregate ({} pages): {}", count, path.display());
    }

    Ok(())
}
