use serde::Deserialize;

/// Main configuration structure for site2md
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Hard ceiling on fetch attempts per run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Time to let client-side scripts settle after navigation (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Hard timeout for one page navigation (milliseconds)
    #[serde(
        rename = "navigation-timeout-ms",
        default = "default_navigation_timeout_ms"
    )]
    pub navigation_timeout_ms: u64,

    /// Timeout for each sitemap request (milliseconds)
    #[serde(rename = "sitemap-timeout-ms", default = "default_sitemap_timeout_ms")]
    pub sitemap_timeout_ms: u64,

    /// Seed the frontier from the site's sitemaps
    #[serde(rename = "use-sitemaps", default = "default_true")]
    pub use_sitemaps: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            settle_delay_ms: default_settle_delay_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            sitemap_timeout_ms: default_sitemap_timeout_ms(),
            use_sitemaps: true,
        }
    }
}

/// Which page renderer drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RendererBackend {
    /// Real browser through a WebDriver server; executes JavaScript
    #[default]
    #[serde(rename = "webdriver")]
    WebDriver,
    /// Plain HTTP GET; no JavaScript
    #[serde(rename = "http")]
    Http,
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub backend: RendererBackend,

    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// User agent override sent by the browser and the HTTP client
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// Browser UI language
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::default(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            user_agent: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
            locale: default_locale(),
        }
    }
}

/// Output layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory under which the per-site page tree is created
    #[serde(rename = "pages-root", default = "default_pages_root")]
    pub pages_root: String,

    /// Directory receiving the aggregate `<site>.md` document
    #[serde(rename = "aggregate-root", default = "default_aggregate_root")]
    pub aggregate_root: String,

    /// Build the aggregate document after the crawl
    #[serde(default = "default_true")]
    pub aggregate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_root: default_pages_root(),
            aggregate_root: default_aggregate_root(),
            aggregate: true,
        }
    }
}

/// One attribute pattern rule
///
/// `pattern` is matched case-insensitively anywhere inside the attribute
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
    pub attribute: String,
    pub pattern: String,
}

impl PatternRule {
    pub fn new(attribute: &str, pattern: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// One main-content probe: either a tag name or an attribute pattern
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ContentProbe {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ContentProbe {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    pub fn attribute(attribute: &str, pattern: &str) -> Self {
        Self {
            tag: None,
            attribute: Some(attribute.to_string()),
            pattern: Some(pattern.to_string()),
        }
    }
}

/// Content extraction rules, applied in order
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Elements removed outright, with their content
    #[serde(rename = "strip-tags", default = "default_strip_tags")]
    pub strip_tags: Vec<String>,

    /// Attribute rules marking page furniture for removal
    #[serde(default = "default_boilerplate")]
    pub boilerplate: Vec<PatternRule>,

    /// Main-content container probes; the first probe with a match wins
    #[serde(rename = "content-probe", default = "default_content_probes")]
    pub content_probes: Vec<ContentProbe>,

    /// Attribute rules applied inside the selected container
    #[serde(default = "default_cleanup")]
    pub cleanup: Vec<PatternRule>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_tags: default_strip_tags(),
            boilerplate: default_boilerplate(),
            content_probes: default_content_probes(),
            cleanup: default_cleanup(),
        }
    }
}

fn default_max_pages() -> u32 {
    10_000
}

fn default_settle_delay_ms() -> u64 {
    3_000
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}

fn default_sitemap_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_pages_root() -> String {
    "./dl".to_string()
}

fn default_aggregate_root() -> String {
    "./websites".to_string()
}

fn default_strip_tags() -> Vec<String> {
    [
        "script", "style", "noscript", "svg", "iframe", "header", "footer", "nav",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

fn default_boilerplate() -> Vec<PatternRule> {
    vec![
        PatternRule::new("id", "(header|footer|nav|menu|sidebar|cookie|banner)"),
        PatternRule::new(
            "class",
            "(header|footer|nav|menu|sidebar|cookie|banner|top-bar|bottom-bar)",
        ),
        PatternRule::new("role", "(banner|navigation|contentinfo)"),
        PatternRule::new("data-section", "(header|footer)"),
    ]
}

fn default_content_probes() -> Vec<ContentProbe> {
    vec![
        ContentProbe::tag("main"),
        ContentProbe::tag("article"),
        ContentProbe::attribute("id", "(main|content|primary)"),
        ContentProbe::attribute(
            "class",
            "(main-content|page-content|entry-content|post-content)",
        ),
        ContentProbe::attribute("role", "^main$"),
        ContentProbe::tag("body"),
    ]
}

fn default_cleanup() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "class",
        "(breadcrumb|pagination|share|social)",
    )]
}
