//! Page renderers
//!
//! A renderer turns a URL into the page's final markup. Two implementations:
//! - `WebDriverRenderer` drives a real browser through a WebDriver server so
//!   client-side JavaScript runs before the markup is read
//! - `HttpRenderer` issues a plain GET for sites that render on the server

use crate::config::{Config, RendererConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors produced while rendering one page or managing the session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("WebDriver session error: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Rendering {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML at {url}, got '{content_type}'")]
    NotHtml { url: String, content_type: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A successfully rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects
    pub url: Url,
    /// Full page markup
    pub markup: String,
}

/// Outcome of rendering one target; consumed immediately by the crawl loop
pub type PageResult = Result<RenderedPage, RenderError>;

/// Contract for anything that can render a page
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url` and returns the settled markup
    async fn render(&self, url: &Url) -> PageResult;

    /// Releases the underlying session
    async fn close(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Builds an HTTP client with proper configuration
///
/// Shared by the HTTP renderer and the sitemap fetcher.
///
/// # Arguments
///
/// * `user_agent` - Optional user agent override
/// * `timeout` - Total request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: Option<&str>, timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = user_agent
        .map(str::to_string)
        .unwrap_or_else(default_user_agent);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

fn default_user_agent() -> String {
    format!("site2md/{}", env!("CARGO_PKG_VERSION"))
}

/// Plain HTTP renderer; no JavaScript execution
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let client = build_http_client(
            config.renderer.user_agent.as_deref(),
            Duration::from_millis(config.crawler.navigation_timeout_ms),
        )?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url) -> PageResult {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Check Content-Type
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(RenderError::NotHtml {
                url: url.to_string(),
                content_type,
            });
        }

        let markup = response.text().await?;
        Ok(RenderedPage {
            url: final_url,
            markup,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Missing Content-Type is given the benefit of the doubt
fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}

/// Browser renderer backed by a WebDriver session (one tab, reused)
pub struct WebDriverRenderer {
    client: fantoccini::Client,
    settle_delay: Duration,
}

impl WebDriverRenderer {
    /// Opens a session against the configured WebDriver server
    ///
    /// # Returns
    ///
    /// * `Ok(WebDriverRenderer)` - Session established
    /// * `Err(RenderError::Session)` - Server unreachable or refused the session
    pub async fn connect(config: &Config) -> Result<Self, RenderError> {
        let mut builder = fantoccini::ClientBuilder::native();
        builder.capabilities(browser_capabilities(&config.renderer));

        let client = builder
            .connect(&config.renderer.webdriver_url)
            .await
            .map_err(|e| {
                RenderError::Session(format!(
                    "cannot open session at {}: {}",
                    config.renderer.webdriver_url, e
                ))
            })?;

        let timeouts = fantoccini::wd::TimeoutConfiguration::new(
            None,
            Some(Duration::from_millis(config.crawler.navigation_timeout_ms)),
            None,
        );
        if let Err(e) = client.update_timeouts(timeouts).await {
            tracing::debug!("WebDriver server rejected timeout settings: {}", e);
        }

        tracing::info!("Connected to WebDriver at {}", config.renderer.webdriver_url);

        Ok(Self {
            client,
            settle_delay: Duration::from_millis(config.crawler.settle_delay_ms),
        })
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &Url) -> PageResult {
        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Give client-side scripts time to populate the page
        tokio::time::sleep(self.settle_delay).await;

        let markup = self.client.source().await.map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            reason: format!("cannot read page source: {}", e),
        })?;

        let final_url = match self.client.current_url().await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!("Could not read current URL for {}: {}", url, e);
                url.clone()
            }
        };

        Ok(RenderedPage {
            url: final_url,
            markup,
        })
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| RenderError::Session(format!("cannot close session: {}", e)))
    }

    fn name(&self) -> &'static str {
        "webdriver"
    }
}

/// WebDriver capabilities for a Chromium session
fn browser_capabilities(config: &RendererConfig) -> Map<String, Value> {
    let mut args = vec![
        format!("--window-size={},{}", config.window_width, config.window_height),
        format!("--lang={}", config.locale),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }
    if let Some(agent) = &config.user_agent {
        args.push(format!("--user-agent={}", agent));
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}
