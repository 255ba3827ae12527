use crate::config::types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, RendererBackend, RendererConfig,
};
use crate::extract::ExtractionRules;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    validate_extraction_config(&config.extraction)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.navigation_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= 1000ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.settle_delay_ms >= config.navigation_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "settle_delay_ms ({}ms) must be shorter than navigation_timeout_ms ({}ms)",
            config.settle_delay_ms, config.navigation_timeout_ms
        )));
    }

    if config.sitemap_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "sitemap_timeout_ms must be >= 100ms, got {}ms",
            config.sitemap_timeout_ms
        )));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.backend == RendererBackend::WebDriver {
        let url = Url::parse(&config.webdriver_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver_url: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "webdriver_url must use http or https, got '{}'",
                config.webdriver_url
            )));
        }
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.pages_root.is_empty() {
        return Err(ConfigError::Validation(
            "pages_root cannot be empty".to_string(),
        ));
    }

    if config.aggregate_root.is_empty() {
        return Err(ConfigError::Validation(
            "aggregate_root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction rules by compiling them
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.content_probes.is_empty() {
        return Err(ConfigError::Validation(
            "at least one content probe is required".to_string(),
        ));
    }

    ExtractionRules::from_config(config).map(|_| ())
}
