//! Configuration module for site2md
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file is equivalent to `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use site2md::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site2md.toml")).unwrap();
//! println!("Crawl ceiling: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ContentProbe, CrawlerConfig, ExtractionConfig, OutputConfig, PatternRule,
    RendererBackend, RendererConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
