//! Output module: everything that touches the filesystem
//!
//! This module handles:
//! - Mapping page URLs onto collision-safe Markdown paths
//! - Serializing extracted fragments to Markdown
//! - Writing per-page files with a provenance header
//! - Concatenating a site's pages into one aggregate document
//! - Recording crawl statistics

mod aggregate;
mod markdown;
mod path_mapper;
pub mod stats;
mod writer;

pub use aggregate::{aggregate_site, AggregateDocument, AggregateSection};
pub use markdown::{collapse_blank_lines, fragment_to_markdown};
pub use path_mapper::{map_url_to_path, OutputPath};
pub use stats::CrawlStats;
pub use writer::{page_document, split_page_document, write_page, SiteLayout};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
