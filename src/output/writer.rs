use super::{OutputPath, OutputResult};
use crate::config::OutputConfig;
use crate::url::site_name;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const SOURCE_PREFIX: &str = "<!-- Source: ";
const SOURCE_SUFFIX: &str = " -->";

/// Where one site's output lands on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// `<pages-root>/<site-name>-website/`
    pub pages_dir: PathBuf,
    /// `<aggregate-root>/<site-name>.md`
    pub aggregate_file: PathBuf,
}

impl SiteLayout {
    /// Derives the layout for the site the start URL belongs to
    pub fn new(config: &OutputConfig, start_url: &Url) -> Self {
        let name = site_name(start_url);
        Self {
            pages_dir: Path::new(&config.pages_root).join(format!("{}-website", name)),
            aggregate_file: Path::new(&config.aggregate_root).join(format!("{}.md", name)),
        }
    }
}

/// Formats a page file: provenance comment, blank line, Markdown body
pub fn page_document(source_url: &str, markdown: &str) -> String {
    format!("{}{}{}\n\n{}", SOURCE_PREFIX, source_url, SOURCE_SUFFIX, markdown)
}

/// Splits a page file back into its source URL and body
///
/// Returns `None` for the URL when the first line is not a provenance comment;
/// the whole text is then the body.
pub fn split_page_document(content: &str) -> (Option<&str>, &str) {
    let (first_line, rest) = content.split_once('\n').unwrap_or((content, ""));

    match first_line
        .trim_end()
        .strip_prefix(SOURCE_PREFIX)
        .and_then(|s| s.strip_suffix(SOURCE_SUFFIX))
    {
        Some(url) => (Some(url.trim()), rest.trim_start_matches(['\n', '\r'])),
        None => (None, content),
    }
}

/// Writes one page under the site directory, creating parent directories
///
/// An existing file at the same path is overwritten.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute or root-relative path of the written file
/// * `Err(OutputError)` - Directory creation or write failed
pub fn write_page(
    pages_dir: &Path,
    path: &OutputPath,
    source_url: &str,
    markdown: &str,
) -> OutputResult<PathBuf> {
    let target = pages_dir.join(path.to_path_buf());
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&target, page_document(source_url, markdown))?;
    Ok(target)
}
