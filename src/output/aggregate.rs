//! Aggregate document generation
//!
//! Walks a site's page tree in sorted order and concatenates every page into
//! one Markdown document, each under a heading naming its source URL.

use super::writer::split_page_document;
use super::OutputResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// One page inside the aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSection {
    /// Source URL from the page's provenance comment, or its relative path
    pub source: String,
    pub body: String,
}

/// The combined document for one site
#[derive(Debug, Clone)]
pub struct AggregateDocument {
    pub title: String,
    pub start_url: String,
    pub generated_at: DateTime<Local>,
    pub sections: Vec<AggregateSection>,
}

impl AggregateDocument {
    /// Builds the aggregate from every `.md` file under `pages_dir`
    ///
    /// Files are visited depth-first with entries sorted by name, so the
    /// order is stable across runs. A missing directory yields a document
    /// without sections.
    ///
    /// # Arguments
    ///
    /// * `pages_dir` - The site's page tree
    /// * `title` - Heading for the document
    /// * `start_url` - The crawl's start URL, recorded in the header
    pub fn build(pages_dir: &Path, title: &str, start_url: &str) -> OutputResult<Self> {
        let mut files = Vec::new();
        if pages_dir.is_dir() {
            collect_markdown_files(pages_dir, &mut files)?;
        }

        let mut sections = Vec::with_capacity(files.len());
        for file in files {
            let content = fs::read_to_string(&file)?;
            let (source, body) = split_page_document(&content);

            let source = match source {
                Some(url) => url.to_string(),
                None => file
                    .strip_prefix(pages_dir)
                    .unwrap_or(&file)
                    .to_string_lossy()
                    .replace('\\', "/"),
            };

            sections.push(AggregateSection {
                source,
                body: body.trim().to_string(),
            });
        }

        Ok(Self {
            title: title.to_string(),
            start_url: start_url.to_string(),
            generated_at: Local::now(),
            sections,
        })
    }

    /// Renders the document as Markdown
    pub fn render(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", self.title));
        md.push_str(&format!("- **Start URL**: {}\n", self.start_url));
        md.push_str(&format!(
            "- **Generated**: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        md.push_str(&format!("- **Pages**: {}\n", self.sections.len()));

        for section in &self.sections {
            md.push_str("\n---\n\n");
            md.push_str(&format!("## Source: {}\n\n", section.source));
            if !section.body.is_empty() {
                md.push_str(&section.body);
                md.push('\n');
            }
        }

        md
    }

    /// Renders and writes the document, creating the parent directory
    pub fn write(&self, target: &Path) -> OutputResult<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, self.render())?;
        Ok(())
    }
}

/// Builds and writes the aggregate for one site
///
/// # Returns
///
/// * `Ok(usize)` - Number of pages in the aggregate
/// * `Err(OutputError)` - Reading the tree or writing the target failed
pub fn aggregate_site(
    pages_dir: &Path,
    target: &Path,
    title: &str,
    start_url: &str,
) -> OutputResult<usize> {
    let document = AggregateDocument::build(pages_dir, title, start_url)?;
    document.write(target)?;

    tracing::info!(
        "Aggregated {} pages into {}",
        document.sections.len(),
        target.display()
    );
    Ok(document.sections.len())
}

fn collect_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> OutputResult<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_markdown_files(&path, files)?;
        } else if path.extension().map(|ext| ext == "md").unwrap_or(false) {
            files.push(path);
        }
    }

    Ok(())
}
