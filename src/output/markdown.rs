//! Markdown serialization of extracted page fragments
//!
//! Hyperlinks are unwrapped before conversion: anchor text stays, targets are
//! dropped. Runs of blank lines are collapsed to a single blank line.

use htmd::{Element, HtmlToMarkdown};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

#[allow(clippy::expect_used)]
static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("blank line regex is valid"));

/// Converts an extracted HTML fragment into Markdown
///
/// # Arguments
///
/// * `fragment` - Markup returned by the content extractor
///
/// # Returns
///
/// Trimmed Markdown with ATX headings, no link targets and no more than one
/// consecutive blank line. An empty fragment yields an empty string.
pub fn fragment_to_markdown(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    let markdown = match unlinking_converter().convert(fragment) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed, keeping plain text: {}", e);
            Html::parse_fragment(fragment)
                .root_element()
                .text()
                .collect::<String>()
        }
    };

    collapse_blank_lines(&markdown)
}

/// Collapses three or more consecutive line breaks (blank lines may carry
/// spaces or tabs) into exactly one blank line, then trims
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUNS
        .replace_all(text, "\n\n")
        .trim()
        .to_string()
}

/// Converter that renders `<a>` as its converted content alone
fn unlinking_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .add_handler(vec!["a"], |element: Element| Some(element.content.to_string()))
        .build()
}
