use std::fmt;
use std::path::PathBuf;
use url::Url;

const INDEX_FILE: &str = "index.md";

/// Relative, `/`-separated Markdown file path for one page
///
/// Always ends in `.md` and contains only `[A-Za-z0-9_/.-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPath(String);

impl OutputPath {
    fn index() -> Self {
        Self(INDEX_FILE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to a platform path relative to the site directory
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a page URL onto a relative Markdown file path
///
/// # Mapping Rules
///
/// 1. Only the path is used; host, query and fragment are ignored
/// 2. `/` (or an empty path) maps to `index.md`
/// 3. A path ending in `/` is a directory: `/blog/` maps to `blog/index.md`
/// 4. A final segment without a `.` is a directory too: `/blog/post` maps to
///    `blog/post/index.md`, so it never collides with `/blog/`
/// 5. Otherwise the final segment is a file whose extension becomes `.md`:
///    `/docs/page.html` maps to `docs/page.md`
///
/// Each segment is percent-decoded and every character other than ASCII
/// letters, digits, `_` and `-` is replaced by `_`. Empty segments are
/// dropped. The function is total: unparseable input maps to `index.md`.
///
/// # Examples
///
/// ```
/// use site2md::output::map_url_to_path;
///
/// assert_eq!(map_url_to_path("https://site.com/").as_str(), "index.md");
/// assert_eq!(map_url_to_path("https://site.com/about?x=1").as_str(), "about/index.md");
/// assert_eq!(map_url_to_path("https://site.com/a/b.html").as_str(), "a/b.md");
/// ```
pub fn map_url_to_path(url: &str) -> OutputPath {
    match Url::parse(url.trim()) {
        Ok(parsed) => map_path(parsed.path()),
        Err(_) => OutputPath::index(),
    }
}

fn map_path(path: &str) -> OutputPath {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(sanitize_segment)
        .filter(|s| !s.is_empty())
        .collect();

    let Some(last_raw) = path.split('/').filter(|s| !s.is_empty()).last() else {
        return OutputPath::index();
    };

    let is_directory = path.ends_with('/') || !decode(last_raw).contains('.');
    if is_directory {
        return join(&segments, INDEX_FILE);
    }

    let decoded = decode(last_raw);
    let stem = match decoded.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
        _ => decoded,
    };
    let stem = sanitize(&stem);
    let filename = if stem.is_empty() {
        INDEX_FILE.to_string()
    } else {
        format!("{}.md", stem)
    };

    let parents = &segments[..segments.len().saturating_sub(1)];
    join(parents, &filename)
}

fn join(directories: &[String], filename: &str) -> OutputPath {
    if directories.is_empty() {
        return OutputPath(filename.to_string());
    }
    OutputPath(format!("{}/{}", directories.join("/"), filename))
}

/// Percent-decodes a segment; invalid UTF-8 becomes U+FFFD
fn decode(segment: &str) -> String {
    let bytes = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

fn sanitize_segment(segment: &str) -> String {
    sanitize(&decode(segment))
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`
fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
