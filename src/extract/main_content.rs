use super::rules::ExtractionRules;
use ego_tree::NodeId;
use scraper::{ElementRef, Html};

/// Extracts the main content region of a rendered page
///
/// # Extraction Order
///
/// 1. Remove every element whose tag is in `strip_tags`
/// 2. Remove every element matching a boilerplate attribute rule
/// 3. Pick the container: the first element matched by the first probe that
///    matches anything
/// 4. Remove elements inside the container matching a cleanup rule
///
/// `<html>` and `<body>` are never removed by attribute rules.
///
/// # Arguments
///
/// * `markup` - Full page markup as rendered
/// * `rules` - Compiled extraction policy
///
/// # Returns
///
/// The container's outer HTML, or an empty string when no probe matched.
///
/// # Example
///
/// ```
/// use site2md::extract::{extract_main, ExtractionRules};
///
/// let page = r#"<nav>menu</nav><article id="content">Hello</article><footer>c</footer>"#;
/// let fragment = extract_main(page, &ExtractionRules::default());
/// assert_eq!(fragment, r#"<article id="content">Hello</article>"#);
/// ```
pub fn extract_main(markup: &str, rules: &ExtractionRules) -> String {
    let mut document = Html::parse_document(markup);

    let stripped = matching_elements(&document, |el| rules.is_stripped_tag(el.value()));
    detach_all(&mut document, stripped);

    let boilerplate = matching_elements(&document, |el| {
        !is_structural(&el) && rules.is_boilerplate(el.value())
    });
    detach_all(&mut document, boilerplate);

    let Some(container) = find_container(&document, rules) else {
        return String::new();
    };

    let cleanup = document
        .tree
        .get(container)
        .map(|node| {
            node.descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .filter(|el| !is_structural(el) && rules.is_cleanup_target(el.value()))
                .map(|el| el.id())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    detach_all(&mut document, cleanup);

    document
        .tree
        .get(container)
        .and_then(ElementRef::wrap)
        .map(|el| el.html())
        .unwrap_or_default()
}

/// Runs the probes in order and returns the first hit
fn find_container(document: &Html, rules: &ExtractionRules) -> Option<NodeId> {
    rules.probes.iter().find_map(|probe| {
        attached_elements(document)
            .find(|el| probe.matches(el.value()))
            .map(|el| el.id())
    })
}

/// Elements still reachable from the document root, in document order
///
/// `Html::select` walks the whole arena, detached nodes included, so every
/// lookup here starts from the root element instead.
fn attached_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn matching_elements<F>(document: &Html, predicate: F) -> Vec<NodeId>
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    attached_elements(document)
        .filter(|el| predicate(el))
        .map(|el| el.id())
        .collect()
}

fn detach_all(document: &mut Html, ids: Vec<NodeId>) {
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn is_structural(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "html" | "body")
}
