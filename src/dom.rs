//! Small helpers over `scraper` that give the extractors the lookups they need:
//! tag filtering over direct children or descendants, exact class matching,
//! whitespace-normalized text, line-preserving text and URL resolution.

use scraper::{ElementRef, Node, Selector};
use url::Url;

use crate::error::ScrapeError;

/// Elements whose boundaries start a new line in `text_with_line_breaks`
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "ol", "p",
    "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Parse a selector that is known at compile time.
///
/// Panics on an invalid selector, which is a programming error.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// First descendant of `root` matching `css`
pub fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    root.select(&selector(css)).next()
}

/// Text of every descendant text node, trimmed, joined by single spaces
pub fn normalized_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text with `<br>` and block boundaries kept as newlines.
///
/// Each line is whitespace-normalized and empty lines are dropped.
pub fn text_with_line_breaks(element: ElementRef) -> String {
    let mut raw = String::new();
    collect_lines(element, &mut raw);
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_lines(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_lines(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Direct element children whose tag name is in `tags`
pub fn direct_children<'a>(element: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| tags.contains(&child.value().name()))
        .collect()
}

/// All descendant elements (document order) whose tag name is in `tags`
pub fn descendants<'a>(element: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|child| tags.contains(&child.value().name()))
        .collect()
}

/// Whether the element's whole class attribute equals `classes`,
/// ignoring differences in whitespace.
pub fn has_exact_class(element: ElementRef, classes: &str) -> bool {
    element
        .value()
        .attr("class")
        .map(|value| value.split_whitespace().eq(classes.split_whitespace()))
        .unwrap_or(false)
}

/// Resolve `href` against `base` the way a browser would
pub fn resolve_url(base: &str, href: &str) -> Result<String, ScrapeError> {
    let base = Url::parse(base)?;
    Ok(base.join(href.trim())?.to_string())
}
