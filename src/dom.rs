//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by every stage: parsing page
//! snapshots, reading attributes, rendering element text, and converting
//! between live nodes and the `NodePath` handles the host resolves for clicks.

pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

use crate::patterns::{BLANK_LINE_RUN, INLINE_SPACE_RUN};

/// Elements whose boundaries start and end a paragraph in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "ul",
];

/// Elements that start a new line without a blank line before them.
const LINE_TAGS: &[&str] = &["li", "tr", "option"];

/// Table cells, separated by a space within their row.
const CELL_TAGS: &[&str] = &["td", "th"];

/// Elements whose text never belongs to a document.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Parse the outer HTML of a single element and return the document holding it.
///
/// Use [`fragment_root`] to get the element back out of the returned document.
#[inline]
#[must_use]
pub fn parse_fragment(outer_html: &str) -> Document {
    Document::from(outer_html)
}

/// The element a fragment document was parsed from.
///
/// The parser wraps fragments in `html`/`body`; this returns the first
/// element inside `body`, or `body` itself when the fragment had no element.
#[must_use]
pub fn fragment_root(doc: &Document) -> Selection<'_> {
    let first = doc.select("body > *").first();
    if first.exists() {
        first
    } else {
        doc.select("body")
    }
}

// === Attribute Operations ===

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check if an attribute exists.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Get the tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Get the outer HTML of the first node of the selection.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Text Content ===

/// Text content with inline whitespace collapsed and ends trimmed.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    collapse_inline(&sel.text())
}

/// First non-empty text node that is a direct child of the selection.
#[must_use]
pub fn direct_text(sel: &Selection) -> Option<String> {
    let node = sel.nodes().first()?;
    node.children()
        .into_iter()
        .filter(NodeRef::is_text)
        .map(|child| collapse_inline(&child.text()))
        .find(|text| !text.is_empty())
}

/// Render the selection's text with block structure preserved.
///
/// Block boundaries become blank lines, list items, table rows and `br`
/// become line breaks, table cells are space-separated, script and style text is dropped, and whitespace is normalized.
#[must_use]
pub fn render_text(sel: &Selection) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };

    let mut raw = String::new();
    if node.is_text() {
        raw.push_str(&node.text());
    } else {
        push_rendered_children(node, &mut raw);
    }
    normalize_text(&raw)
}

fn push_rendered_children(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
            continue;
        }
        if !child.is_element() {
            continue;
        }

        let tag = child.node_name().map(|t| t.to_ascii_lowercase()).unwrap_or_default();
        let tag = tag.as_str();
        if SKIPPED_TAGS.contains(&tag) {
            continue;
        }
        if tag == "br" {
            out.push('\n');
            continue;
        }

        if BLOCK_TAGS.contains(&tag) {
            out.push_str("\n\n");
            push_rendered_children(&child, out);
            out.push_str("\n\n");
        } else if LINE_TAGS.contains(&tag) {
            out.push('\n');
            push_rendered_children(&child, out);
        } else if CELL_TAGS.contains(&tag) {
            out.push(' ');
            push_rendered_children(&child, out);
            out.push(' ');
        } else {
            push_rendered_children(&child, out);
        }
    }
}

/// Collapse inline whitespace on every line, trim lines, and keep at most one
/// blank line between paragraphs.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .map(|line| INLINE_SPACE_RUN.replace_all(line, " ").trim().to_string())
        .collect();
    BLANK_LINE_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn collapse_inline(text: &str) -> String {
    crate::patterns::WHITESPACE_RUN
        .replace_all(text, " ")
        .trim()
        .to_string()
}

// === Node Paths ===

/// Element-child indices leading from the document root to the selection's
/// first node.
///
/// Text and comment siblings are not counted, so the path survives
/// whitespace changes between snapshots of the same markup.
#[must_use]
pub fn node_path(sel: &Selection) -> Vec<usize> {
    let Some(node) = sel.nodes().first().copied() else {
        return Vec::new();
    };

    let mut path = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if !n.is_element() {
            break;
        }
        let mut index = 0;
        let mut sibling = n.prev_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                index += 1;
            }
            sibling = s.prev_sibling();
        }
        path.push(index);
        current = n.parent();
    }

    path.reverse();
    path
}

/// Find the element a [`node_path`] points to in `doc`.
#[must_use]
pub fn resolve_path<'a>(doc: &'a Document, path: &[usize]) -> Option<Selection<'a>> {
    if path.is_empty() {
        return None;
    }
    let mut node = doc.root();
    for &index in path {
        node = node
            .children()
            .into_iter()
            .filter(NodeRef::is_element)
            .nth(index)?;
    }
    Some(Selection::from(node))
}
