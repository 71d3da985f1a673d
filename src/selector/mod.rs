//! Finding elements.
//!
//! Two ways of finding elements: CSS selectors parsed at run time (which may
//! be invalid and therefore return `Result`), and rules, plain predicate
//! functions evaluated over every descendant in document order.

use dom_query::{Document, Matcher, Selection};

use crate::{Error, Result};

pub mod heuristic;
pub mod tree;
pub mod utils;

/// A selector rule that tests if a selection matches certain criteria.
pub type Rule = fn(&Selection) -> bool;

/// The whole document as a selection, including the `html` element.
#[must_use]
pub fn document_root(doc: &Document) -> Selection<'_> {
    Selection::from(doc.root())
}

/// Select every descendant of `root` matching a CSS selector.
///
/// # Errors
///
/// Returns `Error::SelectorError` when `css` does not parse.
pub fn select_all<'a>(root: &Selection<'a>, css: &str) -> Result<Selection<'a>> {
    let matcher = Matcher::new(css).map_err(|_| Error::SelectorError(css.to_string()))?;
    Ok(root.select_matcher(&matcher))
}

/// First descendant of `root` matching a CSS selector, if any.
///
/// # Errors
///
/// Returns `Error::SelectorError` when `css` does not parse.
pub fn select_first<'a>(root: &Selection<'a>, css: &str) -> Result<Option<Selection<'a>>> {
    let first = select_all(root, css)?.first();
    Ok(first.exists().then_some(first))
}

/// Each node of a selection as its own single-node selection, in document order.
#[must_use]
pub fn split<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

/// Every descendant of `root` the rule accepts, in document order.
///
/// # Example
///
/// ```rust
/// use kb_exporter::dom;
/// use kb_exporter::selector::{self, tree};
///
/// let doc = dom::parse(r#"<div class="document-row">A</div><div class="row">B</div>"#);
/// let rows = selector::query_all(&selector::document_root(&doc), tree::is_document_div);
/// assert_eq!(rows.len(), 1);
/// ```
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| rule(sel))
        .collect()
}
