//! Utility functions for selector rules
//!
//! Attribute and tag helpers that return empty strings instead of `Option`,
//! which keeps rule predicates short.

use crate::dom;
use dom_query::Selection;

/// Get the class attribute (empty string if missing).
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::get_attribute(sel, "class").unwrap_or_default()
}

/// Get any attribute (empty string if missing).
#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

/// Get the `role` attribute (empty string if missing).
#[inline]
#[must_use]
pub fn role(sel: &Selection) -> String {
    attr(sel, "role")
}

/// Get the lowercase tag name (empty string if missing).
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Check if the element has a specific tag name.
#[inline]
#[must_use]
pub fn is_tag(sel: &Selection, expected: &str) -> bool {
    tag(sel) == expected
}

/// Whether the element offers a click affordance: an inline `onclick`
/// handler, `role="button"`, or a class mentioning "click".
#[must_use]
pub fn is_interactive(sel: &Selection) -> bool {
    dom::has_attribute(sel, "onclick") || role(sel) == "button" || class(sel).contains("click")
}

/// Whether the element looks like an entry of a list: an `li`, an element
/// with `role="listitem"`, or a class mentioning "item".
#[must_use]
pub fn is_list_entry(sel: &Selection) -> bool {
    is_tag(sel, "li") || role(sel) == "listitem" || class(sel).contains("item")
}
