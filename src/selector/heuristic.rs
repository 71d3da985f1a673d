//! Heuristic document finders for pages without recognizable markup.
//!
//! Each finder looks at the shape of the tree rather than at names: short
//! clickable text blocks, list-like containers, and runs of repeated
//! siblings inside `main`.

use dom_query::Selection;

use super::{select_all, split, utils};
use crate::dom;
use crate::Result;

/// Longest trimmed text (chars) a clickable title block may have.
const MAX_SHORT_TEXT_CHARS: usize = 200;

/// A title block with this many nested `div`/`span` elements is a container.
const MAX_NESTED_BLOCKS: usize = 5;

/// `div`s with short, non-empty text, little nesting and a click affordance.
///
/// # Errors
///
/// Propagates selector errors (none with the built-in selectors).
pub fn short_clickable_blocks<'a>(root: &Selection<'a>) -> Result<Vec<Selection<'a>>> {
    let divs = select_all(root, "div")?;
    let mut found = Vec::new();
    for div in split(&divs) {
        let text_chars = dom::trimmed_text(&div).chars().count();
        if text_chars == 0 || text_chars >= MAX_SHORT_TEXT_CHARS {
            continue;
        }
        if select_all(&div, "div, span")?.length() >= MAX_NESTED_BLOCKS {
            continue;
        }
        if utils::is_interactive(&div) {
            found.push(div);
        }
    }
    Ok(found)
}

/// Entries of the first list-like container.
///
/// Containers are `div[role="list"]`, `ul`, `ol` and `div > div > div`, in
/// document order; the first one with at least one direct child that looks
/// like a list entry wins, and its entry children are returned.
///
/// # Errors
///
/// Propagates selector errors (none with the built-in selectors).
pub fn list_container_entries<'a>(root: &Selection<'a>) -> Result<Vec<Selection<'a>>> {
    let containers = select_all(root, r#"div[role="list"], ul, ol, div > div > div"#)?;
    for container in split(&containers) {
        let entries: Vec<Selection<'a>> = split(&container.children())
            .into_iter()
            .filter(utils::is_list_entry)
            .collect();
        if !entries.is_empty() {
            return Ok(entries);
        }
    }
    Ok(Vec::new())
}

/// `div > div > div` elements inside `main` that have more than two siblings
/// (themselves included) with the same tag.
///
/// # Errors
///
/// Propagates selector errors (none with the built-in selectors).
pub fn repeated_structures<'a>(root: &Selection<'a>) -> Result<Vec<Selection<'a>>> {
    let main = select_all(root, "main")?.first();
    if !main.exists() {
        return Ok(Vec::new());
    }

    let candidates = select_all(&main, "div > div > div")?;
    let mut found = Vec::new();
    for div in split(&candidates) {
        let tag = utils::tag(&div);
        let same_tag_siblings = split(&div.parent().children())
            .iter()
            .filter(|sibling| utils::tag(sibling) == tag)
            .count();
        if same_tag_siblings > 2 {
            found.push(div);
        }
    }
    Ok(found)
}
