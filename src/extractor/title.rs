//! Title extraction for one document element.

use chrono::{SecondsFormat, Utc};
use dom_query::{Document, Selection};
use tracing::debug;

use crate::page::PageElement;
use crate::selector;
use crate::strategy::StrategyList;
use crate::{dom, Options};

/// Marker appended to titles cut at `title_max_chars`.
const ELLIPSIS: &str = "...";

/// Cap `text` at `max_chars` chars, ending cut titles with `...`.
#[must_use]
pub fn cap_title(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    if keep == 0 {
        return text.chars().take(max_chars).collect();
    }
    let mut capped: String = text.chars().take(keep).collect();
    capped.truncate(capped.trim_end().len());
    capped.push_str(ELLIPSIS);
    capped
}

/// Title used when the element has no text at all.
#[must_use]
pub fn placeholder_title() -> String {
    format!("Document {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Title strategies for a located node, in priority order.
#[must_use]
pub fn strategies<'d>(options: &Options) -> StrategyList<'_, Selection<'d>, String> {
    let mut list = StrategyList::new("document title");

    for css in &options.title_selectors {
        list.push(css.as_str(), move |node: &Selection<'d>| {
            Ok(selector::select_first(node, css)?
                .map(|found| dom::trimmed_text(&found))
                .unwrap_or_default())
        });
    }

    let max = options.title_max_chars;
    list.push("own text node", move |node: &Selection<'d>| {
        Ok(dom::direct_text(node)
            .map(|text| cap_title(&text, max))
            .unwrap_or_default())
    });
    list.push("own text", move |node: &Selection<'d>| {
        Ok(cap_title(&dom::trimmed_text(node), max))
    });

    list
}

/// Title of a node. Always returns a non-empty title.
#[must_use]
pub fn title_of(node: &Selection, options: &Options) -> String {
    strategies(options)
        .first_success(node)
        .map_or_else(placeholder_title, |hit| hit.value)
}

/// Title of a located element, read from the snapshot it was located in.
///
/// Falls back to the element's captured markup when its path no longer
/// resolves in `snapshot`.
#[must_use]
pub fn extract_title(snapshot: &Document, element: &PageElement, options: &Options) -> String {
    if let Some(node) = dom::resolve_path(snapshot, &element.path) {
        return title_of(&node, options);
    }
    debug!(position = element.position, "element not in snapshot, reading its markup");
    let fragment = element.fragment();
    title_of(&dom::fragment_root(&fragment), options)
}
