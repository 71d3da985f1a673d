//! Locating document elements on a page.
//!
//! Strategies run in three tiers: the configured CSS selectors, the
//! tree-pattern rules, then the shape heuristics. The first strategy that
//! finds at least one element decides the whole result.

use dom_query::{Document, Selection};
use tracing::{debug, info, warn};

use crate::page::PageElement;
use crate::selector::{self, heuristic, tree};
use crate::strategy::StrategyList;
use crate::{Options, Result};

/// Outcome of locating documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    /// Name of the strategy that produced the elements, if any did.
    pub strategy: Option<String>,

    /// The located elements in document order.
    pub elements: Vec<PageElement>,
}

impl Located {
    /// `true` when no strategy found anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn capture_all(found: &[Selection]) -> Vec<PageElement> {
    found
        .iter()
        .enumerate()
        .map(|(position, sel)| PageElement::capture(position, sel))
        .collect()
}

/// Build the locator strategy list for `options`.
#[must_use]
pub fn strategies(options: &Options) -> StrategyList<'_, Document, Vec<PageElement>> {
    let mut list = StrategyList::new("locate documents");

    for css in &options.document_selectors {
        list.push(css.as_str(), move |doc: &Document| {
            let found = selector::select_all(&selector::document_root(doc), css)?;
            Ok(capture_all(&selector::split(&found)))
        });
    }

    if !options.use_fallback_strategies {
        return list;
    }

    for &(name, rule) in tree::DOCUMENT_PATTERNS {
        list.push(name, move |doc: &Document| {
            Ok(capture_all(&selector::query_all(&selector::document_root(doc), rule)))
        });
    }

    type Finder = for<'a> fn(&Selection<'a>) -> Result<Vec<Selection<'a>>>;
    const HEURISTICS: &[(&str, Finder)] = &[
        ("short clickable blocks", heuristic::short_clickable_blocks),
        ("list container entries", heuristic::list_container_entries),
        ("repeated structures in main", heuristic::repeated_structures),
    ];
    for &(name, finder) in HEURISTICS {
        list.push(name, move |doc: &Document| {
            Ok(capture_all(&finder(&selector::document_root(doc))?))
        });
    }

    list
}

/// Locate the document elements of a page snapshot.
///
/// Never fails: strategies that error are skipped, and an empty result means
/// no strategy matched.
#[must_use]
pub fn locate(doc: &Document, options: &Options) -> Located {
    let list = strategies(options);
    debug!(strategies = list.len(), "locating documents");

    match list.first_success(doc) {
        Some(hit) => {
            info!(count = hit.value.len(), strategy = hit.strategy, "found documents");
            Located {
                strategy: Some(hit.strategy.to_string()),
                elements: hit.value,
            }
        }
        None => {
            warn!("no document elements found with any strategy");
            Located::default()
        }
    }
}
