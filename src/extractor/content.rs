//! Content extraction: open the document, let the page settle, sample it.
//!
//! Opening a document is a click whose effects land asynchronously. The
//! extractor waits a bounded settle window and then samples whatever the page
//! shows: a new page if the location changed, otherwise a modal or overlay,
//! otherwise the element's own text.

use dom_query::Document;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::page::{Page, PageElement};
use crate::selector;
use crate::strategy::StrategyList;
use crate::{dom, Options, Result};

/// Where the content of an opened document is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The click navigated to another location.
    Navigated,
    /// The click kept the location; the document may be shown in place.
    InPlace,
}

/// Whether two page locations differ, comparing normalized URLs when both parse.
#[must_use]
pub fn location_changed(before: &str, after: &str) -> bool {
    match (Url::parse(before), Url::parse(after)) {
        (Ok(a), Ok(b)) => a != b,
        _ => before != after,
    }
}

/// Content strategies for a page snapshot in the given view.
#[must_use]
pub fn strategies(view: View, options: &Options) -> StrategyList<'_, Document, String> {
    let (goal, selectors) = match view {
        View::Navigated => ("document content", &options.content_selectors),
        View::InPlace => ("document modal", &options.modal_selectors),
    };

    let mut list = StrategyList::new(goal);
    for css in selectors {
        list.push(css.as_str(), move |doc: &Document| {
            Ok(selector::select_first(&selector::document_root(doc), css)?
                .map(|found| dom::render_text(&found))
                .unwrap_or_default())
        });
    }
    list
}

/// Sample the document body from a snapshot taken after opening it.
#[must_use]
pub fn sample(doc: &Document, view: View, options: &Options) -> Option<String> {
    strategies(view, options).first_success(doc).map(|hit| hit.value)
}

fn own_text(element: &PageElement, options: &Options) -> String {
    if element.text.is_empty() {
        options.empty_content_text.clone()
    } else {
        element.text.clone()
    }
}

/// Content of a located element.
///
/// # Errors
///
/// Returns `Error::PageError` when the host fails to click the element or to
/// produce a snapshot; the caller drops the item.
pub async fn extract_content<P: Page>(
    page: &P,
    element: &PageElement,
    options: &Options,
) -> Result<String> {
    if !options.open_documents {
        return Ok(own_text(element, options));
    }

    let before = page.url();
    debug!(position = element.position, "opening document");
    page.click(element)?;
    sleep(options.settle_window()).await;

    let view = if location_changed(&before, &page.url()) {
        debug!("navigation detected, reading the new page");
        View::Navigated
    } else {
        View::InPlace
    };
    let sampled = page.snapshot().map(|doc| sample(&doc, view, options));

    // the next element's path only resolves on the list page
    if options.return_to_list {
        return_to_list(page, options).await;
    }

    let content = sampled?.unwrap_or_else(|| {
        debug!(position = element.position, "using the element's own text");
        own_text(element, options)
    });
    Ok(content)
}

/// Click the first back control on the page, if there is one, and let the
/// page settle. Failures are logged; the document was already read.
pub async fn return_to_list<P: Page>(page: &P, options: &Options) {
    let back = match page.snapshot() {
        Ok(doc) => back_control(&doc, options),
        Err(err) => {
            warn!(error = %err, "could not read page to return to the list");
            return;
        }
    };

    let Some(back) = back else {
        return;
    };
    match page.click(&back) {
        Ok(()) => sleep(options.back_settle()).await,
        Err(err) => warn!(error = %err, "back control click failed"),
    }
}

fn back_control(doc: &Document, options: &Options) -> Option<PageElement> {
    let mut list = StrategyList::new("back control");
    for css in &options.back_selectors {
        list.push(css.as_str(), move |doc: &Document| {
            Ok(selector::select_first(&selector::document_root(doc), css)?
                .map(|found| PageElement::capture(0, &found))
                .into_iter()
                .collect::<Vec<_>>())
        });
    }
    list.first_success(doc)
        .and_then(|hit| hit.value.into_iter().next())
}
