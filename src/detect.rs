//! Deciding whether the current page shows an exportable document list.
//!
//! Detection is cheap and runs again whenever the page changes; it only
//! controls whether the export trigger is offered.

use std::fmt;

use dom_query::Document;
use tracing::debug;

use crate::page::Page;
use crate::selector;
use crate::strategy::StrategyList;
use crate::Result;

/// URL fragments that mark a project or knowledge-base page.
pub const URL_MARKERS: &[&str] = &["/project/", "/kb/", "documents"];

/// Selectors for a rendered document list.
pub const LIST_SELECTORS: &[&str] = &[
    r#"[data-testid="project-document-list"]"#,
    r#"[role="list"] [role="listitem"]"#,
];

/// Lowercase words that mark a matching page title.
pub const TITLE_KEYWORDS: &[&str] = &["knowledge", "document", "project"];

/// What detection looks at: location, title and a snapshot of the markup.
pub struct PageState {
    /// Current location.
    pub url: String,

    /// Current document title.
    pub title: String,

    /// Parsed markup.
    pub doc: Document,
}

impl PageState {
    /// Capture the state of `page`.
    ///
    /// # Errors
    ///
    /// Propagates the page's snapshot error.
    pub fn capture<P: Page + ?Sized>(page: &P) -> Result<Self> {
        Ok(Self {
            url: page.url(),
            title: page.title(),
            doc: page.snapshot()?,
        })
    }
}

impl fmt::Debug for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageState")
            .field("url", &self.url)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Detection strategies, URL first, then list elements, then the title.
#[must_use]
pub fn strategies() -> StrategyList<'static, PageState, bool> {
    let mut list = StrategyList::new("detect exportable page");

    for &marker in URL_MARKERS {
        list.push(format!("url contains {marker}"), move |state: &PageState| {
            Ok(state.url.contains(marker))
        });
    }
    for &css in LIST_SELECTORS {
        list.push(css, move |state: &PageState| {
            Ok(selector::select_first(&selector::document_root(&state.doc), css)?.is_some())
        });
    }
    list.push("title keywords", |state: &PageState| {
        let title = state.title.to_lowercase();
        Ok(TITLE_KEYWORDS.iter().any(|word| title.contains(word)))
    });

    list
}

/// Whether a captured page state looks exportable.
#[must_use]
pub fn is_exportable_state(state: &PageState) -> bool {
    strategies().first_success(state).is_some()
}

/// Whether `page` currently shows an exportable document list.
///
/// A page that cannot be read is reported as not exportable.
#[must_use]
pub fn is_exportable<P: Page + ?Sized>(page: &P) -> bool {
    match PageState::capture(page) {
        Ok(state) => is_exportable_state(&state),
        Err(err) => {
            debug!(error = %err, "page unreadable, not offering export");
            false
        }
    }
}
