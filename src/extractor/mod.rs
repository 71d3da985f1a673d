//! Document extraction.
//!
//! Turns located elements into [`DocumentRecord`]s one at a time. Opening a
//! document can navigate or mutate the page, so elements are never processed
//! concurrently. A failure in one element drops that element only.

use dom_query::Document;
use tracing::{debug, warn};

use crate::page::{Page, PageElement};
use crate::result::{DocumentRecord, SkippedItem};
use crate::{Options, Result};

/// Content extraction (click, settle, sample).
pub mod content;

/// Title extraction with selector and text fallbacks.
pub mod title;

/// Records extracted from a run, plus the elements that were dropped.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Successfully extracted documents, in element order.
    pub records: Vec<DocumentRecord>,

    /// Elements whose extraction failed.
    pub skipped: Vec<SkippedItem>,
}

/// Extract title and content from one element.
///
/// `snapshot` is the page markup the element was located in; the title is
/// read from it before the element is opened.
///
/// # Errors
///
/// Returns the page error that interrupted content extraction.
pub async fn extract_document<P: Page>(
    page: &P,
    snapshot: &Document,
    element: &PageElement,
    options: &Options,
) -> Result<DocumentRecord> {
    let title = title::extract_title(snapshot, element, options);
    let content = content::extract_content(page, element, options).await?;
    debug!(position = element.position, title = %title, "extracted document");
    Ok(DocumentRecord {
        position: element.position,
        title,
        content,
    })
}

/// Extract every element in order.
///
/// `progress` is called with the 1-based index and the total before each
/// element is processed.
pub async fn extract_documents<P, F>(
    page: &P,
    snapshot: &Document,
    elements: &[PageElement],
    options: &Options,
    mut progress: F,
) -> Extraction
where
    P: Page,
    F: FnMut(usize, usize),
{
    let mut extraction = Extraction::default();
    let total = elements.len();

    for (index, element) in elements.iter().enumerate() {
        progress(index + 1, total);
        match extract_document(page, snapshot, element, options).await {
            Ok(record) => extraction.records.push(record),
            Err(err) => {
                warn!(position = element.position, error = %err, "skipping document");
                extraction.skipped.push(SkippedItem {
                    position: element.position,
                    reason: err.to_string(),
                });
            }
        }
    }

    extraction
}
