//! # kb-exporter
//!
//! Exports the document list of a knowledge-base page as a bundle of
//! markdown files.
//!
//! An export walks four stages: the locator finds the document elements on
//! the page, the extractor opens each one and reads its title and content,
//! the transformer turns every document into a markdown file with
//! frontmatter, and the archiver packs the files into a ZIP that the
//! downloader saves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kb_exporter::{export_page, Options, StaticPage};
//! use std::path::Path;
//!
//! # async fn run() -> kb_exporter::Result<()> {
//! let page = StaticPage::open(Path::new("saved-project.html"), None)?;
//! let report = export_page(page, Options::default(), "out").await?;
//! println!("saved {} documents to {:?}", report.artifacts.len(), report.destination);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Layered location**: configured selectors, then tree patterns, then
//!   shape heuristics; the first tier that finds anything wins
//! - **Fault isolation**: a bad selector or a failed click only drops one
//!   strategy or one document
//! - **Obsidian-friendly output**: quoted frontmatter, sanitized filenames,
//!   an index of wiki links
//! - **Configurable**: every selector list, settle window and naming rule
//!   lives in [`Options`]

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Ordered fallback strategy lists.
pub mod strategy;

/// Selector infrastructure: CSS lookups, tree patterns and heuristics.
pub mod selector;

/// The host page abstraction.
pub mod page;

/// Locating document elements.
pub mod locator;

/// Title and content extraction.
pub mod extractor;

/// Markdown artifacts.
pub mod markdown;

/// ZIP bundling.
pub mod archive;

/// Saving bundles.
pub mod download;

/// Exportable-page detection.
pub mod detect;

/// Watching a page and running exports.
pub mod session;

// Public API - re-exports
pub use archive::{Archiver, ZipArchiver};
pub use download::{Downloader, FileDownloader};
pub use error::{Error, Result};
pub use options::{CollisionPolicy, Options};
pub use page::{Page, PageElement, StaticPage};
pub use result::{Artifact, DocumentRecord, ExportReport, SkippedItem};
pub use session::{LogNotifier, Notifier, Session, Status};

use std::path::PathBuf;

/// Export `page` into `out_dir` with a ZIP archiver and log notifications.
///
/// # Errors
///
/// Returns the fatal error that ended the run: `Error::NoDocuments`,
/// `Error::NoValidDocuments`, `Error::ArchiveError`, `Error::DownloadError`
/// or `Error::Io`.
///
/// # Example
///
/// ```rust
/// use kb_exporter::{export_page, Error, Options, StaticPage};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let page = StaticPage::new("https://app.test/settings", "<p>No list here</p>");
/// let options = Options { use_fallback_strategies: false, ..Options::default() };
/// let err = export_page(page, options, std::env::temp_dir()).await.unwrap_err();
/// assert!(matches!(err, Error::NoDocuments));
/// # }
/// ```
pub async fn export_page<P: Page>(
    page: P,
    options: Options,
    out_dir: impl Into<PathBuf>,
) -> Result<ExportReport> {
    let session = Session::new(
        page,
        ZipArchiver::from_options(&options),
        FileDownloader::new(out_dir),
        LogNotifier,
        options,
    );
    session.trigger_export().await
}
