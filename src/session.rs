//! Export sessions: page watching and the export run.
//!
//! A [`Session`] owns one page and the collaborators an export needs. It
//! offers the export trigger whenever detection says the page is exportable,
//! and runs at most one export at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! use kb_exporter::{FileDownloader, LogNotifier, Options, Session, StaticPage, ZipArchiver};
//!
//! # async fn run() -> kb_exporter::Result<()> {
//! let page = StaticPage::new("https://app.test/project/1", "<ul>...</ul>");
//! let options = Options::default();
//! let session = Session::new(
//!     page,
//!     ZipArchiver::from_options(&options),
//!     FileDownloader::new("out"),
//!     LogNotifier,
//!     options,
//! );
//! let report = session.trigger_export().await?;
//! println!("{} documents", report.artifacts.len());
//! # Ok(())
//! # }
//! ```

use std::cell::Cell;
use std::fmt;

use chrono::Utc;
use dom_query::Document;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::archive::Archiver;
use crate::detect;
use crate::download::{bundle_file_name, Downloader};
use crate::extractor::extract_documents;
use crate::locator::{locate, Located};
use crate::markdown::Transformer;
use crate::page::Page;
use crate::result::ExportReport;
use crate::{Error, Options, Result};

/// Progress of an export run, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The locator found `count` document elements.
    Located {
        /// Number of located elements.
        count: usize,
    },

    /// Document `current` of `total` is being extracted (1-based).
    Progress {
        /// Index of the document being processed.
        current: usize,
        /// Number of located documents.
        total: usize,
    },

    /// The bundle was handed to the downloader.
    Complete {
        /// Number of artifacts in the bundle.
        exported: usize,
        /// Number of elements dropped during extraction.
        skipped: usize,
    },

    /// The run failed; carries the error message.
    Failed(String),
}

impl Status {
    /// Whether this status ends a run.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Located { count } => write!(f, "Found {count} documents. Processing..."),
            Self::Progress { current, total } => {
                write!(f, "Processing document {current} of {total}...")
            }
            Self::Complete { exported, skipped: 0 } => {
                write!(f, "Export complete! {exported} documents exported.")
            }
            Self::Complete { exported, skipped } => write!(
                f,
                "Export complete! {exported} documents exported, {skipped} skipped."
            ),
            Self::Failed(message) => write!(f, "Export failed: {message}"),
        }
    }
}

/// Receives status updates and trigger availability.
pub trait Notifier {
    /// Report run progress or its outcome.
    fn notify(&self, status: &Status);

    /// Show or hide the export trigger after a detection run.
    fn trigger_available(&self, available: bool) {
        let _ = available;
    }
}

/// Notifier that writes everything to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, status: &Status) {
        match status {
            Status::Failed(_) => error!("{status}"),
            Status::Progress { .. } => debug!("{status}"),
            _ => info!("{status}"),
        }
    }

    fn trigger_available(&self, available: bool) {
        debug!(available, "export trigger availability");
    }
}

/// Clears the in-flight flag when a run ends, however it ends.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

enum Quiet {
    Settled,
    Closed,
    Stopped,
}

/// One page plus everything needed to export it.
///
/// Sessions are single-threaded: state lives in `Cell`s and the futures they
/// return are not `Send`. Drive them on a current-thread runtime or a
/// `LocalSet`.
pub struct Session<P, A, D, N> {
    page: P,
    archiver: A,
    downloader: D,
    notifier: N,
    options: Options,
    in_flight: Cell<bool>,
    watching: Cell<bool>,
    stop: Notify,
}

impl<P, A, D, N> Session<P, A, D, N>
where
    P: Page,
    A: Archiver,
    D: Downloader,
    N: Notifier,
{
    /// Session over `page`, not yet watching.
    pub fn new(page: P, archiver: A, downloader: D, notifier: N, options: Options) -> Self {
        Self {
            page,
            archiver,
            downloader,
            notifier,
            options,
            in_flight: Cell::new(false),
            watching: Cell::new(false),
            stop: Notify::new(),
        }
    }

    /// The watched page.
    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    /// The notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Options used by every run.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// `true` while an export runs.
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.in_flight.get()
    }

    /// `true` between `start_watching` and `stop_watching`.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watching.get()
    }

    /// Run detection now and tell the notifier whether to offer the trigger.
    pub fn check_page(&self) -> bool {
        let available = detect::is_exportable(&self.page);
        debug!(available, url = %self.page.url(), "page detection");
        self.notifier.trigger_available(available);
        available
    }

    /// Start watching: detection runs once immediately and again after page
    /// changes delivered to [`Session::watch`].
    pub fn start_watching(&self) -> bool {
        self.watching.set(true);
        self.check_page()
    }

    /// Stop watching; a running [`Session::watch`] loop returns.
    pub fn stop_watching(&self) {
        self.watching.set(false);
        self.stop.notify_waiters();
    }

    /// Consume page-change notifications until watching stops or the sender
    /// side is dropped.
    ///
    /// Each burst of notifications triggers one detection run, once no new
    /// notification arrived for `Options::detect_debounce_ms`. Returns
    /// immediately when the session is not watching.
    pub async fn watch(&self, mut changes: UnboundedReceiver<()>) {
        while self.watching.get() {
            tokio::select! {
                () = self.stop.notified() => break,
                change = changes.recv() => {
                    if change.is_none() {
                        break;
                    }
                    match self.quiet(&mut changes).await {
                        Quiet::Settled => {
                            self.check_page();
                        }
                        Quiet::Closed => {
                            self.check_page();
                            break;
                        }
                        Quiet::Stopped => break,
                    }
                }
            }
        }
        debug!("page watch ended");
    }

    async fn quiet(&self, changes: &mut UnboundedReceiver<()>) -> Quiet {
        let debounce = self.options.detect_debounce();
        loop {
            tokio::select! {
                () = self.stop.notified() => return Quiet::Stopped,
                waited = timeout(debounce, changes.recv()) => match waited {
                    Ok(Some(())) => {}
                    Ok(None) => return Quiet::Closed,
                    Err(_) => return Quiet::Settled,
                },
            }
        }
    }

    /// Run one export.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExportInProgress` without touching the page when a run
    /// is already active. Otherwise returns the fatal error that ended the
    /// run, after reporting it through the notifier.
    pub async fn trigger_export(&self) -> Result<ExportReport> {
        if self.in_flight.replace(true) {
            warn!("export already in progress, ignoring trigger");
            return Err(Error::ExportInProgress);
        }
        let _guard = InFlight(&self.in_flight);

        match self.export().await {
            Ok(report) => {
                self.notifier.notify(&Status::Complete {
                    exported: report.artifacts.len(),
                    skipped: report.skipped.len(),
                });
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, "export failed");
                self.notifier.notify(&Status::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Snapshot the page and locate its documents. `None` when the page
    /// cannot be read or shows no documents.
    fn locate(&self) -> Option<(Document, Located)> {
        let doc = match self.page.snapshot() {
            Ok(doc) => doc,
            Err(err) => {
                warn!(error = %err, "could not read the page");
                return None;
            }
        };
        let located = locate(&doc, &self.options);
        (!located.is_empty()).then_some((doc, located))
    }

    async fn export(&self) -> Result<ExportReport> {
        info!(url = %self.page.url(), "starting export");

        let Some((snapshot, located)) = self.locate() else {
            return Err(Error::NoDocuments);
        };
        let total = located.elements.len();
        self.notifier.notify(&Status::Located { count: total });

        let extraction = extract_documents(
            &self.page,
            &snapshot,
            &located.elements,
            &self.options,
            |current, of| {
                self.notifier.notify(&Status::Progress { current, total: of });
            },
        )
        .await;
        if extraction.records.is_empty() {
            return Err(Error::NoValidDocuments);
        }
        info!(
            extracted = extraction.records.len(),
            skipped = extraction.skipped.len(),
            "extraction finished"
        );

        let exported_at = Utc::now();
        let artifacts =
            Transformer::new(&self.options, exported_at).convert_all(&extraction.records);
        let label = self.options.archive_label.as_str();
        let bundle = self.archiver.bundle(&artifacts, Some(label))?;
        let bundle_name = bundle_file_name(label, &exported_at);
        let destination = self.downloader.download(&bundle, &bundle_name).await?;

        Ok(ExportReport {
            located: total,
            artifacts: artifacts.into_iter().map(|a| a.name).collect(),
            skipped: extraction.skipped,
            bundle_name,
            bundle_bytes: bundle.len(),
            destination: Some(destination),
        })
    }
}

impl<P, A, D, N> fmt::Debug for Session<P, A, D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("in_flight", &self.in_flight.get())
            .field("watching", &self.watching.get())
            .finish_non_exhaustive()
    }
}
