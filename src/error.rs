//! Error types for kb-exporter.
//!
//! This module defines the error types returned by export operations. Only
//! `NoDocuments`, `NoValidDocuments`, `ArchiveError` and `DownloadError` end a
//! run; selector and page faults are absorbed by the strategy and item
//! boundaries before they reach the caller.

/// Error type for export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A CSS selector inside a strategy could not be parsed.
    #[error("Invalid selector `{0}`")]
    SelectorError(String),

    /// The host page failed to perform an action (click, snapshot).
    #[error("Page interaction failed: {0}")]
    PageError(String),

    /// No document elements were located with any strategy.
    #[error("No documents found to export")]
    NoDocuments,

    /// Documents were located but none could be extracted.
    #[error("No valid documents could be extracted")]
    NoValidDocuments,

    /// The archiver could not produce a bundle.
    #[error("Archive creation failed: {0}")]
    ArchiveError(String),

    /// The downloader could not save the bundle.
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// An export was triggered while another one was still running.
    #[error("An export is already in progress")]
    ExportInProgress,

    /// An options file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A report could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error ends an export run (as opposed to being absorbed by
    /// a strategy or item boundary).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::SelectorError(_) | Self::PageError(_))
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;
