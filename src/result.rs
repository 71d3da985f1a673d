//! Result types for export output.
//!
//! A run turns located elements into `DocumentRecord`s, records into
//! `Artifact`s, and reports what happened in an `ExportReport`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Title and text of one document, as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Index of the source element in the located sequence.
    pub position: usize,

    /// Document title; never empty when produced by the extractor.
    pub title: String,

    /// Document body as plain text.
    pub content: String,
}

/// A named markdown file destined for the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Sanitized filename including the `.md` extension.
    pub name: String,

    /// Frontmatter followed by the document body.
    pub content: String,
}

/// An element that was located but could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Index of the element in the located sequence.
    pub position: usize,

    /// Display form of the error that dropped the item.
    pub reason: String,
}

/// Summary of a completed export run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportReport {
    /// Number of document elements the locator found.
    pub located: usize,

    /// Artifact names in bundle order.
    pub artifacts: Vec<String>,

    /// Elements dropped during extraction.
    pub skipped: Vec<SkippedItem>,

    /// Suggested filename handed to the downloader.
    pub bundle_name: String,

    /// Size of the bundle in bytes.
    pub bundle_bytes: usize,

    /// Where the downloader saved the bundle.
    pub destination: Option<PathBuf>,
}
