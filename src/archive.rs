//! Bundling artifacts into a single archive.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::markdown::EXTENSION;
use crate::result::Artifact;
use crate::{Error, Options, Result};

/// Name of the index entry written next to the documents.
pub const INDEX_NAME: &str = "00-index.md";

/// Label used in the index when the caller gives none.
pub const DEFAULT_LABEL: &str = "Knowledge Base";

/// Packs artifacts into one downloadable bundle.
pub trait Archiver {
    /// Bundle `artifacts`, in order. `label` names the source in the index.
    ///
    /// # Errors
    ///
    /// Returns `Error::ArchiveError` when the bundle cannot be written.
    fn bundle(&self, artifacts: &[Artifact], label: Option<&str>) -> Result<Vec<u8>>;
}

/// Drop repeated names, keeping the first position and the last content.
#[must_use]
pub fn dedupe_last_wins(artifacts: &[Artifact]) -> Vec<&Artifact> {
    let mut out: Vec<&Artifact> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match out.iter_mut().find(|kept| kept.name == artifact.name) {
            Some(kept) => *kept = artifact,
            None => out.push(artifact),
        }
    }
    out
}

/// Markdown index linking every artifact with a wiki link.
#[must_use]
pub fn index(label: &str, names: &[&str]) -> String {
    let mut out = format!(
        "# {label} Index\n\nThis vault contains all documents exported from {label}.\n\n## Documents\n\n"
    );
    for name in names {
        let stem = name.strip_suffix(EXTENSION).unwrap_or(name);
        out.push_str(&format!("- [[{stem}]]\n"));
    }
    out
}

/// Writes a deflate-compressed ZIP with every artifact under one folder.
#[derive(Debug, Clone)]
pub struct ZipArchiver {
    folder: String,
    include_index: bool,
}

impl ZipArchiver {
    /// Archiver writing into `folder`, with or without the index entry.
    #[must_use]
    pub fn new(folder: impl Into<String>, include_index: bool) -> Self {
        Self {
            folder: folder.into(),
            include_index,
        }
    }

    /// Archiver configured from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self::new(options.archive_folder.clone(), options.include_index)
    }

    fn entry(&self, name: &str) -> String {
        let folder = self.folder.trim_matches('/');
        if folder.is_empty() {
            name.to_string()
        } else {
            format!("{folder}/{name}")
        }
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

fn zip_error(err: impl std::fmt::Display) -> Error {
    Error::ArchiveError(err.to_string())
}

impl Archiver for ZipArchiver {
    fn bundle(&self, artifacts: &[Artifact], label: Option<&str>) -> Result<Vec<u8>> {
        let unique = dedupe_last_wins(artifacts);
        let file_options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        if self.include_index {
            let names: Vec<&str> = unique.iter().map(|a| a.name.as_str()).collect();
            let label = label.unwrap_or(DEFAULT_LABEL);
            writer
                .start_file(self.entry(INDEX_NAME), file_options)
                .map_err(zip_error)?;
            writer
                .write_all(index(label, &names).as_bytes())
                .map_err(zip_error)?;
        }

        for artifact in &unique {
            writer
                .start_file(self.entry(&artifact.name), file_options)
                .map_err(zip_error)?;
            writer
                .write_all(artifact.content.as_bytes())
                .map_err(zip_error)?;
        }

        let bytes = writer.finish().map_err(zip_error)?.into_inner();
        debug!(
            entries = unique.len(),
            bytes = bytes.len(),
            "bundle written"
        );
        Ok(bytes)
    }
}
