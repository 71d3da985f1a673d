//! Handing the finished bundle to the user.

use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::markdown::sanitize_stem;
use crate::{Error, Result};

/// Stem used when the label sanitizes to nothing.
const FALLBACK_LABEL: &str = "export";

/// Suggested bundle filename: `<label>_<timestamp>.zip`, with the `:` of the
/// timestamp replaced by `-`.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use kb_exporter::download::bundle_file_name;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     bundle_file_name("knowledge-base", &at),
///     "knowledge-base_2024-03-09T14-05-07.000Z.zip"
/// );
/// ```
#[must_use]
pub fn bundle_file_name(label: &str, at: &DateTime<Utc>) -> String {
    let mut stem = sanitize_stem(label, 100);
    if stem.is_empty() {
        stem = FALLBACK_LABEL.to_string();
    }
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("{stem}_{timestamp}.zip")
}

/// Delivers a bundle somewhere the user can reach it.
pub trait Downloader {
    /// Save `bundle` under `file_name`, resolving to where it ended up.
    ///
    /// # Errors
    ///
    /// Returns `Error::DownloadError` or `Error::Io` when the bundle cannot be saved.
    fn download(&self, bundle: &[u8], file_name: &str) -> impl Future<Output = Result<PathBuf>>;
}

/// Saves bundles into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    /// Downloader writing into `dir`, created on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl Downloader for FileDownloader {
    async fn download(&self, bundle: &[u8], file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(Error::DownloadError(format!(
                "invalid bundle name: {file_name:?}"
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bundle).await?;
        info!(path = %path.display(), bytes = bundle.len(), "bundle saved");
        Ok(path)
    }
}
