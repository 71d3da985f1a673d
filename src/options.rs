//! Configuration options for an export run.
//!
//! The `Options` struct controls every strategy list, the settle windows and
//! the naming of the produced artifacts and bundle. Selector lists are tried
//! in the order they appear.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do when two documents sanitize to the same filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep both artifacts under the same name; the archive keeps the last one.
    #[default]
    Overwrite,
    /// Rename later duplicates to `<stem>_2.md`, `<stem>_3.md`, ...
    Suffix,
}

/// Configuration options for an export run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the standard settings; unknown or missing fields in a JSON options
/// file fall back to the defaults.
///
/// # Example
///
/// ```rust
/// use kb_exporter::{CollisionPolicy, Options};
///
/// let options = Options {
///     settle_window_ms: 250,
///     collision_policy: CollisionPolicy::Suffix,
///     ..Options::default()
/// };
/// assert_eq!(options.settle_window().as_millis(), 250);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// CSS selectors for document elements, tried before the tree-pattern
    /// and heuristic strategies.
    pub document_selectors: Vec<String>,

    /// Run the tree-pattern and heuristic strategies when no selector matches.
    ///
    /// Default: `true`
    pub use_fallback_strategies: bool,

    /// CSS selectors looked up inside a document element for its title.
    pub title_selectors: Vec<String>,

    /// Maximum length (chars) of a title taken from the element's own text.
    ///
    /// Default: `50`
    pub title_max_chars: usize,

    /// Click each document element and sample the page after the settle window.
    ///
    /// When disabled the content is the element's own text.
    ///
    /// Default: `true`
    pub open_documents: bool,

    /// Time to wait after opening a document before sampling the page.
    ///
    /// Default: `1500`
    pub settle_window_ms: u64,

    /// Selectors for the document body after a navigation.
    pub content_selectors: Vec<String>,

    /// Selectors for a modal or overlay showing the document.
    pub modal_selectors: Vec<String>,

    /// Content used when nothing could be extracted for a document.
    ///
    /// Default: `"No content available"`
    pub empty_content_text: String,

    /// Click a back control after sampling a document.
    ///
    /// Default: `true`
    pub return_to_list: bool,

    /// Selectors for the back control.
    pub back_selectors: Vec<String>,

    /// Time to wait after clicking the back control.
    ///
    /// Default: `500`
    pub back_settle_ms: u64,

    /// Provenance tag written as `project:` into every frontmatter block.
    ///
    /// Default: `Some("Knowledge Base")`
    pub provenance: Option<String>,

    /// Maximum length (chars) of a sanitized filename stem.
    ///
    /// Default: `100`
    pub max_filename_chars: usize,

    /// Handling of duplicate sanitized filenames.
    ///
    /// Default: `CollisionPolicy::Overwrite`
    pub collision_policy: CollisionPolicy,

    /// Label used in the index heading and the bundle filename.
    ///
    /// Default: `"knowledge-base"`
    pub archive_label: String,

    /// Folder inside the archive holding every artifact.
    ///
    /// Default: `"knowledge-base"`
    pub archive_folder: String,

    /// Write a `00-index.md` manifest linking every document.
    ///
    /// Default: `true`
    pub include_index: bool,

    /// Quiet period after the last page mutation before detection re-runs.
    ///
    /// Default: `1000`
    pub detect_debounce_ms: u64,
}

impl Options {
    /// Settle window after opening a document.
    #[must_use]
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Settle window after clicking the back control.
    #[must_use]
    pub fn back_settle(&self) -> Duration {
        Duration::from_millis(self.back_settle_ms)
    }

    /// Debounce delay for page detection.
    #[must_use]
    pub fn detect_debounce(&self) -> Duration {
        Duration::from_millis(self.detect_debounce_ms)
    }

    /// Parse options from a JSON document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when the JSON is malformed.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::ConfigError(e.to_string()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            document_selectors: strings(&[
                r#"[data-testid="project-document-item"]"#,
                r#"[data-testid="document-list-item"]"#,
                r#"[role="list"] [role="listitem"]"#,
                "[data-document-id]",
                r#"[data-item-type="document"]"#,
                ".document-item",
                ".document-list-item",
            ]),
            use_fallback_strategies: true,
            title_selectors: strings(&[
                r#"[data-testid="document-title"]"#,
                r#"[data-testid="title"]"#,
                r#"[role="heading"]"#,
                "h1",
                "h2",
                "h3",
                ".title",
                "span.font-bold",
                r#"div[style*="font-weight: bold"]"#,
            ]),
            title_max_chars: 50,
            open_documents: true,
            settle_window_ms: 1500,
            content_selectors: strings(&[
                r#"[data-testid="document-content"]"#,
                r#"[role="article"]"#,
                "main",
                "article",
                ".document-content",
            ]),
            modal_selectors: strings(&[
                r#"div[role="dialog"]"#,
                ".modal",
                ".popup",
                r#"[data-testid="document-modal"]"#,
            ]),
            empty_content_text: "No content available".to_string(),
            return_to_list: true,
            back_selectors: strings(&[".back-button", r#"[data-testid="back-button"]"#]),
            back_settle_ms: 500,
            provenance: Some("Knowledge Base".to_string()),
            max_filename_chars: 100,
            collision_policy: CollisionPolicy::Overwrite,
            archive_label: "knowledge-base".to_string(),
            archive_folder: "knowledge-base".to_string(),
            include_index: true,
            detect_debounce_ms: 1000,
        }
    }
}
