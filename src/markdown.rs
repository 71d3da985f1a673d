//! Markdown artifacts: frontmatter rendering and filename sanitizing.
//!
//! Every document becomes one `.md` file:
//!
//! ```text
//! ---
//! title: "<escaped title>"
//! project: "<provenance>"
//! date: "<ISO-8601 timestamp>"
//! ---
//!
//! <content>
//! ```

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::options::CollisionPolicy;
use crate::patterns::{ILLEGAL_FILENAME_CHARS, UNDERSCORE_RUN, WHITESPACE_RUN};
use crate::result::{Artifact, DocumentRecord};
use crate::Options;

/// Extension of every artifact.
pub const EXTENSION: &str = ".md";

/// Frontmatter delimiter line.
pub const DELIMITER: &str = "---";

/// Body used by fallback artifacts when the record had no content.
pub const EMPTY_DOCUMENT: &str = "Empty document";

/// Escape a value for a double-quoted frontmatter field.
///
/// Whitespace runs (including line breaks) become one space, backslashes and
/// double quotes are backslash-escaped.
///
/// # Example
///
/// ```rust
/// use kb_exporter::markdown::escape_quoted;
///
/// assert_eq!(escape_quoted(r#"Budget "2024""#), r#"Budget \"2024\""#);
/// ```
#[must_use]
pub fn escape_quoted(value: &str) -> String {
    WHITESPACE_RUN
        .replace_all(value.trim(), " ")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Sanitize a title into a filename stem (no extension).
///
/// Illegal characters and whitespace become `_`, underscore runs collapse,
/// the stem is cut at `max_chars` chars and stripped of leading and trailing
/// underscores. Applying it to its own output changes nothing.
#[must_use]
pub fn sanitize_stem(title: &str, max_chars: usize) -> String {
    let replaced = ILLEGAL_FILENAME_CHARS.replace_all(title, "_");
    let replaced = WHITESPACE_RUN.replace_all(&replaced, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    let truncated: String = collapsed.chars().take(max_chars).collect();
    truncated
        .trim_matches(|c: char| c == '_' || c.is_whitespace())
        .to_string()
}

/// Filename for a title, or `None` when nothing usable is left after sanitizing.
#[must_use]
pub fn file_name(title: &str, max_chars: usize) -> Option<String> {
    let stem = sanitize_stem(title, max_chars);
    (!stem.is_empty()).then(|| format!("{stem}{EXTENSION}"))
}

/// Render the frontmatter block, including the blank line that ends it.
#[must_use]
pub fn frontmatter(title: &str, provenance: Option<&str>, date: &DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&format!("title: \"{}\"\n", escape_quoted(title)));
    if let Some(provenance) = provenance {
        out.push_str(&format!("project: \"{}\"\n", escape_quoted(provenance)));
    }
    out.push_str(&format!(
        "date: \"{}\"\n",
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out
}

/// Converts records into artifacts for one export run.
///
/// Keeps track of the names handed out so far so that
/// [`CollisionPolicy::Suffix`] can rename duplicates.
#[derive(Debug)]
pub struct Transformer<'o> {
    options: &'o Options,
    exported_at: DateTime<Utc>,
    names: HashSet<String>,
}

impl<'o> Transformer<'o> {
    /// Transformer stamping every artifact with `exported_at`.
    #[must_use]
    pub fn new(options: &'o Options, exported_at: DateTime<Utc>) -> Self {
        Self {
            options,
            exported_at,
            names: HashSet::new(),
        }
    }

    /// Convert one record. Never fails.
    ///
    /// A title that sanitizes to nothing only changes the filename to a
    /// generated one. A record without a title is malformed and becomes a
    /// generated name holding its raw content.
    pub fn to_artifact(&mut self, record: &DocumentRecord) -> Artifact {
        let artifact = if record.title.trim().is_empty() {
            self.passthrough(record)
        } else {
            self.render(record)
        };
        let name = self.claim(artifact.name);
        Artifact { name, ..artifact }
    }

    /// Convert every record, keeping their order.
    pub fn convert_all(&mut self, records: &[DocumentRecord]) -> Vec<Artifact> {
        records.iter().map(|record| self.to_artifact(record)).collect()
    }

    fn render(&self, record: &DocumentRecord) -> Artifact {
        let name = file_name(&record.title, self.options.max_filename_chars).unwrap_or_else(|| {
            let name = self.generated_name(record);
            debug!(position = record.position, name = %name, "title unusable as filename, using generated name");
            name
        });
        let mut content = frontmatter(
            &record.title,
            self.options.provenance.as_deref(),
            &self.exported_at,
        );
        content.push_str(&record.content);
        Artifact { name, content }
    }

    fn passthrough(&self, record: &DocumentRecord) -> Artifact {
        let name = self.generated_name(record);
        warn!(position = record.position, name = %name, "record has no title, writing raw content");
        let content = if record.content.trim().is_empty() {
            EMPTY_DOCUMENT.to_string()
        } else {
            record.content.clone()
        };
        Artifact { name, content }
    }

    fn generated_name(&self, record: &DocumentRecord) -> String {
        format!(
            "document_{}_{}{EXTENSION}",
            self.exported_at.timestamp_millis(),
            record.position + 1
        )
    }

    fn claim(&mut self, name: String) -> String {
        if self.names.insert(name.clone()) {
            return name;
        }

        match self.options.collision_policy {
            CollisionPolicy::Overwrite => {
                warn!(name = %name, "duplicate filename, the archive keeps the last document");
                name
            }
            CollisionPolicy::Suffix => {
                let stem = name.strip_suffix(EXTENSION).unwrap_or(&name);
                let mut n = 2;
                loop {
                    let candidate = format!("{stem}_{n}{EXTENSION}");
                    if self.names.insert(candidate.clone()) {
                        debug!(from = %name, to = %candidate, "renamed duplicate filename");
                        return candidate;
                    }
                    n += 1;
                }
            }
        }
    }
}
