//! Compiled regex patterns used by the transformer and text rendering.
//!
//! All patterns are compiled once using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Characters that are not allowed in filenames on common platforms,
/// including ASCII control characters.
pub static ILLEGAL_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/:*?"<>|\x00-\x1f\x7f]"#).expect("ILLEGAL_FILENAME_CHARS regex")
});

/// Any whitespace run.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Two or more consecutive underscores.
pub static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("UNDERSCORE_RUN regex"));

/// Horizontal whitespace (no newlines) runs.
pub static INLINE_SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("INLINE_SPACE_RUN regex"));

/// Three or more newlines, possibly with trailing spaces on the blank lines.
pub static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+\n").expect("BLANK_LINE_RUN regex"));

/// `<meta charset="...">` declaration.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).expect("META_CHARSET regex")
});
