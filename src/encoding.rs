//! Character encoding detection for saved pages.
//!
//! Pages saved from a browser keep their original charset. The byte-order
//! mark wins when present, then the first `<meta charset>` declaration in the
//! first 1024 bytes; anything else is read as UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::META_CHARSET;

/// Number of leading bytes searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Detect the character encoding of HTML bytes.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|caps| Encoding::for_label(caps[1].as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD instead of failing.
///
/// # Examples
///
/// ```
/// use kb_exporter::encoding::transcode_to_utf8;
///
/// let html = b"<html><head><meta charset=\"windows-1252\"></head><body>Caf\xE9</body></html>";
/// assert!(transcode_to_utf8(html).contains("Café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let (decoded, _encoding_used, _had_errors) = detect_encoding(html).decode(html);
    decoded.into_owned()
}
