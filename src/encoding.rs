//! Character encoding detection and transcoding for raw markup bytes.
//!
//! The charset is taken from the markup itself: an XML declaration's
//! `encoding`, an HTML `<meta charset>` or a `Content-Type` meta tag.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use crate::patterns::XML_ENCODING;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Bytes inspected when looking for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Detects the character encoding declared in the first kilobyte of markup.
///
/// Checked in order:
/// 1. `<?xml ... encoding="..."?>`
/// 2. `<meta charset="...">`
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`
///
/// Unknown labels are skipped. Defaults to UTF-8.
#[must_use]
pub fn detect_encoding(markup: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&markup[..markup.len().min(SNIFF_LEN)]);

    [&*XML_ENCODING, &*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE]
        .into_iter()
        .filter_map(|re| re.captures(&head)?.get(1))
        .find_map(|label| Encoding::for_label(label.as_str().trim().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decodes markup bytes to UTF-8 using the declared encoding.
///
/// Invalid sequences become U+FFFD rather than failing.
///
/// # Examples
///
/// ```
/// use rs_dom_chain::encoding::transcode_to_utf8;
///
/// let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><name>Jos\xE9</name>";
/// assert!(transcode_to_utf8(xml).contains("José"));
/// ```
#[must_use]
pub fn transcode_to_utf8(markup: &[u8]) -> String {
    let encoding = detect_encoding(markup);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(markup).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(markup);
    decoded.into_owned()
}
