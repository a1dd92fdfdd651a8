//! Character-level cleanup of extracted text.
//!
//! The byte scanner drops control characters and malformed or unwanted
//! UTF-8 sequences, then every character outside the letter, number,
//! punctuation, symbol and mark categories becomes a space.

use std::borrow::Cow;

use crate::patterns::NON_PRINTABLE;

/// Cleans a piece of text: non-printables removed, spaces collapsed, trimmed.
///
/// With `make_one_line` every line break and tab becomes a space; otherwise
/// CRLF becomes LF and tab/CR become spaces.
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::text::clean_text;
///
/// assert_eq!(clean_text("  a \u{7} b\r\nc ", false), "a b\nc");
/// assert_eq!(clean_text("a\nb", true), "a b");
/// assert_eq!(clean_text("0", false), "0");
/// ```
#[must_use]
pub fn clean_text(text: &str, make_one_line: bool) -> String {
    if text == "0" {
        return "0".to_string();
    }
    if text.is_empty() {
        return String::new();
    }
    remove_multi_space(&remove_non_printables(text), make_one_line, false)
}

/// Removes every character that is not a letter, number, punctuation,
/// symbol or mark, keeping line breaks and tabs.
///
/// Control characters and characters outside the Basic Multilingual Plane
/// are dropped outright; other non-printables (spaces of all kinds,
/// format characters, a CR that is not part of CRLF) become a plain space.
#[must_use]
pub fn remove_non_printables(text: &str) -> String {
    if text.is_empty() || text == "0" {
        return text.to_string();
    }

    let bytes = strip_malformed_sequences(text.as_bytes());
    let filtered = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };

    NON_PRINTABLE
        .replace_all(&filtered, |caps: &regex::Captures| {
            let Some(m) = caps.get(0) else {
                return String::new();
            };
            if m.as_str() == "\r" && filtered[m.end()..].starts_with('\n') {
                "\r".to_string()
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Byte-level variant of [`remove_non_printables`].
///
/// The filter only runs when the input is valid UTF-8. Anything else is
/// returned untouched, malformed sequences included.
#[must_use]
pub fn remove_non_printables_bytes(bytes: &[u8]) -> Cow<'_, [u8]> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Owned(remove_non_printables(text).into_bytes()),
        Err(_) => Cow::Borrowed(bytes),
    }
}

#[inline]
const fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

// TAB, LF and CR are not in this set; 0x1A..0x1F fall through to the
// category filter.
#[inline]
const fn is_control(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x19 | 0x7F)
}

/// Drops control bytes and malformed UTF-8 sequences from raw bytes.
///
/// Removed:
/// - control bytes except TAB, LF and CR
/// - an ASCII byte followed by stray continuation bytes, together with them
/// - `0xC0`/`0xC1` and `0xF0..=0xFF` lead bytes with their continuations
///   (overlong 2-byte forms and everything beyond the 3-byte range)
/// - 2- and 3-byte lead bytes with the wrong number of continuation bytes
/// - overlong 3-byte forms and UTF-16 surrogates encoded as UTF-8
///
/// A continuation byte with nothing before it is left in place.
#[must_use]
pub fn strip_malformed_sequences(bytes: &[u8]) -> Vec<u8> {
    drop_overlong_and_surrogates(&drop_invalid_sequences(bytes))
}

fn drop_invalid_sequences(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        let run = bytes[i + 1..]
            .iter()
            .take_while(|&&b| is_continuation(b))
            .count();

        let dropped = match lead {
            _ if is_control(lead) => 1,
            0x00..=0x7F if run > 0 => 1 + run,
            0xC0 | 0xC1 | 0xF0..=0xFF => 1 + run,
            0xC2..=0xDF if run != 1 => 1 + run,
            0xE0..=0xEF if run != 2 => 1 + run,
            _ => 0,
        };

        if dropped > 0 {
            i += dropped;
        } else {
            out.extend_from_slice(&bytes[i..=i + run]);
            i += 1 + run;
        }
    }

    out
}

fn drop_overlong_and_surrogates(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if let &[lead, second, third, ..] = &bytes[i..] {
            let overlong = lead == 0xE0 && (0x80..=0x9F).contains(&second);
            let surrogate = lead == 0xED && (0xA0..=0xBF).contains(&second);
            if (overlong || surrogate) && is_continuation(third) {
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    out
}

/// Collapses repeated spaces and trims.
///
/// - `make_one_line`: CRLF, LF, CR and tab all become a space.
/// - otherwise CRLF becomes LF, tab and CR become a space.
/// - `space_around_newlines`: every run of newlines (with the spaces
///   touching it) becomes `" \n "`.
#[must_use]
pub fn remove_multi_space(text: &str, make_one_line: bool, space_around_newlines: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut txt = if make_one_line {
        text.replace("\r\n", " ").replace(['\n', '\t', '\r'], " ")
    } else {
        text.replace("\r\n", "\n").replace(['\t', '\r'], " ")
    };

    if space_around_newlines {
        txt = crate::patterns::SPACED_NEWLINES
            .replace_all(&txt, " \n ")
            .into_owned();
    }

    while txt.contains("  ") {
        txt = txt.replace("  ", " ");
    }

    trim_blank(&txt).to_string()
}

/// Trims spaces, tabs, line breaks, NUL and vertical tab.
#[inline]
pub(crate) fn trim_blank(text: &str) -> &str {
    text.trim_matches([' ', '\t', '\n', '\r', '\0', '\x0B'])
}
