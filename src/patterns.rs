//! Compiled regex patterns shared by document loading and text normalization.
//!
//! All patterns are compiled once at first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Document Loading Patterns
// =============================================================================

/// Matches a leading `<?xml ... ?>` declaration plus trailing whitespace.
pub static XML_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<\?xml[^\n]*?\?>\s*").expect("XML_DECLARATION regex")
});

/// Captures the `encoding="..."` label of an XML declaration.
pub static XML_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<\?xml[^>]*encoding\s*=\s*["']([^"']+)["']"#).expect("XML_ENCODING regex")
});

// =============================================================================
// Text Normalization Patterns
// =============================================================================

/// Matches one piece of markup: a comment, a start/end tag, or a
/// `<!...>` / `<?...?>` construct.
///
/// Group 1 holds the tag name for start and end tags. Quoted attribute values
/// may contain `>`.
pub static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?(?:-->|\z)|</?([a-zA-Z][a-zA-Z0-9:_.-]*)(?:"[^"]*"|'[^']*'|[^'">])*>|<[!?](?:"[^"]*"|'[^']*'|[^'">])*>"#,
    )
    .expect("MARKUP regex")
});

/// Matches a single character that is not a letter, number, punctuation,
/// symbol or mark. Newline and tab are left alone; carriage returns still
/// match so the caller can decide whether they belong to a CRLF pair.
pub static NON_PRINTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}\p{P}\p{S}\p{M}\n\t]").expect("NON_PRINTABLE regex")
});

/// Matches a run of newlines with at most one space on either side.
pub static SPACED_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?: ?\n ?)+").expect("SPACED_NEWLINES regex")
});
