//! HTML fragment to plain text normalization.
//!
//! [`html_to_plain`] runs a fixed pipeline over markup taken from a node:
//! block tags become line breaks, user prefixes are inserted, tags are
//! stripped (except the kept ones), character references are decoded and
//! the result is sanitized down to printable text with at most one empty
//! line between paragraphs.

use dom_query::Document;

use crate::options::TextOptions;
use crate::patterns::MARKUP;

mod sanitize;

pub use sanitize::{
    clean_text, remove_multi_space, remove_non_printables, remove_non_printables_bytes,
    strip_malformed_sequences,
};

/// Named references replaced before tags are stripped, with their plain
/// text. The literal no-break space is included.
const PLAIN_REFERENCES: [(&str, &str); 13] = [
    ("\u{a0}", " "),
    ("&nbsp;", " "),
    ("&#39;", "'"),
    ("&NewLine;", "\n"),
    ("&vert;", "|"),
    ("&period;", "."),
    ("&lpar;", "("),
    ("&rpar;", ")"),
    ("&sol;", "/"),
    ("&colon;", ":"),
    ("&comma;", ","),
    ("&dollar;", "$"),
    ("&percnt;", "%"),
];

/// Every spelling of a line break tag, each tried with a trailing newline first.
const BR_VARIANTS: [&str; 5] = ["<br>", "<br />", "<br/>", "</br>", "<br >"];

/// Converts an HTML fragment into clean plain text.
///
/// - `<br>` in all its spellings becomes one newline
/// - `<div>` starts a new line, `<p>` is preceded by an empty line
/// - `<h1>`..`<h6>` get an empty line before and after
/// - tags not listed in `options.keep_tags` are stripped
/// - character references are decoded
/// - spaces are collapsed, no more than one empty line is kept in a row,
///   and the result is trimmed
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::{html_to_plain, TextOptions};
///
/// let text = html_to_plain("<p>Hi</p><p>Bye</p>", &TextOptions::default());
/// assert_eq!(text, "Hi\n\nBye");
///
/// let options = TextOptions::default().with_replace("<li>", "\n- ");
/// let text = html_to_plain(r#"<ul><li>one</li><li class="x">two</li></ul>"#, &options);
/// assert_eq!(text, "- one\n- two");
/// ```
#[must_use]
pub fn html_to_plain(html: &str, options: &TextOptions) -> String {
    // whitespace inside markup carries no meaning
    let mut html = html.replace("\r\n", " ").replace(['\r', '\n', '\t'], " ");

    if !options.keeps("p") {
        html = replace_ignore_ascii_case(&html, "<p>", "<br><br><p>");
        html = replace_ignore_ascii_case(&html, "<p ", "<br><br><p ");
    }

    html = replace_ignore_ascii_case(&html, "<div", "<br><div");

    for level in 1..=6 {
        let tag = format!("h{level}");
        if options.keeps(&tag) {
            continue;
        }
        html = replace_ignore_ascii_case(&html, &format!("<{tag}>"), &format!("<br><br><{tag}>"));
        html = replace_ignore_ascii_case(&html, &format!("<{tag} "), &format!("<br><br><{tag} "));
        html = replace_ignore_ascii_case(&html, &format!("</{tag}>"), &format!("</{tag}><br><br>"));
    }

    if !options.keeps("br") {
        html = br_to_nl(&html);
    }

    for (from, to) in &options.replace_tags {
        if from.is_empty() {
            continue;
        }
        html = html.replace(from.as_str(), &format!("{to}{from}"));

        // "<li>" also covers "<li class=...>"
        if let Some(open) = from.strip_suffix('>') {
            let with_attrs = format!("{open} ");
            html = html.replace(&with_attrs, &format!("{to}{with_attrs}"));
        }
    }

    for (reference, plain) in PLAIN_REFERENCES {
        html = html.replace(reference, plain);
    }

    html = strip_tags(&html, options);
    html = decode_character_references(&html);
    html = clean_text(&html, false);

    html = html.replace("\n ", "\n").replace(" \n", "\n");
    while html.contains("\n\n\n") {
        html = html.replace("\n\n\n", "\n\n");
    }

    sanitize::trim_blank(&html).to_string()
}

/// Replaces every spelling of `<br>` (case-insensitive) with a newline.
///
/// A break tag that is already followed by a newline yields just that one
/// newline.
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::text::br_to_nl;
///
/// assert_eq!(br_to_nl("a<BR/>b<br>\nc</br>d"), "a\nb\nc\nd");
/// ```
#[must_use]
pub fn br_to_nl(text: &str) -> String {
    let mut text = text.to_string();
    for variant in BR_VARIANTS {
        text = replace_ignore_ascii_case(&text, &format!("{variant}\n"), "\n");
        text = replace_ignore_ascii_case(&text, variant, "\n");
    }
    text
}

/// Removes every tag and comment except start/end tags named in
/// `options.keep_tags`.
fn strip_tags(html: &str, options: &TextOptions) -> String {
    MARKUP
        .replace_all(html, |caps: &regex::Captures| {
            match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(name)) if options.keeps(name.as_str()) => {
                    whole.as_str().to_string()
                }
                _ => String::new(),
            }
        })
        .into_owned()
}

/// Decodes character references in the text between tags.
///
/// Kept tags pass through untouched; their attribute values are not decoded.
fn decode_character_references(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for tag in MARKUP.find_iter(text) {
        push_decoded(&mut out, &text[last..tag.start()]);
        out.push_str(tag.as_str());
        last = tag.end();
    }
    push_decoded(&mut out, &text[last..]);

    out
}

/// Appends `segment` with its references decoded by the HTML tokenizer.
fn push_decoded(out: &mut String, segment: &str) {
    if !segment.contains('&') {
        out.push_str(segment);
        return;
    }
    // escape '<' so the tokenizer sees text only
    let fragment = Document::fragment(segment.replace('<', "&lt;"));
    out.push_str(&fragment.root().text());
}

/// ASCII case-insensitive replacement of every occurrence of `needle`.
fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }

    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(html: &str) -> String {
        html_to_plain(html, &TextOptions::default())
    }

    #[test]
    fn paragraphs_are_separated_by_one_empty_line() {
        assert_eq!(plain("<p>Hi</p><p>Bye</p>"), "Hi\n\nBye");
    }

    #[test]
    fn paragraph_with_attributes_is_separated_too() {
        assert_eq!(plain(r#"A<P class="x">B</P>"#), "A\n\nB");
    }

    #[test]
    fn div_starts_a_new_line() {
        assert_eq!(plain("<div>one</div><div>two</div>"), "one\ntwo");
    }

    #[test]
    fn headings_get_empty_lines_around() {
        assert_eq!(plain("intro<h2>Title</h2>body"), "intro\n\nTitle\n\nbody");
    }

    #[test]
    fn kept_heading_stays_markup_without_breaks() {
        let options = TextOptions::keep("<h1>");
        assert_eq!(html_to_plain("a<h1>T</h1>b", &options), "a<h1>T</h1>b");
    }

    #[test]
    fn br_variants_become_newlines() {
        assert_eq!(plain("a<br>b<BR />c<br/>d</br>e<br >f"), "a\nb\nc\nd\ne\nf");
    }

    #[test]
    fn kept_br_is_left_as_markup() {
        let options = TextOptions::keep("<br>");
        assert_eq!(html_to_plain("a<br>b", &options), "a<br>b");
    }

    #[test]
    fn kept_paragraph_skips_breaks() {
        let options = TextOptions::keep("<p>");
        assert_eq!(html_to_plain("<p>a</p><p>b</p>", &options), "<p>a</p><p>b</p>");
    }

    #[test]
    fn source_line_breaks_and_tabs_are_spaces() {
        assert_eq!(plain("a\r\nb\nc\td\re"), "a b c d e");
    }

    #[test]
    fn replacement_matches_tag_with_attributes() {
        let options = TextOptions::default().with_replace("<li>", "* ");
        assert_eq!(
            html_to_plain(r#"<li>a</li><li class="b">b</li>"#, &options),
            "* a* b"
        );
    }

    #[test]
    fn replacements_apply_in_order() {
        let options = TextOptions::default()
            .with_replace("<b>", "[")
            .with_replace("[", "(");
        assert_eq!(html_to_plain("x<b>y</b>", &options), "x([y");
    }

    #[test]
    fn plain_references_are_replaced() {
        assert_eq!(
            plain("a&nbsp;b&#39;c&vert;d&period;&lpar;e&rpar;&sol;&colon;&comma;&dollar;&percnt;"),
            "a b'c|d.(e)/:,$%"
        );
    }

    #[test]
    fn newline_reference_survives_as_line_break() {
        assert_eq!(plain("a&NewLine;b"), "a\nb");
    }

    #[test]
    fn other_references_are_decoded() {
        assert_eq!(plain("Fish &amp; Chips &lt;3 &eacute;t&#233; &#x41;"), "Fish & Chips <3 été A");
    }

    #[test]
    fn decoded_angle_brackets_are_not_stripped() {
        assert_eq!(plain("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
    }

    #[test]
    fn comments_are_removed() {
        assert_eq!(plain("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn kept_tags_keep_their_attributes() {
        let options = TextOptions::keep("<a>");
        assert_eq!(
            html_to_plain(r#"<span>see <a href="/x">here</a></span>"#, &options),
            r#"see <a href="/x">here</a>"#
        );
    }

    #[test]
    fn at_most_one_empty_line() {
        let text = plain("a<br><br><br><br>b");
        assert_eq!(text, "a\n\nb");
    }

    #[test]
    fn spaces_next_to_newlines_are_removed() {
        assert_eq!(plain("a <br> b"), "a\nb");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(plain(""), "");
        assert_eq!(plain("<br><p></p>"), "");
    }

    #[test]
    fn ignore_case_replacement_handles_mixed_case() {
        assert_eq!(replace_ignore_ascii_case("<DiV><div>", "<div", "X"), "X>X>");
        assert_eq!(replace_ignore_ascii_case("abc", "", "X"), "abc");
    }

    #[test]
    fn br_to_nl_swallows_following_newline() {
        assert_eq!(br_to_nl("a<br>\nb"), "a\nb");
        assert_eq!(br_to_nl("a<br/>\n\nb"), "a\n\nb");
    }
}
