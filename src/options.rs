//! Configuration for HTML-to-plain-text normalization.
//!
//! The `TextOptions` struct decides which tags survive as markup and which
//! tag openings get a text prefix inserted in front of them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration options for [`html_to_plain`](crate::text::html_to_plain).
///
/// All fields are public for easy configuration. Use `Default::default()`
/// to strip every tag with no extra replacements.
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::TextOptions;
///
/// // Keep links and bold text as markup, prefix list items with a dash
/// let options = TextOptions::keep("<a><b>").with_replace("<li>", "\n- ");
/// assert!(options.keeps("a"));
/// assert!(!options.keeps("li"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Tag names (lower-case, no brackets) that are kept as markup.
    ///
    /// Keeping `p`, `br` or `h1`..`h6` also disables the line breaks those
    /// tags would otherwise produce.
    ///
    /// Default: empty
    pub keep_tags: BTreeSet<String>,

    /// Literal tag openings mapped to a prefix inserted before them, applied
    /// in order.
    ///
    /// A key ending in `>` also matches the same opening followed by
    /// attributes, so `"<li>"` covers `<li class="x">`.
    ///
    /// Default: empty
    pub replace_tags: Vec<(String, String)>,
}

impl TextOptions {
    /// Builds options keeping the tags of a compact list like `"<a><div><br>"`.
    ///
    /// Anything between `<` and `>` counts as a tag name; names are
    /// lower-cased and stray text outside brackets is ignored.
    #[must_use]
    pub fn keep(tag_list: &str) -> Self {
        let keep_tags = tag_list
            .split('<')
            .filter_map(|part| part.split_once('>').map(|(name, _)| name))
            .map(|name| name.trim().trim_start_matches('/').to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        Self {
            keep_tags,
            replace_tags: Vec::new(),
        }
    }

    /// Appends a replacement rule.
    #[must_use]
    pub fn with_replace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replace_tags.push((from.into(), to.into()));
        self
    }

    /// Adds a tag to keep.
    #[must_use]
    pub fn with_keep(mut self, tag: &str) -> Self {
        self.keep_tags.insert(tag.to_ascii_lowercase());
        self
    }

    /// Returns true when the given tag name is kept as markup.
    #[inline]
    #[must_use]
    pub fn keeps(&self, tag: &str) -> bool {
        self.keep_tags.contains(&tag.to_ascii_lowercase())
    }
}
