//! Wildcard expansion shared by id, class and attribute-name patterns.
//!
//! A pattern with `*` is reduced to fragments that must all be found in the
//! tested string, in any order. Wildcards at either edge only drop the
//! anchoring on that side.

/// How a pattern is laid out before fragments are cut from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Padding {
    /// Pad with one space on both sides. Used for space-separated token
    /// lists (`id`, `class`) so a fragment is anchored to token edges.
    Tokens,
    /// Use the trimmed pattern as is. Used for attribute names.
    Bare,
}

/// Expands `pattern` into the fragments a matching value must contain.
///
/// ```text
/// Tokens  "main"   -> [" main "]        exact token
/// Tokens  "a*"     -> [" a"]            token starting with "a"
/// Tokens  "*a"     -> ["a "]            token ending with "a"
/// Tokens  "a*c"    -> [" a", "c "]
/// Bare    "*data*" -> ["data"]
/// Bare    "x*y"    -> ["x", "y"]
/// ```
pub(crate) fn expand(pattern: &str, padding: Padding) -> Vec<String> {
    let trimmed = pattern.trim();
    let (mut select, edge) = match padding {
        Padding::Tokens => (format!(" {trimmed} "), 1),
        Padding::Bare => (trimmed.to_string(), 0),
    };

    if !select.contains('*') {
        return vec![select];
    }

    if select.as_bytes().get(edge) == Some(&b'*') {
        select = select.trim_start_matches(['*', ' ']).to_string();
    }

    let last = select.len().checked_sub(1 + edge);
    if last.and_then(|i| select.as_bytes().get(i)) == Some(&b'*') {
        select = select.trim_end_matches(['*', ' ']).to_string();
    }

    select.split('*').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_token_is_padded() {
        assert_eq!(expand(" main ", Padding::Tokens), vec![" main "]);
    }

    #[test]
    fn trailing_wildcard_anchors_token_start() {
        assert_eq!(expand("a*", Padding::Tokens), vec![" a"]);
    }

    #[test]
    fn leading_wildcard_anchors_token_end() {
        assert_eq!(expand("*a", Padding::Tokens), vec!["a "]);
    }

    #[test]
    fn both_edges_leave_a_free_substring() {
        assert_eq!(expand("*a*", Padding::Tokens), vec!["a"]);
    }

    #[test]
    fn inner_wildcard_splits_into_fragments() {
        assert_eq!(expand("a*c", Padding::Tokens), vec![" a", "c "]);
        assert_eq!(expand("*a*b*", Padding::Tokens), vec!["a", "b"]);
    }

    #[test]
    fn lone_wildcard_reduces_to_empty_fragment() {
        assert_eq!(expand("*", Padding::Tokens), vec![""]);
        assert_eq!(expand("*", Padding::Bare), vec![""]);
    }

    #[test]
    fn bare_names_are_not_padded() {
        assert_eq!(expand("data", Padding::Bare), vec!["data"]);
        assert_eq!(expand("*data*", Padding::Bare), vec!["data"]);
        assert_eq!(expand("x*y", Padding::Bare), vec!["x", "y"]);
    }
}
