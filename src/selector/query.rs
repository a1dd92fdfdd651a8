//! Compiled structural queries and their evaluation over a `dom_query` tree.
//!
//! A [`CompiledQuery`] is a tag filter plus a conjunction of attribute tests,
//! always evaluated against every element below the context node, at any
//! depth, in document order.

use std::fmt;

use dom_query::{NodeRef, Selection};

use crate::node::{Node, NodeList};

/// Tag filter that accepts any element.
pub const ANY_TAG: &str = "*";

/// A selector translated into something the tree can evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// Lower-case tag name, or [`ANY_TAG`].
    pub tag_filter: String,
    /// Test applied to elements that pass the tag filter.
    pub predicate: Predicate,
}

/// The test part of a [`CompiledQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every element passes.
    Any,
    /// Every condition must hold.
    All(Vec<Condition>),
    /// A query fragment handed to the tree's own CSS engine unchanged.
    Native(String),
}

/// A single test on one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The attribute value, whitespace-normalized and padded with one space
    /// on each side, contains `fragment`. A missing attribute reads as empty.
    TokenContains {
        /// Attribute holding a space-separated token list (`id`, `class`).
        attribute: &'static str,
        /// Fragment produced by wildcard expansion.
        fragment: String,
    },
    /// Some attribute matches `name` and, when given, has exactly `value`.
    Attribute {
        /// How the attribute name is matched.
        name: NameMatch,
        /// Required value.
        value: Option<String>,
    },
}

/// Attribute name matching mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    /// Plain attribute name.
    Exact(String),
    /// Namespace-qualified name such as `xml:lang`, compared in full.
    Qualified(String),
    /// The qualified name contains every fragment.
    Contains(Vec<String>),
}

impl CompiledQuery {
    /// Runs the query below `context` and returns the matching elements.
    ///
    /// Never fails: a query that matches nothing, or a native fragment the
    /// CSS engine can't parse, yields an empty list.
    #[must_use]
    pub fn execute<'a>(&self, context: NodeRef<'a>) -> NodeList<'a> {
        if let Predicate::Native(fragment) = &self.predicate {
            let Some(found) = Selection::from(context).try_select(fragment) else {
                return NodeList::default();
            };
            return found.nodes().iter().copied().filter_map(Node::from_ref).collect();
        }

        element_descendants(context)
            .into_iter()
            .filter(|node| self.matches(node))
            .map(Node::Element)
            .collect()
    }

    /// Tests one element against the tag filter and predicate.
    ///
    /// Native fragments can't be evaluated per element; they never match here.
    #[must_use]
    pub fn matches(&self, node: &NodeRef) -> bool {
        if !node.is_element() {
            return false;
        }

        if self.tag_filter != ANY_TAG {
            let Some(name) = node.node_name() else {
                return false;
            };
            if !name.eq_ignore_ascii_case(&self.tag_filter) {
                return false;
            }
        }

        match &self.predicate {
            Predicate::Any => true,
            Predicate::All(conditions) => conditions.iter().all(|c| c.holds(node)),
            Predicate::Native(_) => false,
        }
    }
}

impl Condition {
    fn holds(&self, node: &NodeRef) -> bool {
        match self {
            Self::TokenContains {
                attribute,
                fragment,
            } => {
                let value = crate::node::attribute_value(node, attribute).unwrap_or_default();
                padded_tokens(&value).contains(fragment.as_str())
            }
            Self::Attribute { name, value } => node.attrs().iter().any(|attr| {
                let qualified = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", &**prefix, &*attr.name.local),
                    None => attr.name.local.to_string(),
                };
                name.accepts(&qualified)
                    && value.as_deref().is_none_or(|v| &*attr.value == v)
            }),
        }
    }
}

impl NameMatch {
    fn accepts(&self, qualified: &str) -> bool {
        match self {
            Self::Exact(name) | Self::Qualified(name) => qualified.eq_ignore_ascii_case(name),
            Self::Contains(fragments) => {
                let lower = qualified.to_ascii_lowercase();
                fragments.iter().all(|f| lower.contains(f.as_str()))
            }
        }
    }
}

/// `" " + normalize-space(value) + " "`
fn padded_tokens(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(' ');
    for token in value.split_ascii_whitespace() {
        out.push_str(token);
        out.push(' ');
    }
    if out.len() == 1 {
        out.push(' ');
    }
    out
}

/// All element descendants of `context` in document order, excluding itself.
fn element_descendants<'a>(context: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    push_children_reversed(context, &mut stack);

    while let Some(node) = stack.pop() {
        if node.is_element() {
            out.push(node);
        }
        push_children_reversed(node, &mut stack);
    }

    out
}

fn push_children_reversed<'a>(node: NodeRef<'a>, stack: &mut Vec<NodeRef<'a>>) {
    let start = stack.len();
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        stack.push(c);
    }
    stack[start..].reverse();
}

// === Rendering ===
//
// Queries render as the XPath expression they correspond to. Only used for
// diagnostics.

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            Predicate::Any => write!(f, ".//{}", self.tag_filter),
            Predicate::Native(fragment) => write!(f, ".//{fragment}"),
            Predicate::All(conditions) => {
                write!(f, ".//{}[", self.tag_filter)?;
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{condition}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenContains {
                attribute,
                fragment,
            } => write!(
                f,
                "contains(concat(' ', normalize-space(@{attribute}), ' '), '{fragment}')"
            ),
            Self::Attribute {
                name: NameMatch::Exact(name),
                value,
            } => match value {
                Some(v) => write!(f, "@{name}='{v}'"),
                None => write!(f, "@{name}"),
            },
            Self::Attribute {
                name: NameMatch::Qualified(name),
                value,
            } => {
                write!(f, "@*[name()=\"{name}\"")?;
                if let Some(v) = value {
                    write!(f, " and .='{v}'")?;
                }
                f.write_str("]")
            }
            Self::Attribute {
                name: NameMatch::Contains(fragments),
                value,
            } => {
                f.write_str("@*[")?;
                for (i, fragment) in fragments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "contains(name(), '{fragment}')")?;
                }
                if let Some(v) = value {
                    write!(f, " and .='{v}'")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn class_query(fragment: &str) -> CompiledQuery {
        CompiledQuery {
            tag_filter: ANY_TAG.to_string(),
            predicate: Predicate::All(vec![Condition::TokenContains {
                attribute: "class",
                fragment: fragment.to_string(),
            }]),
        }
    }

    #[test]
    fn padded_tokens_normalizes_whitespace() {
        assert_eq!(padded_tokens("  a \n\t b "), " a b ");
        assert_eq!(padded_tokens(""), "  ");
    }

    #[test]
    fn execute_walks_all_depths_in_document_order() {
        let doc = Document::from(
            r#"<div><p class="x">1</p><section><p class="x">2</p></section><p class="x">3</p></div>"#,
        );
        let found = class_query(" x ").execute(doc.root());
        let texts: Vec<_> = found.iter().map(Node::text_content).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn execute_excludes_the_context_itself() {
        let doc = Document::from(r#"<div class="x"><span class="x">in</span></div>"#);
        let div = class_query(" x ").execute(doc.root());
        assert_eq!(div.len(), 2);

        let Some(outer) = div.i(0) else {
            panic!("expected the outer div");
        };
        let inner = class_query(" x ").execute(outer.node_ref());
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.i(0).map(Node::qualified_name).as_deref(), Some("span"));
    }

    #[test]
    fn tag_filter_is_case_insensitive() {
        let doc = Document::from("<div><P>a</P><p>b</p></div>");
        let query = CompiledQuery {
            tag_filter: "p".to_string(),
            predicate: Predicate::Any,
        };
        assert_eq!(query.execute(doc.root()).len(), 2);
    }

    #[test]
    fn native_fragment_uses_css_engine() {
        let doc = Document::from("<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>");
        let query = CompiledQuery {
            tag_filter: ANY_TAG.to_string(),
            predicate: Predicate::Native("ul > li".to_string()),
        };
        assert_eq!(query.execute(doc.root()).len(), 2);
    }

    #[test]
    fn broken_native_fragment_matches_nothing() {
        let doc = Document::from("<p>a</p>");
        let query = CompiledQuery {
            tag_filter: ANY_TAG.to_string(),
            predicate: Predicate::Native("p[[".to_string()),
        };
        assert!(query.execute(doc.root()).is_empty());
    }

    #[test]
    fn renders_as_xpath() {
        assert_eq!(
            class_query(" x ").to_string(),
            ".//*[contains(concat(' ', normalize-space(@class), ' '), ' x ')]"
        );

        let query = CompiledQuery {
            tag_filter: "a".to_string(),
            predicate: Predicate::All(vec![Condition::Attribute {
                name: NameMatch::Exact("href".to_string()),
                value: Some("home".to_string()),
            }]),
        };
        assert_eq!(query.to_string(), ".//a[@href='home']");

        let query = CompiledQuery {
            tag_filter: ANY_TAG.to_string(),
            predicate: Predicate::All(vec![Condition::Attribute {
                name: NameMatch::Contains(vec!["da".to_string(), "ta".to_string()]),
                value: None,
            }]),
        };
        assert_eq!(
            query.to_string(),
            ".//*[@*[contains(name(), 'da') and contains(name(), 'ta')]]"
        );
    }
}
