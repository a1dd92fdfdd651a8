//! Selector compiler.
//!
//! Turns compact jQuery-like selector strings into [`CompiledQuery`] values.
//! Supported forms:
//!
//! - `img` (tag name, case-insensitive)
//! - `#id`, `img#id`
//! - `.class`, `div.class`, `.class1.class2`, `.class1 class2`
//! - `[attribute]`, `[attribute=value]`, `img[attribute=value]`
//! - `[xml:lang=en]` (namespace-qualified attribute name)
//!
//! `*` works as a wildcard inside ids, classes and attribute names. Anything
//! else is passed verbatim to the tree's CSS engine.
//!
//! # Example
//!
//! ```rust
//! use rs_dom_chain::selector::{self, Selector};
//!
//! assert_eq!(
//!     Selector::parse("div.card"),
//!     Selector::Class { tag: "div".into(), pattern: "card".into() }
//! );
//!
//! let query = selector::compile("a[href=home]")?;
//! assert_eq!(query.to_string(), ".//a[@href='home']");
//! # Ok::<(), rs_dom_chain::Error>(())
//! ```

use crate::error::{Error, Result};

pub mod query;
mod wildcard;

pub use query::{CompiledQuery, Condition, NameMatch, Predicate, ANY_TAG};

use wildcard::Padding;

/// A parsed selector string.
///
/// `tag` is the lower-cased tag prefix, or [`ANY_TAG`] when none was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `tag#pattern`
    Id {
        /// Tag prefix.
        tag: String,
        /// Id pattern, may contain `*`.
        pattern: String,
    },
    /// `tag[name]` or `tag[name=value]`
    Attribute {
        /// Tag prefix.
        tag: String,
        /// Lower-cased attribute name pattern.
        name: String,
        /// Exact value to match.
        value: Option<String>,
    },
    /// `tag.class1.class2`
    Class {
        /// Tag prefix.
        tag: String,
        /// Class tokens joined by single spaces, may contain `*`.
        pattern: String,
    },
    /// Bare tag name.
    Tag(String),
    /// Anything else, handed to the CSS engine.
    Raw(String),
}

impl Selector {
    /// Classifies a selector string.
    ///
    /// Marker characters are looked for in the order `#`, `[`, `.`; the first
    /// one present decides the shape. Parsing never fails.
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        if let Some(pos) = selector.find('#') {
            let (tag, pattern) = if pos == 0 {
                (ANY_TAG.to_string(), selector.trim_start_matches('#'))
            } else {
                let mut parts = selector.split('#');
                let tag = parts.next().unwrap_or_default().to_ascii_lowercase();
                (tag, parts.next().unwrap_or_default())
            };
            return Self::Id {
                tag,
                pattern: pattern.to_string(),
            };
        }

        if let Some(pos) = selector.find('[') {
            let (tag, inner) = if pos == 0 {
                (ANY_TAG.to_string(), selector.trim_matches(['[', ']']))
            } else {
                let mut parts = selector.split('[');
                let tag = parts.next().unwrap_or_default().to_ascii_lowercase();
                (tag, parts.next().unwrap_or_default().trim_end_matches(']'))
            };

            // "=" at position 0 is part of the name
            let (name, value) = match inner.find('=') {
                Some(eq) if eq > 0 => {
                    let mut parts = inner.split('=');
                    let name = parts.next().unwrap_or_default();
                    let value = parts.next().unwrap_or_default();
                    (name, Some(unquote(value).to_string()))
                }
                _ => (inner, None),
            };

            return Self::Attribute {
                tag,
                name: name.trim().to_ascii_lowercase(),
                value,
            };
        }

        if let Some(pos) = selector.find('.') {
            let (tag, classes) = if pos == 0 {
                (ANY_TAG.to_string(), selector.trim_start_matches('.').to_string())
            } else {
                let mut parts = selector.split('.');
                let tag = parts.next().unwrap_or_default().to_ascii_lowercase();
                (tag, parts.collect::<Vec<_>>().join("."))
            };

            // ".c1.c2" and ".c1 c2" mean the same
            let pattern = classes.replace('.', " ").replace("  ", " ");
            return Self::Class { tag, pattern };
        }

        if is_tag_name(selector) {
            return Self::Tag(selector.to_ascii_lowercase());
        }

        Self::Raw(selector.to_string())
    }

    /// Translates the selector into a query.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSelector`] when an attribute name mixes `:` and `*`.
    pub fn compile(&self) -> Result<CompiledQuery> {
        let query = match self {
            Self::Id { tag, pattern } => CompiledQuery {
                tag_filter: tag.clone(),
                predicate: token_predicate("id", pattern),
            },
            Self::Class { tag, pattern } => CompiledQuery {
                tag_filter: tag.clone(),
                predicate: token_predicate("class", pattern),
            },
            Self::Attribute { tag, name, value } => {
                let name = match (name.contains(':'), name.contains('*')) {
                    (true, true) => return Err(Error::InvalidSelector(name.clone())),
                    (true, false) => NameMatch::Qualified(name.clone()),
                    (false, true) => NameMatch::Contains(wildcard::expand(name, Padding::Bare)),
                    (false, false) => NameMatch::Exact(name.clone()),
                };
                CompiledQuery {
                    tag_filter: tag.clone(),
                    predicate: Predicate::All(vec![Condition::Attribute {
                        name,
                        value: value.clone(),
                    }]),
                }
            }
            Self::Tag(tag) => CompiledQuery {
                tag_filter: tag.clone(),
                predicate: Predicate::Any,
            },
            Self::Raw(fragment) => CompiledQuery {
                tag_filter: ANY_TAG.to_string(),
                predicate: Predicate::Native(fragment.clone()),
            },
        };

        tracing::trace!(query = %query, "compiled selector");
        Ok(query)
    }
}

/// Parses and compiles a selector string in one step.
///
/// # Errors
///
/// [`Error::InvalidSelector`] when an attribute name mixes `:` and `*`.
pub fn compile(selector: &str) -> Result<CompiledQuery> {
    Selector::parse(selector).compile()
}

fn token_predicate(attribute: &'static str, pattern: &str) -> Predicate {
    Predicate::All(
        wildcard::expand(pattern, Padding::Tokens)
            .into_iter()
            .map(|fragment| Condition::TokenContains {
                attribute,
                fragment,
            })
            .collect(),
    )
}

/// `^[a-zA-Z0-9_-]+$`
fn is_tag_name(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
