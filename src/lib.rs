//! # rs-dom-chain
//!
//! Compact selectors, selector chains and plain-text conversion on top of a
//! parsed HTML or XML tree.
//!
//! Selectors are short jQuery-like strings (`div.card`, `#main`,
//! `[xml:lang=en]`, `[*attr1]`). A chain is a list of selector/index steps
//! where each step searches inside the node picked by the previous one.
//! When a chain cannot be followed the result carries a diagnostic naming
//! the step that failed.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_dom_chain::{Dom, SelectorChain, TextOptions};
//!
//! let dom = Dom::new(r#"<ul id="list"><li>One</li><li>Two<br>lines</li></ul>"#)?;
//!
//! let chain = SelectorChain::new().then("#list", 0).then("li", -1);
//! let last = dom.elem(chain, None)?.into_value();
//! let text = last.map(|n| n.text(&TextOptions::default()));
//! assert_eq!(text.as_deref(), Some("Two\nlines"));
//!
//! let items = dom.lister("li", None)?.into_value();
//! assert_eq!(items.len(), 2);
//! # Ok::<(), rs_dom_chain::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Selectors**: id, class, attribute and tag shorthands with `*` wildcards
//! - **Chains**: nested lookups with negative indexes and failure diagnostics
//! - **Text**: markup to readable plain text with configurable kept tags
//! - **Encodings**: byte input decoded using the charset the markup declares

mod error;
mod options;
mod patterns;

/// Selector chains and their resolution.
pub mod chain;

/// Document wrapper and lookups.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Node and node list views.
pub mod node;

/// Selector parsing and compilation.
pub mod selector;

/// Markup to plain text conversion and text sanitizing.
pub mod text;

// Public API - re-exports
pub use chain::{Resolution, SelectorChain};
pub use dom::Dom;
pub use error::{Error, Result};
pub use node::{Node, NodeList};
pub use options::TextOptions;
pub use selector::{CompiledQuery, Selector};
pub use text::html_to_plain;

/// Converts markup to plain text with default options.
///
/// # Example
///
/// ```rust
/// assert_eq!(rs_dom_chain::to_plain("<p>Hi</p><p>Bye</p>"), "Hi\n\nBye");
/// ```
#[must_use]
pub fn to_plain(html: &str) -> String {
    html_to_plain(html, &TextOptions::default())
}
