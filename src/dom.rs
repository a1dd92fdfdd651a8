//! Document wrapper.
//!
//! [`Dom`] owns a parsed `dom_query` document and runs selectors and
//! selector chains against it. HTML and XML are both accepted; XML is parsed
//! in HTML mode, which tolerates broken documents.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::chain::{self, Resolution, SelectorChain};
use crate::encoding;
use crate::error::{Error, Result};
use crate::node::{Node, NodeList};
use crate::patterns::{XML_DECLARATION, XML_ENCODING};
use crate::selector;

/// A parsed HTML or XML document.
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::{Dom, TextOptions};
///
/// let dom = Dom::new(r#"
///     <div class="details"><span class="price">10</span><span class="price">12</span></div>
/// "#)?;
///
/// let price = dom.elem([(".details", Some(0)), (".price", Some(-1))], None)?;
/// assert_eq!(price.value.map(|n| n.text(&TextOptions::default())).as_deref(), Some("12"));
///
/// let missing = dom.elem([(".details", Some(0)), (".tax", Some(0))], None)?;
/// assert!(missing.value.is_none());
/// assert_eq!(missing.failed.as_deref(), Some(".tax => 0"));
/// # Ok::<(), rs_dom_chain::Error>(())
/// ```
pub struct Dom {
    document: Document,
    source: String,
    is_xml: bool,
    xml_encoding: Option<String>,
    had_html_tag: bool,
}

impl Dom {
    /// Parses HTML or XML markup.
    ///
    /// Markup starting with `<?xml` is treated as XML: the declaration is
    /// removed and its encoding label remembered.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMarkup`] when the input contains no `<` or no `>`.
    pub fn new(markup: &str) -> Result<Self> {
        if !markup.contains('<') || !markup.contains('>') {
            return Err(Error::InvalidMarkup("no tags found".to_string()));
        }

        let source = markup.trim().to_string();
        let is_xml = source.starts_with("<?xml");

        let (document, xml_encoding, had_html_tag) = if is_xml {
            let label = XML_ENCODING
                .captures(&source)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
            let body = XML_DECLARATION.replace(&source, "");
            (Document::from(body.as_ref()), label, false)
        } else {
            let had_html_tag = source.to_ascii_lowercase().contains("</html>");
            (Document::from(source.as_str()), None, had_html_tag)
        };

        tracing::debug!(is_xml, len = source.len(), "parsed document");

        Ok(Self {
            document,
            source,
            is_xml,
            xml_encoding,
            had_html_tag,
        })
    }

    /// Parses markup bytes, decoding them with the charset the markup declares.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMarkup`] when the decoded input contains no tags.
    pub fn from_bytes(markup: &[u8]) -> Result<Self> {
        Self::new(&encoding::transcode_to_utf8(markup))
    }

    /// Returns the document markup.
    ///
    /// With `original` the trimmed input is returned as given. Otherwise the
    /// parsed tree is serialized; when the input had no `</html>` of its
    /// own, only the body content is returned so the wrapper the parser
    /// added does not leak out.
    #[must_use]
    pub fn source(&self, original: bool) -> String {
        if original {
            return self.source.clone();
        }
        if self.had_html_tag {
            return self.document.html().to_string();
        }
        self.document.select("body").inner_html().trim().to_string()
    }

    #[inline]
    #[must_use]
    pub fn is_xml(&self) -> bool {
        self.is_xml
    }

    /// Encoding label from the XML declaration, if there was one.
    #[must_use]
    pub fn xml_encoding(&self) -> Option<&str> {
        self.xml_encoding.as_deref()
    }

    /// The underlying `dom_query` document.
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Root node of the tree; the default search context.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.document.root()
    }

    /// Creates a detached element owned by this document.
    ///
    /// `text` becomes its only child (escaped on output). Place the element
    /// with [`Node::append_child`] and friends.
    #[must_use]
    pub fn create_elem(&self, name: &str, text: Option<&str>, attrs: &[(&str, &str)]) -> Node<'_> {
        let elem = Node::Element(self.document.tree.new_element(name));
        if let Some(text) = text {
            elem.set_text(text);
        }
        for (attr, value) in attrs {
            elem.set_attr(attr, value);
        }
        elem
    }

    /// Runs one selector below `parent` (or the whole document).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSelector`] for attribute names mixing `:` and `*`.
    pub fn elem_list<'a>(&'a self, selector: &str, parent: Option<&Node<'a>>) -> Result<NodeList<'a>> {
        let context = parent.map_or_else(|| self.root(), Node::node_ref);
        Ok(selector::compile(selector)?.execute(context))
    }

    /// Resolves a selector or chain to a node list.
    ///
    /// A plain selector returns all its matches. For a chain see
    /// [`chain::resolve_list`]; on failure the list is empty and
    /// `failed` names the step.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSelector`] for attribute names mixing `:` and `*`.
    pub fn lister<'a>(
        &'a self,
        chain: impl Into<SelectorChain>,
        parent: Option<&Node<'a>>,
    ) -> Result<Resolution<NodeList<'a>>> {
        chain::resolve_list(self.root(), &chain.into(), parent)
    }

    /// Resolves a chain to a single node.
    ///
    /// Steps without an index pick the first match. On failure the value is
    /// `None` and `failed` names the step.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSelector`] for attribute names mixing `:` and `*`.
    pub fn elem<'a>(
        &'a self,
        chain: impl Into<SelectorChain>,
        parent: Option<&Node<'a>>,
    ) -> Result<Resolution<Option<Node<'a>>>> {
        chain::resolve_one(self.root(), &chain.into(), parent)
    }
}
