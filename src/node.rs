//! Nodes and node lists borrowed from a `dom_query` tree.
//!
//! [`Node`] is a closed set of the node kinds callers can meet: elements,
//! text and comments. Every accessor matches on the kind, so text and
//! comment nodes simply report "no attribute", "no children" and so on.

use std::fmt;

use dom_query::{NodeRef, Selection};

use crate::options::TextOptions;
use crate::text::{clean_text, html_to_plain};

/// A node of a parsed document.
#[derive(Clone, Copy)]
pub enum Node<'a> {
    /// An element such as `<div>`.
    Element(NodeRef<'a>),
    /// A text node.
    Text(NodeRef<'a>),
    /// A comment.
    Comment(NodeRef<'a>),
}

impl<'a> Node<'a> {
    /// Wraps a tree node; documents, doctypes and processing instructions
    /// have no `Node` form.
    #[must_use]
    pub fn from_ref(node: NodeRef<'a>) -> Option<Self> {
        if node.is_element() {
            Some(Self::Element(node))
        } else if node.is_text() {
            Some(Self::Text(node))
        } else if node.is_comment() {
            Some(Self::Comment(node))
        } else {
            None
        }
    }

    /// The underlying `dom_query` node.
    #[inline]
    #[must_use]
    pub fn node_ref(&self) -> NodeRef<'a> {
        match *self {
            Self::Element(n) | Self::Text(n) | Self::Comment(n) => n,
        }
    }

    /// A one-node `dom_query` selection, for anything this type doesn't cover.
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Selection<'a> {
        Selection::from(self.node_ref())
    }

    #[inline]
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    // === Reading ===

    /// Tag name for elements (`"div"`), `"#text"` or `"#comment"` otherwise.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match self {
            Self::Element(n) => n.node_name().map(|t| t.to_string()).unwrap_or_default(),
            Self::Text(_) => "#text".to_string(),
            Self::Comment(_) => "#comment".to_string(),
        }
    }

    /// Raw attribute value. The name is matched ASCII case-insensitively
    /// against the qualified attribute name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        match self {
            Self::Element(n) => attribute_value(n, name),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    /// Attribute value cleaned into a single trimmed line of printable text.
    /// Empty when the attribute is missing.
    #[must_use]
    pub fn attr(&self, name: &str) -> String {
        self.attribute(name)
            .map(|value| clean_text(&value, false))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Concatenated text of the node and its descendants, unprocessed.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.node_ref().text().to_string()
    }

    /// Markup of the children. For a text node, the escaped text itself.
    #[must_use]
    pub fn inner_markup(&self) -> String {
        match self {
            Self::Element(_) => self.selection().inner_html().to_string(),
            Self::Text(_) => self.selection().html().to_string(),
            Self::Comment(_) => String::new(),
        }
    }

    /// Markup of the node itself, children included.
    #[must_use]
    pub fn outer_markup(&self) -> String {
        self.selection().html().to_string()
    }

    /// Plain text of the inner markup, normalized by [`html_to_plain`].
    #[must_use]
    pub fn text(&self, options: &TextOptions) -> String {
        html_to_plain(&self.inner_markup(), options)
    }

    /// True when [`Node::text`] with default options is not empty.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text(&TextOptions::default()).is_empty()
    }

    // === Navigation ===

    #[must_use]
    pub fn parent(&self) -> Option<Node<'a>> {
        self.node_ref().parent().and_then(Node::from_ref)
    }

    /// Next sibling, skipping comments and, unless `include_text`, text nodes.
    #[must_use]
    pub fn next_sibling(&self, include_text: bool) -> Option<Node<'a>> {
        let mut current = self.node_ref().next_sibling();
        while let Some(node) = current {
            if let Some(found) = Self::sibling_candidate(node, include_text) {
                return Some(found);
            }
            current = node.next_sibling();
        }
        None
    }

    /// Previous sibling, skipping comments and, unless `include_text`, text nodes.
    #[must_use]
    pub fn prev_sibling(&self, include_text: bool) -> Option<Node<'a>> {
        let mut current = self.node_ref().prev_sibling();
        while let Some(node) = current {
            if let Some(found) = Self::sibling_candidate(node, include_text) {
                return Some(found);
            }
            current = node.prev_sibling();
        }
        None
    }

    /// Direct children, skipping comments and, unless `include_text`, text nodes.
    #[must_use]
    pub fn children(&self, include_text: bool) -> NodeList<'a> {
        let Self::Element(parent) = self else {
            return NodeList::default();
        };

        let mut out = Vec::new();
        let mut current = parent.first_child();
        while let Some(node) = current {
            if let Some(child) = Self::sibling_candidate(node, include_text) {
                out.push(child);
            }
            current = node.next_sibling();
        }
        NodeList::from(out)
    }

    fn sibling_candidate(node: NodeRef<'a>, include_text: bool) -> Option<Node<'a>> {
        match Node::from_ref(node)? {
            Node::Comment(_) => None,
            Node::Text(_) if !include_text => None,
            other => Some(other),
        }
    }

    // === Mutation ===
    //
    // Attribute and text changes only apply to elements; other kinds ignore
    // them.

    pub fn set_attr(&self, name: &str, value: &str) {
        if self.is_element() {
            self.selection().set_attr(name, value);
        }
    }

    pub fn remove_attr(&self, name: &str) {
        if self.is_element() {
            self.selection().remove_attr(name);
        }
    }

    /// Appends `value` to an attribute, separated by `glue` unless the
    /// current value already ends with it. Creates the attribute if missing.
    ///
    /// ```rust
    /// use rs_dom_chain::Dom;
    ///
    /// let dom = Dom::new(r#"<p class="a">x</p>"#)?;
    /// let p = dom.elem([("p", Some(0))], None)?.value.expect("p");
    /// p.append_attr("class", "b", " ");
    /// assert_eq!(p.attr("class"), "a b");
    /// # Ok::<(), rs_dom_chain::Error>(())
    /// ```
    pub fn append_attr(&self, name: &str, value: &str, glue: &str) {
        if !self.is_element() {
            return;
        }
        let Some(current) = self.attribute(name) else {
            self.set_attr(name, value);
            return;
        };

        let mut joined = clean_text(&current, false);
        if joined.is_empty() {
            joined = value.to_string();
        } else {
            if !joined.ends_with(glue) {
                joined.push_str(glue);
            }
            joined.push_str(value);
        }
        self.set_attr(name, &joined);
    }

    /// Replaces the element's children with a single text node.
    pub fn set_text(&self, text: &str) {
        if self.is_element() {
            self.selection().set_text(text);
        }
    }

    /// Renames the element's tag.
    pub fn rename(&self, name: &str) {
        if self.is_element() {
            self.selection().rename(name);
        }
    }

    /// Detaches the node from the tree.
    pub fn remove(&self) {
        self.selection().remove();
    }

    // === Insertion ===
    //
    // Each call moves `new_node` into place and returns it. Nodes without a
    // parent have no siblings, so sibling inserts on them do nothing.

    /// Inserts `new_node` as the previous sibling of this node.
    pub fn insert_before(&self, new_node: Node<'a>) -> Node<'a> {
        let node = self.node_ref();
        if node.parent().is_some() {
            node.insert_before(&new_node.node_ref());
        }
        new_node
    }

    /// Inserts `new_node` as the next sibling of this node.
    pub fn insert_after(&self, new_node: Node<'a>) -> Node<'a> {
        let node = self.node_ref();
        if node.parent().is_some() {
            node.insert_after(&new_node.node_ref());
        }
        new_node
    }

    /// Appends `new_node` as the last child. On a text or comment node it
    /// goes right after the node instead.
    ///
    /// ```rust
    /// use rs_dom_chain::Dom;
    ///
    /// let dom = Dom::new("<ul><li>a</li></ul>")?;
    /// let ul = dom.elem("ul", None)?.into_value();
    /// let li = dom.create_elem("li", Some("b"), &[("class", "new")]);
    /// if let Some(ul) = ul {
    ///     ul.append_child(li);
    /// }
    /// assert_eq!(dom.source(false), r#"<ul><li>a</li><li class="new">b</li></ul>"#);
    /// # Ok::<(), rs_dom_chain::Error>(())
    /// ```
    pub fn append_child(&self, new_node: Node<'a>) -> Node<'a> {
        match self {
            Self::Element(node) => {
                node.append_child(&new_node.node_ref());
                new_node
            }
            Self::Text(_) | Self::Comment(_) => self.insert_after(new_node),
        }
    }

    /// Inserts `new_node` as the first child. On a text or comment node it
    /// goes right before the node instead.
    pub fn prepend_child(&self, new_node: Node<'a>) -> Node<'a> {
        match self {
            Self::Element(node) => {
                node.prepend_child(&new_node.node_ref());
                new_node
            }
            Self::Text(_) | Self::Comment(_) => self.insert_before(new_node),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Element(_) => "Element",
            Self::Text(_) => "Text",
            Self::Comment(_) => "Comment",
        };
        f.debug_tuple(kind).field(&self.qualified_name()).finish()
    }
}

/// Looks up an attribute by qualified name (`prefix:local` or `local`),
/// ignoring ASCII case.
pub(crate) fn attribute_value(node: &NodeRef, name: &str) -> Option<String> {
    node.attrs()
        .iter()
        .find(|attr| match &attr.name.prefix {
            Some(prefix) => {
                let qualified = format!("{}:{}", &**prefix, &*attr.name.local);
                qualified.eq_ignore_ascii_case(name)
            }
            None => (*attr.name.local).eq_ignore_ascii_case(name),
        })
        .map(|attr| attr.value.to_string())
}

/// Ordered list of nodes, as produced by a query.
#[derive(Debug, Clone, Default)]
pub struct NodeList<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> NodeList<'a> {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`, counted from the front starting at 0.
    #[inline]
    #[must_use]
    pub fn i(&self, index: usize) -> Option<&Node<'a>> {
        self.nodes.get(index)
    }

    /// Node at `index` counted from the end: 0 is the last node.
    #[must_use]
    pub fn i_end(&self, index: usize) -> Option<&Node<'a>> {
        let position = self.nodes.len().checked_sub(index)?.checked_sub(1)?;
        self.nodes.get(position)
    }

    /// Node at a signed position: 0 is the first node, -1 the last.
    #[must_use]
    pub fn get(&self, index: isize) -> Option<&Node<'a>> {
        crate::chain::resolve_index(self.nodes.len(), index).and_then(|i| self.nodes.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<'a>> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Node<'a>] {
        &self.nodes
    }
}

impl<'a> From<Vec<Node<'a>>> for NodeList<'a> {
    fn from(nodes: Vec<Node<'a>>) -> Self {
        Self { nodes }
    }
}

impl<'a> FromIterator<Node<'a>> for NodeList<'a> {
    fn from_iter<I: IntoIterator<Item = Node<'a>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = Node<'a>;
    type IntoIter = std::vec::IntoIter<Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'l, 'a> IntoIterator for &'l NodeList<'a> {
    type Item = &'l Node<'a>;
    type IntoIter = std::slice::Iter<'l, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn first_element<'a>(doc: &'a Document, css: &str) -> Node<'a> {
        let sel = doc.select(css);
        match sel.nodes().first().copied().and_then(Node::from_ref) {
            Some(node) => node,
            None => panic!("no element for {css}"),
        }
    }

    #[test]
    fn text_nodes_have_no_attributes() {
        let doc = Document::from(r#"<p id="x">hello</p>"#);
        let p = first_element(&doc, "p");
        let Some(text) = p.children(true).i(0).copied() else {
            panic!("expected a text child");
        };
        assert!(matches!(text, Node::Text(_)));
        assert_eq!(text.qualified_name(), "#text");
        assert_eq!(text.attribute("id"), None);
        assert!(!text.has_attr("id"));
        assert_eq!(p.attribute("id").as_deref(), Some("x"));
    }

    #[test]
    fn attr_is_cleaned() {
        let doc = Document::from("<p title='  a \t  b  '>x</p>");
        let p = first_element(&doc, "p");
        assert_eq!(p.attr("title"), "a b");
        assert_eq!(p.attr("missing"), "");
    }

    #[test]
    fn children_skip_text_and_comments_by_default() {
        let doc = Document::from("<div>a<b>1</b><!-- c --><i>2</i>z</div>");
        let div = first_element(&doc, "div");
        let names: Vec<_> = div.children(false).iter().map(Node::qualified_name).collect();
        assert_eq!(names, vec!["b", "i"]);
        assert_eq!(div.children(true).len(), 4);
    }

    #[test]
    fn siblings_skip_comments() {
        let doc = Document::from("<div><b>1</b> <!-- c --><i>2</i></div>");
        let b = first_element(&doc, "b");
        assert_eq!(b.next_sibling(false).map(|n| n.qualified_name()).as_deref(), Some("i"));
        assert!(matches!(b.next_sibling(true), Some(Node::Text(_))));

        let i = first_element(&doc, "i");
        assert_eq!(i.prev_sibling(false).map(|n| n.qualified_name()).as_deref(), Some("b"));
        assert!(i.next_sibling(true).is_none());
    }

    #[test]
    fn text_runs_through_normalizer() {
        let doc = Document::from("<div><p>One</p><p>Two &amp; three</p></div>");
        let div = first_element(&doc, "div");
        assert_eq!(div.text(&TextOptions::default()), "One\n\nTwo & three");
        assert!(div.has_text());
    }

    #[test]
    fn append_attr_respects_glue() {
        let doc = Document::from(r#"<p class="a ">x</p><i>y</i>"#);
        let p = first_element(&doc, "p");
        p.append_attr("class", "b", " ");
        assert_eq!(p.attribute("class").as_deref(), Some("a b"));

        let i = first_element(&doc, "i");
        i.append_attr("data-x", "1", ",");
        assert_eq!(i.attribute("data-x").as_deref(), Some("1"));
        i.append_attr("data-x", "2", ",");
        assert_eq!(i.attribute("data-x").as_deref(), Some("1,2"));
    }

    #[test]
    fn mutation_round_trip() {
        let doc = Document::from(r#"<div><span id="s">old</span></div>"#);
        let span = first_element(&doc, "span");
        span.set_text("new <text>");
        assert_eq!(span.text_content(), "new <text>");
        span.set_attr("data-k", "v");
        assert!(span.has_attr("data-k"));
        span.remove_attr("data-k");
        assert!(!span.has_attr("data-k"));

        span.rename("em");
        assert_eq!(doc.select("em").length(), 1);

        first_element(&doc, "em").remove();
        assert_eq!(doc.select("div").inner_html().to_string(), "");
    }

    #[test]
    fn node_list_indexing() {
        let doc = Document::from("<p>0</p><p>1</p><p>2</p>");
        let list: NodeList = doc
            .select("p")
            .nodes()
            .iter()
            .copied()
            .filter_map(Node::from_ref)
            .collect();

        let text = |n: Option<&Node>| n.map(Node::text_content);
        assert_eq!(text(list.i(0)).as_deref(), Some("0"));
        assert_eq!(text(list.i_end(0)).as_deref(), Some("2"));
        assert_eq!(text(list.get(-1)).as_deref(), Some("2"));
        assert_eq!(text(list.get(-3)).as_deref(), Some("0"));
        assert!(list.get(-4).is_none());
        assert!(list.i_end(3).is_none());
        assert!(list.i_end(usize::MAX).is_none());
        assert!(list.i(3).is_none());
        assert!(list.i_end(3).is_none());
    }
}
