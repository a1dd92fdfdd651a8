//! Chain resolver.
//!
//! A [`SelectorChain`] is an ordered list of `(selector, pick index)` steps.
//! Each step searches below the node picked by the previous one, so a chain
//! like `[("div.outer", Some(0)), ("span.inner", Some(-1))]` reads as "the last
//! `span.inner` inside the first `div.outer`".
//!
//! Resolution never errors for "not found". The outcome carries the value
//! plus, on failure, a `"<selector> => <index>"` description of the step
//! that came up empty or out of range.

use dom_query::NodeRef;

use crate::error::Result;
use crate::node::{Node, NodeList};
use crate::selector;

/// Ordered selector steps. A step without an index ends the chain and
/// yields its whole match set.
///
/// # Example
///
/// ```rust
/// use rs_dom_chain::SelectorChain;
///
/// let chain = SelectorChain::new()
///     .then(".details", 0)
///     .then(".price", -1)
///     .then_all(".discount");
/// assert_eq!(chain.len(), 3);
///
/// let same: SelectorChain = [(".details", Some(0)), (".price", Some(-1)), (".discount", None)].into();
/// assert_eq!(chain, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorChain {
    steps: Vec<(String, Option<isize>)>,
}

impl SelectorChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step that picks the match at `index` (negative counts from the end).
    #[must_use]
    pub fn then(mut self, selector: impl Into<String>, index: isize) -> Self {
        self.steps.push((selector.into(), Some(index)));
        self
    }

    /// Adds a terminal step that keeps every match.
    #[must_use]
    pub fn then_all(mut self, selector: impl Into<String>) -> Self {
        self.steps.push((selector.into(), None));
        self
    }

    pub fn push(&mut self, selector: impl Into<String>, index: Option<isize>) {
        self.steps.push((selector.into(), index));
    }

    #[must_use]
    pub fn steps(&self) -> &[(String, Option<isize>)] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A single selector is a one-step chain keeping every match.
impl From<&str> for SelectorChain {
    fn from(selector: &str) -> Self {
        Self::new().then_all(selector)
    }
}

impl From<String> for SelectorChain {
    fn from(selector: String) -> Self {
        Self::new().then_all(selector)
    }
}

impl<S: Into<String>, const N: usize> From<[(S, Option<isize>); N]> for SelectorChain {
    fn from(steps: [(S, Option<isize>); N]) -> Self {
        steps.into_iter().collect()
    }
}

impl<S: Into<String>> From<Vec<(S, Option<isize>)>> for SelectorChain {
    fn from(steps: Vec<(S, Option<isize>)>) -> Self {
        steps.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Option<isize>)> for SelectorChain {
    fn from_iter<I: IntoIterator<Item = (S, Option<isize>)>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().map(|(s, i)| (s.into(), i)).collect(),
        }
    }
}

/// Outcome of a chain resolution.
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// The resolved value; empty or `None` on failure.
    pub value: T,
    /// `"<selector> => <index>"` for the step that failed, if any.
    pub failed: Option<String>,
}

impl<T> Resolution<T> {
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Maps a signed pick index onto `0..len`: 0 is the first match, -1 the last.
///
/// ```rust
/// use rs_dom_chain::chain::resolve_index;
///
/// assert_eq!(resolve_index(5, -1), Some(4));
/// assert_eq!(resolve_index(5, -5), Some(0));
/// assert_eq!(resolve_index(5, -6), None);
/// assert_eq!(resolve_index(5, 5), None);
/// ```
#[must_use]
pub fn resolve_index(len: usize, pick: isize) -> Option<usize> {
    let position = if pick >= 0 {
        pick.unsigned_abs()
    } else {
        len.checked_sub(pick.unsigned_abs())?
    };
    (position < len).then_some(position)
}

/// Resolves a chain to a node list.
///
/// Returns the matches of the first step without an index. If every step
/// has one, returns the matches of the last step once its index proved
/// valid. Any empty step or out-of-range index yields an empty list.
///
/// `start` defaults to `root`.
///
/// # Errors
///
/// [`Error::InvalidSelector`](crate::Error::InvalidSelector) from compiling a step.
pub fn resolve_list<'a>(
    root: NodeRef<'a>,
    chain: &SelectorChain,
    start: Option<&Node<'a>>,
) -> Result<Resolution<NodeList<'a>>> {
    let walk = walk(root, chain, start, Mode::List)?;
    Ok(Resolution {
        value: walk.matches,
        failed: walk.failed,
    })
}

/// Resolves a chain to a single node.
///
/// Every step picks one match; a step without an index picks the first.
///
/// # Errors
///
/// [`Error::InvalidSelector`](crate::Error::InvalidSelector) from compiling a step.
pub fn resolve_one<'a>(
    root: NodeRef<'a>,
    chain: &SelectorChain,
    start: Option<&Node<'a>>,
) -> Result<Resolution<Option<Node<'a>>>> {
    let walk = walk(root, chain, start, Mode::One)?;
    Ok(Resolution {
        value: walk.node,
        failed: walk.failed,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    One,
}

#[derive(Default)]
struct Walk<'a> {
    matches: NodeList<'a>,
    node: Option<Node<'a>>,
    failed: Option<String>,
}

impl Walk<'_> {
    fn failure(selector: &str, pick: Option<isize>, found: usize) -> Self {
        let index = pick.map_or_else(|| "all".to_string(), |i| i.to_string());
        tracing::debug!(selector, index = %index, found, "selector chain step failed");
        Self {
            failed: Some(format!("{selector} => {index}")),
            ..Self::default()
        }
    }
}

fn walk<'a>(
    root: NodeRef<'a>,
    chain: &SelectorChain,
    start: Option<&Node<'a>>,
    mode: Mode,
) -> Result<Walk<'a>> {
    let mut context = start.map_or(root, Node::node_ref);
    let mut walk = Walk::default();

    for (selector, pick) in chain.steps() {
        let pick = match mode {
            Mode::List => *pick,
            Mode::One => Some(pick.unwrap_or(0)),
        };

        let matches = selector::compile(selector)?.execute(context);
        if matches.is_empty() {
            return Ok(Walk::failure(selector, pick, 0));
        }

        let Some(pick) = pick else {
            return Ok(Walk {
                matches,
                node: None,
                failed: None,
            });
        };

        let Some(node) = matches.get(pick).copied() else {
            return Ok(Walk::failure(selector, Some(pick), matches.len()));
        };

        context = node.node_ref();
        walk = Walk {
            matches,
            node: Some(node),
            failed: None,
        };
    }

    Ok(walk)
}
