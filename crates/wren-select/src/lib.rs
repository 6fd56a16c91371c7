//! CSS-style selector queries over the wren DOM.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id, class and attribute selectors
//!   - The four combinators and selector lists
//!   - Tree-structural pseudo-classes, `:has()` and `:not()`
//!
//! - **Extensions**: `[^prefix]`, `[attr!=v]`, `[attr~=regex]`, the index
//!   pseudo-classes `:lt()`, `:gt()`, `:eq()` and the text pseudo-classes
//!   `:contains()`, `:containsOwn()`, `:containsData()`, `:matches()`,
//!   `:matchesOwn()`
//!
//! # Not Implemented
//!
//! - User-action and link pseudo-classes (`:hover`, `:visited`, ...)
//! - Pseudo-elements and `:nth-child(An+B of S)`
//! - Specificity; queries select, they do not cascade
//!
//! # Example
//!
//! ```
//! use wren_dom::NodeId;
//!
//! let tree = wren_html::parse("<div class=a><p>One</p><p>Two</p></div>", "");
//! let found = wren_select::select(&tree, NodeId::ROOT, "div.a > p:first-child").unwrap();
//! assert_eq!(found.text(&tree), "One");
//! ```

mod collector;
mod elements;
mod error;
/// Selector evaluators.
pub mod evaluator;
/// Query string parsing.
pub mod query_parser;
/// Cursor over a query string.
pub mod token_queue;

use std::fmt;
use std::str::FromStr;

use wren_dom::{DomTree, NodeId};

pub use collector::{collect, find_first};
pub use elements::Elements;
pub use error::SelectorParseError;
pub use evaluator::{Evaluator, Nth};
pub use query_parser::QueryParser;
pub use token_queue::TokenQueue;

/// A parsed query, reusable across trees and roots.
#[derive(Debug, Clone)]
pub struct Selector {
    query: String,
    evaluator: Evaluator,
}

impl Selector {
    /// Parse `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError`] for an empty query, unbalanced
    /// brackets, an unknown pseudo-class, a bad `:nth-*()` argument or an
    /// invalid regex.
    pub fn parse(query: &str) -> Result<Self, SelectorParseError> {
        let query = query.trim();
        Ok(Self {
            evaluator: QueryParser::parse(query)?,
            query: query.to_string(),
        })
    }

    /// The query as written, trimmed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The parsed evaluator tree.
    #[must_use]
    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Every matching element under `root`, `root` included.
    #[must_use]
    pub fn select(&self, tree: &DomTree, root: NodeId) -> Elements {
        collect(&self.evaluator, tree, root)
    }

    /// The first matching element under `root`.
    #[must_use]
    pub fn select_first(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        find_first(&self.evaluator, tree, root)
    }

    /// Whether `element` matches, with the top of its tree as the query root.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.evaluator.matches(tree, tree_root(tree, element), element)
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Self::parse(query)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// The top-most ancestor of `node`: the document for attached nodes, the
/// detached subtree's root otherwise.
fn tree_root(tree: &DomTree, node: NodeId) -> NodeId {
    tree.ancestors(node).last().unwrap_or(node)
}

/// Find the elements under `root` (`root` included) that match `query`.
///
/// # Errors
///
/// Returns [`SelectorParseError`] if `query` is invalid.
pub fn select(tree: &DomTree, root: NodeId, query: &str) -> Result<Elements, SelectorParseError> {
    Ok(Selector::parse(query)?.select(tree, root))
}

/// Find the first element under `root` that matches `query`.
///
/// # Errors
///
/// Returns [`SelectorParseError`] if `query` is invalid.
pub fn select_first(
    tree: &DomTree,
    root: NodeId,
    query: &str,
) -> Result<Option<NodeId>, SelectorParseError> {
    Ok(Selector::parse(query)?.select_first(tree, root))
}

/// Whether `element` matches `query`.
///
/// # Errors
///
/// Returns [`SelectorParseError`] if `query` is invalid.
pub fn is(tree: &DomTree, element: NodeId, query: &str) -> Result<bool, SelectorParseError> {
    Ok(Selector::parse(query)?.matches(tree, element))
}

/// The nearest of `element` and its ancestors that matches `query`.
///
/// # Errors
///
/// Returns [`SelectorParseError`] if `query` is invalid.
pub fn closest(
    tree: &DomTree,
    element: NodeId,
    query: &str,
) -> Result<Option<NodeId>, SelectorParseError> {
    let selector = Selector::parse(query)?;
    Ok(std::iter::once(element)
        .chain(tree.ancestors(element))
        .find(|&candidate| selector.matches(tree, candidate)))
}
