//! An ordered list of selected elements, with bulk accessors and mutators.
//!
//! [`Elements`] holds node ids only; every operation takes the tree it was
//! selected from.

use std::collections::HashSet;

use wren_dom::{DomTree, NodeId};

use crate::Selector;
use crate::error::SelectorParseError;

/// Elements in document order, as returned by a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elements(Vec<NodeId>);

impl Elements {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the element ids.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.0.iter().copied()
    }

    /// The ids as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.0.get(index).copied()
    }

    /// The first element.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.0.first().copied()
    }

    /// The last element.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    /// A list holding only the element at `index`, or an empty list.
    #[must_use]
    pub fn eq(&self, index: usize) -> Self {
        self.get(index).into_iter().collect()
    }

    // ===== Text and markup =====

    /// The combined text of every element, separated by single spaces.
    #[must_use]
    pub fn text(&self, tree: &DomTree) -> String {
        self.iter()
            .map(|element| tree.text(element))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The text of each element that has any.
    #[must_use]
    pub fn each_text(&self, tree: &DomTree) -> Vec<String> {
        self.iter()
            .filter(|&element| tree.has_text(element))
            .map(|element| tree.text(element))
            .collect()
    }

    /// Whether any element has non-blank text.
    #[must_use]
    pub fn has_text(&self, tree: &DomTree) -> bool {
        self.iter().any(|element| tree.has_text(element))
    }

    /// The inner HTML of every element, one per line.
    #[must_use]
    pub fn html(&self, tree: &DomTree) -> String {
        self.iter()
            .map(|element| tree.html(element))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The outer HTML of every element, one per line.
    #[must_use]
    pub fn outer_html(&self, tree: &DomTree) -> String {
        self.iter()
            .map(|element| tree.outer_html(element))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ===== Attributes =====

    /// The value of `key` on the first element that has it, or `""`.
    #[must_use]
    pub fn attr(&self, tree: &DomTree, key: &str) -> String {
        self.iter()
            .find_map(|element| tree.attr(element, key))
            .unwrap_or_default()
    }

    /// The value of `key` on each element that has it.
    #[must_use]
    pub fn each_attr(&self, tree: &DomTree, key: &str) -> Vec<String> {
        self.iter()
            .filter_map(|element| tree.attr(element, key))
            .collect()
    }

    /// Whether any element has `key`.
    #[must_use]
    pub fn has_attr(&self, tree: &DomTree, key: &str) -> bool {
        self.iter().any(|element| tree.has_attr(element, key))
    }

    /// Whether any element has the class (case-insensitive).
    #[must_use]
    pub fn has_class(&self, tree: &DomTree, class_name: &str) -> bool {
        self.iter().any(|element| tree.has_class(element, class_name))
    }

    /// Set `key` to `value` on every element.
    pub fn set_attr(&self, tree: &mut DomTree, key: &str, value: &str) -> &Self {
        for element in self.iter() {
            tree.set_attr(element, key, value);
        }
        self
    }

    /// Remove `key` from every element.
    pub fn remove_attr(&self, tree: &mut DomTree, key: &str) -> &Self {
        for element in self.iter() {
            let _ = tree.remove_attr(element, key);
        }
        self
    }

    /// Add the class to every element.
    pub fn add_class(&self, tree: &mut DomTree, class_name: &str) -> &Self {
        for element in self.iter() {
            tree.add_class(element, class_name);
        }
        self
    }

    /// Remove the class from every element.
    pub fn remove_class(&self, tree: &mut DomTree, class_name: &str) -> &Self {
        for element in self.iter() {
            tree.remove_class(element, class_name);
        }
        self
    }

    /// Toggle the class on every element.
    pub fn toggle_class(&self, tree: &mut DomTree, class_name: &str) -> &Self {
        for element in self.iter() {
            tree.toggle_class(element, class_name);
        }
        self
    }

    // ===== Structure =====

    /// Replace the children of every element with `text`.
    pub fn set_text(&self, tree: &mut DomTree, text: &str) -> &Self {
        for element in self.iter() {
            let _ = tree.set_text(element, text);
        }
        self
    }

    /// Remove the children of every element.
    pub fn empty(&self, tree: &mut DomTree) -> &Self {
        for element in self.iter() {
            tree.empty(element);
        }
        self
    }

    /// Detach every element from its parent.
    pub fn remove(&self, tree: &mut DomTree) -> &Self {
        for element in self.iter() {
            tree.remove(element);
        }
        self
    }

    /// The element ancestors of every element, each once, nearest first.
    #[must_use]
    pub fn parents(&self, tree: &DomTree) -> Self {
        let mut seen = HashSet::new();
        self.iter()
            .flat_map(|element| tree.parents(element))
            .filter(|&parent| seen.insert(parent))
            .collect()
    }

    // ===== Queries =====

    /// Elements matching `query` under any element in this list (each list
    /// element included), in list order without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError`] if `query` is invalid.
    pub fn select(&self, tree: &DomTree, query: &str) -> Result<Self, SelectorParseError> {
        let selector = Selector::parse(query)?;
        let mut seen = HashSet::new();
        Ok(self
            .iter()
            .flat_map(|root| selector.select(tree, root))
            .filter(|&found| seen.insert(found))
            .collect())
    }

    /// Whether any element matches `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError`] if `query` is invalid.
    pub fn is(&self, tree: &DomTree, query: &str) -> Result<bool, SelectorParseError> {
        let selector = Selector::parse(query)?;
        Ok(self.iter().any(|element| selector.matches(tree, element)))
    }

    /// The elements that match `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError`] if `query` is invalid.
    pub fn filter(&self, tree: &DomTree, query: &str) -> Result<Self, SelectorParseError> {
        let selector = Selector::parse(query)?;
        Ok(self
            .iter()
            .filter(|&element| selector.matches(tree, element))
            .collect())
    }

    /// The elements that do not match `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError`] if `query` is invalid.
    pub fn not(&self, tree: &DomTree, query: &str) -> Result<Self, SelectorParseError> {
        let selector = Selector::parse(query)?;
        Ok(self
            .iter()
            .filter(|&element| !selector.matches(tree, element))
            .collect())
    }
}

impl FromIterator<NodeId> for Elements {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<NodeId>> for Elements {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }
}

impl From<Elements> for Vec<NodeId> {
    fn from(elements: Elements) -> Self {
        elements.0
    }
}

impl IntoIterator for Elements {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Elements {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
