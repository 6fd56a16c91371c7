//! Runs an [`Evaluator`] over a subtree.

use wren_dom::{DomTree, NodeId};

use crate::elements::Elements;
use crate::evaluator::Evaluator;

/// Every element under `root` (`root` included) that `evaluator` matches, in
/// document order. One depth-first pass, so each element appears once.
#[must_use]
pub fn collect(evaluator: &Evaluator, tree: &DomTree, root: NodeId) -> Elements {
    tree.descendants(root)
        .filter(|&node| evaluator.matches(tree, root, node))
        .collect()
}

/// The first element under `root`, in document order, that `evaluator`
/// matches. Stops at the first hit.
#[must_use]
pub fn find_first(evaluator: &Evaluator, tree: &DomTree, root: NodeId) -> Option<NodeId> {
    tree.descendants(root)
        .find(|&node| evaluator.matches(tree, root, node))
}
