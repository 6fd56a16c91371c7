//! Depth-first traversal.
//!
//! Both the visitor walk and the descendant iterator are iterative, so very
//! deep trees (which malformed markup can easily produce) do not exhaust the
//! call stack.

use crate::node::NodeId;
use crate::tree::DomTree;

/// Callbacks for a depth-first walk.
pub trait NodeVisitor {
    /// Called when a node is first reached, before its children.
    fn head(&mut self, tree: &DomTree, node: NodeId, depth: usize);

    /// Called after all of a node's children have been visited.
    fn tail(&mut self, _tree: &DomTree, _node: NodeId, _depth: usize) {}
}

impl DomTree {
    /// Walk the subtree rooted at `root` depth-first, calling `head` on the
    /// way down and `tail` on the way up.
    pub fn traverse<V: NodeVisitor + ?Sized>(&self, root: NodeId, visitor: &mut V) {
        let mut node = root;
        let mut depth = 0;
        loop {
            visitor.head(self, node, depth);
            if let Some(first) = self.first_child(node) {
                node = first;
                depth += 1;
                continue;
            }
            loop {
                if depth == 0 {
                    visitor.tail(self, node, depth);
                    return;
                }
                visitor.tail(self, node, depth);
                if let Some(next) = self.next_sibling(node) {
                    node = next;
                    break;
                }
                match self.parent(node) {
                    Some(parent) => {
                        node = parent;
                        depth -= 1;
                    }
                    None => return,
                }
            }
        }
    }

    /// The subtree rooted at `root` in document order, `root` included.
    #[must_use]
    pub const fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: Some(root),
        }
    }

    /// Every element in the subtree rooted at `root`, `root` included if it
    /// is an element.
    #[must_use]
    pub fn all_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.is_element(id))
            .collect()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.first_child(current).or_else(|| {
            let mut node = current;
            loop {
                if node == self.root {
                    return None;
                }
                if let Some(sibling) = self.tree.next_sibling(node) {
                    return Some(sibling);
                }
                node = self.tree.parent(node)?;
            }
        });
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ElementData, NodeData};
    use crate::tag::Tag;

    fn element(tree: &mut DomTree, name: &str) -> NodeId {
        tree.alloc(NodeData::Element(ElementData::new(Tag::html(name))))
    }

    struct Recorder(Vec<String>);

    impl NodeVisitor for Recorder {
        fn head(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
            self.0.push(format!("+{}@{depth}", tree.node_name(node)));
        }

        fn tail(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
            self.0.push(format!("-{}@{depth}", tree.node_name(node)));
        }
    }

    #[test]
    fn test_traverse_order() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let p = element(&mut tree, "p");
        let span = element(&mut tree, "span");
        tree.append_child(NodeId::ROOT, div);
        tree.append_child(div, p);
        tree.append_child(div, span);

        let mut recorder = Recorder(Vec::new());
        tree.traverse(div, &mut recorder);
        assert_eq!(
            recorder.0,
            ["+div@0", "+p@1", "-p@1", "+span@1", "-span@1", "-div@0"]
        );
    }

    #[test]
    fn test_descendants_stay_inside_root() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let c = element(&mut tree, "c");
        let d = element(&mut tree, "d");
        tree.append_child(NodeId::ROOT, a);
        tree.append_child(a, b);
        tree.append_child(b, c);
        tree.append_child(NodeId::ROOT, d);

        let order: Vec<NodeId> = tree.descendants(b).collect();
        assert_eq!(order, [b, c]);
        let all: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
        assert_eq!(all, [NodeId::ROOT, a, b, c, d]);
    }
}
