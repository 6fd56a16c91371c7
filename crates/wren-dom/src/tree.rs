//! The arena tree and its structural mutations.

use crate::error::DomError;
use crate::node::{DocumentData, ElementData, Node, NodeData, NodeId};
use crate::settings::OutputSettings;

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// All nodes live in one vector and refer to each other by [`NodeId`]. Nodes
/// detached by a mutation stay allocated (with no parent) so ids held by the
/// caller remain valid; they can be re-inserted later.
///
/// Every structural mutation keeps two invariants:
/// - a node has at most one parent, and appears once in that parent's children
/// - `sibling_index` equals the node's position in its parent's children
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_document(DocumentData::default())
    }

    /// Create a tree whose document resolves relative URLs against `base_uri`.
    #[must_use]
    pub fn with_base_uri(base_uri: &str) -> Self {
        Self::with_document(DocumentData {
            base_uri: base_uri.to_string(),
            ..DocumentData::default()
        })
    }

    /// Create a tree with the given document data.
    #[must_use]
    pub fn with_document(data: DocumentData) -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document(data))],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    ///
    /// Only the node's data is mutable through this; structure changes go
    /// through the tree's mutation methods.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes allocated in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// The data of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Mutable data of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0].data
    }

    /// The document node's data.
    ///
    /// # Panics
    ///
    /// Panics if the root node is not a document, which the constructors
    /// rule out.
    #[must_use]
    pub fn document_data(&self) -> &DocumentData {
        match &self.nodes[0].data {
            NodeData::Document(data) => data,
            _ => unreachable!("root node is always a document"),
        }
    }

    /// Mutable document node data.
    ///
    /// # Panics
    ///
    /// Panics if the root node is not a document, which the constructors
    /// rule out.
    pub fn document_data_mut(&mut self) -> &mut DocumentData {
        match &mut self.nodes[0].data {
            NodeData::Document(data) => data,
            _ => unreachable!("root node is always a document"),
        }
    }

    /// Output settings of the document.
    #[must_use]
    pub fn output_settings(&self) -> &OutputSettings {
        &self.document_data().output_settings
    }

    /// Mutable output settings of the document.
    pub fn output_settings_mut(&mut self) -> &mut OutputSettings {
        &mut self.document_data_mut().output_settings
    }

    /// Base URI of the document.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.document_data().base_uri
    }

    /// Change the base URI of the document.
    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        self.document_data_mut().base_uri = base_uri.into();
    }

    // ===== Navigation =====

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Number of child nodes.
    #[must_use]
    pub fn child_node_size(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// The child at `index`.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of the node among its parent's children (0 when detached).
    #[must_use]
    pub fn sibling_index(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |n| n.sibling_index)
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.child(parent, self.sibling_index(id) + 1)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.sibling_index(id).checked_sub(1)?;
        self.child(parent, index)
    }

    /// The other children of this node's parent.
    #[must_use]
    pub fn sibling_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.parent(id).map_or_else(Vec::new, |parent| {
            self.children(parent)
                .iter()
                .copied()
                .filter(|&c| c != id)
                .collect()
        })
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Whether the node is attached, directly or not, to the document.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.is_descendant_of(id, NodeId::ROOT)
    }

    // ===== Element views =====

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// True if `id` is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Tag name as printed, for elements.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(ElementData::tag_name)
    }

    /// Lower-case tag name, for elements.
    #[must_use]
    pub fn normal_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(ElementData::normal_name)
    }

    /// Whether `id` is an element named `name` (lower-case comparison).
    #[must_use]
    pub fn is_named(&self, id: NodeId, name: &str) -> bool {
        self.normal_name(id) == Some(name)
    }

    /// The DOM `nodeName`.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        self.get(id).map_or("", |n| n.data.node_name())
    }

    /// The element children of a node, cached until the next structural change.
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> &[NodeId] {
        let Some(node) = self.get(id) else {
            return &[];
        };
        node.element_children.get_or_init(|| {
            node.children
                .iter()
                .copied()
                .filter(|&c| self.nodes[c.0].data.is_element())
                .collect()
        })
    }

    /// The element child at `index`.
    #[must_use]
    pub fn child_element(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.element_children(id).get(index).copied()
    }

    /// Number of element children.
    #[must_use]
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).len()
    }

    /// Position of this element among its parent's element children.
    #[must_use]
    pub fn element_sibling_index(&self, id: NodeId) -> usize {
        self.parent(id).map_or(0, |parent| {
            self.element_children(parent)
                .iter()
                .position(|&c| c == id)
                .unwrap_or(0)
        })
    }

    /// The next sibling that is an element.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.element_children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// The previous sibling that is an element.
    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.element_children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// The first element among this node's siblings (possibly itself).
    #[must_use]
    pub fn first_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.element_children(parent).first().copied()
    }

    /// The last element among this node's siblings (possibly itself).
    #[must_use]
    pub fn last_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.element_children(parent).last().copied()
    }

    /// Sibling elements, excluding this node.
    #[must_use]
    pub fn sibling_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.parent(id).map_or_else(Vec::new, |parent| {
            self.element_children(parent)
                .iter()
                .copied()
                .filter(|&c| c != id)
                .collect()
        })
    }

    /// Element ancestors from parent outwards (the document excluded).
    #[must_use]
    pub fn parents(&self, id: NodeId) -> Vec<NodeId> {
        self.ancestors(id).filter(|&a| self.is_element(a)).collect()
    }

    // ===== Structural mutation =====

    fn invalidate(&mut self, parent: NodeId) {
        let _ = self.nodes[parent.0].element_children.take();
    }

    fn reindex_children(&mut self, parent: NodeId, start: usize) {
        for index in start..self.nodes[parent.0].children.len() {
            let child = self.nodes[parent.0].children[index];
            self.nodes[child.0].sibling_index = index;
        }
    }

    /// Detach `child` from its current parent, if any.
    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes[child.0].parent else {
            return;
        };
        let index = self.nodes[child.0].sibling_index;
        let _ = self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
        self.nodes[child.0].sibling_index = 0;
        self.invalidate(parent);
        self.reindex_children(parent, index);
    }

    fn check_hierarchy(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if child == parent || self.is_descendant_of(parent, child) {
            Err(DomError::HierarchyRequest(child))
        } else {
            Ok(())
        }
    }

    /// Insert already-validated nodes at `index` of `parent`'s children.
    fn splice_in(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for &node in nodes {
            self.detach(node);
        }
        // Detaching may have shifted the insertion point if a node was already
        // a child of `parent` before `index`.
        let index = index.min(self.nodes[parent.0].children.len());
        let tail = self.nodes[parent.0].children.split_off(index);
        for &node in nodes {
            self.nodes[parent.0].children.push(node);
            self.nodes[node.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.extend(tail);
        self.invalidate(parent);
        self.reindex_children(parent, index);
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// # Panics
    ///
    /// Panics if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            self.check_hierarchy(parent, child).is_ok(),
            "cannot append {child:?} into its own subtree"
        );
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].sibling_index = self.nodes[parent.0].children.len() - 1;
        self.invalidate(parent);
    }

    /// Insert `child` as the first child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `child` is `parent` or one of its ancestors.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            self.check_hierarchy(parent, child).is_ok(),
            "cannot prepend {child:?} into its own subtree"
        );
        self.splice_in(parent, 0, &[child]);
    }

    /// Insert `nodes` into `parent` starting at child position `index`.
    ///
    /// The nodes keep their given order and are detached from wherever they
    /// were before.
    ///
    /// # Errors
    ///
    /// [`DomError::IndexOutOfBounds`] if `index` is past the end of the child
    /// list, [`DomError::HierarchyRequest`] if a node would become its own
    /// ancestor, [`DomError::DuplicateNode`] if a node is listed twice.
    pub fn insert_children(
        &mut self,
        parent: NodeId,
        index: usize,
        nodes: &[NodeId],
    ) -> Result<(), DomError> {
        let len = self.child_node_size(parent);
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        for (i, &node) in nodes.iter().enumerate() {
            if nodes[..i].contains(&node) {
                return Err(DomError::DuplicateNode(node));
            }
            self.check_hierarchy(parent, node)?;
        }
        // Count nodes already ahead of `index` in this parent; detaching them
        // moves the insertion point left.
        let shift = nodes
            .iter()
            .filter(|&&n| self.nodes[n.0].parent == Some(parent) && self.nodes[n.0].sibling_index < index)
            .count();
        self.splice_in(parent, index - shift, nodes);
        Ok(())
    }

    /// [§ 4.2.3 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Insert `new_child` into `parent` immediately before `reference`.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAChild`] if `reference` is not a child of `parent`,
    /// [`DomError::HierarchyRequest`] for cycles.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if new_child == reference {
            return Ok(());
        }
        self.check_hierarchy(parent, new_child)?;
        self.detach(new_child);
        let index = self.sibling_index(reference);
        self.splice_in(parent, index, &[new_child]);
        Ok(())
    }

    /// Insert `node` as the previous sibling of `reference`.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] if `reference` is detached.
    pub fn before(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self.parent(reference).ok_or(DomError::NoParent(reference))?;
        self.insert_before(parent, node, reference)
    }

    /// Insert `node` as the next sibling of `reference`.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] if `reference` is detached.
    pub fn after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self.parent(reference).ok_or(DomError::NoParent(reference))?;
        if node == reference {
            return Ok(());
        }
        self.check_hierarchy(parent, node)?;
        self.detach(node);
        let index = self.sibling_index(reference) + 1;
        self.splice_in(parent, index, &[node]);
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Remove `child` from `parent`. The child stays allocated, detached.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAChild`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Detach a node from its parent. Does nothing for detached nodes.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// [§ 4.2.3 Replace](https://dom.spec.whatwg.org/#concept-node-replace)
    ///
    /// Put `new_child` where `old_child` is; `old_child` ends up detached.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAChild`] if `old_child` is not a child of `parent`,
    /// [`DomError::HierarchyRequest`] for cycles.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old_child: NodeId,
        new_child: NodeId,
    ) -> Result<(), DomError> {
        if old_child == new_child {
            return Ok(());
        }
        self.insert_before(parent, new_child, old_child)?;
        self.detach(old_child);
        Ok(())
    }

    /// Replace `old` in its parent by `new`.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] if `old` is detached.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        let parent = self.parent(old).ok_or(DomError::NoParent(old))?;
        self.replace_child(parent, old, new)
    }

    /// Detach every child of `id`.
    pub fn empty(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
            self.nodes[child.0].sibling_index = 0;
        }
        self.invalidate(id);
    }

    /// Move all children of `from` to the end of `to`, keeping their order.
    ///
    /// # Panics
    ///
    /// Panics if `to` is inside `from`'s subtree.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        assert!(
            to != from && !self.is_descendant_of(to, from),
            "cannot move children of {from:?} into its own subtree"
        );
        let children = std::mem::take(&mut self.nodes[from.0].children);
        self.invalidate(from);
        let start = self.nodes[to.0].children.len();
        for &child in &children {
            self.nodes[child.0].parent = Some(to);
        }
        self.nodes[to.0].children.extend(children);
        self.invalidate(to);
        self.reindex_children(to, start);
    }

    /// Replace `id` by its children, returning the first of them.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] if `id` is detached.
    pub fn unwrap(&mut self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        let parent = self.parent(id).ok_or(DomError::NoParent(id))?;
        let index = self.sibling_index(id);
        let first = self.first_child(id);
        let children = std::mem::take(&mut self.nodes[id.0].children);
        self.invalidate(id);
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        self.splice_in(parent, index, &children);
        self.detach(id);
        Ok(first)
    }

    /// Wrap `node` in an already built wrapper structure.
    ///
    /// `wrappers` are the top-level nodes of the wrapper fragment. The first
    /// element among them takes `node`'s place; `node` is moved into its
    /// deepest first-child element; the remaining wrapper nodes follow the
    /// wrapper as siblings.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] when `node` is detached, [`DomError::EmptyWrapper`]
    /// when `wrappers` holds no element.
    pub fn wrap_with(&mut self, node: NodeId, wrappers: &[NodeId]) -> Result<NodeId, DomError> {
        let parent = self.parent(node).ok_or(DomError::NoParent(node))?;
        let wrap = wrappers
            .iter()
            .copied()
            .find(|&w| self.is_element(w))
            .ok_or(DomError::EmptyWrapper)?;

        let deepest = self.deepest_first_element(wrap);
        self.replace_child(parent, node, wrap)?;
        self.append_child(deepest, node);

        let mut anchor = wrap;
        for &remainder in wrappers {
            if remainder == wrap {
                continue;
            }
            self.after(anchor, remainder)?;
            anchor = remainder;
        }
        Ok(wrap)
    }

    fn deepest_first_element(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self.element_children(id).first() {
            id = child;
        }
        id
    }

    /// Copy a node and its whole subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let mut pending: Vec<(NodeId, NodeId)> = self
            .children(id)
            .iter()
            .rev()
            .map(|&c| (c, copy))
            .collect();
        while let Some((source, parent)) = pending.pop() {
            let cloned = self.shallow_clone(source);
            self.append_child(parent, cloned);
            pending.extend(self.children(source).iter().rev().map(|&c| (c, cloned)));
        }
        copy
    }

    /// Copy a node without its children. The copy is detached.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let data = self.nodes[id.0].data.clone();
        self.alloc(data)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
