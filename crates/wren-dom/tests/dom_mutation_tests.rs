//! Tests for DOM tree mutation methods and the sibling-index invariant.

use wren_dom::{DomError, DomTree, ElementData, NodeData, NodeId, Tag};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeData::Element(ElementData::new(Tag::html(tag))))
}

/// Helper to check every child of `parent` knows its own position.
fn assert_indexed(tree: &DomTree, parent: NodeId) {
    for (index, &child) in tree.children(parent).iter().enumerate() {
        assert_eq!(tree.sibling_index(child), index, "child {child:?} of {parent:?}");
        assert_eq!(tree.parent(child), Some(parent));
    }
}

/// Helper to build `<div>` with children a, b, c under the document.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child).unwrap();

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, a).unwrap();

    // b is now first child, c is second
    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_indexed(&tree, parent);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, b).unwrap();

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_indexed(&tree, parent);
}

#[test]
fn test_remove_child_not_a_child() {
    let mut tree = DomTree::new();
    let (parent, _, _, _) = three_children(&mut tree);
    let stranger = alloc_element(&mut tree, "span");

    assert_eq!(
        tree.remove_child(parent, stranger),
        Err(DomError::NotAChild {
            parent,
            child: stranger
        })
    );
}

// ========== insert_before / insert_children ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, a).unwrap();

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_insert_before_moves_existing_sibling() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_before(parent, c, a).unwrap();

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_insert_children_at_index() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");
    let y = alloc_element(&mut tree, "y");

    tree.insert_children(parent, 1, &[x, y]).unwrap();

    assert_eq!(tree.children(parent), &[a, x, y, b, c]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_insert_children_reorders_existing() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_children(parent, 3, &[a]).unwrap();

    assert_eq!(tree.children(parent), &[b, c, a]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_insert_children_out_of_bounds() {
    let mut tree = DomTree::new();
    let (parent, _, _, _) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    assert_eq!(
        tree.insert_children(parent, 4, &[x]),
        Err(DomError::IndexOutOfBounds { index: 4, len: 3 })
    );
    assert_eq!(tree.parent(x), None);
}

#[test]
fn test_insert_children_rejects_repeated_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    assert_eq!(
        tree.insert_children(parent, 0, &[x, a, x]),
        Err(DomError::DuplicateNode(x))
    );
    // Nothing moved.
    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.parent(x), None);

    tree.remove(a);
    assert_eq!(tree.children(parent), &[b, c]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_insert_ancestor_is_rejected() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);

    assert_eq!(
        tree.insert_children(a, 0, &[parent]),
        Err(DomError::HierarchyRequest(parent))
    );
}

// ========== append / prepend / reparenting ==========

#[test]
fn test_append_reparents() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_indexed(&tree, parent);
    assert_indexed(&tree, other);
}

#[test]
fn test_prepend_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.prepend_child(parent, x);

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_indexed(&tree, parent);
}

#[test]
#[should_panic(expected = "own subtree")]
fn test_append_into_self_panics() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);
    tree.append_child(a, parent);
}

// ========== replace / before / after ==========

#[test]
fn test_replace_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.replace_child(parent, b, x).unwrap();

    assert_eq!(tree.children(parent), &[a, x, c]);
    assert_eq!(tree.parent(b), None);
    assert_indexed(&tree, parent);
}

#[test]
fn test_before_and_after() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");
    let y = alloc_element(&mut tree, "y");

    tree.before(b, x).unwrap();
    tree.after(b, y).unwrap();

    assert_eq!(tree.children(parent), &[a, x, b, y, c]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_after_detached_is_error() {
    let mut tree = DomTree::new();
    let x = alloc_element(&mut tree, "x");
    let y = alloc_element(&mut tree, "y");
    assert_eq!(tree.after(x, y), Err(DomError::NoParent(x)));
}

// ========== move_children / empty ==========

#[test]
fn test_move_children_basic() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(from, a);
    tree.append_child(from, b);

    tree.move_children(from, to);

    // from should be empty
    assert_eq!(tree.children(from).len(), 0);
    // to should have both children
    assert_eq!(tree.children(to), &[a, b]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.parent(b), Some(to));
}

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);

    let moved = alloc_element(&mut tree, "y");
    tree.append_child(from, moved);

    tree.move_children(from, to);

    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));
    assert_indexed(&tree, to);
}

#[test]
fn test_empty_detaches_children() {
    let mut tree = DomTree::new();
    let (parent, a, _, c) = three_children(&mut tree);

    tree.empty(parent);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.parent(c), None);
    assert_eq!(tree.child_element_count(parent), 0);
}

// ========== wrap / unwrap ==========

#[test]
fn test_unwrap_splices_children() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let inner1 = alloc_element(&mut tree, "i");
    let inner2 = tree.append_text(b, "text");
    tree.prepend_child(b, inner1);

    let first = tree.unwrap(b).unwrap();

    assert_eq!(first, Some(inner1));
    assert_eq!(tree.children(parent), &[a, inner1, inner2, c]);
    assert_eq!(tree.parent(b), None);
    assert_indexed(&tree, parent);
}

#[test]
fn test_wrap_with_nested_wrapper() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let outer = alloc_element(&mut tree, "div");
    let inner = alloc_element(&mut tree, "span");
    tree.append_child(outer, inner);
    let trailing = alloc_element(&mut tree, "hr");

    let wrap = tree.wrap_with(b, &[outer, trailing]).unwrap();

    assert_eq!(wrap, outer);
    assert_eq!(tree.children(parent), &[a, outer, trailing, c]);
    assert_eq!(tree.children(inner), &[b]);
    assert_indexed(&tree, parent);
}

#[test]
fn test_wrap_with_no_element() {
    let mut tree = DomTree::new();
    let (_, a, _, _) = three_children(&mut tree);
    let text = tree.alloc(NodeData::Text("x".into()));
    assert_eq!(tree.wrap_with(a, &[text]), Err(DomError::EmptyWrapper));
}

// ========== cloning ==========

#[test]
fn test_deep_clone_copies_subtree() {
    let mut tree = DomTree::new();
    let (parent, _, b, _) = three_children(&mut tree);
    let _ = tree.append_text(b, "hello");
    tree.set_attr(parent, "id", "main");

    let copy = tree.deep_clone(parent);

    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.children(copy).len(), 3);
    assert_eq!(tree.attr(copy, "id").as_deref(), Some("main"));
    assert_eq!(tree.text(copy), "hello");
    assert_indexed(&tree, copy);
    // The original is untouched.
    assert_eq!(tree.children(parent).len(), 3);
}

// ========== element children cache ==========

#[test]
fn test_element_children_cache_invalidated() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let _ = tree.append_text(parent, "tail");
    assert_eq!(tree.element_children(parent), &[a, b, c]);

    tree.remove(b);
    assert_eq!(tree.element_children(parent), &[a, c]);
    assert_eq!(tree.element_sibling_index(c), 1);
    assert_eq!(tree.next_element_sibling(a), Some(c));
    assert_eq!(tree.previous_element_sibling(a), None);
}
