//! Property tests: structural invariants hold under arbitrary mutation
//! sequences.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_dom::{DomTree, NodeId};

/// One mutation, with node choices given as raw numbers reduced modulo the
/// current pool size when applied.
#[derive(Debug, Clone)]
enum Op {
    Append(usize, usize),
    Prepend(usize, usize),
    Insert(usize, usize, Vec<usize>),
    Remove(usize),
    Unwrap(usize),
    Wrap(usize),
    Empty(usize),
    Before(usize, usize),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let a = usize::arbitrary(g);
        let b = usize::arbitrary(g);
        let c = usize::arbitrary(g);
        match u8::arbitrary(g) % 8 {
            0 => Self::Append(a, b),
            1 => Self::Prepend(a, b),
            // Small picks so the same node often shows up twice.
            2 => Self::Insert(a, b, vec![c, c % 3, usize::arbitrary(g) % 3]),
            3 => Self::Remove(a),
            4 => Self::Unwrap(a),
            5 => Self::Wrap(a),
            6 => Self::Empty(a),
            _ => Self::Before(a, b),
        }
    }
}

fn pick(pool: &[NodeId], n: usize) -> NodeId {
    pool[n % pool.len()]
}

fn apply(tree: &mut DomTree, pool: &mut Vec<NodeId>, op: &Op) {
    match *op {
        Op::Append(p, c) => {
            let (parent, child) = (pick(pool, p), pick(pool, c));
            if child != parent && !tree.is_descendant_of(parent, child) && child != NodeId::ROOT {
                tree.append_child(parent, child);
            }
        }
        Op::Prepend(p, c) => {
            let (parent, child) = (pick(pool, p), pick(pool, c));
            if child != parent && !tree.is_descendant_of(parent, child) && child != NodeId::ROOT {
                tree.prepend_child(parent, child);
            }
        }
        Op::Insert(p, i, ref picks) => {
            let parent = pick(pool, p);
            let nodes: Vec<NodeId> = picks
                .iter()
                .map(|&c| pick(pool, c))
                .filter(|&n| n != NodeId::ROOT)
                .collect();
            let index = i % (tree.child_node_size(parent) + 1);
            let _ = tree.insert_children(parent, index, &nodes);
        }
        Op::Remove(n) => tree.remove(pick(pool, n)),
        Op::Unwrap(n) => {
            let _ = tree.unwrap(pick(pool, n));
        }
        Op::Wrap(n) => {
            let node = pick(pool, n);
            let wrapper = tree.create_element("span");
            pool.push(wrapper);
            let _ = tree.wrap_with(node, &[wrapper]);
        }
        Op::Empty(n) => tree.empty(pick(pool, n)),
        Op::Before(r, n) => {
            let (reference, node) = (pick(pool, r), pick(pool, n));
            if node != NodeId::ROOT {
                let _ = tree.before(reference, node);
            }
        }
    }
}

fn invariants_hold(tree: &DomTree, pool: &[NodeId]) -> bool {
    pool.iter().all(|&node| {
        let children_ok = tree
            .children(node)
            .iter()
            .enumerate()
            .all(|(i, &c)| tree.sibling_index(c) == i && tree.parent(c) == Some(node));
        let parent_ok = tree
            .parent(node)
            .is_none_or(|p| tree.children(p).iter().filter(|&&c| c == node).count() == 1);
        let cache_ok = tree.element_children(node).len()
            == tree
                .children(node)
                .iter()
                .filter(|&&c| tree.is_element(c))
                .count();
        children_ok && parent_ok && cache_ok
    })
}

#[quickcheck]
fn prop_sibling_index_matches_position(ops: Vec<Op>) -> bool {
    let mut tree = DomTree::new();
    let mut pool = vec![NodeId::ROOT];
    for tag in ["div", "p", "span", "b", "i", "ul", "li"] {
        pool.push(tree.create_element(tag));
    }
    let text = tree.append_text(pool[1], "text");
    pool.push(text);

    for op in &ops {
        apply(&mut tree, &mut pool, op);
        // Touch the cache between mutations so stale caches would show.
        let _ = tree.element_children(pool[1]);
    }
    invariants_hold(&tree, &pool)
}
