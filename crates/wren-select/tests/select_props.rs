//! Property tests: query results over arbitrary markup.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_dom::{DomTree, NodeId};
use wren_html::parse;
use wren_select::select;

#[derive(Debug, Clone)]
struct Markup(String);

const PIECES: &[&str] = &[
    "<div>", "</div>", "<p>", "</p>", "<b>", "</b>", "<a class=x>", "</a>", "<ul>", "<li>",
    "<span id=s>", "</span>", "<table>", "<td>", "text", " ", "<!-- c -->",
];

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 30;
        let mut out = String::new();
        for _ in 0..len {
            out.push_str(g.choose(PIECES).copied().unwrap_or_default());
        }
        Self(out)
    }
}

const QUERIES: &[&str] = &[
    "*", "div p", "p > b", "a, b", "li + li", "b ~ a", ".x", "#s", ":has(b)", ":not(div)",
    "li:nth-child(odd)", "div, p b, span",
];

/// Position of every node in a depth-first walk of the document.
fn document_order(tree: &DomTree) -> Vec<NodeId> {
    tree.descendants(NodeId::ROOT).collect()
}

#[quickcheck]
fn prop_universal_selects_every_element(markup: Markup) -> bool {
    let tree = parse(&markup.0, "");
    select(&tree, NodeId::ROOT, "*").unwrap().as_slice() == tree.all_elements(NodeId::ROOT)
}

#[quickcheck]
fn prop_results_are_unique_and_in_document_order(markup: Markup) -> bool {
    let tree = parse(&markup.0, "");
    let order = document_order(&tree);
    QUERIES.iter().all(|query| {
        let found = select(&tree, NodeId::ROOT, query).unwrap();
        let positions: Vec<usize> = found
            .iter()
            .filter_map(|node| order.iter().position(|&n| n == node))
            .collect();
        positions.len() == found.len() && positions.windows(2).all(|w| w[0] < w[1])
    })
}

#[quickcheck]
fn prop_union_matches_either_branch(markup: Markup) -> bool {
    let tree = parse(&markup.0, "");
    let union = select(&tree, NodeId::ROOT, "a, b").unwrap();
    let expected: Vec<NodeId> = tree
        .all_elements(NodeId::ROOT)
        .into_iter()
        .filter(|&e| tree.is_named(e, "a") || tree.is_named(e, "b"))
        .collect();
    union.as_slice() == expected
}
