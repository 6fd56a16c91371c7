//! Property tests: the parser accepts any input and always yields a
//! well-formed tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_dom::{DomTree, NodeId};
use wren_html::{parse, parse_fragment};

/// Markup assembled from pieces that exercise the tricky insertion modes:
/// tables, formatting elements, lists, selects and raw text.
#[derive(Debug, Clone)]
struct TagSoup(String);

const PIECES: &[&str] = &[
    "<table>", "</table>", "<tr>", "</tr>", "<td>", "</td>", "<th>", "<tbody>", "<caption>",
    "<colgroup>", "<col>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<p>", "</p>",
    "<div>", "</div>", "<ul>", "<li>", "</li>", "<select>", "<option>", "<optgroup>",
    "</select>", "<form>", "</form>", "<br/>", "</br>", "<frameset>", "<frame>", "<head>",
    "</body>", "</html>", "<html lang=en>", "<title>", "</title>", "<script>", "</script>",
    "<textarea>", "<pre>", "<!-- c -->", "<!DOCTYPE html>", "<nobr>", "<button>", "<h1>",
    "<h2>", "</h1>", "<svg>", "<isindex>", "<image>", "text", " ", "\n", "&amp;", "&lt",
    "\0", "<", "</", "<![CDATA[x]]>", "<?pi?>",
];

impl Arbitrary for TagSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        let mut out = String::new();
        for _ in 0..len {
            out.push_str(g.choose(PIECES).copied().unwrap_or_default());
        }
        Self(out)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

/// Every child's parent points back and its sibling index is its position.
fn is_well_formed(tree: &DomTree) -> bool {
    tree.descendants(NodeId::ROOT).all(|node| {
        tree.children(node).iter().enumerate().all(|(index, &child)| {
            tree.parent(child) == Some(node) && tree.sibling_index(child) == index
        })
    })
}

#[quickcheck]
fn prop_arbitrary_text_parses(input: String) -> bool {
    is_well_formed(&parse(&input, ""))
}

#[quickcheck]
fn prop_tag_soup_parses_into_well_formed_tree(soup: TagSoup) -> bool {
    let tree = parse(&soup.0, "");
    is_well_formed(&tree) && tree.find_html().is_some()
}

#[quickcheck]
fn prop_tag_soup_fragments_are_detached(soup: TagSoup) -> bool {
    let (tree, nodes) = parse_fragment(&soup.0, Some("div"), "");
    is_well_formed(&tree) && nodes.iter().all(|&n| tree.parent(n).is_none())
}

#[quickcheck]
fn prop_text_without_markup_survives(words: Vec<u8>) -> bool {
    let text: String = words
        .iter()
        .map(|b| if b % 5 == 0 { ' ' } else { char::from(b'a' + b % 26) })
        .collect();
    let mut tree = parse(&text, "");
    let body = tree.body();
    tree.text(body) == text.split_whitespace().collect::<Vec<_>>().join(" ")
}
