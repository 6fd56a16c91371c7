//! Debug rendering of a parsed tree, one node per line.

use std::fmt::Write as _;

use wren_dom::{DomTree, NodeData, NodeId, NodeVisitor};

struct TreeDumper {
    out: String,
}

impl NodeVisitor for TreeDumper {
    fn head(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
        let prefix = "  ".repeat(depth);
        let _ = match tree.data(node) {
            NodeData::Document(_) => writeln!(self.out, "{prefix}#document"),
            NodeData::Element(data) => {
                if data.attrs.is_empty() {
                    writeln!(self.out, "{prefix}<{}>", data.tag_name())
                } else {
                    let attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|attr| {
                            if attr.value.is_empty() {
                                attr.key.clone()
                            } else {
                                format!("{}=\"{}\"", attr.key, attr.value)
                            }
                        })
                        .collect();
                    writeln!(self.out, "{prefix}<{} {}>", data.tag_name(), attrs.join(" "))
                }
            }
            NodeData::Text(text) => {
                let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(self.out, "{prefix}\"{display}\"")
            }
            NodeData::Data(data) => writeln!(self.out, "{prefix}#data \"{}\"", data.replace('\n', "\\n")),
            NodeData::Comment(data) => writeln!(self.out, "{prefix}<!-- {data} -->"),
            NodeData::CData(data) => writeln!(self.out, "{prefix}<![CDATA[{data}]]>"),
            NodeData::DocumentType(doctype) => writeln!(self.out, "{prefix}<!DOCTYPE {}>", doctype.name),
            NodeData::XmlDeclaration(declaration) => {
                writeln!(self.out, "{prefix}<?{}>", declaration.name)
            }
        };
    }
}

/// Render the subtree at `root` as an indented outline: elements with their
/// attributes, text in quotes with spaces shown as `·`.
///
/// ```
/// let tree = wren_html::parse("<p class=x>a b</p>", "");
/// let outline = wren_html::dump_tree(&tree, wren_dom::NodeId::ROOT);
/// assert!(outline.contains("      <p class=\"x\">\n        \"a·b\""));
/// ```
#[must_use]
pub fn dump_tree(tree: &DomTree, root: NodeId) -> String {
    let mut dumper = TreeDumper { out: String::new() };
    tree.traverse(root, &mut dumper);
    dumper.out
}
