//! Text extraction.

use crate::node::{NodeData, NodeId};
use crate::traverse::NodeVisitor;
use crate::tree::DomTree;

/// How many ancestors are checked for a whitespace-preserving tag.
const PRESERVE_WHITESPACE_DEPTH: usize = 6;

/// Whitespace as far as text normalisation is concerned; includes the
/// no-break space.
#[must_use]
pub const fn is_actually_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{000C}' | '\r' | '\u{00A0}')
}

fn last_char_is_whitespace(text: &str) -> bool {
    text.ends_with(' ')
}

/// Append `text` to `out` with runs of whitespace collapsed to one space.
fn append_normalised_whitespace(out: &mut String, text: &str, strip_leading: bool) {
    let mut last_was_white = false;
    let mut reached_non_white = false;
    for c in text.chars() {
        if is_actually_whitespace(c) {
            if (strip_leading && !reached_non_white) || last_was_white {
                continue;
            }
            out.push(' ');
            last_was_white = true;
        } else {
            out.push(c);
            last_was_white = false;
            reached_non_white = true;
        }
    }
}

/// Trim the characters Java-style `trim` would (controls and spaces).
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

struct TextAccumulator {
    out: String,
}

impl NodeVisitor for TextAccumulator {
    fn head(&mut self, tree: &DomTree, node: NodeId, _depth: usize) {
        match tree.data(node) {
            NodeData::Text(text) | NodeData::CData(text) => {
                tree.append_normalised_text(&mut self.out, node, text);
            }
            NodeData::Element(data) => {
                if !self.out.is_empty()
                    && (data.tag.is_block() || data.normal_name() == "br")
                    && !last_char_is_whitespace(&self.out)
                {
                    self.out.push(' ');
                }
            }
            _ => {}
        }
    }
}

impl DomTree {
    /// Whether whitespace under `id` is significant: `id` or one of its
    /// closest ancestors is a `pre`-like element.
    #[must_use]
    pub fn preserve_whitespace(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .take(PRESERVE_WHITESPACE_DEPTH)
            .filter_map(|a| self.as_element(a))
            .any(|e| e.tag.preserve_whitespace())
    }

    fn append_normalised_text(&self, out: &mut String, text_node: NodeId, text: &str) {
        let preserve = self
            .parent(text_node)
            .is_some_and(|p| self.preserve_whitespace(p));
        if preserve {
            out.push_str(text);
        } else {
            let strip = last_char_is_whitespace(out);
            append_normalised_whitespace(out, text, strip);
        }
    }

    /// The combined, whitespace-normalised text of a node and its descendants.
    ///
    /// Block elements and `<br>` separate their content from the surrounding
    /// text with a single space.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        match self.data(id) {
            NodeData::Text(text) | NodeData::CData(text) => {
                let mut out = String::new();
                append_normalised_whitespace(&mut out, text, false);
                trim_text(&out).to_string()
            }
            NodeData::Data(_)
            | NodeData::Comment(_)
            | NodeData::DocumentType(_)
            | NodeData::XmlDeclaration(_) => String::new(),
            NodeData::Element(_) | NodeData::Document(_) => {
                let mut accumulator = TextAccumulator { out: String::new() };
                self.traverse(id, &mut accumulator);
                trim_text(&accumulator.out).to_string()
            }
        }
    }

    /// The text of this element's direct text children only.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            match self.data(child) {
                NodeData::Text(text) | NodeData::CData(text) => {
                    self.append_normalised_text(&mut out, child, text);
                }
                NodeData::Element(data) => {
                    if data.normal_name() == "br" && !last_char_is_whitespace(&out) {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
        trim_text(&out).to_string()
    }

    /// All descendant text exactly as it appears, without normalisation.
    #[must_use]
    pub fn whole_text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| match self.data(n) {
                NodeData::Text(text) | NodeData::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Combined data of `script`/`style` content and comments below `id`.
    #[must_use]
    pub fn data_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            match self.data(child) {
                NodeData::Data(data) | NodeData::Comment(data) | NodeData::CData(data) => {
                    out.push_str(data);
                }
                NodeData::Element(_) => out.push_str(&self.data_content(child)),
                _ => {}
            }
        }
        out
    }

    /// Whether any descendant text node has non-whitespace content.
    #[must_use]
    pub fn has_text(&self, id: NodeId) -> bool {
        self.descendants(id).any(|n| match self.data(n) {
            NodeData::Text(text) | NodeData::CData(text) => {
                !text.chars().all(is_actually_whitespace)
            }
            _ => false,
        })
    }

    /// Replace the children of `id` with a single text node.
    ///
    /// Inside `script` and `style` the content becomes a data node, so it is
    /// written out unescaped.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> NodeId {
        self.empty(id);
        let data = if self
            .normal_name(id)
            .is_some_and(|n| matches!(n, "script" | "style"))
        {
            NodeData::Data(text.to_string())
        } else {
            NodeData::Text(text.to_string())
        };
        let node = self.alloc(data);
        self.append_child(id, node);
        node
    }

    /// Append a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.alloc(NodeData::Text(text.to_string()));
        self.append_child(parent, node);
        node
    }

    /// Prepend a text node to `parent`.
    pub fn prepend_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.alloc(NodeData::Text(text.to_string()));
        self.prepend_child(parent, node);
        node
    }
}
