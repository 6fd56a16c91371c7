//! HTML and XML serialization.
//!
//! Serialization is a head/tail walk: `head` writes a node's opening markup
//! (and the whole of leaf nodes), `tail` writes an element's closing tag.
//! Pretty printing inserts a newline plus indentation before block-formatted
//! elements and their closing tags, using the tag registry to decide which
//! elements format as blocks.

use std::fmt::Write as _;

use crate::entities;
use crate::node::{DocumentTypeData, NodeData, NodeId, XmlDeclarationData};
use crate::settings::{OutputSettings, Syntax};
use crate::traverse::NodeVisitor;
use crate::tree::DomTree;

struct OuterHtmlVisitor<'a> {
    out: &'a mut String,
    settings: &'a OutputSettings,
}

impl OuterHtmlVisitor<'_> {
    fn indent(&mut self, depth: usize) {
        self.out.push('\n');
        let width = depth * self.settings.indent_amount;
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    /// Whether the element's container formats its children as blocks. The
    /// document itself counts as a block container.
    fn parent_formats_as_block(tree: &DomTree, node: NodeId) -> bool {
        tree.parent(node).is_some_and(|p| match tree.data(p) {
            NodeData::Element(data) => data.tag.format_as_block(),
            NodeData::Document(_) => true,
            _ => false,
        })
    }

    fn element_head(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
        let Some(data) = tree.as_element(node) else {
            return;
        };
        if self.settings.pretty_print
            && (data.tag.format_as_block()
                || Self::parent_formats_as_block(tree, node)
                || self.settings.outline)
            && !self.out.is_empty()
        {
            self.indent(depth);
        }
        self.out.push('<');
        self.out.push_str(data.tag_name());
        data.attrs.html_into(self.out, self.settings);

        if tree.children(node).is_empty() && data.tag.is_self_closing() {
            if self.settings.syntax == Syntax::Html && data.tag.is_empty() {
                self.out.push('>');
            } else {
                self.out.push_str(" />");
            }
        } else {
            self.out.push('>');
        }
    }

    fn element_tail(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
        let Some(data) = tree.as_element(node) else {
            return;
        };
        let children = tree.children(node);
        if children.is_empty() && data.tag.is_self_closing() {
            return;
        }
        if self.settings.pretty_print
            && !children.is_empty()
            && (data.tag.format_as_block()
                || (self.settings.outline
                    && (children.len() > 1
                        || (children.len() == 1
                            && !matches!(tree.data(children[0]), NodeData::Text(_))))))
        {
            self.indent(depth);
        }
        self.out.push_str("</");
        self.out.push_str(data.tag_name());
        self.out.push('>');
    }

    fn text(&mut self, tree: &DomTree, node: NodeId, text: &str, depth: usize) {
        let blank = tree.data(node).is_blank_text();
        let parent_element = tree.parent(node).and_then(|p| tree.as_element(p));
        if self.settings.pretty_print
            && !blank
            && ((tree.sibling_index(node) == 0
                && parent_element.is_some_and(|p| p.tag.format_as_block()))
                || (self.settings.outline && !tree.sibling_nodes(node).is_empty()))
        {
            self.indent(depth);
        }
        let normalise_white = self.settings.pretty_print
            && parent_element.is_some()
            && !tree.parent(node).is_some_and(|p| tree.preserve_whitespace(p));
        entities::escape_into(self.out, text, self.settings, false, normalise_white, false);
    }

    fn doctype(&mut self, doctype: &DocumentTypeData) {
        if self.settings.syntax == Syntax::Html
            && doctype.public_id.is_empty()
            && doctype.system_id.is_empty()
        {
            self.out.push_str("<!doctype");
        } else {
            self.out.push_str("<!DOCTYPE");
        }
        if !doctype.name.is_empty() {
            self.out.push(' ');
            self.out.push_str(&doctype.name);
        }
        if let Some(key) = &doctype.pub_sys_key {
            self.out.push(' ');
            self.out.push_str(key);
        }
        if !doctype.public_id.is_empty() {
            let _ = write!(self.out, " \"{}\"", doctype.public_id);
        }
        if !doctype.system_id.is_empty() {
            let _ = write!(self.out, " \"{}\"", doctype.system_id);
        }
        self.out.push('>');
    }

    fn declaration(&mut self, declaration: &XmlDeclarationData) {
        let marker = if declaration.is_processing_instruction {
            '!'
        } else {
            '?'
        };
        self.out.push('<');
        self.out.push(marker);
        self.out.push_str(&declaration.name);
        declaration.attrs.html_into(self.out, self.settings);
        if !declaration.is_processing_instruction {
            self.out.push('?');
        }
        self.out.push('>');
    }
}

impl NodeVisitor for OuterHtmlVisitor<'_> {
    fn head(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
        match tree.data(node) {
            NodeData::Document(_) => {}
            NodeData::Element(_) => self.element_head(tree, node, depth),
            NodeData::Text(text) => self.text(tree, node, text, depth),
            NodeData::Data(data) => self.out.push_str(data),
            NodeData::Comment(data) => {
                if self.settings.pretty_print && !self.out.is_empty() {
                    self.indent(depth);
                }
                self.out.push_str("<!--");
                self.out.push_str(data);
                self.out.push_str("-->");
            }
            NodeData::CData(data) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(data);
                self.out.push_str("]]>");
            }
            NodeData::DocumentType(doctype) => self.doctype(doctype),
            NodeData::XmlDeclaration(declaration) => self.declaration(declaration),
        }
    }

    fn tail(&mut self, tree: &DomTree, node: NodeId, depth: usize) {
        if tree.is_element(node) {
            self.element_tail(tree, node, depth);
        }
    }
}

impl DomTree {
    /// Serialize `node` and its subtree into `out` with explicit settings.
    pub fn outer_html_into(&self, out: &mut String, node: NodeId, settings: &OutputSettings) {
        let mut visitor = OuterHtmlVisitor { out, settings };
        self.traverse(node, &mut visitor);
    }

    /// The markup of `node` including the node itself, using the document's
    /// output settings.
    ///
    /// For the document node this is the whole document.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        if matches!(self.data(node), NodeData::Document(_)) {
            return self.html(node);
        }
        let mut out = String::new();
        self.outer_html_into(&mut out, node, self.output_settings());
        out
    }

    /// The markup of the children of `node` (the element's inner HTML).
    #[must_use]
    pub fn html(&self, node: NodeId) -> String {
        self.html_with(node, self.output_settings())
    }

    /// Inner HTML with explicit settings.
    #[must_use]
    pub fn html_with(&self, node: NodeId, settings: &OutputSettings) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.outer_html_into(&mut out, child, settings);
        }
        if settings.pretty_print {
            out.trim().to_string()
        } else {
            out
        }
    }

    /// Outer HTML with explicit settings.
    #[must_use]
    pub fn outer_html_with(&self, node: NodeId, settings: &OutputSettings) -> String {
        if matches!(self.data(node), NodeData::Document(_)) {
            return self.html_with(node, settings);
        }
        let mut out = String::new();
        self.outer_html_into(&mut out, node, settings);
        out
    }
}
