//! Document-level accessors.
//!
//! The `html`, `head` and `body` accessors auto-vivify: a document always
//! answers with an element, creating the missing part of the skeleton on first
//! access. The `find_*` variants only look.

use crate::attributes::Attributes;
use crate::node::{ElementData, NodeData, NodeId, QuirksMode};
use crate::settings::ParseSettings;
use crate::tag::Tag;
use crate::tree::DomTree;

impl DomTree {
    /// Create a detached element named `tag_name` (HTML case rules).
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_with(tag_name, &ParseSettings::html_default(), Attributes::new())
    }

    /// Create a detached element with explicit case settings and attributes.
    pub fn create_element_with(
        &mut self,
        tag_name: &str,
        settings: &ParseSettings,
        attrs: Attributes,
    ) -> NodeId {
        let tag = Tag::value_of(tag_name, settings);
        self.alloc(NodeData::Element(ElementData::with_attributes(tag, attrs)))
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let element = self.create_element(tag_name);
        self.append_child(parent, element);
        element
    }

    /// Create an element and insert it as the first child of `parent`.
    pub fn prepend_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let element = self.create_element(tag_name);
        self.prepend_child(parent, element);
        element
    }

    /// Compatibility mode decided while parsing.
    #[must_use]
    pub fn quirks_mode(&self) -> QuirksMode {
        self.document_data().quirks_mode
    }

    /// Set the compatibility mode.
    pub fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.document_data_mut().quirks_mode = mode;
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).first().copied()
    }

    fn find_child_named(&self, parent: NodeId, names: &[&str]) -> Option<NodeId> {
        self.element_children(parent)
            .iter()
            .copied()
            .find(|&c| self.normal_name(c).is_some_and(|n| names.contains(&n)))
    }

    /// The `<html>` element, if present.
    #[must_use]
    pub fn find_html(&self) -> Option<NodeId> {
        self.find_child_named(NodeId::ROOT, &["html"])
    }

    /// The `<head>` element, if present.
    #[must_use]
    pub fn find_head(&self) -> Option<NodeId> {
        self.find_child_named(self.find_html()?, &["head"])
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn find_body(&self) -> Option<NodeId> {
        self.find_child_named(self.find_html()?, &["body", "frameset"])
    }

    /// The `<html>` element, created and appended to the document if missing.
    pub fn html_element(&mut self) -> NodeId {
        match self.find_html() {
            Some(html) => html,
            None => self.append_element(NodeId::ROOT, "html"),
        }
    }

    /// The `<head>` element, created as the first child of `<html>` if missing.
    pub fn head(&mut self) -> NodeId {
        let html = self.html_element();
        match self.find_child_named(html, &["head"]) {
            Some(head) => head,
            None => self.prepend_element(html, "head"),
        }
    }

    /// The `<body>` (or `<frameset>`) element, appended to `<html>` if missing.
    pub fn body(&mut self) -> NodeId {
        let html = self.html_element();
        match self.find_child_named(html, &["body", "frameset"]) {
            Some(body) => body,
            None => self.append_element(html, "body"),
        }
    }

    /// The trimmed, normalised text of the first `<title>`, or empty.
    #[must_use]
    pub fn title(&self) -> String {
        self.get_elements_by_tag(NodeId::ROOT, "title")
            .first()
            .map(|&t| self.text(t))
            .unwrap_or_default()
    }

    /// Set the document title, creating `<title>` in `<head>` if needed.
    pub fn set_title(&mut self, title: &str) {
        let existing = self.get_elements_by_tag(NodeId::ROOT, "title").first().copied();
        let element = match existing {
            Some(element) => element,
            None => {
                let head = self.head();
                self.append_element(head, "title")
            }
        };
        let _ = self.set_text(element, title.trim());
    }

    /// The output charset label.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.output_settings().charset
    }

    /// Change the output charset and record it in a `<meta charset>` element.
    pub fn set_charset(&mut self, charset: &str) {
        self.output_settings_mut().charset = charset.to_string();
        let head = self.head();
        let meta = self
            .element_children(head)
            .iter()
            .copied()
            .find(|&m| {
                self.is_named(m, "meta")
                    && self
                        .as_element(m)
                        .is_some_and(|e| e.attrs.has_key("charset"))
            });
        let meta = match meta {
            Some(meta) => meta,
            None => self.prepend_element(head, "meta"),
        };
        if let Some(element) = self.as_element_mut(meta) {
            element.attrs.put("charset", charset);
        }
    }

    /// Repair the document skeleton after programmatic edits.
    ///
    /// Ensures `<html>`, `<head>` and `<body>` exist, moves stray text from the
    /// document, `<html>` and `<head>` into `<body>`, merges duplicate `<head>`
    /// and `<body>` elements into the first one, and puts both back under
    /// `<html>`.
    pub fn normalise(&mut self) {
        let html = match self.get_elements_by_tag(NodeId::ROOT, "html").first() {
            Some(&html) => html,
            None => self.append_element(NodeId::ROOT, "html"),
        };
        if self.find_head().is_none() {
            let _ = self.prepend_element(html, "head");
        }
        if self.find_body().is_none() {
            let _ = self.append_element(html, "body");
        }

        if let Some(head) = self.find_head() {
            self.normalise_text_nodes(head);
        }
        self.normalise_text_nodes(html);
        self.normalise_text_nodes(NodeId::ROOT);

        self.normalise_structure("head", html);
        self.normalise_structure("body", html);
    }

    fn normalise_text_nodes(&mut self, element: NodeId) {
        let to_move: Vec<NodeId> = self
            .children(element)
            .iter()
            .copied()
            .filter(|&c| matches!(self.data(c), NodeData::Text(_)) && !self.data(c).is_blank_text())
            .collect();
        let body = self.body();
        for &node in to_move.iter().rev() {
            self.remove(node);
            let _ = self.prepend_text(body, " ");
            self.prepend_child(body, node);
        }
    }

    fn normalise_structure(&mut self, tag: &str, html: NodeId) {
        let elements = self.get_elements_by_tag(NodeId::ROOT, tag);
        let Some((&master, dupes)) = elements.split_first() else {
            return;
        };
        for &dupe in dupes {
            self.move_children(dupe, master);
            self.remove(dupe);
        }
        if self.parent(master) != Some(html) {
            self.append_child(html, master);
        }
    }
}
