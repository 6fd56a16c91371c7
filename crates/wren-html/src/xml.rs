//! A tree builder for XML input.
//!
//! Uses the HTML tokenizer unchanged but none of the HTML insertion rules:
//! start tags nest, end tags close the nearest open element with the same
//! name, and nothing is implied.

use log::trace;
use wren_common::ParseErrorList;
use wren_dom::{
    Attributes, DocumentTypeData, DomTree, ElementData, NodeData, NodeId, OutputSettings,
    ParseSettings, Tag, XmlDeclarationData,
};

use crate::reader::CharacterReader;
use crate::tokenizer::{Token, Tokenizer};

/// Builds a document from XML, keeping names as written.
pub struct XmlTreeBuilder {
    tokenizer: Tokenizer,
    tree: DomTree,
    settings: ParseSettings,
    /// Open elements, innermost last. The document (or fragment root) is
    /// implied below the first entry.
    stack: Vec<NodeId>,
    root: NodeId,
}

impl XmlTreeBuilder {
    /// Create a builder for a whole XML document.
    #[must_use]
    pub fn new(input: &str, base_uri: &str, errors: ParseErrorList, settings: ParseSettings) -> Self {
        let mut tree = DomTree::with_base_uri(base_uri);
        *tree.output_settings_mut() = OutputSettings::xml();
        Self::with_tree(input, tree, NodeId::ROOT, errors, settings)
    }

    fn with_tree(
        input: &str,
        tree: DomTree,
        root: NodeId,
        errors: ParseErrorList,
        settings: ParseSettings,
    ) -> Self {
        Self {
            tokenizer: Tokenizer::new(CharacterReader::new(input), errors),
            tree,
            settings,
            stack: Vec::new(),
            root,
        }
    }

    /// Run to the end of input.
    #[must_use]
    pub fn parse(mut self) -> (DomTree, ParseErrorList) {
        self.run();
        (self.tree, self.tokenizer.into_errors())
    }

    /// Parse `input` into detached nodes allocated in `tree`. XML has no
    /// context-dependent parsing, so no context element is needed.
    #[must_use]
    pub fn parse_fragment(
        input: &str,
        mut tree: DomTree,
        errors: ParseErrorList,
        settings: ParseSettings,
    ) -> (DomTree, Vec<NodeId>, ParseErrorList) {
        let root = tree.create_element_with("root", &settings, Attributes::new());
        let mut builder = Self::with_tree(input, tree, root, errors, settings);
        builder.run();

        let nodes = builder.tree.children(root).to_vec();
        for &node in &nodes {
            builder.tree.remove(node);
        }
        (builder.tree, nodes, builder.tokenizer.into_errors())
    }

    fn run(&mut self) {
        loop {
            let token = self.tokenizer.read();
            trace!(target: "wren::xml", "{token}");
            if token.is_eof() {
                break;
            }
            self.process(token);
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.root)
    }

    fn append(&mut self, node: NodeId) {
        let parent = self.current();
        self.tree.append_child(parent, node);
    }

    fn process(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.insert_start_tag(&name, attributes, self_closing),
            Token::EndTag { name } => self.pop_stack_to_close(&name),
            Token::Comment { data, bogus } => self.insert_comment(data, bogus),
            Token::Character { data } => {
                let text = self.tree.alloc(NodeData::Text(data));
                self.append(text);
            }
            Token::CData { data } => {
                let cdata = self.tree.alloc(NodeData::CData(data));
                self.append(cdata);
            }
            Token::Doctype {
                name,
                pub_sys_key,
                public_id,
                system_id,
                ..
            } => {
                let doctype = self.tree.alloc(NodeData::DocumentType(DocumentTypeData {
                    name: self.settings.normalize_tag(&name),
                    pub_sys_key,
                    public_id,
                    system_id,
                }));
                self.append(doctype);
            }
            Token::EndOfFile => {}
        }
    }

    fn insert_start_tag(&mut self, name: &str, mut attributes: Attributes, self_closing: bool) {
        let mut tag = Tag::value_of(name, &self.settings);
        if !self.settings.preserve_attribute_case {
            attributes.normalize();
        }
        if self_closing {
            tag.set_self_closing();
            self.tokenizer.acknowledge_self_closing_flag();
        }
        let element = self
            .tree
            .alloc(NodeData::Element(ElementData::with_attributes(tag, attributes)));
        self.append(element);
        if !self_closing {
            self.stack.push(element);
        }
    }

    /// Pop up to and including the innermost open element named `name`. An end
    /// tag with no matching open element is ignored.
    fn pop_stack_to_close(&mut self, name: &str) {
        let name = self.settings.normalize_tag(name);
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|&id| self.tree.tag_name(id) == Some(name.as_str()))
        else {
            trace!(target: "wren::xml", "ignoring unmatched end tag </{name}>");
            return;
        };
        self.stack.truncate(pos);
    }

    /// Comments written as `<?name ...?>` are processing instructions and
    /// become declaration nodes.
    fn insert_comment(&mut self, data: String, bogus: bool) {
        let declaration = bogus
            .then(|| self.parse_declaration(&data))
            .flatten();
        let node = match declaration {
            Some(declaration) => self.tree.alloc(NodeData::XmlDeclaration(declaration)),
            None => self.tree.alloc(NodeData::Comment(data)),
        };
        self.append(node);
    }

    fn parse_declaration(&self, data: &str) -> Option<XmlDeclarationData> {
        let (inner, is_processing_instruction) = if let Some(rest) = data.strip_prefix('?') {
            (rest.strip_suffix('?').unwrap_or(rest), false)
        } else {
            (data.strip_prefix('!')?, true)
        };
        if inner.is_empty() {
            return None;
        }

        // The declaration reads like a start tag: a name, then pseudo-attributes.
        let markup = format!("<{inner}>");
        let mut tokenizer = Tokenizer::new(CharacterReader::new(&markup), ParseErrorList::no_tracking());
        match tokenizer.read() {
            Token::StartTag {
                name, attributes, ..
            } => Some(XmlDeclarationData {
                name: self.settings.normalize_tag(&name),
                attrs: attributes,
                is_processing_instruction,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> DomTree {
        XmlTreeBuilder::new(xml, "", ParseErrorList::no_tracking(), ParseSettings::preserve_case())
            .parse()
            .0
    }

    #[test]
    fn test_nesting_keeps_case() {
        let tree = parse("<Feed><Entry id=\"1\">x</Entry></Feed>");
        let feed = tree.children(NodeId::ROOT)[0];
        assert_eq!(tree.tag_name(feed), Some("Feed"));
        let entry = tree.children(feed)[0];
        assert_eq!(tree.attr(entry, "id").as_deref(), Some("1"));
        assert_eq!(tree.as_text(tree.children(entry)[0]), Some("x"));
    }

    #[test]
    fn test_unmatched_end_tag_is_ignored() {
        let tree = parse("<a><b></c>text</b></a>");
        let a = tree.children(NodeId::ROOT)[0];
        let b = tree.children(a)[0];
        assert_eq!(tree.children(b).len(), 1);
        assert_eq!(tree.as_text(tree.children(b)[0]), Some("text"));
    }

    #[test]
    fn test_declaration_node() {
        let tree = parse("<?xml version=\"1.0\" encoding=\"UTF-8\"?><doc/>");
        let first = tree.children(NodeId::ROOT)[0];
        let NodeData::XmlDeclaration(declaration) = tree.data(first) else {
            panic!("expected a declaration, got {:?}", tree.data(first));
        };
        assert_eq!(declaration.name, "xml");
        assert_eq!(declaration.attrs.get("version"), Some("1.0"));
        assert!(!declaration.is_processing_instruction);
    }

    #[test]
    fn test_self_closing_element_is_not_opened() {
        let tree = parse("<root><item/><item/></root>");
        let root = tree.children(NodeId::ROOT)[0];
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn test_cdata_section() {
        let tree = parse("<script><![CDATA[a < b]]></script>");
        let script = tree.children(NodeId::ROOT)[0];
        assert!(matches!(tree.data(tree.children(script)[0]), NodeData::CData(d) if d == "a < b"));
    }
}
