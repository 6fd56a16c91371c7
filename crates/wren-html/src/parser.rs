//! Parser entry points.
//!
//! [`Parser`] picks the tree builder (HTML or XML), the case settings and how
//! many parse errors to keep. The free functions cover the common cases with
//! default settings and no error tracking.

use log::debug;
use wren_common::{ParseError, ParseErrorList};
use wren_dom::{DomTree, NodeId, ParseSettings, Syntax};

use crate::tree_builder::HtmlTreeBuilder;
use crate::xml::XmlTreeBuilder;

/// A configured parser.
///
/// ```
/// use wren_html::Parser;
///
/// let mut parser = Parser::html().set_track_errors(10);
/// let tree = parser.parse_input("<p>One<p>Two</b>", "https://example.com/");
/// assert_eq!(parser.errors().len(), 1);
/// # let _ = tree;
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
    settings: ParseSettings,
    max_errors: usize,
    errors: ParseErrorList,
}

impl Parser {
    /// An HTML parser: names are lower-cased and the full HTML tree
    /// construction rules apply.
    #[must_use]
    pub const fn html() -> Self {
        Self {
            syntax: Syntax::Html,
            settings: ParseSettings::html_default(),
            max_errors: 0,
            errors: ParseErrorList::no_tracking(),
        }
    }

    /// An XML parser: names keep their case and elements nest as written.
    #[must_use]
    pub const fn xml() -> Self {
        Self {
            syntax: Syntax::Xml,
            settings: ParseSettings::preserve_case(),
            max_errors: 0,
            errors: ParseErrorList::no_tracking(),
        }
    }

    /// Keep up to `max_errors` parse errors from each parse. Zero turns
    /// tracking off.
    #[must_use]
    pub const fn set_track_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Whether parse errors are being kept.
    #[must_use]
    pub const fn is_track_errors(&self) -> bool {
        self.max_errors > 0
    }

    /// Replace the case settings.
    #[must_use]
    pub const fn settings(mut self, settings: ParseSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The case settings in use.
    #[must_use]
    pub const fn parse_settings(&self) -> ParseSettings {
        self.settings
    }

    /// Which tree builder this parser runs.
    #[must_use]
    pub const fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Errors from the most recent parse.
    #[must_use]
    pub const fn errors(&self) -> &ParseErrorList {
        &self.errors
    }

    fn new_error_list(&self) -> ParseErrorList {
        if self.is_track_errors() {
            ParseErrorList::tracking(self.max_errors)
        } else {
            ParseErrorList::no_tracking()
        }
    }

    fn keep_errors(&mut self, errors: ParseErrorList) {
        if !errors.is_empty() {
            debug!(target: "wren::parser", "{} parse errors recorded", errors.len());
        }
        self.errors = errors;
    }

    /// Parse a whole document. Relative URLs resolve against `base_uri` until
    /// the document supplies a `<base href>`.
    pub fn parse_input(&mut self, input: &str, base_uri: &str) -> DomTree {
        let errors = self.new_error_list();
        let (tree, errors) = match self.syntax {
            Syntax::Html => HtmlTreeBuilder::new(input, base_uri, errors, self.settings).parse(),
            Syntax::Xml => XmlTreeBuilder::new(input, base_uri, errors, self.settings).parse(),
        };
        self.keep_errors(errors);
        tree
    }

    /// Parse `fragment` as the content of `context`, an element of `tree`.
    ///
    /// The nodes are allocated in `tree` and returned detached, ready to be
    /// inserted. Without a context an HTML fragment is parsed as a document
    /// body would be, giving a `head` and a `body`.
    pub fn parse_fragment_input(
        &mut self,
        tree: &mut DomTree,
        fragment: &str,
        context: Option<NodeId>,
    ) -> Vec<NodeId> {
        let errors = self.new_error_list();
        let owned = std::mem::take(tree);
        let (owned, nodes, errors) = match self.syntax {
            Syntax::Html => {
                HtmlTreeBuilder::parse_fragment(fragment, owned, context, errors, self.settings)
            }
            Syntax::Xml => XmlTreeBuilder::parse_fragment(fragment, owned, errors, self.settings),
        };
        *tree = owned;
        self.keep_errors(errors);
        nodes
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::html()
    }
}

/// Parse an HTML document.
#[must_use]
pub fn parse(html: &str, base_uri: &str) -> DomTree {
    Parser::html().parse_input(html, base_uri)
}

/// Parse an HTML document, keeping up to `max_errors` parse errors.
#[must_use]
pub fn parse_with_errors(html: &str, base_uri: &str, max_errors: usize) -> (DomTree, Vec<ParseError>) {
    let mut parser = Parser::html().set_track_errors(max_errors);
    let tree = parser.parse_input(html, base_uri);
    (tree, parser.errors().iter().cloned().collect())
}

/// Parse an HTML fragment into a fresh tree based at `base_uri`.
///
/// `context` names the element the fragment is parsed inside, such as
/// `"title"` or `"tr"`; the context element itself is not part of the result.
#[must_use]
pub fn parse_fragment(html: &str, context: Option<&str>, base_uri: &str) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::with_base_uri(base_uri);
    let context = context.map(|name| tree.create_element(name));
    let nodes = parse_fragment_in(&mut tree, html, context);
    (tree, nodes)
}

/// Parse an HTML fragment as the content of `context`, allocating the nodes in
/// `tree`. The returned nodes are detached.
pub fn parse_fragment_in(tree: &mut DomTree, html: &str, context: Option<NodeId>) -> Vec<NodeId> {
    Parser::html().parse_fragment_input(tree, html, context)
}

/// Parse `body_html` into the body of an otherwise empty document.
#[must_use]
pub fn parse_body_fragment(body_html: &str, base_uri: &str) -> DomTree {
    let mut tree = DomTree::with_base_uri(base_uri);
    let body = tree.body();
    for node in parse_fragment_in(&mut tree, body_html, Some(body)) {
        tree.append_child(body, node);
    }
    tree
}

/// Parse an XML document.
#[must_use]
pub fn parse_xml(xml: &str, base_uri: &str) -> DomTree {
    Parser::xml().parse_input(xml, base_uri)
}
