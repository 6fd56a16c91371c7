use log::{debug, trace};
use strum_macros::Display;
use wren_common::ParseErrorList;
use wren_dom::{Attributes, DomTree, ElementData, NodeData, NodeId, ParseSettings, Tag};

use super::tag_sets::{
    BUTTON_SCOPE_EXTRAS, IMPLIED_END_TAGS, LIST_ITEM_SCOPE_EXTRAS, SCOPE_BOUNDARIES,
    SELECT_SCOPE_TRANSPARENT, SPECIAL, TABLE_FOSTER_TARGETS, TABLE_SCOPE_BOUNDARIES,
};
use crate::reader::CharacterReader;
use crate::tokenizer::helpers::is_whitespace_char;
use crate::tokenizer::{Token, Tokenizer, TokenizerState};

/// How far down the stack of open elements a scope query looks before giving
/// up. Bounds the work done on pathologically deep documents.
pub const MAX_SCOPE_SEARCH_DEPTH: usize = 100;

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormattingEntry {
    /// A formatting element. A copy of it stands in for "the token for which
    /// the element was created" when the element has to be recreated.
    Element(NodeId),
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, td, th and caption.
    Marker,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Pulls tokens from a [`Tokenizer`] one at a time and builds the document
/// according to the current insertion mode.
pub struct HtmlTreeBuilder {
    pub(super) tokenizer: Tokenizer,
    pub(super) tree: DomTree,
    pub(super) settings: ParseSettings,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,
    /// "the original insertion mode", restored when the "text" and
    /// "in table text" modes finish.
    pub(super) original_insertion_mode: InsertionMode,
    /// The mode whose rules are being applied. Differs from `insertion_mode`
    /// while a token is processed "using the rules for" another mode.
    handler_mode: InsertionMode,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// "Initially, the stack of open elements is empty. The stack grows
    /// downwards; the topmost node on the stack is the first one added to the
    /// stack, and the bottommost node of the stack is the most recently added
    /// node in the stack"
    pub(super) stack: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) formatting_elements: Vec<FormattingEntry>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    ///
    /// "Initially, the head element pointer and the form element pointer are
    /// both null."
    pub(super) head_element: Option<NodeId>,
    pub(super) form_element: Option<NodeId>,

    /// The context element when parsing a fragment.
    pub(super) context_element: Option<NodeId>,
    /// The synthetic `<html>` root a fragment is parsed into.
    pub(super) fragment_root: Option<NodeId>,

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "pending table character tokens"
    pub(super) pending_table_characters: Vec<String>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// "foster parenting": while set, nodes whose target is a table element
    /// are inserted next to the table instead.
    pub(super) foster_inserts: bool,

    /// Whether a `<base href>` has already set the document base URI.
    pub(super) base_uri_set_from_doc: bool,
}

impl HtmlTreeBuilder {
    /// Create a builder for a whole document.
    ///
    /// `base_uri` is the URI relative links resolve against until the
    /// document supplies its own `<base href>`.
    #[must_use]
    pub fn new(input: &str, base_uri: &str, errors: ParseErrorList, settings: ParseSettings) -> Self {
        Self::with_tree(input, DomTree::with_base_uri(base_uri), errors, settings)
    }

    fn with_tree(
        input: &str,
        tree: DomTree,
        errors: ParseErrorList,
        settings: ParseSettings,
    ) -> Self {
        Self {
            tokenizer: Tokenizer::new(CharacterReader::new(input), errors),
            tree,
            settings,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: InsertionMode::Initial,
            handler_mode: InsertionMode::Initial,
            stack: Vec::with_capacity(32),
            formatting_elements: Vec::new(),
            head_element: None,
            form_element: None,
            context_element: None,
            fragment_root: None,
            pending_table_characters: Vec::new(),
            frameset_ok: true,
            foster_inserts: false,
            base_uri_set_from_doc: false,
        }
    }

    /// Run the parser to the end of input and return the document along with
    /// the parse errors that were tracked.
    #[must_use]
    pub fn parse(mut self) -> (DomTree, ParseErrorList) {
        self.run();
        (self.tree, self.tokenizer.into_errors())
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Parse `input` as the contents of `context`, an element of `tree`. The
    /// new nodes are allocated in `tree` and returned detached, in order.
    ///
    /// Without a context the input is parsed from the "before head" state, so
    /// the result is a `head` and a `body` element.
    #[must_use]
    pub fn parse_fragment(
        input: &str,
        tree: DomTree,
        context: Option<NodeId>,
        errors: ParseErrorList,
        settings: ParseSettings,
    ) -> (DomTree, Vec<NodeId>, ParseErrorList) {
        let mut builder = Self::with_tree(input, tree, errors, settings);
        builder.context_element = context;

        if let Some(context) = context {
            // STEP 1: "Set the state of the HTML parser's tokenization stage as
            //         follows, switching on the context element:"
            let context_name = builder.tree.normal_name(context).unwrap_or_default();
            let state = match context_name {
                "title" | "textarea" => Some(TokenizerState::Rcdata),
                "iframe" | "noembed" | "noframes" | "style" | "xmp" => {
                    Some(TokenizerState::Rawtext)
                }
                "script" => Some(TokenizerState::ScriptData),
                "plaintext" => Some(TokenizerState::Plaintext),
                _ => None,
            };
            if let Some(state) = state {
                builder.tokenizer.transition(state);
            }
        }

        // STEP 2: "Let root be a new html element with no attributes."
        let root = builder
            .tree
            .create_element_with("html", &builder.settings, Attributes::new());
        builder.fragment_root = Some(root);

        // STEP 3: "Set up the parser's stack of open elements so that it
        //         contains just the single element root."
        builder.stack.push(root);

        // STEP 4: "Reset the parser's insertion mode appropriately."
        builder.reset_insertion_mode();

        // STEP 5: "Set the parser's form element pointer to the nearest node to
        //         the context element that is a form element (going straight up
        //         the ancestor chain, and including the element itself)"
        if let Some(context) = context {
            builder.form_element = std::iter::once(context)
                .chain(builder.tree.ancestors(context))
                .find(|&id| builder.tree.is_named(id, "form"));
        }

        builder.run();

        let nodes = builder.tree.children(root).to_vec();
        for &node in &nodes {
            builder.tree.remove(node);
        }
        (builder.tree, nodes, builder.tokenizer.into_errors())
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher"
    fn run(&mut self) {
        loop {
            // CDATA sections only mean something in foreign content, which is
            // not modelled; their text is treated as ordinary characters.
            let token = match self.tokenizer.read() {
                Token::CData { data } => Token::Character { data },
                token => token,
            };
            let _ = self.process(&token);
            if token.is_eof() {
                break;
            }
        }
    }

    /// Process `token` in the current insertion mode. Returns false when the
    /// token was ignored.
    pub(super) fn process(&mut self, token: &Token) -> bool {
        self.process_using(token, self.insertion_mode)
    }

    /// "Process the token using the rules for the X insertion mode."
    pub(super) fn process_using(&mut self, token: &Token, mode: InsertionMode) -> bool {
        trace!(target: "wren::tree_builder", "[{mode}] {token}");
        let previous = std::mem::replace(&mut self.handler_mode, mode);
        let processed = match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),

            // ===== TABLE PARSING MODES =====
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),

            // ===== SELECT MODES =====
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),

            // ===== AFTER BODY AND FRAMESET MODES =====
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        };
        self.handler_mode = previous;
        processed
    }

    /// Process a synthesized start tag without attributes, as in "act as if a
    /// start tag token with the tag name X had been seen".
    pub(super) fn process_start_tag(&mut self, name: &str) -> bool {
        self.process(&Token::StartTag {
            name: name.to_string(),
            attributes: Attributes::new(),
            self_closing: false,
        })
    }

    /// Process a synthesized end tag.
    pub(super) fn process_end_tag(&mut self, name: &str) -> bool {
        self.process(&Token::EndTag {
            name: name.to_string(),
        })
    }

    /// "Switch the insertion mode to X."
    pub(super) fn transition(&mut self, mode: InsertionMode) {
        trace!(target: "wren::tree_builder", "{} -> {mode}", self.insertion_mode);
        self.insertion_mode = mode;
    }

    /// "Let the original insertion mode be the current insertion mode."
    pub(super) const fn mark_insertion_mode(&mut self) {
        self.original_insertion_mode = self.insertion_mode;
    }

    /// Record a parse error for `token` in the mode whose rules are running.
    pub(super) fn error(&mut self, token: &Token) {
        let message = format!(
            "Unexpected {} token [{token}] when in state [{}]",
            token_kind(token),
            self.handler_mode
        );
        self.tokenizer.error(&message);
    }

    /// Split a character run that starts with whitespace but carries other
    /// text too, so that modes treating whitespace specially see the two
    /// parts as separate tokens. Returns `None` when there is nothing to split.
    pub(super) fn split_leading_whitespace(
        &mut self,
        token: &Token,
        mode: InsertionMode,
    ) -> Option<bool> {
        let Token::Character { data } = token else {
            return None;
        };
        let split = data.find(|c: char| !is_whitespace_char(c))?;
        if split == 0 {
            return None;
        }
        let (whitespace, rest) = data.split_at(split);
        let _ = self.process_using(
            &Token::Character {
                data: whitespace.to_string(),
            },
            mode,
        );
        Some(self.process_using(
            &Token::Character {
                data: rest.to_string(),
            },
            mode,
        ))
    }
}

/// The token category named in parse error messages.
const fn token_kind(token: &Token) -> &'static str {
    match token {
        Token::Doctype { .. } => "Doctype",
        Token::StartTag { .. } => "StartTag",
        Token::EndTag { .. } => "EndTag",
        Token::Comment { .. } => "Comment",
        Token::Character { .. } => "Character",
        Token::CData { .. } => "CData",
        Token::EndOfFile => "EOF",
    }
}

/// Text made up entirely of ASCII whitespace.
pub(super) fn is_blank(data: &str) -> bool {
    data.chars().all(is_whitespace_char)
}

// =============================================================================
// Creating and inserting nodes
// =============================================================================

impl HtmlTreeBuilder {
    /// The node that stands in for the Document: the document itself, or the
    /// synthetic root when parsing a fragment.
    pub(super) fn document_node(&self) -> NodeId {
        self.fragment_root.unwrap_or(NodeId::ROOT)
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token". Names and attribute keys are
    /// case-normalized per the parse settings.
    pub(super) fn create_element_for(&mut self, name: &str, attributes: &Attributes) -> NodeId {
        let tag = Tag::value_of(name, &self.settings);
        let mut attrs = attributes.clone();
        if !self.settings.preserve_attribute_case {
            attrs.normalize();
        }
        self.tree
            .alloc(NodeData::Element(ElementData::with_attributes(tag, attrs)))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// in the HTML namespace."
    ///
    /// An element written as `<x/>` is inserted empty and closed by an end tag
    /// fed back through the tokenizer.
    ///
    /// # Panics
    ///
    /// Panics if called with a non-`StartTag` token, indicating a parser bug.
    pub(super) fn insert(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name,
            attributes,
            self_closing,
        } = token
        else {
            panic!("insert called with non-StartTag token {token}");
        };

        if *self_closing {
            let element = self.insert_empty(token);
            self.stack.push(element);
            self.tokenizer.transition(TokenizerState::Data);
            self.tokenizer.emit_end_tag(name);
            return element;
        }

        // STEP 1: "Create an element for the token"
        let element = self.create_element_for(name, attributes);
        // STEP 2: "Insert element at the adjusted insertion location."
        self.insert_node(element);
        // STEP 3: "Push element onto the stack of open elements"
        self.stack.push(element);
        element
    }

    /// Insert a start tag's element without pushing it onto the stack, as for
    /// void elements.
    ///
    /// # Panics
    ///
    /// Panics if called with a non-`StartTag` token, indicating a parser bug.
    pub(super) fn insert_empty(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name,
            attributes,
            self_closing,
        } = token
        else {
            panic!("insert_empty called with non-StartTag token {token}");
        };

        let element = self.create_element_for(name, attributes);
        self.insert_node(element);

        if *self_closing {
            // [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
            if let Some(data) = self.tree.as_element_mut(element) {
                if !data.tag.is_known() {
                    data.tag.set_self_closing();
                } else if !data.tag.is_empty() {
                    self.tokenizer
                        .error("Tag cannot be self closing; not a void tag");
                }
            }
            self.tokenizer.acknowledge_self_closing_flag();
        }
        element
    }

    /// Insert an element named `name` with no attributes and push it.
    pub(super) fn insert_element_named(&mut self, name: &str) -> NodeId {
        let element = self.create_element_for(name, &Attributes::new());
        self.insert_node(element);
        self.stack.push(element);
        element
    }

    /// Insert a `<form>` and point the form element pointer at it.
    pub(super) fn insert_form(&mut self, token: &Token, on_stack: bool) -> NodeId {
        let element = if on_stack {
            self.insert(token)
        } else {
            self.insert_empty(token)
        };
        self.form_element = Some(element);
        element
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) {
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        self.insert_node(comment);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "...as the last child of" `parent`, ignoring the insertion location.
    pub(super) fn insert_comment_into(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Text inside `script` and `style` becomes a data node, which is never
    /// escaped on output.
    pub(super) fn insert_characters(&mut self, data: &str) {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let (parent, before) = self.insertion_location();
        let is_data = self
            .tree
            .normal_name(parent)
            .is_some_and(|name| matches!(name, "script" | "style"));

        // STEP 2: "If there is a Text node immediately before the adjusted
        //         insertion location, then append data to that Text node's data."
        let previous = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(previous) = previous {
            match self.tree.data_mut(previous) {
                NodeData::Text(text) if !is_data => {
                    text.push_str(data);
                    return;
                }
                NodeData::Data(text) if is_data => {
                    text.push_str(data);
                    return;
                }
                _ => {}
            }
        }

        // STEP 3: "Otherwise, create a new Text node whose data is data ... and
        //         insert the newly created node at the adjusted insertion location."
        let node = self.tree.alloc(if is_data {
            NodeData::Data(data.to_string())
        } else {
            NodeData::Text(data.to_string())
        });
        self.place_node(parent, before, node);
    }

    /// Insert `node` at the appropriate place for inserting a node.
    pub(super) fn insert_node(&mut self, node: NodeId) {
        let (parent, before) = self.insertion_location();
        self.place_node(parent, before, node);
    }

    /// Put `node` into `parent`, before `before` when given.
    pub(super) fn place_node(&mut self, parent: NodeId, before: Option<NodeId>, node: NodeId) {
        match before {
            Some(reference) => {
                if let Err(err) = self.tree.insert_before(parent, node, reference) {
                    debug!(target: "wren::tree_builder", "insert before failed: {err}");
                    self.tree.append_child(parent, node);
                }
            }
            None => self.tree.append_child(parent, node),
        }
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node."
    ///
    /// Returns `(parent, before)`. When `before` is `Some`, the node goes
    /// immediately before that child instead of at the end.
    pub(super) fn insertion_location(&self) -> (NodeId, Option<NodeId>) {
        let Some(target) = self.current_node() else {
            return (self.document_node(), None);
        };

        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        //  thead, or tr element"
        if self.foster_inserts && self.is_one_of(target, TABLE_FOSTER_TARGETS) {
            return self.foster_parent_location();
        }
        (target, None)
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        // STEP 1: "Let last table be the last table element in the stack of
        //         open elements, if any."
        let last_table = self
            .stack
            .iter()
            .rposition(|&id| self.tree.is_named(id, "table"));

        let Some(table_pos) = last_table else {
            // STEP 2: "If there is no last table, then let adjusted insertion
            //         location be inside the first element in the stack of open
            //         elements (the html element), after its last child"
            return (self.stack.first().copied().unwrap_or(NodeId::ROOT), None);
        };

        let table = self.stack[table_pos];
        // STEP 3: "If last table has a parent node, then let adjusted insertion
        //         location be inside last table's parent node, immediately
        //         before last table"
        if let Some(parent) = self.tree.parent(table) {
            return (parent, Some(table));
        }

        // STEP 4: "Let previous element be the element immediately above last
        //         table in the stack of open elements."
        let previous = table_pos
            .checked_sub(1)
            .map_or_else(|| self.document_node(), |pos| self.stack[pos]);
        (previous, None)
    }

    /// Insert `node` where foster parenting puts it.
    pub(super) fn insert_in_foster_parent(&mut self, node: NodeId) {
        let (parent, before) = self.foster_parent_location();
        self.place_node(parent, before, node);
    }

    /// [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
    ///
    /// "The first base element with an href content attribute in a document
    /// tree" sets the document base URL.
    pub(super) fn maybe_set_base_uri(&mut self, base: NodeId) {
        if self.base_uri_set_from_doc || self.fragment_root.is_some() {
            return;
        }
        let href = self.tree.abs_url(base, "href");
        if !href.is_empty() {
            debug!(target: "wren::tree_builder", "document base URI set to {href}");
            self.tree.set_base_uri(&href);
            self.base_uri_set_from_doc = true;
        }
    }
}

// =============================================================================
// The stack of open elements
// =============================================================================

impl HtmlTreeBuilder {
    /// The lower-case name of an element, or "" for other nodes.
    pub(super) fn name_of(&self, id: NodeId) -> &str {
        self.tree.normal_name(id).unwrap_or_default()
    }

    pub(super) fn is_one_of(&self, id: NodeId, names: &[&str]) -> bool {
        names.contains(&self.name_of(id))
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// Name of the current node, or "" when the stack is empty.
    pub(super) fn current_name(&self) -> &str {
        self.current_node().map_or("", |id| self.name_of(id))
    }

    pub(super) fn current_is(&self, name: &str) -> bool {
        self.current_name() == name
    }

    pub(super) fn pop(&mut self) -> Option<NodeId> {
        let popped = self.stack.pop();
        if let Some(node) = popped {
            trace!(target: "wren::tree_builder", "pop <{}>", self.name_of(node));
        }
        popped
    }

    /// Most recently opened element named `name`.
    pub(super) fn get_from_stack(&self, name: &str) -> Option<NodeId> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.name_of(id) == name)
    }

    pub(super) fn on_stack(&self, node: NodeId) -> bool {
        self.stack.contains(&node)
    }

    pub(super) fn remove_from_stack(&mut self, node: NodeId) -> bool {
        match self.stack.iter().rposition(|&id| id == node) {
            Some(pos) => {
                let _ = self.stack.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pop elements until one named `name` has been popped.
    pub(super) fn pop_stack_to_close(&mut self, name: &str) {
        while let Some(node) = self.pop() {
            if self.name_of(node) == name {
                break;
            }
        }
    }

    /// Pop elements until one named in `names` has been popped.
    pub(super) fn pop_stack_to_close_one_of(&mut self, names: &[&str]) {
        while let Some(node) = self.pop() {
            if self.is_one_of(node, names) {
                break;
            }
        }
    }

    /// Pop elements until the current node is named `name`.
    pub(super) fn pop_stack_to_before(&mut self, name: &str) {
        while let Some(current) = self.current_node() {
            if self.name_of(current) == name {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "When the steps above require the UA to clear the stack back to a table
    /// context, it means that the UA must, while the current node is not a
    /// table, template, or html element, pop elements from the stack of open
    /// elements."
    pub(super) fn clear_stack_to_table_context(&mut self) {
        self.clear_stack_to_context(&["table"]);
    }

    /// "clear the stack back to a table body context"
    pub(super) fn clear_stack_to_table_body_context(&mut self) {
        self.clear_stack_to_context(&["tbody", "tfoot", "thead"]);
    }

    /// "clear the stack back to a table row context"
    pub(super) fn clear_stack_to_table_row_context(&mut self) {
        self.clear_stack_to_context(&["tr"]);
    }

    fn clear_stack_to_context(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node() {
            let name = self.name_of(current);
            if name == "html" || names.contains(&name) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// The element immediately above `node` on the stack.
    pub(super) fn above_on_stack(&self, node: NodeId) -> Option<NodeId> {
        let pos = self.stack.iter().rposition(|&id| id == node)?;
        pos.checked_sub(1).map(|above| self.stack[above])
    }

    pub(super) fn insert_on_stack_after(&mut self, after: NodeId, node: NodeId) {
        match self.stack.iter().rposition(|&id| id == after) {
            Some(pos) => self.stack.insert(pos + 1, node),
            None => self.stack.push(node),
        }
    }

    pub(super) fn replace_on_stack(&mut self, old: NodeId, new: NodeId) {
        if let Some(slot) = self.stack.iter_mut().rev().find(|id| **id == old) {
            *slot = new;
        }
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
    pub(super) fn is_special(&self, node: NodeId) -> bool {
        self.is_one_of(node, SPECIAL)
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have an element target node in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// The walk gives up after [`MAX_SCOPE_SEARCH_DEPTH`] entries.
    fn in_specific_scope(&self, targets: &[&str], boundaries: &[&str], extras: &[&str]) -> bool {
        // STEP 1: "Initialize node to be the current node"
        for &node in self.stack.iter().rev().take(MAX_SCOPE_SEARCH_DEPTH) {
            let name = self.name_of(node);
            // STEP 2: "If node is the target node, terminate in a match state."
            if targets.contains(&name) {
                return true;
            }
            // STEP 3: "Otherwise, if node is one of the element types in list,
            //         terminate in a failure state."
            if boundaries.contains(&name) || extras.contains(&name) {
                return false;
            }
            // STEP 4: "Otherwise, set node to the previous entry in the stack of
            //         open elements and return to step 2."
        }
        false
    }

    /// "has an element in scope"
    pub(super) fn in_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], SCOPE_BOUNDARIES, &[])
    }

    /// "has an element in scope" for any of `names`.
    pub(super) fn in_scope_one_of(&self, names: &[&str]) -> bool {
        self.in_specific_scope(names, SCOPE_BOUNDARIES, &[])
    }

    /// "has an element in list item scope"
    pub(super) fn in_list_item_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], SCOPE_BOUNDARIES, LIST_ITEM_SCOPE_EXTRAS)
    }

    /// "has an element in button scope"
    pub(super) fn in_button_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], SCOPE_BOUNDARIES, BUTTON_SCOPE_EXTRAS)
    }

    /// "has an element in table scope"
    pub(super) fn in_table_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], TABLE_SCOPE_BOUNDARIES, &[])
    }

    /// "has an element in select scope": every element except optgroup and
    /// option is a boundary.
    pub(super) fn in_select_scope(&self, name: &str) -> bool {
        for &node in self.stack.iter().rev().take(MAX_SCOPE_SEARCH_DEPTH) {
            let node_name = self.name_of(node);
            if node_name == name {
                return true;
            }
            if !SELECT_SCOPE_TRANSPARENT.contains(&node_name) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the user agent must pop
    /// the current node off the stack of open elements."
    ///
    /// "If a step requires the user agent to generate implied end tags but
    /// lists an element to exclude from the process, then the user agent must
    /// perform the above steps as if that element was not in the above list."
    pub(super) fn generate_implied_end_tags(&mut self, excluding: Option<&str>) {
        loop {
            let current = self.current_name();
            if !IMPLIED_END_TAGS.contains(&current) || excluding == Some(current) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode(&mut self) {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for pos in (0..self.stack.len()).rev() {
            let mut node = self.stack[pos];
            // STEP 3: "If node is the first node in the stack of open elements,
            //         then set last to true, and, if the parser was created as
            //         part of the HTML fragment parsing algorithm, set node to
            //         the context element"
            let last = pos == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let mode = match self.name_of(node) {
                "select" => Some(InsertionMode::InSelect),
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                "head" | "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                "html" => Some(if self.head_element.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ if last => Some(InsertionMode::InBody),
                _ => None,
            };
            if let Some(mode) = mode {
                self.transition(mode);
                return;
            }
        }
    }
}

// =============================================================================
// The list of active formatting elements
// =============================================================================

impl HtmlTreeBuilder {
    /// Same tag and the same attributes, in any order.
    fn is_same_formatting_element(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.tree.as_element(a), self.tree.as_element(b)) else {
            return false;
        };
        a.normal_name() == b.normal_name()
            && a.attrs.len() == b.attrs.len()
            && a
                .attrs
                .iter()
                .all(|attr| b.attrs.get(&attr.key) == Some(attr.value.as_str()))
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// Includes the Noah's Ark clause: "If there are already three elements in
    /// the list of active formatting elements after the last marker, if any, or
    /// anywhere in the list if there are no markers, that have the same tag
    /// name, namespace, and attributes as element, then remove the earliest
    /// such element from the list of active formatting elements."
    pub(super) fn push_active_formatting_element(&mut self, element: NodeId) {
        let mut seen = 0;
        for pos in (0..self.formatting_elements.len()).rev() {
            let FormattingEntry::Element(existing) = self.formatting_elements[pos] else {
                break;
            };
            if self.is_same_formatting_element(element, existing) {
                seen += 1;
            }
            if seen == 3 {
                let _ = self.formatting_elements.remove(pos);
                break;
            }
        }
        self.formatting_elements
            .push(FormattingEntry::Element(element));
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn insert_marker(&mut self) {
        self.formatting_elements.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_formatting_elements_to_last_marker(&mut self) {
        // STEP 1-3: "Let entry be the last (most recently added) entry ...
        //           Remove entry from the list ... If entry was a marker, then
        //           stop the algorithm at this point."
        while let Some(entry) = self.formatting_elements.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }

    pub(super) fn remove_from_active_formatting_elements(&mut self, element: NodeId) {
        if let Some(pos) = self.formatting_position(element) {
            let _ = self.formatting_elements.remove(pos);
        }
    }

    pub(super) fn formatting_position(&self, element: NodeId) -> Option<usize> {
        self.formatting_elements
            .iter()
            .rposition(|entry| *entry == FormattingEntry::Element(element))
    }

    pub(super) fn is_in_active_formatting_elements(&self, element: NodeId) -> bool {
        self.formatting_position(element).is_some()
    }

    /// The last element named `name` between the end of the list and the last
    /// marker.
    pub(super) fn active_formatting_element(&self, name: &str) -> Option<NodeId> {
        for entry in self.formatting_elements.iter().rev() {
            match *entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element(id) if self.name_of(id) == name => return Some(id),
                FormattingEntry::Element(_) => {}
            }
        }
        None
    }

    pub(super) fn replace_active_formatting_element(&mut self, old: NodeId, new: NodeId) {
        if let Some(pos) = self.formatting_position(old) {
            self.formatting_elements[pos] = FormattingEntry::Element(new);
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps:"
    pub(super) fn reconstruct_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //         elements, then there is nothing to reconstruct"
        // STEP 2: "If the last (most recently added) entry in the list of active
        //         formatting elements is a marker, or if it is an element that
        //         is in the stack of open elements, then there is nothing to
        //         reconstruct"
        match self.formatting_elements.last() {
            Some(FormattingEntry::Element(last)) if !self.on_stack(*last) => {}
            _ => return,
        }

        // STEP 3: "Let entry be the last (most recently added) element in the
        //         list of active formatting elements."
        let mut pos = self.formatting_elements.len() - 1;

        // STEP 4-6: Rewind to the first entry after a marker or an open element.
        while pos > 0 {
            match self.formatting_elements[pos - 1] {
                FormattingEntry::Marker => break,
                FormattingEntry::Element(id) if self.on_stack(id) => break,
                FormattingEntry::Element(_) => pos -= 1,
            }
        }

        // STEP 7-10: Advance and create.
        while pos < self.formatting_elements.len() {
            if let FormattingEntry::Element(entry) = self.formatting_elements[pos] {
                // STEP 8: "Create: Insert an HTML element for the token for
                //         which the element entry was created, to obtain new
                //         element."
                let element = self.tree.shallow_clone(entry);
                self.insert_node(element);
                self.stack.push(element);
                // STEP 9: "Replace the entry for entry in the list with an entry
                //         for new element."
                self.formatting_elements[pos] = FormattingEntry::Element(element);
            }
            pos += 1;
        }
    }
}
