//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
//!
//! The bulk of tree construction, including the adoption agency algorithm
//! that repairs misnested formatting elements.

use wren_common::warning::warn_once;
use wren_dom::{Attributes, NodeId, QuirksMode};

use super::core::{FormattingEntry, HtmlTreeBuilder, InsertionMode, is_blank};
use super::tag_sets::{
    ADOPTION_FORMATTERS, APPLETS, DD_DT, EMPTY_FORMATTERS, FORMATTERS, HEADINGS,
    IN_BODY_END_CLOSERS, IN_BODY_START_DROP, IN_BODY_START_P_CLOSERS, IN_BODY_START_TO_HEAD,
    ISINDEX_INPUT_EXCLUDED, LI_BREAKERS, MEDIA, OPTIONS, PRE_LISTING, RUBY, TABLE_FOSTER_TARGETS,
};
use crate::tokenizer::{Token, TokenizerState};

/// "Outer loop: If outer loop counter is greater than or equal to 8, then
/// return."
const ADOPTION_OUTER_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements." The inner loop stops at that point.
const ADOPTION_INNER_LIMIT: usize = 3;

/// Prompt of the form generated for `<isindex>`.
const ISINDEX_PROMPT: &str = "This is a searchable index. Enter search keywords: ";

impl HtmlTreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) -> bool {
        match token {
            Token::Character { data } | Token::CData { data } => {
                self.in_body_characters(token, data)
            }
            // "A comment token: Insert a comment."
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } => self.in_body_start_tag(token),
            Token::EndTag { .. } => self.in_body_end_tag(token),
            // "An end-of-file token: ... Stop parsing."
            Token::EndOfFile => true,
        }
    }

    fn in_body_characters(&mut self, token: &Token, data: &str) -> bool {
        // "A character token that is U+0000 NULL: Parse error. Ignore the token."
        let stripped;
        let data = if data.contains('\0') {
            self.error(token);
            stripped = data.replace('\0', "");
            stripped.as_str()
        } else {
            data
        };
        if data.is_empty() {
            return false;
        }

        // "Reconstruct the active formatting elements, if any. Insert the
        //  token's character."
        self.reconstruct_formatting_elements();
        self.insert_characters(data);

        // "Any other character token: ... Set the frameset-ok flag to "not ok"."
        if !is_blank(data) {
            self.frameset_ok = false;
        }
        true
    }

    /// Copy attributes from `attributes` onto `target` where it lacks them.
    fn merge_attributes(&mut self, target: NodeId, attributes: &Attributes) {
        let preserve_case = self.settings.preserve_attribute_case;
        if let Some(element) = self.tree.as_element_mut(target) {
            for attr in attributes.iter() {
                let key = if preserve_case {
                    attr.key.clone()
                } else {
                    attr.key.to_lowercase()
                };
                let _ = element.attrs.put_if_absent(key, attr.value.clone());
            }
        }
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    fn close_p_in_button_scope(&mut self) {
        if self.in_button_scope("p") {
            let _ = self.process_end_tag("p");
        }
    }

    /// The loop shared by `li`, `dd` and `dt` start tags: close the nearest
    /// open item named in `names` unless a special element other than address,
    /// div or p comes first.
    fn close_list_item(&mut self, names: &[&str]) {
        for pos in (1..self.stack.len()).rev() {
            let node = self.stack[pos];
            let name = self.name_of(node);
            if names.contains(&name) {
                let name = name.to_string();
                let _ = self.process_end_tag(&name);
                return;
            }
            if self.is_special(node) && !LI_BREAKERS.contains(&name) {
                return;
            }
        }
    }

    fn in_body_start_tag(&mut self, token: &Token) -> bool {
        let Token::StartTag {
            attributes,
            self_closing,
            ..
        } = token
        else {
            return false;
        };
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();

        match tag {
            // "Parse error. ... for each attribute on the token, check to see if
            //  the attribute is already present on the top element of the stack
            //  of open elements. If it is not, add the attribute and its
            //  corresponding value to that element."
            "html" => {
                self.error(token);
                if let Some(&html) = self.stack.first() {
                    self.merge_attributes(html, attributes);
                }
                true
            }
            _ if IN_BODY_START_TO_HEAD.contains(&tag) => {
                self.process_using(token, InsertionMode::InHead)
            }
            // "If the second element on the stack of open elements is not a body
            //  element, if the stack of open elements has only one node on it, or
            //  if there is a template element on the stack of open elements, then
            //  ignore the token."
            "body" => {
                self.error(token);
                match self.stack.get(1).copied() {
                    Some(body) if self.tree.is_named(body, "body") => {
                        self.frameset_ok = false;
                        self.merge_attributes(body, attributes);
                        true
                    }
                    _ => false,
                }
            }
            "frameset" => {
                self.error(token);
                match self.stack.get(1).copied() {
                    Some(body) if self.frameset_ok && self.tree.is_named(body, "body") => {
                        // "Remove the second element on the stack of open elements
                        //  from its parent node, if it has one."
                        self.tree.remove(body);
                        // "Pop all the nodes from the bottom of the stack of open
                        //  elements, from the current node up to, but not
                        //  including, the root html element."
                        self.stack.truncate(1);
                        let _ = self.insert(token);
                        self.transition(InsertionMode::InFrameset);
                        true
                    }
                    _ => false,
                }
            }
            _ if IN_BODY_START_P_CLOSERS.contains(&tag) => {
                self.close_p_in_button_scope();
                let _ = self.insert(token);
                true
            }
            _ if HEADINGS.contains(&tag) => {
                self.close_p_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                //  "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                //  error; pop the current node off the stack of open elements."
                if HEADINGS.contains(&self.current_name()) {
                    self.error(token);
                    let _ = self.pop();
                }
                let _ = self.insert(token);
                true
            }
            _ if PRE_LISTING.contains(&tag) => {
                self.close_p_in_button_scope();
                let _ = self.insert(token);
                // "If the next token is a U+000A LINE FEED (LF) character token,
                //  then ignore that token and move on to the next one. (Newlines
                //  at the start of pre blocks are ignored as an authoring
                //  convenience.)"
                let _ = self.tokenizer.reader.match_consume("\n");
                self.frameset_ok = false;
                true
            }
            // "If the form element pointer is not null, and there is no template
            //  element on the stack of open elements, then this is a parse error;
            //  ignore the token."
            "form" => {
                if self.form_element.is_some() {
                    self.error(token);
                    return false;
                }
                self.close_p_in_button_scope();
                let _ = self.insert_form(token, true);
                true
            }
            "li" => {
                self.frameset_ok = false;
                self.close_list_item(&["li"]);
                self.close_p_in_button_scope();
                let _ = self.insert(token);
                true
            }
            _ if DD_DT.contains(&tag) => {
                self.frameset_ok = false;
                self.close_list_item(DD_DT);
                self.close_p_in_button_scope();
                let _ = self.insert(token);
                true
            }
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_in_button_scope();
                let _ = self.insert(token);
                self.tokenizer.transition(TokenizerState::Plaintext);
                true
            }
            "button" => {
                // "If the stack of open elements has a button element in scope,
                //  then run these substeps: Parse error. Generate implied end
                //  tags. Pop elements from the stack of open elements until a
                //  button element has been popped from the stack."
                if self.in_button_scope("button") {
                    self.error(token);
                    let _ = self.process_end_tag("button");
                    return self.process(token);
                }
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                self.frameset_ok = false;
                true
            }
            "a" => {
                // "If the list of active formatting elements contains an a element
                //  between the end of the list and the last marker on the list (or
                //  the start of the list if there is no marker on the list), then
                //  this is a parse error; run the adoption agency algorithm for
                //  the token, then remove that element from the list of active
                //  formatting elements and the stack of open elements if the
                //  adoption agency algorithm didn't already remove it"
                if let Some(open) = self.active_formatting_element("a") {
                    self.error(token);
                    let _ = self.process_end_tag("a");
                    self.remove_from_active_formatting_elements(open);
                    let _ = self.remove_from_stack(open);
                }
                self.reconstruct_formatting_elements();
                let element = self.insert(token);
                self.push_active_formatting_element(element);
                true
            }
            _ if FORMATTERS.contains(&tag) => {
                self.reconstruct_formatting_elements();
                let element = self.insert(token);
                self.push_active_formatting_element(element);
                true
            }
            "nobr" => {
                self.reconstruct_formatting_elements();
                if self.in_scope("nobr") {
                    self.error(token);
                    let _ = self.process_end_tag("nobr");
                    self.reconstruct_formatting_elements();
                }
                let element = self.insert(token);
                self.push_active_formatting_element(element);
                true
            }
            _ if APPLETS.contains(&tag) => {
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                self.insert_marker();
                self.frameset_ok = false;
                true
            }
            // "If the Document is not set to quirks mode, and the stack of open
            //  elements has a p element in button scope, then close a p element."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_in_button_scope();
                }
                let _ = self.insert(token);
                self.frameset_ok = false;
                self.transition(InsertionMode::InTable);
                true
            }
            "input" => {
                self.reconstruct_formatting_elements();
                let element = self.insert_empty(token);
                // "If the token does not have an attribute with the name "type",
                //  or if it does, but that attribute's value is not an ASCII
                //  case-insensitive match for the string "hidden", then: set the
                //  frameset-ok flag to "not ok"."
                let hidden = self
                    .tree
                    .attr(element, "type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
                true
            }
            _ if MEDIA.contains(&tag) => {
                let _ = self.insert_empty(token);
                true
            }
            _ if EMPTY_FORMATTERS.contains(&tag) => {
                self.reconstruct_formatting_elements();
                let _ = self.insert_empty(token);
                self.frameset_ok = false;
                true
            }
            "hr" => {
                self.close_p_in_button_scope();
                let _ = self.insert_empty(token);
                self.frameset_ok = false;
                true
            }
            // "Parse error. Change the token's tag name to "img" and reprocess it.
            //  (Don't ask.)"
            "image" => {
                if self.get_from_stack("svg").is_some() {
                    let _ = self.insert(token);
                    return true;
                }
                self.error(token);
                self.process(&Token::StartTag {
                    name: "img".to_string(),
                    attributes: attributes.clone(),
                    self_closing: *self_closing,
                })
            }
            "isindex" => self.handle_isindex(token, attributes),
            "textarea" => {
                // STEP 1: "Insert an HTML element for the token."
                let _ = self.insert(token);
                if *self_closing {
                    return true;
                }
                // STEP 2: "If the next token is a U+000A LINE FEED (LF) character
                //         token, then ignore that token and move on to the next
                //         one."
                // STEP 3: "Switch the tokenizer to the RCDATA state."
                self.tokenizer.transition(TokenizerState::Rcdata);
                let _ = self.tokenizer.reader.match_consume("\n");
                // STEP 4: "Let the original insertion mode be the current
                //         insertion mode."
                self.mark_insertion_mode();
                // STEP 5: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // STEP 6: "Switch the insertion mode to "text"."
                self.transition(InsertionMode::Text);
                true
            }
            "xmp" => {
                self.close_p_in_button_scope();
                self.reconstruct_formatting_elements();
                self.frameset_ok = false;
                self.handle_raw_text(token, TokenizerState::Rawtext);
                true
            }
            "iframe" => {
                self.frameset_ok = false;
                self.handle_raw_text(token, TokenizerState::Rawtext);
                true
            }
            "noembed" => {
                self.handle_raw_text(token, TokenizerState::Rawtext);
                true
            }
            "select" => {
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                //  table body", "in row", or "in cell", then switch the insertion
                //  mode to "in select in table". Otherwise, switch the insertion
                //  mode to "in select"."
                let mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.transition(mode);
                true
            }
            _ if OPTIONS.contains(&tag) => {
                if self.current_is("option") {
                    let _ = self.process_end_tag("option");
                }
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                true
            }
            _ if RUBY.contains(&tag) => {
                if self.in_scope("ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.current_is("ruby") {
                        self.error(token);
                        self.pop_stack_to_before("ruby");
                    }
                }
                let _ = self.insert(token);
                true
            }
            "math" | "svg" => {
                let language = if tag == "svg" { "SVG" } else { "MathML" };
                warn_once(
                    "wren::tree_builder",
                    &format!("{language} content is parsed as ordinary HTML elements"),
                );
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                true
            }
            // "Parse error. Ignore the token."
            _ if IN_BODY_START_DROP.contains(&tag) => {
                self.error(token);
                false
            }
            // "Any other start tag: Reconstruct the active formatting elements, if
            //  any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_formatting_elements();
                let _ = self.insert(token);
                true
            }
        }
    }

    /// `<isindex>` expands into a small search form: a form holding a label,
    /// its prompt and a text input named "isindex", between two rules.
    fn handle_isindex(&mut self, token: &Token, attributes: &Attributes) -> bool {
        self.error(token);
        if self.form_element.is_some() {
            return false;
        }

        let _ = self.process_start_tag("form");
        if let Some(action) = attributes.get_ignore_case("action")
            && let Some(form) = self.form_element
        {
            self.tree.set_attr(form, "action", action);
        }
        let _ = self.process_start_tag("hr");
        let _ = self.process_start_tag("label");

        let prompt = attributes
            .get_ignore_case("prompt")
            .unwrap_or(ISINDEX_PROMPT);
        let _ = self.process(&Token::Character {
            data: prompt.to_string(),
        });

        let mut input_attributes = Attributes::new();
        for attr in attributes.iter() {
            if !ISINDEX_INPUT_EXCLUDED.contains(&attr.key.to_lowercase().as_str()) {
                input_attributes.put(attr.key.clone(), attr.value.clone());
            }
        }
        input_attributes.put("name", "isindex");
        let _ = self.process(&Token::StartTag {
            name: "input".to_string(),
            attributes: input_attributes,
            self_closing: false,
        });

        let _ = self.process_end_tag("label");
        let _ = self.process_start_tag("hr");
        let _ = self.process_end_tag("form");
        true
    }

    fn in_body_end_tag(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();

        match tag {
            // "If the stack of open elements does not have a body element in
            //  scope, this is a parse error; ignore the token. ... Switch the
            //  insertion mode to "after body"."
            "body" => {
                if !self.in_scope("body") {
                    self.error(token);
                    return false;
                }
                self.transition(InsertionMode::AfterBody);
                true
            }
            // "Act as if an end tag with tag name "body" had been seen, then, if
            //  that token wasn't ignored, reprocess the current token."
            "html" => {
                if self.process_end_tag("body") {
                    self.process(token)
                } else {
                    false
                }
            }
            _ if IN_BODY_END_CLOSERS.contains(&tag) => {
                if !self.in_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(tag) {
                    self.error(token);
                }
                self.pop_stack_to_close(tag);
                true
            }
            "form" => {
                // STEP 1: "Let node be the element that the form element pointer
                //         is set to, or null if it is not set to an element."
                // STEP 2: "Set the form element pointer to null."
                let node = self.form_element.take();
                // STEP 3: "If node is null or the stack of open elements does not
                //         have node in scope, then this is a parse error; return
                //         and ignore the token."
                let Some(form) = node.filter(|_| self.in_scope("form")) else {
                    self.error(token);
                    return false;
                };
                // STEP 4: "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // STEP 5: "If the current node is not node, then this is a parse
                //         error."
                if self.current_node() != Some(form) {
                    self.error(token);
                }
                // STEP 6: "Remove node from the stack of open elements."
                let _ = self.remove_from_stack(form);
                true
            }
            "p" => {
                // "If the stack of open elements does not have a p element in
                //  button scope, then this is a parse error; insert an HTML
                //  element for a "p" start tag token with no attributes."
                if !self.in_button_scope("p") {
                    self.error(token);
                    let _ = self.process_start_tag("p");
                    return self.process(token);
                }
                self.generate_implied_end_tags(Some("p"));
                if !self.current_is("p") {
                    self.error(token);
                }
                self.pop_stack_to_close("p");
                true
            }
            "li" => {
                if !self.in_list_item_scope("li") {
                    self.error(token);
                    return false;
                }
                self.generate_implied_end_tags(Some("li"));
                if !self.current_is("li") {
                    self.error(token);
                }
                self.pop_stack_to_close("li");
                true
            }
            _ if DD_DT.contains(&tag) => {
                if !self.in_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.generate_implied_end_tags(Some(tag));
                if !self.current_is(tag) {
                    self.error(token);
                }
                self.pop_stack_to_close(tag);
                true
            }
            _ if HEADINGS.contains(&tag) => {
                // "If the stack of open elements does not have an element in scope
                //  that is an HTML element and whose tag name is one of "h1",
                //  "h2", "h3", "h4", "h5", or "h6", then this is a parse error;
                //  ignore the token."
                if !self.in_scope_one_of(HEADINGS) {
                    self.error(token);
                    return false;
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(tag) {
                    self.error(token);
                }
                self.pop_stack_to_close_one_of(HEADINGS);
                true
            }
            _ if ADOPTION_FORMATTERS.contains(&tag) => self.run_adoption_agency(token, tag),
            _ if APPLETS.contains(&tag) => {
                if !self.in_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(tag) {
                    self.error(token);
                }
                self.pop_stack_to_close(tag);
                self.clear_formatting_elements_to_last_marker();
                true
            }
            // "Parse error. Drop the attributes from the token, and act as
            //  described in the next entry; i.e. act as if this was a "br" start
            //  tag token with no attributes, rather than the end tag token that it
            //  actually is."
            "br" => {
                self.error(token);
                let _ = self.process_start_tag("br");
                false
            }
            _ => self.any_other_end_tag(token, tag),
        }
    }

    /// "Any other end tag" in body.
    pub(super) fn any_other_end_tag(&mut self, token: &Token, name: &str) -> bool {
        // STEP 1: "Initialize node to be the current node (the bottommost node of
        //         the stack)."
        for pos in (0..self.stack.len()).rev() {
            let node = self.stack[pos];
            // STEP 2: "Loop: If node is an HTML element with the same tag name as
            //         the token, then:"
            if self.name_of(node) == name {
                // STEP 2.1: "Generate implied end tags, except for HTML elements
                //           with the same tag name as the token."
                self.generate_implied_end_tags(Some(name));
                // STEP 2.2: "If node is not the current node, then this is a
                //           parse error."
                if self.current_node() != Some(node) {
                    self.error(token);
                }
                // STEP 2.3: "Pop all the nodes from the current node up to node,
                //           including node, then stop these steps."
                while let Some(popped) = self.pop() {
                    if popped == node {
                        break;
                    }
                }
                return true;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this is
            //         a parse error; ignore the token, and return."
            if self.is_special(node) {
                self.error(token);
                return false;
            }
            // STEP 4: "Set node to the previous entry in the stack of open
            //         elements."
        }
        true
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Run for an end tag named `subject` that names a formatting element.
    fn run_adoption_agency(&mut self, token: &Token, subject: &str) -> bool {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //         subject, and the current node is not in the list of active
        //         formatting elements, then pop the current node off the stack of
        //         open elements and return."
        if let Some(current) = self.current_node()
            && self.name_of(current) == subject
            && !self.is_in_active_formatting_elements(current)
        {
            let _ = self.pop();
            return true;
        }

        // STEP 3-4: "Let outer loop counter be 0. Outer loop: If outer loop
        //           counter is greater than or equal to 8, then return."
        for _ in 0..ADOPTION_OUTER_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list of
            //           active formatting elements that: is between the end of
            //           the list and the last marker in the list, if any, or the
            //           start of the list otherwise, and has the tag name subject.
            //           If there is no such element, then return and instead act
            //           as described in the "any other end tag" entry above."
            let Some(formatting_element) = self.active_formatting_element(subject) else {
                return self.any_other_end_tag(token, subject);
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //           elements, then this is a parse error; remove the element
            //           from the list, and return."
            let Some(formatting_pos) = self.stack.iter().position(|&id| id == formatting_element)
            else {
                self.error(token);
                self.remove_from_active_formatting_elements(formatting_element);
                return true;
            };

            // STEP 4.5: "If formatting element is in the stack of open elements,
            //           but the element is not in scope, then this is a parse
            //           error; return."
            if !self.in_scope(subject) {
                self.error(token);
                return false;
            }

            // STEP 4.6: "If formatting element is not the current node, this is a
            //           parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.error(token);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than formatting
            //           element, and is an element in the special category. There
            //           might not be one."
            let furthest_block = self.stack[formatting_pos + 1..]
                .iter()
                .copied()
                .find(|&id| self.is_special(id));

            // STEP 4.8: "If there is no furthest block, then the UA must first pop
            //           all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element from
            //           the list of active formatting elements, and finally
            //           return."
            let Some(furthest_block) = furthest_block else {
                self.stack.truncate(formatting_pos);
                self.remove_from_active_formatting_elements(formatting_element);
                return true;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let common_ancestor = formatting_pos
                .checked_sub(1)
                .map_or_else(|| self.document_node(), |pos| self.stack[pos]);

            // STEP 4.10: "Let a bookmark note the position of formatting element
            //            in the list of active formatting elements relative to
            //            the elements on either side of it in the list."
            let mut bookmark = self
                .formatting_position(formatting_element)
                .unwrap_or(self.formatting_elements.len());

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_pos = self
                .stack
                .iter()
                .position(|&id| id == furthest_block)
                .unwrap_or(formatting_pos + 1);
            let mut last_node = furthest_block;

            // STEP 4.13: "Inner loop"
            for _ in 0..ADOPTION_INNER_LIMIT {
                // STEP 4.13.2: "Let node be the element immediately above node in
                //              the stack of open elements, or if node is no longer
                //              in the stack of open elements (e.g. because it got
                //              removed by this algorithm), the element that was
                //              immediately above node in the stack of open
                //              elements before node was removed."
                node_pos -= 1;
                let node = self.stack[node_pos];

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                //              elements, then remove node from the stack of open
                //              elements and continue."
                let Some(entry_pos) = self.formatting_position(node) else {
                    let _ = self.stack.remove(node_pos);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                //              element node was created ... replace the entry for
                //              node in the list of active formatting elements with
                //              an entry for the new element, replace the entry for
                //              node in the stack of open elements with an entry for
                //              the new element, and let node be the new element."
                let replacement = self.tree.shallow_clone(node);
                self.replace_active_formatting_element(node, replacement);
                self.replace_on_stack(node, replacement);

                // STEP 4.13.7: "If last node is furthest block, then move the
                //              aforementioned bookmark to be immediately after the
                //              new node in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = entry_pos + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.tree.append_child(replacement, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = replacement;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            //            appropriate place for inserting a node, but using common
            //            ancestor as the override target."
            if self.is_one_of(common_ancestor, TABLE_FOSTER_TARGETS) {
                self.tree.remove(last_node);
                self.insert_in_foster_parent(last_node);
            } else {
                self.tree.append_child(common_ancestor, last_node);
            }

            // STEP 4.15: "Create an element for the token for which formatting
            //            element was created, in the HTML namespace, with common
            //            ancestor as the intended parent."
            let adopted = self.tree.shallow_clone(formatting_element);

            // STEP 4.16: "Take all of the child nodes of furthest block and append
            //            them to the element created in the last step."
            self.tree.move_children(furthest_block, adopted);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, adopted);

            // STEP 4.18: "Remove formatting element from the list of active
            //            formatting elements, and insert the new element into the
            //            list of active formatting elements at the position of the
            //            aforementioned bookmark."
            if let Some(pos) = self.formatting_position(formatting_element) {
                let _ = self.formatting_elements.remove(pos);
                if pos < bookmark {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.formatting_elements.len());
            self.formatting_elements
                .insert(bookmark, FormattingEntry::Element(adopted));

            // STEP 4.19: "Remove formatting element from the stack of open
            //            elements, and insert the new element into the stack of
            //            open elements immediately below the position of furthest
            //            block in that stack."
            let _ = self.remove_from_stack(formatting_element);
            self.insert_on_stack_after(furthest_block, adopted);
        }
        true
    }
}
