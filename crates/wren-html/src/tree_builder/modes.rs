//! The document-level insertion modes: everything outside "in body" and the
//! table and select modes.

use log::debug;
use wren_dom::{DocumentTypeData, NodeData, QuirksMode};

use super::core::{HtmlTreeBuilder, InsertionMode, is_blank};
use super::tag_sets::{
    AFTER_HEAD_TO_HEAD, BEFORE_HTML_END_BREAKOUTS, HTML4_TRANSITIONAL_PREFIXES, IN_HEAD_EMPTY,
    IN_HEAD_END_BREAKOUTS, IN_HEAD_NOSCRIPT_TO_HEAD, IN_HEAD_RAW, LIMITED_QUIRKY_PUBLIC_PREFIXES,
    QUIRKY_PUBLIC_IDS, QUIRKY_PUBLIC_PREFIXES, QUIRKY_SYSTEM_ID,
};
use crate::tokenizer::helpers::is_whitespace_char;
use crate::tokenizer::{Token, TokenizerState};

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// Decide the document's compatibility mode from its DOCTYPE. Identifiers are
/// compared ASCII case-insensitively; an empty system identifier counts as
/// missing.
pub(super) fn doctype_quirks_mode(
    name: &str,
    public_id: &str,
    system_id: &str,
    force_quirks: bool,
) -> QuirksMode {
    let public_id = public_id.to_ascii_lowercase();
    let system_id = system_id.to_ascii_lowercase();
    let system_missing = system_id.is_empty();
    let public_starts_with = |prefixes: &[&str]| prefixes.iter().any(|p| public_id.starts_with(p));

    // "If the document is not an iframe srcdoc document, and the parser cannot
    //  change the mode flag is false, and the DOCTYPE token matches one of the
    //  conditions in the following list, then set the Document to quirks mode"
    if force_quirks
        || !name.eq_ignore_ascii_case("html")
        || QUIRKY_PUBLIC_IDS.contains(&public_id.as_str())
        || system_id == QUIRKY_SYSTEM_ID
        || public_starts_with(QUIRKY_PUBLIC_PREFIXES)
        || (system_missing && public_starts_with(HTML4_TRANSITIONAL_PREFIXES))
    {
        return QuirksMode::Quirks;
    }

    // "Otherwise, if ... the DOCTYPE token matches one of the conditions in the
    //  following list, then set the Document to limited-quirks mode"
    if public_starts_with(LIMITED_QUIRKY_PUBLIC_PREFIXES)
        || (!system_missing && public_starts_with(HTML4_TRANSITIONAL_PREFIXES))
    {
        return QuirksMode::LimitedQuirks;
    }
    QuirksMode::NoQuirks
}

impl HtmlTreeBuilder {
    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// The generic raw text and RCDATA element parsing algorithms, told apart
    /// by `state`. A `<title/>` written self-closing has no content to read, so
    /// the tokenizer keeps its state.
    pub(super) fn handle_raw_text(&mut self, token: &Token, state: TokenizerState) {
        let self_closing = matches!(
            token,
            Token::StartTag {
                self_closing: true,
                ..
            }
        );
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert(token);
        if self_closing {
            return;
        }
        // STEP 2: "If the algorithm that was invoked is the generic raw text
        //         element parsing algorithm, switch the tokenizer to the RAWTEXT
        //         state; otherwise the algorithm invoked was the generic RCDATA
        //         element parsing algorithm, switch the tokenizer to the RCDATA
        //         state."
        self.tokenizer.transition(state);
        // STEP 3: "Let the original insertion mode be the current insertion mode."
        self.mark_insertion_mode();
        // STEP 4: "Then, switch the insertion mode to "text"."
        self.transition(InsertionMode::Text);
    }

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::Initial) {
            return processed;
        }
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            //  LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR),
            //  or U+0020 SPACE: Ignore the token."
            Token::Character { data } if is_blank(data) => true,

            // "A comment token: Insert a comment as the last child of the Document
            //  object."
            Token::Comment { data, .. } => {
                let document = self.document_node();
                self.insert_comment_into(document, data);
                true
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                pub_sys_key,
                public_id,
                system_id,
                force_quirks,
            } => {
                // "Append a DocumentType node to the Document node, with its name
                //  set to the name given in the DOCTYPE token ... and the other
                //  attributes specific to DocumentType objects set to null or
                //  empty lists as appropriate."
                let doctype = self.tree.alloc(NodeData::DocumentType(DocumentTypeData {
                    name: self.settings.normalize_tag(name),
                    pub_sys_key: pub_sys_key.clone(),
                    public_id: public_id.clone(),
                    system_id: system_id.clone(),
                }));
                let document = self.document_node();
                self.tree.append_child(document, doctype);

                let mode = doctype_quirks_mode(name, public_id, system_id, *force_quirks);
                if mode != QuirksMode::NoQuirks {
                    debug!(target: "wren::tree_builder", "document is in {mode} mode");
                    self.tree.set_quirks_mode(mode);
                }
                // "Then, switch the insertion mode to "before html"."
                self.transition(InsertionMode::BeforeHtml);
                true
            }

            // "Anything else: ... In any case, switch the insertion mode to
            //  "before html", then reprocess the token."
            _ => {
                self.transition(InsertionMode::BeforeHtml);
                self.process(token)
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::BeforeHtml) {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            // "A comment token: Insert a comment as the last child of the Document
            //  object."
            Token::Comment { data, .. } => {
                let document = self.document_node();
                self.insert_comment_into(document, data);
                true
            }
            Token::Character { data } if is_blank(data) => true,

            // "A start tag whose tag name is "html": Create an element for the
            //  token in the HTML namespace, with the Document as the intended
            //  parent. Append it to the Document object. Put this element in the
            //  stack of open elements."
            Token::StartTag { .. } if tag == "html" => {
                let _ = self.insert(token);
                self.transition(InsertionMode::BeforeHead);
                true
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br":
            //  Act as described in the "anything else" entry below."
            Token::EndTag { .. } if BEFORE_HTML_END_BREAKOUTS.contains(&tag.as_str()) => {
                self.before_html_anything_else(token)
            }
            // "Any other end tag: Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.error(token);
                false
            }
            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess the
    /// token."
    fn before_html_anything_else(&mut self, token: &Token) -> bool {
        let _ = self.insert_element_named("html");
        self.transition(InsertionMode::BeforeHead);
        self.process(token)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::BeforeHead) {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        match token {
            Token::Character { data } if is_blank(data) => true,
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            // "A start tag whose tag name is "head": Insert an HTML element for
            //  the token. Set the head element pointer to the newly created head
            //  element."
            Token::StartTag { .. } if tag == "head" => {
                let head = self.insert(token);
                self.head_element = Some(head);
                self.transition(InsertionMode::InHead);
                true
            }
            Token::EndTag { .. } if BEFORE_HTML_END_BREAKOUTS.contains(&tag.as_str()) => {
                let _ = self.process_start_tag("head");
                self.process(token)
            }
            Token::EndTag { .. } => {
                self.error(token);
                false
            }
            // "Anything else: Insert an HTML element for a "head" start tag token
            //  with no attributes. ... Reprocess the current token."
            _ => {
                let _ = self.process_start_tag("head");
                self.process(token)
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::InHead) {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            // "Insert the character."
            Token::Character { data } if is_blank(data) => {
                self.insert_characters(data);
                true
            }
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } => match tag {
                "html" => self.process_using(token, InsertionMode::InBody),
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                _ if IN_HEAD_EMPTY.contains(&tag) => {
                    let element = self.insert_empty(token);
                    if tag == "base" && self.tree.has_attr(element, "href") {
                        self.maybe_set_base_uri(element);
                    }
                    true
                }
                "meta" => {
                    let _ = self.insert_empty(token);
                    true
                }
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => {
                    self.handle_raw_text(token, TokenizerState::Rcdata);
                    true
                }
                // "Follow the generic raw text element parsing algorithm."
                _ if IN_HEAD_RAW.contains(&tag) => {
                    self.handle_raw_text(token, TokenizerState::Rawtext);
                    true
                }
                // Scripting is never enabled, so noscript content is parsed as
                // markup.
                "noscript" => {
                    let _ = self.insert(token);
                    self.transition(InsertionMode::InHeadNoscript);
                    true
                }
                "script" => {
                    self.handle_raw_text(token, TokenizerState::ScriptData);
                    true
                }
                "head" => {
                    self.error(token);
                    false
                }
                _ => self.in_head_anything_else(token),
            },
            Token::EndTag { .. } => match tag {
                // "Pop the current node (which will be the head element) off the
                //  stack of open elements. Switch the insertion mode to "after head"."
                "head" => {
                    let _ = self.pop();
                    self.transition(InsertionMode::AfterHead);
                    true
                }
                _ if IN_HEAD_END_BREAKOUTS.contains(&tag) => self.in_head_anything_else(token),
                _ => {
                    self.error(token);
                    false
                }
            },
            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) -> bool {
        let _ = self.process_end_tag("head");
        self.process(token)
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) =
            self.split_leading_whitespace(token, InsertionMode::InHeadNoscript)
        {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            // "Pop the current node (which will be a noscript element) from the
            //  stack of open elements; the new current node will be a head
            //  element. Switch the insertion mode to "in head"."
            Token::EndTag { .. } if tag == "noscript" => {
                let _ = self.pop();
                self.transition(InsertionMode::InHead);
                true
            }
            Token::Character { data } if is_blank(data) => {
                self.process_using(token, InsertionMode::InHead)
            }
            Token::Comment { .. } => self.process_using(token, InsertionMode::InHead),
            Token::StartTag { .. } if IN_HEAD_NOSCRIPT_TO_HEAD.contains(&tag) => {
                self.process_using(token, InsertionMode::InHead)
            }
            Token::EndTag { .. } if tag == "br" => self.in_head_noscript_anything_else(token),
            Token::StartTag { .. } if matches!(tag, "head" | "noscript") => {
                self.error(token);
                false
            }
            Token::EndTag { .. } => {
                self.error(token);
                false
            }
            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) -> bool {
        self.error(token);
        let _ = self.pop();
        self.transition(InsertionMode::InHead);
        self.process(token)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::AfterHead) {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::Character { data } if is_blank(data) => {
                self.insert_characters(data);
                true
            }
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } => match tag {
                "html" => self.process_using(token, InsertionMode::InBody),
                "body" => {
                    let _ = self.insert(token);
                    self.frameset_ok = false;
                    self.transition(InsertionMode::InBody);
                    true
                }
                "frameset" => {
                    let _ = self.insert(token);
                    self.transition(InsertionMode::InFrameset);
                    true
                }
                // "Parse error. Push the node pointed to by the head element
                //  pointer onto the stack of open elements. Process the token
                //  using the rules for the "in head" insertion mode. Remove the
                //  node pointed to by the head element pointer from the stack of
                //  open elements. (It might not be the current node at this point.)"
                _ if AFTER_HEAD_TO_HEAD.contains(&tag) => {
                    self.error(token);
                    let Some(head) = self.head_element else {
                        return self.process_using(token, InsertionMode::InHead);
                    };
                    self.stack.push(head);
                    let processed = self.process_using(token, InsertionMode::InHead);
                    let _ = self.remove_from_stack(head);
                    processed
                }
                "head" => {
                    self.error(token);
                    false
                }
                _ => self.after_head_anything_else(token),
            },
            Token::EndTag { .. } if matches!(tag, "body" | "html" | "br") => {
                self.after_head_anything_else(token)
            }
            Token::EndTag { .. } => {
                self.error(token);
                false
            }
            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    fn after_head_anything_else(&mut self, token: &Token) -> bool {
        let _ = self.process_start_tag("body");
        self.frameset_ok = true;
        self.process(token)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) -> bool {
        match token {
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_characters(data);
                true
            }
            // "Parse error. ... Pop the current node off the stack of open
            //  elements. Switch the insertion mode to the original insertion mode
            //  and reprocess the token."
            Token::EndOfFile => {
                self.error(token);
                let _ = self.pop();
                self.transition(self.original_insertion_mode);
                self.process(token)
            }
            // "Any other end tag: Pop the current node off the stack of open
            //  elements. Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.pop();
                self.transition(self.original_insertion_mode);
                true
            }
            _ => true,
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::AfterBody) {
            return processed;
        }
        let tag = token.normal_name().unwrap_or_default();
        match token {
            Token::Character { data } if is_blank(data) => {
                self.process_using(token, InsertionMode::InBody)
            }
            // "Insert a comment as the last child of the first element in the
            //  stack of open elements (the html element)."
            Token::Comment { data, .. } => {
                let html = self
                    .stack
                    .first()
                    .copied()
                    .unwrap_or_else(|| self.document_node());
                self.insert_comment_into(html, data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            // "If the parser was created as part of the HTML fragment parsing
            //  algorithm, this is a parse error; ignore the token. Otherwise,
            //  switch the insertion mode to "after after body"."
            Token::EndTag { .. } if tag == "html" => {
                if self.fragment_root.is_some() {
                    self.error(token);
                    return false;
                }
                self.transition(InsertionMode::AfterAfterBody);
                true
            }
            Token::EndOfFile => true,
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            //  the token."
            _ => {
                self.error(token);
                self.transition(InsertionMode::InBody);
                self.process(token)
            }
        }
    }

    /// Insert only the whitespace of a character run, reporting anything else.
    fn insert_whitespace_only(&mut self, token: &Token, data: &str) {
        let whitespace: String = data.chars().filter(|&c| is_whitespace_char(c)).collect();
        if whitespace.len() != data.len() {
            self.error(token);
        }
        if !whitespace.is_empty() {
            self.insert_characters(&whitespace);
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::Character { data } => {
                self.insert_whitespace_only(token, data);
                true
            }
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } => match tag {
                "html" => self.process_using(token, InsertionMode::InBody),
                "frameset" => {
                    let _ = self.insert(token);
                    true
                }
                "frame" => {
                    let _ = self.insert_empty(token);
                    true
                }
                "noframes" => self.process_using(token, InsertionMode::InHead),
                _ => {
                    self.error(token);
                    false
                }
            },
            // "If the current node is the root html element, then this is a parse
            //  error; ignore the token. ... Otherwise, pop the current node from
            //  the stack of open elements. If the parser was not created as part
            //  of the HTML fragment parsing algorithm, and the current node is no
            //  longer a frameset element, then switch the insertion mode to
            //  "after frameset"."
            Token::EndTag { .. } if tag == "frameset" => {
                if self.current_is("html") {
                    self.error(token);
                    return false;
                }
                let _ = self.pop();
                if self.fragment_root.is_none() && !self.current_is("frameset") {
                    self.transition(InsertionMode::AfterFrameset);
                }
                true
            }
            Token::EndOfFile => {
                if !self.current_is("html") {
                    self.error(token);
                }
                true
            }
            _ => {
                self.error(token);
                false
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        match token {
            Token::Character { data } => {
                self.insert_whitespace_only(token, data);
                true
            }
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::EndTag { .. } if tag == "html" => {
                self.transition(InsertionMode::AfterAfterFrameset);
                true
            }
            Token::StartTag { .. } if tag == "noframes" => {
                self.process_using(token, InsertionMode::InHead)
            }
            Token::EndOfFile => true,
            _ => {
                self.error(token);
                false
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        match token {
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data, .. } => {
                let document = self.document_node();
                self.insert_comment_into(document, data);
                true
            }
            Token::Doctype { .. } => self.process_using(token, InsertionMode::InBody),
            Token::Character { data } if is_blank(data) => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::EndOfFile => true,
            _ => {
                self.error(token);
                self.transition(InsertionMode::InBody);
                self.process(token)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        match token {
            Token::Comment { data, .. } => {
                let document = self.document_node();
                self.insert_comment_into(document, data);
                true
            }
            Token::Doctype { .. } => self.process_using(token, InsertionMode::InBody),
            Token::Character { data } if is_blank(data) => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::StartTag { .. } if tag == "noframes" => {
                self.process_using(token, InsertionMode::InHead)
            }
            Token::EndOfFile => true,
            _ => {
                self.error(token);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html5_doctype_is_standards_mode() {
        assert_eq!(doctype_quirks_mode("html", "", "", false), QuirksMode::NoQuirks);
        assert_eq!(doctype_quirks_mode("HTML", "", "", false), QuirksMode::NoQuirks);
    }

    #[test]
    fn test_force_quirks_and_wrong_name() {
        assert_eq!(doctype_quirks_mode("html", "", "", true), QuirksMode::Quirks);
        assert_eq!(doctype_quirks_mode("svg", "", "", false), QuirksMode::Quirks);
    }

    #[test]
    fn test_public_identifier_prefixes() {
        assert_eq!(
            doctype_quirks_mode("html", "-//W3O//DTD W3 HTML 3.0//EN//", "", false),
            QuirksMode::Quirks
        );
        assert_eq!(
            doctype_quirks_mode("html", "-//W3C//DTD XHTML 1.0 Transitional//EN", "x", false),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_transitional_depends_on_system_identifier() {
        let public = "-//W3C//DTD HTML 4.01 Transitional//EN";
        assert_eq!(doctype_quirks_mode("html", public, "", false), QuirksMode::Quirks);
        assert_eq!(
            doctype_quirks_mode("html", public, "http://www.w3.org/TR/html4/loose.dtd", false),
            QuirksMode::LimitedQuirks
        );
    }
}
