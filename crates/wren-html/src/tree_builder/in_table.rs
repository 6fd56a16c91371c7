//! The table and select insertion modes.
//!
//! [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
//! through
//! [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)

use super::core::{HtmlTreeBuilder, InsertionMode, is_blank};
use super::tag_sets::{
    CELLS, IN_CAPTION_CLOSERS, IN_CAPTION_END_IGNORED, IN_CELL_END_CLOSERS, IN_CELL_END_IGNORED,
    IN_CELL_START_CLOSERS, IN_ROW_END_IGNORED, IN_ROW_EXITS, IN_SELECT_INPUTS,
    IN_SELECT_TABLE_ENDS, IN_TABLE_BODY_END_IGNORED, IN_TABLE_BODY_EXITS, IN_TABLE_END_IGNORED,
    TABLE_SECTIONS,
};
use crate::tokenizer::Token;

impl HtmlTreeBuilder {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            // "A character token, if the current node is table, tbody, template,
            //  tfoot, thead, or tr element"
            Token::Character { .. } => {
                // "Let the pending table character tokens be an empty list of
                //  tokens."
                self.pending_table_characters.clear();
                // "Let the original insertion mode be the current insertion mode."
                self.mark_insertion_mode();
                // "Switch the insertion mode to "in table text" and reprocess the
                //  token."
                self.transition(InsertionMode::InTableText);
                self.process(token)
            }
            Token::Comment { data, .. } => {
                self.insert_comment(data);
                true
            }
            Token::Doctype { .. } => {
                self.error(token);
                false
            }
            Token::StartTag { attributes, .. } => match tag {
                // "Clear the stack back to a table context. Insert a marker at the
                //  end of the list of active formatting elements. Insert an HTML
                //  element for the token, then switch the insertion mode to "in
                //  caption"."
                "caption" => {
                    self.clear_stack_to_table_context();
                    self.insert_marker();
                    let _ = self.insert(token);
                    self.transition(InsertionMode::InCaption);
                    true
                }
                "colgroup" => {
                    self.clear_stack_to_table_context();
                    let _ = self.insert(token);
                    self.transition(InsertionMode::InColumnGroup);
                    true
                }
                // "Insert an HTML element for a "colgroup" start tag token with no
                //  attributes, then switch the insertion mode to "in column
                //  group". Reprocess the current token."
                "col" => {
                    let _ = self.process_start_tag("colgroup");
                    self.process(token)
                }
                _ if TABLE_SECTIONS.contains(&tag) => {
                    self.clear_stack_to_table_context();
                    let _ = self.insert(token);
                    self.transition(InsertionMode::InTableBody);
                    true
                }
                "td" | "th" | "tr" => {
                    let _ = self.process_start_tag("tbody");
                    self.process(token)
                }
                // "Parse error. If the stack of open elements does not have a
                //  table element in table scope, ignore the token. Otherwise: Pop
                //  elements from this stack until a table element has been popped
                //  from the stack. Reset the insertion mode appropriately.
                //  Reprocess the token."
                "table" => {
                    self.error(token);
                    if self.process_end_tag("table") {
                        self.process(token)
                    } else {
                        false
                    }
                }
                "style" | "script" => self.process_using(token, InsertionMode::InHead),
                "input" => {
                    // "If the token does not have an attribute with the name
                    //  "type", or if it does, but that attribute's value is not an
                    //  ASCII case-insensitive match for the string "hidden", then:
                    //  act as described in the "anything else" entry below."
                    let hidden = attributes
                        .get_ignore_case("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                    if !hidden {
                        return self.in_table_anything_else(token);
                    }
                    // "Otherwise: Parse error. Insert an HTML element for the
                    //  token. Pop that input element off the stack of open
                    //  elements."
                    self.error(token);
                    let _ = self.insert_empty(token);
                    true
                }
                // "Parse error. If there is a template element on the stack of
                //  open elements, or if the form element pointer is not null,
                //  ignore the token. Otherwise: Insert an HTML element for the
                //  token, and set the form element pointer to point to the element
                //  created. Pop that form element off the stack of open elements."
                "form" => {
                    self.error(token);
                    if self.form_element.is_some() {
                        return false;
                    }
                    let _ = self.insert_form(token, false);
                    true
                }
                _ => self.in_table_anything_else(token),
            },
            Token::EndTag { .. } => match tag {
                "table" => {
                    if !self.in_table_scope("table") {
                        self.error(token);
                        return false;
                    }
                    self.pop_stack_to_close("table");
                    self.reset_insertion_mode();
                    true
                }
                _ if IN_TABLE_END_IGNORED.contains(&tag) => {
                    self.error(token);
                    false
                }
                _ => self.in_table_anything_else(token),
            },
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::EndOfFile => {
                if !self.current_is("html") {
                    self.error(token);
                }
                true
            }
            Token::CData { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    pub(super) fn in_table_anything_else(&mut self, token: &Token) -> bool {
        self.error(token);
        let previous = std::mem::replace(&mut self.foster_inserts, true);
        let processed = self.process_using(token, InsertionMode::InBody);
        self.foster_inserts = previous;
        processed
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) -> bool {
        if let Token::Character { data } = token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            //  token."
            let kept: String = data.chars().filter(|&c| c != '\0').collect();
            if kept.len() != data.len() {
                self.error(token);
            }
            // "Any other character token: Append the character token to the
            //  pending table character tokens list."
            if !kept.is_empty() {
                self.pending_table_characters.push(kept);
            }
            return true;
        }

        // "Anything else"
        let pending = std::mem::take(&mut self.pending_table_characters).concat();
        if !pending.is_empty() {
            if is_blank(&pending) {
                // "Otherwise, insert the characters given by the pending table
                //  character tokens list."
                self.insert_characters(&pending);
            } else {
                // "If any of the tokens in the pending table character tokens list
                //  are character tokens that are not ASCII whitespace, then this is
                //  a parse error: reprocess the character tokens in the pending
                //  table character tokens list using the rules given in the
                //  "anything else" entry in the "in table" insertion mode."
                let _ = self.in_table_anything_else(&Token::Character { data: pending });
            }
        }
        // "Switch the insertion mode to the original insertion mode and
        //  reprocess the token."
        self.transition(self.original_insertion_mode);
        self.process(token)
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::EndTag { .. } if tag == "caption" => {
                // STEP 1: "If the stack of open elements does not have a caption
                //         element in table scope, this is a parse error; ignore the
                //         token."
                if !self.in_table_scope("caption") {
                    self.error(token);
                    return false;
                }
                // STEP 2: "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // STEP 3: "Now, if the current node is not a caption element, then
                //         this is a parse error."
                if !self.current_is("caption") {
                    self.error(token);
                }
                // STEP 4: "Pop elements from this stack until a caption element has
                //         been popped from the stack."
                self.pop_stack_to_close("caption");
                // STEP 5: "Clear the list of active formatting elements up to the
                //         last marker."
                self.clear_formatting_elements_to_last_marker();
                // STEP 6: "Switch the insertion mode to "in table"."
                self.transition(InsertionMode::InTable);
                true
            }
            Token::StartTag { .. } if IN_CAPTION_CLOSERS.contains(&tag) => {
                self.close_caption_and_reprocess(token)
            }
            Token::EndTag { .. } if tag == "table" => self.close_caption_and_reprocess(token),
            Token::EndTag { .. } if IN_CAPTION_END_IGNORED.contains(&tag) => {
                self.error(token);
                false
            }
            _ => self.process_using(token, InsertionMode::InBody),
        }
    }

    fn close_caption_and_reprocess(&mut self, token: &Token) -> bool {
        self.error(token);
        if self.process_end_tag("caption") {
            self.process(token)
        } else {
            false
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) -> bool {
        if let Some(processed) = self.split_leading_whitespace(token, InsertionMode::InColumnGroup)
        {
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
            Token::StartTag { .. } if tag == "html" => {
                self.process_using(token, InsertionMode::InBody)
            }
            Token::StartTag { .. } if tag == "col" => {
                let _ = self.insert_empty(token);
                true
            }
            // "If the current node is not a colgroup element, then this is a
            //  parse error; ignore the token. Otherwise, pop the current node
            //  from the stack of open elements. Switch the insertion mode to "in
            //  table"."
            Token::EndTag { .. } if tag == "colgroup" => {
                if !self.current_is("colgroup") {
                    self.error(token);
                    return false;
                }
                let _ = self.pop();
                self.transition(InsertionMode::InTable);
                true
            }
            Token::EndTag { .. } if tag == "col" => {
                self.error(token);
                false
            }
            Token::EndOfFile if self.current_is("html") => true,
            _ => {
                if !self.current_is("colgroup") {
                    self.error(token);
                    return false;
                }
                let _ = self.pop();
                self.transition(InsertionMode::InTable);
                self.process(token)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            // "Clear the stack back to a table body context. Insert an HTML
            //  element for the token, then switch the insertion mode to "in row"."
            Token::StartTag { .. } if tag == "tr" => {
                self.clear_stack_to_table_body_context();
                let _ = self.insert(token);
                self.transition(InsertionMode::InRow);
                true
            }
            // "Parse error. Clear the stack back to a table body context. Insert
            //  an HTML element for a "tr" start tag token with no attributes, then
            //  switch the insertion mode to "in row". Reprocess the current token."
            Token::StartTag { .. } if CELLS.contains(&tag) => {
                self.error(token);
                let _ = self.process_start_tag("tr");
                self.process(token)
            }
            Token::StartTag { .. } if IN_TABLE_BODY_EXITS.contains(&tag) => {
                self.exit_table_body(token)
            }
            Token::EndTag { .. } if TABLE_SECTIONS.contains(&tag) => {
                if !self.in_table_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.clear_stack_to_table_body_context();
                let _ = self.pop();
                self.transition(InsertionMode::InTable);
                true
            }
            Token::EndTag { .. } if tag == "table" => self.exit_table_body(token),
            Token::EndTag { .. } if IN_TABLE_BODY_END_IGNORED.contains(&tag) => {
                self.error(token);
                false
            }
            _ => self.process_using(token, InsertionMode::InTable),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the current
    /// node from the stack of open elements. Switch the insertion mode to "in
    /// table". Reprocess the token."
    fn exit_table_body(&mut self, token: &Token) -> bool {
        if !TABLE_SECTIONS.iter().any(|section| self.in_table_scope(section)) {
            self.error(token);
            return false;
        }
        self.clear_stack_to_table_body_context();
        let current = self.current_name().to_string();
        let _ = self.process_end_tag(&current);
        self.process(token)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            // "Clear the stack back to a table row context. Insert an HTML element
            //  for the token, then switch the insertion mode to "in cell". Insert
            //  a marker at the end of the list of active formatting elements."
            Token::StartTag { .. } if CELLS.contains(&tag) => {
                self.clear_stack_to_table_row_context();
                let _ = self.insert(token);
                self.transition(InsertionMode::InCell);
                self.insert_marker();
                true
            }
            Token::StartTag { .. } if IN_ROW_EXITS.contains(&tag) => {
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { .. } if tag == "tr" => {
                if !self.in_table_scope("tr") {
                    self.error(token);
                    return false;
                }
                self.clear_stack_to_table_row_context();
                let _ = self.pop();
                self.transition(InsertionMode::InTableBody);
                true
            }
            Token::EndTag { .. } if tag == "table" => self.close_row_and_reprocess(token),
            Token::EndTag { .. } if TABLE_SECTIONS.contains(&tag) => {
                if !self.in_table_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { .. } if IN_ROW_END_IGNORED.contains(&tag) => {
                self.error(token);
                false
            }
            _ => self.process_using(token, InsertionMode::InTable),
        }
    }

    /// Act as if `</tr>` had been seen, then reprocess if it was not ignored.
    fn close_row_and_reprocess(&mut self, token: &Token) -> bool {
        if self.process_end_tag("tr") {
            self.process(token)
        } else {
            false
        }
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::EndTag { .. } if CELLS.contains(&tag) => {
                // STEP 1: "If the stack of open elements does not have an element
                //         in table scope that is an HTML element with the same tag
                //         name as that of the token, then this is a parse error;
                //         ignore the token."
                if !self.in_table_scope(tag) {
                    self.error(token);
                    return false;
                }
                // STEP 2: "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // STEP 3: "Now, if the current node is not an HTML element with
                //         the same tag name as the token, then this is a parse
                //         error."
                if !self.current_is(tag) {
                    self.error(token);
                }
                // STEP 4: "Pop elements from the stack of open elements stack
                //         until an HTML element with the same tag name as the token
                //         has been popped from the stack."
                self.pop_stack_to_close(tag);
                // STEP 5: "Clear the list of active formatting elements up to the
                //         last marker."
                self.clear_formatting_elements_to_last_marker();
                // STEP 6: "Switch the insertion mode to "in row"."
                self.transition(InsertionMode::InRow);
                true
            }
            Token::EndTag { .. } if IN_CELL_END_IGNORED.contains(&tag) => {
                self.error(token);
                false
            }
            Token::EndTag { .. } if IN_CELL_END_CLOSERS.contains(&tag) => {
                if !self.in_table_scope(tag) {
                    self.error(token);
                    return false;
                }
                self.close_cell();
                self.process(token)
            }
            // "If the stack of open elements does not have a td or th element in
            //  table scope, then this is a parse error; ignore the token.
            //  Otherwise, close the cell and reprocess the token."
            Token::StartTag { .. } if IN_CELL_START_CLOSERS.contains(&tag) => {
                if !CELLS.iter().any(|cell| self.in_table_scope(cell)) {
                    self.error(token);
                    return false;
                }
                self.close_cell();
                self.process(token)
            }
            _ => self.process_using(token, InsertionMode::InBody),
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    fn close_cell(&mut self) {
        let cell = if self.in_table_scope("td") { "td" } else { "th" };
        let _ = self.process_end_tag(cell);
    }

    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            Token::Character { data } => {
                // "A character token that is U+0000 NULL: Parse error. Ignore the
                //  token."
                let kept: String = data.chars().filter(|&c| c != '\0').collect();
                if kept.len() != data.len() {
                    self.error(token);
                }
                if kept.is_empty() {
                    return false;
                }
                self.insert_characters(&kept);
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
                // "If the current node is an option element, pop that node from
                //  the stack of open elements. Insert an HTML element for the
                //  token."
                "option" => {
                    if self.current_is("option") {
                        let _ = self.process_end_tag("option");
                    }
                    let _ = self.insert(token);
                    true
                }
                "optgroup" => {
                    if self.current_is("option") {
                        let _ = self.process_end_tag("option");
                    }
                    if self.current_is("optgroup") {
                        let _ = self.process_end_tag("optgroup");
                    }
                    let _ = self.insert(token);
                    true
                }
                // "Parse error. If the stack of open elements does not have a
                //  select element in select scope, ignore the token. (fragment
                //  case) Otherwise: Pop elements from the stack of open elements
                //  until a select element has been popped from the stack. Reset
                //  the insertion mode appropriately."
                "select" => {
                    self.error(token);
                    self.process_end_tag("select")
                }
                _ if IN_SELECT_INPUTS.contains(&tag) => {
                    self.error(token);
                    if !self.in_select_scope("select") {
                        return false;
                    }
                    let _ = self.process_end_tag("select");
                    self.process(token)
                }
                "script" => self.process_using(token, InsertionMode::InHead),
                _ => {
                    self.error(token);
                    false
                }
            },
            Token::EndTag { .. } => match tag {
                // "First, if the current node is an option element, and the node
                //  immediately before it in the stack of open elements is an
                //  optgroup element, then pop the current node from the stack of
                //  open elements."
                "optgroup" => {
                    if let Some(current) = self.current_node()
                        && self.current_is("option")
                        && self
                            .above_on_stack(current)
                            .is_some_and(|above| self.tree.is_named(above, "optgroup"))
                    {
                        let _ = self.process_end_tag("option");
                    }
                    if self.current_is("optgroup") {
                        let _ = self.pop();
                    } else {
                        self.error(token);
                    }
                    true
                }
                "option" => {
                    if self.current_is("option") {
                        let _ = self.pop();
                    } else {
                        self.error(token);
                    }
                    true
                }
                "select" => {
                    if !self.in_select_scope("select") {
                        self.error(token);
                        return false;
                    }
                    self.pop_stack_to_close("select");
                    self.reset_insertion_mode();
                    true
                }
                _ => {
                    self.error(token);
                    false
                }
            },
            Token::EndOfFile => {
                if !self.current_is("html") {
                    self.error(token);
                }
                true
            }
            Token::CData { .. } => {
                self.error(token);
                false
            }
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> bool {
        let tag = token.normal_name().unwrap_or_default();
        let tag = tag.as_str();
        match token {
            // "Parse error. Pop elements from the stack of open elements until a
            //  select element has been popped from the stack. Reset the insertion
            //  mode appropriately. Reprocess the token."
            Token::StartTag { .. } if IN_SELECT_TABLE_ENDS.contains(&tag) => {
                self.error(token);
                let _ = self.process_end_tag("select");
                self.process(token)
            }
            // "If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as that of the
            //  token, then ignore the token."
            Token::EndTag { .. } if IN_SELECT_TABLE_ENDS.contains(&tag) => {
                self.error(token);
                if !self.in_table_scope(tag) {
                    return false;
                }
                let _ = self.process_end_tag("select");
                self.process(token)
            }
            _ => self.process_using(token, InsertionMode::InSelect),
        }
    }
}
