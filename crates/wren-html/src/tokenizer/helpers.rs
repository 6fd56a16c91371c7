//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", advance-then-switch)
//! - Token emission ("Emit the current token")
//! - Pending token management
//! - Parse error recording

use log::{debug, trace};
use wren_common::ParseError;

use super::core::{Tokenizer, TokenizerState};
use super::token::Token;

/// U+FFFD REPLACEMENT CHARACTER, substituted for NUL and invalid references.
pub(crate) const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
pub(crate) const fn is_whitespace_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{000C}' | ' ')
}

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Tokenizer {
    /// "Switch to the X state"
    pub(crate) fn transition(&mut self, new_state: TokenizerState) {
        trace!(target: "wren::tokenizer", "{} -> {}", self.state, new_state);
        self.state = new_state;
    }

    /// Consume the current character, then switch state.
    pub(super) fn advance_transition(&mut self, new_state: TokenizerState) {
        self.reader.advance();
        self.transition(new_state);
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl Tokenizer {
    /// Queue a non-character token for the next [`Tokenizer::read`].
    ///
    /// # Panics
    ///
    /// Panics if a token is already waiting to be read, which indicates a bug
    /// in the state machine.
    pub(crate) fn emit(&mut self, token: Token) {
        assert!(
            self.emit_pending.is_none(),
            "there is an unread token pending"
        );
        trace!(target: "wren::tokenizer", "emit {token}");
        if let Token::StartTag {
            name, self_closing, ..
        } = &token
        {
            self.last_start_tag = Some(name.to_lowercase());
            if *self_closing {
                self.self_closing_flag_acknowledged = false;
            }
        }
        self.emit_pending = Some(token);
    }

    /// Append text to the pending character run.
    pub(super) fn emit_str(&mut self, s: &str) {
        self.char_buffer.push_str(s);
    }

    /// Append a character to the pending character run.
    pub(super) fn emit_char(&mut self, c: char) {
        self.char_buffer.push(c);
    }

    /// Used by the tree builder to close an element written as `<x/>`.
    pub(crate) fn emit_end_tag(&mut self, name: &str) {
        self.emit(Token::EndTag {
            name: name.to_string(),
        });
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "When a start or end tag token is created..."
    pub(super) fn create_tag_pending(&mut self, is_start: bool) {
        self.tag_pending.reset(is_start);
    }

    /// "Emit the current tag token."
    pub(super) fn emit_tag_pending(&mut self) {
        if let Some(duplicate) = self.tag_pending.finalise() {
            self.error(&format!("Dropped duplicate attribute '{duplicate}'"));
        }
        if !self.tag_pending.is_start && self.tag_pending.has_attributes() {
            self.error("Attributes incorrectly present on end tag");
        }
        let token = self.tag_pending.take_token();
        self.emit(token);
    }

    /// Start a new attribute on the pending tag, reporting a dropped duplicate.
    pub(super) fn new_attribute(&mut self) {
        if let Some(duplicate) = self.tag_pending.new_attribute() {
            self.error(&format!("Dropped duplicate attribute '{duplicate}'"));
        }
    }

    pub(super) fn create_comment_pending(&mut self, bogus: bool) {
        self.comment_pending.reset(bogus);
    }

    /// "Emit the current comment token."
    pub(super) fn emit_comment_pending(&mut self) {
        let token = self.comment_pending.take_token();
        self.emit(token);
    }

    pub(super) fn create_doctype_pending(&mut self) {
        self.doctype_pending.reset();
    }

    /// "Emit the current DOCTYPE token."
    pub(super) fn emit_doctype_pending(&mut self) {
        let token = self.doctype_pending.take_token();
        self.emit(token);
    }

    /// Set force-quirks on the pending DOCTYPE, emit it and return to data.
    pub(super) fn emit_quirky_doctype(&mut self) {
        self.doctype_pending.force_quirks = true;
        self.emit_doctype_pending();
        self.transition(TokenizerState::Data);
    }

    /// "Set the temporary buffer to the empty string."
    pub(super) fn create_temp_buffer(&mut self) {
        self.data_buffer.clear();
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.last_start_tag
            .as_deref()
            .is_some_and(|last| self.tag_pending.name.eq_ignore_ascii_case(last))
    }

    /// Name of the last start tag emitted, lower-cased.
    pub(super) fn appropriate_end_tag_name(&self) -> Option<&str> {
        self.last_start_tag.as_deref()
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// The tree builder calls this when the element really is void.
    pub(crate) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_flag_acknowledged = true;
    }
}

// =============================================================================
// Parse Error Helpers
// =============================================================================

impl Tokenizer {
    /// Record a parse error at the current input position.
    pub(crate) fn error(&mut self, message: &str) {
        debug!(target: "wren::tokenizer", "parse error at {}: {message}", self.reader.pos());
        if self.errors.can_add_error() {
            let _ = self
                .errors
                .push(ParseError::new(self.reader.pos(), message));
        }
    }

    /// An unexpected character in `state`.
    pub(super) fn state_error(&mut self, state: TokenizerState) {
        if self.errors.can_add_error() {
            let current = self.reader.current();
            self.error(&format!(
                "Unexpected character '{current}' in input state [{state}]"
            ));
        }
    }

    /// End of input reached in `state`.
    pub(super) fn eof_error(&mut self, state: TokenizerState) {
        if self.errors.can_add_error() {
            self.error(&format!(
                "Unexpectedly reached end of file (EOF) in input state [{state}]"
            ));
        }
    }

    pub(super) fn character_reference_error(&mut self, message: &str) {
        if self.errors.can_add_error() {
            self.error(&format!("Invalid character reference: {message}"));
        }
    }
}
