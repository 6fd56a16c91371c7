use strum_macros::Display;
use wren_common::ParseErrorList;

use super::helpers::{REPLACEMENT_CHAR, is_whitespace_char};
use super::token::{CommentBuilder, DoctypeBuilder, TagBuilder, Token};
use crate::reader::{CharacterReader, EOF};

/// Stop set for the attribute name state.
const ATTRIBUTE_NAME_STOP: [char; 12] = [
    '\t', '\n', '\r', '\u{000C}', ' ', '/', '=', '>', '\0', '"', '\'', '<',
];

/// Stop set for the unquoted attribute value state.
const ATTRIBUTE_VALUE_UNQUOTED_STOP: [char; 13] = [
    '\t', '\n', '\r', '\u{000C}', ' ', '&', '>', '\0', '"', '\'', '<', '=', '`',
];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// Character references are decoded inline by the two
/// `CharacterReferenceIn*` states rather than through a return state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// A `&` seen in the data state.
    CharacterReferenceInData,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// A `&` seen in the RCDATA state.
    CharacterReferenceInRcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RcdataLessthanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RcdataEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RcdataEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RawtextLessthanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RawtextEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RawtextEndTagName,
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    ScriptDataLessthanSign,
    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    ScriptDataEndTagOpen,
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ScriptDataEndTagName,
    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    ScriptDataEscapeStart,
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    ScriptDataEscapedDash,
    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    ScriptDataEscapedDashDash,
    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    ScriptDataEscapedLessthanSign,
    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    ScriptDataEscapedEndTagOpen,
    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    ScriptDataEscapedEndTagName,
    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ScriptDataDoubleEscapedDash,
    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    ScriptDataDoubleEscapedDashDash,
    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    ScriptDataDoubleEscapedLessthanSign,
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDoctypePublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDoctypePublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DoctypePublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DoctypePublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDoctypePublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDoctypePublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDoctypeSystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDoctypeSystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DoctypeSystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DoctypeSystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDoctypeSystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDoctype,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CdataSection,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// Tokens are produced lazily, one per [`Tokenizer::read`]. Character data is
/// collected into runs and handed out ahead of the next non-character token.
pub struct Tokenizer {
    pub(crate) reader: CharacterReader,
    pub(super) errors: ParseErrorList,
    pub(super) state: TokenizerState,
    /// A non-character token waiting to be read.
    pub(super) emit_pending: Option<Token>,
    /// Character data waiting to be read.
    pub(super) char_buffer: String,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    /// "The temporary buffer is used to temporarily store characters during certain
    /// tokenization operations, particularly for end tag detection in RCDATA/RAWTEXT states."
    pub(super) data_buffer: String,

    pub(super) tag_pending: TagBuilder,
    pub(super) comment_pending: CommentBuilder,
    pub(super) doctype_pending: DoctypeBuilder,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag: Option<String>,
    pub(super) self_closing_flag_acknowledged: bool,
}

impl Tokenizer {
    /// Create a tokenizer reading from `reader`, recording errors into `errors`.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(reader: CharacterReader, errors: ParseErrorList) -> Self {
        Self {
            reader,
            errors,
            state: TokenizerState::Data,
            emit_pending: None,
            char_buffer: String::new(),
            data_buffer: String::new(),
            tag_pending: TagBuilder::default(),
            comment_pending: CommentBuilder::default(),
            doctype_pending: DoctypeBuilder::default(),
            last_start_tag: None,
            self_closing_flag_acknowledged: true,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Errors recorded so far.
    #[must_use]
    pub const fn errors(&self) -> &ParseErrorList {
        &self.errors
    }

    /// Give up the error list.
    #[must_use]
    pub fn into_errors(self) -> ParseErrorList {
        self.errors
    }

    /// Produce the next token. After [`Token::EndOfFile`] every further call
    /// returns another end-of-file token.
    pub fn read(&mut self) -> Token {
        if !self.self_closing_flag_acknowledged {
            self.error("Self closing flag not acknowledged");
            self.self_closing_flag_acknowledged = true;
        }
        loop {
            if let Some(token) = self.emit_pending.take() {
                if self.char_buffer.is_empty() {
                    return token;
                }
                // Text read before the token goes out first.
                self.emit_pending = Some(token);
                return Token::Character {
                    data: std::mem::take(&mut self.char_buffer),
                };
            }
            self.step();
        }
    }

    /// Run the handler for the current state once.
    fn step(&mut self) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::CharacterReferenceInData => {
                self.handle_character_reference_state(TokenizerState::Data);
            }
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::CharacterReferenceInRcdata => {
                self.handle_character_reference_state(TokenizerState::Rcdata);
            }
            TokenizerState::Rawtext => {
                self.handle_raw_data_state(TokenizerState::RawtextLessthanSign);
            }
            TokenizerState::ScriptData => {
                self.handle_raw_data_state(TokenizerState::ScriptDataLessthanSign);
            }
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessthanSign => self.handle_rcdata_less_than_sign_state(),
            TokenizerState::RcdataEndTagOpen => self.handle_rcdata_end_tag_open_state(),
            TokenizerState::RcdataEndTagName => self.handle_rcdata_end_tag_name_state(),
            TokenizerState::RawtextLessthanSign => {
                self.handle_less_than_sign_state(
                    TokenizerState::RawtextEndTagOpen,
                    TokenizerState::Rawtext,
                );
            }
            TokenizerState::RawtextEndTagOpen => {
                self.handle_end_tag_open_in_data(
                    TokenizerState::RawtextEndTagName,
                    TokenizerState::Rawtext,
                );
            }
            TokenizerState::RawtextEndTagName => {
                self.handle_end_tag_name_in_data(TokenizerState::Rawtext);
            }
            TokenizerState::ScriptDataLessthanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_end_tag_open_in_data(
                    TokenizerState::ScriptDataEndTagName,
                    TokenizerState::ScriptData,
                );
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_end_tag_name_in_data(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => {
                self.handle_script_data_escape_start_state(
                    TokenizerState::ScriptDataEscapeStartDash,
                );
            }
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_state(
                    TokenizerState::ScriptDataEscapedDashDash,
                );
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => {
                self.handle_script_data_escaped_dash_state();
            }
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessthanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_script_data_escaped_end_tag_open_state();
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_end_tag_name_in_data(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_double_escape_tag(
                    TokenizerState::ScriptDataDoubleEscaped,
                    TokenizerState::ScriptDataEscaped,
                );
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessthanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_double_escape_tag(
                    TokenizerState::ScriptDataEscaped,
                    TokenizerState::ScriptDataDoubleEscaped,
                );
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_keyword_state(true);
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '"');
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '\'');
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_identifiers_state();
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_keyword_state(false);
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '"');
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '\'');
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
        }
    }
}

// =============================================================================
// Data, RCDATA, RAWTEXT, script data and PLAINTEXT
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.reader.current() {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            '&' => self.advance_transition(TokenizerState::CharacterReferenceInData),
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            '<' => self.advance_transition(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            '\0' => {
                self.state_error(self.state);
                let c = self.reader.consume();
                self.emit_char(c);
            }
            // "EOF - Emit an end-of-file token."
            EOF => self.emit(Token::EndOfFile),
            // "Anything else - Emit the current input character as a character token."
            _ => {
                let data = self.reader.consume_data();
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "Flush code points consumed as a character reference. Switch to the
    /// return state."
    fn handle_character_reference_state(&mut self, return_state: TokenizerState) {
        match self.consume_character_reference(None, false) {
            Some(decoded) => self.emit_str(&decoded),
            None => self.emit_char('&'),
        }
        self.transition(return_state);
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.reader.current() {
            '&' => self.advance_transition(TokenizerState::CharacterReferenceInRcdata),
            '<' => self.advance_transition(TokenizerState::RcdataLessthanSign),
            // "Emit a U+FFFD REPLACEMENT CHARACTER character token."
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF => self.emit(Token::EndOfFile),
            _ => {
                let data = self.reader.consume_to_any(&['&', '<', '\0']);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    /// and [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ///
    /// Identical apart from the less-than sign state they lead to.
    fn handle_raw_data_state(&mut self, less_than_state: TokenizerState) {
        match self.reader.current() {
            '<' => self.advance_transition(less_than_state),
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF => self.emit(Token::EndOfFile),
            _ => {
                let data = self.reader.consume_raw_data();
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self) {
        match self.reader.current() {
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF => self.emit(Token::EndOfFile),
            _ => {
                let data = self.reader.consume_to('\0');
                self.emit_str(&data);
            }
        }
    }
}

// =============================================================================
// Tags
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.reader.current() {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            '!' => self.advance_transition(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            '/' => self.advance_transition(TokenizerState::EndTagOpen),
            // "U+003F QUESTION MARK (?) - This is an
            // unexpected-question-mark-instead-of-tag-name parse error."
            // The bogus comment keeps the '?' so XML declarations survive.
            '?' => self.advance_transition(TokenizerState::BogusComment),
            _ if self.reader.matches_letter() => {
                // "ASCII alpha - Create a new start tag token, set its tag name
                // to the empty string. Reconsume in the tag name state."
                self.create_tag_pending(true);
                self.transition(TokenizerState::TagName);
            }
            _ => {
                // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in
                // the data state."
                self.state_error(self.state);
                self.emit_char('<');
                self.transition(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        if self.reader.is_empty() {
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token, a U+002F SOLIDUS character token
            // and an end-of-file token."
            self.eof_error(self.state);
            self.emit_str("</");
            self.transition(TokenizerState::Data);
        } else if self.reader.matches_letter() {
            self.create_tag_pending(false);
            self.transition(TokenizerState::TagName);
        } else if self.reader.matches('>') {
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name
            // parse error. Switch to the data state."
            self.state_error(self.state);
            self.advance_transition(TokenizerState::Data);
        } else {
            // "This is an invalid-first-character-of-tag-name parse error.
            // Create a comment token whose data is the empty string. Reconsume
            // in the bogus comment state."
            self.state_error(self.state);
            self.advance_transition(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        // The name may be split by a window slide, so it accumulates.
        let name = self.reader.consume_tag_name();
        self.tag_pending.append_tag_name(&name);

        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(TokenizerState::BeforeAttributeName),
            '/' => self.transition(TokenizerState::SelfClosingStartTag),
            '<' => {
                // A new tag starts before this one closed: finish it here.
                self.reader.unconsume();
                self.state_error(self.state);
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => self.tag_pending.append_tag_name_char(REPLACEMENT_CHAR),
            EOF => {
                // "This is an eof-in-tag parse error. Emit an end-of-file token."
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c => self.tag_pending.append_tag_name_char(c),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '/' => self.transition(TokenizerState::SelfClosingStartTag),
            '<' => {
                self.reader.unconsume();
                self.state_error(self.state);
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.reader.unconsume();
                self.state_error(self.state);
                self.new_attribute();
                self.transition(TokenizerState::AttributeName);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c @ ('"' | '\'' | '=') => {
                // "U+003D EQUALS SIGN (=) - This is an
                // unexpected-equals-sign-before-attribute-name parse error.
                // Start a new attribute ... Set the attribute's name to the
                // current input character"
                self.state_error(self.state);
                self.new_attribute();
                self.tag_pending.append_attribute_name_char(c);
                self.transition(TokenizerState::AttributeName);
            }
            _ => {
                self.new_attribute();
                self.reader.unconsume();
                self.transition(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        let name = self.reader.consume_to_any(&ATTRIBUTE_NAME_STOP);
        self.tag_pending.append_attribute_name(&name);

        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(TokenizerState::AfterAttributeName),
            '/' => self.transition(TokenizerState::SelfClosingStartTag),
            '=' => self.transition(TokenizerState::BeforeAttributeValue),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_name_char(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c @ ('"' | '\'' | '<') => {
                // "This is an unexpected-character-in-attribute-name parse
                // error. Treat it as per the 'anything else' entry below."
                self.state_error(self.state);
                self.tag_pending.append_attribute_name_char(c);
            }
            c => self.tag_pending.append_attribute_name_char(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '/' => self.transition(TokenizerState::SelfClosingStartTag),
            '=' => self.transition(TokenizerState::BeforeAttributeValue),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_name_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::AttributeName);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c @ ('"' | '\'' | '<') => {
                self.state_error(self.state);
                self.new_attribute();
                self.tag_pending.append_attribute_name_char(c);
                self.transition(TokenizerState::AttributeName);
            }
            _ => {
                // "Start a new attribute in the current tag token. Set that
                // attribute name and value to the empty string. Reconsume in
                // the attribute name state."
                self.new_attribute();
                self.reader.unconsume();
                self.transition(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '"' => self.transition(TokenizerState::AttributeValueDoubleQuoted),
            '\'' => self.transition(TokenizerState::AttributeValueSingleQuoted),
            '&' => {
                self.reader.unconsume();
                self.transition(TokenizerState::AttributeValueUnquoted);
            }
            '\0' => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_value_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::AttributeValueUnquoted);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '>' => {
                // "This is a missing-attribute-value parse error. Switch to
                // the data state. Emit the current tag token."
                self.state_error(self.state);
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            c @ ('<' | '=' | '`') => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_value_char(c);
                self.transition(TokenizerState::AttributeValueUnquoted);
            }
            _ => {
                self.reader.unconsume();
                self.transition(TokenizerState::AttributeValueUnquoted);
            }
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        let value = self.reader.consume_attribute_quoted(quote == '\'');
        // An empty run still marks the attribute as having a value.
        self.tag_pending.append_attribute_value(&value);

        match self.reader.consume() {
            c if c == quote => self.transition(TokenizerState::AfterAttributeValueQuoted),
            '&' => match self.consume_character_reference(Some(quote), true) {
                Some(decoded) => self.tag_pending.append_attribute_value(&decoded),
                None => self.tag_pending.append_attribute_value_char('&'),
            },
            '\0' => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_value_char(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            // The scan stopped at the window edge.
            c => self.tag_pending.append_attribute_value_char(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        let value = self.reader.consume_to_any(&ATTRIBUTE_VALUE_UNQUOTED_STOP);
        if !value.is_empty() {
            self.tag_pending.append_attribute_value(&value);
        }

        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(TokenizerState::BeforeAttributeName),
            '&' => match self.consume_character_reference(Some('>'), true) {
                Some(decoded) => self.tag_pending.append_attribute_value(&decoded),
                None => self.tag_pending.append_attribute_value_char('&'),
            },
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.state_error(self.state);
                self.tag_pending.append_attribute_value_char(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c @ ('"' | '\'' | '<' | '=' | '`') => {
                // "This is an unexpected-character-in-unquoted-attribute-value
                // parse error."
                self.state_error(self.state);
                self.tag_pending.append_attribute_value_char(c);
            }
            c => self.tag_pending.append_attribute_value_char(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(TokenizerState::BeforeAttributeName),
            '/' => self.transition(TokenizerState::SelfClosingStartTag),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            _ => {
                // "This is a missing-whitespace-between-attributes parse
                // error. Reconsume in the before attribute name state."
                self.reader.unconsume();
                self.state_error(self.state);
                self.transition(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.reader.consume() {
            // "Set the self-closing flag of the current tag token. Switch to
            // the data state. Emit the current tag token."
            '>' => {
                self.tag_pending.self_closing = true;
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            _ => {
                // "This is an unexpected-solidus-in-tag parse error."
                self.reader.unconsume();
                self.state_error(self.state);
                self.transition(TokenizerState::BeforeAttributeName);
            }
        }
    }
}

// =============================================================================
// End tags inside RCDATA, RAWTEXT and script data
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn handle_rcdata_less_than_sign_state(&mut self) {
        if self.reader.matches('/') {
            // "Set the temporary buffer to the empty string. Switch to the
            // RCDATA end tag open state."
            self.create_temp_buffer();
            self.advance_transition(TokenizerState::RcdataEndTagOpen);
            return;
        }

        // A start tag inside an element whose end tag never appears, such as
        // `<title><p>` with no `</title>`: close the element here instead of
        // swallowing the rest of the document as text.
        if self.reader.matches_letter()
            && let Some(end_tag) = self.appropriate_end_tag_name().map(str::to_string)
            && !self.reader.contains_ignore_case(&format!("</{end_tag}"))
        {
            self.create_tag_pending(false);
            self.tag_pending.append_tag_name(&end_tag);
            self.emit_tag_pending();
            self.reader.unconsume();
            self.transition(TokenizerState::Data);
            return;
        }

        // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
        // RCDATA state."
        self.emit_char('<');
        self.transition(TokenizerState::Rcdata);
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_rcdata_end_tag_open_state(&mut self) {
        if self.reader.matches_letter() {
            let c = self.reader.current();
            self.create_tag_pending(false);
            self.tag_pending.append_tag_name_char(c);
            self.data_buffer.push(c);
            self.advance_transition(TokenizerState::RcdataEndTagName);
        } else {
            self.emit_str("</");
            self.transition(TokenizerState::Rcdata);
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn handle_rcdata_end_tag_name_state(&mut self) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.tag_pending.append_tag_name(&name);
            self.data_buffer.push_str(&name);
            return;
        }

        let appropriate = self.is_appropriate_end_tag_token();
        match self.reader.consume() {
            c if is_whitespace_char(c) && appropriate => {
                self.transition(TokenizerState::BeforeAttributeName);
            }
            '/' if appropriate => self.transition(TokenizerState::SelfClosingStartTag),
            '>' if appropriate => {
                self.emit_tag_pending();
                self.transition(TokenizerState::Data);
            }
            _ => {
                // "Emit a U+003C LESS-THAN SIGN character token, a U+002F
                // SOLIDUS character token, and a character token for each of
                // the characters in the temporary buffer. Reconsume in the
                // RCDATA state."
                let buffered = format!("</{}", self.data_buffer);
                self.emit_str(&buffered);
                self.reader.unconsume();
                self.transition(TokenizerState::Rcdata);
            }
        }
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_less_than_sign_state(
        &mut self,
        end_tag_open: TokenizerState,
        fallback: TokenizerState,
    ) {
        if self.reader.matches('/') {
            self.create_temp_buffer();
            self.advance_transition(end_tag_open);
        } else {
            self.emit_char('<');
            self.transition(fallback);
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    /// and [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    fn handle_end_tag_open_in_data(
        &mut self,
        end_tag_name: TokenizerState,
        fallback: TokenizerState,
    ) {
        if self.reader.matches_letter() {
            self.create_tag_pending(false);
            self.transition(end_tag_name);
        } else {
            self.emit_str("</");
            self.transition(fallback);
        }
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// Shared by the RAWTEXT, script data and escaped script data end tag
    /// name states; only the state returned to on a mismatch differs.
    fn handle_end_tag_name_in_data(&mut self, fallback: TokenizerState) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.tag_pending.append_tag_name(&name);
            self.data_buffer.push_str(&name);
            return;
        }

        if self.is_appropriate_end_tag_token() && !self.reader.is_empty() {
            match self.reader.consume() {
                c if is_whitespace_char(c) => {
                    self.transition(TokenizerState::BeforeAttributeName);
                    return;
                }
                '/' => {
                    self.transition(TokenizerState::SelfClosingStartTag);
                    return;
                }
                '>' => {
                    self.emit_tag_pending();
                    self.transition(TokenizerState::Data);
                    return;
                }
                c => self.data_buffer.push(c),
            }
        }

        let buffered = format!("</{}", self.data_buffer);
        self.emit_str(&buffered);
        self.transition(fallback);
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn handle_script_data_less_than_sign_state(&mut self) {
        match self.reader.consume() {
            '/' => {
                self.create_temp_buffer();
                self.transition(TokenizerState::ScriptDataEndTagOpen);
            }
            // "Emit a U+003C LESS-THAN SIGN character token and a U+0021
            // EXCLAMATION MARK character token."
            '!' => {
                self.emit_str("<!");
                self.transition(TokenizerState::ScriptDataEscapeStart);
            }
            _ => {
                self.emit_char('<');
                self.reader.unconsume();
                self.transition(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    /// and [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn handle_script_data_escape_start_state(&mut self, on_dash: TokenizerState) {
        if self.reader.matches('-') {
            self.emit_char('-');
            self.advance_transition(on_dash);
        } else {
            self.transition(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn handle_script_data_escaped_state(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(self.state);
            self.transition(TokenizerState::Data);
            return;
        }
        match self.reader.current() {
            '-' => {
                self.emit_char('-');
                self.advance_transition(TokenizerState::ScriptDataEscapedDash);
            }
            '<' => self.advance_transition(TokenizerState::ScriptDataEscapedLessthanSign),
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', '<', '\0']);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn handle_script_data_escaped_dash_state(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(self.state);
            self.transition(TokenizerState::Data);
            return;
        }
        match self.reader.consume() {
            '-' => {
                self.emit_char('-');
                self.transition(TokenizerState::ScriptDataEscapedDashDash);
            }
            '<' => self.transition(TokenizerState::ScriptDataEscapedLessthanSign),
            '\0' => {
                self.state_error(self.state);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::ScriptDataEscaped);
            }
            c => {
                self.emit_char(c);
                self.transition(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn handle_script_data_escaped_dash_dash_state(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(self.state);
            self.transition(TokenizerState::Data);
            return;
        }
        match self.reader.consume() {
            '-' => self.emit_char('-'),
            '<' => self.transition(TokenizerState::ScriptDataEscapedLessthanSign),
            '>' => {
                self.emit_char('>');
                self.transition(TokenizerState::ScriptData);
            }
            '\0' => {
                self.state_error(self.state);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::ScriptDataEscaped);
            }
            c => {
                self.emit_char(c);
                self.transition(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        if self.reader.matches_letter() {
            // "Set the temporary buffer to the empty string. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the script data
            // double escape start state."
            let c = self.reader.current();
            self.create_temp_buffer();
            self.data_buffer.push(c);
            self.emit_char('<');
            self.emit_char(c);
            self.advance_transition(TokenizerState::ScriptDataDoubleEscapeStart);
        } else if self.reader.matches('/') {
            self.create_temp_buffer();
            self.advance_transition(TokenizerState::ScriptDataEscapedEndTagOpen);
        } else {
            self.emit_char('<');
            self.transition(TokenizerState::ScriptDataEscaped);
        }
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    fn handle_script_data_escaped_end_tag_open_state(&mut self) {
        if self.reader.matches_letter() {
            let c = self.reader.current();
            self.create_tag_pending(false);
            self.tag_pending.append_tag_name_char(c);
            self.data_buffer.push(c);
            self.advance_transition(TokenizerState::ScriptDataEscapedEndTagName);
        } else {
            self.emit_str("</");
            self.transition(TokenizerState::ScriptDataEscaped);
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    /// and [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ///
    /// "If the temporary buffer is the string "script", then switch to the
    /// script data double escaped state. Otherwise, switch to the script data
    /// escaped state."
    fn handle_double_escape_tag(&mut self, on_script: TokenizerState, fallback: TokenizerState) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.data_buffer.push_str(&name);
            self.emit_str(&name);
            return;
        }

        match self.reader.consume() {
            c if is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.data_buffer.eq_ignore_ascii_case("script") {
                    self.transition(on_script);
                } else {
                    self.transition(fallback);
                }
                self.emit_char(c);
            }
            _ => {
                self.reader.unconsume();
                self.transition(fallback);
            }
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn handle_script_data_double_escaped_state(&mut self) {
        match self.reader.current() {
            '-' => {
                self.emit_char('-');
                self.advance_transition(TokenizerState::ScriptDataDoubleEscapedDash);
            }
            '<' => {
                self.emit_char('<');
                self.advance_transition(TokenizerState::ScriptDataDoubleEscapedLessthanSign);
            }
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', '<', '\0']);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.reader.consume() {
            '-' => {
                self.emit_char('-');
                self.transition(TokenizerState::ScriptDataDoubleEscapedDashDash);
            }
            '<' => {
                self.emit_char('<');
                self.transition(TokenizerState::ScriptDataDoubleEscapedLessthanSign);
            }
            '\0' => {
                self.state_error(self.state);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c => {
                self.emit_char(c);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.reader.consume() {
            '-' => self.emit_char('-'),
            '<' => {
                self.emit_char('<');
                self.transition(TokenizerState::ScriptDataDoubleEscapedLessthanSign);
            }
            '>' => {
                self.emit_char('>');
                self.transition(TokenizerState::ScriptData);
            }
            '\0' => {
                self.state_error(self.state);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
            }
            EOF => {
                self.eof_error(self.state);
                self.transition(TokenizerState::Data);
            }
            c => {
                self.emit_char(c);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        if self.reader.matches('/') {
            self.emit_char('/');
            self.create_temp_buffer();
            self.advance_transition(TokenizerState::ScriptDataDoubleEscapeEnd);
        } else {
            self.transition(TokenizerState::ScriptDataDoubleEscaped);
        }
    }
}

// =============================================================================
// Comments, markup declarations and CDATA
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// Everything up to the next `>` becomes the comment's data.
    fn handle_bogus_comment_state(&mut self) {
        self.reader.unconsume();
        self.create_comment_pending(true);
        let data = self.reader.consume_to('>');
        self.comment_pending.data.push_str(&data);
        self.emit_comment_pending();
        self.advance_transition(TokenizerState::Data);
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters, create a comment token whose data is the empty
        // string, and switch to the comment start state."
        if self.reader.match_consume("--") {
            self.create_comment_pending(false);
            self.transition(TokenizerState::CommentStart);
        }
        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word 'DOCTYPE', consume those characters and switch to the
        // DOCTYPE state."
        else if self.reader.match_consume_ignore_case("DOCTYPE") {
            self.transition(TokenizerState::Doctype);
        }
        // CDATA sections are accepted anywhere; with no foreign content the
        // tree builder decides what they become.
        else if self.reader.match_consume("[CDATA[") {
            self.create_temp_buffer();
            self.transition(TokenizerState::CdataSection);
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error."
        else {
            self.state_error(self.state);
            self.advance_transition(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokenizerState::CommentStartDash),
            '\0' => {
                self.state_error(self.state);
                self.comment_pending.data.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::Comment);
            }
            '>' => {
                // "This is an abrupt-closing-of-empty-comment parse error."
                self.state_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            c => {
                self.comment_pending.data.push(c);
                self.transition(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokenizerState::CommentEnd),
            '\0' => {
                self.state_error(self.state);
                self.comment_pending.data.push('-');
                self.comment_pending.data.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::Comment);
            }
            '>' => {
                self.state_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            c => {
                // "Append a U+002D HYPHEN-MINUS character (-) to the comment
                // token's data. Reconsume in the comment state."
                self.comment_pending.data.push('-');
                self.comment_pending.data.push(c);
                self.transition(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.reader.current() {
            '-' => self.advance_transition(TokenizerState::CommentEndDash),
            '\0' => {
                self.state_error(self.state);
                self.reader.advance();
                self.comment_pending.data.push(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', '\0']);
                self.comment_pending.data.push_str(&data);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokenizerState::CommentEnd),
            '\0' => {
                self.state_error(self.state);
                self.comment_pending.data.push('-');
                self.comment_pending.data.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::Comment);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            c => {
                self.comment_pending.data.push('-');
                self.comment_pending.data.push(c);
                self.transition(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) {
        match self.reader.consume() {
            '>' => {
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.state_error(self.state);
                self.comment_pending.data.push_str("--");
                self.comment_pending.data.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::Comment);
            }
            '!' => {
                self.state_error(self.state);
                self.transition(TokenizerState::CommentEndBang);
            }
            '-' => {
                // "Append a U+002D HYPHEN-MINUS character (-) to the comment
                // token's data."
                self.state_error(self.state);
                self.comment_pending.data.push('-');
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            c => {
                self.state_error(self.state);
                self.comment_pending.data.push_str("--");
                self.comment_pending.data.push(c);
                self.transition(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) {
        match self.reader.consume() {
            '-' => {
                self.comment_pending.data.push_str("--!");
                self.transition(TokenizerState::CommentEndDash);
            }
            '>' => {
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            '\0' => {
                self.state_error(self.state);
                self.comment_pending.data.push_str("--!");
                self.comment_pending.data.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::Comment);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_comment_pending();
                self.transition(TokenizerState::Data);
            }
            c => {
                self.comment_pending.data.push_str("--!");
                self.comment_pending.data.push(c);
                self.transition(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// An unterminated section runs to the end of input.
    fn handle_cdata_section_state(&mut self) {
        let data = self.reader.consume_to_str("]]>");
        self.data_buffer.push_str(&data);
        let _ = self.reader.match_consume("]]>");
        let data = std::mem::take(&mut self.data_buffer);
        self.emit(Token::CData { data });
        self.transition(TokenizerState::Data);
    }
}

// =============================================================================
// DOCTYPE
// =============================================================================

impl Tokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(TokenizerState::BeforeDoctypeName),
            EOF => {
                // "This is an eof-in-doctype parse error. Create a new DOCTYPE
                // token. Set its force-quirks flag to on. Emit the current
                // token. Emit an end-of-file token."
                self.eof_error(self.state);
                self.create_doctype_pending();
                self.emit_quirky_doctype();
            }
            '>' => {
                self.state_error(self.state);
                self.create_doctype_pending();
                self.emit_quirky_doctype();
            }
            _ => {
                // "This is a missing-whitespace-before-doctype-name parse
                // error. Reconsume in the before DOCTYPE name state."
                self.reader.unconsume();
                self.state_error(self.state);
                self.transition(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) {
        if self.reader.matches_letter() {
            self.create_doctype_pending();
            self.transition(TokenizerState::DoctypeName);
            return;
        }
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '\0' => {
                self.state_error(self.state);
                self.create_doctype_pending();
                self.doctype_pending.name.push(REPLACEMENT_CHAR);
                self.transition(TokenizerState::DoctypeName);
            }
            '>' => {
                // "This is a missing-doctype-name parse error."
                self.state_error(self.state);
                self.create_doctype_pending();
                self.emit_quirky_doctype();
            }
            EOF => {
                self.eof_error(self.state);
                self.create_doctype_pending();
                self.emit_quirky_doctype();
            }
            c => {
                self.create_doctype_pending();
                self.doctype_pending.name.push(c);
                self.transition(TokenizerState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.doctype_pending.name.push_str(&name);
            return;
        }
        match self.reader.consume() {
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokenizerState::Data);
            }
            c if is_whitespace_char(c) => self.transition(TokenizerState::AfterDoctypeName),
            '\0' => {
                self.state_error(self.state);
                self.doctype_pending.name.push(REPLACEMENT_CHAR);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            c => self.doctype_pending.name.push(c),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(self.state);
            self.emit_quirky_doctype();
            return;
        }
        if self.reader.matches_any(&['\t', '\n', '\r', '\u{000C}', ' ']) {
            self.reader.advance();
        } else if self.reader.matches('>') {
            self.emit_doctype_pending();
            self.advance_transition(TokenizerState::Data);
        }
        // "If the six characters starting from the current input character are
        // an ASCII case-insensitive match for the word "PUBLIC", then consume
        // those characters and switch to the after DOCTYPE public keyword state."
        else if self.reader.match_consume_ignore_case("PUBLIC") {
            self.doctype_pending.pub_sys_key = Some("PUBLIC".to_string());
            self.transition(TokenizerState::AfterDoctypePublicKeyword);
        } else if self.reader.match_consume_ignore_case("SYSTEM") {
            self.doctype_pending.pub_sys_key = Some("SYSTEM".to_string());
            self.transition(TokenizerState::AfterDoctypeSystemKeyword);
        } else {
            // "This is an invalid-character-sequence-after-doctype-name parse
            // error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            self.state_error(self.state);
            self.doctype_pending.force_quirks = true;
            self.advance_transition(TokenizerState::BogusDoctype);
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn handle_after_doctype_keyword_state(&mut self, public: bool) {
        let (before, double, single) = Self::doctype_identifier_states(public);
        match self.reader.consume() {
            c if is_whitespace_char(c) => self.transition(before),
            '"' => {
                // "This is a missing-whitespace-after-doctype-public-keyword
                // parse error."
                self.state_error(self.state);
                self.transition(double);
            }
            '\'' => {
                self.state_error(self.state);
                self.transition(single);
            }
            '>' => {
                self.state_error(self.state);
                self.emit_quirky_doctype();
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            _ => {
                self.state_error(self.state);
                self.doctype_pending.force_quirks = true;
                self.transition(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        let (_, double, single) = Self::doctype_identifier_states(public);
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '"' => self.transition(double),
            '\'' => self.transition(single),
            '>' => {
                self.state_error(self.state);
                self.emit_quirky_doctype();
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            _ => {
                self.state_error(self.state);
                self.doctype_pending.force_quirks = true;
                self.transition(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and its single-quoted and system identifier siblings.
    fn handle_doctype_identifier_quoted_state(&mut self, public: bool, quote: char) {
        let after = if public {
            TokenizerState::AfterDoctypePublicIdentifier
        } else {
            TokenizerState::AfterDoctypeSystemIdentifier
        };
        match self.reader.consume() {
            c if c == quote => self.transition(after),
            '\0' => {
                self.state_error(self.state);
                self.push_doctype_identifier(public, REPLACEMENT_CHAR);
            }
            '>' => {
                // "This is an abrupt-doctype-public-identifier parse error."
                self.state_error(self.state);
                self.emit_quirky_doctype();
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            c => self.push_doctype_identifier(public, c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {
                self.transition(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokenizerState::Data);
            }
            '"' => {
                self.state_error(self.state);
                self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.state_error(self.state);
                self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            _ => {
                self.state_error(self.state);
                self.doctype_pending.force_quirks = true;
                self.transition(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_identifiers_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokenizerState::Data);
            }
            '"' => self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted),
            '\'' => self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted),
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            _ => {
                self.state_error(self.state);
                self.doctype_pending.force_quirks = true;
                self.transition(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.reader.consume() {
            c if is_whitespace_char(c) => {}
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.eof_error(self.state);
                self.emit_quirky_doctype();
            }
            _ => {
                // "This does not set the current DOCTYPE token's force-quirks
                // flag to on."
                self.state_error(self.state);
                self.transition(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.reader.consume() {
            '>' | EOF => {
                self.emit_doctype_pending();
                self.transition(TokenizerState::Data);
            }
            _ => {}
        }
    }

    const fn doctype_identifier_states(
        public: bool,
    ) -> (TokenizerState, TokenizerState, TokenizerState) {
        if public {
            (
                TokenizerState::BeforeDoctypePublicIdentifier,
                TokenizerState::DoctypePublicIdentifierDoubleQuoted,
                TokenizerState::DoctypePublicIdentifierSingleQuoted,
            )
        } else {
            (
                TokenizerState::BeforeDoctypeSystemIdentifier,
                TokenizerState::DoctypeSystemIdentifierDoubleQuoted,
                TokenizerState::DoctypeSystemIdentifierSingleQuoted,
            )
        }
    }

    fn push_doctype_identifier(&mut self, public: bool, c: char) {
        if public {
            self.doctype_pending.public_id.push(c);
        } else {
            self.doctype_pending.system_id.push(c);
        }
    }
}
