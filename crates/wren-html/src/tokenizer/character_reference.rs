//! Character reference decoding for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! References are decoded speculatively: the reader is marked, a candidate is
//! consumed, and the reader is rewound to the mark when the candidate does not
//! resolve.

use wren_common::ParseErrorList;
use wren_dom::entities;

use crate::reader::CharacterReader;

use super::core::Tokenizer;
use super::helpers::REPLACEMENT_CHAR;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
///
/// Indexed by `code - 0x80`.
const WINDOWS_1252_REPLACEMENTS: [u32; 32] = [
    0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160,
    0x2039, 0x0152, 0x008D, 0x017D, 0x008F, 0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022,
    0x2013, 0x2014, 0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178,
];

impl Tokenizer {
    /// Try to decode a character reference at the cursor (just after `&`).
    ///
    /// `additional_allowed` is the quote or `>` that ends the attribute value
    /// being read, if any. Returns `None` when the text is not a reference, in
    /// which case the reader is left where it started and the caller emits the
    /// `&` literally.
    pub(crate) fn consume_character_reference(
        &mut self,
        additional_allowed: Option<char>,
        in_attribute: bool,
    ) -> Option<String> {
        if self.reader.is_empty() {
            return None;
        }
        let current = self.reader.current();
        if additional_allowed == Some(current) {
            return None;
        }
        if matches!(current, '\t' | '\n' | '\r' | '\u{000C}' | ' ' | '<' | '&') {
            return None;
        }

        self.reader.mark();
        if self.reader.match_consume("#") {
            self.consume_numeric_reference()
        } else {
            self.consume_named_reference(in_attribute)
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    fn consume_numeric_reference(&mut self) -> Option<String> {
        let is_hex = self.reader.match_consume_ignore_case("X");
        let digits = if is_hex {
            self.reader.consume_hex_sequence()
        } else {
            self.reader.consume_digit_sequence()
        };
        if digits.is_empty() {
            // "absence-of-digits-in-numeric-character-reference"
            self.character_reference_error("numeric reference with no numerals");
            self.reader.rewind_to_mark();
            return None;
        }
        self.reader.unmark();
        if !self.reader.match_consume(";") {
            self.character_reference_error("missing semicolon");
        }

        let radix = if is_hex { 16 } else { 10 };
        let code = u32::from_str_radix(&digits, radix).ok();
        let c = match code {
            None | Some(0 | 0xD800..=0xDFFF | 0x11_0000..) => {
                self.character_reference_error("character outside of valid range");
                REPLACEMENT_CHAR
            }
            Some(code @ 0x80..=0x9F) => {
                self.character_reference_error("character is not a valid unicode code point");
                let mapped = WINDOWS_1252_REPLACEMENTS[(code - 0x80) as usize];
                char::from_u32(mapped).unwrap_or(REPLACEMENT_CHAR)
            }
            Some(code) => char::from_u32(code).unwrap_or(REPLACEMENT_CHAR),
        };
        Some(c.to_string())
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the named character references
    /// table."
    fn consume_named_reference(&mut self, in_attribute: bool) -> Option<String> {
        let mut name = self.reader.consume_letter_then_digit_sequence();
        let mut looks_legit = self.reader.matches(';');
        let found = entities::is_base_named_entity(&name)
            || (entities::is_named_entity(&name) && looks_legit);

        if !found {
            self.reader.rewind_to_mark();
            // Legacy entities may run straight into following text: "&notit".
            let Some(prefix) = entities::longest_base_prefix(&name) else {
                if looks_legit {
                    self.character_reference_error(&format!("invalid named reference '{name}'"));
                }
                return None;
            };
            self.reader.mark();
            for _ in prefix.chars() {
                self.reader.advance();
            }
            name = prefix.to_string();
            looks_legit = false;
        }

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return
        // state."
        if in_attribute
            && !looks_legit
            && (self.reader.matches_letter()
                || self.reader.matches_digit()
                || self.reader.matches_any(&['=', '-', '_']))
        {
            self.reader.rewind_to_mark();
            return None;
        }

        self.reader.unmark();
        if !self.reader.match_consume(";") {
            // "missing-semicolon-after-character-reference"
            self.character_reference_error("missing semicolon");
        }
        entities::get_by_name(&name).map(str::to_string)
    }
}

/// Decode every character reference in `input`.
///
/// `in_attribute` applies the attribute-value rules, where a legacy reference
/// running into an alphanumeric or `=` stays literal.
pub(crate) fn unescape_entities(input: &str, in_attribute: bool) -> String {
    let mut tokenizer = Tokenizer::new(CharacterReader::new(input), ParseErrorList::no_tracking());
    let mut out = String::with_capacity(input.len());
    while !tokenizer.reader.is_empty() {
        out.push_str(&tokenizer.reader.consume_to('&'));
        if tokenizer.reader.matches('&') {
            tokenizer.reader.advance();
            match tokenizer.consume_character_reference(None, in_attribute) {
                Some(decoded) => out.push_str(&decoded),
                None => out.push('&'),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_references() {
        assert_eq!(unescape_entities("a &amp; b", false), "a & b");
        assert_eq!(unescape_entities("&lt;p&gt;", false), "<p>");
        assert_eq!(unescape_entities("&NotEqualTilde;", false), "\u{2242}\u{338}");
    }

    #[test]
    fn test_legacy_reference_without_semicolon() {
        assert_eq!(unescape_entities("&copy 2024", false), "\u{a9} 2024");
        assert_eq!(unescape_entities("&notit;", false), "\u{ac}it;");
    }

    #[test]
    fn test_attribute_rules_keep_ambiguous_ampersand() {
        assert_eq!(unescape_entities("?a=1&copy=2", true), "?a=1&copy=2");
        assert_eq!(unescape_entities("?a=1&copy=2", false), "?a=1\u{a9}=2");
        assert_eq!(unescape_entities("&amp;x", true), "&x");
    }

    #[test]
    fn test_unknown_reference_is_literal() {
        assert_eq!(unescape_entities("&bogus; & &", false), "&bogus; & &");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(unescape_entities("&#65;&#x42;&#X43", false), "ABC");
        assert_eq!(unescape_entities("&#x80;", false), "\u{20ac}");
        assert_eq!(unescape_entities("&#0;", false), "\u{fffd}");
        assert_eq!(unescape_entities("&#xD800;", false), "\u{fffd}");
        assert_eq!(unescape_entities("&#x110000;", false), "\u{fffd}");
        assert_eq!(unescape_entities("&#99999999999;", false), "\u{fffd}");
        assert_eq!(unescape_entities("&#;", false), "&#;");
    }
}
