//! Decoding of character references in free-standing text.
//!
//! The named and numeric tables live in [`wren_dom::entities`]; decoding goes
//! through the tokenizer's character reference states so that text decodes the
//! same way here as it does inside a document.

use crate::tokenizer::character_reference::unescape_entities;

/// Decode every character reference in `text`, accepting legacy references
/// written without a trailing `;`.
///
/// ```
/// assert_eq!(wren_html::unescape("&lt;b&gt; &copy 2024"), "<b> \u{a9} 2024");
/// ```
#[must_use]
pub fn unescape(text: &str) -> String {
    unescape_strict(text, false)
}

/// Decode every character reference in `text`.
///
/// When `strict` is set, references are read with the attribute-value rules:
/// a legacy reference that runs straight into an alphanumeric or `=`, as in
/// `?a=1&copy=2`, stays literal.
#[must_use]
pub fn unescape_strict(text: &str, strict: bool) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    unescape_entities(text, strict)
}

#[cfg(test)]
mod tests {
    use wren_dom::{OutputSettings, entities::escape};

    use super::*;

    #[test]
    fn test_text_without_references_is_unchanged() {
        assert_eq!(unescape("plain text"), "plain text");
    }

    #[test]
    fn test_strict_keeps_query_strings() {
        let href = "/search?q=1&lang=en&copy=2";
        assert_eq!(unescape_strict(href, true), href);
        assert_eq!(unescape(href), "/search?q=1&lang=en\u{a9}=2");
    }

    #[test]
    fn test_escape_then_unescape() {
        let settings = OutputSettings::default();
        let text = "Fish & chips <\u{a0}> \"quoted\"";
        assert_eq!(unescape(&escape(text, &settings)), text);
    }
}
