//! Serialization and parse settings.
//!
//! Both are plain values with serde support so a front end can load them from
//! a JSON file.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::entities::EscapeMode;

/// Markup syntax used when serializing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// HTML: void tags print as `<br>`, boolean attributes collapse.
    #[default]
    Html,
    /// XML: void tags print as `<br />`, every attribute keeps its value.
    Xml,
}

/// The encoder families the serializer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CoreCharset {
    /// US-ASCII: anything above 0x7F must be escaped.
    Ascii,
    /// ISO-8859-1 and windows-1252: anything above 0xFF must be escaped.
    Latin1,
    /// Any Unicode transformation format: nothing needs escaping.
    Utf,
}

impl CoreCharset {
    /// Classify a charset label. Unknown labels are treated as UTF-8.
    #[must_use]
    pub fn by_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "us-ascii" | "ascii" | "us_ascii" | "iso646-us" => Self::Ascii,
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" | "windows-1252" | "cp1252" => {
                Self::Latin1
            }
            n if n.starts_with("utf") => Self::Utf,
            other => {
                wren_common::warning::warn_once(
                    "dom",
                    &format!("unrecognised output charset '{other}', writing UTF-8"),
                );
                Self::Utf
            }
        }
    }

    /// Whether text in this charset can carry `c` without escaping.
    #[must_use]
    pub const fn can_encode(self, c: char) -> bool {
        match self {
            Self::Ascii => (c as u32) < 0x80,
            Self::Latin1 => (c as u32) < 0x100,
            Self::Utf => true,
        }
    }
}

/// Options governing `outer_html` and `html` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Re-indent block content.
    pub pretty_print: bool,
    /// Indent every element, inline ones included.
    pub outline: bool,
    /// Spaces per indent level.
    pub indent_amount: usize,
    /// HTML or XML syntax.
    pub syntax: Syntax,
    /// Which named references the escaper may use.
    pub escape_mode: EscapeMode,
    /// Output charset label; decides which characters must be escaped.
    pub charset: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty_print: true,
            outline: false,
            indent_amount: 1,
            syntax: Syntax::Html,
            escape_mode: EscapeMode::Base,
            charset: String::from("UTF-8"),
        }
    }
}

impl OutputSettings {
    /// Settings used for XML documents.
    #[must_use]
    pub fn xml() -> Self {
        Self {
            syntax: Syntax::Xml,
            escape_mode: EscapeMode::Xhtml,
            ..Self::default()
        }
    }

    /// Encoder family of the configured charset.
    #[must_use]
    pub fn core_charset(&self) -> CoreCharset {
        CoreCharset::by_name(&self.charset)
    }

    /// Builder-style setter for `pretty_print`.
    #[must_use]
    pub const fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Builder-style setter for `outline`.
    #[must_use]
    pub const fn with_outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    /// Builder-style setter for `indent_amount`.
    #[must_use]
    pub const fn with_indent_amount(mut self, amount: usize) -> Self {
        self.indent_amount = amount;
        self
    }

    /// Builder-style setter for `syntax`.
    #[must_use]
    pub const fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Builder-style setter for `escape_mode`.
    #[must_use]
    pub const fn with_escape_mode(mut self, mode: EscapeMode) -> Self {
        self.escape_mode = mode;
        self
    }

    /// Builder-style setter for `charset`.
    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }
}

/// Case handling for tag and attribute names, fixed when a tree is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Keep tag names as written instead of lower-casing them.
    pub preserve_tag_case: bool,
    /// Keep attribute names as written instead of lower-casing them.
    pub preserve_attribute_case: bool,
}

impl ParseSettings {
    /// HTML default: both tag and attribute names are lower-cased.
    #[must_use]
    pub const fn html_default() -> Self {
        Self {
            preserve_tag_case: false,
            preserve_attribute_case: false,
        }
    }

    /// XML default: names are kept exactly as written.
    #[must_use]
    pub const fn preserve_case() -> Self {
        Self {
            preserve_tag_case: true,
            preserve_attribute_case: true,
        }
    }

    /// Normalize a tag name according to these settings.
    #[must_use]
    pub fn normalize_tag(&self, name: &str) -> String {
        let name = name.trim();
        if self.preserve_tag_case {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Normalize an attribute name according to these settings.
    #[must_use]
    pub fn normalize_attribute(&self, name: &str) -> String {
        let name = name.trim();
        if self.preserve_attribute_case {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_core_charset_classification() {
        assert_eq!(CoreCharset::by_name("US-ASCII"), CoreCharset::Ascii);
        assert_eq!(CoreCharset::by_name("ISO-8859-1"), CoreCharset::Latin1);
        assert_eq!(CoreCharset::by_name("utf-16"), CoreCharset::Utf);
        assert!(!CoreCharset::Ascii.can_encode('é'));
        assert!(CoreCharset::Latin1.can_encode('é'));
        assert!(!CoreCharset::Latin1.can_encode('€'));
    }

    #[test]
    fn test_syntax_from_str() {
        assert_eq!(Syntax::from_str("xml").ok(), Some(Syntax::Xml));
        assert_eq!(Syntax::from_str("HTML").ok(), Some(Syntax::Html));
        assert_eq!(Syntax::Xml.to_string(), "xml");
    }

    #[test]
    fn test_parse_settings_normalize() {
        let html = ParseSettings::html_default();
        assert_eq!(html.normalize_tag(" DIV "), "div");
        let xml = ParseSettings::preserve_case();
        assert_eq!(xml.normalize_attribute("viewBox"), "viewBox");
    }
}
