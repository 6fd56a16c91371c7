//! Tag registry.
//!
//! Formatting and parsing behaviour that depends only on a tag's name: block
//! vs inline, void elements, whitespace preservation and form association.
//! Known tags are registered once in a process-wide table; every other name
//! gets the permissive defaults of an unknown tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::settings::ParseSettings;

/// Behaviour flags for a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct TagFlags {
    /// Registered in the table (not an invented name).
    pub known: bool,
    /// Block element (as opposed to inline) for text extraction.
    pub block: bool,
    /// Starts on a new, indented line when pretty printing.
    pub format_as_block: bool,
    /// Void element; can never have content.
    pub empty: bool,
    /// Printed as `<x />` when it has no children.
    pub self_closing: bool,
    /// Whitespace inside is significant.
    pub preserve_whitespace: bool,
    /// Form-associated listed element.
    pub form_listed: bool,
    /// Submittable form element.
    pub form_submittable: bool,
}

impl TagFlags {
    const UNKNOWN: Self = Self {
        known: false,
        block: false,
        format_as_block: true,
        empty: false,
        self_closing: false,
        preserve_whitespace: false,
        form_listed: false,
        form_submittable: false,
    };

    const BLOCK: Self = Self {
        known: true,
        block: true,
        ..Self::UNKNOWN
    };

    const INLINE: Self = Self {
        known: true,
        block: false,
        format_as_block: false,
        ..Self::UNKNOWN
    };
}

const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "frameset", "script", "noscript", "style", "meta", "link", "title",
    "frame", "noframes", "section", "nav", "aside", "hgroup", "header", "footer", "p", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "pre", "div", "blockquote", "hr", "address", "figure",
    "figcaption", "form", "fieldset", "ins", "del", "dl", "dt", "dd", "li", "table", "caption",
    "thead", "tfoot", "tbody", "colgroup", "col", "tr", "th", "td", "video", "audio", "canvas",
    "details", "menu", "plaintext", "template", "article", "main", "svg", "math", "center",
];

const INLINE_TAGS: &[&str] = &[
    "object", "base", "font", "tt", "i", "b", "u", "big", "small", "em", "strong", "dfn", "code",
    "samp", "kbd", "var", "cite", "abbr", "time", "acronym", "mark", "ruby", "rt", "rp", "a",
    "img", "br", "wbr", "map", "q", "sub", "sup", "bdo", "iframe", "embed", "span", "input",
    "select", "textarea", "label", "button", "optgroup", "option", "legend", "datalist", "keygen",
    "output", "progress", "meter", "area", "param", "source", "track", "summary", "command",
    "device", "basefont", "bgsound", "menuitem", "data", "bdi", "s", "strike", "nobr", "rb",
    "rtc",
];

const EMPTY_TAGS: &[&str] = &[
    "meta", "link", "base", "frame", "img", "br", "wbr", "embed", "hr", "input", "keygen", "col",
    "command", "device", "area", "basefont", "bgsound", "menuitem", "param", "source", "track",
];

const FORMAT_AS_INLINE_TAGS: &[&str] = &[
    "title", "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "address", "li", "th", "td",
    "script", "style", "ins", "del", "s",
];

const PRESERVE_WHITESPACE_TAGS: &[&str] = &["pre", "plaintext", "title", "textarea"];

const FORM_LISTED_TAGS: &[&str] = &[
    "button", "fieldset", "input", "keygen", "object", "output", "select", "textarea",
];

const FORM_SUBMIT_TAGS: &[&str] = &["input", "keygen", "object", "select", "textarea"];

static TAGS: LazyLock<HashMap<&'static str, TagFlags>> = LazyLock::new(|| {
    let mut tags = HashMap::new();
    for &name in BLOCK_TAGS {
        let _ = tags.insert(name, TagFlags::BLOCK);
    }
    for &name in INLINE_TAGS {
        let _ = tags.insert(name, TagFlags::INLINE);
    }
    let mut update = |names: &[&'static str], apply: fn(&mut TagFlags)| {
        for &name in names {
            if let Some(flags) = tags.get_mut(name) {
                apply(flags);
            }
        }
    };
    update(EMPTY_TAGS, |f| {
        f.empty = true;
        f.self_closing = true;
    });
    update(FORMAT_AS_INLINE_TAGS, |f| f.format_as_block = false);
    update(PRESERVE_WHITESPACE_TAGS, |f| f.preserve_whitespace = true);
    update(FORM_LISTED_TAGS, |f| f.form_listed = true);
    update(FORM_SUBMIT_TAGS, |f| f.form_submittable = true);
    tags
});

/// Populate the registry now instead of on first lookup.
pub fn ensure_initialized() {
    let _ = LazyLock::force(&TAGS);
}

/// Whether `name` (already normalized) is a registered tag.
#[must_use]
pub fn is_known_tag(name: &str) -> bool {
    TAGS.contains_key(name)
}

/// An element's tag: the name as it will be printed, its lower-case normal
/// name, and the behaviour flags for that normal name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    normal_name: String,
    flags: TagFlags,
}

impl Tag {
    /// Look up a tag by name, normalizing case per `settings`.
    #[must_use]
    pub fn value_of(name: &str, settings: &ParseSettings) -> Self {
        let normal_name = name.trim().to_lowercase();
        let name = settings.normalize_tag(name);
        let flags = TAGS
            .get(normal_name.as_str())
            .copied()
            .unwrap_or(TagFlags::UNKNOWN);
        Self {
            name,
            normal_name,
            flags,
        }
    }

    /// Look up a tag with HTML (lower-casing) settings.
    #[must_use]
    pub fn html(name: &str) -> Self {
        Self::value_of(name, &ParseSettings::html_default())
    }

    /// The name as written (after case normalization).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lower-case name used for matching.
    #[must_use]
    pub fn normal_name(&self) -> &str {
        &self.normal_name
    }

    /// All behaviour flags.
    #[must_use]
    pub const fn flags(&self) -> TagFlags {
        self.flags
    }

    /// Block-level for text extraction.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        self.flags.block
    }

    /// Starts on its own line when pretty printing.
    #[must_use]
    pub const fn format_as_block(&self) -> bool {
        self.flags.format_as_block
    }

    /// Inline (not block).
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        !self.flags.block
    }

    /// Void element.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.flags.empty
    }

    /// Printed without a closing tag when childless.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.flags.empty || self.flags.self_closing
    }

    /// Registered tag.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.flags.known
    }

    /// Whitespace inside is preserved.
    #[must_use]
    pub const fn preserve_whitespace(&self) -> bool {
        self.flags.preserve_whitespace
    }

    /// Form-associated listed element.
    #[must_use]
    pub const fn is_form_listed(&self) -> bool {
        self.flags.form_listed
    }

    /// Submittable form element.
    #[must_use]
    pub const fn is_form_submittable(&self) -> bool {
        self.flags.form_submittable
    }

    /// Mark an unknown tag as self-closing, after seeing `<name/>` in markup.
    pub const fn set_self_closing(&mut self) {
        self.flags.self_closing = true;
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_block_and_inline() {
        let div = Tag::html("DIV");
        assert_eq!(div.name(), "div");
        assert!(div.is_block());
        assert!(div.format_as_block());

        let span = Tag::html("span");
        assert!(span.is_inline());
        assert!(!span.format_as_block());
    }

    #[test]
    fn test_format_as_inline_block_tags() {
        let p = Tag::html("p");
        assert!(p.is_block());
        assert!(!p.format_as_block());
    }

    #[test]
    fn test_void_tags() {
        let br = Tag::html("br");
        assert!(br.is_empty());
        assert!(br.is_self_closing());
        assert!(!Tag::html("div").is_self_closing());
    }

    #[test]
    fn test_unknown_tag_defaults() {
        let mut custom = Tag::html("my-widget");
        assert!(!custom.is_known());
        assert!(custom.is_inline());
        assert!(custom.format_as_block());
        custom.set_self_closing();
        assert!(custom.is_self_closing());
        assert!(!custom.is_empty());
    }

    #[test]
    fn test_preserved_case() {
        let tag = Tag::value_of("clipPath", &ParseSettings::preserve_case());
        assert_eq!(tag.name(), "clipPath");
        assert_eq!(tag.normal_name(), "clippath");
    }
}
