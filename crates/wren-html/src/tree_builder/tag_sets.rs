//! Fixed tag-name tables consulted by the insertion modes.
//!
//! Every list is lower-case and compared against an element's normal name.

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// Boundaries of the default scope.
pub(super) const SCOPE_BOUNDARIES: &[&str] = &[
    "applet", "caption", "html", "marquee", "object", "table", "td", "th",
];

/// Extra boundaries for "in list item scope".
pub(super) const LIST_ITEM_SCOPE_EXTRAS: &[&str] = &["ol", "ul"];

/// Extra boundaries for "in button scope".
pub(super) const BUTTON_SCOPE_EXTRAS: &[&str] = &["button"];

/// Boundaries of "in table scope".
pub(super) const TABLE_SCOPE_BOUNDARIES: &[&str] = &["html", "table"];

/// Elements that do not end "in select scope".
pub(super) const SELECT_SCOPE_TRANSPARENT: &[&str] = &["optgroup", "option"];

/// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub(super) const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// The "special" category.
pub(super) const SPECIAL: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "command",
    "dd", "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
    "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "iframe", "img", "input", "isindex", "li", "link",
    "listing", "main", "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript",
    "object", "ol", "p", "param", "plaintext", "pre", "script", "section", "select", "style",
    "summary", "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "title", "tr", "ul",
    "wbr", "xmp",
];

/// Elements a foster-parented node may not be inserted into.
pub(super) const TABLE_FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

// =============================================================================
// "in body" start tags
// =============================================================================

/// Start tags "in body" hands to the "in head" rules.
pub(super) const IN_BODY_START_TO_HEAD: &[&str] = &[
    "base", "basefont", "bgsound", "command", "link", "meta", "noframes", "script", "style",
    "title",
];

/// Start tags that close an open `p` in button scope before inserting.
pub(super) const IN_BODY_START_P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul",
];

pub(super) const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub(super) const PRE_LISTING: &[&str] = &["pre", "listing"];

/// Special elements a new `li`, `dd` or `dt` may look past.
pub(super) const LI_BREAKERS: &[&str] = &["address", "div", "p"];

pub(super) const DD_DT: &[&str] = &["dd", "dt"];

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// The formatting elements other than `a` and `nobr`, which have their own rules.
pub(super) const FORMATTERS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// Start tags that insert a marker into the list of active formatting elements.
pub(super) const APPLETS: &[&str] = &["applet", "marquee", "object"];

/// Void elements inserted in body after reconstructing formatting.
pub(super) const EMPTY_FORMATTERS: &[&str] = &["area", "br", "embed", "img", "keygen", "wbr"];

pub(super) const MEDIA: &[&str] = &["param", "source", "track"];

/// Attributes of `<isindex>` not copied to the generated `<input>`.
pub(super) const ISINDEX_INPUT_EXCLUDED: &[&str] = &["action", "name", "prompt"];

pub(super) const OPTIONS: &[&str] = &["optgroup", "option"];

pub(super) const RUBY: &[&str] = &["rp", "rt"];

/// Table-structure start tags ignored "in body".
pub(super) const IN_BODY_START_DROP: &[&str] = &[
    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr",
];

// =============================================================================
// "in body" end tags
// =============================================================================

/// End tags closing a block that must be in scope.
pub(super) const IN_BODY_END_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// End tags run through the adoption agency algorithm.
pub(super) const ADOPTION_FORMATTERS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

// =============================================================================
// Table modes
// =============================================================================

pub(super) const CELLS: &[&str] = &["td", "th"];

pub(super) const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

/// End tags ignored "in table".
pub(super) const IN_TABLE_END_IGNORED: &[&str] = &[
    "body", "caption", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Start tags that close an open caption.
pub(super) const IN_CAPTION_CLOSERS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// End tags ignored "in caption".
pub(super) const IN_CAPTION_END_IGNORED: &[&str] = &[
    "body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Start tags that leave a table section.
pub(super) const IN_TABLE_BODY_EXITS: &[&str] =
    &["caption", "col", "colgroup", "tbody", "tfoot", "thead"];

/// End tags ignored "in table body".
pub(super) const IN_TABLE_BODY_END_IGNORED: &[&str] = &[
    "body", "caption", "col", "colgroup", "html", "td", "th", "tr",
];

/// Start tags that close an open row.
pub(super) const IN_ROW_EXITS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr",
];

/// End tags ignored "in row".
pub(super) const IN_ROW_END_IGNORED: &[&str] = &[
    "body", "caption", "col", "colgroup", "html", "td", "th",
];

/// End tags ignored "in cell".
pub(super) const IN_CELL_END_IGNORED: &[&str] = &["body", "caption", "col", "colgroup", "html"];

/// End tags that close the cell before being reprocessed.
pub(super) const IN_CELL_END_CLOSERS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

/// Start tags that close the cell before being reprocessed.
pub(super) const IN_CELL_START_CLOSERS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Table tags that end a `<select>` nested in a table.
pub(super) const IN_SELECT_TABLE_ENDS: &[&str] = &[
    "caption", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Start tags that end an open `<select>` and get reprocessed.
pub(super) const IN_SELECT_INPUTS: &[&str] = &["input", "keygen", "textarea"];

// =============================================================================
// Head
// =============================================================================

/// Void elements "in head".
pub(super) const IN_HEAD_EMPTY: &[&str] = &["base", "basefont", "bgsound", "command", "link"];

pub(super) const IN_HEAD_RAW: &[&str] = &["noframes", "style"];

/// End tags in head that fall through to "anything else".
pub(super) const IN_HEAD_END_BREAKOUTS: &[&str] = &["body", "html", "br"];

/// Start tags "in head noscript" hands to the "in head" rules.
pub(super) const IN_HEAD_NOSCRIPT_TO_HEAD: &[&str] = &[
    "basefont", "bgsound", "link", "meta", "noframes", "style",
];

/// Start tags "after head" reprocesses in head, with the head pushed back.
pub(super) const AFTER_HEAD_TO_HEAD: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "title",
];

/// End tags that create the skeleton before being reprocessed.
pub(super) const BEFORE_HTML_END_BREAKOUTS: &[&str] = &["head", "body", "html", "br"];

// =============================================================================
// Quirks mode
// =============================================================================

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// "The public identifier starts with: ..."
pub(super) const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// "The public identifier is set to: ..."
pub(super) const QUIRKY_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// "The system identifier is set to: ..."
pub(super) const QUIRKY_SYSTEM_ID: &str =
    "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// Quirky when the system identifier is missing, limited-quirky otherwise.
pub(super) const HTML4_TRANSITIONAL_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// "The public identifier starts with ..." (limited-quirks).
pub(super) const LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];
