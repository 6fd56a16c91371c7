use core::fmt;

use wren_dom::Attributes;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Character tokens carry a whole run of text rather than a single code point,
/// and CDATA sections get a token of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    Doctype {
        /// "a name"
        name: String,
        /// The `PUBLIC` or `SYSTEM` keyword, when one was present.
        pub_sys_key: Option<String>,
        /// "a public identifier"
        public_id: String,
        /// "a system identifier"
        system_id: String,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name", as written
        name: String,
        /// "a list of attributes"; the first of any duplicate names wins
        attributes: Attributes,
        /// "a self-closing flag"
        self_closing: bool,
    },

    /// End tag token. Attributes on end tags are parsed and dropped.
    EndTag {
        /// "a tag name", as written
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
        /// Produced by the bogus comment state (`<?...>`, `<!x>`, `</3>`).
        bogus: bool,
    },

    /// A run of character data.
    Character {
        /// "data"
        data: String,
    },

    /// The contents of a `<![CDATA[...]]>` section.
    CData {
        /// Section text, without the delimiters.
        data: String,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name lower-cased for matching, for start and end tags.
    #[must_use]
    pub fn normal_name(&self) -> Option<String> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name.to_lowercase()),
            _ => None,
        }
    }

    /// True for a start tag with the given (lower-case) name.
    #[must_use]
    pub fn is_start_tag_named(&self, wanted: &str) -> bool {
        matches!(self, Self::StartTag { name, .. } if name.eq_ignore_ascii_case(wanted))
    }

    /// True for an end tag with the given (lower-case) name.
    #[must_use]
    pub fn is_end_tag_named(&self, wanted: &str) -> bool {
        matches!(self, Self::EndTag { name } if name.eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                pub_sys_key,
                public_id,
                system_id,
                force_quirks,
            } => {
                write!(f, "<!doctype {name}")?;
                if let Some(key) = pub_sys_key {
                    write!(f, " {key}")?;
                }
                if !public_id.is_empty() {
                    write!(f, " \"{public_id}\"")?;
                }
                if !system_id.is_empty() {
                    write!(f, " \"{system_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                write!(f, ">")
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}{attributes}")?;
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data, .. } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "{data:?}"),
            Self::CData { data } => write!(f, "<![CDATA[{data}]]>"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

// =============================================================================
// Pending token builders
// =============================================================================

/// The tag token under construction.
///
/// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
///
/// An attribute is only committed to the list when the next one starts or
/// the tag is finished, so name and value can accumulate across several
/// reads.
#[derive(Debug, Default)]
pub(crate) struct TagBuilder {
    pub(crate) is_start: bool,
    pub(crate) name: String,
    pub(crate) self_closing: bool,
    attributes: Attributes,
    pending_attribute_name: Option<String>,
    pending_attribute_value: String,
    has_pending_attribute_value: bool,
}

impl TagBuilder {
    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    pub(crate) fn reset(&mut self, is_start: bool) {
        self.is_start = is_start;
        self.name.clear();
        self.self_closing = false;
        self.attributes = Attributes::new();
        self.pending_attribute_name = None;
        self.pending_attribute_value.clear();
        self.has_pending_attribute_value = false;
    }

    pub(crate) fn append_tag_name(&mut self, s: &str) {
        self.name.push_str(s);
    }

    pub(crate) fn append_tag_name_char(&mut self, c: char) {
        self.name.push(c);
    }

    pub(crate) fn append_attribute_name(&mut self, s: &str) {
        self.pending_attribute_name
            .get_or_insert_with(String::new)
            .push_str(s);
    }

    pub(crate) fn append_attribute_name_char(&mut self, c: char) {
        self.pending_attribute_name
            .get_or_insert_with(String::new)
            .push(c);
    }

    pub(crate) fn append_attribute_value(&mut self, s: &str) {
        self.has_pending_attribute_value = true;
        self.pending_attribute_value.push_str(s);
    }

    pub(crate) fn append_attribute_value_char(&mut self, c: char) {
        self.has_pending_attribute_value = true;
        self.pending_attribute_value.push(c);
    }

    /// Commit the pending attribute, if any, and start a fresh one.
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    ///
    /// Returns the name of a dropped duplicate.
    pub(crate) fn new_attribute(&mut self) -> Option<String> {
        let mut duplicate = None;
        if let Some(name) = self.pending_attribute_name.take() {
            let name = name.trim();
            if !name.is_empty() {
                let value = std::mem::take(&mut self.pending_attribute_value);
                if self.attributes.has_key_ignore_case(name) {
                    duplicate = Some(name.to_string());
                } else {
                    let _ = self.attributes.put_if_absent(name, value);
                }
            }
        }
        self.pending_attribute_value.clear();
        self.has_pending_attribute_value = false;
        duplicate
    }

    /// Commit any attribute still pending.
    pub(crate) fn finalise(&mut self) -> Option<String> {
        if self.pending_attribute_name.is_some() {
            self.new_attribute()
        } else {
            None
        }
    }

    pub(crate) fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Move the finished tag out as a token, leaving the builder empty.
    pub(crate) fn take_token(&mut self) -> Token {
        let name = std::mem::take(&mut self.name);
        if self.is_start {
            Token::StartTag {
                name,
                attributes: std::mem::take(&mut self.attributes),
                self_closing: self.self_closing,
            }
        } else {
            self.attributes = Attributes::new();
            Token::EndTag { name }
        }
    }
}

/// The comment token under construction.
#[derive(Debug, Default)]
pub(crate) struct CommentBuilder {
    pub(crate) data: String,
    pub(crate) bogus: bool,
}

impl CommentBuilder {
    pub(crate) fn reset(&mut self, bogus: bool) {
        self.data.clear();
        self.bogus = bogus;
    }

    pub(crate) fn take_token(&mut self) -> Token {
        Token::Comment {
            data: std::mem::take(&mut self.data),
            bogus: self.bogus,
        }
    }
}

/// The DOCTYPE token under construction.
#[derive(Debug, Default)]
pub(crate) struct DoctypeBuilder {
    pub(crate) name: String,
    pub(crate) pub_sys_key: Option<String>,
    pub(crate) public_id: String,
    pub(crate) system_id: String,
    pub(crate) force_quirks: bool,
}

impl DoctypeBuilder {
    /// "When a DOCTYPE token is created, its name, public identifier, and
    /// system identifier must be marked as missing ... and the force-quirks
    /// flag must be set to off."
    pub(crate) fn reset(&mut self) {
        self.name.clear();
        self.pub_sys_key = None;
        self.public_id.clear();
        self.system_id.clear();
        self.force_quirks = false;
    }

    pub(crate) fn take_token(&mut self) -> Token {
        Token::Doctype {
            name: std::mem::take(&mut self.name),
            pub_sys_key: self.pub_sys_key.take(),
            public_id: std::mem::take(&mut self.public_id),
            system_id: std::mem::take(&mut self.system_id),
            force_quirks: self.force_quirks,
        }
    }
}
