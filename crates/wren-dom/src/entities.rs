//! Named character references and text escaping.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! Three tables are provided, one per [`EscapeMode`]:
//! - **xhtml**: the five references XML defines
//! - **base**: the legacy references that browsers accept without a `;`
//! - **extended**: every named reference HTML defines
//!
//! The tables are packed into strings (see `entities_data`) and unpacked once,
//! on first use, behind a [`LazyLock`]. After that they are immutable and can be
//! shared freely between threads.
//!
//! Decoding of references found in markup lives with the tokenizer, which
//! needs the character reader to do speculative matching. This module only
//! answers name/codepoint lookups and escapes text for output.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::entities_data;
use crate::settings::{CoreCharset, OutputSettings};

/// Which named references the serializer may emit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Only `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`; everything else numeric.
    Xhtml,
    /// The legacy HTML set.
    #[default]
    Base,
    /// Every HTML named reference.
    Extended,
}

impl EscapeMode {
    fn table(self) -> &'static EntityTable {
        match self {
            Self::Xhtml => &XHTML,
            Self::Base => &BASE,
            Self::Extended => &EXTENDED,
        }
    }

    /// The preferred name for `c` in this mode, if it has one.
    #[must_use]
    pub fn name_for_codepoint(self, c: char) -> Option<&'static str> {
        self.table().name_for(c)
    }

    /// The single codepoint `name` stands for in this mode.
    #[must_use]
    pub fn codepoint_for_name(self, name: &str) -> Option<char> {
        let value = self.table().value_of(name)?;
        let mut chars = value.chars();
        let first = chars.next()?;
        chars.next().is_none().then_some(first)
    }

    /// Number of names in this mode's table.
    #[must_use]
    pub fn size(self) -> usize {
        self.table().names.len()
    }
}

/// One unpacked table: names sorted for binary search, with their values, and
/// a reverse index from single codepoints to the preferred name.
struct EntityTable {
    names: Vec<&'static str>,
    values: Vec<String>,
    by_codepoint: HashMap<char, &'static str>,
}

impl EntityTable {
    fn load(packed: &'static str) -> Self {
        let mut entries: Vec<(&'static str, String)> = packed
            .split('&')
            .filter(|record| !record.is_empty())
            .filter_map(|record| {
                let (name, points) = record.split_once('=')?;
                let value: Option<String> = points
                    .split(',')
                    .map(|p| u32::from_str_radix(p, 36).ok().and_then(char::from_u32))
                    .collect();
                Some((name, value?))
            })
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut by_codepoint: HashMap<char, &'static str> = HashMap::new();
        for (name, value) in &entries {
            let mut chars = value.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let _ = by_codepoint
                .entry(c)
                .and_modify(|current| {
                    if prefer_name(name, current) {
                        *current = name;
                    }
                })
                .or_insert(name);
        }

        let (names, values) = entries.into_iter().unzip();
        Self {
            names,
            values,
            by_codepoint,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search(&name).ok()
    }

    fn value_of(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.values[i].as_str())
    }

    fn name_for(&self, c: char) -> Option<&'static str> {
        self.by_codepoint.get(&c).copied()
    }
}

/// On reverse-lookup collisions prefer the all-lowercase name, then the
/// shorter one, then the alphabetically first.
fn prefer_name(candidate: &str, current: &str) -> bool {
    let lower = |s: &str| !s.bytes().any(|b| b.is_ascii_uppercase());
    (lower(candidate), std::cmp::Reverse(candidate.len()), std::cmp::Reverse(candidate))
        > (lower(current), std::cmp::Reverse(current.len()), std::cmp::Reverse(current))
}

static XHTML: LazyLock<EntityTable> = LazyLock::new(|| EntityTable::load(entities_data::XHTML));
static BASE: LazyLock<EntityTable> = LazyLock::new(|| EntityTable::load(entities_data::BASE));
static EXTENDED: LazyLock<EntityTable> =
    LazyLock::new(|| EntityTable::load(entities_data::FULL));

/// Unpack every table now instead of on first use.
pub fn ensure_initialized() {
    let _ = LazyLock::force(&XHTML);
    let _ = LazyLock::force(&BASE);
    let _ = LazyLock::force(&EXTENDED);
}

/// Whether `name` (without `&` and `;`) is any known named reference.
#[must_use]
pub fn is_named_entity(name: &str) -> bool {
    EXTENDED.index_of(name).is_some()
}

/// Whether `name` is a legacy reference that may appear without `;`.
#[must_use]
pub fn is_base_named_entity(name: &str) -> bool {
    BASE.index_of(name).is_some()
}

/// The text a named reference stands for; one or two characters.
#[must_use]
pub fn get_by_name(name: &str) -> Option<&'static str> {
    let table: &'static EntityTable = &EXTENDED;
    table.value_of(name)
}

/// The codepoints of a named reference.
#[must_use]
pub fn codepoints_for_name(name: &str) -> Option<Vec<char>> {
    get_by_name(name).map(|value| value.chars().collect())
}

/// The longest legacy reference that `candidate` starts with.
///
/// Used for references written without their `;`, e.g. `&notit` reads as
/// `&not` followed by `it`.
#[must_use]
pub fn longest_base_prefix(candidate: &str) -> Option<&'static str> {
    let table: &'static EntityTable = &BASE;
    (1..=candidate.len())
        .rev()
        .filter(|&end| candidate.is_char_boundary(end))
        .find_map(|end| table.index_of(&candidate[..end]).map(|i| table.names[i]))
}

/// HTML whitespace as the serializer understands it.
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{000C}' | '\r')
}

/// Escape `text` for use as element content with the given settings.
#[must_use]
pub fn escape(text: &str, settings: &OutputSettings) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    escape_into(&mut out, text, settings, false, false, false);
    out
}

/// Escape `text` into `out`.
///
/// - `in_attribute`: escape `"` and leave `<`/`>` alone (except in xhtml mode,
///   where `<` is always escaped)
/// - `normalise_white`: collapse whitespace runs to one space
/// - `strip_leading_white`: with `normalise_white`, drop leading whitespace
pub fn escape_into(
    out: &mut String,
    text: &str,
    settings: &OutputSettings,
    in_attribute: bool,
    normalise_white: bool,
    strip_leading_white: bool,
) {
    let mut last_was_white = false;
    let mut reached_non_white = false;
    let mode = settings.escape_mode;
    let charset = settings.core_charset();

    for c in text.chars() {
        if normalise_white {
            if is_whitespace(c) {
                if (strip_leading_white && !reached_non_white) || last_was_white {
                    continue;
                }
                out.push(' ');
                last_was_white = true;
                continue;
            }
            last_was_white = false;
            reached_non_white = true;
        }

        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => {
                if mode == EscapeMode::Xhtml {
                    out.push_str("&#xa0;");
                } else {
                    out.push_str("&nbsp;");
                }
            }
            '<' => {
                if !in_attribute || mode == EscapeMode::Xhtml {
                    out.push_str("&lt;");
                } else {
                    out.push(c);
                }
            }
            '>' => {
                if in_attribute {
                    out.push(c);
                } else {
                    out.push_str("&gt;");
                }
            }
            '"' => {
                if in_attribute {
                    out.push_str("&quot;");
                } else {
                    out.push(c);
                }
            }
            _ => {
                if charset.can_encode(c) {
                    out.push(c);
                } else {
                    append_encoded(out, mode, c);
                }
            }
        }
    }
}

fn append_encoded(out: &mut String, mode: EscapeMode, c: char) {
    if let Some(name) = mode.name_for_codepoint(c) {
        out.push('&');
        out.push_str(name);
        out.push(';');
    } else {
        out.push_str(&format!("&#x{:x};", c as u32));
    }
}

/// Whether the charset can carry every character of `text` unescaped.
#[must_use]
pub fn can_encode_all(text: &str, charset: CoreCharset) -> bool {
    text.chars().all(|c| charset.can_encode(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_load() {
        assert_eq!(EscapeMode::Xhtml.size(), 5);
        assert_eq!(EscapeMode::Base.size(), 106);
        assert_eq!(EscapeMode::Extended.size(), 2125);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(get_by_name("amp"), Some("&"));
        assert_eq!(get_by_name("eacute"), Some("é"));
        assert_eq!(get_by_name("NotEqualTilde"), Some("\u{2242}\u{0338}"));
        assert_eq!(get_by_name("nosuch"), None);
        assert!(is_base_named_entity("copy"));
        assert!(!is_base_named_entity("hellip"));
        assert!(is_named_entity("hellip"));
    }

    #[test]
    fn test_reverse_lookup_prefers_lowercase() {
        assert_eq!(EscapeMode::Extended.name_for_codepoint('&'), Some("amp"));
        assert_eq!(EscapeMode::Extended.name_for_codepoint('\u{00A0}'), Some("nbsp"));
        assert_eq!(EscapeMode::Base.name_for_codepoint('©'), Some("copy"));
        assert_eq!(EscapeMode::Xhtml.name_for_codepoint('©'), None);
    }

    #[test]
    fn test_longest_base_prefix() {
        assert_eq!(longest_base_prefix("notit"), Some("not"));
        assert_eq!(longest_base_prefix("ampx"), Some("amp"));
        assert_eq!(longest_base_prefix("zzz"), None);
    }

    #[test]
    fn test_escape_text_and_attribute() {
        let settings = OutputSettings::default();
        assert_eq!(escape("a < b & \"c\"", &settings), "a &lt; b &amp; \"c\"");

        let mut out = String::new();
        escape_into(&mut out, "x<\"y\">", &settings, true, false, false);
        assert_eq!(out, "x<&quot;y&quot;>");
    }

    #[test]
    fn test_escape_ascii_charset() {
        let ascii = OutputSettings::default().with_charset("ascii");
        assert_eq!(escape("café ☃", &ascii), "caf&eacute; &#x2603;");

        let xhtml = ascii.with_escape_mode(EscapeMode::Xhtml);
        assert_eq!(escape("é\u{a0}", &xhtml), "&#xe9;&#xa0;");
    }

    #[test]
    fn test_escape_normalises_whitespace() {
        let settings = OutputSettings::default();
        let mut out = String::new();
        escape_into(&mut out, "  a \n\t b ", &settings, false, true, true);
        assert_eq!(out, "a b ");
    }
}
