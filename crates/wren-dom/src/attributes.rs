//! Element attributes.
//!
//! [§ 4.9.2 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
//!
//! Attributes keep their source order, which is also their output order. Keys
//! are unique within one collection: setting an existing key replaces its
//! value in place.

use std::fmt;

use crate::entities;
use crate::settings::{OutputSettings, Syntax};

/// Attributes that are written without a value in HTML syntax when the value
/// is empty or equal to the name (`<input checked>`).
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "checked", "compact", "declare", "default", "defer",
    "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "multiple", "muted",
    "nohref", "noresize", "noshade", "novalidate", "nowrap", "open", "readonly", "required",
    "reversed", "seamless", "selected", "sortable", "truespeed", "typemustmatch",
];

const DATA_PREFIX: &str = "data-";

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Attribute name.
    pub key: String,
    /// Attribute value; empty for a valueless attribute.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether `key` is a boolean attribute.
    #[must_use]
    pub fn is_boolean_attribute(key: &str) -> bool {
        BOOLEAN_ATTRIBUTES
            .binary_search(&key.to_ascii_lowercase().as_str())
            .is_ok()
    }

    /// Whether this attribute prints as a bare key under `settings`.
    #[must_use]
    pub fn should_collapse(&self, settings: &OutputSettings) -> bool {
        settings.syntax == Syntax::Html
            && (self.value.is_empty() || self.value.eq_ignore_ascii_case(&self.key))
            && Self::is_boolean_attribute(&self.key)
    }

    /// Whether this is a `data-*` attribute.
    #[must_use]
    pub fn is_data_attribute(&self) -> bool {
        self.key.len() > DATA_PREFIX.len() && self.key.starts_with(DATA_PREFIX)
    }

    /// Serialize as ` key="value"` into `out`.
    pub fn html_into(&self, out: &mut String, settings: &OutputSettings) {
        out.push_str(&self.key);
        if !self.should_collapse(settings) {
            out.push_str("=\"");
            entities::escape_into(out, &self.value, settings, true, false, false);
            out.push('"');
        }
    }
}

/// The ordered attribute list of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|a| a.key == key)
    }

    fn index_of_ignore_case(&self, key: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|a| a.key.eq_ignore_ascii_case(key))
    }

    /// Value for `key` (case-sensitive).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_of(key).map(|i| self.items[i].value.as_str())
    }

    /// Value for `key`, ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.index_of_ignore_case(key)
            .map(|i| self.items[i].value.as_str())
    }

    /// Whether `key` is present (case-sensitive).
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Whether `key` is present, ignoring ASCII case.
    #[must_use]
    pub fn has_key_ignore_case(&self, key: &str) -> bool {
        self.index_of_ignore_case(key).is_some()
    }

    /// Set `key` to `value`, replacing an existing value in place.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index_of(&key) {
            Some(i) => self.items[i].value = value,
            None => self.items.push(Attribute { key, value }),
        }
    }

    /// Add `key` only when it is not already present (first one wins).
    ///
    /// Returns whether the attribute was added.
    pub fn put_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.has_key(&key) {
            return false;
        }
        self.items.push(Attribute {
            key,
            value: value.into(),
        });
        true
    }

    /// Remove `key` (case-sensitive), returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.index_of(key).map(|i| self.items.remove(i).value)
    }

    /// Remove `key` ignoring ASCII case, returning its value.
    pub fn remove_ignore_case(&mut self, key: &str) -> Option<String> {
        self.index_of_ignore_case(key)
            .map(|i| self.items.remove(i).value)
    }

    /// Copy every attribute of `other` into this collection.
    pub fn add_all(&mut self, other: &Self) {
        for attr in &other.items {
            self.put(attr.key.clone(), attr.value.clone());
        }
    }

    /// Iterate in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    /// The `data-*` attributes, with the prefix stripped from the keys.
    #[must_use]
    pub fn dataset(&self) -> Vec<(&str, &str)> {
        self.items
            .iter()
            .filter(|a| a.is_data_attribute())
            .map(|a| (&a.key[DATA_PREFIX.len()..], a.value.as_str()))
            .collect()
    }

    /// Lower-case every key, keeping the first of any keys that collide.
    pub fn normalize(&mut self) {
        let mut seen: Vec<Attribute> = Vec::with_capacity(self.items.len());
        for mut attr in self.items.drain(..) {
            attr.key = attr.key.to_lowercase();
            if !seen.iter().any(|a| a.key == attr.key) {
                seen.push(attr);
            }
        }
        self.items = seen;
    }

    /// Serialize every attribute as ` key="value"` into `out`.
    pub fn html_into(&self, out: &mut String, settings: &OutputSettings) {
        for attr in &self.items {
            out.push(' ');
            attr.html_into(out, settings);
        }
    }

    /// Serialize with default output settings.
    #[must_use]
    pub fn html(&self) -> String {
        let mut out = String::new();
        self.html_into(&mut out, &OutputSettings::default());
        out
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for attr in iter {
            let _ = attrs.put_if_absent(attr.key, attr.value);
        }
        attrs
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_table_is_sorted() {
        assert!(BOOLEAN_ATTRIBUTES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.put("a", "1");
        attrs.put("b", "2");
        attrs.put("a", "3");
        let keys: Vec<&str> = attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn test_first_value_wins_when_collecting() {
        let attrs: Attributes = [Attribute::new("x", "1"), Attribute::new("x", "2")]
            .into_iter()
            .collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("x"), Some("1"));
    }

    #[test]
    fn test_html_collapses_boolean_attributes() {
        let attrs: Attributes = [
            Attribute::new("checked", ""),
            Attribute::new("title", "a \"b\" <c>"),
        ]
        .into_iter()
        .collect();
        assert_eq!(attrs.html(), " checked title=\"a &quot;b&quot; <c>\"");

        let mut out = String::new();
        attrs.html_into(&mut out, &OutputSettings::xml());
        assert_eq!(out, " checked=\"\" title=\"a &quot;b&quot; &lt;c>\"");
    }

    #[test]
    fn test_dataset() {
        let attrs: Attributes = [
            Attribute::new("data-id", "7"),
            Attribute::new("data-", "x"),
            Attribute::new("id", "y"),
        ]
        .into_iter()
        .collect();
        assert_eq!(attrs.dataset(), vec![("id", "7")]);
    }

    #[test]
    fn test_normalize_lowercases_keys() {
        let mut attrs: Attributes = [Attribute::new("ID", "a"), Attribute::new("id", "b")]
            .into_iter()
            .collect();
        attrs.normalize();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("id"), Some("a"));
    }
}
