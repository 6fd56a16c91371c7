//! Element attribute, class and lookup helpers.

use wren_common::url::resolve_url;

use crate::attributes::Attributes;
use crate::node::NodeId;
use crate::tree::DomTree;

const ABS_PREFIX: &str = "abs:";

impl DomTree {
    /// The attributes of an element.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.as_element(id).map(|e| &e.attrs)
    }

    /// Attribute value of an element (case-insensitive key).
    ///
    /// A key of the form `abs:href` returns the attribute resolved to an
    /// absolute URL, as [`DomTree::abs_url`] does.
    #[must_use]
    pub fn attr(&self, id: NodeId, key: &str) -> Option<String> {
        if let Some(stripped) = key.strip_prefix(ABS_PREFIX) {
            let resolved = self.abs_url(id, stripped);
            return (!resolved.is_empty()).then_some(resolved);
        }
        self.attributes(id)
            .and_then(|attrs| attrs.get_ignore_case(key))
            .map(str::to_string)
    }

    /// Whether the element has `key` (case-insensitive). `abs:key` requires the
    /// value to resolve to an absolute URL.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, key: &str) -> bool {
        if let Some(stripped) = key.strip_prefix(ABS_PREFIX) {
            return self.has_attr(id, stripped) && !self.abs_url(id, stripped).is_empty();
        }
        self.attributes(id)
            .is_some_and(|attrs| attrs.has_key_ignore_case(key))
    }

    /// Set an attribute; does nothing on non-elements.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        if let Some(element) = self.as_element_mut(id) {
            element.attrs.put(key, value);
        }
    }

    /// Remove an attribute (case-insensitive), returning its old value.
    pub fn remove_attr(&mut self, id: NodeId, key: &str) -> Option<String> {
        self.as_element_mut(id)
            .and_then(|element| element.attrs.remove_ignore_case(key))
    }

    /// The `data-*` attributes with the prefix stripped.
    #[must_use]
    pub fn dataset(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(id).map(Attributes::dataset).unwrap_or_default()
    }

    /// The `id` attribute, or empty.
    #[must_use]
    pub fn element_id(&self, id: NodeId) -> &str {
        self.as_element(id)
            .and_then(|e| e.id())
            .unwrap_or_default()
    }

    /// The literal `class` attribute, or empty.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> &str {
        self.attributes(id)
            .and_then(|a| a.get("class"))
            .unwrap_or_default()
    }

    /// Class names in attribute order, without duplicates.
    #[must_use]
    pub fn class_names(&self, id: NodeId) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.class_name(id).split_ascii_whitespace() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Whether the element has the class (ASCII case-insensitive).
    #[must_use]
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.has_class(class_name))
    }

    /// Replace the element's classes.
    pub fn set_class_names(&mut self, id: NodeId, names: &[String]) {
        if names.is_empty() {
            let _ = self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &names.join(" "));
        }
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: NodeId, class_name: &str) {
        let mut names = self.class_names(id);
        if !names.iter().any(|n| n == class_name) {
            names.push(class_name.to_string());
            self.set_class_names(id, &names);
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: NodeId, class_name: &str) {
        let mut names = self.class_names(id);
        let before = names.len();
        names.retain(|n| n != class_name);
        if names.len() != before {
            self.set_class_names(id, &names);
        }
    }

    /// Add the class if absent, remove it if present.
    pub fn toggle_class(&mut self, id: NodeId, class_name: &str) {
        if self.class_names(id).iter().any(|n| n == class_name) {
            self.remove_class(id, class_name);
        } else {
            self.add_class(id, class_name);
        }
    }

    /// The form value: text for `<textarea>`, the `value` attribute otherwise.
    #[must_use]
    pub fn val(&self, id: NodeId) -> String {
        if self.is_named(id, "textarea") {
            self.text(id)
        } else {
            self.attr(id, "value").unwrap_or_default()
        }
    }

    /// Set the form value.
    pub fn set_val(&mut self, id: NodeId, value: &str) {
        if self.is_named(id, "textarea") {
            let _ = self.set_text(id, value);
        } else {
            self.set_attr(id, "value", value);
        }
    }

    /// Resolve the attribute `key` against the document base URI.
    ///
    /// Returns an empty string when the attribute is missing or cannot be
    /// made absolute.
    #[must_use]
    pub fn abs_url(&self, id: NodeId, key: &str) -> String {
        let Some(value) = self.attributes(id).and_then(|a| a.get_ignore_case(key)) else {
            return String::new();
        };
        let base = self.base_uri();
        resolve_url(value, (!base.is_empty()).then_some(base))
    }

    /// First element under `root` (inclusive) whose `id` is `element_id`.
    #[must_use]
    pub fn get_element_by_id(&self, root: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(root)
            .find(|&n| self.as_element(n).and_then(|e| e.id()) == Some(element_id))
    }

    /// Elements under `root` (inclusive) named `tag_name` (case-insensitive).
    #[must_use]
    pub fn get_elements_by_tag(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        let wanted = tag_name.trim().to_lowercase();
        self.descendants(root)
            .filter(|&n| self.normal_name(n) == Some(wanted.as_str()))
            .collect()
    }

    /// Elements under `root` (inclusive) with the class.
    #[must_use]
    pub fn get_elements_by_class(&self, root: NodeId, class_name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&n| self.has_class(n, class_name))
            .collect()
    }

    /// Elements under `root` (inclusive) that have attribute `key`.
    #[must_use]
    pub fn get_elements_by_attribute(&self, root: NodeId, key: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&n| self.has_attr(n, key.trim()))
            .collect()
    }
}
