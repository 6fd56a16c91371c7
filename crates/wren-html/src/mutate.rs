//! Tree mutations that take markup.
//!
//! These live here rather than on [`DomTree`] itself because they need the
//! parser: the markup is parsed as a fragment in the context of the element
//! it lands in, so `append_html(tbody, "<tr>...")` builds a row rather than
//! flattening it into text.

use wren_dom::{DomError, DomTree, NodeId, NodeData};

use crate::parser::parse_fragment_in;

/// Markup-taking mutations on a [`DomTree`].
pub trait HtmlMutation {
    /// Wrap `node` in the structure described by `html`.
    ///
    /// The markup is parsed in the context of `node`'s parent. `node` moves
    /// into the deepest first-child element of the first element produced,
    /// and any further top-level nodes follow the wrapper.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] when `node` is detached and
    /// [`DomError::EmptyWrapper`] when the markup holds no element.
    fn wrap(&mut self, node: NodeId, html: &str) -> Result<NodeId, DomError>;

    /// Parse `html` inside `element` and append the result.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] when `element` is not an element.
    fn append_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError>;

    /// Parse `html` inside `element` and insert the result before its
    /// existing children.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] when `element` is not an element.
    fn prepend_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError>;

    /// Parse `html` in the context of `node`'s parent and insert the result
    /// just before `node`.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] when `node` is detached.
    fn before_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError>;

    /// Parse `html` in the context of `node`'s parent and insert the result
    /// just after `node`.
    ///
    /// # Errors
    ///
    /// [`DomError::NoParent`] when `node` is detached.
    fn after_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError>;

    /// Replace the children of `element` with the parse of `html`.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] when `element` is not an element.
    fn set_inner_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError>;
}

impl HtmlMutation for DomTree {
    fn wrap(&mut self, node: NodeId, html: &str) -> Result<NodeId, DomError> {
        let parent = self.parent(node).ok_or(DomError::NoParent(node))?;
        let context = context_element(self, parent).or_else(|| context_element(self, node));
        let wrappers = parse_fragment_in(self, html, context);
        self.wrap_with(node, &wrappers)
    }

    fn append_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError> {
        let nodes = parse_into(self, element, html)?;
        let index = self.child_node_size(element);
        self.insert_children(element, index, &nodes)
    }

    fn prepend_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError> {
        let nodes = parse_into(self, element, html)?;
        self.insert_children(element, 0, &nodes)
    }

    fn before_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        let parent = self.parent(node).ok_or(DomError::NoParent(node))?;
        let context = context_element(self, parent);
        let nodes = parse_fragment_in(self, html, context);
        let index = self.sibling_index(node);
        self.insert_children(parent, index, &nodes)
    }

    fn after_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        let parent = self.parent(node).ok_or(DomError::NoParent(node))?;
        let context = context_element(self, parent);
        let nodes = parse_fragment_in(self, html, context);
        let index = self.sibling_index(node) + 1;
        self.insert_children(parent, index, &nodes)
    }

    fn set_inner_html(&mut self, element: NodeId, html: &str) -> Result<(), DomError> {
        if !self.is_element(element) {
            return Err(DomError::NotAnElement(element));
        }
        self.empty(element);
        self.append_html(element, html)
    }
}

/// `id` when it is an element. Markup placed directly under the document is
/// parsed with no context.
fn context_element(tree: &DomTree, id: NodeId) -> Option<NodeId> {
    tree.is_element(id).then_some(id)
}

fn parse_into(tree: &mut DomTree, element: NodeId, html: &str) -> Result<Vec<NodeId>, DomError> {
    if !matches!(tree.data(element), NodeData::Element(_)) {
        return Err(DomError::NotAnElement(element));
    }
    Ok(parse_fragment_in(tree, html, Some(element)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_body_fragment;

    fn body_of(html: &str) -> (DomTree, NodeId) {
        let mut tree = parse_body_fragment(html, "");
        let body = tree.body();
        (tree, body)
    }

    #[test]
    fn test_append_html_uses_element_context() {
        let (mut tree, body) = body_of("<table><tbody></tbody></table>");
        let tbody = tree.get_elements_by_tag(body, "tbody")[0];
        tree.append_html(tbody, "<tr><td>1</td></tr>").unwrap();
        assert_eq!(tree.html(tbody), "<tr>\n <td>1</td>\n</tr>");
    }

    #[test]
    fn test_prepend_html() {
        let (mut tree, body) = body_of("<div><p>Two</p></div>");
        let div = tree.element_children(body)[0];
        tree.prepend_html(div, "<p>One</p>").unwrap();
        assert_eq!(tree.text(div), "One Two");
    }

    #[test]
    fn test_before_and_after_html() {
        let (mut tree, body) = body_of("<p>Two</p>");
        let p = tree.element_children(body)[0];
        tree.before_html(p, "<p>One</p>").unwrap();
        tree.after_html(p, "<p>Three</p>").unwrap();
        assert_eq!(tree.text(body), "One Two Three");
        assert_eq!(tree.element_sibling_index(p), 1);
    }

    #[test]
    fn test_wrap_moves_node_into_deepest_element() {
        let (mut tree, body) = body_of("<p>Hello</p>");
        let p = tree.element_children(body)[0];
        let wrapper = tree
            .wrap(p, "<div class=head></div><span>after</span>")
            .unwrap();
        assert_eq!(tree.parent(p), Some(wrapper));
        assert_eq!(
            tree.html(body),
            "<div class=\"head\">\n <p>Hello</p>\n</div>\n<span>after</span>"
        );
    }

    #[test]
    fn test_wrap_detached_node_fails() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        assert_eq!(tree.wrap(div, "<b></b>"), Err(DomError::NoParent(div)));
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let (mut tree, body) = body_of("<div><p>Old</p></div>");
        let div = tree.element_children(body)[0];
        tree.set_inner_html(div, "<em>New</em>").unwrap();
        assert_eq!(tree.html(div), "<em>New</em>");
    }

    #[test]
    fn test_append_html_to_text_node_fails() {
        let (mut tree, body) = body_of("text");
        let text = tree.children(body)[0];
        assert_eq!(
            tree.append_html(text, "<b>x</b>"),
            Err(DomError::NotAnElement(text))
        );
    }
}
