//! Selector evaluators.
//!
//! A parsed query is a tree of [`Evaluator`]s. Leaves test one element on its
//! own (its name, attributes, position or text); structural evaluators test
//! the element's relatives; `And` and `Or` combine. Every evaluator answers
//! one question: does `element` match, when the query runs under `root`?
//!
//! The pseudo-classes follow
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), plus the
//! index and text pseudo-classes (`:lt`, `:contains`, `:matches`, ...) that
//! have no CSS equivalent.

use std::fmt;

use regex::Regex;
use wren_dom::{DomTree, NodeData, NodeId};

/// [§ 14.3 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
///
/// "The :nth-child(An+B [of S]?) pseudo-class notation represents elements
/// that are among An+Bth elements from the list composed of their inclusive
/// siblings."
///
/// Positions are 1-based. `a == 0` matches position `b` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Step between matching positions.
    pub a: i32,
    /// Offset of the first matching position.
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `position` is one of the An+B positions for some
    /// non-negative n.
    #[must_use]
    pub const fn matches(self, position: i32) -> bool {
        if self.a == 0 {
            return position == self.b;
        }
        let offset = position - self.b;
        offset * self.a >= 0 && offset % self.a == 0
    }
}

impl fmt::Display for Nth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{b}"),
            (a, 0) => write!(f, "{a}n"),
            (a, b) => write!(f, "{a}n{b:+}"),
        }
    }
}

/// Which sibling list a position is counted in, and from which end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NthKind {
    Child,
    LastChild,
    OfType,
    LastOfType,
}

/// A node in a parsed selector.
#[derive(Debug, Clone)]
pub enum Evaluator {
    // ===== Elemental selectors =====
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Holds the lower-cased name; `ns|tag` is stored as `ns:tag`.
    Tag(String),

    /// Any element whose name ends with the suffix, used for `*|tag` to match
    /// `tag` in every namespace.
    TagEndsWith(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    AllElements,

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Compared case-sensitively.
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Compared case-insensitively.
    Class(String),

    // ===== Attribute selectors =====
    /// [§ 6.1 Attribute presence](https://www.w3.org/TR/selectors-4/#attribute-representation)
    /// `[attr]`: "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Attribute(String),

    /// `[^prefix]`: any attribute whose name starts with the prefix, such as
    /// `[^data-]`.
    AttributeStarting(String),

    /// `[attr=value]`: the trimmed value equals `value`, ignoring case.
    AttributeWithValue(String, String),

    /// `[attr!=value]`: the value differs from `value`, ignoring case. Also
    /// matches elements without the attribute.
    AttributeWithValueNot(String, String),

    /// [§ 6.2 Substring matching](https://www.w3.org/TR/selectors-4/#attribute-substrings)
    /// `[attr^=value]`: "Represents an element with the att attribute whose
    /// value begins with the prefix 'val'." Case-insensitive.
    AttributeWithValueStarting(String, String),

    /// `[attr$=value]`: "Represents an element with the att attribute whose
    /// value ends with the suffix 'val'." Case-insensitive.
    AttributeWithValueEnding(String, String),

    /// `[attr*=value]`: "Represents an element with the att attribute whose
    /// value contains at least one instance of the substring 'val'."
    /// Case-insensitive.
    AttributeWithValueContaining(String, String),

    /// `[attr~=regex]`: the value contains a match for the pattern.
    AttributeWithValueMatching(String, Regex),

    // ===== Index pseudo-classes =====
    /// `:lt(n)`: element sibling index (0-based) below `n`.
    IndexLessThan(usize),
    /// `:gt(n)`: element sibling index above `n`.
    IndexGreaterThan(usize),
    /// `:eq(n)`: element sibling index equal to `n`.
    IndexEquals(usize),

    // ===== Tree-structural pseudo-classes =====
    /// `:nth-child(An+B)`: position among all element siblings.
    IsNthChild(Nth),

    /// [§ 14.3.4 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    /// "The :nth-last-child(An+B [of S]? ) pseudo-class notation represents
    /// elements that are among An+Bth elements from the list composed of
    /// their inclusive siblings, counting backwards from the end."
    IsNthLastChild(Nth),

    /// [§ 14.4.4 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    /// "The :nth-of-type(An+B) pseudo-class notation represents elements that
    /// are among An+Bth elements from the list composed of their inclusive
    /// siblings with the same expanded element name as them."
    IsNthOfType(Nth),

    /// `:nth-last-of-type(An+B)`: as `:nth-of-type`, counting from the end.
    IsNthLastOfType(Nth),

    /// [§ 14.3.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    /// "The :first-child pseudo-class represents an element that is first
    /// among its inclusive siblings."
    IsFirstChild,

    /// [§ 14.3.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    /// "The :last-child pseudo-class represents an element that is last among
    /// its inclusive siblings."
    IsLastChild,

    /// [§ 14.4.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    /// "The :first-of-type pseudo-class represents the same element as
    /// :nth-of-type(1)."
    IsFirstOfType,

    /// [§ 14.4.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    /// "The :last-of-type pseudo-class represents the same element as
    /// :nth-last-of-type(1)."
    IsLastOfType,

    /// [§ 14.3.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    /// "The :only-child pseudo-class represents an element without any
    /// siblings."
    IsOnlyChild,

    /// [§ 14.4.3 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    /// "The :only-of-type pseudo-class represents an element that has no
    /// siblings with the same expanded element name."
    IsOnlyOfType,

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children
    /// except, optionally, document white space characters."
    ///
    /// Here any text child, whitespace included, makes the element non-empty;
    /// comments, doctypes and XML declarations do not.
    IsEmpty,

    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the
    /// document."
    ///
    /// Relative to the query: the query root, or the document element when
    /// the query runs from the document node.
    IsRoot,

    // ===== Text pseudo-classes =====
    /// `:contains(text)`: the element's normalised text contains the search
    /// text, ignoring case. Holds the lower-cased search text.
    ContainsText(String),
    /// `:containsOwn(text)`: as `:contains`, over the element's own text.
    ContainsOwnText(String),
    /// `:containsData(data)`: the element's script, style or comment data
    /// contains the search text, ignoring case.
    ContainsData(String),
    /// `:matches(regex)`: the element's text contains a match.
    Matches(Regex),
    /// `:matchesOwn(regex)`: the element's own text contains a match.
    MatchesOwn(Regex),

    // ===== Structural =====
    /// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
    /// "The relational pseudo-class :has() is a functional pseudo-class
    /// taking a <relative-selector-list> as an argument. It represents an
    /// element if any of the relative selectors would match at least one
    /// element when anchored against this element."
    ///
    /// Matches when some descendant (not the element itself) matches, with
    /// the element as the inner query root.
    Has(Box<Evaluator>),

    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class
    /// taking a selector list as an argument. It represents an element that
    /// is not represented by its argument."
    Not(Box<Evaluator>),

    /// [§ 15.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    ///
    /// Holds A: some ancestor, up to and including the query root, matches.
    Parent(Box<Evaluator>),

    /// [§ 15.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    ImmediateParent(Box<Evaluator>),

    /// [§ 15.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    PreviousSibling(Box<Evaluator>),

    /// [§ 15.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    ImmediatePreviousSibling(Box<Evaluator>),

    /// The query root itself. Stands in for the left side of a query that
    /// starts with a combinator, as in `> p`.
    Root,

    // ===== Combining =====
    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    /// "A compound selector is a sequence of simple selectors that are not
    /// separated by a combinator, and represents a set of simultaneous
    /// conditions on a single element."
    And(Vec<Evaluator>),

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    /// "A comma-separated list of selectors represents the union of all
    /// elements selected by each of the individual selectors in the list."
    Or(Vec<Evaluator>),
}

impl Evaluator {
    /// Whether `element` matches when the query runs under `root`.
    ///
    /// Non-element nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, root: NodeId, element: NodeId) -> bool {
        if !tree.is_element(element) {
            return false;
        }
        match self {
            Self::Tag(name) => tree.normal_name(element) == Some(name.as_str()),
            Self::TagEndsWith(suffix) => tree
                .normal_name(element)
                .is_some_and(|name| name.ends_with(suffix.as_str())),
            Self::AllElements => true,
            Self::Id(id) => tree.element_id(element) == id,
            Self::Class(class_name) => tree.has_class(element, class_name),

            Self::Attribute(key) => tree.has_attr(element, key),
            Self::AttributeStarting(prefix) => tree.attributes(element).is_some_and(|attrs| {
                attrs
                    .iter()
                    .any(|attr| attr.key.to_lowercase().starts_with(prefix.as_str()))
            }),
            Self::AttributeWithValue(key, value) => tree
                .attr(element, key)
                .is_some_and(|actual| actual.trim().to_lowercase() == *value),
            Self::AttributeWithValueNot(key, value) => !tree
                .attr(element, key)
                .is_some_and(|actual| actual.to_lowercase() == *value),
            Self::AttributeWithValueStarting(key, value) => tree
                .attr(element, key)
                .is_some_and(|actual| actual.to_lowercase().starts_with(value.as_str())),
            Self::AttributeWithValueEnding(key, value) => tree
                .attr(element, key)
                .is_some_and(|actual| actual.to_lowercase().ends_with(value.as_str())),
            Self::AttributeWithValueContaining(key, value) => tree
                .attr(element, key)
                .is_some_and(|actual| actual.to_lowercase().contains(value.as_str())),
            Self::AttributeWithValueMatching(key, pattern) => tree
                .attr(element, key)
                .is_some_and(|actual| pattern.is_match(&actual)),

            Self::IndexLessThan(index) => tree.element_sibling_index(element) < *index,
            Self::IndexGreaterThan(index) => tree.element_sibling_index(element) > *index,
            Self::IndexEquals(index) => tree.element_sibling_index(element) == *index,

            Self::IsNthChild(nth) => nth_matches(tree, NthKind::Child, *nth, element),
            Self::IsNthLastChild(nth) => nth_matches(tree, NthKind::LastChild, *nth, element),
            Self::IsNthOfType(nth) => nth_matches(tree, NthKind::OfType, *nth, element),
            Self::IsNthLastOfType(nth) => nth_matches(tree, NthKind::LastOfType, *nth, element),
            Self::IsFirstChild => {
                has_element_parent(tree, element) && tree.previous_element_sibling(element).is_none()
            }
            Self::IsLastChild => {
                has_element_parent(tree, element) && tree.next_element_sibling(element).is_none()
            }
            Self::IsFirstOfType => {
                has_element_parent(tree, element) && nth_position(tree, NthKind::OfType, element) == 1
            }
            Self::IsLastOfType => {
                has_element_parent(tree, element)
                    && nth_position(tree, NthKind::LastOfType, element) == 1
            }
            Self::IsOnlyChild => {
                has_element_parent(tree, element) && tree.sibling_elements(element).is_empty()
            }
            Self::IsOnlyOfType => has_element_parent(tree, element) && same_type_count(tree, element) == 1,
            Self::IsEmpty => tree.children(element).iter().all(|&child| {
                matches!(
                    tree.data(child),
                    NodeData::Comment(_) | NodeData::DocumentType(_) | NodeData::XmlDeclaration(_)
                )
            }),
            Self::IsRoot => {
                let effective = if tree.is_element(root) {
                    Some(root)
                } else {
                    tree.element_children(root).first().copied()
                };
                effective == Some(element)
            }

            Self::ContainsText(search) => tree.text(element).to_lowercase().contains(search.as_str()),
            Self::ContainsOwnText(search) => tree
                .own_text(element)
                .to_lowercase()
                .contains(search.as_str()),
            Self::ContainsData(search) => tree
                .data_content(element)
                .to_lowercase()
                .contains(search.as_str()),
            Self::Matches(pattern) => pattern.is_match(&tree.text(element)),
            Self::MatchesOwn(pattern) => pattern.is_match(&tree.own_text(element)),

            Self::Has(inner) => tree
                .descendants(element)
                .skip(1)
                .any(|descendant| inner.matches(tree, element, descendant)),
            Self::Not(inner) => !inner.matches(tree, root, element),
            Self::Parent(inner) => {
                if element == root {
                    return false;
                }
                for ancestor in tree.ancestors(element) {
                    if inner.matches(tree, root, ancestor) {
                        return true;
                    }
                    if ancestor == root {
                        break;
                    }
                }
                false
            }
            Self::ImmediateParent(inner) => {
                element != root
                    && tree
                        .parent(element)
                        .is_some_and(|parent| inner.matches(tree, root, parent))
            }
            Self::PreviousSibling(inner) => {
                if element == root {
                    return false;
                }
                let mut previous = tree.previous_element_sibling(element);
                while let Some(sibling) = previous {
                    if inner.matches(tree, root, sibling) {
                        return true;
                    }
                    previous = tree.previous_element_sibling(sibling);
                }
                false
            }
            Self::ImmediatePreviousSibling(inner) => {
                element != root
                    && tree
                        .previous_element_sibling(element)
                        .is_some_and(|sibling| inner.matches(tree, root, sibling))
            }
            Self::Root => element == root,

            Self::And(evaluators) => evaluators.iter().all(|e| e.matches(tree, root, element)),
            Self::Or(evaluators) => evaluators.iter().any(|e| e.matches(tree, root, element)),
        }
    }

    /// The last branch of an `Or`, or `self` for anything else.
    #[must_use]
    pub fn right_most(&self) -> &Self {
        match self {
            Self::Or(evaluators) => evaluators.last().unwrap_or(self),
            _ => self,
        }
    }

    /// Replace the last branch of an `Or`. Anything else is replaced whole.
    pub fn replace_right_most(&mut self, replacement: Self) {
        if let Self::Or(evaluators) = self
            && let Some(last) = evaluators.last_mut()
        {
            *last = replacement;
            return;
        }
        *self = replacement;
    }
}

/// Elements directly under the document, and detached elements, have no
/// sibling position for the structural pseudo-classes.
fn has_element_parent(tree: &DomTree, element: NodeId) -> bool {
    tree.parent(element).is_some_and(|parent| tree.is_element(parent))
}

fn nth_matches(tree: &DomTree, kind: NthKind, nth: Nth, element: NodeId) -> bool {
    has_element_parent(tree, element) && nth.matches(nth_position(tree, kind, element))
}

fn nth_position(tree: &DomTree, kind: NthKind, element: NodeId) -> i32 {
    let Some(parent) = tree.parent(element) else {
        return 0;
    };
    let siblings = tree.element_children(parent);
    let index = tree.element_sibling_index(element);
    let name = tree.normal_name(element);
    let position = match kind {
        NthKind::Child => index + 1,
        NthKind::LastChild => siblings.len() - index,
        NthKind::OfType => siblings[..=index]
            .iter()
            .filter(|&&s| tree.normal_name(s) == name)
            .count(),
        NthKind::LastOfType => siblings[index..]
            .iter()
            .filter(|&&s| tree.normal_name(s) == name)
            .count(),
    };
    i32::try_from(position).unwrap_or(i32::MAX)
}

fn same_type_count(tree: &DomTree, element: NodeId) -> usize {
    let name = tree.normal_name(element);
    tree.parent(element).map_or(0, |parent| {
        tree.element_children(parent)
            .iter()
            .filter(|&&s| tree.normal_name(s) == name)
            .count()
    })
}

fn write_joined(f: &mut fmt::Formatter<'_>, evaluators: &[Evaluator], separator: &str) -> fmt::Result {
    for (i, evaluator) in evaluators.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{evaluator}")?;
    }
    Ok(())
}

/// Renders the evaluator back as a query. Structural evaluators read
/// right-to-left as they are stored, so `div p` renders as `p div `.
impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => f.write_str(name),
            Self::TagEndsWith(suffix) => write!(f, "*{suffix}"),
            Self::AllElements => f.write_str("*"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class_name) => write!(f, ".{class_name}"),
            Self::Attribute(key) => write!(f, "[{key}]"),
            Self::AttributeStarting(prefix) => write!(f, "[^{prefix}]"),
            Self::AttributeWithValue(key, value) => write!(f, "[{key}={value}]"),
            Self::AttributeWithValueNot(key, value) => write!(f, "[{key}!={value}]"),
            Self::AttributeWithValueStarting(key, value) => write!(f, "[{key}^={value}]"),
            Self::AttributeWithValueEnding(key, value) => write!(f, "[{key}$={value}]"),
            Self::AttributeWithValueContaining(key, value) => write!(f, "[{key}*={value}]"),
            Self::AttributeWithValueMatching(key, pattern) => write!(f, "[{key}~={pattern}]"),
            Self::IndexLessThan(index) => write!(f, ":lt({index})"),
            Self::IndexGreaterThan(index) => write!(f, ":gt({index})"),
            Self::IndexEquals(index) => write!(f, ":eq({index})"),
            Self::IsNthChild(nth) => write!(f, ":nth-child({nth})"),
            Self::IsNthLastChild(nth) => write!(f, ":nth-last-child({nth})"),
            Self::IsNthOfType(nth) => write!(f, ":nth-of-type({nth})"),
            Self::IsNthLastOfType(nth) => write!(f, ":nth-last-of-type({nth})"),
            Self::IsFirstChild => f.write_str(":first-child"),
            Self::IsLastChild => f.write_str(":last-child"),
            Self::IsFirstOfType => f.write_str(":first-of-type"),
            Self::IsLastOfType => f.write_str(":last-of-type"),
            Self::IsOnlyChild => f.write_str(":only-child"),
            Self::IsOnlyOfType => f.write_str(":only-of-type"),
            Self::IsEmpty => f.write_str(":empty"),
            Self::IsRoot => f.write_str(":root"),
            Self::ContainsText(search) => write!(f, ":contains({search})"),
            Self::ContainsOwnText(search) => write!(f, ":containsOwn({search})"),
            Self::ContainsData(search) => write!(f, ":containsData({search})"),
            Self::Matches(pattern) => write!(f, ":matches({pattern})"),
            Self::MatchesOwn(pattern) => write!(f, ":matchesOwn({pattern})"),
            Self::Has(inner) => write!(f, ":has({inner})"),
            Self::Not(inner) => write!(f, ":not({inner})"),
            Self::Parent(inner) => write!(f, "{inner} "),
            Self::ImmediateParent(inner) => write!(f, "{inner} > "),
            Self::PreviousSibling(inner) => write!(f, "{inner} ~ "),
            Self::ImmediatePreviousSibling(inner) => write!(f, "{inner} + "),
            Self::Root => f.write_str(":root"),
            Self::And(evaluators) => write_joined(f, evaluators, ""),
            Self::Or(evaluators) => write_joined(f, evaluators, ", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_positions() {
        let odd = Nth { a: 2, b: 1 };
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(5));

        let first_three = Nth { a: -1, b: 3 };
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        let exactly_two = Nth { a: 0, b: 2 };
        assert!(exactly_two.matches(2));
        assert!(!exactly_two.matches(4));
    }

    #[test]
    fn test_nth_display() {
        assert_eq!(Nth { a: 2, b: 1 }.to_string(), "2n+1");
        assert_eq!(Nth { a: -1, b: 3 }.to_string(), "-1n+3");
        assert_eq!(Nth { a: 3, b: 0 }.to_string(), "3n");
        assert_eq!(Nth { a: 0, b: 4 }.to_string(), "4");
    }

    #[test]
    fn test_replace_right_most() {
        let mut or = Evaluator::Or(vec![Evaluator::Tag("a".into()), Evaluator::Tag("b".into())]);
        assert_eq!(or.right_most().to_string(), "b");
        or.replace_right_most(Evaluator::Tag("c".into()));
        assert_eq!(or.to_string(), "a, c");

        let mut tag = Evaluator::Tag("a".into());
        tag.replace_right_most(Evaluator::Id("x".into()));
        assert_eq!(tag.to_string(), "#x");
    }
}
