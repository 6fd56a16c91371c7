use std::cell::OnceCell;

use strum_macros::Display;

use crate::attributes::Attributes;
use crate::settings::OutputSettings;
use crate::tag::Tag;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The document's compatibility mode, decided by its DOCTYPE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Quirks mode.
    Quirks,
    /// Limited-quirks mode.
    LimitedQuirks,
}

/// Data carried by the document node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentData {
    /// Settings used when this document is serialized.
    pub output_settings: OutputSettings,
    /// Compatibility mode.
    pub quirks_mode: QuirksMode,
    /// URI relative attribute values resolve against.
    pub base_uri: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// NOTE: Only a flat tag name is stored; there is no namespace model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's tag and its behaviour flags.
    pub tag: Tag,
    /// "An element has an associated attribute list"
    pub attrs: Attributes,
}

impl ElementData {
    /// A new element without attributes.
    #[must_use]
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Attributes::new(),
        }
    }

    /// A new element with the given attributes.
    #[must_use]
    pub const fn with_attributes(tag: Tag, attrs: Attributes) -> Self {
        Self { tag, attrs }
    }

    /// The tag name as it prints.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        self.tag.name()
    }

    /// The lower-case tag name used for matching.
    #[must_use]
    pub fn normal_name(&self) -> &str {
        self.tag.normal_name()
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Returns the class names from the class attribute, in order.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the element has `class_name`, ignoring ASCII case.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|c| c.eq_ignore_ascii_case(class_name))
    }
}

/// DOCTYPE data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypeData {
    /// Document type name, usually `html`.
    pub name: String,
    /// `PUBLIC` or `SYSTEM` keyword as written, when an identifier followed it.
    pub pub_sys_key: Option<String>,
    /// Public identifier.
    pub public_id: String,
    /// System identifier.
    pub system_id: String,
}

/// An `<?xml ...?>` declaration or `<!...>` processing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclarationData {
    /// Declaration name (`xml` for `<?xml ...?>`).
    pub name: String,
    /// Pseudo-attributes of the declaration.
    pub attrs: Attributes,
    /// `<!...>` rather than `<?...?>`.
    pub is_processing_instruction: bool,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
///
/// The closed set of node kinds. Traversal and serialization match on this
/// exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document(DocumentData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// Raw content of `script` and `style`; never escaped on output.
    Data(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
    /// A `<![CDATA[...]]>` section.
    CData(String),
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DocumentTypeData),
    /// An XML declaration or processing instruction.
    XmlDeclaration(XmlDeclarationData),
}

impl NodeData {
    /// The DOM `nodeName` of this node.
    #[must_use]
    pub fn node_name(&self) -> &str {
        match self {
            Self::Document(_) => "#document",
            Self::Element(data) => data.tag_name(),
            Self::Text(_) => "#text",
            Self::Data(_) => "#data",
            Self::Comment(_) => "#comment",
            Self::CData(_) => "#cdata",
            Self::DocumentType(_) => "#doctype",
            Self::XmlDeclaration(_) => "#declaration",
        }
    }

    /// True for element nodes.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// True for a text node containing only whitespace (or nothing).
    #[must_use]
    pub fn is_blank_text(&self) -> bool {
        match self {
            Self::Text(text) => text.chars().all(crate::text::is_actually_whitespace),
            _ => false,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// Structural fields are private: the tree keeps `parent`, `children` and
/// `sibling_index` consistent, and only node data is handed out mutably.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub data: NodeData,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub(crate) parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub(crate) children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-index)
    /// "The index of an object is its number of preceding siblings, or 0 if it
    /// has none."
    pub(crate) sibling_index: usize,

    /// Element-only view of `children`, rebuilt on first access after a
    /// structural change.
    pub(crate) element_children: OnceCell<Vec<NodeId>>,
}

impl Node {
    pub(crate) const fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            sibling_index: 0,
            element_children: OnceCell::new(),
        }
    }

    /// The parent of this node.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children of this node.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position among the parent's children.
    #[must_use]
    pub const fn sibling_index(&self) -> usize {
        self.sibling_index
    }

    /// Element data, if this is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }
}
