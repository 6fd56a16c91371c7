use crate::NodeId;

/// Misuse of the tree mutation API.
///
/// These are contract violations by the caller, never a consequence of the
/// HTML being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// An insertion index beyond the end of the child list.
    #[error("insert index {index} out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children the parent has.
        len: usize,
    },
    /// The reference node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Node that was supposed to be its child.
        child: NodeId,
    },
    /// The operation needs the node to be attached.
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),
    /// Inserting the node would make it its own ancestor.
    #[error("node {0:?} cannot be inserted into itself or its descendants")]
    HierarchyRequest(NodeId),
    /// The same node was passed more than once in one insertion.
    #[error("node {0:?} appears more than once in the nodes to insert")]
    DuplicateNode(NodeId),
    /// The operation needs an element.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// A wrapping fragment produced no element to wrap with.
    #[error("wrap fragment contains no element")]
    EmptyWrapper,
}
