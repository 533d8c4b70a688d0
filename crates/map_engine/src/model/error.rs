//! Recoverable errors of tree editing

use thiserror::Error;

use super::node::{NodeId, NodeType};

/// Errors returned by [`NodeTree`](super::NodeTree) and document edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not name a live node
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Containment rule violated
    #[error("A {parent:?} node cannot contain a {child:?} node")]
    InvalidChild {
        /// Type of the intended parent
        parent: NodeType,
        /// Type of the rejected child
        child: NodeType,
    },

    /// The tree has no world yet
    #[error("Document has no world node")]
    MissingWorld,

    /// A second world was requested
    #[error("Document already has a world node")]
    WorldExists,

    /// Only the world can be the root
    #[error("The world node cannot be removed")]
    CannotRemoveWorld,

    /// Face index past the end of the brush
    #[error("Brush {brush:?} has no face {index}")]
    FaceOutOfRange {
        /// The brush node
        brush: NodeId,
        /// Requested index
        index: usize,
    },

    /// An operation required a node of another kind
    #[error("Node {id:?} is a {actual:?}, expected a {expected:?}")]
    WrongNodeType {
        /// The node
        id: NodeId,
        /// Required kind
        expected: NodeType,
        /// Actual kind
        actual: NodeType,
    },
}
