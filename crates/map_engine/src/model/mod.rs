//! Map model: nodes, the node tree, selection and traversal
//!
//! A map is a tree of [`Node`]s stored in a [`NodeTree`] arena and owned by a
//! [`MapDocument`]. Everything that walks the tree goes through the
//! [`visitor`] module.

mod brush;
mod document;
mod error;
pub mod find;
mod node;
mod selection;
mod snapshot;
mod tree;
pub mod visitor;

pub use brush::{Brush, BrushFace, FaceRef};
pub use document::{default_map, DocumentId, MapDocument, DEFAULT_LAYER_NAME};
pub use error::TreeError;
pub use find::{find_container, find_container_of, CollectNodes, FindContainer, FindMatchingBrushFace};
pub use node::{
    Attributes, Entity, Group, Layer, Node, NodeId, NodeInfo, NodeKind, NodeRef, NodeRefMut, NodeType, World,
};
pub use selection::SelectionChange;
pub use snapshot::{NodeSnapshot, TakeSnapshot};
pub use tree::{Ancestors, NodeTree};
pub use visitor::{NodeVisitor, NodeVisitorMut, Visit, Walk};
