//! Renderable object representation for render batches
//!
//! This is the cached per-node rendering state kept by a batch. The node
//! payload itself stays in the document; the batch only remembers which
//! nodes it draws and whether their cached geometry is stale.

use crate::model::{NodeId, NodeType};

/// Cached rendering state of one map node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableObject {
    /// The node this renderable represents
    pub node: NodeId,

    /// Kind of the node, fixed for its lifetime
    pub node_type: NodeType,

    /// Bumped every time the cached geometry is invalidated
    pub revision: u64,

    /// Dirty flag - true if the node changed since the last render
    pub dirty: bool,
}

impl RenderableObject {
    /// Create a new renderable object
    pub const fn new(node: NodeId, node_type: NodeType) -> Self {
        Self {
            node,
            node_type,
            revision: 0,
            dirty: true, // Start dirty to force initial upload
        }
    }

    /// Mark this object as dirty (needs geometry update)
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    /// Clear the dirty flag (after the batch was rendered)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
