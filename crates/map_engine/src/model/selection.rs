//! Selection deltas produced by selection edits

use super::brush::FaceRef;
use super::node::NodeId;
use crate::foundation::collections::OrderedSet;

/// What one selection edit changed
///
/// "Partially" selected nodes are ancestors whose `descendant_selected`
/// flag flipped on; partially deselected ones flipped off. Consumers process
/// the lists in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SelectionChange {
    partially_selected_nodes: OrderedSet<NodeId>,
    partially_deselected_nodes: OrderedSet<NodeId>,
    selected_nodes: OrderedSet<NodeId>,
    deselected_nodes: OrderedSet<NodeId>,
    selected_faces: OrderedSet<FaceRef>,
    deselected_faces: OrderedSet<FaceRef>,
}

impl SelectionChange {
    /// Create an empty change
    pub fn new() -> Self {
        Self::default()
    }

    /// Ancestors that gained their first selected descendant
    pub fn partially_selected_nodes(&self) -> &[NodeId] {
        self.partially_selected_nodes.as_slice()
    }

    /// Ancestors that lost their last selected descendant
    pub fn partially_deselected_nodes(&self) -> &[NodeId] {
        self.partially_deselected_nodes.as_slice()
    }

    /// Nodes that became selected
    pub fn selected_nodes(&self) -> &[NodeId] {
        self.selected_nodes.as_slice()
    }

    /// Nodes that became deselected
    pub fn deselected_nodes(&self) -> &[NodeId] {
        self.deselected_nodes.as_slice()
    }

    /// Faces that became selected
    pub fn selected_faces(&self) -> &[FaceRef] {
        self.selected_faces.as_slice()
    }

    /// Faces that became deselected
    pub fn deselected_faces(&self) -> &[FaceRef] {
        self.deselected_faces.as_slice()
    }

    /// True if nothing changed
    pub fn is_empty(&self) -> bool {
        self.partially_selected_nodes.is_empty()
            && self.partially_deselected_nodes.is_empty()
            && self.selected_nodes.is_empty()
            && self.deselected_nodes.is_empty()
            && self.selected_faces.is_empty()
            && self.deselected_faces.is_empty()
    }

    /// Append everything recorded in `other`
    pub fn extend(&mut self, other: &Self) {
        for &id in other.partially_selected_nodes() {
            self.partially_selected_nodes.insert(id);
        }
        for &id in other.partially_deselected_nodes() {
            self.partially_deselected_nodes.insert(id);
        }
        for &id in other.selected_nodes() {
            self.selected_nodes.insert(id);
        }
        for &id in other.deselected_nodes() {
            self.deselected_nodes.insert(id);
        }
        for &face in other.selected_faces() {
            self.selected_faces.insert(face);
        }
        for &face in other.deselected_faces() {
            self.deselected_faces.insert(face);
        }
    }

    pub(super) fn add_partially_selected(&mut self, id: NodeId) {
        self.partially_selected_nodes.insert(id);
    }

    pub(super) fn add_partially_deselected(&mut self, id: NodeId) {
        self.partially_deselected_nodes.insert(id);
    }

    pub(super) fn add_selected(&mut self, id: NodeId) {
        self.selected_nodes.insert(id);
    }

    pub(super) fn add_deselected(&mut self, id: NodeId) {
        self.deselected_nodes.insert(id);
    }

    pub(super) fn add_selected_face(&mut self, face: FaceRef) {
        self.selected_faces.insert(face);
    }

    pub(super) fn add_deselected_face(&mut self, face: FaceRef) {
        self.deselected_faces.insert(face);
    }
}
