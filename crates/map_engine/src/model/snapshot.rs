//! Payload snapshots for undoing in-place edits

use super::brush::Brush;
use super::node::{Entity, Group, Layer, NodeId, NodeInfo, NodeKind, World};
use super::tree::NodeTree;
use super::visitor::{NodeVisitor, Visit};

/// Saved payload of one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    /// Node the payload belongs to
    pub id: NodeId,
    /// Payload at the time of the snapshot
    pub kind: NodeKind,
}

/// Clones the payload of every visited node
#[derive(Debug, Clone, Default)]
pub struct TakeSnapshot {
    snapshots: Vec<NodeSnapshot>,
}

impl TakeSnapshot {
    /// Create an empty snapshot collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshots taken so far, in visit order
    pub fn snapshots(&self) -> &[NodeSnapshot] {
        &self.snapshots
    }

    /// Consume the collector
    pub fn into_snapshots(self) -> Vec<NodeSnapshot> {
        self.snapshots
    }

    fn take(&mut self, node: NodeInfo, kind: NodeKind) -> Visit {
        self.snapshots.push(NodeSnapshot { id: node.id, kind });
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for TakeSnapshot {
    fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit {
        self.take(node, NodeKind::World(world.clone()))
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit {
        self.take(node, NodeKind::Layer(layer.clone()))
    }

    fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit {
        self.take(node, NodeKind::Group(group.clone()))
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit {
        self.take(node, NodeKind::Entity(entity.clone()))
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
        self.take(node, NodeKind::Brush(brush.clone()))
    }
}

impl NodeTree {
    /// Snapshot the payloads of the subtrees rooted at `ids`
    pub fn take_snapshots(&self, ids: &[NodeId]) -> Vec<NodeSnapshot> {
        let mut visitor = TakeSnapshot::new();
        self.accept_and_recurse_all(ids, &mut visitor);
        visitor.into_snapshots()
    }

    /// Write saved payloads back, returning the number of nodes restored
    ///
    /// Snapshots of removed nodes, or of a different node kind, are skipped.
    /// Restored brushes keep the current face selection.
    pub fn restore(&mut self, snapshots: &[NodeSnapshot]) -> usize {
        let mut restored = 0;
        for snapshot in snapshots {
            let Some(node) = self.nodes.get_mut(snapshot.id) else {
                log::debug!("Skipping snapshot of removed node {:?}", snapshot.id);
                continue;
            };
            if node.node_type() != snapshot.kind.node_type() {
                log::warn!(
                    "Snapshot of {:?} holds a {:?} payload, node is a {:?}",
                    snapshot.id,
                    snapshot.kind.node_type(),
                    node.node_type()
                );
                continue;
            }

            let mut kind = snapshot.kind.clone();
            if let (NodeKind::Brush(saved), NodeKind::Brush(current)) = (&mut kind, &node.kind) {
                if !saved.copy_face_selection_from(current) {
                    if current.has_selected_faces() {
                        log::warn!("Cannot restore brush {:?} while its faces are selected", snapshot.id);
                        continue;
                    }
                    saved.clear_face_selection();
                }
            }
            node.kind = kind;
            restored += 1;
        }
        restored
    }
}
