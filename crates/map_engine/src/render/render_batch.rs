//! Render batches: the set of nodes drawn together with one style
//!
//! Membership is keyed by node id. A batch never walks the document on its
//! own accord; callers tell it what to add, remove or refresh, and it reads
//! the document only while rendering.

use std::collections::BTreeMap;

use super::render_queue::{BatchSource, DrawItem, RenderCommand, RenderContext};
use super::renderable_object::RenderableObject;
use super::style::BatchStyle;
use crate::model::{
    Brush, Entity, FaceRef, Group, Layer, Node, NodeId, NodeInfo, NodeKind, NodeTree, NodeVisitor, Visit, World,
};

/// Which brushes and faces a batch draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushFilter {
    /// Unselected brushes and their unselected faces
    Unselected,
    /// Selected brushes, brushes with selected faces, and the selected geometry
    Selected,
}

impl BrushFilter {
    /// Whether a brush node is drawn at all
    pub fn accepts_brush(self, node: &Node, brush: &Brush, layer: Option<&Layer>) -> bool {
        let (hidden, locked) = layer.map_or((false, false), |layer| (layer.hidden, layer.locked));
        if locked || hidden {
            return false;
        }
        match self {
            Self::Unselected => !node.selected(),
            Self::Selected => node.selected() || brush.has_selected_faces(),
        }
    }

    /// Indices of the faces drawn for an accepted brush
    pub fn faces(self, node: &Node, brush: &Brush) -> Vec<usize> {
        match self {
            Self::Unselected => brush.face_indices(|face| !face.selected()),
            Self::Selected => {
                let brush_selected = node.selected();
                brush.face_indices(|face| brush_selected || face.selected())
            }
        }
    }
}

/// Nodes drawn together with one filter and style
#[derive(Debug, Clone)]
pub struct RenderBatch {
    filter: BrushFilter,
    style: BatchStyle,
    objects: BTreeMap<NodeId, RenderableObject>,
}

impl RenderBatch {
    /// Create a new empty batch
    pub fn new(filter: BrushFilter) -> Self {
        Self {
            filter,
            style: BatchStyle::default(),
            objects: BTreeMap::new(),
        }
    }

    /// Brush filter of this batch
    pub const fn filter(&self) -> BrushFilter {
        self.filter
    }

    /// Current style
    pub const fn style(&self) -> &BatchStyle {
        &self.style
    }

    /// Replace the style
    pub fn set_style(&mut self, style: BatchStyle) {
        self.style = style;
    }

    /// Mutable style, for transient overrides
    pub fn style_mut(&mut self) -> &mut BatchStyle {
        &mut self.style
    }

    /// Add one node without its descendants
    ///
    /// Worlds and layers are never batched. Returns `false` if the node was
    /// not added, including when it is already present.
    pub fn add_object(&mut self, node: NodeInfo) -> bool {
        if !node.node_type.is_object() || self.objects.contains_key(&node.id) {
            return false;
        }
        self.objects.insert(node.id, RenderableObject::new(node.id, node.node_type));
        true
    }

    /// Add the subtrees rooted at `ids`
    pub fn add_objects(&mut self, tree: &NodeTree, ids: &[NodeId]) {
        tree.accept_and_recurse_all(ids, &mut AddObjects { batch: self });
    }

    /// Remove one node, returning whether it was present
    pub fn remove_object(&mut self, id: NodeId) -> bool {
        self.objects.remove(&id).is_some()
    }

    /// Remove the subtrees rooted at `ids`
    pub fn remove_objects(&mut self, tree: &NodeTree, ids: &[NodeId]) {
        for id in ids.iter().flat_map(|&id| tree.subtree(id)) {
            self.remove_object(id);
        }
    }

    /// Invalidate the cached geometry of a node, returning whether it is present
    pub fn update_object(&mut self, id: NodeId) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Invalidate the brushes owning the given faces
    pub fn update_brush_faces(&mut self, faces: &[FaceRef]) {
        let mut brushes: Vec<NodeId> = faces.iter().map(|face| face.brush).collect();
        brushes.sort_unstable();
        brushes.dedup();
        for brush in brushes {
            self.update_object(brush);
        }
    }

    /// Whether a node is a member
    pub fn contains(&self, id: NodeId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Get the number of objects in this batch
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Member ids in ascending order
    pub fn object_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.objects.keys().copied()
    }

    /// Cached state of a member
    pub fn object(&self, id: NodeId) -> Option<&RenderableObject> {
        self.objects.get(&id)
    }

    /// Drop all members
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Build the draw command for this frame and clear dirty flags
    ///
    /// # Panics
    ///
    /// If a member is no longer in `tree`.
    pub fn render(&mut self, tree: &NodeTree, context: &RenderContext, source: BatchSource) -> RenderCommand {
        let filter = self.filter;
        let mut items = Vec::new();
        for (&id, object) in &mut self.objects {
            let node = &tree[id];
            let layer = tree.layer_of(id).and_then(|layer| tree[layer].as_layer());
            let hidden = layer.is_some_and(|layer| layer.hidden);
            let faces = match node.kind() {
                NodeKind::Group(_) if context.show_groups && !hidden => Some(Vec::new()),
                NodeKind::Entity(_) if context.show_entities && !hidden => Some(Vec::new()),
                NodeKind::Brush(brush) if context.show_brushes && filter.accepts_brush(node, brush, layer) => {
                    Some(filter.faces(node, brush))
                }
                _ => None,
            };
            if let Some(faces) = faces {
                items.push(DrawItem {
                    node: id,
                    node_type: object.node_type,
                    faces,
                    revision: object.revision,
                });
            }
            object.clear_dirty();
        }

        RenderCommand::DrawBatch {
            source,
            style: self.style.clone(),
            items,
        }
    }
}

struct AddObjects<'b> {
    batch: &'b mut RenderBatch,
}

impl<'a> NodeVisitor<'a> for AddObjects<'_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.batch.add_object(node);
        Visit::Continue
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.batch.add_object(node);
        Visit::Continue
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.batch.add_object(node);
        Visit::Continue
    }
}
