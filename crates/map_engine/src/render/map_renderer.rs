//! Map Renderer - Bridge between the map document and render batches
//!
//! The map renderer keeps every renderable node of a document in exactly one
//! place:
//! 1. the batch of the layer owning it, while it is unselected
//! 2. the selection batch, while it is selected or has a selected descendant
//!
//! Brushes are the exception: a brush with selected faces but no selection of
//! its own sits in both batches. Its layer draws the unselected faces and the
//! selection batch draws the selected ones.
//!
//! The partition is built when a document is loaded and patched on every
//! later notification. Any disagreement between document and partition is a
//! programming error and panics.

use std::collections::BTreeMap;

use super::render_batch::{BrushFilter, RenderBatch};
use super::render_queue::{BatchSource, GlState, RenderCommand, RenderContext, RenderQueue};
use super::style::BatchStyle;
use crate::config::Preferences;
use crate::events::{DocumentEvent, DocumentObserver};
use crate::foundation::collections::{insert_or_fail, OrderedSet};
use crate::foundation::math::Color;
use crate::model::{
    Brush, DocumentId, Entity, FaceRef, Group, Layer, MapDocument, NodeId, NodeInfo, NodeTree, NodeVisitor,
    SelectionChange, Visit, World,
};

type LayerBatches = BTreeMap<NodeId, RenderBatch>;

/// Incrementally maintained render partition of one document
#[derive(Debug)]
pub struct MapRenderer {
    document: DocumentId,
    preferences: Preferences,
    layer_batches: LayerBatches,
    selection_batch: RenderBatch,
}

impl MapRenderer {
    /// Create a renderer bound to `doc`
    ///
    /// Layer batches are created by [`document_loaded`](Self::document_loaded).
    pub fn new(doc: &MapDocument, preferences: &Preferences) -> Self {
        let mut selection_batch = RenderBatch::new(BrushFilter::Selected);
        selection_batch.set_style(BatchStyle::selection(preferences));
        Self {
            document: doc.id(),
            preferences: preferences.clone(),
            layer_batches: LayerBatches::new(),
            selection_batch,
        }
    }

    /// The document this renderer is bound to
    pub const fn document_id(&self) -> DocumentId {
        self.document
    }

    /// Batch of a layer
    pub fn layer_batch(&self, layer: NodeId) -> Option<&RenderBatch> {
        self.layer_batches.get(&layer)
    }

    /// All layer batches, in layer id order
    pub fn layer_batches(&self) -> impl Iterator<Item = (NodeId, &RenderBatch)> {
        self.layer_batches.iter().map(|(&layer, batch)| (layer, batch))
    }

    /// The selection batch
    pub const fn selection_batch(&self) -> &RenderBatch {
        &self.selection_batch
    }

    /// Drop every layer batch; the selection batch is kept
    pub fn document_cleared(&mut self, doc: &MapDocument) {
        self.check_document(doc);
        log::info!("Dropping {} layer batches", self.layer_batches.len());
        self.layer_batches.clear();
    }

    /// Create one batch per layer and fill it with the layer's objects
    ///
    /// # Panics
    ///
    /// If a batch already exists for one of the layers.
    pub fn document_loaded(&mut self, doc: &MapDocument) {
        self.check_document(doc);
        let tree = doc.tree();
        if let Some(world) = tree.world() {
            let mut visitor = AddLayer {
                tree,
                layer_batches: &mut self.layer_batches,
            };
            tree.accept_and_recurse(world, &mut visitor);
        }
        self.setup_layer_batches();
        log::info!(
            "Loaded {} layer batches with {} objects",
            self.layer_batches.len(),
            self.layer_batches.values().map(RenderBatch::object_count).sum::<usize>()
        );
    }

    /// Add new subtrees to their layer batches
    ///
    /// A new layer gets an empty batch before its children are added.
    ///
    /// # Panics
    ///
    /// If an added object's layer has no batch.
    pub fn nodes_added(&mut self, doc: &MapDocument, ids: &[NodeId]) {
        self.check_document(doc);
        let tree = doc.tree();
        let mut visitor = AddNode {
            tree,
            layer_style: BatchStyle::layer(&self.preferences),
            layer_batches: &mut self.layer_batches,
        };
        tree.accept_and_recurse_all(ids, &mut visitor);
    }

    /// Remove subtrees that are about to leave the document
    ///
    /// Removing a layer drops its whole batch.
    ///
    /// # Panics
    ///
    /// If a removed object's layer has no batch.
    pub fn nodes_will_be_removed(&mut self, doc: &MapDocument, ids: &[NodeId]) {
        self.check_document(doc);
        let tree = doc.tree();
        let mut visitor = RemoveNode {
            tree,
            layer_batches: &mut self.layer_batches,
        };
        tree.accept_and_recurse_all(ids, &mut visitor);
    }

    /// Refresh changed nodes in the selection batch
    ///
    /// # Panics
    ///
    /// If a changed object is neither selected nor has a selected descendant.
    pub fn nodes_changed(&mut self, doc: &MapDocument, ids: &[NodeId]) {
        self.check_document(doc);
        let mut visitor = UpdateNode {
            selection_batch: &mut self.selection_batch,
        };
        doc.tree().accept_all(ids, &mut visitor);
    }

    /// Refresh the brushes owning changed faces in the selection batch
    pub fn brush_faces_changed(&mut self, doc: &MapDocument, faces: &[FaceRef]) {
        self.check_document(doc);
        self.selection_batch.update_brush_faces(faces);
    }

    /// Move nodes between layer batches and the selection batch
    pub fn selection_changed(&mut self, doc: &MapDocument, change: &SelectionChange) {
        self.check_document(doc);
        if change.is_empty() {
            return;
        }
        let tree = doc.tree();

        let mut handle = HandleSelectedNode {
            tree,
            layer_batches: &mut self.layer_batches,
            selection_batch: &mut self.selection_batch,
        };
        tree.accept_all(change.partially_selected_nodes(), &mut handle);
        tree.accept_all(change.partially_deselected_nodes(), &mut handle);
        tree.accept_all(change.selected_nodes(), &mut handle);
        tree.accept_all(change.deselected_nodes(), &mut handle);

        let mut update = UpdateSelectedNode {
            tree,
            layer_batches: &mut self.layer_batches,
            selection_batch: &mut self.selection_batch,
        };
        tree.accept_all(&parent_brushes(change.selected_faces()), &mut update);
        tree.accept_all(&parent_brushes(change.deselected_faces()), &mut update);

        log::debug!(
            "Selection changed: {} layer objects, {} selected objects",
            self.layer_batches.values().map(RenderBatch::object_count).sum::<usize>(),
            self.selection_batch.object_count()
        );
    }

    /// Re-apply batch styles from new preferences; membership is unchanged
    pub fn preference_changed(&mut self, preferences: &Preferences) {
        self.preferences = preferences.clone();
        self.setup_batches();
    }

    /// Temporarily tint the selection toward `color`
    pub fn override_selection_colors(&mut self, color: Color, mix: f32) {
        self.selection_batch
            .style_mut()
            .override_selection_colors(&self.preferences, color, mix);
    }

    /// Undo [`override_selection_colors`](Self::override_selection_colors)
    pub fn restore_selection_colors(&mut self) {
        self.selection_batch.set_style(BatchStyle::selection(&self.preferences));
    }

    /// Record one frame: fixed state, every layer batch, then the selection
    ///
    /// Pending document assets are committed first.
    pub fn render(&mut self, doc: &mut MapDocument, context: &RenderContext, queue: &mut RenderQueue) {
        self.check_document(doc);
        doc.commit_pending_assets();

        queue.push(RenderCommand::SetupGl(GlState::map_defaults()));
        let tree = doc.tree();
        for (&layer, batch) in &mut self.layer_batches {
            queue.push(batch.render(tree, context, BatchSource::Layer(layer)));
        }
        queue.push(self.selection_batch.render(tree, context, BatchSource::Selection));
    }

    fn setup_batches(&mut self) {
        self.setup_layer_batches();
        self.selection_batch.set_style(BatchStyle::selection(&self.preferences));
    }

    fn setup_layer_batches(&mut self) {
        let style = BatchStyle::layer(&self.preferences);
        for batch in self.layer_batches.values_mut() {
            batch.set_style(style.clone());
        }
    }

    fn check_document(&self, doc: &MapDocument) {
        assert_eq!(
            doc.id(),
            self.document,
            "renderer bound to {:?} was handed document {:?}",
            self.document,
            doc.id()
        );
    }
}

impl DocumentObserver for MapRenderer {
    fn on_event(&mut self, doc: &MapDocument, event: &DocumentEvent) {
        match event {
            DocumentEvent::Cleared => self.document_cleared(doc),
            DocumentEvent::NewedOrLoaded => self.document_loaded(doc),
            DocumentEvent::NodesAdded(ids) => self.nodes_added(doc, ids),
            DocumentEvent::NodesWillBeRemoved(ids) => self.nodes_will_be_removed(doc, ids),
            DocumentEvent::NodesChanged(ids) => self.nodes_changed(doc, ids),
            DocumentEvent::BrushFacesChanged(faces) => self.brush_faces_changed(doc, faces),
            DocumentEvent::SelectionChanged(change) => self.selection_changed(doc, change),
            DocumentEvent::PreferenceChanged(key) => {
                log::debug!("Preference {} changed, restyling batches", key);
                self.setup_batches();
            }
        }
    }
}

fn parent_brushes(faces: &[FaceRef]) -> Vec<NodeId> {
    faces
        .iter()
        .map(|face| face.brush)
        .collect::<OrderedSet<_>>()
        .into_vec()
}

fn layer_batch_of<'b>(tree: &NodeTree, layer_batches: &'b mut LayerBatches, node: NodeId) -> &'b mut RenderBatch {
    let layer = tree
        .layer_of(node)
        .unwrap_or_else(|| panic!("node {node:?} is not inside a layer"));
    layer_batches
        .get_mut(&layer)
        .unwrap_or_else(|| panic!("no render batch for layer {layer:?} of node {node:?}"))
}

struct AddLayer<'t, 'b> {
    tree: &'t NodeTree,
    layer_batches: &'b mut LayerBatches,
}

impl<'a> NodeVisitor<'a> for AddLayer<'_, '_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, node: NodeInfo, _layer: &'a Layer) -> Visit {
        let batch = insert_or_fail(self.layer_batches, node.id, RenderBatch::new(BrushFilter::Unselected));
        batch.add_objects(self.tree, self.tree.children(node.id));
        Visit::SkipChildren
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        unreachable!("group {:?} outside of a layer", node.id)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        unreachable!("entity {:?} outside of a layer", node.id)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        unreachable!("brush {:?} outside of a layer", node.id)
    }
}

struct AddNode<'t, 'b> {
    tree: &'t NodeTree,
    layer_style: BatchStyle,
    layer_batches: &'b mut LayerBatches,
}

impl AddNode<'_, '_> {
    fn handle_node(&mut self, node: NodeInfo) -> Visit {
        layer_batch_of(self.tree, self.layer_batches, node.id).add_object(node);
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for AddNode<'_, '_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, node: NodeInfo, _layer: &'a Layer) -> Visit {
        let layer_style = &self.layer_style;
        self.layer_batches.entry(node.id).or_insert_with(|| {
            let mut batch = RenderBatch::new(BrushFilter::Unselected);
            batch.set_style(layer_style.clone());
            batch
        });
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.handle_node(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.handle_node(node)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.handle_node(node)
    }
}

struct RemoveNode<'t, 'b> {
    tree: &'t NodeTree,
    layer_batches: &'b mut LayerBatches,
}

impl RemoveNode<'_, '_> {
    fn handle_node(&mut self, node: NodeInfo) -> Visit {
        layer_batch_of(self.tree, self.layer_batches, node.id).remove_object(node.id);
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for RemoveNode<'_, '_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, node: NodeInfo, _layer: &'a Layer) -> Visit {
        self.layer_batches.remove(&node.id);
        Visit::SkipChildren
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.handle_node(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.handle_node(node)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.handle_node(node)
    }
}

struct UpdateNode<'b> {
    selection_batch: &'b mut RenderBatch,
}

impl UpdateNode<'_> {
    fn handle_node(&mut self, node: NodeInfo) -> Visit {
        assert!(
            node.selected || node.descendant_selected,
            "changed node {:?} is not part of the selection",
            node.id
        );
        self.selection_batch.update_object(node.id);
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for UpdateNode<'_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.handle_node(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.handle_node(node)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.handle_node(node)
    }
}

struct HandleSelectedNode<'t, 'b> {
    tree: &'t NodeTree,
    layer_batches: &'b mut LayerBatches,
    selection_batch: &'b mut RenderBatch,
}

impl HandleSelectedNode<'_, '_> {
    fn handle_object(&mut self, node: NodeInfo) -> Visit {
        let layer_batch = layer_batch_of(self.tree, self.layer_batches, node.id);
        if node.selected || node.descendant_selected {
            layer_batch.remove_object(node.id);
            self.selection_batch.add_object(node);
        } else {
            self.selection_batch.remove_object(node.id);
            layer_batch.add_object(node);
        }
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for HandleSelectedNode<'_, '_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.handle_object(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.handle_object(node)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        let layer_batch = layer_batch_of(self.tree, self.layer_batches, node.id);
        if node.selected {
            layer_batch.remove_object(node.id);
        } else {
            layer_batch.add_object(node);
        }
        if node.selected || node.descendant_selected {
            self.selection_batch.add_object(node);
        } else {
            self.selection_batch.remove_object(node.id);
        }
        Visit::Continue
    }
}

struct UpdateSelectedNode<'t, 'b> {
    tree: &'t NodeTree,
    layer_batches: &'b mut LayerBatches,
    selection_batch: &'b mut RenderBatch,
}

impl UpdateSelectedNode<'_, '_> {
    fn handle_node(&mut self, node: NodeInfo) -> Visit {
        let layer_batch = layer_batch_of(self.tree, self.layer_batches, node.id);
        if node.selected || node.descendant_selected {
            self.selection_batch.update_object(node.id);
        }
        if !node.selected {
            layer_batch.update_object(node.id);
        }
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for UpdateSelectedNode<'_, '_> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.handle_node(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.handle_node(node)
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.handle_node(node)
    }
}
