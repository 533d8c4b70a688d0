//! Editor: owns the open document and keeps its views in sync
//!
//! Every edit goes through [`Editor`]. It mutates the document, then
//! announces the edit to the map renderer and to every registered observer
//! before returning.

use std::collections::HashSet;

use crate::config::Preferences;
use crate::events::{DocumentEvent, DocumentObserver};
use crate::model::{
    default_map, FaceRef, MapDocument, NodeId, NodeKind, NodeRefMut, NodeTree, NodeType, SelectionChange, TreeError,
    Visit,
};
use crate::model::visitor::FnVisitorMut;
use crate::render::{MapRenderer, RenderContext, RenderQueue};

/// Name given to maps created without one
pub const UNNAMED_MAP: &str = "unnamed";

/// Document, preferences and renderer of one editing session
pub struct Editor {
    document: MapDocument,
    preferences: Preferences,
    renderer: MapRenderer,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl Editor {
    /// Create an editor holding a new empty map
    pub fn new(preferences: Preferences) -> Self {
        let document = MapDocument::new_map(UNNAMED_MAP);
        let renderer = MapRenderer::new(&document, &preferences);
        let mut editor = Self {
            document,
            preferences,
            renderer,
            observers: Vec::new(),
        };
        editor.notify(&DocumentEvent::NewedOrLoaded);
        editor
    }

    /// The open document
    pub const fn document(&self) -> &MapDocument {
        &self.document
    }

    /// Convenience accessor for the document's tree
    pub const fn tree(&self) -> &NodeTree {
        self.document.tree()
    }

    /// The renderer kept in sync with the document
    pub const fn renderer(&self) -> &MapRenderer {
        &self.renderer
    }

    /// Current preferences
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Register an observer; observers are notified after the renderer
    pub fn add_observer(&mut self, observer: Box<dyn DocumentObserver>) {
        self.observers.push(observer);
    }

    /// Replace the document with a new map holding an empty default layer
    pub fn new_document(&mut self, name: &str) {
        self.load_document(default_map(name));
    }

    /// Drop every node, leaving a document without a world
    pub fn clear_document(&mut self) {
        self.deselect_all();
        self.document.replace_tree(NodeTree::new());
        self.notify(&DocumentEvent::Cleared);
    }

    /// Replace the document with `tree`
    ///
    /// Selection stored in `tree` is dropped and every texture it uses is
    /// requested.
    pub fn load_document(&mut self, mut tree: NodeTree) {
        self.clear_document();

        let dropped = tree.deselect_all();
        if !dropped.is_empty() {
            log::debug!("Dropped selection of the loaded tree");
        }
        let world = tree.world();
        self.document.replace_tree(tree);
        self.request_textures_below(world);

        log::info!("Loaded document with {} nodes", self.document.tree().len());
        self.notify(&DocumentEvent::NewedOrLoaded);
    }

    /// Attach a new node below `parent`
    pub fn add_node(&mut self, parent: NodeId, kind: impl Into<NodeKind>) -> Result<NodeId, TreeError> {
        let id = self.document.tree_mut().add_child(parent, kind)?;
        self.request_textures_below(Some(id));
        self.document.increment_modification_count();
        self.notify(&DocumentEvent::NodesAdded(vec![id]));
        Ok(id)
    }

    /// Remove subtrees, returning the number of nodes removed
    ///
    /// Anything selected inside them is deselected first. Observers hear
    /// about the removal while the nodes are still attached.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Result<usize, TreeError> {
        let tree = self.document.tree();
        if let Some(&id) = ids.iter().find(|&&id| !tree.contains(id)) {
            return Err(TreeError::UnknownNode(id));
        }
        if ids.iter().any(|&id| Some(id) == tree.world()) {
            return Err(TreeError::CannotRemoveWorld);
        }

        let requested: HashSet<NodeId> = ids.iter().copied().collect();
        let mut roots: Vec<NodeId> = Vec::new();
        for &id in ids {
            if !roots.contains(&id) && !tree.ancestors(id).any(|ancestor| requested.contains(&ancestor)) {
                roots.push(id);
            }
        }

        let mut selected_nodes = Vec::new();
        let mut selected_faces = Vec::new();
        for id in roots.iter().flat_map(|&root| tree.subtree(root)) {
            let node = &tree[id];
            if node.selected() {
                selected_nodes.push(id);
            }
            if let Some(brush) = node.as_brush() {
                selected_faces.extend(
                    brush
                        .face_indices(|face| face.selected())
                        .into_iter()
                        .map(|index| FaceRef::new(id, index)),
                );
            }
        }
        let mut change = self.document.tree_mut().deselect_faces(&selected_faces)?;
        change.extend(&self.document.tree_mut().deselect_nodes(&selected_nodes)?);
        self.notify_selection(change);

        self.notify(&DocumentEvent::NodesWillBeRemoved(roots.clone()));
        let mut removed = 0;
        for root in roots {
            removed += self.document.tree_mut().remove(root)?;
        }
        self.document.increment_modification_count();
        Ok(removed)
    }

    /// Select nodes
    pub fn select_nodes(&mut self, ids: &[NodeId]) -> Result<SelectionChange, TreeError> {
        let change = self.document.tree_mut().select_nodes(ids)?;
        Ok(self.notify_selection(change))
    }

    /// Deselect nodes
    pub fn deselect_nodes(&mut self, ids: &[NodeId]) -> Result<SelectionChange, TreeError> {
        let change = self.document.tree_mut().deselect_nodes(ids)?;
        Ok(self.notify_selection(change))
    }

    /// Select brush faces
    pub fn select_faces(&mut self, faces: &[FaceRef]) -> Result<SelectionChange, TreeError> {
        let change = self.document.tree_mut().select_faces(faces)?;
        Ok(self.notify_selection(change))
    }

    /// Deselect brush faces
    pub fn deselect_faces(&mut self, faces: &[FaceRef]) -> Result<SelectionChange, TreeError> {
        let change = self.document.tree_mut().deselect_faces(faces)?;
        Ok(self.notify_selection(change))
    }

    /// Deselect every node and face
    pub fn deselect_all(&mut self) -> SelectionChange {
        let change = self.document.tree_mut().deselect_all();
        self.notify_selection(change)
    }

    /// Set an attribute on every selected entity, returning how many changed
    pub fn set_entity_attribute(&mut self, key: &str, value: &str) -> Result<usize, TreeError> {
        let entities: Vec<NodeId> = self
            .selected_of_type(NodeType::Entity)
            .into_iter()
            .filter(|&id| {
                let NodeKind::Entity(entity) = self.document.tree()[id].kind() else {
                    return false;
                };
                entity.attributes.get(key) != Some(value)
            })
            .collect();
        for &id in &entities {
            self.document.tree_mut().entity_mut(id)?.attributes.set(key, value);
        }
        if !entities.is_empty() {
            self.document.increment_modification_count();
            self.notify(&DocumentEvent::NodesChanged(entities.clone()));
        }
        Ok(entities.len())
    }

    /// Replace a texture on every face of the selected brushes
    ///
    /// Returns the number of faces changed.
    pub fn replace_texture(&mut self, from: &str, to: &str) -> usize {
        let brushes = self.selected_of_type(NodeType::Brush);
        let mut changed = Vec::new();
        let mut replaced = 0;
        let mut visitor = FnVisitorMut::new(|node, payload| {
            if let NodeRefMut::Brush(brush) = payload {
                let count = brush.replace_texture(from, to);
                if count > 0 {
                    changed.push(node.id);
                    replaced += count;
                }
            }
        });
        self.document.tree_mut().accept_all_mut(&brushes, &mut visitor);

        if !changed.is_empty() {
            self.document.request_asset(to);
            self.document.increment_modification_count();
            self.notify(&DocumentEvent::NodesChanged(changed));
        }
        replaced
    }

    /// Change the texture of one face
    pub fn set_face_texture(&mut self, face: FaceRef, texture: &str) -> Result<(), TreeError> {
        self.document.tree_mut().set_face_texture(face, texture)?;
        self.document.request_asset(texture);
        self.document.increment_modification_count();
        self.notify(&DocumentEvent::BrushFacesChanged(vec![face]));
        Ok(())
    }

    /// Replace the preferences and restyle the renderer
    pub fn set_preferences(&mut self, preferences: Preferences) {
        if preferences == self.preferences {
            return;
        }
        self.preferences = preferences;
        self.renderer.preference_changed(&self.preferences);

        let event = DocumentEvent::PreferenceChanged("preferences".to_string());
        for observer in &mut self.observers {
            observer.on_event(&self.document, &event);
        }
    }

    /// Record one frame into `queue`
    pub fn render(&mut self, context: &RenderContext, queue: &mut RenderQueue) {
        self.renderer.render(&mut self.document, context, queue);
    }

    fn selected_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        let tree = self.document.tree();
        tree.selected_nodes()
            .into_iter()
            .filter(|&id| tree[id].node_type() == node_type)
            .collect()
    }

    fn request_textures_below(&mut self, root: Option<NodeId>) {
        let Some(root) = root else {
            return;
        };
        let mut textures = Vec::new();
        self.document.tree().walk(root, |node| {
            if let Some(brush) = node.as_brush() {
                textures.extend(brush.faces().iter().map(|face| face.texture.clone()));
            }
            Visit::Continue
        });
        for texture in textures {
            self.document.request_asset(&texture);
        }
    }

    fn notify_selection(&mut self, change: SelectionChange) -> SelectionChange {
        if !change.is_empty() {
            self.notify(&DocumentEvent::SelectionChanged(change.clone()));
        }
        change
    }

    fn notify(&mut self, event: &DocumentEvent) {
        log::trace!("Notifying {:?}", event.event_type());
        self.renderer.on_event(&self.document, event);
        for observer in &mut self.observers {
            observer.on_event(&self.document, event);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::events::{DocumentEventType, EventRecorder};
    use crate::foundation::math::Vec3;
    use crate::io::{NodeReader, NodeWriter};
    use crate::model::{Brush, Entity, Group, Layer};

    /// Observer whose recorded events stay reachable from the test
    struct Shared(Rc<RefCell<EventRecorder>>);

    impl DocumentObserver for Shared {
        fn on_event(&mut self, doc: &MapDocument, event: &DocumentEvent) {
            self.0.borrow_mut().on_event(doc, event);
        }
    }

    fn cube(texture: &str) -> Brush {
        Brush::cuboid(Vec3::zeros(), Vec3::new(32.0, 32.0, 32.0), texture)
    }

    fn editor_with_recorder() -> (Editor, Rc<RefCell<EventRecorder>>) {
        let mut editor = Editor::default();
        let recorder = Rc::new(RefCell::new(EventRecorder::new()));
        editor.add_observer(Box::new(Shared(Rc::clone(&recorder))));
        (editor, recorder)
    }

    #[test]
    fn test_edits_reach_renderer_and_observers() {
        let (mut editor, recorder) = editor_with_recorder();
        let layer = editor.tree().default_layer().unwrap();

        let brush = editor.add_node(layer, cube("base/wall")).unwrap();
        assert!(editor.renderer().layer_batch(layer).unwrap().contains(brush));
        assert!(editor.document().pending_assets().any(|name| name == "base/wall"));

        editor.select_nodes(&[brush]).unwrap();
        assert!(editor.renderer().selection_batch().contains(brush));
        assert!(!editor.renderer().layer_batch(layer).unwrap().contains(brush));

        let unchanged = editor.select_nodes(&[brush]).unwrap();
        assert!(unchanged.is_empty());

        assert_eq!(
            recorder.borrow().event_types(),
            vec![DocumentEventType::NodesAdded, DocumentEventType::SelectionChanged]
        );
    }

    #[test]
    fn test_remove_deselects_and_notifies_first() {
        let (mut editor, recorder) = editor_with_recorder();
        let layer = editor.tree().default_layer().unwrap();
        let group = editor.add_node(layer, Group::new("room")).unwrap();
        let brush = editor.add_node(group, cube("base/wall")).unwrap();
        editor.select_faces(&[FaceRef::new(brush, 0)]).unwrap();
        recorder.borrow_mut().clear();

        let removed = editor.remove_nodes(&[group, brush]).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(
            recorder.borrow().event_types(),
            vec![DocumentEventType::SelectionChanged, DocumentEventType::NodesWillBeRemoved]
        );
        assert_eq!(editor.renderer().layer_batch(layer).unwrap().object_count(), 0);
        assert_eq!(editor.renderer().selection_batch().object_count(), 0);
        assert!(!editor.tree()[layer].descendant_selected());

        let world = editor.tree().world().unwrap();
        assert_eq!(editor.remove_nodes(&[world]), Err(TreeError::CannotRemoveWorld));
    }

    #[test]
    fn test_attribute_and_texture_edits_touch_selection_only() {
        let (mut editor, recorder) = editor_with_recorder();
        let layer = editor.tree().default_layer().unwrap();
        let light = editor.add_node(layer, Entity::new("light")).unwrap();
        let other = editor.add_node(layer, Entity::new("light")).unwrap();
        let brush = editor.add_node(layer, cube("base/wall")).unwrap();
        editor.select_nodes(&[light, brush]).unwrap();
        recorder.borrow_mut().clear();

        assert_eq!(editor.set_entity_attribute("light", "300").unwrap(), 1);
        assert_eq!(editor.set_entity_attribute("light", "300").unwrap(), 0);
        let NodeKind::Entity(entity) = editor.tree()[other].kind() else {
            panic!("expected an entity");
        };
        assert_eq!(entity.attributes.get("light"), None);

        assert_eq!(editor.replace_texture("base/wall", "base/metal"), 6);
        assert_eq!(editor.replace_texture("base/wall", "base/metal"), 0);
        assert_eq!(editor.renderer().selection_batch().object(brush).unwrap().revision, 1);
        assert_eq!(
            recorder.borrow().event_types(),
            vec![DocumentEventType::NodesChanged, DocumentEventType::NodesChanged]
        );
    }

    #[test]
    fn test_load_replaces_partition() {
        let (mut editor, recorder) = editor_with_recorder();
        let old_layer = editor.tree().default_layer().unwrap();
        let brush = editor.add_node(old_layer, cube("base/wall")).unwrap();
        editor.select_nodes(&[brush]).unwrap();
        recorder.borrow_mut().clear();

        let mut tree = default_map("loaded");
        let layer = tree.default_layer().unwrap();
        let loaded = tree.add_child(layer, cube("base/sky")).unwrap();
        tree.select_nodes(&[loaded]).unwrap();
        editor.load_document(tree);

        assert_eq!(
            recorder.borrow().event_types(),
            vec![
                DocumentEventType::SelectionChanged,
                DocumentEventType::Cleared,
                DocumentEventType::NewedOrLoaded
            ]
        );
        assert_eq!(editor.renderer().layer_batches().count(), 1);
        assert!(editor.renderer().layer_batch(layer).unwrap().contains(loaded));
        assert_eq!(editor.renderer().selection_batch().object_count(), 0);
        assert!(editor.document().pending_assets().any(|name| name == "base/sky"));
        assert_eq!(editor.document().modification_count(), 0);

        let mut queue = RenderQueue::new();
        editor.render(&RenderContext::default(), &mut queue);
        assert_eq!(queue.total_item_count(), 1);
    }

    #[test]
    fn test_load_read_map_matches_partition() {
        let mut source = Editor::default();
        let world = source.tree().world().unwrap();
        let default_layer = source.tree().default_layer().unwrap();
        source.add_node(default_layer, cube("base/floor")).unwrap();
        let detail = source.add_node(world, Layer::new("Detail")).unwrap();
        let group = source.add_node(detail, Group::new("pillars")).unwrap();
        source.add_node(group, cube("base/pillar")).unwrap();
        let door = source.add_node(detail, Entity::new("func_door")).unwrap();
        source.add_node(door, cube("base/door")).unwrap();

        let mut writer = NodeWriter::new(source.tree(), String::new());
        writer.write_map().unwrap();
        let text = writer.into_inner();
        let tree = NodeReader::new(&text).read_map("copy").unwrap();

        let (mut editor, recorder) = editor_with_recorder();
        editor.load_document(tree);
        assert_eq!(recorder.borrow().event_types().last(), Some(&DocumentEventType::NewedOrLoaded));

        let counts = |editor: &Editor| -> Vec<usize> {
            editor
                .renderer()
                .layer_batches()
                .map(|(_, batch)| batch.object_count())
                .collect()
        };
        assert_eq!(counts(&editor), counts(&source));
        assert_eq!(counts(&editor), vec![1, 4]);
        assert!(editor.document().pending_assets().any(|name| name == "base/door"));
    }

    #[test]
    fn test_clear_and_new_document() {
        let (mut editor, recorder) = editor_with_recorder();
        editor.clear_document();
        assert!(editor.tree().world().is_none());
        assert_eq!(editor.renderer().layer_batches().count(), 0);

        editor.new_document("fresh");
        assert_eq!(editor.renderer().layer_batches().count(), 1);
        assert_eq!(
            recorder.borrow().event_types(),
            vec![
                DocumentEventType::Cleared,
                DocumentEventType::Cleared,
                DocumentEventType::NewedOrLoaded
            ]
        );
    }

    #[test]
    fn test_face_texture_and_preferences() {
        let (mut editor, recorder) = editor_with_recorder();
        let layer = editor.tree().default_layer().unwrap();
        let brush = editor.add_node(layer, cube("base/wall")).unwrap();
        recorder.borrow_mut().clear();

        editor.set_face_texture(FaceRef::new(brush, 2), "base/trim").unwrap();
        assert!(editor.set_face_texture(FaceRef::new(brush, 8), "base/trim").is_err());

        let mut prefs = Preferences::default();
        prefs.transparent_face_alpha = 0.1;
        editor.set_preferences(prefs.clone());
        editor.set_preferences(prefs);
        assert_eq!(editor.preferences().transparent_face_alpha, 0.1);
        assert_eq!(
            editor.renderer().layer_batch(layer).unwrap().style().transparency_alpha,
            0.1
        );
        assert_eq!(
            recorder.borrow().event_types(),
            vec![DocumentEventType::BrushFacesChanged, DocumentEventType::PreferenceChanged]
        );
    }
}
