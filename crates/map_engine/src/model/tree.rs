//! Arena-backed map tree
//!
//! [`NodeTree`] owns every node of a map in a `slotmap` arena and keeps the
//! structural invariants: a single world root, containment rules between node
//! kinds, and the per-node count of selected descendants that backs
//! [`Node::descendant_selected`].

use std::ops::Index;

use super::brush::FaceRef;
use super::error::TreeError;
use super::node::{Entity, Layer, Node, NodeId, NodeKind, NodeType, World};
use super::selection::SelectionChange;
use super::visitor::Visit;
use crate::foundation::collections::SlotMap;

/// The scene graph of one map
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    pub(super) nodes: SlotMap<NodeId, Node>,
    world: Option<NodeId>,
}

impl NodeTree {
    /// Create an empty tree without a world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree whose root is `world`
    pub fn with_world(world: World) -> Self {
        let mut tree = Self::new();
        let id = tree.nodes.insert_with_key(|id| Node::new(id, None, NodeKind::World(world)));
        tree.world = Some(id);
        tree
    }

    /// Install the world root
    pub fn create_world(&mut self, world: World) -> Result<NodeId, TreeError> {
        if self.world.is_some() {
            return Err(TreeError::WorldExists);
        }
        let id = self.nodes.insert_with_key(|id| Node::new(id, None, NodeKind::World(world)));
        self.world = Some(id);
        Ok(id)
    }

    /// The world root, if created
    pub const fn world(&self) -> Option<NodeId> {
        self.world
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether `id` names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    /// Children of a node in stored order; empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], Node::children)
    }

    /// Strict ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// All layers in stored order
    pub fn layers(&self) -> Vec<NodeId> {
        self.world.map_or_else(Vec::new, |world| self.children(world).to_vec())
    }

    /// The first layer, which holds everything not assigned elsewhere
    pub fn default_layer(&self) -> Option<NodeId> {
        self.layers().first().copied()
    }

    /// The layer owning a node (a layer owns itself)
    pub fn layer_of(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.nodes.get(candidate).map(Node::node_type) == Some(NodeType::Layer))
    }

    /// Ids of a subtree in depth-first pre-order, `id` first
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        if self.contains(id) {
            self.walk(id, |node| {
                ids.push(node.id());
                Visit::Continue
            });
        }
        ids
    }

    /// Attach a new, unselected node below `parent`
    pub fn add_child(&mut self, parent: NodeId, kind: impl Into<NodeKind>) -> Result<NodeId, TreeError> {
        let mut kind = kind.into();
        let parent_type = self
            .nodes
            .get(parent)
            .ok_or(TreeError::UnknownNode(parent))?
            .node_type();
        let child_type = kind.node_type();
        if !parent_type.can_contain(child_type) {
            return Err(TreeError::InvalidChild { parent: parent_type, child: child_type });
        }
        if let NodeKind::Brush(brush) = &mut kind {
            brush.clear_face_selection();
        }

        let id = self.nodes.insert_with_key(|id| Node::new(id, Some(parent), kind));
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Detach and drop a subtree, returning the number of nodes removed
    ///
    /// Selection held inside the subtree is subtracted from the surviving
    /// ancestors; callers normally deselect first.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, TreeError> {
        let node = self.nodes.get(id).ok_or(TreeError::UnknownNode(id))?;
        if Some(id) == self.world {
            return Err(TreeError::CannotRemoveWorld);
        }

        let contribution = usize::from(node.selected) + node.descendant_selection_count;
        let parent = node.parent;
        if contribution > 0 {
            log::warn!("Removing {:?} with {} selected elements still in its subtree", id, contribution);
            self.decrement_ancestors(parent, contribution, &mut SelectionChange::new());
        }
        if let Some(parent) = parent {
            self.nodes[parent].children.retain(|&child| child != id);
        }

        let doomed = self.subtree(id);
        for doomed_id in &doomed {
            self.nodes.remove(*doomed_id);
        }
        Ok(doomed.len())
    }

    /// Mutable access to a layer payload
    pub fn layer_mut(&mut self, id: NodeId) -> Result<&mut Layer, TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        let actual = node.node_type();
        match &mut node.kind {
            NodeKind::Layer(layer) => Ok(layer),
            _ => Err(TreeError::WrongNodeType { id, expected: NodeType::Layer, actual }),
        }
    }

    /// Mutable access to an entity payload
    pub fn entity_mut(&mut self, id: NodeId) -> Result<&mut Entity, TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        let actual = node.node_type();
        match &mut node.kind {
            NodeKind::Entity(entity) => Ok(entity),
            _ => Err(TreeError::WrongNodeType { id, expected: NodeType::Entity, actual }),
        }
    }

    /// Change the texture of one brush face
    pub fn set_face_texture(&mut self, face: FaceRef, texture: &str) -> Result<(), TreeError> {
        self.validate_face(face)?;
        if let NodeKind::Brush(brush) = &mut self.nodes[face.brush].kind {
            brush.set_face_texture(face.index, texture);
        }
        Ok(())
    }

    /// Select groups, entities and brushes
    ///
    /// Worlds and layers are not selectable and are skipped; already selected
    /// nodes are ignored.
    pub fn select_nodes(&mut self, ids: &[NodeId]) -> Result<SelectionChange, TreeError> {
        self.validate_nodes(ids)?;
        let mut change = SelectionChange::new();
        for &id in ids {
            let node = &mut self.nodes[id];
            if !node.node_type().is_object() {
                log::warn!("Ignoring selection of {:?} node {:?}", node.node_type(), id);
                continue;
            }
            if node.selected {
                continue;
            }
            node.selected = true;
            let parent = node.parent;
            change.add_selected(id);
            self.increment_ancestors(parent, &mut change);
        }
        Ok(change)
    }

    /// Deselect nodes; unselected nodes are ignored
    pub fn deselect_nodes(&mut self, ids: &[NodeId]) -> Result<SelectionChange, TreeError> {
        self.validate_nodes(ids)?;
        let mut change = SelectionChange::new();
        for &id in ids {
            let node = &mut self.nodes[id];
            if !node.selected {
                continue;
            }
            node.selected = false;
            let parent = node.parent;
            change.add_deselected(id);
            self.decrement_ancestors(parent, 1, &mut change);
        }
        Ok(change)
    }

    /// Select brush faces
    ///
    /// A selected face counts as a selected descendant of its brush and of
    /// every ancestor of that brush.
    pub fn select_faces(&mut self, faces: &[FaceRef]) -> Result<SelectionChange, TreeError> {
        for &face in faces {
            self.validate_face(face)?;
        }
        let mut change = SelectionChange::new();
        for &face in faces {
            if self.set_face_selected(face, true) {
                change.add_selected_face(face);
                self.increment_ancestors(Some(face.brush), &mut change);
            }
        }
        Ok(change)
    }

    /// Deselect brush faces
    pub fn deselect_faces(&mut self, faces: &[FaceRef]) -> Result<SelectionChange, TreeError> {
        for &face in faces {
            self.validate_face(face)?;
        }
        let mut change = SelectionChange::new();
        for &face in faces {
            if self.set_face_selected(face, false) {
                change.add_deselected_face(face);
                self.decrement_ancestors(Some(face.brush), 1, &mut change);
            }
        }
        Ok(change)
    }

    /// Deselect every node and face
    pub fn deselect_all(&mut self) -> SelectionChange {
        let faces = self.selected_faces();
        let nodes = self.selected_nodes();
        let mut change = SelectionChange::new();
        if let Ok(face_change) = self.deselect_faces(&faces) {
            change.extend(&face_change);
        }
        if let Ok(node_change) = self.deselect_nodes(&nodes) {
            change.extend(&node_change);
        }
        change
    }

    /// Selected nodes in pre-order
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        let mut selected = Vec::new();
        if let Some(world) = self.world {
            self.walk(world, |node| {
                if node.selected() {
                    selected.push(node.id());
                }
                if node.descendant_selected() {
                    Visit::Continue
                } else {
                    Visit::SkipChildren
                }
            });
        }
        selected
    }

    /// Selected faces in pre-order of their brushes
    pub fn selected_faces(&self) -> Vec<FaceRef> {
        let mut faces = Vec::new();
        if let Some(world) = self.world {
            self.walk(world, |node| {
                if let Some(brush) = node.as_brush() {
                    faces.extend(
                        brush
                            .face_indices(|face| face.selected())
                            .into_iter()
                            .map(|index| FaceRef::new(node.id(), index)),
                    );
                }
                if node.descendant_selected() {
                    Visit::Continue
                } else {
                    Visit::SkipChildren
                }
            });
        }
        faces
    }

    fn validate_nodes(&self, ids: &[NodeId]) -> Result<(), TreeError> {
        match ids.iter().find(|&&id| !self.contains(id)) {
            Some(&id) => Err(TreeError::UnknownNode(id)),
            None => Ok(()),
        }
    }

    fn validate_face(&self, face: FaceRef) -> Result<(), TreeError> {
        let node = self.nodes.get(face.brush).ok_or(TreeError::UnknownNode(face.brush))?;
        let brush = node.as_brush().ok_or(TreeError::WrongNodeType {
            id: face.brush,
            expected: NodeType::Brush,
            actual: node.node_type(),
        })?;
        if face.index >= brush.faces().len() {
            return Err(TreeError::FaceOutOfRange { brush: face.brush, index: face.index });
        }
        Ok(())
    }

    fn set_face_selected(&mut self, face: FaceRef, selected: bool) -> bool {
        match &mut self.nodes[face.brush].kind {
            NodeKind::Brush(brush) => brush.set_face_selected(face.index, selected),
            _ => false,
        }
    }

    fn increment_ancestors(&mut self, from: Option<NodeId>, change: &mut SelectionChange) {
        let mut current = from;
        while let Some(id) = current {
            let node = &mut self.nodes[id];
            node.descendant_selection_count += 1;
            if node.descendant_selection_count == 1 {
                change.add_partially_selected(id);
            }
            current = node.parent;
        }
    }

    fn decrement_ancestors(&mut self, from: Option<NodeId>, amount: usize, change: &mut SelectionChange) {
        let mut current = from;
        while let Some(id) = current {
            let node = &mut self.nodes[id];
            assert!(
                node.descendant_selection_count >= amount,
                "selection count of {id:?} would drop below zero"
            );
            node.descendant_selection_count -= amount;
            if node.descendant_selection_count == 0 {
                change.add_partially_deselected(id);
            }
            current = node.parent;
        }
    }
}

impl Index<NodeId> for NodeTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

/// Iterator over the strict ancestors of a node
///
/// Created by [`NodeTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::model::{Brush, Group};

    fn cube() -> Brush {
        Brush::cuboid(Vec3::zeros(), Vec3::new(16.0, 16.0, 16.0), "base/wall")
    }

    fn sample() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::with_world(World::new("test"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        let group = tree.add_child(layer, Group::new("room")).unwrap();
        let brush = tree.add_child(group, cube()).unwrap();
        (tree, layer, group, brush)
    }

    #[test]
    fn test_containment_is_enforced() {
        let (mut tree, layer, _, brush) = sample();
        let world = tree.world().unwrap();

        assert_eq!(
            tree.add_child(world, Group::new("bad")),
            Err(TreeError::InvalidChild { parent: NodeType::World, child: NodeType::Group })
        );
        assert!(tree.add_child(brush, cube()).is_err());
        assert!(tree.add_child(layer, Layer::new("nested")).is_err());
        assert_eq!(tree.create_world(World::new("again")), Err(TreeError::WorldExists));
    }

    #[test]
    fn test_layer_of_and_ancestors() {
        let (tree, layer, group, brush) = sample();

        assert_eq!(tree.layer_of(brush), Some(layer));
        assert_eq!(tree.layer_of(layer), Some(layer));
        assert_eq!(tree.layer_of(tree.world().unwrap()), None);
        let ancestors: Vec<_> = tree.ancestors(brush).collect();
        assert_eq!(ancestors, vec![group, layer, tree.world().unwrap()]);
    }

    #[test]
    fn test_select_node_marks_ancestors() {
        let (mut tree, layer, group, brush) = sample();

        let change = tree.select_nodes(&[brush]).unwrap();
        assert_eq!(change.selected_nodes(), &[brush]);
        assert_eq!(change.partially_selected_nodes(), &[group, layer, tree.world().unwrap()]);
        assert!(tree[group].descendant_selected());
        assert!(!tree[brush].descendant_selected());

        // Selecting again changes nothing
        assert!(tree.select_nodes(&[brush]).unwrap().is_empty());

        let change = tree.deselect_nodes(&[brush]).unwrap();
        assert_eq!(change.deselected_nodes(), &[brush]);
        assert_eq!(change.partially_deselected_nodes().len(), 3);
        assert!(!tree[layer].descendant_selected());
    }

    #[test]
    fn test_layers_are_not_selectable() {
        let (mut tree, layer, _, _) = sample();
        assert!(tree.select_nodes(&[layer]).unwrap().is_empty());
        assert!(!tree[layer].selected());
    }

    #[test]
    fn test_face_selection_counts_toward_brush() {
        let (mut tree, _, group, brush) = sample();

        let change = tree.select_faces(&[FaceRef::new(brush, 0), FaceRef::new(brush, 3)]).unwrap();
        assert_eq!(change.selected_faces().len(), 2);
        assert_eq!(change.partially_selected_nodes()[0], brush);
        assert!(tree[brush].descendant_selected());
        assert!(!tree[brush].selected());
        assert_eq!(tree.selected_faces(), vec![FaceRef::new(brush, 0), FaceRef::new(brush, 3)]);

        let change = tree.deselect_faces(&[FaceRef::new(brush, 0)]).unwrap();
        assert!(change.partially_deselected_nodes().is_empty());
        assert!(tree[group].descendant_selected());

        let change = tree.deselect_all();
        assert_eq!(change.deselected_faces(), &[FaceRef::new(brush, 3)]);
        assert!(!tree[group].descendant_selected());
    }

    #[test]
    fn test_face_errors() {
        let (mut tree, _, group, brush) = sample();
        assert!(matches!(
            tree.select_faces(&[FaceRef::new(brush, 6)]),
            Err(TreeError::FaceOutOfRange { brush: id, index: 6 }) if id == brush
        ));
        assert!(matches!(
            tree.select_faces(&[FaceRef::new(group, 0)]),
            Err(TreeError::WrongNodeType { .. })
        ));
    }

    #[test]
    fn test_remove_subtree_releases_selection() {
        let (mut tree, layer, group, brush) = sample();
        tree.select_nodes(&[brush]).unwrap();

        assert_eq!(tree.remove(group), Ok(2));
        assert!(!tree.contains(brush));
        assert!(tree.children(layer).is_empty());
        assert!(!tree[layer].descendant_selected());
        assert_eq!(tree.remove(tree.world().unwrap()), Err(TreeError::CannotRemoveWorld));
    }

    #[test]
    fn test_added_brush_drops_face_selection() {
        let (mut tree, layer, _, brush) = sample();
        tree.select_faces(&[FaceRef::new(brush, 1)]).unwrap();

        let copy = tree[brush].as_brush().unwrap().clone();
        assert!(copy.has_selected_faces());
        let pasted = tree.add_child(layer, copy).unwrap();
        assert!(!tree[pasted].as_brush().unwrap().has_selected_faces());
        assert!(!tree[pasted].descendant_selected());
    }
}
