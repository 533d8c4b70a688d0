//! Single-result lookups and node assortment

use super::brush::{Brush, BrushFace, FaceRef};
use super::node::{Entity, Group, Layer, NodeId, NodeInfo, World};
use super::tree::NodeTree;
use super::visitor::{NodeQuery, NodeVisitor, Visit};

/// Records the first container node it sees and cancels
///
/// Every kind except brushes can contain other nodes. Driven top-down the
/// result is the first container in pre-order; driven upwards with
/// [`NodeTree::accept_and_escalate`] it is the innermost container.
#[derive(Debug, Clone, Default)]
pub struct FindContainer {
    query: NodeQuery<NodeId>,
}

impl FindContainer {
    /// Create an empty search
    pub fn new() -> Self {
        Self::default()
    }

    /// The container found, if any
    pub fn result(&self) -> Option<NodeId> {
        self.query.result().copied()
    }

    fn found(&mut self, node: NodeInfo) -> Visit {
        self.query.set_result(node.id);
        Visit::Cancel
    }
}

impl<'a> NodeVisitor<'a> for FindContainer {
    fn visit_world(&mut self, node: NodeInfo, _world: &'a World) -> Visit {
        self.found(node)
    }

    fn visit_layer(&mut self, node: NodeInfo, _layer: &'a Layer) -> Visit {
        self.found(node)
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.found(node)
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.found(node)
    }

    fn visit_brush(&mut self, _node: NodeInfo, _brush: &'a Brush) -> Visit {
        Visit::Continue
    }
}

/// First container in pre-order over the subtrees rooted at `ids`
pub fn find_container(tree: &NodeTree, ids: &[NodeId]) -> Option<NodeId> {
    let mut visitor = FindContainer::new();
    tree.accept_and_recurse_all(ids, &mut visitor);
    visitor.result()
}

/// Innermost container strictly above `id`
pub fn find_container_of(tree: &NodeTree, id: NodeId) -> Option<NodeId> {
    let parent = tree.parent(id)?;
    let mut visitor = FindContainer::new();
    tree.accept_and_escalate(parent, &mut visitor);
    visitor.result()
}

/// Finds the first brush face accepted by a predicate
pub struct FindMatchingBrushFace<P> {
    predicate: P,
    query: NodeQuery<FaceRef>,
}

impl<P> FindMatchingBrushFace<P>
where
    P: FnMut(NodeInfo, &Brush, &BrushFace) -> bool,
{
    /// Create a search with the given face predicate
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            query: NodeQuery::with_combine(keep_first as fn(FaceRef, FaceRef) -> FaceRef),
        }
    }

    /// The matching face, if any
    pub fn result(&self) -> Option<FaceRef> {
        self.query.result().copied()
    }
}

const fn keep_first(first: FaceRef, _later: FaceRef) -> FaceRef {
    first
}

impl<'a, P> NodeVisitor<'a> for FindMatchingBrushFace<P>
where
    P: FnMut(NodeInfo, &Brush, &BrushFace) -> bool,
{
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        Visit::Continue
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        Visit::Continue
    }

    fn visit_group(&mut self, _node: NodeInfo, _group: &'a Group) -> Visit {
        Visit::Continue
    }

    fn visit_entity(&mut self, _node: NodeInfo, _entity: &'a Entity) -> Visit {
        Visit::Continue
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
        let predicate = &mut self.predicate;
        match brush.faces().iter().position(|face| predicate(node, brush, face)) {
            Some(index) => {
                self.query.set_result(FaceRef::new(node.id, index));
                Visit::Cancel
            }
            None => Visit::Continue,
        }
    }
}

/// Sorts visited nodes by kind, keeping visit order within each kind
#[derive(Debug, Clone, Default)]
pub struct CollectNodes {
    /// Visited worlds
    pub worlds: Vec<NodeId>,
    /// Visited layers
    pub layers: Vec<NodeId>,
    /// Visited groups
    pub groups: Vec<NodeId>,
    /// Visited entities
    pub entities: Vec<NodeId>,
    /// Visited brushes
    pub brushes: Vec<NodeId>,
}

impl CollectNodes {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of collected nodes
    pub fn len(&self) -> usize {
        self.worlds.len() + self.layers.len() + self.groups.len() + self.entities.len() + self.brushes.len()
    }

    /// Check if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> NodeVisitor<'a> for CollectNodes {
    fn visit_world(&mut self, node: NodeInfo, _world: &'a World) -> Visit {
        self.worlds.push(node.id);
        Visit::Continue
    }

    fn visit_layer(&mut self, node: NodeInfo, _layer: &'a Layer) -> Visit {
        self.layers.push(node.id);
        Visit::Continue
    }

    fn visit_group(&mut self, node: NodeInfo, _group: &'a Group) -> Visit {
        self.groups.push(node.id);
        Visit::Continue
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        self.entities.push(node.id);
        Visit::Continue
    }

    fn visit_brush(&mut self, node: NodeInfo, _brush: &'a Brush) -> Visit {
        self.brushes.push(node.id);
        Visit::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    /// Forwards to another visitor while recording every visited id
    struct Tracing<V> {
        inner: V,
        visited: Vec<NodeId>,
    }

    impl<'a, V: NodeVisitor<'a>> NodeVisitor<'a> for Tracing<V> {
        fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit {
            self.visited.push(node.id);
            self.inner.visit_world(node, world)
        }

        fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit {
            self.visited.push(node.id);
            self.inner.visit_layer(node, layer)
        }

        fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit {
            self.visited.push(node.id);
            self.inner.visit_group(node, group)
        }

        fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit {
            self.visited.push(node.id);
            self.inner.visit_entity(node, entity)
        }

        fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
            self.visited.push(node.id);
            self.inner.visit_brush(node, brush)
        }
    }

    fn cube(texture: &str) -> Brush {
        Brush::cuboid(Vec3::zeros(), Vec3::new(32.0, 32.0, 32.0), texture)
    }

    #[test]
    fn test_find_container_cancels_before_brush() {
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        let group = tree.add_child(layer, Group::new("g")).unwrap();
        let brush = tree.add_child(group, cube("wall")).unwrap();
        tree.select_nodes(&[group]).unwrap();

        // Start below the layer: the world and layer are containers too and
        // would be found before the group
        let mut tracing = Tracing { inner: FindContainer::new(), visited: Vec::new() };
        let walk = tree.accept_and_recurse_all(tree.children(layer), &mut tracing);

        assert!(walk.is_cancelled());
        assert_eq!(tracing.inner.result(), Some(group));
        assert!(!tracing.visited.contains(&brush));
        assert_eq!(find_container(&tree, &[brush]), None);
    }

    #[test]
    fn test_find_container_of_escalates() {
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        let entity = tree.add_child(layer, Entity::new("func_door")).unwrap();
        let brush = tree.add_child(entity, cube("door")).unwrap();
        let loose = tree.add_child(layer, cube("wall")).unwrap();

        assert_eq!(find_container_of(&tree, brush), Some(entity));
        assert_eq!(find_container_of(&tree, loose), Some(layer));
        assert_eq!(find_container_of(&tree, entity), Some(layer));
        assert_eq!(find_container_of(&tree, world), None);
    }

    #[test]
    fn test_find_matching_face() {
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        tree.add_child(layer, cube("wall")).unwrap();
        let mut target = cube("wall");
        target.set_face_texture(4, "sky");
        let target = tree.add_child(layer, target).unwrap();

        let mut visitor = FindMatchingBrushFace::new(|_, _: &Brush, face: &BrushFace| face.texture == "sky");
        assert!(tree.accept_and_recurse(world, &mut visitor).is_cancelled());
        assert_eq!(visitor.result(), Some(FaceRef::new(target, 4)));

        let mut visitor = FindMatchingBrushFace::new(|_, _: &Brush, face: &BrushFace| face.texture == "lava");
        assert!(!tree.accept_and_recurse(world, &mut visitor).is_cancelled());
        assert_eq!(visitor.result(), None);
    }

    #[test]
    fn test_collect_nodes_assorts_by_kind() {
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        let group = tree.add_child(layer, Group::new("g")).unwrap();
        let entity = tree.add_child(group, Entity::new("func_wall")).unwrap();
        let first = tree.add_child(entity, cube("a")).unwrap();
        let second = tree.add_child(layer, cube("b")).unwrap();

        let mut collect = CollectNodes::new();
        tree.accept_and_recurse(world, &mut collect);

        assert_eq!(collect.len(), 6);
        assert_eq!(collect.layers, vec![layer]);
        assert_eq!(collect.groups, vec![group]);
        assert_eq!(collect.entities, vec![entity]);
        assert_eq!(collect.brushes, vec![first, second]);
    }
}
