//! Traversal drivers
//!
//! All recursive drivers walk depth-first in pre-order with an explicit work
//! stack, visiting children in stored order. Handing a driver an id that is not
//! in the tree is a programming error and panics.

use super::{NodeVisitor, NodeVisitorMut, Visit, Walk};
use crate::model::node::{Node, NodeId};
use crate::model::tree::NodeTree;

impl NodeTree {
    /// Offer a single node to `visitor`
    pub fn accept<'a, V: NodeVisitor<'a> + ?Sized>(&'a self, id: NodeId, visitor: &mut V) -> Visit {
        self.nodes[id].accept(visitor)
    }

    /// Offer each node in `ids` without descending; a cancel skips the rest
    pub fn accept_all<'a, V: NodeVisitor<'a> + ?Sized>(&'a self, ids: &[NodeId], visitor: &mut V) -> Walk {
        for &id in ids {
            if self.nodes[id].accept(visitor).is_cancel() {
                return Walk::Cancelled;
            }
        }
        Walk::Finished
    }

    /// Visit the subtree rooted at `id`
    pub fn accept_and_recurse<'a, V: NodeVisitor<'a> + ?Sized>(&'a self, id: NodeId, visitor: &mut V) -> Walk {
        self.accept_and_recurse_all(&[id], visitor)
    }

    /// Visit the subtrees rooted at each of `ids`, in order
    pub fn accept_and_recurse_all<'a, V: NodeVisitor<'a> + ?Sized>(
        &'a self,
        ids: &[NodeId],
        visitor: &mut V,
    ) -> Walk {
        let mut stack: Vec<NodeId> = ids.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node: &'a Node = &self.nodes[id];
            match node.accept(visitor) {
                Visit::Continue => stack.extend(node.children().iter().rev().copied()),
                Visit::SkipChildren => {}
                Visit::Cancel => return Walk::Cancelled,
            }
        }
        Walk::Finished
    }

    /// Visit `id` and then each of its ancestors up to the world
    ///
    /// `SkipChildren` has no effect here; only `Cancel` stops the climb.
    pub fn accept_and_escalate<'a, V: NodeVisitor<'a> + ?Sized>(&'a self, id: NodeId, visitor: &mut V) -> Walk {
        let mut current = Some(id);
        while let Some(id) = current {
            let node: &'a Node = &self.nodes[id];
            if node.accept(visitor).is_cancel() {
                return Walk::Cancelled;
            }
            current = node.parent();
        }
        Walk::Finished
    }

    /// Offer a single node to a mutating visitor
    pub fn accept_mut<V: NodeVisitorMut + ?Sized>(&mut self, id: NodeId, visitor: &mut V) -> Visit {
        self.nodes[id].accept_mut(visitor)
    }

    /// Mutable counterpart of [`accept_all`](Self::accept_all)
    pub fn accept_all_mut<V: NodeVisitorMut + ?Sized>(&mut self, ids: &[NodeId], visitor: &mut V) -> Walk {
        for &id in ids {
            if self.nodes[id].accept_mut(visitor).is_cancel() {
                return Walk::Cancelled;
            }
        }
        Walk::Finished
    }

    /// Mutable counterpart of [`accept_and_recurse`](Self::accept_and_recurse)
    pub fn accept_and_recurse_mut<V: NodeVisitorMut + ?Sized>(&mut self, id: NodeId, visitor: &mut V) -> Walk {
        self.accept_and_recurse_all_mut(&[id], visitor)
    }

    /// Mutable counterpart of [`accept_and_recurse_all`](Self::accept_and_recurse_all)
    pub fn accept_and_recurse_all_mut<V: NodeVisitorMut + ?Sized>(&mut self, ids: &[NodeId], visitor: &mut V) -> Walk {
        let mut stack: Vec<NodeId> = ids.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            match node.accept_mut(visitor) {
                Visit::Continue => stack.extend(node.children.iter().rev().copied()),
                Visit::SkipChildren => {}
                Visit::Cancel => return Walk::Cancelled,
            }
        }
        Walk::Finished
    }

    /// Pre-order walk with a plain callback instead of a visitor
    pub fn walk<F>(&self, root: NodeId, mut callback: F) -> Walk
    where
        F: FnMut(&Node) -> Visit,
    {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match callback(node) {
                Visit::Continue => stack.extend(node.children().iter().rev().copied()),
                Visit::SkipChildren => {}
                Visit::Cancel => return Walk::Cancelled,
            }
        }
        Walk::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::model::{Brush, Entity, Group, Layer, NodeInfo, World};

    /// Records visit order and answers with a configurable outcome per node
    #[derive(Default)]
    struct Recorder {
        visited: Vec<NodeId>,
        skip: Vec<NodeId>,
        cancel_at: Option<NodeId>,
    }

    impl Recorder {
        fn record(&mut self, node: NodeInfo) -> Visit {
            self.visited.push(node.id);
            if self.cancel_at == Some(node.id) {
                Visit::Cancel
            } else if self.skip.contains(&node.id) {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        }
    }

    impl<'a> NodeVisitor<'a> for Recorder {
        fn visit_world(&mut self, node: NodeInfo, _: &'a World) -> Visit {
            self.record(node)
        }

        fn visit_layer(&mut self, node: NodeInfo, _: &'a Layer) -> Visit {
            self.record(node)
        }

        fn visit_group(&mut self, node: NodeInfo, _: &'a Group) -> Visit {
            self.record(node)
        }

        fn visit_entity(&mut self, node: NodeInfo, _: &'a Entity) -> Visit {
            self.record(node)
        }

        fn visit_brush(&mut self, node: NodeInfo, _: &'a Brush) -> Visit {
            self.record(node)
        }
    }

    struct Rename;

    impl NodeVisitorMut for Rename {
        fn visit_world(&mut self, _: NodeInfo, world: &mut World) -> Visit {
            world.name.push('!');
            Visit::Continue
        }

        fn visit_layer(&mut self, _: NodeInfo, layer: &mut Layer) -> Visit {
            layer.name.push('!');
            Visit::Continue
        }

        fn visit_group(&mut self, _: NodeInfo, group: &mut Group) -> Visit {
            group.name.push('!');
            Visit::SkipChildren
        }

        fn visit_entity(&mut self, _: NodeInfo, entity: &mut Entity) -> Visit {
            entity.classname.push('!');
            Visit::Continue
        }

        fn visit_brush(&mut self, _: NodeInfo, brush: &mut Brush) -> Visit {
            brush.replace_texture("wall", "floor");
            Visit::Continue
        }
    }

    struct Fixture {
        tree: NodeTree,
        world: NodeId,
        layer: NodeId,
        group: NodeId,
        inner: NodeId,
        entity: NodeId,
        loose: NodeId,
    }

    //  world
    //   └─ layer
    //       ├─ group
    //       │   ├─ inner (brush)
    //       │   └─ entity
    //       └─ loose (brush)
    fn fixture() -> Fixture {
        let brush = || Brush::cuboid(Vec3::zeros(), Vec3::new(8.0, 8.0, 8.0), "wall");
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        let group = tree.add_child(layer, Group::new("g")).unwrap();
        let inner = tree.add_child(group, brush()).unwrap();
        let entity = tree.add_child(group, Entity::new("light")).unwrap();
        let loose = tree.add_child(layer, brush()).unwrap();
        Fixture { tree, world, layer, group, inner, entity, loose }
    }

    #[test]
    fn test_pre_order_visits_each_node_once() {
        let f = fixture();
        let mut recorder = Recorder::default();

        assert_eq!(f.tree.accept_and_recurse(f.world, &mut recorder), Walk::Finished);
        assert_eq!(recorder.visited, vec![f.world, f.layer, f.group, f.inner, f.entity, f.loose]);
        assert_eq!(f.tree.subtree(f.world), recorder.visited);
    }

    #[test]
    fn test_skip_children_is_scoped_to_one_node() {
        let f = fixture();
        let mut recorder = Recorder { skip: vec![f.group], ..Recorder::default() };

        assert_eq!(f.tree.accept_and_recurse(f.world, &mut recorder), Walk::Finished);
        assert_eq!(recorder.visited, vec![f.world, f.layer, f.group, f.loose]);
    }

    #[test]
    fn test_cancel_aborts_everything() {
        let f = fixture();
        let mut recorder = Recorder { cancel_at: Some(f.inner), ..Recorder::default() };

        assert_eq!(f.tree.accept_and_recurse(f.world, &mut recorder), Walk::Cancelled);
        assert_eq!(recorder.visited, vec![f.world, f.layer, f.group, f.inner]);
    }

    #[test]
    fn test_accept_all_does_not_descend() {
        let f = fixture();
        let mut recorder = Recorder::default();

        assert_eq!(f.tree.accept_all(&[f.loose, f.group], &mut recorder), Walk::Finished);
        assert_eq!(recorder.visited, vec![f.loose, f.group]);

        let mut recorder = Recorder { cancel_at: Some(f.loose), ..Recorder::default() };
        assert!(f.tree.accept_all(&[f.loose, f.group], &mut recorder).is_cancelled());
        assert_eq!(recorder.visited, vec![f.loose]);
    }

    #[test]
    fn test_recurse_all_keeps_root_order() {
        let f = fixture();
        let mut recorder = Recorder::default();

        f.tree.accept_and_recurse_all(&[f.loose, f.group], &mut recorder);
        assert_eq!(recorder.visited, vec![f.loose, f.group, f.inner, f.entity]);
    }

    #[test]
    fn test_escalate_climbs_to_world() {
        let f = fixture();
        let mut recorder = Recorder { skip: vec![f.group], ..Recorder::default() };

        assert_eq!(f.tree.accept_and_escalate(f.entity, &mut recorder), Walk::Finished);
        assert_eq!(recorder.visited, vec![f.entity, f.group, f.layer, f.world]);

        let mut recorder = Recorder { cancel_at: Some(f.group), ..Recorder::default() };
        assert!(f.tree.accept_and_escalate(f.inner, &mut recorder).is_cancelled());
        assert_eq!(recorder.visited, vec![f.inner, f.group]);
    }

    #[test]
    fn test_mutable_recursion_edits_payloads() {
        let mut f = fixture();

        assert_eq!(f.tree.accept_and_recurse_mut(f.world, &mut Rename), Walk::Finished);
        assert_eq!(f.tree[f.layer].as_layer().unwrap().name, "Default Layer!");
        // The group skipped its children
        assert_eq!(f.tree[f.inner].as_brush().unwrap().faces()[0].texture, "wall");
        assert_eq!(f.tree[f.loose].as_brush().unwrap().faces()[0].texture, "floor");

        f.tree.accept_all_mut(&[f.inner], &mut Rename);
        assert_eq!(f.tree[f.inner].as_brush().unwrap().faces()[0].texture, "floor");
    }

    #[test]
    fn test_walk_matches_visitor_order() {
        let f = fixture();
        let mut ids = Vec::new();
        let walk = f.tree.walk(f.layer, |node| {
            ids.push(node.id());
            if node.id() == f.inner { Visit::Cancel } else { Visit::Continue }
        });

        assert!(walk.is_cancelled());
        assert_eq!(ids, vec![f.layer, f.group, f.inner]);
    }

    #[test]
    #[should_panic]
    fn test_dangling_id_panics() {
        let mut f = fixture();
        f.tree.remove(f.loose).unwrap();
        f.tree.accept(f.loose, &mut Recorder::default());
    }
}
