//! Closure-backed visitors

use super::{NodeVisitor, NodeVisitorMut, Visit};
use crate::model::brush::Brush;
use crate::model::node::{Entity, Group, Layer, NodeInfo, NodeRef, NodeRefMut, World};

/// Read-only visitor calling one closure for every node kind
///
/// The closure sees the payload through [`NodeRef`]; its most recent return
/// value is kept and available through [`result`](Self::result). The adapter
/// never prunes or cancels.
///
/// ```ignore
/// let mut count = FnVisitor::new(|_, node| matches!(node, NodeRef::Brush(_)));
/// tree.accept_and_recurse(world, &mut count);
/// ```
#[derive(Debug)]
pub struct FnVisitor<F, R> {
    callback: F,
    result: Option<R>,
}

impl<F, R> FnVisitor<F, R> {
    /// Wrap a closure
    pub fn new<'a>(callback: F) -> Self
    where
        F: FnMut(NodeInfo, NodeRef<'a>) -> R,
    {
        Self { callback, result: None }
    }

    /// Return value of the last call, `None` before the first node
    pub const fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    /// Whether the closure ran at least once
    pub const fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Consume the adapter, returning the last result
    pub fn into_result(self) -> Option<R> {
        self.result
    }

    fn call<'a>(&mut self, node: NodeInfo, payload: NodeRef<'a>) -> Visit
    where
        F: FnMut(NodeInfo, NodeRef<'a>) -> R,
    {
        self.result = Some((self.callback)(node, payload));
        Visit::Continue
    }
}

impl<'a, F, R> NodeVisitor<'a> for FnVisitor<F, R>
where
    F: FnMut(NodeInfo, NodeRef<'a>) -> R,
{
    fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit {
        self.call(node, NodeRef::World(world))
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit {
        self.call(node, NodeRef::Layer(layer))
    }

    fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit {
        self.call(node, NodeRef::Group(group))
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit {
        self.call(node, NodeRef::Entity(entity))
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
        self.call(node, NodeRef::Brush(brush))
    }
}

/// Mutating counterpart of [`FnVisitor`]
#[derive(Debug)]
pub struct FnVisitorMut<F, R> {
    callback: F,
    result: Option<R>,
}

impl<F, R> FnVisitorMut<F, R>
where
    F: FnMut(NodeInfo, NodeRefMut<'_>) -> R,
{
    /// Wrap a closure
    pub fn new(callback: F) -> Self {
        Self { callback, result: None }
    }

    /// Return value of the last call, `None` before the first node
    pub const fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    /// Consume the adapter, returning the last result
    pub fn into_result(self) -> Option<R> {
        self.result
    }

    fn call(&mut self, node: NodeInfo, payload: NodeRefMut<'_>) -> Visit {
        self.result = Some((self.callback)(node, payload));
        Visit::Continue
    }
}

impl<F, R> NodeVisitorMut for FnVisitorMut<F, R>
where
    F: FnMut(NodeInfo, NodeRefMut<'_>) -> R,
{
    fn visit_world(&mut self, node: NodeInfo, world: &mut World) -> Visit {
        self.call(node, NodeRefMut::World(world))
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &mut Layer) -> Visit {
        self.call(node, NodeRefMut::Layer(layer))
    }

    fn visit_group(&mut self, node: NodeInfo, group: &mut Group) -> Visit {
        self.call(node, NodeRefMut::Group(group))
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &mut Entity) -> Visit {
        self.call(node, NodeRefMut::Entity(entity))
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &mut Brush) -> Visit {
        self.call(node, NodeRefMut::Brush(brush))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::model::{NodeTree, NodeType};

    fn tree() -> NodeTree {
        let mut tree = NodeTree::with_world(World::new("map"));
        let world = tree.world().unwrap();
        let layer = tree.add_child(world, Layer::new("Default Layer")).unwrap();
        tree.add_child(layer, Entity::new("info_player_start")).unwrap();
        tree.add_child(layer, Brush::cuboid(Vec3::zeros(), Vec3::new(4.0, 4.0, 4.0), "wall"))
            .unwrap();
        tree
    }

    #[test]
    fn test_result_is_empty_before_first_call() {
        let visitor = FnVisitor::new(|node: NodeInfo, _| node.node_type);
        assert!(!visitor.has_result());
        assert!(visitor.into_result().is_none());
    }

    #[test]
    fn test_keeps_last_result() {
        let tree = tree();
        let world = tree.world().unwrap();

        let mut visitor = FnVisitor::new(|node: NodeInfo, _| node.node_type);
        tree.accept_and_recurse(world, &mut visitor);
        assert_eq!(visitor.result(), Some(&NodeType::Brush));
    }

    #[test]
    fn test_closure_may_borrow_payloads() {
        let tree = tree();
        let world = tree.world().unwrap();

        let mut names = Vec::new();
        let mut visitor = FnVisitor::new(|_, node| {
            if let NodeRef::Entity(entity) = node {
                names.push(entity.classname.as_str());
            }
        });
        tree.accept_and_recurse(world, &mut visitor);
        assert!(visitor.has_result());
        drop(visitor);
        assert_eq!(names, ["info_player_start"]);
    }

    #[test]
    fn test_mutable_closure() {
        let mut tree = tree();
        let world = tree.world().unwrap();

        let mut visitor = FnVisitorMut::new(|_, node| match node {
            NodeRefMut::Brush(brush) => brush.replace_texture("wall", "sky"),
            _ => 0,
        });
        tree.accept_and_recurse_mut(world, &mut visitor);
        assert_eq!(visitor.into_result(), Some(6));
    }
}
