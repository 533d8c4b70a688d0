//! Predicate-filtered visitors
//!
//! A [`MatchingVisitor`] runs its inner visitor only on nodes accepted by a
//! predicate and lets a [`StopPolicy`] prune recursion below a node.

use super::{NodeVisitor, NodeVisitorMut, Visit};
use crate::model::brush::Brush;
use crate::model::node::{Entity, Group, Layer, NodeInfo, World};

/// Decides whether recursion stops below a node
pub trait StopPolicy {
    /// `matched` is the predicate's verdict for `node`
    fn stop(&self, node: &NodeInfo, matched: bool) -> bool;
}

/// Always descend
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStopRecursion;

impl StopPolicy for NeverStopRecursion {
    fn stop(&self, _node: &NodeInfo, _matched: bool) -> bool {
        false
    }
}

/// Do not descend below a matching node
#[derive(Debug, Clone, Copy, Default)]
pub struct StopRecursionIfMatched;

impl StopPolicy for StopRecursionIfMatched {
    fn stop(&self, _node: &NodeInfo, matched: bool) -> bool {
        matched
    }
}

/// Visitor running `inner` on the nodes matched by `predicate`
///
/// A cancel from the inner visitor always ends the traversal, even when the
/// stop policy fires on the same node.
#[derive(Debug, Clone)]
pub struct MatchingVisitor<P, S, V> {
    predicate: P,
    policy: S,
    inner: V,
}

impl<P, S, V> MatchingVisitor<P, S, V>
where
    P: FnMut(&NodeInfo) -> bool,
    S: StopPolicy,
{
    /// Combine a predicate, a stop policy and an inner visitor
    pub const fn new(predicate: P, policy: S, inner: V) -> Self {
        Self { predicate, policy, inner }
    }

    /// The wrapped visitor
    pub const fn inner(&self) -> &V {
        &self.inner
    }

    /// Unwrap the inner visitor
    pub fn into_inner(self) -> V {
        self.inner
    }

    fn handle(&mut self, node: &NodeInfo, run: impl FnOnce(&mut V) -> Visit) -> Visit {
        let matched = (self.predicate)(node);
        let visit = if matched { run(&mut self.inner) } else { Visit::Continue };
        if self.policy.stop(node, matched) {
            visit.stop_recursion()
        } else {
            visit
        }
    }
}

impl<'a, P, S, V> NodeVisitor<'a> for MatchingVisitor<P, S, V>
where
    P: FnMut(&NodeInfo) -> bool,
    S: StopPolicy,
    V: NodeVisitor<'a>,
{
    fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit {
        self.handle(&node, |inner| inner.visit_world(node, world))
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit {
        self.handle(&node, |inner| inner.visit_layer(node, layer))
    }

    fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit {
        self.handle(&node, |inner| inner.visit_group(node, group))
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit {
        self.handle(&node, |inner| inner.visit_entity(node, entity))
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
        self.handle(&node, |inner| inner.visit_brush(node, brush))
    }
}

impl<P, S, V> NodeVisitorMut for MatchingVisitor<P, S, V>
where
    P: FnMut(&NodeInfo) -> bool,
    S: StopPolicy,
    V: NodeVisitorMut,
{
    fn visit_world(&mut self, node: NodeInfo, world: &mut World) -> Visit {
        self.handle(&node, |inner| inner.visit_world(node, world))
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &mut Layer) -> Visit {
        self.handle(&node, |inner| inner.visit_layer(node, layer))
    }

    fn visit_group(&mut self, node: NodeInfo, group: &mut Group) -> Visit {
        self.handle(&node, |inner| inner.visit_group(node, group))
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &mut Entity) -> Visit {
        self.handle(&node, |inner| inner.visit_entity(node, entity))
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &mut Brush) -> Visit {
        self.handle(&node, |inner| inner.visit_brush(node, brush))
    }
}
