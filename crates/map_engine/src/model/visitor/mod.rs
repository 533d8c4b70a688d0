//! Visitor dispatch over the closed node set
//!
//! A visitor implements one handler per node kind. Each handler returns a
//! [`Visit`] telling the driver how to proceed:
//!
//! - [`Visit::Continue`] descends into the children (when the driver recurses)
//! - [`Visit::SkipChildren`] prunes the children of this node only; siblings
//!   are still visited
//! - [`Visit::Cancel`] aborts the whole traversal
//!
//! The drivers live on [`NodeTree`](super::NodeTree) (see [`traverse`]) and
//! report whether they ran to completion through [`Walk`].
//!
//! Read-only visitors borrow the tree for `'a` and may keep references to the
//! payloads they see:
//!
//! ```ignore
//! struct Names<'a>(Vec<&'a str>);
//!
//! impl<'a> NodeVisitor<'a> for Names<'a> {
//!     fn visit_layer(&mut self, _: NodeInfo, layer: &'a Layer) -> Visit {
//!         self.0.push(&layer.name);
//!         Visit::SkipChildren
//!     }
//!     // ... one handler per kind
//! }
//! ```

mod adapters;
mod matching;
mod query;
pub mod traverse;

pub use adapters::{FnVisitor, FnVisitorMut};
pub use matching::{MatchingVisitor, NeverStopRecursion, StopPolicy, StopRecursionIfMatched};
pub use query::NodeQuery;

use super::brush::Brush;
use super::node::{Entity, Group, Layer, NodeInfo, World};

/// Outcome of visiting a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Keep going, including this node's children
    #[default]
    Continue,
    /// Do not descend below this node
    SkipChildren,
    /// Stop the traversal
    Cancel,
}

impl Visit {
    /// Turn `Continue` into `SkipChildren`, leaving the other outcomes alone
    #[must_use]
    pub const fn stop_recursion(self) -> Self {
        match self {
            Self::Continue => Self::SkipChildren,
            other => other,
        }
    }

    /// Whether the traversal must stop
    pub const fn is_cancel(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

/// Outcome of a whole traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Every reachable node was offered to the visitor
    Finished,
    /// A handler returned [`Visit::Cancel`]
    Cancelled,
}

impl Walk {
    /// Whether a handler cancelled the traversal
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Read-only visitor over map nodes
pub trait NodeVisitor<'a> {
    /// Handle the world root
    fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit;
    /// Handle a layer
    fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit;
    /// Handle a group
    fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit;
    /// Handle an entity
    fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit;
    /// Handle a brush
    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit;
}

/// Visitor that may edit node payloads
///
/// Structure and selection stay with the tree; a handler only sees the payload.
pub trait NodeVisitorMut {
    /// Handle the world root
    fn visit_world(&mut self, node: NodeInfo, world: &mut World) -> Visit;
    /// Handle a layer
    fn visit_layer(&mut self, node: NodeInfo, layer: &mut Layer) -> Visit;
    /// Handle a group
    fn visit_group(&mut self, node: NodeInfo, group: &mut Group) -> Visit;
    /// Handle an entity
    fn visit_entity(&mut self, node: NodeInfo, entity: &mut Entity) -> Visit;
    /// Handle a brush
    fn visit_brush(&mut self, node: NodeInfo, brush: &mut Brush) -> Visit;
}

impl<'a, V: NodeVisitor<'a> + ?Sized> NodeVisitor<'a> for &mut V {
    fn visit_world(&mut self, node: NodeInfo, world: &'a World) -> Visit {
        (**self).visit_world(node, world)
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &'a Layer) -> Visit {
        (**self).visit_layer(node, layer)
    }

    fn visit_group(&mut self, node: NodeInfo, group: &'a Group) -> Visit {
        (**self).visit_group(node, group)
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &'a Entity) -> Visit {
        (**self).visit_entity(node, entity)
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &'a Brush) -> Visit {
        (**self).visit_brush(node, brush)
    }
}

impl<V: NodeVisitorMut + ?Sized> NodeVisitorMut for &mut V {
    fn visit_world(&mut self, node: NodeInfo, world: &mut World) -> Visit {
        (**self).visit_world(node, world)
    }

    fn visit_layer(&mut self, node: NodeInfo, layer: &mut Layer) -> Visit {
        (**self).visit_layer(node, layer)
    }

    fn visit_group(&mut self, node: NodeInfo, group: &mut Group) -> Visit {
        (**self).visit_group(node, group)
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &mut Entity) -> Visit {
        (**self).visit_entity(node, entity)
    }

    fn visit_brush(&mut self, node: NodeInfo, brush: &mut Brush) -> Visit {
        (**self).visit_brush(node, brush)
    }
}
