//! # Map Engine
//!
//! Scene graph and render partitioning for a brush-based level editor.
//!
//! ## Features
//!
//! - **Node tree**: worlds, layers, groups, entities and brushes in a
//!   generational arena with incremental selection counts
//! - **Visitors**: typed double dispatch with pruning and cancellation, plus
//!   reusable query, matching and closure adapters
//! - **Render partition**: per-layer batches and one selection batch, patched
//!   from document notifications instead of rebuilt
//! - **Map text**: Quake-style map reading and writing with layer and group
//!   metadata
//!
//! ## Quick Start
//!
//! ```rust
//! use map_engine::prelude::*;
//!
//! let mut editor = Editor::default();
//! let layer = editor.tree().default_layer().unwrap();
//! let brush = Brush::cuboid(Vec3::zeros(), Vec3::new(64.0, 64.0, 64.0), "base/floor");
//! let id = editor.add_node(layer, brush).unwrap();
//!
//! editor.select_nodes(&[id]).unwrap();
//! assert!(editor.renderer().selection_batch().contains(id));
//!
//! let mut queue = RenderQueue::new();
//! editor.render(&RenderContext::default(), &mut queue);
//! assert_eq!(queue.batch_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod editor;
pub mod events;
pub mod foundation;
pub mod io;
pub mod model;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat, Preferences},
        editor::Editor,
        events::{DocumentEvent, DocumentEventType, DocumentObserver, EventRecorder},
        foundation::math::{Color, Vec3},
        io::{NodeReader, NodeWriter, ReadError, WriteError},
        model::{
            Brush, Entity, FaceRef, Group, Layer, MapDocument, NodeId, NodeInfo, NodeTree, NodeType, NodeVisitor,
            NodeVisitorMut, SelectionChange, TreeError, Visit, Walk, World,
        },
        render::{MapRenderer, RenderBatch, RenderCommand, RenderContext, RenderQueue},
    };
}
