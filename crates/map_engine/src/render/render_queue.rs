//! Render queue for one frame
//!
//! The map renderer does not talk to a graphics API. It records what a
//! backend has to do, in order: a one-shot state block followed by one draw
//! command per batch.

use bitflags::bitflags;

use super::style::BatchStyle;
use crate::model::{NodeId, NodeType};

bitflags! {
    /// Fixed-function capabilities enabled for a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GlCapabilities: u8 {
        /// Cull back faces
        const CULL_FACE = 1 << 0;
        /// Depth testing
        const DEPTH_TEST = 1 << 1;
    }
}

/// Winding of front faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Clockwise winding
    Clockwise,
    /// Counter-clockwise winding
    CounterClockwise,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunction {
    /// Pass if closer
    Less,
    /// Pass if closer or equal
    LessEqual,
}

/// State applied once before any batch is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlState {
    /// Enabled capabilities
    pub capabilities: GlCapabilities,
    /// Front face winding
    pub front_face: FrontFace,
    /// Depth test function
    pub depth_function: DepthFunction,
    /// Reset the polygon edge offset to zero
    pub reset_edge_offset: bool,
}

impl GlState {
    /// State used for map geometry
    pub const fn map_defaults() -> Self {
        Self {
            capabilities: GlCapabilities::CULL_FACE.union(GlCapabilities::DEPTH_TEST),
            front_face: FrontFace::Clockwise,
            depth_function: DepthFunction::LessEqual,
            reset_edge_offset: true,
        }
    }
}

/// Which batch produced a draw command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    /// The batch of one layer
    Layer(NodeId),
    /// The selection batch
    Selection,
}

/// One node to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawItem {
    /// The node
    pub node: NodeId,
    /// Its kind
    pub node_type: NodeType,
    /// Indices of the brush faces to draw; empty for other kinds
    pub faces: Vec<usize>,
    /// Geometry revision of the cached object
    pub revision: u64,
}

/// A recorded render command
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Apply fixed state
    SetupGl(GlState),
    /// Draw the items of one batch with its style
    DrawBatch {
        /// Producing batch
        source: BatchSource,
        /// Colors and flags to draw with
        style: BatchStyle,
        /// Items passing the batch filter
        items: Vec<DrawItem>,
    },
}

/// View toggles of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Draw group bounds
    pub show_groups: bool,
    /// Draw entities
    pub show_entities: bool,
    /// Draw brushes
    pub show_brushes: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            show_groups: true,
            show_entities: true,
            show_brushes: true,
        }
    }
}

/// Ordered commands of one frame
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    commands: Vec<RenderCommand>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// All commands in submission order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Draw commands only, as `(source, items)`
    pub fn draw_batches(&self) -> impl Iterator<Item = (BatchSource, &[DrawItem])> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::DrawBatch { source, items, .. } => Some((*source, items.as_slice())),
            RenderCommand::SetupGl(_) => None,
        })
    }

    /// Get total number of batches
    pub fn batch_count(&self) -> usize {
        self.draw_batches().count()
    }

    /// Get total number of draw items across all batches
    pub fn total_item_count(&self) -> usize {
        self.draw_batches().map(|(_, items)| items.len()).sum()
    }

    /// Drop all commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
