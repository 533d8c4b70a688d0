//! Render partitioning
//!
//! Following the scene-manager split between document and renderer: the
//! [`MapRenderer`] turns document notifications into membership changes of
//! per-layer and selection [`RenderBatch`]es and records each frame into a
//! [`RenderQueue`].

mod map_renderer;
mod render_batch;
mod render_queue;
mod renderable_object;
mod style;

#[cfg(test)]
mod tests;

pub use map_renderer::MapRenderer;
pub use render_batch::{BrushFilter, RenderBatch};
pub use render_queue::{
    BatchSource, DepthFunction, DrawItem, FrontFace, GlCapabilities, GlState, RenderCommand, RenderContext, RenderQueue,
};
pub use renderable_object::RenderableObject;
pub use style::BatchStyle;
