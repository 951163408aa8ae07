//! Rendering adapter for streamed chunks.
//!
//! # Invariants
//! - Renderers only read the scene; the streamer decides what exists.
//! - Tile positions follow every origin shift, so they stay in the same frame
//!   as the streamer's chunks.
//!
//! [`TileScene`] is an in-memory [`floatgrid_stream::RenderBackend`];
//! [`DebugTextRenderer`] draws it as a top-down ASCII map. A GPU backend can
//! implement the same traits without changing consumers.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{SceneError, Tile, TileHandle, TileScene};

pub fn crate_info() -> &'static str {
    "floatgrid-render v0.1.0"
}
