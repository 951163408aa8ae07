//! The two collaborators a streamer talks to: the engine that owns
//! renderables and the viewpoint that owns the camera position.

use floatgrid_common::{Tint, WideCellCoord};
use glam::DVec3;

/// Everything the engine needs to place a renderable for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub coord: WideCellCoord,
    /// Cell center in the current world frame.
    pub position: DVec3,
    /// Edge length of the cell, for scaling the renderable.
    pub cell_size: f64,
    pub tint: Tint,
}

/// Creates and destroys renderables on behalf of the streamer.
///
/// `create_renderable` is called at most once per Unloaded → Loaded transition
/// and every handle it returns is eventually passed to `destroy_renderable`.
pub trait RenderBackend {
    type Handle;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_renderable(&mut self, request: &SpawnRequest) -> Result<Self::Handle, Self::Error>;

    fn destroy_renderable(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;

    /// The world frame was re-based by `delta`; every live renderable should
    /// move by `-delta`. Engines that already follow chunk positions can
    /// ignore this.
    fn shift_origin(&mut self, _delta: DVec3) {}
}

/// Source of the viewpoint position, read once per tick.
pub trait Viewpoint {
    fn world_position(&self) -> DVec3;

    /// Subtract `delta` from the viewpoint position after an origin shift.
    fn adjust_world_position(&mut self, delta: DVec3);
}

impl Viewpoint for DVec3 {
    fn world_position(&self) -> DVec3 {
        *self
    }

    fn adjust_world_position(&mut self, delta: DVec3) {
        *self -= delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_position_is_a_viewpoint() {
        let mut eye = DVec3::new(105.0, 2.0, -3.0);
        eye.adjust_world_position(DVec3::new(100.0, 0.0, -3.0));
        assert_eq!(eye.world_position(), DVec3::new(5.0, 2.0, 0.0));
    }
}
