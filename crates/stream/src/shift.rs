use floatgrid_common::math::{squared_distance, to_world_center};
use floatgrid_common::{WideCellCoord, WorldFrame};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::store::ChunkStore;

/// A pending re-base of the world frame by `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginShift {
    /// World position of the viewpoint's active cell; subtracted from
    /// everything.
    pub delta: DVec3,
}

/// Floating-origin controller.
///
/// Once the viewpoint strays further than `threshold` from the world origin,
/// the frame is re-based onto the viewpoint's active cell so positions stay
/// near zero where `f64`/`f32` precision is best.
#[derive(Debug, Clone, Copy)]
pub struct OriginShifter {
    threshold_sq: f64,
}

impl OriginShifter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold_sq: threshold * threshold,
        }
    }

    /// Decide whether this tick re-bases. The shift snaps to the center of
    /// `active`, never to the raw sub-cell viewpoint position.
    pub fn evaluate(
        &self,
        viewpoint: DVec3,
        active: WideCellCoord,
        frame: &WorldFrame,
        cell_size: f64,
    ) -> Option<OriginShift> {
        if squared_distance(viewpoint, DVec3::ZERO) <= self.threshold_sq {
            return None;
        }
        Some(OriginShift {
            delta: to_world_center(active, frame, cell_size),
        })
    }

    /// Translate every loaded chunk by `-delta` and return the re-based frame.
    ///
    /// Keys are untouched. Infallible, so a shift is never half applied.
    pub fn apply<S: ChunkStore>(
        &self,
        shift: &OriginShift,
        store: &mut S,
        frame: WorldFrame,
    ) -> WorldFrame {
        for (_, chunk) in store.iter_mut() {
            chunk.position -= shift.delta;
        }
        frame.translated(shift.delta)
    }
}
