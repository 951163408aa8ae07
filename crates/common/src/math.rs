//! World position ↔ grid coordinate conversion on the XZ ground plane.

use glam::DVec3;

use crate::coord::WideCellCoord;
use crate::types::WorldFrame;

/// Largest grid axis magnitude that still round-trips exactly through `f64`.
pub const MAX_GRID_AXIS: i64 = 1 << 53;

/// Errors from coordinate math.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("non-finite position ({x}, {y}, {z})")]
    NonFinite { x: f64, y: f64, z: f64 },
    #[error("grid axis value {0} exceeds ±2^53")]
    OutOfRange(f64),
}

/// Reject positions containing NaN or infinity.
pub fn ensure_finite(pos: DVec3) -> Result<(), MathError> {
    if pos.is_finite() {
        Ok(())
    } else {
        Err(MathError::NonFinite {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        })
    }
}

/// Cell containing `world`: `round((world - offset) / cell_size)` per axis,
/// ties to even.
pub fn to_grid_coord(
    world: DVec3,
    frame: &WorldFrame,
    cell_size: f64,
) -> Result<WideCellCoord, MathError> {
    ensure_finite(world)?;
    let local = (world - frame.offset()) / cell_size;
    Ok(WideCellCoord {
        x: round_axis(local.x)?,
        z: round_axis(local.z)?,
    })
}

/// World-space center of `coord`: `coord * cell_size + offset`, at height zero.
pub fn to_world_center(coord: WideCellCoord, frame: &WorldFrame, cell_size: f64) -> DVec3 {
    let offset = frame.offset();
    DVec3::new(
        coord.x as f64 * cell_size + offset.x,
        0.0,
        coord.z as f64 * cell_size + offset.z,
    )
}

/// Squared distance on the ground plane. Height is ignored.
pub fn squared_distance(a: DVec3, b: DVec3) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

fn round_axis(value: f64) -> Result<i64, MathError> {
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded.abs() >= MAX_GRID_AXIS as f64 {
        return Err(MathError::OutOfRange(value));
    }
    Ok(rounded as i64)
}
