//! Shared types for the floatgrid crates: grid coordinates, the world frame,
//! per-cell tints and the pure coordinate math that ties them together.
//!
//! # Invariants
//! - Grid coordinates compare and hash structurally.
//! - Coordinate math never silently accepts NaN or infinite positions.

pub mod coord;
pub mod math;
pub mod types;

pub use coord::{CellCoord, GridAxis, GridCoord, WideCellCoord};
pub use math::MathError;
pub use types::{Tint, WorldFrame};

pub fn crate_info() -> &'static str {
    "floatgrid-common v0.1.0"
}
