use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The active coordinate origin.
///
/// Grid-space positions plus `offset` give world-space positions. The Y component
/// is always zero: the frame lives on the XZ ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldFrame {
    offset: DVec3,
}

impl WorldFrame {
    pub fn new(offset: DVec3) -> Self {
        Self {
            offset: DVec3::new(offset.x, 0.0, offset.z),
        }
    }

    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    /// The frame after re-basing by `delta`: `offset - delta`.
    pub fn translated(self, delta: DVec3) -> Self {
        Self::new(self.offset - delta)
    }
}

/// Per-cell color derived from the cell coordinate. Channels are in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_default_is_origin() {
        assert_eq!(WorldFrame::default().offset(), DVec3::ZERO);
    }

    #[test]
    fn frame_drops_height() {
        let frame = WorldFrame::new(DVec3::new(3.0, 9.0, -4.0));
        assert_eq!(frame.offset(), DVec3::new(3.0, 0.0, -4.0));
    }

    #[test]
    fn translated_subtracts_delta() {
        let frame = WorldFrame::new(DVec3::new(10.0, 0.0, 5.0));
        let moved = frame.translated(DVec3::new(4.0, 0.0, -1.0));
        assert_eq!(moved.offset(), DVec3::new(6.0, 0.0, 6.0));
    }
}
