use floatgrid_common::math::MAX_GRID_AXIS;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Largest allowed window half-extent in cells. Keeps a tick bounded.
pub const MAX_WINDOW_HALF_EXTENT: i64 = 1024;

/// Largest allowed side of the bounded dense board.
pub const MAX_GRID_EXTENT: u32 = 4096;

/// Configuration errors. All of them are reported at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cell_size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("load_radius must be non-negative and finite, got {0}")]
    InvalidLoadRadius(f64),
    #[error("start_offset must be finite, got {0}")]
    InvalidStartOffset(DVec3),
    #[error("shift_threshold ({threshold}) must be finite and at least one cell ({cell_size})")]
    InvalidShiftThreshold { threshold: f64, cell_size: f64 },
    #[error("shift_threshold ({threshold}) spans 2^53 or more cells of size {cell_size}")]
    ShiftThresholdOutOfRange { threshold: f64, cell_size: f64 },
    #[error("start_offset {offset} lies 2^53 or more cells of size {cell_size} from the origin")]
    StartOffsetOutOfRange { offset: DVec3, cell_size: f64 },
    #[error("scan window half-extent {0} exceeds {MAX_WINDOW_HALF_EXTENT} cells")]
    WindowTooLarge(i64),
    #[error("grid_extent must be at least 1")]
    ZeroGridExtent,
    #[error("grid_extent {0} exceeds {MAX_GRID_EXTENT}")]
    GridExtentTooLarge(u32),
}

/// Streaming configuration: cell geometry, load radius, hysteresis and the
/// origin-shift threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// World units per cell edge.
    pub cell_size: f64,
    /// Initial world frame offset. Height is ignored.
    pub start_offset: DVec3,
    /// Circular load radius in world units.
    pub load_radius: f64,
    /// Extra cells scanned beyond the load radius on each side.
    pub hysteresis_margin: u32,
    /// Distance from the world origin (world units) past which the frame is re-based.
    pub shift_threshold: f64,
    /// Despawn loaded chunks that fall outside the scan window.
    pub sweep_stale: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            start_offset: DVec3::ZERO,
            load_radius: 5.0,
            hysteresis_margin: 1,
            shift_threshold: 10_000.0,
            sweep_stale: false,
        }
    }
}

impl StreamConfig {
    /// Check every field. Called by the streamer before it accepts a config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(self.load_radius.is_finite() && self.load_radius >= 0.0) {
            return Err(ConfigError::InvalidLoadRadius(self.load_radius));
        }
        if !self.start_offset.is_finite() {
            return Err(ConfigError::InvalidStartOffset(self.start_offset));
        }
        if !(self.shift_threshold.is_finite() && self.shift_threshold >= self.cell_size) {
            return Err(ConfigError::InvalidShiftThreshold {
                threshold: self.shift_threshold,
                cell_size: self.cell_size,
            });
        }
        // grid axes must stay exact in f64 anywhere the viewpoint may be
        // before the first shift
        let max_axis = MAX_GRID_AXIS as f64;
        if self.shift_threshold / self.cell_size >= max_axis {
            return Err(ConfigError::ShiftThresholdOutOfRange {
                threshold: self.shift_threshold,
                cell_size: self.cell_size,
            });
        }
        let offset_cells =
            self.start_offset.x.abs().max(self.start_offset.z.abs()) / self.cell_size;
        if offset_cells >= max_axis {
            return Err(ConfigError::StartOffsetOutOfRange {
                offset: self.start_offset,
                cell_size: self.cell_size,
            });
        }
        let cells = (self.load_radius / self.cell_size).round_ties_even();
        let half_extent = cells + f64::from(self.hysteresis_margin);
        if half_extent > MAX_WINDOW_HALF_EXTENT as f64 {
            return Err(ConfigError::WindowTooLarge(half_extent as i64));
        }
        Ok(())
    }

    /// `round(load_radius / cell_size)`.
    pub fn radius_in_cells(&self) -> i64 {
        (self.load_radius / self.cell_size).round_ties_even() as i64
    }

    /// Half-extent of the square scan window: radius in cells plus margin.
    pub fn window_half_extent(&self) -> i64 {
        self.radius_in_cells() + i64::from(self.hysteresis_margin)
    }
}

/// Active-set storage strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreKind {
    /// Fixed `grid_extent × grid_extent` board centered on cell (0, 0).
    Bounded { grid_extent: u32 },
    /// Hash map keyed by 64-bit coordinates.
    #[default]
    Unbounded,
}
