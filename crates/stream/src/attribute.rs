//! Deterministic per-cell attributes.
//!
//! Everything here is a pure function of the cell coordinate. There is no
//! shared generator to reseed, so results do not depend on spawn order,
//! timing or earlier origin shifts.

use floatgrid_common::{Tint, WideCellCoord};

/// Odd multiplier folding the Z axis into the seed.
pub const AXIS_MIX: i64 = 317;

/// Fold a coordinate into a 64-bit seed: `x + z * 317`, then xorshift64.
pub fn coordinate_seed(coord: WideCellCoord) -> u64 {
    let mut seed = coord.x.wrapping_add(coord.z.wrapping_mul(AXIS_MIX)) as u64;
    seed ^= seed << 13;
    seed ^= seed >> 7;
    seed ^= seed << 17;
    seed
}

/// Splitmix64 stream seeded from a single cell.
#[derive(Debug, Clone)]
pub struct CoordRng {
    state: u64,
}

impl CoordRng {
    pub fn new(coord: WideCellCoord) -> Self {
        Self {
            state: coordinate_seed(coord),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` built from the top 24 bits.
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }
}

/// The tint of a cell. Same coordinate, same tint, bit for bit.
pub fn tint_for(coord: WideCellCoord) -> Tint {
    let mut rng = CoordRng::new(coord);
    let r = rng.next_unit();
    let g = rng.next_unit();
    let b = rng.next_unit();
    Tint::new(r, g, b)
}
