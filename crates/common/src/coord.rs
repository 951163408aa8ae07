use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Integer type usable as a grid axis.
///
/// All window arithmetic happens in `i64`; stores narrow the result into
/// their own axis type and skip coordinates that do not fit.
pub trait GridAxis:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Narrow a wide axis value. `None` when it does not fit.
    fn from_wide(value: i64) -> Option<Self>;

    /// Widen to `i64`. Never fails.
    fn to_wide(self) -> i64;
}

impl GridAxis for i32 {
    fn from_wide(value: i64) -> Option<Self> {
        i32::try_from(value).ok()
    }

    fn to_wide(self) -> i64 {
        i64::from(self)
    }
}

impl GridAxis for i64 {
    fn from_wide(value: i64) -> Option<Self> {
        Some(value)
    }

    fn to_wide(self) -> i64 {
        self
    }
}

/// A cell on the XZ ground plane. The Y axis is height and never partitioned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord<A> {
    pub x: A,
    pub z: A,
}

/// 32-bit coordinate used by the bounded, fixed-size board.
pub type CellCoord = GridCoord<i32>;

/// 64-bit coordinate for effectively unbounded worlds.
pub type WideCellCoord = GridCoord<i64>;

impl<A: GridAxis> GridCoord<A> {
    pub fn new(x: A, z: A) -> Self {
        Self { x, z }
    }

    pub fn widen(self) -> WideCellCoord {
        GridCoord {
            x: self.x.to_wide(),
            z: self.z.to_wide(),
        }
    }
}

impl WideCellCoord {
    /// Narrow into another axis width, `None` if either axis overflows it.
    pub fn narrow<B: GridAxis>(self) -> Option<GridCoord<B>> {
        Some(GridCoord {
            x: B::from_wide(self.x)?,
            z: B::from_wide(self.z)?,
        })
    }

    /// Chebyshev (square window) distance between two cells.
    pub fn chebyshev(self, other: WideCellCoord) -> u64 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

impl<A: fmt::Display> fmt::Display for GridCoord<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_fits_and_overflows() {
        let small = WideCellCoord::new(-5, 7);
        assert_eq!(small.narrow::<i32>(), Some(CellCoord::new(-5, 7)));

        let big = WideCellCoord::new(i64::from(i32::MAX) + 1, 0);
        assert_eq!(big.narrow::<i32>(), None);
        assert_eq!(big.narrow::<i64>(), Some(big));
    }

    #[test]
    fn widen_roundtrips() {
        let c = CellCoord::new(i32::MIN, i32::MAX);
        assert_eq!(c.widen().narrow::<i32>(), Some(c));
    }

    #[test]
    fn chebyshev_is_square_distance() {
        let a = WideCellCoord::new(0, 0);
        assert_eq!(a.chebyshev(WideCellCoord::new(3, -7)), 7);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn display_format() {
        assert_eq!(CellCoord::new(1, -2).to_string(), "(1, -2)");
    }
}
