use floatgrid_common::CellCoord;

use crate::config::{ConfigError, MAX_GRID_EXTENT};
use crate::store::{Chunk, ChunkStore};

/// Fixed-size board of `extent × extent` cells.
///
/// Valid keys lie in `[-offset, extent - offset)` on both axes with
/// `offset = ceil(extent / 2)`. Cells outside the board never exist: they are
/// refused on insert and skipped by the streamer. All memory is allocated
/// up front.
#[derive(Debug)]
pub struct BoundedDenseStore<H> {
    extent: u32,
    offset: i32,
    slots: Vec<Option<Chunk<H>>>,
    len: usize,
}

impl<H> BoundedDenseStore<H> {
    pub fn new(extent: u32) -> Result<Self, ConfigError> {
        if extent == 0 {
            return Err(ConfigError::ZeroGridExtent);
        }
        if extent > MAX_GRID_EXTENT {
            return Err(ConfigError::GridExtentTooLarge(extent));
        }
        let cells = extent as usize * extent as usize;
        Ok(Self {
            extent,
            offset: extent.div_ceil(2) as i32,
            slots: std::iter::repeat_with(|| None).take(cells).collect(),
            len: 0,
        })
    }

    /// Inclusive lower and exclusive upper key bound on each axis.
    pub fn bounds(&self) -> (i32, i32) {
        (-self.offset, self.extent as i32 - self.offset)
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        slot_index(self.extent, self.offset, coord)
    }
}

fn slot_index(extent: u32, offset: i32, coord: CellCoord) -> Option<usize> {
    let extent = i64::from(extent);
    let i = i64::from(coord.x) + i64::from(offset);
    let j = i64::from(coord.z) + i64::from(offset);
    if (0..extent).contains(&i) && (0..extent).contains(&j) {
        Some((i * extent + j) as usize)
    } else {
        None
    }
}

fn slot_coord(extent: u32, offset: i32, index: usize) -> CellCoord {
    let extent = extent as usize;
    CellCoord::new(
        (index / extent) as i32 - offset,
        (index % extent) as i32 - offset,
    )
}

impl<H> ChunkStore for BoundedDenseStore<H> {
    type Axis = i32;
    type Handle = H;

    fn in_bounds(&self, coord: CellCoord) -> bool {
        self.index(coord).is_some()
    }

    fn get(&self, coord: CellCoord) -> Option<&Chunk<H>> {
        self.index(coord).and_then(|i| self.slots[i].as_ref())
    }

    fn insert(&mut self, coord: CellCoord, chunk: Chunk<H>) -> Result<(), Chunk<H>> {
        let Some(i) = self.index(coord) else {
            return Err(chunk);
        };
        let slot = &mut self.slots[i];
        if slot.is_some() {
            return Err(chunk);
        }
        *slot = Some(chunk);
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, coord: CellCoord) -> Option<Chunk<H>> {
        let i = self.index(coord)?;
        let chunk = self.slots[i].take()?;
        self.len -= 1;
        Some(chunk)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> impl Iterator<Item = (CellCoord, &Chunk<H>)> {
        let (extent, offset) = (self.extent, self.offset);
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_ref().map(|c| (slot_coord(extent, offset, i), c)))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (CellCoord, &mut Chunk<H>)> {
        let (extent, offset) = (self.extent, self.offset);
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_mut().map(|c| (slot_coord(extent, offset, i), c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatgrid_common::Tint;
    use glam::DVec3;

    fn chunk(handle: u32) -> Chunk<u32> {
        Chunk {
            position: DVec3::ZERO,
            tint: Tint::default(),
            handle,
        }
    }

    #[test]
    fn bounds_follow_extent() {
        let even = BoundedDenseStore::<u32>::new(10).unwrap();
        assert_eq!(even.bounds(), (-5, 5));
        let odd = BoundedDenseStore::<u32>::new(11).unwrap();
        assert_eq!(odd.bounds(), (-6, 5));
    }

    #[test]
    fn rejects_bad_extent() {
        assert!(matches!(
            BoundedDenseStore::<u32>::new(0),
            Err(ConfigError::ZeroGridExtent)
        ));
        assert!(matches!(
            BoundedDenseStore::<u32>::new(MAX_GRID_EXTENT + 1),
            Err(ConfigError::GridExtentTooLarge(_))
        ));
    }

    #[test]
    fn in_bounds_edges() {
        let store = BoundedDenseStore::<u32>::new(10).unwrap();
        assert!(store.in_bounds(CellCoord::new(-5, -5)));
        assert!(store.in_bounds(CellCoord::new(4, 4)));
        assert!(!store.in_bounds(CellCoord::new(5, 0)));
        assert!(!store.in_bounds(CellCoord::new(0, -6)));
        assert!(!store.in_bounds(CellCoord::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn insert_get_remove() {
        let mut store = BoundedDenseStore::new(10).unwrap();
        let c = CellCoord::new(-3, 2);
        assert!(store.insert(c, chunk(7)).is_ok());
        assert!(store.contains(c));
        assert_eq!(store.get(c).map(|ch| ch.handle), Some(7));
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(c).map(|ch| ch.handle), Some(7));
        assert!(store.is_empty());
    }

    #[test]
    fn out_of_bounds_insert_is_refused() {
        let mut store = BoundedDenseStore::new(4).unwrap();
        let refused = store.insert(CellCoord::new(100, 0), chunk(1)).unwrap_err();
        assert_eq!(refused.handle, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn occupied_insert_is_refused() {
        let mut store = BoundedDenseStore::new(4).unwrap();
        let c = CellCoord::new(0, 0);
        store.insert(c, chunk(1)).unwrap();
        let refused = store.insert(c, chunk(2)).unwrap_err();
        assert_eq!(refused.handle, 2);
        assert_eq!(store.get(c).map(|ch| ch.handle), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removing_absent_is_noop() {
        let mut store = BoundedDenseStore::<u32>::new(4).unwrap();
        assert!(store.remove(CellCoord::new(1, 1)).is_none());
        assert!(store.remove(CellCoord::new(99, 99)).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn iter_reports_keys() {
        let mut store = BoundedDenseStore::new(10).unwrap();
        store.insert(CellCoord::new(-5, 4), chunk(1)).unwrap();
        store.insert(CellCoord::new(2, -1), chunk(2)).unwrap();
        let mut keys: Vec<_> = store.iter().map(|(k, c)| (k, c.handle)).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![(CellCoord::new(-5, 4), 1), (CellCoord::new(2, -1), 2)]
        );
    }

    #[test]
    fn iter_mut_edits_in_place() {
        let mut store = BoundedDenseStore::new(10).unwrap();
        let c = CellCoord::new(1, 1);
        store.insert(c, chunk(1)).unwrap();
        for (_, ch) in store.iter_mut() {
            ch.position.x -= 10.0;
        }
        assert_eq!(store.get(c).unwrap().position.x, -10.0);
    }
}
