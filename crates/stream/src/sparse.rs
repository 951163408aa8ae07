use std::collections::HashMap;

use floatgrid_common::WideCellCoord;

use crate::store::{Chunk, ChunkStore};

/// Hash map keyed by 64-bit coordinates. No range restriction; memory grows
/// with the number of loaded chunks, not with the size of the world.
#[derive(Debug)]
pub struct SparseStore<H> {
    chunks: HashMap<WideCellCoord, Chunk<H>>,
}

impl<H> SparseStore<H> {
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
        }
    }
}

impl<H> Default for SparseStore<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ChunkStore for SparseStore<H> {
    type Axis = i64;
    type Handle = H;

    fn in_bounds(&self, _coord: WideCellCoord) -> bool {
        true
    }

    fn get(&self, coord: WideCellCoord) -> Option<&Chunk<H>> {
        self.chunks.get(&coord)
    }

    fn insert(&mut self, coord: WideCellCoord, chunk: Chunk<H>) -> Result<(), Chunk<H>> {
        if self.chunks.contains_key(&coord) {
            return Err(chunk);
        }
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    fn remove(&mut self, coord: WideCellCoord) -> Option<Chunk<H>> {
        self.chunks.remove(&coord)
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn iter(&self) -> impl Iterator<Item = (WideCellCoord, &Chunk<H>)> {
        self.chunks.iter().map(|(k, c)| (*k, c))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (WideCellCoord, &mut Chunk<H>)> {
        self.chunks.iter_mut().map(|(k, c)| (*k, c))
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
    fn accepts_far_coordinates() {
        let mut store = SparseStore::new();
        let far = WideCellCoord::new(i64::MAX - 1, i64::MIN + 1);
        assert!(store.in_bounds(far));
        store.insert(far, chunk(1)).unwrap();
        assert!(store.contains(far));
    }

    #[test]
    fn occupied_insert_is_refused() {
        let mut store = SparseStore::new();
        let c = WideCellCoord::new(3, 3);
        store.insert(c, chunk(1)).unwrap();
        assert_eq!(store.insert(c, chunk(2)).unwrap_err().handle, 2);
        assert_eq!(store.get(c).map(|ch| ch.handle), Some(1));
    }

    #[test]
    fn removing_absent_is_noop() {
        let mut store = SparseStore::<u32>::new();
        assert!(store.remove(WideCellCoord::new(0, 0)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn memory_tracks_loaded_chunks() {
        let mut store = SparseStore::new();
        for i in 0..10 {
            store.insert(WideCellCoord::new(i * 1_000_000, 0), chunk(i as u32)).unwrap();
        }
        assert_eq!(store.len(), 10);
        store.remove(WideCellCoord::new(0, 0));
        assert_eq!(store.len(), 9);
        assert_eq!(store.iter().count(), 9);
    }
}
