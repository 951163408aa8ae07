use floatgrid_common::{GridAxis, GridCoord, Tint};
use glam::DVec3;

/// A loaded cell: where it currently sits in world space, its tint, and the
/// handle of the renderable the engine created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<H> {
    pub position: DVec3,
    pub tint: Tint,
    pub handle: H,
}

/// Active-set storage keyed by grid coordinate.
///
/// A coordinate appears at most once. `insert` refuses rather than replaces,
/// handing the chunk back so its renderable can be released.
pub trait ChunkStore {
    /// Width of the coordinate keys.
    type Axis: GridAxis;
    /// Renderable handle carried by each chunk.
    type Handle;

    /// Whether this store can hold `coord` at all.
    fn in_bounds(&self, coord: GridCoord<Self::Axis>) -> bool;

    fn get(&self, coord: GridCoord<Self::Axis>) -> Option<&Chunk<Self::Handle>>;

    fn contains(&self, coord: GridCoord<Self::Axis>) -> bool {
        self.get(coord).is_some()
    }

    /// Store `chunk` at `coord`. Out-of-bounds or occupied coordinates give
    /// the chunk back in `Err`.
    fn insert(
        &mut self,
        coord: GridCoord<Self::Axis>,
        chunk: Chunk<Self::Handle>,
    ) -> Result<(), Chunk<Self::Handle>>;

    /// Remove and return the chunk at `coord`. Absent coordinates are a no-op.
    fn remove(&mut self, coord: GridCoord<Self::Axis>) -> Option<Chunk<Self::Handle>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = (GridCoord<Self::Axis>, &Chunk<Self::Handle>)>;

    fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (GridCoord<Self::Axis>, &mut Chunk<Self::Handle>)>;
}
