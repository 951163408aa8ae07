use std::collections::BTreeMap;

use floatgrid_common::{Tint, WideCellCoord};
use floatgrid_stream::{RenderBackend, SpawnRequest};
use glam::DVec3;

/// Opaque id of a live tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(pub u64);

/// One flat, tinted quad covering a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub coord: WideCellCoord,
    pub position: DVec3,
    pub scale: f64,
    pub tint: Tint,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("unknown tile handle {0:?}")]
    UnknownHandle(TileHandle),
    #[error("tile capacity of {0} exhausted")]
    CapacityExhausted(usize),
}

/// In-memory render backend: owns the tiles the streamer asks for.
#[derive(Debug, Default)]
pub struct TileScene {
    tiles: BTreeMap<TileHandle, Tile>,
    next_id: u64,
    capacity: Option<usize>,
    created: u64,
    destroyed: u64,
    shifts: u64,
}

impl TileScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene that refuses new tiles once `limit` are live.
    pub fn with_capacity(limit: usize) -> Self {
        Self {
            capacity: Some(limit),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, handle: TileHandle) -> Option<&Tile> {
        self.tiles.get(&handle)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileHandle, &Tile)> {
        self.tiles.iter().map(|(h, t)| (*h, t))
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    pub fn shifts(&self) -> u64 {
        self.shifts
    }
}

impl RenderBackend for TileScene {
    type Handle = TileHandle;
    type Error = SceneError;

    fn create_renderable(&mut self, request: &SpawnRequest) -> Result<TileHandle, SceneError> {
        if let Some(limit) = self.capacity.filter(|&l| self.tiles.len() >= l) {
            return Err(SceneError::CapacityExhausted(limit));
        }
        self.next_id += 1;
        let handle = TileHandle(self.next_id);
        self.tiles.insert(
            handle,
            Tile {
                coord: request.coord,
                position: request.position,
                scale: request.cell_size,
                tint: request.tint,
            },
        );
        self.created += 1;
        tracing::trace!(coord = %request.coord, ?handle, "tile created");
        Ok(handle)
    }

    fn destroy_renderable(&mut self, handle: TileHandle) -> Result<(), SceneError> {
        self.tiles
            .remove(&handle)
            .ok_or(SceneError::UnknownHandle(handle))?;
        self.destroyed += 1;
        Ok(())
    }

    fn shift_origin(&mut self, delta: DVec3) {
        for tile in self.tiles.values_mut() {
            tile.position -= delta;
        }
        self.shifts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(x: i64, z: i64) -> SpawnRequest {
        SpawnRequest {
            coord: WideCellCoord::new(x, z),
            position: DVec3::new(x as f64, 0.0, z as f64),
            cell_size: 1.0,
            tint: Tint::new(0.5, 0.25, 0.125),
        }
    }

    #[test]
    fn create_and_destroy_tiles() {
        let mut scene = TileScene::new();
        let a = scene.create_renderable(&request(0, 0)).unwrap();
        let b = scene.create_renderable(&request(1, 0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(b).unwrap().coord, WideCellCoord::new(1, 0));
        assert_eq!(scene.get(b).unwrap().scale, 1.0);

        scene.destroy_renderable(a).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.created(), 2);
        assert_eq!(scene.destroyed(), 1);
    }

    #[test]
    fn destroying_unknown_handle_fails() {
        let mut scene = TileScene::new();
        let err = scene.destroy_renderable(TileHandle(42)).unwrap_err();
        assert_eq!(err, SceneError::UnknownHandle(TileHandle(42)));
    }

    #[test]
    fn capacity_limits_live_tiles() {
        let mut scene = TileScene::with_capacity(1);
        let a = scene.create_renderable(&request(0, 0)).unwrap();
        assert_eq!(
            scene.create_renderable(&request(1, 0)),
            Err(SceneError::CapacityExhausted(1))
        );
        scene.destroy_renderable(a).unwrap();
        assert!(scene.create_renderable(&request(1, 0)).is_ok());
    }

    #[test]
    fn shift_moves_every_tile() {
        let mut scene = TileScene::new();
        let h = scene.create_renderable(&request(20_000, -3)).unwrap();
        scene.shift_origin(DVec3::new(20_000.0, 0.0, 0.0));
        assert_eq!(scene.get(h).unwrap().position, DVec3::new(0.0, 0.0, -3.0));
        assert_eq!(scene.shifts(), 1);
    }
}
