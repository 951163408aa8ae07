use std::time::Instant;

use floatgrid_common::math::{self, squared_distance, to_world_center};
use floatgrid_common::{GridCoord, MathError, Tint, WideCellCoord, WorldFrame};
use glam::DVec3;
use serde::Serialize;

use crate::attribute::tint_for;
use crate::backend::{RenderBackend, SpawnRequest, Viewpoint};
use crate::config::{ConfigError, StreamConfig};
use crate::dense::BoundedDenseStore;
use crate::shift::{OriginShift, OriginShifter};
use crate::sparse::SparseStore;
use crate::stats::{StreamStats, TickTimer};
use crate::store::{Chunk, ChunkStore};

/// Boxed collaborator error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while streaming.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("viewpoint position rejected: {0}")]
    Math(#[from] MathError),
    #[error("failed to create renderable for cell {coord}")]
    Spawn {
        coord: WideCellCoord,
        #[source]
        source: BoxError,
    },
    #[error("failed to destroy renderable for cell {coord}")]
    Despawn {
        coord: WideCellCoord,
        #[source]
        source: BoxError,
    },
}

impl StreamError {
    /// The cell a collaborator failure belongs to.
    pub fn coord(&self) -> Option<WideCellCoord> {
        match self {
            Self::Math(_) => None,
            Self::Spawn { coord, .. } | Self::Despawn { coord, .. } => Some(*coord),
        }
    }
}

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Cell became Loaded. `position` is in the frame the tick started in.
    Spawned {
        coord: WideCellCoord,
        position: DVec3,
        tint: Tint,
    },
    /// Cell became Unloaded.
    Despawned { coord: WideCellCoord },
    /// The world frame was re-based by `delta`; `offset` is the new frame offset.
    OriginShifted { delta: DVec3, offset: DVec3 },
}

/// Outcome of one tick.
#[derive(Debug)]
pub struct TickReport {
    /// Viewpoint cell at the start of the tick.
    pub active: WideCellCoord,
    pub events: Vec<StreamEvent>,
    /// Collaborator failures. The affected cells are left Unloaded.
    pub failures: Vec<StreamError>,
}

impl TickReport {
    fn new(active: WideCellCoord) -> Self {
        Self {
            active,
            events: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn spawned(&self) -> impl Iterator<Item = WideCellCoord> + '_ {
        self.events.iter().filter_map(|e| match e {
            StreamEvent::Spawned { coord, .. } => Some(*coord),
            _ => None,
        })
    }

    pub fn despawned(&self) -> impl Iterator<Item = WideCellCoord> + '_ {
        self.events.iter().filter_map(|e| match e {
            StreamEvent::Despawned { coord } => Some(*coord),
            _ => None,
        })
    }

    pub fn shift(&self) -> Option<OriginShift> {
        self.events.iter().find_map(|e| match e {
            StreamEvent::OriginShifted { delta, .. } => Some(OriginShift { delta: *delta }),
            _ => None,
        })
    }

    /// No spawns, despawns or shifts.
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty()
    }
}

/// Radius-streamed, floating-origin chunk set around a moving viewpoint.
///
/// Each tick scans the square window `active ± (radius_in_cells + margin)`,
/// loads cells whose center is within `load_radius` of the viewpoint (circular
/// test, inclusive) and unloads the ones outside it. Afterwards the origin
/// shifter may re-base the frame. Load-then-shift: the membership decided by
/// the scan is carried unchanged through the shift.
#[derive(Debug)]
pub struct ChunkStreamer<S> {
    config: StreamConfig,
    store: S,
    frame: WorldFrame,
    shifter: OriginShifter,
    stats: StreamStats,
    timer: TickTimer,
}

impl<H> ChunkStreamer<BoundedDenseStore<H>> {
    /// Streamer over a fixed `grid_extent × grid_extent` board.
    pub fn bounded(config: StreamConfig, grid_extent: u32) -> Result<Self, ConfigError> {
        Self::new(config, BoundedDenseStore::new(grid_extent)?)
    }
}

impl<H> ChunkStreamer<SparseStore<H>> {
    /// Streamer over an unbounded world.
    pub fn unbounded(config: StreamConfig) -> Result<Self, ConfigError> {
        Self::new(config, SparseStore::new())
    }
}

impl<S: ChunkStore> ChunkStreamer<S> {
    pub fn new(config: StreamConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.hysteresis_margin == 0 {
            tracing::warn!("hysteresis_margin is 0; cells at the load radius can be missed while moving");
        }
        Ok(Self {
            frame: WorldFrame::new(config.start_offset),
            shifter: OriginShifter::new(config.shift_threshold),
            config,
            store,
            stats: StreamStats::default(),
            timer: TickTimer::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn frame(&self) -> WorldFrame {
        self.frame
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Statistics from the last tick.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn loaded_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_loaded(&self, coord: WideCellCoord) -> bool {
        coord
            .narrow::<S::Axis>()
            .is_some_and(|key| self.store.contains(key))
    }

    pub fn chunk(&self, coord: WideCellCoord) -> Option<&Chunk<S::Handle>> {
        self.store.get(coord.narrow::<S::Axis>()?)
    }

    /// Cell containing `position` in the current frame.
    pub fn cell_at(&self, position: DVec3) -> Result<WideCellCoord, MathError> {
        math::to_grid_coord(position, &self.frame, self.config.cell_size)
    }

    /// Advance one step: stream the window around `viewpoint`, then re-base
    /// the frame if the viewpoint strayed past the shift threshold.
    ///
    /// A non-finite or out-of-range viewpoint fails before anything changes.
    /// Collaborator failures do not abort the tick; they are collected in
    /// [`TickReport::failures`].
    pub fn tick<B, V>(
        &mut self,
        backend: &mut B,
        viewpoint: &mut V,
    ) -> Result<TickReport, StreamError>
    where
        B: RenderBackend<Handle = S::Handle>,
        V: Viewpoint + ?Sized,
    {
        let _span = tracing::info_span!("stream_tick").entered();
        let started = Instant::now();

        let view = viewpoint.world_position();
        let active = self.cell_at(view)?;
        let mut report = TickReport::new(active);

        self.scan_window(active, view, backend, &mut report);
        if self.config.sweep_stale {
            self.sweep_stale(active, backend, &mut report);
        }

        let shifted = self
            .shifter
            .evaluate(view, active, &self.frame, self.config.cell_size);
        if let Some(shift) = shifted {
            self.frame = self.shifter.apply(&shift, &mut self.store, self.frame);
            backend.shift_origin(shift.delta);
            viewpoint.adjust_world_position(shift.delta);
            tracing::info!(delta = ?shift.delta, offset = ?self.frame.offset(), "origin shifted");
            report.events.push(StreamEvent::OriginShifted {
                delta: shift.delta,
                offset: self.frame.offset(),
            });
        }

        let tick_time = started.elapsed();
        self.timer.record(tick_time, shifted.is_some());
        self.stats = StreamStats {
            spawned_this_tick: report.spawned().count(),
            despawned_this_tick: report.despawned().count(),
            failures_this_tick: report.failures.len(),
            total_loaded: self.store.len(),
            total_shifts: self.stats.total_shifts + u64::from(shifted.is_some()),
            ticks: self.stats.ticks + 1,
            tick_time,
        };

        tracing::trace!(
            %active,
            spawned = self.stats.spawned_this_tick,
            despawned = self.stats.despawned_this_tick,
            total = self.stats.total_loaded,
            "stream tick complete"
        );

        Ok(report)
    }

    /// Release every loaded chunk, e.g. on shutdown. Returns collaborator
    /// failures; the store is empty afterwards regardless.
    pub fn unload_all<B>(&mut self, backend: &mut B) -> Vec<StreamError>
    where
        B: RenderBackend<Handle = S::Handle>,
    {
        let mut keys: Vec<_> = self.store.iter().map(|(key, _)| key).collect();
        keys.sort();
        let mut report = TickReport::new(WideCellCoord::default());
        for key in keys {
            self.unload(key.widen(), key, backend, &mut report);
        }
        self.stats.total_loaded = 0;
        report.failures
    }

    fn scan_window<B>(
        &mut self,
        active: WideCellCoord,
        view: DVec3,
        backend: &mut B,
        report: &mut TickReport,
    ) where
        B: RenderBackend<Handle = S::Handle>,
    {
        let reach = self.config.window_half_extent();
        let radius_sq = self.config.load_radius * self.config.load_radius;

        for x in active.x - reach..=active.x + reach {
            for z in active.z - reach..=active.z + reach {
                let coord = WideCellCoord::new(x, z);
                let Some(key) = coord.narrow::<S::Axis>() else {
                    continue;
                };
                if !self.store.in_bounds(key) {
                    continue;
                }
                let center = to_world_center(coord, &self.frame, self.config.cell_size);
                let inside = squared_distance(view, center) <= radius_sq;
                match (inside, self.store.contains(key)) {
                    (true, false) => self.load(coord, key, center, backend, report),
                    (false, true) => self.unload(coord, key, backend, report),
                    _ => {}
                }
            }
        }
    }

    /// Despawn loaded chunks the window no longer covers.
    fn sweep_stale<B>(&mut self, active: WideCellCoord, backend: &mut B, report: &mut TickReport)
    where
        B: RenderBackend<Handle = S::Handle>,
    {
        let reach = self.config.window_half_extent().unsigned_abs();
        let mut stale: Vec<_> = self
            .store
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.widen().chebyshev(active) > reach)
            .collect();
        stale.sort();
        for key in stale {
            self.unload(key.widen(), key, backend, report);
        }
    }

    fn load<B>(
        &mut self,
        coord: WideCellCoord,
        key: GridCoord<S::Axis>,
        position: DVec3,
        backend: &mut B,
        report: &mut TickReport,
    ) where
        B: RenderBackend<Handle = S::Handle>,
    {
        let tint = tint_for(coord);
        let request = SpawnRequest {
            coord,
            position,
            cell_size: self.config.cell_size,
            tint,
        };
        let handle = match backend.create_renderable(&request) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(%coord, error = %e, "renderable creation failed");
                report.failures.push(StreamError::Spawn {
                    coord,
                    source: Box::new(e),
                });
                return;
            }
        };

        let chunk = Chunk {
            position,
            tint,
            handle,
        };
        match self.store.insert(key, chunk) {
            Ok(()) => {
                tracing::debug!(%coord, "loading chunk");
                report.events.push(StreamEvent::Spawned {
                    coord,
                    position,
                    tint,
                });
            }
            Err(refused) => {
                // bounds and occupancy were checked by the scan
                tracing::error!(%coord, "store refused chunk; releasing its renderable");
                if let Err(e) = backend.destroy_renderable(refused.handle) {
                    report.failures.push(StreamError::Despawn {
                        coord,
                        source: Box::new(e),
                    });
                }
            }
        }
    }

    fn unload<B>(
        &mut self,
        coord: WideCellCoord,
        key: GridCoord<S::Axis>,
        backend: &mut B,
        report: &mut TickReport,
    ) where
        B: RenderBackend<Handle = S::Handle>,
    {
        let Some(chunk) = self.store.remove(key) else {
            return;
        };
        tracing::debug!(%coord, "unloading chunk");
        report.events.push(StreamEvent::Despawned { coord });
        if let Err(e) = backend.destroy_renderable(chunk.handle) {
            tracing::warn!(%coord, error = %e, "renderable destruction failed");
            report.failures.push(StreamError::Despawn {
                coord,
                source: Box::new(e),
            });
        }
    }
}
