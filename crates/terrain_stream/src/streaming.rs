//! Viewer-driven chunk streaming.
//!
//! # Flow (one tick)
//!
//! ```text
//! on_viewer_moved(position)
//!   │
//!   ├─ 1. drain completions (FIFO) ──► chunk.on_*_received
//!   │                                  chunk.update / update_collider
//!   │
//!   ├─ 2. update / update_collider on every visible chunk
//!   │
//!   └─ 3. first tick, or moved > viewer_move_threshold since last scan?
//!            └─ visit the window of ±ceil(max_view / chunk_size) chunks
//!                 around the viewer: update the rest, create missing
//! ```
//!
//! Only the window scan is gated by the move threshold; shown chunks
//! re-evaluate their LOD and collider against the viewer every tick.
//!
//! Chunks are hidden when out of range but never evicted, so returning to an
//! area reuses every mesh already built there.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::chunk::{TerrainChunk, VisibilityChange};
use crate::config::TerrainSettings;
use crate::metrics::StreamingMetrics;
use crate::presentation::ChunkPresenter;
use crate::scheduler::{Epoch, GenerationResult, GenerationScheduler, SchedulerError};
use crate::types::ChunkCoord;

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
  pub height_maps_applied: usize,
  pub meshes_applied: usize,
  pub chunks_created: usize,
  /// The chunk window was rescanned this tick.
  pub rescanned: bool,
  pub visible_chunks: usize,
}

/// Owns every chunk of one terrain and drives generation for a viewer.
///
/// Must be driven from a single thread; only the worker pool runs elsewhere.
pub struct TerrainStreamingService<P: ChunkPresenter> {
  settings: TerrainSettings,
  scheduler: GenerationScheduler,
  presenter: P,
  chunks: HashMap<ChunkCoord, TerrainChunk>,
  /// Shown chunks in the order they became visible.
  visible: Vec<ChunkCoord>,
  /// Membership of `visible`; entries hidden this tick are compacted out of
  /// the Vec at the end of the tick.
  visible_set: HashSet<ChunkCoord>,
  viewer_position: Vec2,
  last_scan_position: Option<Vec2>,
  metrics: StreamingMetrics,
}

impl<P: ChunkPresenter> TerrainStreamingService<P> {
  /// Validate settings and start the worker pool. No chunks exist until the
  /// first [`on_viewer_moved`](Self::on_viewer_moved).
  pub fn new(mut settings: TerrainSettings, presenter: P) -> Result<Self, SchedulerError> {
    settings.validate();
    let scheduler =
      GenerationScheduler::new(settings.max_workers, settings.height_map.clone(), settings.mesh)?;

    log::debug!(
      "terrain streaming started: chunk size {} ({} world units), view distance {}",
      settings.mesh.chunk_size(),
      settings.chunk_world_size(),
      settings.lods.max_view_distance()
    );

    Ok(Self {
      settings,
      scheduler,
      presenter,
      chunks: HashMap::new(),
      visible: Vec::new(),
      visible_set: HashSet::new(),
      viewer_position: Vec2::ZERO,
      last_scan_position: None,
      metrics: StreamingMetrics::new(),
    })
  }

  /// Advance streaming for the viewer's ground-plane position (world X/Z).
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "streaming::tick"))]
  pub fn on_viewer_moved(&mut self, position: Vec2) -> TickStats {
    self.viewer_position = position;
    let mut stats = TickStats::default();

    self.apply_completions(&mut stats);
    let mut evaluated = self.update_visible();

    let should_scan = match self.last_scan_position {
      None => true,
      Some(last) => last.distance_squared(position) > self.settings.sq_viewer_move_threshold(),
    };
    if should_scan {
      self.last_scan_position = Some(position);
      stats.chunks_created = self.scan_window(&mut evaluated);
      stats.rescanned = true;
    }

    self.compact_visible();
    stats.visible_chunks = self.visible.len();
    self
      .metrics
      .update_counts(self.chunks.len(), self.visible.len(), self.scheduler.in_flight());
    stats
  }

  /// Replace the settings and regenerate everything.
  ///
  /// `max_workers` is fixed for the lifetime of the service.
  pub fn on_config_changed(&mut self, mut settings: TerrainSettings) {
    settings.validate();
    if settings.max_workers != self.settings.max_workers {
      log::warn!(
        "max_workers change ({} -> {}) ignored until the service is recreated",
        self.settings.max_workers,
        settings.max_workers
      );
      settings.max_workers = self.settings.max_workers;
    }
    self.settings = settings;
    self.rebuild();
  }

  /// Drop every chunk and ignore all in-flight work; the next tick rescans.
  pub fn rebuild(&mut self) {
    self
      .scheduler
      .reconfigure(self.settings.height_map.clone(), self.settings.mesh);

    for coord in self.chunks.keys() {
      self.presenter.chunk_discarded(*coord);
    }
    log::debug!(
      "terrain rebuild: discarded {} chunks, epoch {}",
      self.chunks.len(),
      self.scheduler.epoch().0
    );

    self.chunks.clear();
    self.visible.clear();
    self.visible_set.clear();
    self.last_scan_position = None;
  }

  /// Stop streaming and hand the presenter back.
  ///
  /// Jobs still running finish on the pool; their results are dropped.
  pub fn shutdown(self) -> P {
    let Self {
      presenter,
      scheduler,
      chunks,
      ..
    } = self;
    log::debug!(
      "terrain streaming shut down with {} chunks, {} jobs in flight",
      chunks.len(),
      scheduler.in_flight()
    );
    drop(scheduler);
    presenter
  }

  pub fn settings(&self) -> &TerrainSettings {
    &self.settings
  }

  pub fn presenter(&self) -> &P {
    &self.presenter
  }

  pub fn presenter_mut(&mut self) -> &mut P {
    &mut self.presenter
  }

  pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
    self.chunks.get(&coord)
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  /// Chunks currently shown, in the order they became visible.
  pub fn visible_chunks(&self) -> &[ChunkCoord] {
    &self.visible
  }

  pub fn viewer_position(&self) -> Vec2 {
    self.viewer_position
  }

  pub fn epoch(&self) -> Epoch {
    self.scheduler.epoch()
  }

  /// No generation running and no results waiting.
  pub fn is_idle(&self) -> bool {
    self.scheduler.is_idle()
  }

  pub fn metrics(&self) -> &StreamingMetrics {
    &self.metrics
  }

  fn apply_completions(&mut self, stats: &mut TickStats) {
    for completion in self.scheduler.drain() {
      let coord = completion.result.coord();
      let Some(chunk) = self.chunks.get_mut(&coord) else {
        log::warn!("dropping result for unknown chunk {coord}");
        continue;
      };

      match completion.result {
        GenerationResult::HeightMap { height_map, .. } => {
          self.metrics.record_height_map(completion.elapsed_us);
          chunk.on_height_map_received(height_map);
          stats.height_maps_applied += 1;
        }
        GenerationResult::Mesh {
          lod_index, mesh, ..
        } => {
          self
            .metrics
            .record_mesh(mesh.lod, mesh.vertex_count(), completion.elapsed_us);
          chunk.on_mesh_received(lod_index, mesh);
          stats.meshes_applied += 1;
        }
      }

      self.update_chunk(coord);
      self.update_chunk_collider(coord);
    }
  }

  /// Re-evaluate every shown chunk, most recent first; returns the coords
  /// visited.
  fn update_visible(&mut self) -> HashSet<ChunkCoord> {
    let shown = self.visible.clone();
    let mut evaluated = HashSet::with_capacity(shown.len());
    for coord in shown.into_iter().rev() {
      if evaluated.insert(coord) {
        self.update_chunk(coord);
        self.update_chunk_collider(coord);
      }
    }
    evaluated
  }

  /// Visit the chunk window around the viewer, skipping coords already
  /// evaluated this tick; returns the number of chunks created.
  fn scan_window(&mut self, evaluated: &mut HashSet<ChunkCoord>) -> usize {
    let chunk_world_size = self.settings.chunk_world_size();
    let current = ChunkCoord::from_world(self.viewer_position, chunk_world_size);
    let radius = (self.settings.lods.max_view_distance() / chunk_world_size).ceil() as i32;

    let mut created = 0;
    for dy in -radius..=radius {
      for dx in -radius..=radius {
        let coord = current.offset(dx, dy);
        if !evaluated.insert(coord) {
          continue;
        }
        if self.chunks.contains_key(&coord) {
          self.update_chunk(coord);
          self.update_chunk_collider(coord);
        } else {
          self.create_chunk(coord);
          created += 1;
        }
      }
    }
    created
  }

  /// Drop hidden entries from the ordered list.
  fn compact_visible(&mut self) {
    if self.visible.len() == self.visible_set.len() {
      return;
    }
    let mut kept = HashSet::with_capacity(self.visible_set.len());
    self
      .visible
      .retain(|coord| self.visible_set.contains(coord) && kept.insert(*coord));
  }

  fn create_chunk(&mut self, coord: ChunkCoord) {
    let chunk_world_size = self.settings.chunk_world_size();
    let chunk = TerrainChunk::new(coord, chunk_world_size, self.settings.lods.len());
    self.chunks.insert(coord, chunk);
    self
      .presenter
      .chunk_created(coord, coord.world_centre(chunk_world_size));

    // Sample space is world space / mesh_scale; stay in integers for exact seams
    let sample_centre = coord.world_centre(self.settings.mesh.chunk_size() as f32);
    self.scheduler.request_height_map(coord, sample_centre);
    log::trace!("created chunk {coord}");
  }

  fn update_chunk(&mut self, coord: ChunkCoord) {
    let Some(chunk) = self.chunks.get_mut(&coord) else {
      return;
    };
    let change = chunk.update(
      self.viewer_position,
      &self.settings.lods,
      &mut self.scheduler,
      &mut self.presenter,
    );
    match change {
      Some(VisibilityChange::Shown) => {
        if self.visible_set.insert(coord) {
          self.visible.push(coord);
        }
      }
      Some(VisibilityChange::Hidden) => {
        self.visible_set.remove(&coord);
      }
      None => {}
    }
  }

  fn update_chunk_collider(&mut self, coord: ChunkCoord) {
    if let Some(chunk) = self.chunks.get_mut(&coord) {
      chunk.update_collider(
        self.viewer_position,
        &self.settings.lods,
        &mut self.scheduler,
        &mut self.presenter,
      );
    }
  }
}

#[cfg(test)]
#[path = "streaming_test.rs"]
mod streaming_test;
