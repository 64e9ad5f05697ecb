//! Engine-agnostic streaming statistics.
//!
//! Feature-gated and runtime-toggled so there is no cost when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use terrain_stream::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = service.metrics();
//! println!("avg mesh {:.1}us", metrics.avg_mesh_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::constants::NUM_SUPPORTED_LODS;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.buffer.iter().sum::<u64>() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Counters and timing history of a streaming service.
#[derive(Debug, Clone, Default)]
pub struct StreamingMetrics {
  // Timing
  pub height_map_timings: RollingWindow<u64>,
  pub mesh_timings: RollingWindow<u64>,
  pub last_height_map_us: u64,
  pub last_mesh_us: u64,

  // Totals (cumulative across rebuilds)
  pub total_height_maps: u64,
  pub total_meshes: u64,
  /// Meshes built per LOD value.
  pub meshes_per_lod: [u64; NUM_SUPPORTED_LODS],
  /// Vertices built per LOD value.
  pub vertices_per_lod: [u64; NUM_SUPPORTED_LODS],

  // Snapshot of the last tick
  pub live_chunks: usize,
  pub visible_chunks: usize,
  pub in_flight_jobs: usize,
}

impl StreamingMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_height_map(&mut self, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    self.height_map_timings.push(timing_us);
    self.last_height_map_us = timing_us;
    self.total_height_maps += 1;
  }

  pub fn record_mesh(&mut self, lod: usize, vertex_count: usize, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    self.mesh_timings.push(timing_us);
    self.last_mesh_us = timing_us;
    self.total_meshes += 1;

    let lod = lod.min(NUM_SUPPORTED_LODS - 1);
    self.meshes_per_lod[lod] += 1;
    self.vertices_per_lod[lod] += vertex_count as u64;
  }

  pub fn update_counts(&mut self, live_chunks: usize, visible_chunks: usize, in_flight_jobs: usize) {
    if !is_enabled() {
      return;
    }
    self.live_chunks = live_chunks;
    self.visible_chunks = visible_chunks;
    self.in_flight_jobs = in_flight_jobs;
  }

  pub fn avg_height_map_timing_us(&self) -> f64 {
    self.height_map_timings.average()
  }

  pub fn avg_mesh_timing_us(&self) -> f64 {
    self.mesh_timings.average()
  }

  /// Clear timings and the snapshot; totals are kept.
  pub fn reset(&mut self) {
    self.height_map_timings.clear();
    self.mesh_timings.clear();
    self.last_height_map_us = 0;
    self.last_mesh_us = 0;
    self.live_chunks = 0;
    self.visible_chunks = 0;
    self.in_flight_jobs = 0;
  }
}
