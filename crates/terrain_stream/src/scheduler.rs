//! Background generation of height maps and meshes.
//!
//! ```text
//! Owning thread                       Worker pool (rayon, max_workers)
//! ┌──────────────────────┐
//! │ request_height_map() │──spawn──►  height_map::build ─┐
//! │ request_mesh()       │──spawn──►  mesh::build ───────┤
//! └──────────────────────┘                               │ send
//!                                                        ▼
//! ┌──────────────────────┐             crossbeam unbounded channel
//! │ drain()  (per tick)  │◄──────────────────────────────┘
//! │  - drop stale epochs │
//! │  - FIFO completions  │
//! └──────────────────────┘
//! ```
//!
//! Workers only see owned inputs (cloned settings, `Arc<HeightMap>`), so the
//! channel is the only shared state. A panicking job is logged by the pool's
//! panic handler and its result is simply never delivered.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, Sender, TryRecvError};
use glam::Vec2;
use thiserror::Error;
use web_time::Instant;

use crate::chunk::{MeshRequest, MeshRequester};
use crate::height_map::{self, HeightMapSettings};
use crate::mesh::{self, MeshSettings};
use crate::types::{ChunkCoord, HeightMap, MeshPayload};

/// Failure to start the worker pool.
#[derive(Error, Debug)]
pub enum SchedulerError {
  #[error("failed to start terrain worker pool: {0}")]
  WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Generation counter for detecting stale results.
///
/// Bumped on every rebuild; completions carrying an older epoch were
/// computed from settings that no longer apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub u64);

impl Epoch {
  pub fn new() -> Self {
    Self(0)
  }

  pub fn increment(&mut self) {
    self.0 += 1;
  }
}

/// Finished unit of work, routed back to its chunk by coordinate.
#[derive(Debug)]
pub enum GenerationResult {
  HeightMap {
    coord: ChunkCoord,
    height_map: Arc<HeightMap>,
  },
  Mesh {
    coord: ChunkCoord,
    lod_index: usize,
    mesh: Arc<MeshPayload>,
  },
}

impl GenerationResult {
  pub fn coord(&self) -> ChunkCoord {
    match self {
      GenerationResult::HeightMap { coord, .. } | GenerationResult::Mesh { coord, .. } => *coord,
    }
  }
}

/// Result plus bookkeeping.
#[derive(Debug)]
pub struct Completion {
  pub epoch: Epoch,
  pub result: GenerationResult,
  /// Time spent on the worker in microseconds.
  pub elapsed_us: u64,
}

/// Decrements the in-flight counter when a job ends, even by unwinding.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::AcqRel);
  }
}

/// Bounded worker pool plus completion channel.
pub struct GenerationScheduler {
  pool: rayon::ThreadPool,
  sender: Sender<Completion>,
  receiver: Receiver<Completion>,
  epoch: Epoch,
  in_flight: Arc<AtomicUsize>,
  height_map_settings: HeightMapSettings,
  mesh_settings: MeshSettings,
}

impl GenerationScheduler {
  /// Start `max_workers` (at least one) worker threads.
  pub fn new(
    max_workers: usize,
    height_map_settings: HeightMapSettings,
    mesh_settings: MeshSettings,
  ) -> Result<Self, SchedulerError> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(max_workers.max(1))
      .thread_name(|i| format!("terrain-gen-{i}"))
      .panic_handler(|payload| {
        let message = payload
          .downcast_ref::<&str>()
          .map(|s| s.to_string())
          .or_else(|| payload.downcast_ref::<String>().cloned())
          .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("terrain generation job panicked, result dropped: {message}");
      })
      .build()?;

    let (sender, receiver) = channel::unbounded();

    log::debug!("terrain scheduler started with {} workers", max_workers.max(1));

    Ok(Self {
      pool,
      sender,
      receiver,
      epoch: Epoch::new(),
      in_flight: Arc::new(AtomicUsize::new(0)),
      height_map_settings,
      mesh_settings,
    })
  }

  #[inline]
  pub fn epoch(&self) -> Epoch {
    self.epoch
  }

  pub fn height_map_settings(&self) -> &HeightMapSettings {
    &self.height_map_settings
  }

  pub fn mesh_settings(&self) -> &MeshSettings {
    &self.mesh_settings
  }

  /// Jobs submitted but not yet finished.
  #[inline]
  pub fn in_flight(&self) -> usize {
    self.in_flight.load(Ordering::Acquire)
  }

  /// No running jobs and nothing waiting to be drained.
  pub fn is_idle(&self) -> bool {
    self.in_flight() == 0 && self.receiver.is_empty()
  }

  /// Swap settings for future jobs and invalidate everything in flight.
  pub fn reconfigure(&mut self, height_map_settings: HeightMapSettings, mesh_settings: MeshSettings) {
    self.height_map_settings = height_map_settings;
    self.mesh_settings = mesh_settings;
    self.epoch.increment();
    log::debug!("terrain scheduler advanced to epoch {}", self.epoch.0);
  }

  /// Build the bordered height map for a chunk in the background.
  pub fn request_height_map(&self, coord: ChunkCoord, sample_centre: Vec2) {
    let settings = self.height_map_settings.clone();
    let size = self.mesh_settings.num_verts_per_line();

    self.spawn(move || {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("height_map_job").entered();
      let height_map = height_map::build(size, size, &settings, sample_centre);
      GenerationResult::HeightMap {
        coord,
        height_map: Arc::new(height_map),
      }
    });
  }

  /// All results delivered so far, in arrival order, minus stale ones.
  pub fn drain(&self) -> Vec<Completion> {
    let mut completions = Vec::new();
    loop {
      match self.receiver.try_recv() {
        Ok(completion) if completion.epoch == self.epoch => completions.push(completion),
        Ok(stale) => {
          log::trace!(
            "discarding stale result for chunk {} (epoch {} < {})",
            stale.result.coord(),
            stale.epoch.0,
            self.epoch.0
          );
        }
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
      }
    }
    completions
  }

  fn spawn<F>(&self, job: F)
  where
    F: FnOnce() -> GenerationResult + Send + 'static,
  {
    let sender = self.sender.clone();
    let epoch = self.epoch;
    self.in_flight.fetch_add(1, Ordering::AcqRel);
    let guard = InFlightGuard(Arc::clone(&self.in_flight));

    self.pool.spawn(move || {
      let _guard = guard;
      let start = Instant::now();
      let result = job();
      let elapsed_us = start.elapsed().as_micros() as u64;
      // Receiver gone means the service shut down
      let _ = sender.send(Completion {
        epoch,
        result,
        elapsed_us,
      });
    });
  }
}

impl MeshRequester for GenerationScheduler {
  fn request_mesh(&mut self, request: MeshRequest) {
    let settings = self.mesh_settings;
    let MeshRequest {
      coord,
      lod_index,
      lod,
      height_map,
    } = request;

    self.spawn(move || {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("mesh_job", lod).entered();
      let mesh = mesh::build(&height_map, lod, &settings);
      GenerationResult::Mesh {
        coord,
        lod_index,
        mesh: Arc::new(mesh),
      }
    });
  }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;
