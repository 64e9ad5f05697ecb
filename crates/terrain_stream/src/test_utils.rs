//! Test fixtures shared across modules.
//!
//! Height map builders, a recording presenter and a request counter so
//! chunk and streaming logic can be exercised without an engine.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use web_time::Instant;

use crate::chunk::{MeshRequest, MeshRequester};
use crate::config::{LodInfo, LodSettings, TerrainSettings};
use crate::height_map::HeightMapSettings;
use crate::mesh::MeshSettings;
use crate::noise::NoiseSettings;
use crate::presentation::{Collidable, Renderable};
use crate::types::{ChunkCoord, HeightMap, MeshPayload};

// =============================================================================
// Height map fixtures
// =============================================================================

/// Square map with every sample at `value`.
pub fn flat_height_map(size: usize, value: f32) -> HeightMap {
  HeightMap::from_values(vec![value; size * size], size, size)
}

/// Square map rising along X: `height = x * slope`.
pub fn ramp_height_map(size: usize, slope: f32) -> HeightMap {
  let values = (0..size)
    .flat_map(|_| (0..size).map(move |x| x as f32 * slope))
    .collect();
  HeightMap::from_values(values, size, size)
}

/// Minimal mesh tagged with a LOD value.
pub fn tiny_mesh(lod: usize) -> Arc<MeshPayload> {
  Arc::new(MeshPayload {
    positions: vec![[0.0; 3]; 3],
    normals: vec![[0.0, 1.0, 0.0]; 3],
    uvs: vec![[0.0; 2]; 3],
    indices: vec![0, 1, 2],
    lod,
    flat_shaded: false,
  })
}

/// Poll `done` until it holds or 30 seconds pass; returns the final state.
pub fn wait_until(mut done: impl FnMut() -> bool) -> bool {
  let deadline = Instant::now() + Duration::from_secs(30);
  while Instant::now() < deadline {
    if done() {
      return true;
    }
    std::thread::sleep(Duration::from_millis(1));
  }
  done()
}

// =============================================================================
// Settings fixtures
// =============================================================================

/// Small, fast settings: 48-quad chunks at unit scale (48 world units),
/// view distance of two chunks.
pub fn small_settings() -> TerrainSettings {
  TerrainSettings::default()
    .with_max_workers(2)
    .with_viewer_move_threshold(10.0)
    .with_height_map(
      HeightMapSettings::default().with_noise(NoiseSettings::default().with_octaves(3)),
    )
    .with_mesh(
      MeshSettings::default()
        .with_chunk_size_index(0)
        .with_mesh_scale(1.0),
    )
    .with_lods(
      LodSettings::new(vec![
        LodInfo::new(0, 30.0),
        LodInfo::new(1, 60.0),
        LodInfo::new(2, 90.0),
      ])
      .with_collider(Some(0), 5.0),
    )
}

// =============================================================================
// Mock collaborators
// =============================================================================

/// Records every mesh request instead of building anything.
#[derive(Default)]
pub struct CountingRequester {
  pub requests: Vec<MeshRequest>,
}

impl CountingRequester {
  pub fn count_for(&self, lod_index: usize) -> usize {
    self
      .requests
      .iter()
      .filter(|r| r.lod_index == lod_index)
      .count()
  }
}

impl MeshRequester for CountingRequester {
  fn request_mesh(&mut self, request: MeshRequest) {
    self.requests.push(request);
  }
}

/// Presenter call, in the order received.
#[derive(Clone, Debug, PartialEq)]
pub enum PresenterEvent {
  Created(ChunkCoord, Vec2),
  Visible(ChunkCoord, bool),
  Mesh { coord: ChunkCoord, lod: usize },
  Collider { coord: ChunkCoord, lod: usize },
  Discarded(ChunkCoord),
}

/// Presenter that logs every call.
#[derive(Default)]
pub struct RecordingPresenter {
  pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
  pub fn mesh_events(&self, coord: ChunkCoord) -> Vec<usize> {
    self
      .events
      .iter()
      .filter_map(|e| match e {
        PresenterEvent::Mesh { coord: c, lod } if *c == coord => Some(*lod),
        _ => None,
      })
      .collect()
  }

  pub fn collider_count(&self, coord: ChunkCoord) -> usize {
    self
      .events
      .iter()
      .filter(|e| matches!(e, PresenterEvent::Collider { coord: c, .. } if *c == coord))
      .count()
  }

  pub fn created_count(&self) -> usize {
    self
      .events
      .iter()
      .filter(|e| matches!(e, PresenterEvent::Created(..)))
      .count()
  }

  pub fn clear(&mut self) {
    self.events.clear();
  }
}

impl Renderable for RecordingPresenter {
  fn chunk_created(&mut self, coord: ChunkCoord, world_centre: Vec2) {
    self.events.push(PresenterEvent::Created(coord, world_centre));
  }

  fn set_visible(&mut self, coord: ChunkCoord, visible: bool) {
    self.events.push(PresenterEvent::Visible(coord, visible));
  }

  fn set_mesh(&mut self, coord: ChunkCoord, mesh: Arc<MeshPayload>) {
    self.events.push(PresenterEvent::Mesh {
      coord,
      lod: mesh.lod,
    });
  }

  fn chunk_discarded(&mut self, coord: ChunkCoord) {
    self.events.push(PresenterEvent::Discarded(coord));
  }
}

impl Collidable for RecordingPresenter {
  fn set_collision_mesh(&mut self, coord: ChunkCoord, mesh: Arc<MeshPayload>) {
    self.events.push(PresenterEvent::Collider {
      coord,
      lod: mesh.lod,
    });
  }
}
