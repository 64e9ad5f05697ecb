//! Per-chunk streaming state.
//!
//! ```text
//!  AwaitingHeightMap ──(height map)──► HeightMapReady
//!
//!  per LOD slot:   NotRequested ──request──► Pending ──result──► Ready
//!  visibility:     Hidden ◄──────────────────────────────────► Visible
//!  collider:       Unset ──(ready + within activation)──► Set (latched)
//! ```
//!
//! A chunk only ever asks for work through a [`MeshRequester`] and only
//! ever talks to the engine through a [`ChunkPresenter`], so tests can
//! drive it without threads.

use std::sync::Arc;

use glam::Vec2;
use smallvec::SmallVec;

use crate::config::LodSettings;
use crate::constants::NUM_SUPPORTED_LODS;
use crate::presentation::ChunkPresenter;
use crate::types::{ChunkBounds, ChunkCoord, HeightMap, MeshPayload};

/// Mesh cache entry for one detail level.
#[derive(Clone, Debug, Default)]
pub enum LodMeshSlot {
  #[default]
  NotRequested,
  Pending,
  Ready(Arc<MeshPayload>),
}

impl LodMeshSlot {
  #[inline]
  pub fn is_requested(&self) -> bool {
    !matches!(self, LodMeshSlot::NotRequested)
  }

  #[inline]
  pub fn mesh(&self) -> Option<&Arc<MeshPayload>> {
    match self {
      LodMeshSlot::Ready(mesh) => Some(mesh),
      _ => None,
    }
  }
}

/// Asynchronous mesh build for one chunk at one detail level.
#[derive(Clone, Debug)]
pub struct MeshRequest {
  pub coord: ChunkCoord,
  /// Index into the LOD table (result routing).
  pub lod_index: usize,
  /// LOD value to mesh at.
  pub lod: usize,
  pub height_map: Arc<HeightMap>,
}

/// Sink for mesh requests issued by chunks.
pub trait MeshRequester {
  fn request_mesh(&mut self, request: MeshRequest);
}

/// Visibility flip reported back to the chunk store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityChange {
  Shown,
  Hidden,
}

/// One tile of the streamed terrain.
#[derive(Debug)]
pub struct TerrainChunk {
  coord: ChunkCoord,
  bounds: ChunkBounds,
  height_map: Option<Arc<HeightMap>>,
  lod_meshes: SmallVec<[LodMeshSlot; NUM_SUPPORTED_LODS]>,
  displayed_lod_index: Option<usize>,
  visible: bool,
  has_collider: bool,
}

impl TerrainChunk {
  /// New hidden chunk awaiting its height map.
  pub fn new(coord: ChunkCoord, chunk_world_size: f32, lod_count: usize) -> Self {
    let centre = coord.world_centre(chunk_world_size);
    Self {
      coord,
      bounds: ChunkBounds::from_centre(centre, chunk_world_size),
      height_map: None,
      lod_meshes: (0..lod_count).map(|_| LodMeshSlot::NotRequested).collect(),
      displayed_lod_index: None,
      visible: false,
      has_collider: false,
    }
  }

  #[inline]
  pub fn coord(&self) -> ChunkCoord {
    self.coord
  }

  #[inline]
  pub fn bounds(&self) -> &ChunkBounds {
    &self.bounds
  }

  #[inline]
  pub fn is_visible(&self) -> bool {
    self.visible
  }

  #[inline]
  pub fn has_height_map(&self) -> bool {
    self.height_map.is_some()
  }

  #[inline]
  pub fn has_collider(&self) -> bool {
    self.has_collider
  }

  /// Index into the LOD table of the mesh currently shown.
  #[inline]
  pub fn displayed_lod_index(&self) -> Option<usize> {
    self.displayed_lod_index
  }

  pub fn lod_slot(&self, lod_index: usize) -> &LodMeshSlot {
    &self.lod_meshes[lod_index]
  }

  pub fn height_map(&self) -> Option<&Arc<HeightMap>> {
    self.height_map.as_ref()
  }

  pub fn on_height_map_received(&mut self, height_map: Arc<HeightMap>) {
    self.height_map = Some(height_map);
  }

  /// Store a finished mesh. Kept even if the chunk is hidden by now.
  pub fn on_mesh_received(&mut self, lod_index: usize, mesh: Arc<MeshPayload>) {
    debug_assert!(
      matches!(self.lod_meshes[lod_index], LodMeshSlot::Pending),
      "chunk {} received LOD slot {} it did not request",
      self.coord,
      lod_index
    );
    self.lod_meshes[lod_index] = LodMeshSlot::Ready(mesh);
  }

  /// Re-evaluate visibility and detail level for a viewer position.
  ///
  /// Does nothing until the height map has arrived. Returns the visibility
  /// flip, if any, so the owner can maintain its visible set.
  pub fn update(
    &mut self,
    viewer: Vec2,
    lods: &LodSettings,
    requester: &mut dyn MeshRequester,
    presenter: &mut dyn ChunkPresenter,
  ) -> Option<VisibilityChange> {
    if self.height_map.is_none() {
      return None;
    }

    let distance = self.bounds.distance(viewer);
    let visible = distance <= lods.max_view_distance();

    if visible {
      let lod_index = lods.select_lod_index(distance);
      if self.displayed_lod_index != Some(lod_index) {
        if let Some(mesh) = self.lod_meshes[lod_index].mesh() {
          let mesh = Arc::clone(mesh);
          self.displayed_lod_index = Some(lod_index);
          presenter.set_mesh(self.coord, mesh);
        } else {
          self.request_lod(lod_index, lods, requester);
        }
      }
    }

    if visible == self.visible {
      return None;
    }

    self.visible = visible;
    presenter.set_visible(self.coord, visible);
    Some(if visible {
      VisibilityChange::Shown
    } else {
      VisibilityChange::Hidden
    })
  }

  /// Request and assign the collision mesh once the viewer is within the
  /// activation distance.
  ///
  /// The request is shared with display when that LOD is already cached or
  /// pending. Assignment is one-way.
  pub fn update_collider(
    &mut self,
    viewer: Vec2,
    lods: &LodSettings,
    requester: &mut dyn MeshRequester,
    presenter: &mut dyn ChunkPresenter,
  ) {
    if self.has_collider || self.height_map.is_none() {
      return;
    }
    let Some(collider_index) = lods.collider_lod_index else {
      return;
    };

    let activation = lods.collider_activation_distance;
    if self.bounds.sq_distance(viewer) >= activation * activation {
      return;
    }

    self.request_lod(collider_index, lods, requester);
    if let Some(mesh) = self.lod_meshes[collider_index].mesh() {
      presenter.set_collision_mesh(self.coord, Arc::clone(mesh));
      self.has_collider = true;
    }
  }

  /// Issue a request for a level that has never been requested.
  fn request_lod(&mut self, lod_index: usize, lods: &LodSettings, requester: &mut dyn MeshRequester) {
    if self.lod_meshes[lod_index].is_requested() {
      return;
    }
    let Some(height_map) = &self.height_map else {
      return;
    };

    requester.request_mesh(MeshRequest {
      coord: self.coord,
      lod_index,
      lod: lods.levels[lod_index].lod,
      height_map: Arc::clone(height_map),
    });
    self.lod_meshes[lod_index] = LodMeshSlot::Pending;
  }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
