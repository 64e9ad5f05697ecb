//! Core data types shared by generation and streaming.

use glam::{IVec2, Vec2};

/// Integer coordinate of a chunk in the streaming grid.
///
/// Chunk `(x, y)` is centred at `(x, y) * chunk_world_size` on the ground
/// plane (world X/Z).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord(pub IVec2);

impl ChunkCoord {
  #[inline]
  pub const fn new(x: i32, y: i32) -> Self {
    Self(IVec2::new(x, y))
  }

  #[inline]
  pub fn x(self) -> i32 {
    self.0.x
  }

  #[inline]
  pub fn y(self) -> i32 {
    self.0.y
  }

  /// Chunk containing (nearest to) a ground-plane position.
  #[inline]
  pub fn from_world(position: Vec2, chunk_world_size: f32) -> Self {
    let scaled = (position / chunk_world_size).round();
    Self(scaled.as_ivec2())
  }

  /// World-space centre of this chunk.
  #[inline]
  pub fn world_centre(self, chunk_world_size: f32) -> Vec2 {
    self.0.as_vec2() * chunk_world_size
  }

  /// Coordinate shifted by an offset.
  #[inline]
  pub fn offset(self, dx: i32, dy: i32) -> Self {
    Self(self.0 + IVec2::new(dx, dy))
  }
}

impl std::fmt::Display for ChunkCoord {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.0.x, self.0.y)
  }
}

/// Square ground-plane bounds of a chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkBounds {
  pub min: Vec2,
  pub max: Vec2,
}

impl ChunkBounds {
  /// Bounds centred at `centre` with edge length `size`.
  pub fn from_centre(centre: Vec2, size: f32) -> Self {
    let half = Vec2::splat(size * 0.5);
    Self {
      min: centre - half,
      max: centre + half,
    }
  }

  #[inline]
  pub fn centre(&self) -> Vec2 {
    (self.min + self.max) * 0.5
  }

  /// Squared distance from a point to the nearest edge (0 inside).
  #[inline]
  pub fn sq_distance(&self, point: Vec2) -> f32 {
    let closest = point.clamp(self.min, self.max);
    (point - closest).length_squared()
  }

  /// Distance from a point to the nearest edge (0 inside).
  #[inline]
  pub fn distance(&self, point: Vec2) -> f32 {
    self.sq_distance(point).sqrt()
  }
}

/// Row-major grid of height samples.
///
/// `min_value` / `max_value` are observed after curve application and feed
/// material height ranges and preview textures.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
  pub values: Vec<f32>,
  pub width: usize,
  pub height: usize,
  pub min_value: f32,
  pub max_value: f32,
}

impl HeightMap {
  /// Wrap a grid, computing its value range.
  pub fn from_values(values: Vec<f32>, width: usize, height: usize) -> Self {
    assert_eq!(
      values.len(),
      width * height,
      "height map has {} values, expected {}x{}",
      values.len(),
      width,
      height
    );
    let (min_value, max_value) = value_range(&values);
    Self {
      values,
      width,
      height,
      min_value,
      max_value,
    }
  }

  #[inline]
  pub fn index(&self, x: usize, y: usize) -> usize {
    y * self.width + x
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize) -> f32 {
    self.values[self.index(x, y)]
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// Minimum and maximum of a slice; `(0, 0)` when empty.
pub(crate) fn value_range(values: &[f32]) -> (f32, f32) {
  if values.is_empty() {
    return (0.0, 0.0);
  }
  values
    .iter()
    .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Triangle mesh for one chunk at one LOD.
///
/// Immutable once built; shared between the chunk's LOD cache, the
/// presenter and the collider as `Arc<MeshPayload>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPayload {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub uvs: Vec<[f32; 2]>,
  pub indices: Vec<u32>,
  /// LOD value the mesh was built at.
  pub lod: usize,
  /// True when every triangle owns its three vertices.
  pub flat_shaded: bool,
}

impl MeshPayload {
  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
