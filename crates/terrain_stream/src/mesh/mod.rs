//! Height map triangulation with seam-free normals.
//!
//! Input grids carry a one-sample border on every side. Border samples take
//! part in normal accumulation but never in the output triangles, so a tile
//! edge sees the same neighbourhood as the tile next to it. Coarse LODs take
//! their normals from that full-resolution surface.
//!
//! ```text
//!   B B B B B B B          B = border vertex (normals only)
//!   B i─i─i─i─i B          i = interior vertex (emitted)
//!   B │╲│╲│╲│╲│ B
//!   B i─i─i─i─i B          quad  a─b     triangles (a, d, c)
//!   B │╲│╲│╲│╲│ B                │╲│               (d, a, b)
//!   B i─i─i─i─i B                c─d
//!   B B B B B B B
//! ```
//!
//! - [`lattice`]: strided vertex lattice and triangle classification
//! - [`normals`]: smooth normals from interior and border faces, sampled
//!   from LOD 0 for coarser lattices
//! - [`flat_shading`]: per-triangle vertices for faceted output

pub mod flat_shading;
pub mod lattice;
pub mod normals;

use serde::{Deserialize, Serialize};

use crate::constants::{
  bordered_size, DEFAULT_MESH_SCALE, NUM_SUPPORTED_CHUNK_SIZES,
  NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES, SUPPORTED_CHUNK_SIZES,
};
use crate::types::{HeightMap, MeshPayload};

pub use lattice::{Lattice, VertexRef};

/// Tile sizing and shading options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
  /// World units between adjacent LOD 0 samples.
  pub mesh_scale: f32,
  pub use_flat_shading: bool,
  /// Index into [`SUPPORTED_CHUNK_SIZES`] for smooth shading.
  pub chunk_size_index: usize,
  /// Index into the first [`NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES`] sizes.
  pub flat_shaded_chunk_size_index: usize,
}

impl Default for MeshSettings {
  fn default() -> Self {
    Self {
      mesh_scale: DEFAULT_MESH_SCALE,
      use_flat_shading: false,
      chunk_size_index: NUM_SUPPORTED_CHUNK_SIZES - 1,
      flat_shaded_chunk_size_index: 0,
    }
  }
}

impl MeshSettings {
  pub fn with_mesh_scale(mut self, mesh_scale: f32) -> Self {
    self.mesh_scale = mesh_scale;
    self
  }

  pub fn with_flat_shading(mut self, use_flat_shading: bool) -> Self {
    self.use_flat_shading = use_flat_shading;
    self
  }

  pub fn with_chunk_size_index(mut self, index: usize) -> Self {
    self.chunk_size_index = index;
    self
  }

  pub fn with_flat_shaded_chunk_size_index(mut self, index: usize) -> Self {
    self.flat_shaded_chunk_size_index = index;
    self
  }

  /// Quads per tile edge at LOD 0.
  pub fn chunk_size(&self) -> usize {
    if self.use_flat_shading {
      let index = self
        .flat_shaded_chunk_size_index
        .min(NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES - 1);
      SUPPORTED_CHUNK_SIZES[index]
    } else {
      SUPPORTED_CHUNK_SIZES[self.chunk_size_index.min(NUM_SUPPORTED_CHUNK_SIZES - 1)]
    }
  }

  /// Samples per edge of the bordered height map a tile needs.
  pub fn num_verts_per_line(&self) -> usize {
    bordered_size(self.chunk_size())
  }

  /// Edge length of one tile in world units.
  pub fn mesh_world_size(&self) -> f32 {
    self.chunk_size() as f32 * self.mesh_scale
  }

  /// Clamp size indices into range and reset a non-positive scale.
  pub fn validate(&mut self) {
    self.chunk_size_index = self.chunk_size_index.min(NUM_SUPPORTED_CHUNK_SIZES - 1);
    self.flat_shaded_chunk_size_index = self
      .flat_shaded_chunk_size_index
      .min(NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES - 1);
    if !(self.mesh_scale > 0.0) {
      self.mesh_scale = DEFAULT_MESH_SCALE;
    }
  }
}

/// Triangulate a bordered height map at a LOD value.
///
/// # Panics
///
/// If the map is not square or the LOD stride does not divide the tile.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::build"))]
pub fn build(height_map: &HeightMap, lod: usize, settings: &MeshSettings) -> MeshPayload {
  let lattice = Lattice::build(height_map, lod, settings.mesh_scale);

  if settings.use_flat_shading {
    return flat_shading::expand(&lattice);
  }

  let normals = normals::sampled(height_map, &lattice, settings.mesh_scale);
  let Lattice {
    interior_positions,
    interior_uvs,
    interior_triangles,
    ..
  } = lattice;

  MeshPayload {
    positions: interior_positions.iter().map(|p| p.to_array()).collect(),
    normals,
    uvs: interior_uvs,
    indices: interior_triangles.into_iter().flatten().collect(),
    lod,
    flat_shaded: false,
  }
}
