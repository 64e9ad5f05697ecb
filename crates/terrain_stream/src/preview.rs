//! Single-shot, synchronous generation for editors and tools.
//!
//! Bypasses the scheduler entirely: everything runs on the calling thread
//! and the result is returned directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::TerrainSettings;
use crate::height_map;
use crate::mesh;
use crate::noise::falloff;
use crate::types::{HeightMap, MeshPayload};

/// What a preview shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
  /// Final heights of the tile at the origin, as a grid.
  #[default]
  NoiseMap,
  /// The island falloff mask alone.
  FalloffMap,
  /// Mesh of the tile at the origin.
  Mesh,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreviewOutput {
  Grid(HeightMap),
  Mesh(MeshPayload),
}

/// Height map and mesh for one tile centred at `sample_centre`.
///
/// # Panics
///
/// If `settings` carries an invalid LOD table or `lod` does not divide the
/// chunk size.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "preview::tile"))]
pub fn build_tile_synchronously(
  settings: &TerrainSettings,
  sample_centre: Vec2,
  lod: usize,
) -> MeshPayload {
  let mut settings = settings.clone();
  settings.validate();

  let size = settings.mesh.num_verts_per_line();
  let height_map = height_map::build(size, size, &settings.height_map, sample_centre);
  mesh::build(&height_map, lod, &settings.mesh)
}

/// Render one preview of the tile at the origin.
pub fn draw(settings: &TerrainSettings, mode: PreviewMode, lod: usize) -> PreviewOutput {
  let mut settings = settings.clone();
  settings.validate();
  let size = settings.mesh.num_verts_per_line();

  log::debug!("drawing {:?} preview ({}x{})", mode, size, size);

  match mode {
    PreviewMode::NoiseMap => PreviewOutput::Grid(height_map::build(
      size,
      size,
      &settings.height_map,
      Vec2::ZERO,
    )),
    PreviewMode::FalloffMap => {
      PreviewOutput::Grid(HeightMap::from_values(falloff::generate(size), size, size))
    }
    PreviewMode::Mesh => PreviewOutput::Mesh(build_tile_synchronously(&settings, Vec2::ZERO, lod)),
  }
}

/// Grayscale RGBA8 pixels for a grid, `min_height` black and `max_height`
/// white, row-major like the grid.
pub fn height_to_grayscale(grid: &HeightMap, min_height: f32, max_height: f32) -> Vec<u8> {
  let range = max_height - min_height;
  let mut pixels = Vec::with_capacity(grid.values.len() * 4);
  for &value in &grid.values {
    let t = if range.abs() > f32::EPSILON {
      ((value - min_height) / range).clamp(0.0, 1.0)
    } else {
      0.0
    };
    let level = (t * 255.0).round() as u8;
    pixels.extend_from_slice(&[level, level, level, u8::MAX]);
  }
  pixels
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;
