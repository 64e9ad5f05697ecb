//! Strided vertex lattice over a bordered height map.
//!
//! Along each axis the lattice visits
//!
//! ```text
//! {0} ∪ {1 + k·stride | k ∈ [0, n)} ∪ {B - 1}      n = (S - 1) / stride + 1
//! ```
//!
//! so the outermost interior samples (1 and S) are always on the lattice and
//! tile edges line up at every LOD. Points on the outer ring are border
//! vertices.

use glam::Vec3A;

use crate::constants::lod_stride;
use crate::types::HeightMap;

/// Reference into one of the two vertex arrays of a [`Lattice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexRef {
  Interior(u32),
  Border(u32),
}

impl VertexRef {
  #[inline]
  pub fn is_border(self) -> bool {
    matches!(self, VertexRef::Border(_))
  }
}

/// Vertices and triangles of one tile before output assembly.
#[derive(Clone, Debug)]
pub struct Lattice {
  pub interior_positions: Vec<Vec3A>,
  pub interior_uvs: Vec<[f32; 2]>,
  pub border_positions: Vec<Vec3A>,
  /// Triangles made only of interior vertices (emitted).
  pub interior_triangles: Vec<[u32; 3]>,
  /// Triangles touching the border (normals only).
  pub border_triangles: Vec<[VertexRef; 3]>,
  /// Interior vertices per edge.
  pub verts_per_line: usize,
  pub lod: usize,
}

impl Lattice {
  /// Walk `height_map` at the stride of `lod`.
  ///
  /// # Panics
  ///
  /// If the map is not square, is smaller than 4x4, or the stride does not
  /// divide the interior edge.
  pub fn build(height_map: &HeightMap, lod: usize, mesh_scale: f32) -> Self {
    assert_eq!(
      height_map.width, height_map.height,
      "terrain tiles must be square, got {}x{}",
      height_map.width, height_map.height
    );
    let bordered = height_map.width;
    assert!(
      bordered >= 4,
      "bordered tile needs at least 4 samples per edge, got {}",
      bordered
    );

    let interior = bordered - 2;
    let stride = lod_stride(lod);
    assert!(
      (interior - 1) % stride == 0,
      "LOD {} stride {} does not divide a tile of {} quads",
      lod,
      stride,
      interior - 1
    );

    let axis = axis_samples(bordered, stride);
    let lattice_size = axis.len();
    let verts_per_line = lattice_size - 2;
    let half = (interior - 1) as f32 / 2.0;
    let uv_span = (verts_per_line - 1) as f32;

    let border_count = lattice_size * lattice_size - verts_per_line * verts_per_line;
    let mut interior_positions = Vec::with_capacity(verts_per_line * verts_per_line);
    let mut interior_uvs = Vec::with_capacity(verts_per_line * verts_per_line);
    let mut border_positions = Vec::with_capacity(border_count);
    let mut refs = Vec::with_capacity(lattice_size * lattice_size);

    for (ly, &sy) in axis.iter().enumerate() {
      for (lx, &sx) in axis.iter().enumerate() {
        let position = Vec3A::new(
          (sx as f32 - 1.0 - half) * mesh_scale,
          height_map.get(sx, sy),
          (half - (sy as f32 - 1.0)) * mesh_scale,
        );

        let on_ring = lx == 0 || ly == 0 || lx == lattice_size - 1 || ly == lattice_size - 1;
        if on_ring {
          refs.push(VertexRef::Border(border_positions.len() as u32));
          border_positions.push(position);
        } else {
          refs.push(VertexRef::Interior(interior_positions.len() as u32));
          interior_positions.push(position);
          interior_uvs.push([(lx - 1) as f32 / uv_span, (ly - 1) as f32 / uv_span]);
        }
      }
    }

    let quads = (lattice_size - 1) * (lattice_size - 1);
    let interior_quads = (verts_per_line - 1) * (verts_per_line - 1);
    let mut interior_triangles = Vec::with_capacity(interior_quads * 2);
    let mut border_triangles = Vec::with_capacity((quads - interior_quads) * 2);

    let mut push_triangle = |tri: [VertexRef; 3]| match tri {
      [VertexRef::Interior(a), VertexRef::Interior(b), VertexRef::Interior(c)] => {
        interior_triangles.push([a, b, c])
      }
      _ => border_triangles.push(tri),
    };

    for ly in 0..lattice_size - 1 {
      for lx in 0..lattice_size - 1 {
        let a = refs[ly * lattice_size + lx];
        let b = refs[ly * lattice_size + lx + 1];
        let c = refs[(ly + 1) * lattice_size + lx];
        let d = refs[(ly + 1) * lattice_size + lx + 1];

        push_triangle([a, d, c]);
        push_triangle([d, a, b]);
      }
    }

    Self {
      interior_positions,
      interior_uvs,
      border_positions,
      interior_triangles,
      border_triangles,
      verts_per_line,
      lod,
    }
  }

  #[inline]
  pub fn position(&self, vertex: VertexRef) -> Vec3A {
    match vertex {
      VertexRef::Interior(i) => self.interior_positions[i as usize],
      VertexRef::Border(i) => self.border_positions[i as usize],
    }
  }
}

/// Sample indices visited along one axis of a bordered grid.
pub fn axis_samples(bordered_size: usize, stride: usize) -> Vec<usize> {
  let interior = bordered_size - 2;
  let mut samples = Vec::with_capacity((interior - 1) / stride + 3);
  samples.push(0);
  samples.extend((1..=interior).step_by(stride));
  samples.push(bordered_size - 1);
  samples
}

#[cfg(test)]
#[path = "lattice_test.rs"]
mod lattice_test;
