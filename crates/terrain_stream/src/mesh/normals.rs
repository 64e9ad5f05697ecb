//! Smooth vertex normals from triangle geometry.
//!
//! Every face normal (interior and border triangles alike) is added to the
//! interior vertices of its triangle, then each sum is normalized. Border
//! faces are what make normals along a tile edge match the neighbour tile.
//!
//! The border ring sits one sample outside the tile, not one stride, so only
//! the LOD 0 lattice sees the same neighbourhood as the next tile. Coarser
//! lattices read their normals from the LOD 0 surface via [`sampled`].

use glam::Vec3A;

use super::lattice::{Lattice, VertexRef};
use crate::constants::lod_stride;
use crate::types::HeightMap;

/// Unit normal of triangle `(a, b, c)` with counter-clockwise winding seen
/// from above; zero for degenerate triangles.
#[inline]
pub fn face_normal(a: Vec3A, b: Vec3A, c: Vec3A) -> Vec3A {
  let normal = (b - a).cross(c - a);
  let len_sq = normal.length_squared();
  if len_sq < 1e-12 {
    return Vec3A::ZERO;
  }
  normal * len_sq.sqrt().recip()
}

/// Normalize, falling back to up for zero-length sums.
#[inline]
pub fn normalize_or_up(normal: Vec3A) -> [f32; 3] {
  let len_sq = normal.length_squared();
  if len_sq < 1e-12 {
    [0.0, 1.0, 0.0]
  } else {
    (normal * len_sq.sqrt().recip()).to_array()
  }
}

/// One unit normal per interior vertex of the lattice.
pub fn smooth(lattice: &Lattice) -> Vec<[f32; 3]> {
  let positions = &lattice.interior_positions;
  let mut sums = vec![Vec3A::ZERO; positions.len()];

  for tri in &lattice.interior_triangles {
    let [i0, i1, i2] = tri.map(|i| i as usize);
    let normal = face_normal(positions[i0], positions[i1], positions[i2]);
    sums[i0] += normal;
    sums[i1] += normal;
    sums[i2] += normal;
  }

  for tri in &lattice.border_triangles {
    let normal = face_normal(
      lattice.position(tri[0]),
      lattice.position(tri[1]),
      lattice.position(tri[2]),
    );
    for vertex in tri {
      if let VertexRef::Interior(i) = *vertex {
        sums[i as usize] += normal;
      }
    }
  }

  sums.into_iter().map(normalize_or_up).collect()
}

/// One unit normal per interior vertex of `lattice`, taken from the LOD 0
/// surface of `height_map` at the same sample.
///
/// Equal to [`smooth`] at LOD 0.
pub fn sampled(height_map: &HeightMap, lattice: &Lattice, mesh_scale: f32) -> Vec<[f32; 3]> {
  if lattice.lod == 0 {
    return smooth(lattice);
  }

  let full = smooth(&Lattice::build(height_map, 0, mesh_scale));
  let full_line = height_map.width - 2;
  let stride = lod_stride(lattice.lod);
  let n = lattice.verts_per_line;

  let mut normals = Vec::with_capacity(n * n);
  for ky in 0..n {
    let row = ky * stride * full_line;
    normals.extend((0..n).map(|kx| full[row + kx * stride]));
  }
  normals
}

#[cfg(test)]
#[path = "normals_test.rs"]
mod normals_test;
