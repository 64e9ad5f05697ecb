//! Faceted output: every emitted triangle owns its three vertices.

use super::lattice::Lattice;
use super::normals::{face_normal, normalize_or_up};
use crate::types::MeshPayload;

/// Expand the interior triangles of a lattice into unshared vertices.
pub fn expand(lattice: &Lattice) -> MeshPayload {
  let vertex_count = lattice.interior_triangles.len() * 3;
  let mut positions = Vec::with_capacity(vertex_count);
  let mut normals = Vec::with_capacity(vertex_count);
  let mut uvs = Vec::with_capacity(vertex_count);

  for tri in &lattice.interior_triangles {
    let [i0, i1, i2] = tri.map(|i| i as usize);
    let p = &lattice.interior_positions;
    let normal = normalize_or_up(face_normal(p[i0], p[i1], p[i2]));

    for i in [i0, i1, i2] {
      positions.push(p[i].to_array());
      uvs.push(lattice.interior_uvs[i]);
      normals.push(normal);
    }
  }

  MeshPayload {
    positions,
    normals,
    uvs,
    indices: (0..vertex_count as u32).collect(),
    lod: lattice.lod,
    flat_shaded: true,
  }
}
