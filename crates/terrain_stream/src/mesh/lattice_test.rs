use super::*;
use crate::test_utils::{flat_height_map, ramp_height_map};

#[test]
fn test_axis_samples_lod0() {
  // B = 7, S = 5
  assert_eq!(axis_samples(7, 1), vec![0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_axis_samples_strided() {
  // B = 11, S = 9, stride 4 visits 1, 5, 9
  assert_eq!(axis_samples(11, 4), vec![0, 1, 5, 9, 10]);
  // The last interior sample is always present
  let samples = axis_samples(243, 8);
  assert_eq!(samples[samples.len() - 2], 241);
  assert_eq!(samples.len(), 31 + 2);
}

#[test]
fn test_classification_counts() {
  let lattice = Lattice::build(&flat_height_map(51, 0.0), 2, 1.0);
  // S = 49, stride 4 → n = 13 interior per edge, lattice is 15 wide
  let n = 13;
  let m = 15;
  assert_eq!(lattice.verts_per_line, n);
  assert_eq!(lattice.interior_positions.len(), n * n);
  assert_eq!(lattice.border_positions.len(), m * m - n * n);
  assert_eq!(lattice.interior_triangles.len(), 2 * (n - 1) * (n - 1));
  assert_eq!(
    lattice.border_triangles.len(),
    2 * (m - 1) * (m - 1) - 2 * (n - 1) * (n - 1)
  );
  for tri in &lattice.border_triangles {
    assert!(
      tri.iter().any(|v| v.is_border()),
      "border triangle without a border vertex"
    );
  }
}

#[test]
fn test_positions_centred_and_scaled() {
  let lattice = Lattice::build(&flat_height_map(11, 3.0), 0, 2.0);
  // S = 9, half extent 4 samples * scale 2
  let first = lattice.interior_positions[0];
  let last = lattice.interior_positions[lattice.interior_positions.len() - 1];
  assert_eq!(first.to_array(), [-8.0, 3.0, 8.0]);
  assert_eq!(last.to_array(), [8.0, 3.0, -8.0]);
}

#[test]
fn test_heights_follow_samples() {
  let map = ramp_height_map(11, 0.5);
  let lattice = Lattice::build(&map, 1, 1.0);
  // Interior vertex (k_x = 1, k_y = 0) sits on sample (3, 1)
  assert_eq!(lattice.interior_positions[1].y, map.get(3, 1));
}

#[test]
fn test_uvs_span_unit_square_at_every_lod() {
  let map = flat_height_map(51, 0.0);
  for lod in [0, 1, 2, 3, 4] {
    let lattice = Lattice::build(&map, lod, 1.0);
    let n = lattice.verts_per_line;
    assert_eq!(lattice.interior_uvs[0], [0.0, 0.0], "lod {}", lod);
    assert_eq!(lattice.interior_uvs[n - 1], [1.0, 0.0], "lod {}", lod);
    assert_eq!(lattice.interior_uvs[n * n - 1], [1.0, 1.0], "lod {}", lod);
  }
}

#[test]
#[should_panic(expected = "does not divide")]
fn test_stride_must_divide_tile() {
  // S - 1 = 7 cannot be walked with stride 2
  Lattice::build(&flat_height_map(10, 0.0), 1, 1.0);
}

#[test]
#[should_panic(expected = "must be square")]
fn test_non_square_rejected() {
  let map = HeightMap::from_values(vec![0.0; 12], 4, 3);
  Lattice::build(&map, 0, 1.0);
}
