//! Tile layout and generation constants.
//!
//! # Bordered Tile Layout
//!
//! Every height map is sampled one cell wider than the visible tile on each
//! side so LOD 0 normals along the tile edge see the same neighbours as the
//! tile next door. Coarser LODs reuse those normals.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                     BORDERED SAMPLE LAYOUT                         │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                                                                    │
//! │  Sample index:  0     1     2    ...    S-1    S     S+1           │
//! │                 │     │                        │     │             │
//! │                 │     └──── S interior ────────┘     │             │
//! │                 │          samples (1..=S)           │             │
//! │                 └─ border                   border ──┘             │
//! │                                                                    │
//! │  chunk size C  = S - 1 quads per edge at LOD 0                     │
//! │  bordered size B = S + 2 = C + 3 samples per edge                  │
//! │                                                                    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Border samples only feed normal accumulation; they never produce
//! triangles in the output mesh.
//!
//! # LOD Stride
//!
//! ```text
//! LOD:     0   1   2   3   4
//! stride:  1   2   4   6   8
//! ```
//!
//! Every supported chunk size is divisible by every stride, so each LOD
//! walks the interior lattice without remainder.

/// Quads per tile edge at LOD 0 that mesh settings may select.
pub const SUPPORTED_CHUNK_SIZES: [usize; 9] = [48, 72, 96, 120, 144, 168, 192, 216, 240];

/// Number of entries in [`SUPPORTED_CHUNK_SIZES`].
pub const NUM_SUPPORTED_CHUNK_SIZES: usize = SUPPORTED_CHUNK_SIZES.len();

/// Flat shading triples the vertex count, so only the smallest sizes are allowed.
pub const NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES: usize = 3;

/// LOD values range over `0..NUM_SUPPORTED_LODS`.
pub const NUM_SUPPORTED_LODS: usize = 5;

/// Smallest noise scale accepted; smaller (or non-positive) values are clamped.
pub const MIN_NOISE_SCALE: f32 = 0.0001;

/// Per-octave offsets are drawn from `[-NOISE_OFFSET_RANGE, NOISE_OFFSET_RANGE)`.
pub const NOISE_OFFSET_RANGE: i32 = 100_000;

/// Global normalization assumes sampled heights rarely exceed this fraction
/// of the theoretical maximum.
pub const GLOBAL_NORMALIZE_ESTIMATE: f32 = 0.9;

/// Falloff curve steepness.
pub const FALLOFF_STEEPNESS: f32 = 3.0;

/// Falloff curve shift towards the edge.
pub const FALLOFF_SHIFT: f32 = 2.2;

/// Default distance the viewer must travel before the chunk window is rescanned.
pub const DEFAULT_VIEWER_MOVE_THRESHOLD: f32 = 25.0;

/// Default distance to a chunk edge below which its collider is assigned.
pub const DEFAULT_COLLIDER_ACTIVATION_DISTANCE: f32 = 5.0;

/// Default world units per height map sample.
pub const DEFAULT_MESH_SCALE: f32 = 2.5;

/// Lattice stride for a LOD value.
///
/// `stride = max(1, 2 * lod)`
#[inline]
pub const fn lod_stride(lod: usize) -> usize {
  if lod == 0 {
    1
  } else {
    lod * 2
  }
}

/// Samples per edge of a bordered height map for a chunk size.
///
/// `B = chunk_size + 3`
#[inline]
pub const fn bordered_size(chunk_size: usize) -> usize {
  chunk_size + 3
}

/// Interior vertices per edge of a mesh built at `lod` from a bordered grid.
///
/// `n = (S - 1) / stride + 1` where `S = bordered_size - 2`
#[inline]
pub const fn verts_per_line(bordered_size: usize, lod: usize) -> usize {
  (bordered_size - 3) / lod_stride(lod) + 1
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
