use super::*;

const TILE: usize = 243;
const CHUNK: f32 = 240.0;

fn global_settings() -> NoiseSettings {
  NoiseSettings::default()
}

fn local_settings() -> NoiseSettings {
  NoiseSettings::default().with_normalize_mode(NormalizeMode::Local)
}

#[test]
fn test_deterministic() {
  let settings = global_settings().with_seed(1234);
  let a = generate(64, 64, &settings, Vec2::new(10.0, -20.0));
  let b = generate(64, 64, &settings, Vec2::new(10.0, -20.0));
  assert_eq!(a, b, "same inputs must give bit-identical output");
}

#[test]
fn test_seed_changes_output() {
  let a = generate(32, 32, &global_settings().with_seed(1), Vec2::ZERO);
  let b = generate(32, 32, &global_settings().with_seed(2), Vec2::ZERO);
  assert_ne!(a, b, "different seeds should give different fields");
}

#[test]
fn test_output_dimensions() {
  let values = generate(17, 9, &global_settings(), Vec2::ZERO);
  assert_eq!(values.len(), 17 * 9);
  assert!(generate(0, 0, &global_settings(), Vec2::ZERO).is_empty());
}

#[test]
fn test_local_range_is_unit_interval() {
  let values = generate(64, 64, &local_settings(), Vec2::ZERO);
  let (min, max) = value_range(&values);
  assert!(min >= 0.0 && max <= 1.0, "local range [{}, {}]", min, max);
  assert_eq!(min, 0.0, "local minimum should map to 0");
  assert_eq!(max, 1.0, "local maximum should map to 1");
}

#[test]
fn test_global_non_negative() {
  for seed in 0..4 {
    let values = generate(64, 64, &global_settings().with_seed(seed), Vec2::new(0.0, 500.0));
    for &v in &values {
      assert!(v >= 0.0, "global value {} below zero (seed {})", v, seed);
      assert!(v.is_finite());
    }
  }
}

#[test]
fn test_global_seam_continuity_east() {
  let settings = global_settings().with_seed(7);
  let west = generate(TILE, TILE, &settings, Vec2::ZERO);
  let east = generate(TILE, TILE, &settings, Vec2::new(CHUNK, 0.0));

  // West column 240 + k shares its samples with east column k.
  for y in 0..TILE {
    for k in 0..3 {
      let a = west[y * TILE + 240 + k];
      let b = east[y * TILE + k];
      assert!(
        (a - b).abs() <= 1e-5,
        "seam mismatch at row {} col {}: {} vs {}",
        y,
        k,
        a,
        b
      );
    }
  }
}

#[test]
fn test_global_seam_continuity_north() {
  let settings = global_settings().with_seed(3);
  let south = generate(TILE, TILE, &settings, Vec2::ZERO);
  let north = generate(TILE, TILE, &settings, Vec2::new(0.0, CHUNK));

  // Rows advance southwards: north row 240 + k is south row k.
  for x in 0..TILE {
    for k in 0..3 {
      let a = north[(240 + k) * TILE + x];
      let b = south[k * TILE + x];
      assert!(
        (a - b).abs() <= 1e-5,
        "seam mismatch at col {} row {}: {} vs {}",
        x,
        k,
        a,
        b
      );
    }
  }
}

#[test]
fn test_local_seams_disagree() {
  let settings = local_settings().with_seed(7);
  let west = generate(TILE, TILE, &settings, Vec2::ZERO);
  let east = generate(TILE, TILE, &settings, Vec2::new(CHUNK, 0.0));

  let max_diff = (0..TILE)
    .map(|y| (west[y * TILE + 241] - east[y * TILE + 1]).abs())
    .fold(0.0f32, f32::max);
  assert!(
    max_diff > 1e-5,
    "per-tile normalization should not line up across tiles"
  );
}

#[test]
fn test_zero_octaves_behaves_like_one() {
  let zero = generate(16, 16, &global_settings().with_octaves(0), Vec2::ZERO);
  let one = generate(16, 16, &global_settings().with_octaves(1), Vec2::ZERO);
  assert_eq!(zero, one);
}

#[test]
fn test_non_positive_scale_is_clamped() {
  let settings = global_settings().with_scale(0.0).with_octaves(1);
  let values = generate(8, 8, &settings, Vec2::ZERO);
  assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
fn test_max_possible_height() {
  let settings = NoiseSettings::default().with_octaves(3).with_persistence(0.5);
  assert!((max_possible_height(&settings) - 1.75).abs() < 1e-6);
}

#[test]
fn test_octave_offsets_from_seed_zero() {
  let offsets = octave_offsets(&global_settings(), Vec2::ZERO);
  let expected = [
    (30939.0, 41815.0),
    (45973.0, -6816.0),
    (1472.0, 39828.0),
    (12193.0, -87966.0),
    (-60931.0, 75822.0),
    (16011.0, 9906.0),
  ];
  assert_eq!(offsets.len(), expected.len());
  for (offset, (x, y)) in offsets.iter().zip(expected) {
    assert_eq!(*offset, Vec2::new(x, y));
  }
}

#[test]
fn test_reference_tile_centre_sample() {
  // 243 grid, scale 50, 6 octaves, persistence 0.6, lacunarity 2, seed 0
  let values = generate(TILE, TILE, &global_settings(), Vec2::ZERO);
  let centre = values[121 * TILE + 121];
  assert!(
    (centre - 0.490_288_17).abs() < 1e-6,
    "centre sample {} drifted from the reference value",
    centre
  );
  assert_eq!(centre, generate(TILE, TILE, &global_settings(), Vec2::ZERO)[121 * TILE + 121]);
}
