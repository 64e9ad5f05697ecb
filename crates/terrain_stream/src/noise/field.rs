//! Octave-summed Perlin noise sampled over a tile window.
//!
//! ```text
//! for each octave i:
//!   offset_i    = prng(seed)[i] + settings.offset ± centre
//!   sample      = (cell - half_extent + offset_i) / scale * lacunarity^i
//!   value      += perlin(sample) * persistence^i
//! ```
//!
//! The sample coordinate depends only on `cell + centre`, so two windows
//! whose centres differ by their width see identical values along the shared
//! edge. Global normalization keeps that property; local normalization does
//! not.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use super::{NoiseSettings, NormalizeMode};
use crate::constants::{GLOBAL_NORMALIZE_ESTIMATE, NOISE_OFFSET_RANGE};
use crate::types::value_range;

/// Generate a `width x height` row-major noise grid centred on `sample_centre`.
///
/// Settings are validated on a copy first, so any input is accepted.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "noise::generate"))]
pub fn generate(
  width: usize,
  height: usize,
  settings: &NoiseSettings,
  sample_centre: Vec2,
) -> Vec<f32> {
  let settings = settings.validated();
  let octave_offsets = octave_offsets(&settings, sample_centre);
  let perlin = perlin();

  let half_width = width as f32 / 2.0;
  let half_height = height as f32 / 2.0;

  let mut values = Vec::with_capacity(width * height);
  for y in 0..height {
    for x in 0..width {
      let mut amplitude = 1.0f32;
      let mut frequency = 1.0f32;
      let mut noise_height = 0.0f32;

      for offset in &octave_offsets {
        let sample_x = (x as f32 - half_width + offset.x) / settings.scale * frequency;
        let sample_y = (y as f32 - half_height + offset.y) / settings.scale * frequency;

        noise_height += perlin.get_noise_2d(sample_x, sample_y) * amplitude;

        amplitude *= settings.persistence;
        frequency *= settings.lacunarity;
      }

      values.push(noise_height);
    }
  }

  match settings.normalize_mode {
    NormalizeMode::Local => normalize_local(&mut values),
    NormalizeMode::Global => normalize_global(&mut values, max_possible_height(&settings)),
  }

  values
}

/// Per-octave sample offsets, including the field pan and window centre.
///
/// Y is negated so that increasing centre Y moves north while rows advance
/// south.
fn octave_offsets(settings: &NoiseSettings, sample_centre: Vec2) -> SmallVec<[Vec2; 8]> {
  let mut prng = ChaCha8Rng::seed_from_u64(settings.seed as i64 as u64);
  (0..settings.octaves)
    .map(|_| {
      let x = prng.random_range(-NOISE_OFFSET_RANGE..NOISE_OFFSET_RANGE) as f32;
      let y = prng.random_range(-NOISE_OFFSET_RANGE..NOISE_OFFSET_RANGE) as f32;
      Vec2::new(
        x + settings.offset.x + sample_centre.x,
        y - settings.offset.y - sample_centre.y,
      )
    })
    .collect()
}

/// Sum of octave amplitudes: the largest magnitude an octave sum can reach.
pub fn max_possible_height(settings: &NoiseSettings) -> f32 {
  let mut amplitude = 1.0f32;
  let mut total = 0.0f32;
  for _ in 0..settings.octaves.max(1) {
    total += amplitude;
    amplitude *= settings.persistence;
  }
  total
}

/// Single-octave Perlin evaluator in `[-1, 1]`.
///
/// Frequency is 1 because scale and lacunarity are already folded into the
/// sample coordinate.
fn perlin() -> FastNoiseLite {
  let mut noise = FastNoiseLite::new();
  noise.set_noise_type(Some(NoiseType::Perlin));
  noise.set_frequency(Some(1.0));
  noise
}

fn normalize_local(values: &mut [f32]) {
  let (min, max) = value_range(values);
  let range = max - min;
  for value in values.iter_mut() {
    *value = if range > 0.0 { (*value - min) / range } else { 0.0 };
  }
}

fn normalize_global(values: &mut [f32], max_possible_height: f32) {
  let denominator = max_possible_height / GLOBAL_NORMALIZE_ESTIMATE;
  for value in values.iter_mut() {
    *value = ((*value + 1.0) / denominator).max(0.0);
  }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;
