//! Height map building: noise → optional falloff → response curve.
//!
//! ```text
//! noise::generate ──► subtract falloff (islands) ──► curve(v) * multiplier
//!                          clamp [0, 1]                 track min / max
//! ```

pub mod curve;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::noise::{self, falloff, NoiseSettings};
use crate::types::HeightMap;

pub use curve::{HeightCurve, Keyframe};

/// Everything needed to turn a sample window into heights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapSettings {
  /// Subtract a square falloff mask so the map fades out at its edges.
  pub use_falloff: bool,
  pub height_multiplier: f32,
  pub noise: NoiseSettings,
  pub height_curve: HeightCurve,
}

impl Default for HeightMapSettings {
  fn default() -> Self {
    Self {
      noise: NoiseSettings::default(),
      use_falloff: false,
      height_multiplier: 30.0,
      height_curve: HeightCurve::default(),
    }
  }
}

impl HeightMapSettings {
  pub fn with_noise(mut self, noise: NoiseSettings) -> Self {
    self.noise = noise;
    self
  }

  pub fn with_falloff(mut self, use_falloff: bool) -> Self {
    self.use_falloff = use_falloff;
    self
  }

  pub fn with_height_multiplier(mut self, height_multiplier: f32) -> Self {
    self.height_multiplier = height_multiplier;
    self
  }

  pub fn with_height_curve(mut self, height_curve: HeightCurve) -> Self {
    self.height_curve = height_curve;
    self
  }

  /// Lowest height a material needs to cover.
  pub fn min_height(&self) -> f32 {
    self.height_multiplier * self.height_curve.evaluate(0.0)
  }

  /// Highest height a material needs to cover.
  pub fn max_height(&self) -> f32 {
    self.height_multiplier * self.height_curve.evaluate(1.0)
  }

  pub fn validate(&mut self) {
    self.noise.validate();
  }
}

/// Build a `width x height` height map centred on `sample_centre`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "height_map::build"))]
pub fn build(
  width: usize,
  height: usize,
  settings: &HeightMapSettings,
  sample_centre: Vec2,
) -> HeightMap {
  let mut values = noise::generate(width, height, &settings.noise, sample_centre);

  if settings.use_falloff {
    apply_falloff(&mut values, width, height);
  }

  let curve = &settings.height_curve;
  let multiplier = settings.height_multiplier;
  for value in values.iter_mut() {
    *value = curve.evaluate(*value) * multiplier;
  }

  HeightMap::from_values(values, width, height)
}

/// Subtract the falloff mask in place; non-square grids use the larger edge.
fn apply_falloff(values: &mut [f32], width: usize, height: usize) {
  let size = width.max(height);
  let mask = falloff::generate(size);
  for y in 0..height {
    for x in 0..width {
      let value = &mut values[y * width + x];
      *value = (*value - mask[y * size + x]).clamp(0.0, 1.0);
    }
  }
}
