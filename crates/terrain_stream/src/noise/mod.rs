//! Deterministic fractal noise and the island falloff mask.
//!
//! - [`field`]: octave-summed Perlin noise over a tile window
//! - [`falloff`]: square edge falloff for island-style maps

pub mod falloff;
pub mod field;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_NOISE_SCALE;

pub use field::generate;

/// How raw octave sums are mapped into the output range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
  /// Stretch each tile's own `[min, max]` onto `[0, 1]`.
  ///
  /// Adjacent tiles disagree at shared edges; use for single previews only.
  Local,
  /// Divide by an estimate of the theoretical maximum.
  ///
  /// Independent of the tile window, so neighbouring tiles agree at shared
  /// samples. Output is `>= 0` with no upper clamp.
  #[default]
  Global,
}

/// Parameters of the fractal noise field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
  pub normalize_mode: NormalizeMode,
  /// Samples per noise unit; larger values zoom in.
  pub scale: f32,
  pub octaves: u32,
  /// Amplitude multiplier per octave, in `[0, 1]`.
  pub persistence: f32,
  /// Frequency multiplier per octave, `>= 1`.
  pub lacunarity: f32,
  pub seed: i32,
  /// Sample-space pan of the whole field.
  pub offset: Vec2,
}

impl Default for NoiseSettings {
  fn default() -> Self {
    Self {
      normalize_mode: NormalizeMode::Global,
      scale: 50.0,
      octaves: 6,
      persistence: 0.6,
      lacunarity: 2.0,
      seed: 0,
      offset: Vec2::ZERO,
    }
  }
}

impl NoiseSettings {
  pub fn with_seed(mut self, seed: i32) -> Self {
    self.seed = seed;
    self
  }

  pub fn with_scale(mut self, scale: f32) -> Self {
    self.scale = scale;
    self
  }

  pub fn with_octaves(mut self, octaves: u32) -> Self {
    self.octaves = octaves;
    self
  }

  pub fn with_persistence(mut self, persistence: f32) -> Self {
    self.persistence = persistence;
    self
  }

  pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
    self.lacunarity = lacunarity;
    self
  }

  pub fn with_offset(mut self, offset: Vec2) -> Self {
    self.offset = offset;
    self
  }

  pub fn with_normalize_mode(mut self, mode: NormalizeMode) -> Self {
    self.normalize_mode = mode;
    self
  }

  /// Clamp every field into its legal range. Never fails.
  ///
  /// - `scale` below [`MIN_NOISE_SCALE`] (including non-positive) is raised
  /// - `octaves == 0` becomes 1
  /// - `lacunarity` below 1 becomes 1
  /// - `persistence` is clamped to `[0, 1]`
  pub fn validate(&mut self) {
    if !(self.scale >= MIN_NOISE_SCALE) {
      self.scale = MIN_NOISE_SCALE;
    }
    self.octaves = self.octaves.max(1);
    if !(self.lacunarity >= 1.0) {
      self.lacunarity = 1.0;
    }
    self.persistence = if self.persistence.is_nan() {
      0.0
    } else {
      self.persistence.clamp(0.0, 1.0)
    };
  }

  /// Validated copy.
  pub fn validated(&self) -> Self {
    let mut settings = self.clone();
    settings.validate();
    settings
  }
}
