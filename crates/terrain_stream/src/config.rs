//! Terrain configuration: LOD table, streaming knobs and TOML persistence.
//!
//! Values are clamped by [`TerrainSettings::validate`], never rejected.
//! Reading or writing a file is the only fallible path.
//!
//! ```toml
//! max_workers = 4
//! viewer_move_threshold = 25.0
//!
//! [height_map]
//! height_multiplier = 30.0
//! use_falloff = false
//!
//! [height_map.noise]
//! normalize_mode = "global"
//! scale = 50.0
//! octaves = 6
//! seed = 42
//!
//! [mesh]
//! mesh_scale = 2.5
//! chunk_size_index = 8
//!
//! [lods]
//! collider_lod_index = 0
//! collider_activation_distance = 5.0
//! levels = [
//!   { lod = 0, visible_distance_threshold = 200.0 },
//!   { lod = 1, visible_distance_threshold = 400.0 },
//!   { lod = 4, visible_distance_threshold = 600.0 },
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
  DEFAULT_COLLIDER_ACTIVATION_DISTANCE, DEFAULT_VIEWER_MOVE_THRESHOLD, NUM_SUPPORTED_LODS,
};
use crate::height_map::HeightMapSettings;
use crate::mesh::MeshSettings;

/// Failure to load or save terrain settings.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to access terrain settings at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid terrain settings: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("failed to serialize terrain settings: {0}")]
  Serialize(#[from] toml::ser::Error),
}

/// One detail level: the LOD value to mesh at and how far it stays selected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodInfo {
  /// LOD value in `0..NUM_SUPPORTED_LODS`.
  pub lod: usize,
  /// Edge distance up to which this level is chosen.
  pub visible_distance_threshold: f32,
}

impl LodInfo {
  pub const fn new(lod: usize, visible_distance_threshold: f32) -> Self {
    Self {
      lod,
      visible_distance_threshold,
    }
  }

  #[inline]
  pub fn sq_visible_distance_threshold(&self) -> f32 {
    self.visible_distance_threshold * self.visible_distance_threshold
  }
}

/// Ordered detail levels plus collider policy.
///
/// The last level's threshold is the maximum view distance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodSettings {
  /// Index into `levels` whose mesh doubles as collision geometry.
  ///
  /// Omitting the key in a `[lods]` table disables colliders.
  #[serde(default)]
  pub collider_lod_index: Option<usize>,
  /// Edge distance below which a chunk's collider is assigned.
  pub collider_activation_distance: f32,
  pub levels: Vec<LodInfo>,
}

impl Default for LodSettings {
  fn default() -> Self {
    Self {
      levels: vec![
        LodInfo::new(0, 200.0),
        LodInfo::new(1, 400.0),
        LodInfo::new(4, 600.0),
      ],
      collider_lod_index: Some(0),
      collider_activation_distance: DEFAULT_COLLIDER_ACTIVATION_DISTANCE,
    }
  }
}

impl LodSettings {
  pub fn new(levels: Vec<LodInfo>) -> Self {
    Self {
      levels,
      ..Default::default()
    }
  }

  pub fn with_collider(mut self, lod_index: Option<usize>, activation_distance: f32) -> Self {
    self.collider_lod_index = lod_index;
    self.collider_activation_distance = activation_distance;
    self
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.levels.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }

  /// Distance beyond which chunks are hidden.
  #[inline]
  pub fn max_view_distance(&self) -> f32 {
    self
      .levels
      .last()
      .map_or(0.0, |level| level.visible_distance_threshold)
  }

  /// Index of the first level (excluding the last) whose threshold covers
  /// `distance`, else the last level.
  pub fn select_lod_index(&self, distance: f32) -> usize {
    let last = self.levels.len().saturating_sub(1);
    self.levels[..last]
      .iter()
      .position(|level| distance <= level.visible_distance_threshold)
      .unwrap_or(last)
  }

  /// # Panics
  ///
  /// If the table is empty, unsorted, names an unsupported LOD value or a
  /// collider index out of range.
  pub fn assert_valid(&self) {
    assert!(!self.levels.is_empty(), "at least one detail level is required");
    for level in &self.levels {
      assert!(
        level.lod < NUM_SUPPORTED_LODS,
        "LOD {} outside supported range 0..{}",
        level.lod,
        NUM_SUPPORTED_LODS
      );
    }
    for pair in self.levels.windows(2) {
      assert!(
        pair[0].visible_distance_threshold < pair[1].visible_distance_threshold,
        "detail level thresholds must ascend ({} then {})",
        pair[0].visible_distance_threshold,
        pair[1].visible_distance_threshold
      );
    }
    if let Some(index) = self.collider_lod_index {
      assert!(
        index < self.levels.len(),
        "collider LOD index {} out of range for {} levels",
        index,
        self.levels.len()
      );
    }
  }
}

fn default_max_workers() -> usize {
  std::thread::available_parallelism()
    .map(|n| n.get().saturating_sub(1).max(1))
    .unwrap_or(2)
}

/// Complete configuration of a streaming terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
  /// Worker threads for height map and mesh generation.
  pub max_workers: usize,
  /// Viewer travel (world units) that triggers a rescan of the chunk window.
  pub viewer_move_threshold: f32,
  pub height_map: HeightMapSettings,
  pub mesh: MeshSettings,
  pub lods: LodSettings,
}

impl Default for TerrainSettings {
  fn default() -> Self {
    Self {
      height_map: HeightMapSettings::default(),
      mesh: MeshSettings::default(),
      lods: LodSettings::default(),
      max_workers: default_max_workers(),
      viewer_move_threshold: DEFAULT_VIEWER_MOVE_THRESHOLD,
    }
  }
}

impl TerrainSettings {
  pub fn with_height_map(mut self, height_map: HeightMapSettings) -> Self {
    self.height_map = height_map;
    self
  }

  pub fn with_mesh(mut self, mesh: MeshSettings) -> Self {
    self.mesh = mesh;
    self
  }

  pub fn with_lods(mut self, lods: LodSettings) -> Self {
    self.lods = lods;
    self
  }

  pub fn with_max_workers(mut self, max_workers: usize) -> Self {
    self.max_workers = max_workers;
    self
  }

  pub fn with_viewer_move_threshold(mut self, threshold: f32) -> Self {
    self.viewer_move_threshold = threshold;
    self
  }

  /// Edge length of one chunk in world units.
  #[inline]
  pub fn chunk_world_size(&self) -> f32 {
    self.mesh.mesh_world_size()
  }

  #[inline]
  pub fn sq_viewer_move_threshold(&self) -> f32 {
    self.viewer_move_threshold * self.viewer_move_threshold
  }

  /// Clamp numeric fields and check the LOD table.
  ///
  /// # Panics
  ///
  /// On an invalid LOD table (see [`LodSettings::assert_valid`]).
  pub fn validate(&mut self) {
    self.height_map.validate();
    self.mesh.validate();
    self.max_workers = self.max_workers.max(1);
    if !(self.viewer_move_threshold >= 0.0) {
      self.viewer_move_threshold = 0.0;
    }
    if !(self.lods.collider_activation_distance >= 0.0) {
      self.lods.collider_activation_distance = 0.0;
    }
    self.lods.assert_valid();
  }

  /// Parse settings from TOML; missing keys take their defaults.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    let mut settings: Self = toml::from_str(source)?;
    settings.validate();
    Ok(settings)
  }

  /// Read settings from a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let settings = Self::from_toml_str(&source)?;
    log::debug!("loaded terrain settings from {}", path.display());
    Ok(settings)
  }

  pub fn to_toml_string(&self) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(self)?)
  }

  /// Write settings to a TOML file.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
