//! terrain_stream - Engine independent procedural terrain streaming
//!
//! This crate turns fractal noise into an endless, viewer-centred terrain made
//! of square height-field chunks. Height maps and meshes are generated on a
//! bounded worker pool; the owning thread applies results once per tick and
//! forwards them to an engine through small presenter traits.
//!
//! # Features
//!
//! - **Seamless noise**: octave-summed Perlin noise sampled in a shared world
//!   frame, with a global normalization that keeps neighbouring tiles
//!   continuous
//! - **Bordered meshing**: tiles carry a one-sample border so edge normals
//!   match their neighbours at every LOD
//! - **Distance LOD**: per-chunk LOD selection with cached meshes and
//!   at-most-once generation per level
//! - **Colliders**: a configurable LOD doubles as the collision mesh near the
//!   viewer
//!
//! # Example
//!
//! ```ignore
//! use terrain_stream::{NullPresenter, TerrainSettings, TerrainStreamingService};
//!
//! let settings = TerrainSettings::load("terrain.toml")?;
//! let mut service = TerrainStreamingService::new(settings, NullPresenter)?;
//!
//! // Once per frame, with the viewer's world X/Z
//! let stats = service.on_viewer_moved(glam::Vec2::new(x, z));
//! println!("{} chunks visible", stats.visible_chunks);
//! ```

pub mod constants;
pub mod types;

pub use constants::{NUM_SUPPORTED_LODS, SUPPORTED_CHUNK_SIZES};
pub use types::{ChunkBounds, ChunkCoord, HeightMap, MeshPayload};

// Noise and height fields
pub mod height_map;
pub mod noise;
pub use height_map::{HeightCurve, HeightMapSettings, Keyframe};
pub use noise::{NoiseSettings, NormalizeMode};

// Meshing
pub mod mesh;
pub use mesh::MeshSettings;

// Settings and TOML loading
pub mod config;
pub use config::{ConfigError, LodInfo, LodSettings, TerrainSettings};

// Engine boundary
pub mod presentation;
pub use presentation::{ChunkPresenter, Collidable, NullPresenter, Renderable};

// Chunk state and streaming
pub mod chunk;
pub mod scheduler;
pub mod streaming;
pub use chunk::{LodMeshSlot, TerrainChunk};
pub use scheduler::{Epoch, SchedulerError};
pub use streaming::{TerrainStreamingService, TickStats};

// Editor previews
pub mod preview;
pub use preview::{PreviewMode, PreviewOutput};

// Statistics (feature-gated)
pub mod metrics;
pub use metrics::StreamingMetrics;

#[cfg(test)]
pub(crate) mod test_utils;
