//! Presenter capabilities for engine bridges.
//!
//! The streaming service notifies display and physics adapters through these
//! traits without depending on any engine. All calls happen on the thread
//! that drives [`TerrainStreamingService`](crate::streaming::TerrainStreamingService),
//! so implementations need no synchronization.

use std::sync::Arc;

use glam::Vec2;

use crate::types::{ChunkCoord, MeshPayload};

/// Display side of a chunk.
///
/// # Example (engine bridge)
///
/// ```ignore
/// struct SceneBridge {
///     entities: HashMap<ChunkCoord, Entity>,
/// }
///
/// impl Renderable for SceneBridge {
///     fn chunk_created(&mut self, coord: ChunkCoord, centre: Vec2) {
///         let entity = self.scene.spawn_hidden(Vec3::new(centre.x, 0.0, centre.y));
///         self.entities.insert(coord, entity);
///     }
///     fn set_visible(&mut self, coord: ChunkCoord, visible: bool) { /* ... */ }
///     fn set_mesh(&mut self, coord: ChunkCoord, mesh: Arc<MeshPayload>) { /* ... */ }
/// }
/// ```
pub trait Renderable {
  /// A chunk now exists at `world_centre`; it starts hidden with no mesh.
  fn chunk_created(&mut self, _coord: ChunkCoord, _world_centre: Vec2) {}

  /// The chunk entered or left view distance.
  fn set_visible(&mut self, coord: ChunkCoord, visible: bool);

  /// Replace the displayed geometry of a chunk.
  fn set_mesh(&mut self, coord: ChunkCoord, mesh: Arc<MeshPayload>);

  /// The chunk was dropped by a rebuild; release anything held for it.
  fn chunk_discarded(&mut self, _coord: ChunkCoord) {}
}

/// Physics side of a chunk.
pub trait Collidable {
  /// Assign collision geometry. Called at most once per chunk.
  fn set_collision_mesh(&mut self, coord: ChunkCoord, mesh: Arc<MeshPayload>);
}

/// Everything the streaming service needs from an engine.
pub trait ChunkPresenter: Renderable + Collidable {}

impl<T: Renderable + Collidable + ?Sized> ChunkPresenter for T {}

/// No-op presenter for headless generation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Renderable for NullPresenter {
  fn set_visible(&mut self, _coord: ChunkCoord, _visible: bool) {
    // No-op
  }

  fn set_mesh(&mut self, _coord: ChunkCoord, _mesh: Arc<MeshPayload>) {
    // No-op
  }
}

impl Collidable for NullPresenter {
  fn set_collision_mesh(&mut self, _coord: ChunkCoord, _mesh: Arc<MeshPayload>) {
    // No-op
  }
}
