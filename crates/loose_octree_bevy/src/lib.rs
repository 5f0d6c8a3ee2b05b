//! Bevy integration for loose_octree.
//!
//! This crate keeps a [`loose_octree::BoundsOctree`] of entities in sync with
//! their world-space [`Aabb`](bevy::render::primitives::Aabb)s and answers
//! frustum, box and ray queries against it.
//!
//! Entities opt in with the [`OctreeTracked`] marker. They need an `Aabb` and a
//! `GlobalTransform`; meshes get both from bevy automatically.

pub mod components;
pub mod convert;
pub mod resources;
pub mod systems;


#[cfg(test)]
mod sync_test;

use bevy::prelude::*;
use bevy::render::view::VisibilitySystems;
use bevy::transform::TransformSystem;
pub use components::*;
use loose_octree::OctreeConfig;
pub use resources::*;

/// System sets of the octree plugins.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OctreeSystems {
  /// Apply removals, then insert / re-insert changed entities.
  Sync,
}

/// Maintains the [`EntityOctree`] resource.
pub struct OctreePlugin {
  pub config: OctreeConfig,
}

impl Default for OctreePlugin {
  fn default() -> Self {
    Self {
      config: OctreeConfig::default(),
    }
  }
}

impl Plugin for OctreePlugin {
  fn build(&self, app: &mut App) {
    let octree = EntityOctree::new(self.config.clone()).unwrap_or_else(|err| {
      error!("{err}, falling back to the default octree configuration");
      EntityOctree::default()
    });

    app
      .insert_resource(octree)
      .configure_sets(
        PostUpdate,
        OctreeSystems::Sync
          .after(TransformSystem::TransformPropagate)
          .after(VisibilitySystems::CalculateBounds),
      )
      .add_systems(
        PostUpdate,
        (
          systems::sync::remove_untracked,
          systems::sync::sync_tracked_entities,
        )
          .chain()
          .in_set(OctreeSystems::Sync),
      );
  }
}

/// Draws node and object bounds with gizmos. Requires bevy's gizmo plugin.
pub struct OctreeGizmosPlugin;

impl Plugin for OctreeGizmosPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<OctreeGizmoSettings>()
      .add_systems(
        PostUpdate,
        systems::gizmos::draw_octree_gizmos.after(OctreeSystems::Sync),
      );
  }
}
