//! Keep the entity octree in step with entity bounds.

use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::components::OctreeTracked;
use crate::convert::world_bounds;
use crate::resources::EntityOctree;

/// Insert newly tracked entities and re-insert those whose bounds moved.
#[allow(clippy::type_complexity)]
pub fn sync_tracked_entities(
  mut octree: ResMut<EntityOctree>,
  changed: Query<
    (Entity, &Aabb, &GlobalTransform),
    (
      With<OctreeTracked>,
      Or<(Changed<GlobalTransform>, Changed<Aabb>, Added<OctreeTracked>)>,
    ),
  >,
) {
  for (entity, aabb, transform) in &changed {
    let bounds = world_bounds(aabb, transform);
    if let Err(err) = octree.upsert(entity, bounds) {
      warn!("entity {entity} left out of the octree: {err}");
    }
  }
}

/// Drop entities that lost their marker or were despawned.
pub fn remove_untracked(
  mut octree: ResMut<EntityOctree>,
  mut removed: RemovedComponents<OctreeTracked>,
) {
  for entity in removed.read() {
    if octree.remove(entity) {
      debug!("entity {entity} removed from the octree");
    }
  }
}
