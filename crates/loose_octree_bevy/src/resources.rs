//! Bevy resources for the entity octree.

use std::collections::HashMap;

use bevy::math::Vec3;
use bevy::prelude::*;
use bevy::render::primitives::Frustum;
use loose_octree::{Aabb as OctreeAabb, BoundsOctree, OctreeConfig, OctreeError, Ray};

use crate::convert::{frustum_planes, to_octree_vec3};

/// Spatial index of tracked entities, keyed by their world-space bounds.
///
/// Entities are never updated in place: a changed entity is removed with its
/// previous bounds and added again.
#[derive(Resource, Default)]
pub struct EntityOctree {
  tree: BoundsOctree<Entity>,
  /// Bounds each entity was inserted with.
  tracked: HashMap<Entity, OctreeAabb>,
}

impl EntityOctree {
  pub fn new(config: OctreeConfig) -> Result<Self, OctreeError> {
    Ok(Self {
      tree: BoundsOctree::new(config)?,
      tracked: HashMap::new(),
    })
  }

  pub fn tree(&self) -> &BoundsOctree<Entity> {
    &self.tree
  }

  pub fn len(&self) -> usize {
    self.tracked.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tracked.is_empty()
  }

  pub fn contains(&self, entity: Entity) -> bool {
    self.tracked.contains_key(&entity)
  }

  /// World-space bounds the entity is currently indexed with.
  pub fn bounds_of(&self, entity: Entity) -> Option<OctreeAabb> {
    self.tracked.get(&entity).copied()
  }

  /// Insert an entity, or move it if its bounds changed.
  pub fn upsert(&mut self, entity: Entity, bounds: OctreeAabb) -> Result<(), OctreeError> {
    if let Some(previous) = self.tracked.get(&entity).copied() {
      if previous == bounds {
        return Ok(());
      }
      self.detach(entity, &previous);
      self.tracked.remove(&entity);
    }

    self.tree.add(entity, bounds)?;
    self.tracked.insert(entity, bounds);
    Ok(())
  }

  /// Drop an entity from the index. Returns false if it was not tracked.
  pub fn remove(&mut self, entity: Entity) -> bool {
    match self.tracked.remove(&entity) {
      Some(previous) => {
        self.detach(entity, &previous);
        true
      }
      None => false,
    }
  }

  fn detach(&mut self, entity: Entity, previous: &OctreeAabb) {
    if !self.tree.remove_with_bounds(&entity, previous) {
      warn!("entity {entity} was tracked but missing from the octree");
    }
  }

  /// Entities whose bounds are inside or intersect the camera frustum.
  pub fn visible_entities(&self, frustum: &Frustum) -> Vec<Entity> {
    let planes = frustum_planes(frustum);
    let mut visible = Vec::new();
    self.tree.get_within_frustum(planes.as_ref(), &mut visible);
    visible
  }

  /// Entities whose bounds intersect the box `min..=max`.
  pub fn entities_in(&self, min: Vec3, max: Vec3) -> Vec<Entity> {
    let query = OctreeAabb::new(to_octree_vec3(min), to_octree_vec3(max));
    let mut hits = Vec::new();
    self.tree.get_colliding(&query, &mut hits);
    hits
  }

  /// Entities whose bounds are hit by the ray within `max_distance`.
  pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<Entity> {
    let ray = Ray::new(to_octree_vec3(origin), to_octree_vec3(direction));
    let mut hits = Vec::new();
    self.tree.get_colliding_ray(&ray, max_distance, &mut hits);
    hits
  }
}

/// What [`crate::OctreeGizmosPlugin`] draws.
#[derive(Resource, Clone, Debug)]
pub struct OctreeGizmoSettings {
  /// Loose bounds of every node, tinted by depth.
  pub draw_nodes: bool,
  /// Bounds of every indexed entity.
  pub draw_objects: bool,
}

impl Default for OctreeGizmoSettings {
  fn default() -> Self {
    Self {
      draw_nodes: true,
      draw_objects: true,
    }
  }
}
