//! BoundsOctree - owner of the root node.
//!
//! The node itself never grows: an insertion that does not fit the root makes
//! the holder double the root toward the object and retry. Removals shrink
//! the root again, but never below the initial world size.

use glam::Vec3;
use rayon::prelude::*;
use tracing::{debug, error};

use super::{BoundsOctreeNode, OctreeConfig, OctreeStats};
use crate::bounds::{Aabb, Ray};
use crate::error::OctreeError;
use crate::frustum::Plane;

/// Root growth attempts before an insertion is abandoned.
pub const MAX_GROW_ATTEMPTS: usize = 20;

/// A growing, shrinking loose octree.
#[derive(Clone, Debug)]
pub struct BoundsOctree<T> {
  root: BoundsOctreeNode<T>,
  config: OctreeConfig,
  count: usize,
}

impl<T> BoundsOctree<T> {
  /// Create an empty tree. Recoverable config values are clamped, see
  /// [`OctreeConfig::sanitized`].
  pub fn new(config: OctreeConfig) -> Result<Self, OctreeError> {
    config.validate()?;
    Ok(Self::from_config(config.sanitized()))
  }

  fn from_config(config: OctreeConfig) -> Self {
    let root = BoundsOctreeNode::new(
      config.initial_world_size,
      config.min_node_size,
      config.looseness,
      config.initial_world_pos,
    );
    Self {
      root,
      config,
      count: 0,
    }
  }

  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  pub fn root(&self) -> &BoundsOctreeNode<T> {
    &self.root
  }

  /// Number of objects in the tree.
  pub fn count(&self) -> usize {
    self.count
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Loose bounds of the current root.
  pub fn max_bounds(&self) -> Aabb {
    self.root.bounds()
  }

  pub fn stats(&self) -> OctreeStats {
    self.root.stats()
  }

  /// Add an object, growing the root until it fits.
  ///
  /// When the object still does not fit after [`MAX_GROW_ATTEMPTS`] grows the
  /// root is restored and the tree is left as it was.
  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "octree::add"))]
  pub fn add(&mut self, payload: T, bounds: Aabb) -> Result<(), OctreeError> {
    let mut payload = payload;
    // Root (length, center) before each grow
    let mut grown_from = Vec::new();
    loop {
      match self.root.try_add(payload, bounds) {
        Ok(()) => break,
        Err(rejected) => payload = rejected,
      }
      if grown_from.len() == MAX_GROW_ATTEMPTS {
        error!(
          attempts = MAX_GROW_ATTEMPTS,
          min = %bounds.min,
          max = %bounds.max,
          "aborted octree insertion, root grew too many times"
        );
        self.undo_growth(grown_from);
        return Err(OctreeError::GrowLimitExceeded {
          attempts: MAX_GROW_ATTEMPTS,
        });
      }
      grown_from.push((self.root.base_length(), self.root.center()));
      self.grow(bounds.center() - self.root.center())?;
    }
    self.count += 1;
    Ok(())
  }

  /// Double the root toward `direction`.
  ///
  /// The old root becomes one of the new root's children when it holds
  /// anything; an empty old root is simply dropped.
  fn grow(&mut self, direction: Vec3) -> Result<(), OctreeError> {
    let sign = |value: f32| if value >= 0.0 { 1.0 } else { -1.0 };
    let direction = Vec3::new(sign(direction.x), sign(direction.y), sign(direction.z));

    let old_length = self.root.base_length();
    let half = old_length / 2.0;
    let new_center = self.root.center() + direction * half;
    let new_root = BoundsOctreeNode::new(
      old_length * 2.0,
      self.config.min_node_size,
      self.config.looseness,
      new_center,
    );
    let old_root = std::mem::replace(&mut self.root, new_root);

    debug!(center = %new_center, base_length = old_length * 2.0, "octree root grown");

    if !old_root.has_any_objects() {
      return Ok(());
    }

    let root_octant = self.root.best_fit_child(old_root.center());
    let mut children: Vec<BoundsOctreeNode<T>> = self
      .root
      .child_bounds()
      .iter()
      .map(|child| {
        BoundsOctreeNode::new(
          old_length,
          self.config.min_node_size,
          self.config.looseness,
          child.center(),
        )
      })
      .collect();
    children[root_octant] = old_root;
    self.root.set_children(children)
  }

  /// Revert `grow` calls, newest first. Nothing may have been added since.
  fn undo_growth(&mut self, grown_from: Vec<(f32, Vec3)>) {
    for (length, center) in grown_from.into_iter().rev() {
      let octant = self.root.best_fit_child(center);
      self.root = match self.root.take_child(octant) {
        Some(previous) => previous,
        // The previous root was empty and got dropped
        None => BoundsOctreeNode::new(
          length,
          self.config.min_node_size,
          self.config.looseness,
          center,
        ),
      };
    }
    debug!(center = %self.root.center(), base_length = self.root.base_length(), "octree growth reverted");
  }

  /// Give the root one chance to shrink toward its content.
  pub fn shrink(&mut self) {
    let placeholder = BoundsOctreeNode::new(0.0, 0.0, self.config.looseness, Vec3::ZERO);
    let root = std::mem::replace(&mut self.root, placeholder);
    self.root = root.shrink_if_possible(self.config.initial_world_size);
  }

  /// Shrink repeatedly until the root stops changing.
  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "octree::compact"))]
  pub fn compact(&mut self) {
    loop {
      let before = (self.root.base_length(), self.root.center());
      self.shrink();
      if (self.root.base_length(), self.root.center()) == before {
        break;
      }
    }
  }

  pub fn is_colliding(&self, check: &Aabb) -> bool {
    self.root.is_colliding(check)
  }

  pub fn is_colliding_ray(&self, ray: &Ray, max_distance: f32) -> bool {
    self.root.is_colliding_ray(ray, max_distance)
  }

  pub fn get_colliding(&self, check: &Aabb, results: &mut Vec<T>)
  where
    T: Clone,
  {
    self.root.get_colliding(check, results);
  }

  pub fn get_colliding_ray(&self, ray: &Ray, max_distance: f32, results: &mut Vec<T>)
  where
    T: Clone,
  {
    self.root.get_colliding_ray(ray, max_distance, results);
  }

  pub fn get_within_frustum(&self, planes: &[Plane], results: &mut Vec<T>)
  where
    T: Clone,
  {
    self.root.get_within_frustum(planes, results);
  }

  /// Answer many box queries in parallel. Result `i` belongs to `queries[i]`.
  pub fn par_get_colliding_batch(&self, queries: &[Aabb]) -> Vec<Vec<T>>
  where
    T: Clone + Send + Sync,
  {
    #[cfg(feature = "trace")]
    let _span = tracing::info_span!("octree::par_get_colliding_batch", queries = queries.len()).entered();

    queries
      .par_iter()
      .map(|query| {
        let mut results = Vec::new();
        self.root.get_colliding(query, &mut results);
        results
      })
      .collect()
  }
}

impl<T: PartialEq> BoundsOctree<T> {
  /// Remove an object, searching the whole tree, then try to shrink.
  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "octree::remove"))]
  pub fn remove(&mut self, payload: &T) -> bool {
    let removed = self.root.remove(payload);
    if removed {
      self.count -= 1;
      self.shrink();
    }
    removed
  }

  /// Remove an object using the bounds it was added with, then try to shrink.
  ///
  /// Falls back to a full search when the bounds-guided descent misses, which
  /// happens for objects inserted before the root grew.
  pub fn remove_with_bounds(&mut self, payload: &T, bounds: &Aabb) -> bool {
    let removed =
      self.root.remove_with_bounds(payload, bounds) || self.root.remove(payload);
    if removed {
      self.count -= 1;
      self.shrink();
    }
    removed
  }
}

impl<T> Default for BoundsOctree<T> {
  fn default() -> Self {
    Self::from_config(OctreeConfig::default())
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
