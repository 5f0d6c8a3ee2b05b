//! OctreeConfig - construction parameters for a [`super::BoundsOctree`].

use glam::Vec3;
use tracing::warn;

use crate::error::OctreeError;

/// Smallest accepted looseness (tight octree).
pub const MIN_LOOSENESS: f32 = 1.0;

/// Largest accepted looseness. Beyond this nodes overlap their siblings so much
/// that queries stop pruning.
pub const MAX_LOOSENESS: f32 = 2.0;

/// Configuration for a growing / shrinking octree.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeConfig {
  /// Edge length of the initial root, before looseness.
  /// Also the size the tree never shrinks below.
  pub initial_world_size: f32,

  /// Center of the initial root.
  pub initial_world_pos: Vec3,

  /// Nodes are not split when their children would be smaller than this.
  pub min_node_size: f32,

  /// Multiplier applied to every node's edge length to get its loose bounds.
  pub looseness: f32,
}

impl OctreeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_initial_world_size(mut self, size: f32) -> Self {
    self.initial_world_size = size;
    self
  }

  pub fn with_initial_world_pos(mut self, pos: Vec3) -> Self {
    self.initial_world_pos = pos;
    self
  }

  pub fn with_min_node_size(mut self, size: f32) -> Self {
    self.min_node_size = size;
    self
  }

  pub fn with_looseness(mut self, looseness: f32) -> Self {
    self.looseness = looseness;
    self
  }

  /// Reject values that cannot describe a tree.
  pub fn validate(&self) -> Result<(), OctreeError> {
    if !(self.initial_world_size.is_finite() && self.initial_world_size > 0.0) {
      return Err(OctreeError::InvalidConfig(format!(
        "initial_world_size must be positive and finite, got {}",
        self.initial_world_size
      )));
    }
    if !(self.min_node_size.is_finite() && self.min_node_size > 0.0) {
      return Err(OctreeError::InvalidConfig(format!(
        "min_node_size must be positive and finite, got {}",
        self.min_node_size
      )));
    }
    if !self.looseness.is_finite() {
      return Err(OctreeError::InvalidConfig(format!(
        "looseness must be finite, got {}",
        self.looseness
      )));
    }
    if !self.initial_world_pos.is_finite() {
      return Err(OctreeError::InvalidConfig(format!(
        "initial_world_pos must be finite, got {}",
        self.initial_world_pos
      )));
    }
    Ok(())
  }

  /// Clamp recoverable values: looseness into `[1, 2]` and the minimum node
  /// size to at most the initial world size.
  pub fn sanitized(mut self) -> Self {
    if self.min_node_size > self.initial_world_size {
      warn!(
        min_node_size = self.min_node_size,
        initial_world_size = self.initial_world_size,
        "minimum node size larger than initial world size, clamping"
      );
      self.min_node_size = self.initial_world_size;
    }

    let clamped = self.looseness.clamp(MIN_LOOSENESS, MAX_LOOSENESS);
    if clamped != self.looseness {
      warn!(looseness = self.looseness, clamped, "looseness out of range, clamping");
      self.looseness = clamped;
    }
    self
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      initial_world_size: 64.0,
      initial_world_pos: Vec3::ZERO,
      min_node_size: 1.0,
      looseness: 1.25,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
