//! Structural summary of an octree, for debug overlays and tests.

/// Node and object counts gathered by walking a subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
  /// Nodes visited, including the root.
  pub node_count: usize,
  /// Nodes without children.
  pub leaf_count: usize,
  /// Depth of the deepest node (root = 0).
  pub max_depth: usize,
  /// Objects stored anywhere in the subtree.
  pub object_count: usize,
}

impl OctreeStats {
  pub(crate) fn record(&mut self, depth: usize, is_leaf: bool, objects: usize) {
    self.node_count += 1;
    if is_leaf {
      self.leaf_count += 1;
    }
    self.max_depth = self.max_depth.max(depth);
    self.object_count += objects;
  }

  /// Internal (split) nodes.
  pub fn internal_count(&self) -> usize {
    self.node_count - self.leaf_count
  }
}
