//! Error type shared by the octree node and root holder.

use thiserror::Error;

/// Contract violations and unrecoverable insertion failures.
///
/// "Does not fit" on a single node is not an error: [`crate::BoundsOctreeNode::add`]
/// returns `false` and the owner is expected to grow the tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OctreeError {
  /// A child array with something other than exactly eight nodes was supplied.
  #[error("child octree array must contain exactly 8 nodes, found {found}")]
  ChildCount { found: usize },

  /// The root was doubled this many times and the object still did not fit.
  #[error("object does not fit after growing the octree {attempts} times")]
  GrowLimitExceeded { attempts: usize },

  /// Configuration values that cannot describe a tree (NaN, zero or negative sizes).
  #[error("invalid octree configuration: {0}")]
  InvalidConfig(String),
}
