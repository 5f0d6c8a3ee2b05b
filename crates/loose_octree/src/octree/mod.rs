//! Loose bounds octree.
//!
//! The tree is a strict ownership hierarchy: every node owns its objects and
//! either no children or exactly eight. There are no parent pointers, so the
//! root can be swapped for one of its own children in O(1).
//!
//! # Octant Convention
//!
//! ```text
//! octant = (p.x <= c.x ? 0 : 1) + (p.y >= c.y ? 0 : 4) + (p.z <= c.z ? 0 : 2)
//! ```
//!
//! Note the y axis: points at or above the center go to the *low* indices.
//! A point exactly on the center maps to octant 0.
//!
//! # Module Structure
//!
//! - [`node`]: `BoundsOctreeNode` - recursive node with split / merge / shrink
//! - [`tree`]: `BoundsOctree` - root holder that grows and shrinks the tree
//! - [`config`]: `OctreeConfig` - initial size, minimum node size, looseness
//! - [`stats`]: `OctreeStats` - structural summary for debugging

pub mod config;
pub mod node;
pub mod stats;
pub mod tree;

// Re-exports
pub use config::OctreeConfig;
pub use node::{octant_index, BoundsOctreeNode, OctreeObject, NUM_OBJECTS_ALLOWED};
pub use stats::OctreeStats;
pub use tree::{BoundsOctree, MAX_GROW_ATTEMPTS};
