//! loose_octree - Engine independent loose bounds octree
//!
//! This crate provides a dynamic spatial index for payloads tagged with an
//! axis-aligned bounding box. Nodes are "loose": each node's occupancy region
//! is enlarged by a constant multiplier so objects sitting near an octant
//! boundary do not force deep re-splits.
//!
//! # Features
//!
//! - **Bounds / ray / frustum queries**: both short-circuiting
//!   (`is_colliding*`) and collecting (`get_colliding*`, `get_within_frustum`)
//! - **Automatic split / merge**: nodes split past 8 objects and merge back
//!   once the subtree drops to 8 or fewer
//! - **Growing root**: [`BoundsOctree`] doubles the root when an insertion
//!   does not fit and shrinks it again after removals
//! - **Batch queries**: rayon-parallel box queries over a shared borrow
//!
//! # Example
//!
//! ```ignore
//! use loose_octree::{Aabb, BoundsOctree, OctreeConfig};
//! use glam::Vec3;
//!
//! let mut tree = BoundsOctree::new(OctreeConfig::default())?;
//! tree.add(42u32, Aabb::from_center_size(Vec3::ZERO, Vec3::ONE))?;
//!
//! let mut hits = Vec::new();
//! tree.get_colliding(&Aabb::from_center_size(Vec3::ZERO, Vec3::splat(4.0)), &mut hits);
//! assert_eq!(hits, vec![42]);
//! ```

pub mod bounds;
pub mod error;
pub mod frustum;

// Re-export the math crate so integrations can match our vector types.
pub use glam;

pub use bounds::{Aabb, Ray};
pub use error::OctreeError;
pub use frustum::{test_planes_aabb, FrustumPlanes, Plane};

// Octree node, root holder and configuration
pub mod octree;
pub use octree::{
  BoundsOctree, BoundsOctreeNode, OctreeConfig, OctreeObject, OctreeStats, NUM_OBJECTS_ALLOWED,
};
