//! Octree sync and debug drawing systems.

pub mod gizmos;
pub mod sync;
