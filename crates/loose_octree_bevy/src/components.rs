//! Bevy components for octree indexing.

use bevy::prelude::*;

/// Marker for entities kept in the [`crate::EntityOctree`].
///
/// The entity also needs an `Aabb` and a `GlobalTransform`.
///
/// # Example
/// ```ignore
/// commands.spawn((
///     Mesh3d(mesh),
///     MeshMaterial3d(material),
///     Transform::from_xyz(0.0, 2.0, 0.0),
///     OctreeTracked,
/// ));
/// ```
#[derive(Component, Default, Clone, Copy, Debug)]
pub struct OctreeTracked;
