//! Conversions between bevy's math / render primitives and loose_octree types.
//!
//! Vectors are converted through arrays so the two crates do not need to agree
//! on a glam version.

use bevy::math::{Vec3, Vec4};
use bevy::prelude::GlobalTransform;
use bevy::render::primitives::{Aabb, Frustum};
use loose_octree::glam;
use loose_octree::{FrustumPlanes, Plane};

#[inline]
pub fn to_octree_vec3(v: Vec3) -> glam::Vec3 {
  glam::Vec3::from_array(v.to_array())
}

#[inline]
pub fn to_bevy_vec3(v: glam::Vec3) -> Vec3 {
  Vec3::from_array(v.to_array())
}

#[inline]
fn to_octree_vec4(v: Vec4) -> glam::Vec4 {
  glam::Vec4::from_array(v.to_array())
}

/// World-space box enclosing a local `Aabb` under `transform`.
///
/// Rotated boxes are enclosed, not fitted, so the result can be larger than
/// the rotated box itself.
pub fn world_bounds(aabb: &Aabb, transform: &GlobalTransform) -> loose_octree::Aabb {
  let affine = transform.affine();
  let center = affine.transform_point3a(aabb.center);
  let half = aabb.half_extents;
  let matrix = affine.matrix3;
  let world_half =
    matrix.x_axis.abs() * half.x + matrix.y_axis.abs() * half.y + matrix.z_axis.abs() * half.z;

  loose_octree::Aabb::from_center_half_extents(
    to_octree_vec3(Vec3::from(center)),
    to_octree_vec3(Vec3::from(world_half)),
  )
}

/// Convert bevy's frustum half-spaces (inside when `n · p + d > 0`).
pub fn frustum_planes(frustum: &Frustum) -> FrustumPlanes {
  FrustumPlanes::new(
    frustum
      .half_spaces
      .map(|half_space| Plane::from_vec4(to_octree_vec4(half_space.normal_d()))),
  )
}
