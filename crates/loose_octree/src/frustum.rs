//! Plane sets for frustum culling.
//!
//! A plane keeps the half-space where `normal · p + distance >= 0`. A box is
//! culled only when it lies completely on the negative side of at least one
//! plane, so boxes straddling a plane are reported as visible.

use glam::{Mat4, Vec3, Vec4};

use crate::bounds::Aabb;

/// Oriented plane. Points with a non-negative signed distance are "inside".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub distance: f32,
}

impl Plane {
  pub fn new(normal: Vec3, distance: f32) -> Self {
    Self { normal, distance }
  }

  /// Build from `(a, b, c, d)` coefficients, normalizing by the length of the
  /// normal. A zero normal is kept as-is and accepts everything.
  pub fn from_vec4(coefficients: Vec4) -> Self {
    let normal = coefficients.truncate();
    let length = normal.length();
    if length > 0.0 {
      Self::new(normal / length, coefficients.w / length)
    } else {
      Self::new(normal, coefficients.w)
    }
  }

  #[inline]
  pub fn signed_distance(&self, point: Vec3) -> f32 {
    self.normal.dot(point) + self.distance
  }

  /// False when the whole box lies on the negative side of this plane.
  #[inline]
  pub fn accepts_aabb(&self, aabb: &Aabb) -> bool {
    // Corner furthest along the normal
    let positive = Vec3::select(self.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
    self.signed_distance(positive) >= 0.0
  }
}

/// True if `aabb` is inside or intersecting every plane of a convex set.
#[inline]
pub fn test_planes_aabb(planes: &[Plane], aabb: &Aabb) -> bool {
  planes.iter().all(|plane| plane.accepts_aabb(aabb))
}

/// The six planes of a view frustum (left, right, bottom, top, near, far).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumPlanes {
  pub planes: [Plane; 6],
}

impl FrustumPlanes {
  pub fn new(planes: [Plane; 6]) -> Self {
    Self { planes }
  }

  /// Extract the planes of a combined view-projection matrix with OpenGL clip
  /// depth (`-w <= z <= w`).
  pub fn from_view_projection(view_projection: Mat4) -> Self {
    let r0 = view_projection.row(0);
    let r1 = view_projection.row(1);
    let r2 = view_projection.row(2);
    let r3 = view_projection.row(3);

    Self::new([r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2].map(Plane::from_vec4))
  }

  #[inline]
  pub fn test_aabb(&self, aabb: &Aabb) -> bool {
    test_planes_aabb(&self.planes, aabb)
  }
}

impl AsRef<[Plane]> for FrustumPlanes {
  fn as_ref(&self) -> &[Plane] {
    &self.planes
  }
}
