//! Axis-aligned bounding boxes and rays used by the octree.

use glam::Vec3;

/// Single-precision axis-aligned bounding box.
///
/// Both corners are inclusive: a box touching another box on a face counts as
/// intersecting, and a box sharing a face with its container is still
/// encapsulated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb {
	/// Degenerate box at the origin.
	pub const ZERO: Self = Self {
		min: Vec3::ZERO,
		max: Vec3::ZERO,
	};

	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from its center and full edge lengths.
	pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
		Self::from_center_half_extents(center, size * 0.5)
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Half of [`Aabb::size`].
	#[inline]
	pub fn extents(&self) -> Vec3 {
		self.size() * 0.5
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Check if `inner` lies entirely inside this box (both corners contained).
	#[inline]
	pub fn encapsulates(&self, inner: &Aabb) -> bool {
		self.contains_point(inner.min) && self.contains_point(inner.max)
	}

	/// Check if this AABB overlaps with another.
	///
	/// Two AABBs overlap if they share any interior or boundary points.
	#[inline]
	pub fn intersects(&self, other: &Aabb) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Slab test against a ray.
	///
	/// Returns the distance along the ray to the entry point, or `0.0` when the
	/// ray starts inside the box. `None` if the ray misses or the box is behind
	/// the origin.
	///
	/// A ray running along a face counts as a hit, matching [`Self::intersects`].
	pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
		let mut t_near = f32::NEG_INFINITY;
		let mut t_far = f32::INFINITY;

		for axis in 0..3 {
			let (origin, direction) = (ray.origin[axis], ray.direction[axis]);
			let (min, max) = (self.min[axis], self.max[axis]);

			// Parallel to this slab: inside it or never
			if direction == 0.0 {
				if origin < min || origin > max {
					return None;
				}
				continue;
			}

			let inv = direction.recip();
			let (t0, t1) = ((min - origin) * inv, (max - origin) * inv);
			t_near = t_near.max(t0.min(t1));
			t_far = t_far.min(t0.max(t1));
		}

		if t_far < 0.0 || t_near > t_far {
			return None;
		}
		Some(t_near.max(0.0))
	}
}

/// Half-line with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Vec3,
}

impl Ray {
	/// Create a ray; `direction` is normalized (zero stays zero).
	pub fn new(origin: Vec3, direction: Vec3) -> Self {
		Self {
			origin,
			direction: direction.normalize_or_zero(),
		}
	}

	/// Point at `distance` along the ray.
	#[inline]
	pub fn point_at(&self, distance: f32) -> Vec3 {
		self.origin + self.direction * distance
	}
}
