//! BoundsOctreeNode - one cubic region of a loose octree.
//!
//! A node stores objects that do not fit entirely inside one of its children
//! and, once more than [`NUM_OBJECTS_ALLOWED`] objects arrive, exactly eight
//! children. Children hold half the edge length and share `min_size` and
//! `looseness` with the whole tree.

use glam::Vec3;
use smallvec::SmallVec;
use tracing::debug;

use super::OctreeStats;
use crate::bounds::{Aabb, Ray};
use crate::error::OctreeError;
use crate::frustum::{test_planes_aabb, Plane};

/// Object count above which a childless node splits.
pub const NUM_OBJECTS_ALLOWED: usize = 8;

/// Unit offsets of the eight child centers, indexed by octant.
///
/// Octants 0-3 are above the center (+Y), 4-7 below. Odd octants are +X,
/// octants 2, 3, 6, 7 are +Z.
const OCTANT_OFFSETS: [Vec3; 8] = [
  Vec3::new(-1.0, 1.0, -1.0),
  Vec3::new(1.0, 1.0, -1.0),
  Vec3::new(-1.0, 1.0, 1.0),
  Vec3::new(1.0, 1.0, 1.0),
  Vec3::new(-1.0, -1.0, -1.0),
  Vec3::new(1.0, -1.0, -1.0),
  Vec3::new(-1.0, -1.0, 1.0),
  Vec3::new(1.0, -1.0, 1.0),
];

/// Octant of `point` relative to `center`.
///
/// x and z send ties to the low side, y sends ties to the *high* side (which
/// carries the low indices), so the center itself is octant 0.
#[inline]
pub fn octant_index(center: Vec3, point: Vec3) -> usize {
  (if point.x <= center.x { 0 } else { 1 })
    + (if point.y >= center.y { 0 } else { 4 })
    + (if point.z <= center.z { 0 } else { 2 })
}

/// A payload together with the bounds it was inserted with.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeObject<T> {
  pub payload: T,
  pub bounds: Aabb,
}

impl<T> OctreeObject<T> {
  pub fn new(payload: T, bounds: Aabb) -> Self {
    Self { payload, bounds }
  }
}

/// Outcome of the shrink analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShrinkPlan {
  /// Replace the node with this child.
  Promote(usize),
  /// Halve the node in place, recentered on this octant.
  Resize(usize),
}

/// Loose octree node.
///
/// Structurally a node is either a leaf (`children == None`) or internal
/// (exactly eight children). There is no half-split state.
#[derive(Clone, Debug)]
pub struct BoundsOctreeNode<T> {
  center: Vec3,
  /// Edge length with a looseness of 1.0.
  base_length: f32,
  looseness: f32,
  min_size: f32,
  /// `looseness * base_length`
  adj_length: f32,
  /// Loose bounds: occupancy and query region.
  bounds: Aabb,
  /// Tight regions of the eight prospective children.
  child_bounds: [Aabb; 8],
  objects: SmallVec<[OctreeObject<T>; NUM_OBJECTS_ALLOWED]>,
  children: Option<Box<[BoundsOctreeNode<T>; 8]>>,
}

impl<T> BoundsOctreeNode<T> {
  /// Create an empty leaf.
  ///
  /// * `base_length` - edge length, not taking looseness into account
  /// * `min_size` - nodes are never split into children smaller than this
  /// * `looseness` - multiplier for `base_length` to get the actual size
  /// * `center` - center of the tight cube
  pub fn new(base_length: f32, min_size: f32, looseness: f32, center: Vec3) -> Self {
    let mut node = Self {
      center,
      base_length,
      looseness,
      min_size,
      adj_length: 0.0,
      bounds: Aabb::ZERO,
      child_bounds: [Aabb::ZERO; 8],
      objects: SmallVec::new(),
      children: None,
    };
    node.set_values(base_length, min_size, looseness, center);
    node
  }

  /// Recompute the node geometry in place. Objects and children are untouched.
  pub fn set_values(&mut self, base_length: f32, min_size: f32, looseness: f32, center: Vec3) {
    self.base_length = base_length;
    self.min_size = min_size;
    self.looseness = looseness;
    self.center = center;
    self.adj_length = looseness * base_length;
    self.bounds = Aabb::from_center_size(center, Vec3::splat(self.adj_length));

    let quarter = base_length / 4.0;
    let child_size = Vec3::splat(base_length / 2.0);
    self.child_bounds = std::array::from_fn(|octant| {
      Aabb::from_center_size(center + OCTANT_OFFSETS[octant] * quarter, child_size)
    });
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    self.center
  }

  #[inline]
  pub fn base_length(&self) -> f32 {
    self.base_length
  }

  #[inline]
  pub fn looseness(&self) -> f32 {
    self.looseness
  }

  #[inline]
  pub fn min_size(&self) -> f32 {
    self.min_size
  }

  /// Loose bounds of this node.
  #[inline]
  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  /// Tight bounds of the eight prospective children.
  #[inline]
  pub fn child_bounds(&self) -> &[Aabb; 8] {
    &self.child_bounds
  }

  /// Objects stored directly at this node (not in children).
  #[inline]
  pub fn objects(&self) -> &[OctreeObject<T>] {
    &self.objects
  }

  #[inline]
  pub fn children(&self) -> Option<&[BoundsOctreeNode<T>; 8]> {
    self.children.as_deref()
  }

  #[inline]
  pub fn has_children(&self) -> bool {
    self.children.is_some()
  }

  fn child_nodes(&self) -> &[BoundsOctreeNode<T>] {
    match self.children.as_deref() {
      Some(children) => children,
      None => &[],
    }
  }

  /// Octant a point would be routed to. See [`octant_index`].
  #[inline]
  pub fn best_fit_child(&self, point: Vec3) -> usize {
    octant_index(self.center, point)
  }

  /// Add an object.
  ///
  /// Returns `false` without touching the node when `bounds` is not entirely
  /// inside this node's loose bounds; the owner should grow the tree and retry.
  pub fn add(&mut self, payload: T, bounds: Aabb) -> bool {
    self.try_add(payload, bounds).is_ok()
  }

  /// Like [`add`](Self::add), but hands the payload back when it does not fit.
  pub fn try_add(&mut self, payload: T, bounds: Aabb) -> Result<(), T> {
    if !self.bounds.encapsulates(&bounds) {
      return Err(payload);
    }
    self.sub_add(payload, bounds);
    Ok(())
  }

  /// Insert into a node already known to encapsulate `bounds`.
  fn sub_add(&mut self, payload: T, bounds: Aabb) {
    if self.children.is_none() {
      // Few enough objects, or children would be below min size
      if self.objects.len() < NUM_OBJECTS_ALLOWED || self.base_length / 2.0 < self.min_size {
        self.objects.push(OctreeObject::new(payload, bounds));
        return;
      }

      self.split();
      self.rehome_objects();
    }

    let best_fit = self.best_fit_child(bounds.center());
    let fits = self.child_bounds[best_fit].encapsulates(&bounds);
    match self.children.as_deref_mut() {
      Some(children) if fits => children[best_fit].sub_add(payload, bounds),
      _ => self.objects.push(OctreeObject::new(payload, bounds)),
    }
  }

  /// Create the eight children.
  fn split(&mut self) {
    let quarter = self.base_length / 4.0;
    let child_length = self.base_length / 2.0;
    let (center, min_size, looseness) = (self.center, self.min_size, self.looseness);

    self.children = Some(Box::new(std::array::from_fn(|octant| {
      BoundsOctreeNode::new(
        child_length,
        min_size,
        looseness,
        center + OCTANT_OFFSETS[octant] * quarter,
      )
    })));

    debug!(
      center = %self.center,
      base_length = self.base_length,
      objects = self.objects.len(),
      "octree node split"
    );
  }

  /// Push every direct object that fits its best-fit child down into it.
  fn rehome_objects(&mut self) {
    let Some(children) = self.children.as_deref_mut() else {
      return;
    };

    let mut index = self.objects.len();
    while index > 0 {
      index -= 1;
      let bounds = self.objects[index].bounds;
      let best_fit = octant_index(self.center, bounds.center());
      if self.child_bounds[best_fit].encapsulates(&bounds) {
        let object = self.objects.swap_remove(index);
        children[best_fit].sub_add(object.payload, object.bounds);
      }
    }
  }

  /// Merge all children into this node, the opposite of split.
  ///
  /// Only called when no child has children of its own.
  fn merge(&mut self) {
    let Some(children) = self.children.take() else {
      return;
    };
    for child in *children {
      self.objects.extend(child.objects);
    }

    debug!(
      center = %self.center,
      base_length = self.base_length,
      objects = self.objects.len(),
      "octree node merged"
    );
  }

  /// True when this node and its (grandchild-free) children hold few enough
  /// objects to collapse into one leaf.
  fn should_merge(&self) -> bool {
    let mut total = self.objects.len();
    for child in self.child_nodes() {
      if child.children.is_some() {
        return false;
      }
      total += child.objects.len();
    }
    total <= NUM_OBJECTS_ALLOWED
  }

  fn merge_if_needed(&mut self) {
    if self.children.is_some() && self.should_merge() {
      self.merge();
    }
  }

  /// Install exactly eight children.
  ///
  /// Used when growing a tree around an existing root. Any other count is
  /// rejected and the node is left unchanged.
  pub fn set_children(&mut self, children: Vec<BoundsOctreeNode<T>>) -> Result<(), OctreeError> {
    let children: Box<[BoundsOctreeNode<T>; 8]> = children
      .into_boxed_slice()
      .try_into()
      .map_err(|rejected: Box<[BoundsOctreeNode<T>]>| OctreeError::ChildCount {
        found: rejected.len(),
      })?;
    self.children = Some(children);
    Ok(())
  }

  /// Detach the child at `octant`, dropping the other seven.
  pub(crate) fn take_child(&mut self, octant: usize) -> Option<Self> {
    let children = self.children.take()?;
    let mut children = (children as Box<[BoundsOctreeNode<T>]>).into_vec();
    Some(children.swap_remove(octant))
  }

  /// True if this node or anything below it holds an object.
  pub fn has_any_objects(&self) -> bool {
    !self.objects.is_empty() || self.child_nodes().iter().any(|child| child.has_any_objects())
  }

  /// Number of objects in this node and all descendants.
  pub fn total_objects(&self) -> usize {
    self.objects.len()
      + self
        .child_nodes()
        .iter()
        .map(|child| child.total_objects())
        .sum::<usize>()
  }

  /// Depth-first walk; `f` receives the depth (0 for this node) and the node.
  pub fn visit<F: FnMut(usize, &BoundsOctreeNode<T>)>(&self, f: &mut F) {
    self.visit_at(0, f);
  }

  fn visit_at<F: FnMut(usize, &BoundsOctreeNode<T>)>(&self, depth: usize, f: &mut F) {
    f(depth, self);
    for child in self.child_nodes() {
      child.visit_at(depth + 1, f);
    }
  }

  /// Structural summary of the subtree rooted here.
  pub fn stats(&self) -> OctreeStats {
    let mut stats = OctreeStats::default();
    self.visit(&mut |depth, node| stats.record(depth, node.children.is_none(), node.objects.len()));
    stats
  }

  /// Check if `check` intersects anything in the subtree.
  pub fn is_colliding(&self, check: &Aabb) -> bool {
    if !self.bounds.intersects(check) {
      return false;
    }
    if self.objects.iter().any(|object| object.bounds.intersects(check)) {
      return true;
    }
    self.child_nodes().iter().any(|child| child.is_colliding(check))
  }

  /// Check if `ray` hits anything in the subtree within `max_distance`.
  pub fn is_colliding_ray(&self, ray: &Ray, max_distance: f32) -> bool {
    if !hit_within(&self.bounds, ray, max_distance) {
      return false;
    }
    if self.objects.iter().any(|object| hit_within(&object.bounds, ray, max_distance)) {
      return true;
    }
    self.child_nodes().iter().any(|child| child.is_colliding_ray(ray, max_distance))
  }

  /// Append every payload whose bounds intersect `check`.
  pub fn get_colliding(&self, check: &Aabb, results: &mut Vec<T>)
  where
    T: Clone,
  {
    if !self.bounds.intersects(check) {
      return;
    }
    results.extend(
      self
        .objects
        .iter()
        .filter(|object| object.bounds.intersects(check))
        .map(|object| object.payload.clone()),
    );
    for child in self.child_nodes() {
      child.get_colliding(check, results);
    }
  }

  /// Append every payload whose bounds are hit by `ray` within `max_distance`.
  pub fn get_colliding_ray(&self, ray: &Ray, max_distance: f32, results: &mut Vec<T>)
  where
    T: Clone,
  {
    if !hit_within(&self.bounds, ray, max_distance) {
      return;
    }
    results.extend(
      self
        .objects
        .iter()
        .filter(|object| hit_within(&object.bounds, ray, max_distance))
        .map(|object| object.payload.clone()),
    );
    for child in self.child_nodes() {
      child.get_colliding_ray(ray, max_distance, results);
    }
  }

  /// Append every payload whose bounds are inside or intersecting the convex
  /// plane set. Subtrees whose loose bounds are outside are skipped.
  pub fn get_within_frustum(&self, planes: &[Plane], results: &mut Vec<T>)
  where
    T: Clone,
  {
    if !test_planes_aabb(planes, &self.bounds) {
      return;
    }
    results.extend(
      self
        .objects
        .iter()
        .filter(|object| test_planes_aabb(planes, &object.bounds))
        .map(|object| object.payload.clone()),
    );
    for child in self.child_nodes() {
      child.get_within_frustum(planes, results);
    }
  }

  /// Shrink a root node toward its content, returning the new root.
  ///
  /// Either promotes the single non-empty child, halves this node in place
  /// around the one octant all of its objects fit in, or returns `self`
  /// unchanged. Owners call this repeatedly until the root stops changing.
  pub fn shrink_if_possible(mut self, min_length: f32) -> Self {
    match self.shrink_plan(min_length) {
      None => self,
      Some(ShrinkPlan::Resize(octant)) => {
        // Any children are empty, everything left fits the octant
        self.children = None;
        let center = self.child_bounds[octant].center();
        self.set_values(self.base_length / 2.0, self.min_size, self.looseness, center);
        debug!(center = %self.center, base_length = self.base_length, "octree root resized");
        self
      }
      Some(ShrinkPlan::Promote(octant)) => {
        let Some(mut promoted) = self.take_child(octant) else {
          return self;
        };
        // Objects held by the old root already fit the promoted child's tight region
        for object in self.objects.drain(..) {
          promoted.sub_add(object.payload, object.bounds);
        }
        debug!(
          center = %promoted.center,
          base_length = promoted.base_length,
          "octree child promoted to root"
        );
        promoted
      }
    }
  }

  fn shrink_plan(&self, min_length: f32) -> Option<ShrinkPlan> {
    if self.base_length < 2.0 * min_length {
      return None;
    }
    if self.objects.is_empty() && self.children.is_none() {
      return None;
    }

    // All objects in this node must share one octant and fit inside it
    let mut best_fit = None;
    for object in &self.objects {
      let octant = self.best_fit_child(object.bounds.center());
      if best_fit.is_some_and(|chosen| chosen != octant) {
        return None;
      }
      if !self.child_bounds[octant].encapsulates(&object.bounds) {
        return None;
      }
      best_fit = Some(octant);
    }

    let Some(children) = self.children.as_deref() else {
      return best_fit.map(ShrinkPlan::Resize);
    };

    // At most one child may hold anything, and it must agree with the objects
    let mut occupied = None;
    for (octant, child) in children.iter().enumerate() {
      if !child.has_any_objects() {
        continue;
      }
      if occupied.is_some() {
        return None;
      }
      if best_fit.is_some_and(|chosen| chosen != octant) {
        return None;
      }
      occupied = Some(octant);
    }

    match occupied {
      Some(octant) => Some(ShrinkPlan::Promote(octant)),
      None => best_fit.map(ShrinkPlan::Resize),
    }
  }
}

impl<T: PartialEq> BoundsOctreeNode<T> {
  /// Remove an object, searching every child.
  ///
  /// Assumes the payload occurs at most once in the tree.
  pub fn remove(&mut self, payload: &T) -> bool {
    let mut removed = self.remove_direct(payload);

    if !removed {
      if let Some(children) = self.children.as_deref_mut() {
        removed = children.iter_mut().any(|child| child.remove(payload));
      }
    }

    if removed {
      self.merge_if_needed();
    }
    removed
  }

  /// Remove an object, descending only into the best-fit child of `bounds`.
  ///
  /// Cheaper than [`remove`](Self::remove) but only finds the object when it
  /// sits on the best-fit path of `bounds`. Even the exact insertion bounds can
  /// miss once a grown root has wrapped the node that holds the object, since
  /// objects in a loose margin are not on the new root's best-fit path.
  pub fn remove_with_bounds(&mut self, payload: &T, bounds: &Aabb) -> bool {
    self.bounds.encapsulates(bounds) && self.sub_remove(payload, bounds)
  }

  fn sub_remove(&mut self, payload: &T, bounds: &Aabb) -> bool {
    let mut removed = self.remove_direct(payload);

    if !removed {
      let best_fit = self.best_fit_child(bounds.center());
      if let Some(children) = self.children.as_deref_mut() {
        removed = children[best_fit].sub_remove(payload, bounds);
      }
    }

    if removed {
      self.merge_if_needed();
    }
    removed
  }

  fn remove_direct(&mut self, payload: &T) -> bool {
    match self.objects.iter().position(|object| &object.payload == payload) {
      Some(index) => {
        self.objects.swap_remove(index);
        true
      }
      None => false,
    }
  }
}

#[inline]
fn hit_within(bounds: &Aabb, ray: &Ray, max_distance: f32) -> bool {
  matches!(bounds.intersect_ray(ray), Some(distance) if distance <= max_distance)
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
