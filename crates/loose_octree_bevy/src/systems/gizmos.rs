//! Debug drawing of octree nodes and indexed bounds.

use bevy::prelude::*;

use crate::convert::to_bevy_vec3;
use crate::resources::{EntityOctree, OctreeGizmoSettings};

/// Depth at which node tint saturates.
const NODE_TINT_DEPTH: f32 = 7.0;

/// Node edge length at which object tint saturates.
const OBJECT_TINT_LENGTH: f32 = 20.0;

pub fn draw_octree_gizmos(
  octree: Res<EntityOctree>,
  settings: Res<OctreeGizmoSettings>,
  mut gizmos: Gizmos,
) {
  if !settings.draw_nodes && !settings.draw_objects {
    return;
  }

  octree.tree().root().visit(&mut |depth, node| {
    if settings.draw_nodes {
      let tint = (depth as f32 / NODE_TINT_DEPTH).min(1.0);
      draw_bounds(&mut gizmos, &node.bounds(), Color::srgb(tint, 0.0, 1.0 - tint));
    }
    if settings.draw_objects {
      let tint = (node.base_length() / OBJECT_TINT_LENGTH).min(1.0);
      for object in node.objects() {
        draw_bounds(
          &mut gizmos,
          &object.bounds,
          Color::srgba(0.0, 1.0 - tint, tint, 0.25),
        );
      }
    }
  });
}

fn draw_bounds(gizmos: &mut Gizmos, bounds: &loose_octree::Aabb, color: Color) {
  let transform = Transform::from_translation(to_bevy_vec3(bounds.center()))
    .with_scale(to_bevy_vec3(bounds.size()));
  gizmos.cuboid(transform, color);
}
