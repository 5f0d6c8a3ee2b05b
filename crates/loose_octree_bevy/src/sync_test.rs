use bevy::math::Vec3;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::{EntityOctree, OctreePlugin, OctreeTracked};

fn app() -> App {
  let mut app = App::new();
  app.add_plugins(OctreePlugin::default());
  app
}

fn unit_aabb() -> Aabb {
  Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5))
}

fn spawn_tracked(app: &mut App, at: Vec3) -> Entity {
  app
    .world_mut()
    .spawn((OctreeTracked, unit_aabb(), GlobalTransform::from_translation(at)))
    .id()
}

fn octree(app: &App) -> &EntityOctree {
  app.world().resource::<EntityOctree>()
}

#[test]
fn test_tracked_entity_is_indexed() {
  let mut app = app();
  let entity = spawn_tracked(&mut app, Vec3::new(2.0, 0.0, 0.0));

  app.update();

  assert!(octree(&app).contains(entity));
  assert_eq!(
    octree(&app).entities_in(Vec3::new(1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0)),
    vec![entity]
  );
}

#[test]
fn test_unmarked_entity_is_ignored() {
  let mut app = app();
  let entity = app
    .world_mut()
    .spawn((unit_aabb(), GlobalTransform::IDENTITY))
    .id();

  app.update();

  assert!(!octree(&app).contains(entity));
  assert!(octree(&app).is_empty());
}

#[test]
fn test_moved_entity_is_reindexed() {
  let mut app = app();
  let entity = spawn_tracked(&mut app, Vec3::ZERO);
  app.update();

  app
    .world_mut()
    .entity_mut(entity)
    .insert(GlobalTransform::from_translation(Vec3::new(0.0, 30.0, 0.0)));
  app.update();

  let index = octree(&app);
  assert_eq!(index.len(), 1);
  assert_eq!(index.tree().count(), 1);
  assert!(index.entities_in(Vec3::splat(-1.0), Vec3::splat(1.0)).is_empty());
  assert_eq!(
    index.entities_in(Vec3::new(-1.0, 29.0, -1.0), Vec3::new(1.0, 31.0, 1.0)),
    vec![entity]
  );
}

#[test]
fn test_removing_marker_unindexes() {
  let mut app = app();
  let entity = spawn_tracked(&mut app, Vec3::ZERO);
  app.update();

  app.world_mut().entity_mut(entity).remove::<OctreeTracked>();
  app.update();

  assert!(!octree(&app).contains(entity));
  assert!(octree(&app).tree().is_empty());
}

#[test]
fn test_despawn_unindexes() {
  let mut app = app();
  let kept = spawn_tracked(&mut app, Vec3::ZERO);
  let despawned = spawn_tracked(&mut app, Vec3::splat(4.0));
  app.update();

  app.world_mut().despawn(despawned);
  app.update();

  assert!(octree(&app).contains(kept));
  assert!(!octree(&app).contains(despawned));
  assert_eq!(octree(&app).tree().count(), 1);
}
