//! Tests for body management, stepping and contact reporting.

use glam::Vec3;

use arena_core::constants::DT;
use arena_core::enums::EntityKind;
use arena_core::types::EntityRef;

use crate::body::{BodyDesc, BodyType, Shape};
use crate::world::PhysicsWorld;

fn floor(world: &mut PhysicsWorld) -> crate::BodyHandle {
    world.add_body(
        BodyDesc::new(
            BodyType::Static,
            Shape::Cuboid {
                half_extents: Vec3::new(50.0, 0.5, 50.0),
            },
            EntityRef::new(EntityKind::Environment, 0),
        )
        .at(Vec3::new(0.0, -0.5, 0.0)),
    )
}

fn ball(world: &mut PhysicsWorld, position: Vec3) -> crate::BodyHandle {
    world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::PLAYER,
        )
        .at(position)
        .with_mass(70.0),
    )
}

fn run(world: &mut PhysicsWorld, ticks: usize) {
    for _ in 0..ticks {
        world.step(DT);
    }
}

// ---- Integration ----

#[test]
fn test_dynamic_body_falls_and_rests_on_floor() {
    let mut world = PhysicsWorld::new();
    floor(&mut world);
    let b = ball(&mut world, Vec3::new(0.0, 3.0, 0.0));

    run(&mut world, 180);

    let pos = world.position(b).unwrap();
    assert!((pos.y - 0.5).abs() < 0.01, "ball should rest on floor, y = {}", pos.y);
    assert!(world.velocity(b).unwrap().y.abs() < 0.5);
}

#[test]
fn test_kinematic_moves_by_velocity_without_gravity() {
    let mut world = PhysicsWorld::new();
    let k = world.add_body(
        BodyDesc::new(
            BodyType::Kinematic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::new(EntityKind::Enemy, 0),
        )
        .at(Vec3::new(0.0, 1.0, 0.0)),
    );
    world.set_velocity(k, Vec3::X);

    run(&mut world, 60);

    let pos = world.position(k).unwrap();
    assert!((pos.x - 1.0).abs() < 1e-3, "x = {}", pos.x);
    assert!((pos.y - 1.0).abs() < 1e-6);
}

#[test]
fn test_sub_steps_are_capped() {
    let mut world = PhysicsWorld::new();
    let k = world.add_body(BodyDesc::new(
        BodyType::Kinematic,
        Shape::Sphere { radius: 0.5 },
        EntityRef::new(EntityKind::Enemy, 0),
    ));
    world.set_velocity(k, Vec3::X);

    let taken = world.step(1.0);
    assert_eq!(taken, world.settings().max_sub_steps);

    let expected = world.settings().fixed_step * taken as f32;
    assert!((world.position(k).unwrap().x - expected).abs() < 1e-4);

    // Backlog was dropped, so a normal tick takes exactly one sub-step.
    assert_eq!(world.step(DT), 1);
}

#[test]
fn test_impulse_scales_by_mass() {
    let mut world = PhysicsWorld::new();
    let b = ball(&mut world, Vec3::new(0.0, 5.0, 0.0));
    let f = floor(&mut world);

    world.apply_impulse(b, Vec3::new(70.0, 0.0, 0.0));
    world.apply_impulse(f, Vec3::new(70.0, 0.0, 0.0));

    assert!((world.velocity(b).unwrap().x - 1.0).abs() < 1e-4);
    assert_eq!(world.velocity(f).unwrap(), Vec3::ZERO);
}

// ---- Contacts ----

#[test]
fn test_floor_contact_reports_upward_normal() {
    let mut world = PhysicsWorld::new();
    let f = floor(&mut world);
    let b = ball(&mut world, Vec3::new(0.0, 0.55, 0.0));

    run(&mut world, 10);
    let events = world.drain_collisions();

    let event = events
        .iter()
        .find(|e| e.involves(b))
        .expect("ball should touch the floor");
    assert_eq!(event.other(b), Some(f));
    let normals = event.normals_for(b);
    assert!(!normals.is_empty());
    assert!(normals.iter().all(|n| n.dot(Vec3::Y) > 0.5));

    assert!(world.drain_collisions().is_empty(), "drain empties the queue");
}

#[test]
fn test_sensor_reports_without_pushing() {
    let mut world = PhysicsWorld::new();
    let b = world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::PLAYER,
        )
        .with_gravity_scale(0.0),
    );
    let pickup = world.add_body(
        BodyDesc::new(
            BodyType::Static,
            Shape::Sphere { radius: 0.6 },
            EntityRef::new(EntityKind::PowerUp, 3),
        )
        .at(Vec3::new(0.5, 0.0, 0.0))
        .sensor(),
    );

    world.step(DT);

    let events = world.drain_collisions();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].other(b), Some(pickup));
    assert_eq!(world.owner_of(pickup), Some(EntityRef::new(EntityKind::PowerUp, 3)));
    assert_eq!(world.position(b).unwrap(), Vec3::ZERO);
}

#[test]
fn test_overlapping_dynamic_pair_is_pushed_apart() {
    let mut world = PhysicsWorld::new();
    let a = world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::PLAYER,
        )
        .at(Vec3::new(-0.3, 0.0, 0.0))
        .with_mass(70.0)
        .with_gravity_scale(0.0),
    );
    let b = world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::new(EntityKind::Enemy, 0),
        )
        .at(Vec3::new(0.3, 0.0, 0.0))
        .with_mass(70.0)
        .with_gravity_scale(0.0),
    );

    run(&mut world, 30);

    let pa = world.position(a).unwrap();
    let pb = world.position(b).unwrap();
    assert!(pb.x - pa.x > 0.98, "gap = {}", pb.x - pa.x);
    assert!((pa.x + pb.x).abs() < 0.05, "equal masses split evenly");
}

#[test]
fn test_sensor_overlap_carries_no_normals() {
    let mut world = PhysicsWorld::new();
    let b = ball(&mut world, Vec3::ZERO);
    world.add_body(
        BodyDesc::new(
            BodyType::Static,
            Shape::Sphere { radius: 0.6 },
            EntityRef::new(EntityKind::PowerUp, 0),
        )
        .at(Vec3::new(0.0, -0.7, 0.0))
        .sensor(),
    );

    world.step(DT);

    let events = world.drain_collisions();
    assert_eq!(events.len(), 1);
    assert!(events[0].sensor);
    assert!(events[0].normals_for(b).is_empty());
}

#[test]
fn test_filter_blocks_non_interacting_kinds() {
    let mut world = PhysicsWorld::new();
    // A dynamic enemy overlapping a power-up sensor: not in each other's masks.
    world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::new(EntityKind::Enemy, 0),
        )
        .with_gravity_scale(0.0),
    );
    world.add_body(
        BodyDesc::new(
            BodyType::Static,
            Shape::Sphere { radius: 0.6 },
            EntityRef::new(EntityKind::PowerUp, 0),
        )
        .sensor(),
    );

    world.step(DT);
    assert!(world.drain_collisions().is_empty());
}

// ---- Lifecycle ----

#[test]
fn test_disabled_body_is_frozen_and_silent() {
    let mut world = PhysicsWorld::new();
    floor(&mut world);
    let b = ball(&mut world, Vec3::new(0.0, 0.5, 0.0));
    world.set_velocity(b, Vec3::new(3.0, 0.0, 0.0));

    world.set_enabled(b, false);
    assert!(!world.is_enabled(b));
    assert_eq!(world.velocity(b).unwrap(), Vec3::ZERO);
    assert_eq!(world.enabled_body_count(), 1);

    run(&mut world, 30);
    assert_eq!(world.position(b).unwrap(), Vec3::new(0.0, 0.5, 0.0));
    assert!(world.drain_collisions().is_empty());

    world.set_position(b, Vec3::new(0.0, 2.0, 0.0));
    world.set_enabled(b, true);
    assert!(world.is_enabled(b));
    run(&mut world, 5);
    assert!(world.position(b).unwrap().y < 2.0, "re-enabled body falls again");
}

#[test]
fn test_owner_lookup_and_removal() {
    let mut world = PhysicsWorld::new();
    let owner = EntityRef::new(EntityKind::Enemy, 7);
    let h = world.add_body(BodyDesc::new(
        BodyType::Kinematic,
        Shape::Sphere { radius: 0.5 },
        owner,
    ));

    assert_eq!(world.owner_of(h), Some(owner));
    assert!(world.remove_body(h));
    assert!(!world.contains(h));
    assert_eq!(world.owner_of(h), None);
    assert!(!world.remove_body(h));
    assert!(!world.is_enabled(h));
}

#[test]
fn test_set_shape_changes_contact_reach() {
    let mut world = PhysicsWorld::new();
    let b = world.add_body(
        BodyDesc::new(
            BodyType::Dynamic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::PLAYER,
        )
        .with_gravity_scale(0.0),
    );
    let enemy = world.add_body(
        BodyDesc::new(
            BodyType::Kinematic,
            Shape::Sphere { radius: 0.5 },
            EntityRef::new(EntityKind::Enemy, 0),
        )
        .at(Vec3::new(2.0, 0.0, 0.0)),
    );

    world.step(DT);
    assert!(world.drain_collisions().is_empty());

    world.set_shape(enemy, Shape::Sphere { radius: 1.8 });
    world.step(DT);
    let events = world.drain_collisions();
    assert_eq!(events.len(), 1);
    assert!(events[0].involves(b) && events[0].involves(enemy));
}
