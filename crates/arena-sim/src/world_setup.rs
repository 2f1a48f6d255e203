//! Arena construction and the spawn paths that move pooled instances into
//! the active lists.

use glam::Vec3;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use arena_core::config::{EnemyConfig, GameConfig};
use arena_core::constants::{
    ARENA_HALF_EXTENT, ARENA_WALL_HEIGHT, ARENA_WALL_THICKNESS, PLAYER_RADIUS,
};
use arena_core::enums::{EnemyType, EntityKind, PowerUpKind};
use arena_core::events::GameEvent;
use arena_core::types::EntityRef;
use arena_physics::{BodyDesc, BodyHandle, BodyType, PhysicsWorld, Shape};

use crate::entities::ActiveEntities;
use crate::pool::{Poolable, Pools};
use crate::weapons::ProjectileRequest;

/// Where the player stands at the start of a session.
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, PLAYER_RADIUS, 0.0);

/// Floor and four walls. Returns the static bodies.
pub fn build_arena(physics: &mut PhysicsWorld) -> Vec<BodyHandle> {
    let half = ARENA_HALF_EXTENT;
    let wall_half_height = ARENA_WALL_HEIGHT / 2.0;
    let wall_half_thickness = ARENA_WALL_THICKNESS / 2.0;
    let span = half + ARENA_WALL_THICKNESS;

    let pieces = [
        // Floor, top face at y = 0
        (Vec3::new(0.0, -0.5, 0.0), Vec3::new(span, 0.5, span)),
        (
            Vec3::new(0.0, wall_half_height, -half - wall_half_thickness),
            Vec3::new(span, wall_half_height, wall_half_thickness),
        ),
        (
            Vec3::new(0.0, wall_half_height, half + wall_half_thickness),
            Vec3::new(span, wall_half_height, wall_half_thickness),
        ),
        (
            Vec3::new(-half - wall_half_thickness, wall_half_height, 0.0),
            Vec3::new(wall_half_thickness, wall_half_height, span),
        ),
        (
            Vec3::new(half + wall_half_thickness, wall_half_height, 0.0),
            Vec3::new(wall_half_thickness, wall_half_height, span),
        ),
    ];

    pieces
        .iter()
        .enumerate()
        .map(|(slot, (center, half_extents))| {
            physics.add_body(
                BodyDesc::new(
                    BodyType::Static,
                    Shape::Cuboid {
                        half_extents: *half_extents,
                    },
                    EntityRef::new(EntityKind::Environment, slot as u32),
                )
                .at(*center),
            )
        })
        .collect()
}

/// Turn a projectile request into an active bullet.
pub fn spawn_projectile(
    active: &mut ActiveEntities,
    pools: &mut Pools,
    physics: &mut PhysicsWorld,
    request: &ProjectileRequest,
    events: &mut Vec<GameEvent>,
) -> Option<EntityRef> {
    let mut bullet = pools.bullets.acquire()?;
    if !bullet.reset(request.origin, request.direction, request.damage, request.owner) {
        pools.bullets.release(bullet, physics);
        return None;
    }

    let entity = bullet.entity_ref();
    events.push(GameEvent::EntityActivated {
        entity,
        model: bullet.model().to_string(),
    });
    active.bullets.push(bullet);
    Some(entity)
}

/// Take an enemy from the pool and place it at `position`.
#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy(
    active: &mut ActiveEntities,
    pools: &mut Pools,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    enemy_type: EnemyType,
    config: &EnemyConfig,
    position: Vec3,
    events: &mut Vec<GameEvent>,
) -> Option<EntityRef> {
    let Some(mut enemy) = pools.enemies.acquire() else {
        warn!(enemy_type = enemy_type.id(), "no enemy available, skipping spawn");
        return None;
    };
    if !enemy.reset(enemy_type, config, position, physics, rng) {
        pools.enemies.release(enemy, physics);
        return None;
    }

    let entity = enemy.entity_ref();
    debug!(%entity, enemy_type = enemy_type.id(), ?position, "enemy spawned");
    events.push(GameEvent::EntityActivated {
        entity,
        model: enemy.model(),
    });
    active.enemies.push(enemy);
    Some(entity)
}

/// Take a power-up from the pool and place it at `position`.
pub fn spawn_power_up(
    active: &mut ActiveEntities,
    pools: &mut Pools,
    physics: &mut PhysicsWorld,
    config: &GameConfig,
    kind: PowerUpKind,
    position: Vec3,
    events: &mut Vec<GameEvent>,
) -> Option<EntityRef> {
    let Some(mut power_up) = pools.power_ups.acquire() else {
        warn!(kind = kind.id(), "no power-up available, skipping spawn");
        return None;
    };
    if !power_up.reset(position, kind, config, physics) {
        pools.power_ups.release(power_up, physics);
        return None;
    }

    let entity = power_up.entity_ref();
    events.push(GameEvent::EntityActivated {
        entity,
        model: power_up.model().to_string(),
    });
    active.power_ups.push(power_up);
    Some(entity)
}
