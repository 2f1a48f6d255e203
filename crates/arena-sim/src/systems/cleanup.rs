//! Cleanup system: moves destroyed entities from the active lists back to
//! their pools, scores dead enemies and rolls their drops.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use arena_core::config::GameConfig;
use arena_core::constants::POWER_UP_HEIGHT;
use arena_core::enums::PowerUpKind;
use arena_core::events::GameEvent;
use arena_physics::PhysicsWorld;

use crate::entities::ActiveEntities;
use crate::pool::{EntityPool, Poolable, Pools};
use crate::score::ScoreState;
use crate::world_setup;

/// Single cleanup pass. Drops are spawned after all releases.
pub fn run(
    active: &mut ActiveEntities,
    pools: &mut Pools,
    physics: &mut PhysicsWorld,
    config: &GameConfig,
    rng: &mut ChaCha8Rng,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) {
    release_destroyed(&mut active.bullets, &mut pools.bullets, physics, events);

    let mut drops: Vec<(PowerUpKind, Vec3)> = Vec::new();
    let mut i = 0;
    while i < active.enemies.len() {
        if !active.enemies[i].is_destroyed() {
            i += 1;
            continue;
        }
        let enemy = active.enemies.swap_remove(i);

        score.score += enemy.score_value();
        score.kills += 1;
        info!(entity = %enemy.entity_ref(), enemy_type = enemy.enemy_type().id(), score = score.score, "enemy killed");
        events.push(GameEvent::EnemyKilled {
            entity: enemy.entity_ref(),
            enemy_type: enemy.enemy_type(),
        });
        events.push(GameEvent::ScoreChanged { score: score.score });

        if rng.gen::<f32>() < enemy.config().drop_chance {
            let kind = PowerUpKind::DROPPABLE[rng.gen_range(0..PowerUpKind::DROPPABLE.len())];
            let at = enemy.position();
            drops.push((kind, Vec3::new(at.x, POWER_UP_HEIGHT, at.z)));
        }

        events.push(GameEvent::EntityDeactivated {
            entity: enemy.entity_ref(),
        });
        pools.enemies.release(enemy, physics);
    }

    release_destroyed(&mut active.power_ups, &mut pools.power_ups, physics, events);

    for (kind, position) in drops {
        world_setup::spawn_power_up(active, pools, physics, config, kind, position, events);
    }
}

/// Return every active entity to its pool without scoring. Used when a
/// session ends.
pub fn clear_all(
    active: &mut ActiveEntities,
    pools: &mut Pools,
    physics: &mut PhysicsWorld,
    events: &mut Vec<GameEvent>,
) {
    release_all(&mut active.bullets, &mut pools.bullets, physics, events);
    release_all(&mut active.enemies, &mut pools.enemies, physics, events);
    release_all(&mut active.power_ups, &mut pools.power_ups, physics, events);
}

fn release_destroyed<T: Poolable>(
    list: &mut Vec<T>,
    pool: &mut EntityPool<T>,
    physics: &mut PhysicsWorld,
    events: &mut Vec<GameEvent>,
) {
    let mut i = 0;
    while i < list.len() {
        if !list[i].is_destroyed() {
            i += 1;
            continue;
        }
        let item = list.swap_remove(i);
        events.push(GameEvent::EntityDeactivated {
            entity: item.entity_ref(),
        });
        pool.release(item, physics);
    }
}

fn release_all<T: Poolable>(
    list: &mut Vec<T>,
    pool: &mut EntityPool<T>,
    physics: &mut PhysicsWorld,
    events: &mut Vec<GameEvent>,
) {
    for item in list.drain(..) {
        events.push(GameEvent::EntityDeactivated {
            entity: item.entity_ref(),
        });
        pool.release(item, physics);
    }
}
