//! Collision dispatch: routes overlaps and physics contacts to damage and
//! pickup handlers.
//!
//! Bullets are tested by bounding-sphere overlap only. Player contact with
//! enemies and power-ups counts either an overlap or a physics contact
//! reported this tick.

use tracing::trace;

use arena_core::constants::CONTACT_SKIN;
use arena_core::enums::{EnemyState, Owner};
use arena_core::events::GameEvent;
use arena_core::types::EntityRef;
use arena_physics::{CollisionEvent, PhysicsWorld};

use crate::controller::PlayerController;
use crate::entities::{ActiveEntities, Player};
use crate::pool::Poolable;

#[allow(clippy::too_many_arguments)]
pub fn run(
    active: &mut ActiveEntities,
    player: &mut Player,
    controller: &mut PlayerController,
    contacts: &[CollisionEvent],
    physics: &PhysicsWorld,
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    let touching = route_contacts(player, controller, contacts, physics);
    player_bullets_vs_enemies(active, events);

    if !player.is_alive() {
        return;
    }
    enemy_bullets_vs_player(active, player, now, events);
    player_vs_enemies(active, player, &touching, now, events);
    player_vs_power_ups(active, player, &touching, now, events);
}

/// Feed player contact normals to the grounded latch and collect the
/// entities the player body touched.
fn route_contacts(
    player: &Player,
    controller: &mut PlayerController,
    contacts: &[CollisionEvent],
    physics: &PhysicsWorld,
) -> Vec<EntityRef> {
    let body = player.body();
    let mut touching = Vec::new();
    for contact in contacts {
        let Some(other) = contact.other(body) else {
            continue;
        };
        controller.on_collision(contact, body, physics);
        if let Some(owner) = physics.owner_of(other) {
            touching.push(owner);
        }
    }
    touching
}

fn player_bullets_vs_enemies(active: &mut ActiveEntities, events: &mut Vec<GameEvent>) {
    for bullet in active
        .bullets
        .iter_mut()
        .filter(|b| !b.is_destroyed() && b.owner() == Owner::Player)
    {
        for enemy in active.enemies.iter_mut().filter(|e| e.is_alive()) {
            if !bullet.bounds().intersects(&enemy.bounds(), CONTACT_SKIN) {
                continue;
            }
            let from = enemy.state();
            let applied = enemy.take_damage(bullet.damage());
            if applied <= 0.0 {
                continue;
            }

            trace!(bullet = %bullet.entity_ref(), enemy = %enemy.entity_ref(), applied, "bullet hit");
            if enemy.state() == EnemyState::Dying {
                events.push(GameEvent::EnemyStateChanged {
                    entity: enemy.entity_ref(),
                    from,
                    to: EnemyState::Dying,
                });
            }
            bullet.destroy();
            break;
        }
    }
}

fn enemy_bullets_vs_player(
    active: &mut ActiveEntities,
    player: &mut Player,
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    let bounds = player.bounds();
    for bullet in active
        .bullets
        .iter_mut()
        .filter(|b| !b.is_destroyed() && b.owner() == Owner::Enemy)
    {
        if !bullet.bounds().intersects(&bounds, CONTACT_SKIN) {
            continue;
        }
        let applied = player.take_damage(bullet.damage(), now);
        trace!(bullet = %bullet.entity_ref(), applied, "player hit");
        push_damage(player, applied, events);
        bullet.destroy();
    }
}

fn player_vs_enemies(
    active: &mut ActiveEntities,
    player: &mut Player,
    touching: &[EntityRef],
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    let bounds = player.bounds();
    for enemy in active.enemies.iter().filter(|e| e.is_alive()) {
        let overlap = enemy.bounds().intersects(&bounds, CONTACT_SKIN)
            || touching.contains(&enemy.entity_ref());
        if !overlap {
            continue;
        }
        let applied = player.take_damage(enemy.config().collision_damage, now);
        push_damage(player, applied, events);
    }
}

fn player_vs_power_ups(
    active: &mut ActiveEntities,
    player: &mut Player,
    touching: &[EntityRef],
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    let bounds = player.bounds();
    for power_up in active.power_ups.iter_mut().filter(|p| !p.is_destroyed()) {
        let overlap = power_up.bounds().intersects(&bounds, CONTACT_SKIN)
            || touching.contains(&power_up.entity_ref());
        if overlap && power_up.collect(player, now) {
            events.push(GameEvent::PowerUpCollected {
                kind: power_up.kind(),
            });
        }
    }
}

fn push_damage(player: &Player, applied: f32, events: &mut Vec<GameEvent>) {
    if applied > 0.0 {
        events.push(GameEvent::PlayerDamaged {
            amount: applied,
            health: player.health(),
        });
    }
}
