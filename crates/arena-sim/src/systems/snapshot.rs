//! Snapshot system: builds the `GameStateSnapshot` handed to the renderer
//! and UI. Read-only.

use arena_core::enums::GameState;
use arena_core::events::GameEvent;
use arena_core::state::*;
use arena_core::types::SimTime;

use crate::controller::PlayerController;
use crate::entities::{ActiveEntities, Player};
use crate::pool::Poolable;
use crate::score::ScoreState;
use crate::weapons::WeaponManager;

#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    time: &SimTime,
    state: GameState,
    wave: WaveView,
    score: &ScoreState,
    player: &Player,
    controller: &PlayerController,
    weapons: &WeaponManager,
    active: &ActiveEntities,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let now = time.elapsed_secs;

    GameStateSnapshot {
        time: *time,
        state,
        wave,
        score: score.view(),
        player: PlayerView {
            transform: player.transform(),
            pitch: player.pitch(),
            health: player.health(),
            max_health: player.max_health(),
            speed_multiplier: player.speed_multiplier(now),
            shielded: player.is_shielded(now),
            grounded: controller.is_grounded(),
            effects: player.effect_views(now),
        },
        weapon: weapons.view(),
        enemies: active
            .enemies
            .iter()
            .map(|e| EnemyView {
                entity: e.entity_ref(),
                enemy_type: e.enemy_type(),
                state: e.state(),
                transform: e.transform(),
                health: e.health(),
                max_health: e.max_health(),
            })
            .collect(),
        bullets: active
            .bullets
            .iter()
            .map(|b| BulletView {
                entity: b.entity_ref(),
                owner: b.owner(),
                transform: b.transform(),
            })
            .collect(),
        power_ups: active
            .power_ups
            .iter()
            .map(|p| PowerUpView {
                entity: p.entity_ref(),
                kind: p.kind(),
                transform: p.transform(),
            })
            .collect(),
        events,
    }
}
