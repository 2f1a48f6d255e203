//! Events emitted by the simulation for the renderer and UI.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityRef;

/// Notifications drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Entity became active: add its scene-graph node.
    EntityActivated { entity: EntityRef, model: String },
    /// Entity returned to its pool: remove its scene-graph node.
    EntityDeactivated { entity: EntityRef },
    StateChanged { from: GameState, to: GameState },
    WaveStarted { wave: u32, enemy_count: u32 },
    WaveCompleted { wave: u32 },
    ScoreChanged { score: u32 },
    EnemyStateChanged {
        entity: EntityRef,
        from: EnemyState,
        to: EnemyState,
    },
    EnemyKilled { entity: EntityRef, enemy_type: EnemyType },
    PlayerDamaged { amount: f32, health: f32 },
    PowerUpCollected { kind: PowerUpKind },
    WeaponFired { weapon_id: String },
    WeaponSwitched { weapon_id: String },
    /// Localizable message for the HUD (key into the string tables).
    Notice { level: NoticeLevel, key: String },
}
