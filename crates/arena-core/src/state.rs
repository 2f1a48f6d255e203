//! Game state snapshot: the complete visible state handed to the renderer
//! and UI after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EntityRef, SimTime, Transform};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub state: GameState,
    pub wave: WaveView,
    pub score: ScoreView,
    pub player: PlayerView,
    pub weapon: Option<WeaponView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub power_ups: Vec<PowerUpView>,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave: u32,
    pub enemies_in_wave: u32,
    pub remaining_to_spawn: u32,
    pub active_enemies: u32,
    /// Seconds left in the wave transition countdown (0 outside it).
    pub transition_remaining_secs: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub kills: u32,
    pub shots_fired: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub transform: Transform,
    /// Camera pitch (radians), independent of the body orientation.
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed_multiplier: f32,
    pub shielded: bool,
    pub grounded: bool,
    pub effects: Vec<EffectView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub remaining_secs: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub id: String,
    pub name: String,
    /// `None` for infinite ammo.
    pub ammo: Option<u32>,
    pub max_ammo: Option<u32>,
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub entity: EntityRef,
    pub enemy_type: EnemyType,
    pub state: EnemyState,
    pub transform: Transform,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub entity: EntityRef,
    pub owner: Owner,
    pub transform: Transform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub entity: EntityRef,
    pub kind: PowerUpKind,
    pub transform: Transform,
}
