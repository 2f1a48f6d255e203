//! Behavioral profiles derived from enemy configuration.

use arena_core::config::EnemyConfig;
use arena_core::constants::ENEMY_TURN_RATE;

/// Parameters the FSM and steering need for one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile {
    /// Distance at which an idle enemy starts chasing.
    pub chase_distance: f32,
    /// Distance at which a chasing enemy stops to attack.
    pub attack_distance: f32,
    /// Whether attacks are projectiles rather than melee strikes.
    pub ranged: bool,
    /// Facing interpolation rate while chasing (per second).
    pub turn_rate: f32,
}

impl BehaviorProfile {
    pub fn from_config(config: &EnemyConfig) -> Self {
        Self {
            chase_distance: config.chase_distance,
            attack_distance: config.attack_distance(),
            ranged: config.ranged.is_some(),
            turn_rate: ENEMY_TURN_RATE,
        }
    }

    pub fn chase_distance_sq(&self) -> f32 {
        self.chase_distance * self.chase_distance
    }

    pub fn attack_distance_sq(&self) -> f32 {
        self.attack_distance * self.attack_distance
    }
}
