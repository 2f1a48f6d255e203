//! Immutable configuration tables for enemies, power-ups and weapons.
//!
//! Tables are built once at startup (built-in defaults or JSON) and passed
//! by reference to the systems that need them. Lookups return `Option`;
//! the `_or_minimal` variants substitute a minimal default for unknown ids
//! and log the gap.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::enums::{EnemyType, PowerUpKind};
use crate::error::ConfigError;

/// Ranged attack parameters for enemies that shoot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedAttack {
    /// Seconds between shots.
    pub interval: f32,
    /// Damage per projectile.
    pub damage: f32,
}

/// Per-type enemy stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub health: f32,
    /// Movement speed while chasing (m/s).
    pub speed: f32,
    pub score_value: u32,
    /// Damage dealt on contact with the player and per melee strike.
    pub collision_damage: f32,
    /// Probability (0..=1) of dropping a power-up on death.
    pub drop_chance: f32,
    /// Collision sphere radius (meters).
    pub radius: f32,
    /// Distance at which the enemy notices and chases the player.
    pub chase_distance: f32,
    /// Distance at which a ranged enemy stops to shoot.
    pub shoot_distance: f32,
    /// Distance at which a melee enemy stops to strike.
    pub melee_range: f32,
    #[serde(default)]
    pub ranged: Option<RangedAttack>,
}

impl EnemyConfig {
    /// Stand-in used when a type id is missing from the table.
    pub fn minimal() -> Self {
        Self {
            health: 1.0,
            speed: 1.0,
            score_value: 0,
            collision_damage: 0.0,
            drop_chance: 0.0,
            radius: 0.5,
            chase_distance: 0.0,
            shoot_distance: 0.0,
            melee_range: 0.0,
            ranged: None,
        }
    }

    /// Distance at which Chasing gives way to Attacking.
    pub fn attack_distance(&self) -> f32 {
        if self.ranged.is_some() {
            self.shoot_distance
        } else {
            self.melee_range
        }
    }
}

/// Per-type power-up effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpConfig {
    /// Effect duration in seconds (0 for instant effects).
    pub duration: f32,
    /// Heal amount or speed multiplier, depending on type.
    pub magnitude: f32,
}

impl PowerUpConfig {
    /// Stand-in used when a type id is missing from the table.
    pub fn minimal() -> Self {
        Self {
            duration: 0.0,
            magnitude: 0.0,
        }
    }
}

/// Weapon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub id: String,
    pub name: String,
    pub damage: f32,
    /// Minimum seconds between shots.
    pub cooldown: f32,
    /// Nominal range (meters). Advisory only.
    pub range: f32,
    /// Fires while the trigger is held rather than once per press.
    pub automatic: bool,
    /// Magazine size; `None` means infinite ammo.
    #[serde(default)]
    pub max_ammo: Option<u32>,
}

/// All configuration tables for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub enemies: HashMap<String, EnemyConfig>,
    pub power_ups: HashMap<String, PowerUpConfig>,
    /// Weapons in registration (cycling) order.
    pub weapons: Vec<WeaponConfig>,
}

impl GameConfig {
    /// Parse and validate tables from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            enemies = config.enemies.len(),
            power_ups = config.power_ups.len(),
            weapons = config.weapons.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Check the tables for values the simulation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weapons.is_empty() {
            return Err(ConfigError::NoWeapons);
        }

        let mut seen = HashSet::new();
        for weapon in &self.weapons {
            if !seen.insert(weapon.id.as_str()) {
                return Err(ConfigError::DuplicateWeapon(weapon.id.clone()));
            }
            check_positive(&weapon.id, "damage", weapon.damage)?;
            check_non_negative(&weapon.id, "cooldown", weapon.cooldown)?;
        }

        for (id, enemy) in &self.enemies {
            check_positive(id, "health", enemy.health)?;
            check_positive(id, "radius", enemy.radius)?;
            check_non_negative(id, "speed", enemy.speed)?;
            if !(0.0..=1.0).contains(&enemy.drop_chance) {
                return Err(ConfigError::InvalidValue {
                    table: id.clone(),
                    field: "drop_chance",
                    value: enemy.drop_chance,
                });
            }
            if let Some(ranged) = enemy.ranged {
                check_positive(id, "ranged.interval", ranged.interval)?;
            }
        }

        for (id, power_up) in &self.power_ups {
            check_non_negative(id, "duration", power_up.duration)?;
        }

        Ok(())
    }

    pub fn enemy(&self, kind: EnemyType) -> Option<&EnemyConfig> {
        self.enemies.get(kind.id())
    }

    pub fn power_up(&self, kind: PowerUpKind) -> Option<&PowerUpConfig> {
        self.power_ups.get(kind.id())
    }

    /// Stats for `kind`, or `EnemyConfig::minimal` when the table has none.
    pub fn enemy_or_minimal(&self, kind: EnemyType) -> Cow<'_, EnemyConfig> {
        match self.enemy(kind) {
            Some(config) => Cow::Borrowed(config),
            None => {
                warn!(enemy_type = kind.id(), "no enemy config, using minimal default");
                Cow::Owned(EnemyConfig::minimal())
            }
        }
    }

    /// Effect parameters for `kind`, or `PowerUpConfig::minimal`.
    pub fn power_up_or_minimal(&self, kind: PowerUpKind) -> PowerUpConfig {
        match self.power_up(kind) {
            Some(config) => *config,
            None => {
                warn!(kind = kind.id(), "no power-up config, using minimal default");
                PowerUpConfig::minimal()
            }
        }
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponConfig> {
        self.weapons.iter().find(|w| w.id == id)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let enemies = HashMap::from([
            (
                EnemyType::Basic.id().to_string(),
                EnemyConfig {
                    health: 15.0,
                    speed: 3.0,
                    score_value: 10,
                    collision_damage: 10.0,
                    drop_chance: 0.1,
                    radius: 0.6,
                    chase_distance: 25.0,
                    shoot_distance: 15.0,
                    melee_range: 1.6,
                    ranged: None,
                },
            ),
            (
                EnemyType::Tank.id().to_string(),
                EnemyConfig {
                    health: 60.0,
                    speed: 1.8,
                    score_value: 30,
                    collision_damage: 25.0,
                    drop_chance: 0.3,
                    radius: 1.0,
                    chase_distance: 30.0,
                    shoot_distance: 15.0,
                    melee_range: 2.2,
                    ranged: None,
                },
            ),
            (
                EnemyType::Fast.id().to_string(),
                EnemyConfig {
                    health: 8.0,
                    speed: 6.0,
                    score_value: 15,
                    collision_damage: 5.0,
                    drop_chance: 0.05,
                    radius: 0.45,
                    chase_distance: 35.0,
                    shoot_distance: 15.0,
                    melee_range: 1.3,
                    ranged: None,
                },
            ),
            (
                EnemyType::Shooter.id().to_string(),
                EnemyConfig {
                    health: 20.0,
                    speed: 2.5,
                    score_value: 25,
                    collision_damage: 8.0,
                    drop_chance: 0.2,
                    radius: 0.6,
                    chase_distance: 30.0,
                    shoot_distance: 15.0,
                    melee_range: 1.6,
                    ranged: Some(RangedAttack {
                        interval: 2.0,
                        damage: 5.0,
                    }),
                },
            ),
        ]);

        let power_ups = HashMap::from([
            (
                PowerUpKind::Heal.id().to_string(),
                PowerUpConfig {
                    duration: 0.0,
                    magnitude: 25.0,
                },
            ),
            (
                PowerUpKind::Speed.id().to_string(),
                PowerUpConfig {
                    duration: 8.0,
                    magnitude: 1.6,
                },
            ),
            (
                PowerUpKind::Shield.id().to_string(),
                PowerUpConfig {
                    duration: 6.0,
                    magnitude: 0.0,
                },
            ),
            (
                PowerUpKind::Default.id().to_string(),
                PowerUpConfig::minimal(),
            ),
        ]);

        let weapons = vec![
            WeaponConfig {
                id: "pistol".into(),
                name: "Pistol".into(),
                damage: 8.0,
                cooldown: 0.35,
                range: 60.0,
                automatic: false,
                max_ammo: None,
            },
            WeaponConfig {
                id: "rifle".into(),
                name: "Rifle".into(),
                damage: 6.0,
                cooldown: 0.1,
                range: 80.0,
                automatic: true,
                max_ammo: Some(120),
            },
            WeaponConfig {
                id: "slug".into(),
                name: "Slug Gun".into(),
                damage: 30.0,
                cooldown: 0.9,
                range: 40.0,
                automatic: false,
                max_ammo: Some(24),
            },
        ];

        Self {
            enemies,
            power_ups,
            weapons,
        }
    }
}

fn check_positive(table: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            table: table.to_string(),
            field,
            value,
        })
    }
}

fn check_non_negative(table: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            table: table.to_string(),
            field,
            value,
        })
    }
}
