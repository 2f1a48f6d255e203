//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of game entity. Used as the tag when resolving physics bodies and
/// pool slots back to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Bullet,
    Enemy,
    PowerUp,
    /// Static arena geometry (floor, walls).
    Environment,
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

/// Enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    Basic,
    Tank,
    Fast,
    Shooter,
}

impl EnemyType {
    pub const ALL: [EnemyType; 4] = [
        EnemyType::Basic,
        EnemyType::Tank,
        EnemyType::Fast,
        EnemyType::Shooter,
    ];

    /// Key of this type in the enemy configuration table.
    pub fn id(self) -> &'static str {
        match self {
            EnemyType::Basic => "basic",
            EnemyType::Tank => "tank",
            EnemyType::Fast => "fast",
            EnemyType::Shooter => "shooter",
        }
    }
}

/// Enemy behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    #[default]
    Idle,
    Chasing,
    Attacking,
    /// Health reached zero; death delay running.
    Dying,
    /// Death delay finished; awaiting return to the pool.
    Inactive,
}

impl EnemyState {
    /// Dying and Inactive accept no further transitions except Dying → Inactive.
    pub fn is_terminal(self) -> bool {
        matches!(self, EnemyState::Dying | EnemyState::Inactive)
    }
}

/// Power-up type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Heal,
    Speed,
    Shield,
    /// Inert pickup with the minimal configuration.
    #[default]
    Default,
}

impl PowerUpKind {
    /// Kinds that can be dropped by enemies.
    pub const DROPPABLE: [PowerUpKind; 3] =
        [PowerUpKind::Heal, PowerUpKind::Speed, PowerUpKind::Shield];

    /// Key of this type in the power-up configuration table.
    pub fn id(self) -> &'static str {
        match self {
            PowerUpKind::Heal => "heal",
            PowerUpKind::Speed => "speed",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Default => "default",
        }
    }
}

/// Timed effect on the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Multiplies movement speed.
    SpeedBoost { multiplier: f32 },
    /// Absorbs all incoming damage.
    Shield,
}

impl EffectKind {
    /// Whether two effects occupy the same slot (re-application refreshes).
    pub fn same_slot(&self, other: &EffectKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Top-level game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Loading,
    Title,
    Playing,
    Paused,
    WaveTransition,
    GameOver,
}

impl GameState {
    /// Edges of the game-state graph.
    pub fn can_transition_to(self, next: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, next),
            (Loading, Title)
                | (Title, WaveTransition)
                | (GameOver, WaveTransition)
                | (Playing, Paused)
                | (Paused, Playing)
                | (Playing, WaveTransition)
                | (WaveTransition, Playing)
                | (Playing, GameOver)
                | (WaveTransition, GameOver)
                | (Paused, Title)
                | (GameOver, Title)
        )
    }

    /// Whether entities are simulated in this state.
    pub fn runs_simulation(self) -> bool {
        matches!(self, GameState::Playing | GameState::WaveTransition)
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}
