//! Game entities. Bullets, enemies and power-ups are pooled; the player is
//! a singleton.

pub mod bullet;
pub mod enemy;
pub mod player;
pub mod powerup;

pub use bullet::Bullet;
pub use enemy::{Enemy, EnemyAction};
pub use player::{ActiveEffect, Player};
pub use powerup::PowerUp;

use arena_core::types::EntityRef;

use crate::pool::Poolable;

/// Active lists. An instance is either here or in its pool, never both.
#[derive(Debug, Default)]
pub struct ActiveEntities {
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
}

impl ActiveEntities {
    pub fn enemy(&self, entity: EntityRef) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.entity_ref() == entity)
    }

    pub fn enemy_mut(&mut self, entity: EntityRef) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.entity_ref() == entity)
    }

    pub fn len(&self) -> usize {
        self.bullets.len() + self.enemies.len() + self.power_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
