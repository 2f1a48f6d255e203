//! Pooled projectile.

use glam::Vec3;
use tracing::warn;

use arena_core::constants::{
    BULLET_MAX_LIFESPAN, BULLET_RADIUS, ENEMY_BULLET_SPEED, PLAYER_BULLET_SPEED,
};
use arena_core::enums::Owner;
use arena_core::types::{facing_rotation, BoundingSphere, EntityRef, Transform};

use crate::pool::Poolable;

/// A straight-flying projectile. Bullets have no physics body; the
/// collision dispatch tests their bounding sphere directly.
#[derive(Debug, Clone)]
pub struct Bullet {
    entity: EntityRef,
    transform: Transform,
    direction: Vec3,
    speed: f32,
    damage: f32,
    owner: Owner,
    age: f32,
    bounds: BoundingSphere,
    destroyed: bool,
}

impl Bullet {
    /// New pooled (inactive) bullet.
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            transform: Transform::default(),
            direction: Vec3::NEG_Z,
            speed: 0.0,
            damage: 0.0,
            owner: Owner::Player,
            age: 0.0,
            bounds: BoundingSphere::new(Vec3::ZERO, BULLET_RADIUS),
            destroyed: true,
        }
    }

    /// Reactivate at `origin` flying along `direction`.
    ///
    /// A non-finite origin or a zero/non-finite direction leaves the bullet
    /// destroyed and returns false.
    pub fn reset(&mut self, origin: Vec3, direction: Vec3, damage: f32, owner: Owner) -> bool {
        let Some(direction) = direction.try_normalize().filter(|_| origin.is_finite()) else {
            warn!(entity = %self.entity, ?origin, ?direction, "rejected bullet reset");
            self.destroy();
            return false;
        };

        self.direction = direction;
        self.speed = match owner {
            Owner::Player => PLAYER_BULLET_SPEED,
            Owner::Enemy => ENEMY_BULLET_SPEED,
        };
        self.damage = damage;
        self.owner = owner;
        self.age = 0.0;
        self.transform = Transform::new(origin, facing_rotation(direction));
        self.bounds.center = origin;
        self.destroyed = false;
        true
    }

    /// Advance along the flight path. Self-destroys once the lifespan runs out.
    pub fn update(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }

        self.transform.position += self.direction * self.speed * dt;
        self.bounds.center = self.transform.position;
        self.age += dt;

        if self.age >= BULLET_MAX_LIFESPAN {
            self.destroy();
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn bounds(&self) -> BoundingSphere {
        self.bounds
    }

    /// Scene-graph model for the renderer.
    pub fn model(&self) -> &'static str {
        match self.owner {
            Owner::Player => "bullet_player",
            Owner::Enemy => "bullet_enemy",
        }
    }
}

impl Poolable for Bullet {
    fn entity_ref(&self) -> EntityRef {
        self.entity
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
