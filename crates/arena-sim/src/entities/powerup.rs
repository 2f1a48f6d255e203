//! Pooled pickup with a static sensor body.

use glam::{Quat, Vec3};
use tracing::{debug, warn};

use arena_core::config::{GameConfig, PowerUpConfig};
use arena_core::constants::{
    POWER_UP_BOB_AMPLITUDE, POWER_UP_BOB_SPEED, POWER_UP_RADIUS, POWER_UP_ROTATION_SPEED,
};
use arena_core::enums::{EffectKind, PowerUpKind};
use arena_core::types::{BoundingSphere, EntityRef, Transform};
use arena_physics::{BodyDesc, BodyHandle, BodyType, PhysicsWorld, Shape};

use crate::entities::Player;
use crate::pool::Poolable;

/// A collectible. The body never moves; bobbing and spinning only touch the
/// visual transform.
#[derive(Debug, Clone)]
pub struct PowerUp {
    entity: EntityRef,
    kind: PowerUpKind,
    config: PowerUpConfig,
    body: Option<BodyHandle>,
    anchor: Vec3,
    transform: Transform,
    phase: f32,
    yaw: f32,
    destroyed: bool,
}

impl PowerUp {
    /// New pooled (inactive) power-up. The body is created on first reset.
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            kind: PowerUpKind::Default,
            config: PowerUpConfig::minimal(),
            body: None,
            anchor: Vec3::ZERO,
            transform: Transform::default(),
            phase: 0.0,
            yaw: 0.0,
            destroyed: true,
        }
    }

    /// Activate at `position`. Unknown kinds fall back to the minimal config.
    pub fn reset(
        &mut self,
        position: Vec3,
        kind: PowerUpKind,
        config: &GameConfig,
        physics: &mut PhysicsWorld,
    ) -> bool {
        if !position.is_finite() {
            warn!(entity = %self.entity, ?position, "rejected power-up reset");
            self.deactivate(physics);
            return false;
        }

        self.kind = kind;
        self.config = config.power_up_or_minimal(kind);

        let body = match self.body {
            Some(body) if physics.contains(body) => body,
            _ => {
                let body = physics.add_body(
                    BodyDesc::new(
                        BodyType::Static,
                        Shape::Sphere {
                            radius: POWER_UP_RADIUS,
                        },
                        self.entity,
                    )
                    .sensor(),
                );
                self.body = Some(body);
                body
            }
        };
        physics.set_position(body, position);
        physics.set_enabled(body, true);

        self.anchor = position;
        self.transform = Transform::from_position(position);
        self.phase = 0.0;
        self.yaw = 0.0;
        self.destroyed = false;
        true
    }

    /// Bob and spin. Cosmetic only.
    pub fn update(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }
        self.phase += dt;
        self.yaw = (self.yaw + POWER_UP_ROTATION_SPEED * dt) % std::f32::consts::TAU;

        let bob = (self.phase * POWER_UP_BOB_SPEED).sin() * POWER_UP_BOB_AMPLITUDE;
        self.transform = Transform::new(
            self.anchor + Vec3::Y * bob,
            Quat::from_rotation_y(self.yaw),
        );
    }

    /// Apply the effect to `player` and destroy. Returns false (and does
    /// nothing) if already collected.
    pub fn collect(&mut self, player: &mut Player, now: f64) -> bool {
        if self.destroyed {
            return false;
        }

        match self.kind {
            PowerUpKind::Heal => {
                player.heal(self.config.magnitude);
            }
            PowerUpKind::Speed => player.apply_effect(
                EffectKind::SpeedBoost {
                    multiplier: self.config.magnitude,
                },
                self.config.duration,
                now,
            ),
            PowerUpKind::Shield => {
                player.apply_effect(EffectKind::Shield, self.config.duration, now)
            }
            PowerUpKind::Default => {}
        }
        debug!(entity = %self.entity, kind = self.kind.id(), "power-up collected");

        self.destroy();
        true
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn config(&self) -> PowerUpConfig {
        self.config
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Rest position of the pickup (the body position).
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn bounds(&self) -> BoundingSphere {
        BoundingSphere::new(self.anchor, POWER_UP_RADIUS)
    }

    pub fn model(&self) -> &'static str {
        match self.kind {
            PowerUpKind::Heal => "powerup_heal",
            PowerUpKind::Speed => "powerup_speed",
            PowerUpKind::Shield => "powerup_shield",
            PowerUpKind::Default => "powerup_default",
        }
    }
}

impl Poolable for PowerUp {
    fn entity_ref(&self) -> EntityRef {
        self.entity
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn body(&self) -> Option<BodyHandle> {
        self.body
    }
}
