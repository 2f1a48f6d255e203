//! The player singleton: health, timed effects and the physics body.

use glam::{Quat, Vec3};

use arena_core::constants::{
    PLAYER_EYE_HEIGHT, PLAYER_INVINCIBILITY_SECS, PLAYER_LINEAR_DAMPING, PLAYER_MASS,
    PLAYER_MAX_HEALTH, PLAYER_RADIUS,
};
use arena_core::enums::EffectKind;
use arena_core::state::EffectView;
use arena_core::types::{BoundingSphere, EntityRef, Transform};
use arena_physics::{BodyDesc, BodyHandle, BodyType, PhysicsWorld, Shape};

/// A timed effect and the simulation time it lapses at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub expires_at: f64,
}

/// The player. Created once per engine and reset between sessions.
///
/// The physics body is authoritative for position; `transform` is copied
/// from it after every physics step.
#[derive(Debug, Clone)]
pub struct Player {
    body: BodyHandle,
    spawn: Vec3,
    transform: Transform,
    yaw: f32,
    pitch: f32,
    health: f32,
    max_health: f32,
    effects: Vec<ActiveEffect>,
    invincible_remaining: f32,
}

impl Player {
    pub fn new(physics: &mut PhysicsWorld, spawn: Vec3) -> Self {
        let body = physics.add_body(
            BodyDesc::new(
                BodyType::Dynamic,
                Shape::Sphere {
                    radius: PLAYER_RADIUS,
                },
                EntityRef::PLAYER,
            )
            .at(spawn)
            .with_mass(PLAYER_MASS)
            .with_damping(PLAYER_LINEAR_DAMPING),
        );

        Self {
            body,
            spawn,
            transform: Transform::from_position(spawn),
            yaw: 0.0,
            pitch: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            effects: Vec::new(),
            invincible_remaining: 0.0,
        }
    }

    /// Restore full health at the spawn point with no effects.
    pub fn reset(&mut self, physics: &mut PhysicsWorld) {
        self.health = self.max_health;
        self.effects.clear();
        self.invincible_remaining = 0.0;
        self.yaw = 0.0;
        self.pitch = 0.0;

        physics.set_enabled(self.body, true);
        physics.set_position(self.body, self.spawn);
        physics.set_rotation(self.body, Quat::IDENTITY);
        physics.set_velocity(self.body, Vec3::ZERO);
        self.transform = Transform::from_position(self.spawn);
    }

    /// Expire effects and count down invincibility.
    pub fn update(&mut self, dt: f32, now: f64) {
        self.invincible_remaining = (self.invincible_remaining - dt).max(0.0);
        self.effects.retain(|e| e.expires_at > now);
    }

    /// Copy the body pose into the visual transform.
    pub fn sync_transform(&mut self, physics: &PhysicsWorld) {
        if let Some(transform) = physics.transform(self.body) {
            self.transform = transform;
        }
    }

    /// Apply damage unless shielded or invincible. Returns the amount
    /// applied.
    pub fn take_damage(&mut self, amount: f32, now: f64) -> f32 {
        if amount <= 0.0 || !self.is_alive() || self.invincible_remaining > 0.0 {
            return 0.0;
        }
        if self.is_shielded(now) {
            return 0.0;
        }

        let applied = amount.min(self.health);
        self.health = (self.health - amount).max(0.0);
        self.invincible_remaining = PLAYER_INVINCIBILITY_SECS;
        applied
    }

    /// Restore up to `amount` health. Returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    /// Start `kind` for `duration` seconds. Re-applying an effect already
    /// running replaces it and refreshes the expiry.
    pub fn apply_effect(&mut self, kind: EffectKind, duration: f32, now: f64) {
        let effect = ActiveEffect {
            kind,
            expires_at: now + duration as f64,
        };
        match self.effects.iter_mut().find(|e| e.kind.same_slot(&kind)) {
            Some(existing) => *existing = effect,
            None => self.effects.push(effect),
        }
    }

    pub fn speed_multiplier(&self, now: f64) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.expires_at > now)
            .map(|e| match e.kind {
                EffectKind::SpeedBoost { multiplier } => multiplier,
                EffectKind::Shield => 1.0,
            })
            .product()
    }

    pub fn is_shielded(&self, now: f64) -> bool {
        self.effects
            .iter()
            .any(|e| e.expires_at > now && e.kind == EffectKind::Shield)
    }

    pub fn effect_views(&self, now: f64) -> Vec<EffectView> {
        self.effects
            .iter()
            .filter(|e| e.expires_at > now)
            .map(|e| EffectView {
                kind: e.kind,
                remaining_secs: (e.expires_at - now) as f32,
            })
            .collect()
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_remaining > 0.0
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn bounds(&self) -> BoundingSphere {
        BoundingSphere::new(self.transform.position, PLAYER_RADIUS)
    }

    /// Camera position.
    pub fn eye_position(&self) -> Vec3 {
        self.transform.position + Vec3::Y * PLAYER_EYE_HEIGHT
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub(crate) fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
    }

    /// Unit view direction combining body yaw and camera pitch.
    pub fn aim_direction(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch) * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> (PhysicsWorld, Player) {
        let mut physics = PhysicsWorld::new();
        let player = Player::new(&mut physics, Vec3::new(0.0, 1.0, 0.0));
        (physics, player)
    }

    #[test]
    fn test_damage_then_invincibility_window() {
        let (_physics, mut p) = player();
        assert_eq!(p.take_damage(10.0, 0.0), 10.0);
        assert_eq!(p.take_damage(10.0, 0.1), 0.0);
        assert_eq!(p.health(), 90.0);

        p.update(PLAYER_INVINCIBILITY_SECS, 0.6);
        assert_eq!(p.take_damage(10.0, 0.6), 10.0);
        assert_eq!(p.health(), 80.0);
    }

    #[test]
    fn test_shield_absorbs_until_expiry() {
        let (_physics, mut p) = player();
        p.apply_effect(EffectKind::Shield, 6.0, 0.0);
        assert!(p.is_shielded(1.0));
        assert_eq!(p.take_damage(25.0, 1.0), 0.0);
        assert_eq!(p.health(), PLAYER_MAX_HEALTH);

        p.update(0.0, 6.0);
        assert!(!p.is_shielded(6.0));
        assert_eq!(p.take_damage(25.0, 6.0), 25.0);
    }

    #[test]
    fn test_reapplying_effect_refreshes_expiry() {
        let (_physics, mut p) = player();
        p.apply_effect(EffectKind::SpeedBoost { multiplier: 1.6 }, 8.0, 0.0);
        p.apply_effect(EffectKind::SpeedBoost { multiplier: 1.6 }, 8.0, 5.0);
        assert_eq!(p.effects().len(), 1);
        assert_eq!(p.effects()[0].expires_at, 13.0);
        assert!((p.speed_multiplier(10.0) - 1.6).abs() < 1e-6);
        assert_eq!(p.speed_multiplier(13.0), 1.0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let (_physics, mut p) = player();
        p.take_damage(10.0, 0.0);
        assert_eq!(p.heal(25.0), 10.0);
        assert_eq!(p.health(), p.max_health());
    }

    #[test]
    fn test_health_clamps_at_zero() {
        let (_physics, mut p) = player();
        assert_eq!(p.take_damage(250.0, 0.0), PLAYER_MAX_HEALTH);
        assert_eq!(p.health(), 0.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_reset_restores_session_state() {
        let (mut physics, mut p) = player();
        p.take_damage(40.0, 0.0);
        p.apply_effect(EffectKind::Shield, 6.0, 0.0);
        physics.set_position(p.body(), Vec3::new(5.0, 1.0, 5.0));

        p.reset(&mut physics);
        assert_eq!(p.health(), PLAYER_MAX_HEALTH);
        assert!(p.effects().is_empty());
        assert!(!p.is_invincible());
        assert_eq!(physics.position(p.body()), Some(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_aim_direction_follows_pitch() {
        let (_physics, mut p) = player();
        assert!((p.aim_direction() - Vec3::NEG_Z).length() < 1e-6);
        p.set_look(0.0, 0.5);
        assert!(p.aim_direction().y > 0.0, "positive pitch looks up");
    }
}
