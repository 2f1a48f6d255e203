//! Converts the per-tick input snapshot into physics actions on the player
//! body and forwards trigger/switch actions to the weapon manager.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use arena_core::commands::InputState;
use arena_core::constants::{
    AIR_CONTROL, GROUND_NORMAL_THRESHOLD, JUMP_SPEED, LOOK_SENSITIVITY, MOVE_ACCELERATION,
    PITCH_LIMIT, PLAYER_MASS, PLAYER_MAX_SPEED,
};
use arena_core::enums::EntityKind;
use arena_core::types::horizontal;
use arena_physics::{BodyHandle, CollisionEvent, PhysicsWorld};

use crate::entities::Player;
use crate::weapons::{Aim, ProjectileRequest, WeaponManager};

/// Player movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Radians of rotation per pixel of pointer movement.
    pub look_sensitivity: f32,
    /// Camera pitch clamp (radians either side of level).
    pub pitch_limit: f32,
    /// Velocity gained per second of held movement on the ground (m/s²).
    pub move_acceleration: f32,
    /// Fraction of `move_acceleration` available while airborne.
    pub air_control: f32,
    /// Horizontal speed cap before speed boosts (m/s).
    pub max_speed: f32,
    pub jump_speed: f32,
    /// Minimum `normal · up` for a contact to count as ground.
    pub ground_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: LOOK_SENSITIVITY,
            pitch_limit: PITCH_LIMIT,
            move_acceleration: MOVE_ACCELERATION,
            air_control: AIR_CONTROL,
            max_speed: PLAYER_MAX_SPEED,
            jump_speed: JUMP_SPEED,
            ground_threshold: GROUND_NORMAL_THRESHOLD,
        }
    }
}

/// What the controller did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOutcome {
    pub fired: bool,
    pub switched: bool,
    pub jumped: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    grounded: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl PlayerController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            grounded: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn reset(&mut self) {
        self.grounded = false;
    }

    /// Feed one collision report for `body` to the grounded latch. Sensor
    /// overlaps and pickups never support the player.
    pub fn on_collision(&mut self, event: &CollisionEvent, body: BodyHandle, physics: &PhysicsWorld) {
        let Some(other) = event.other(body) else {
            return;
        };
        if event.sensor {
            return;
        }
        if physics
            .owner_of(other)
            .is_some_and(|owner| owner.kind == EntityKind::PowerUp)
        {
            return;
        }
        self.on_contact(&event.normals_for(body));
    }

    /// Latch grounded when any contact normal (pointing away from the
    /// surface, toward the player) is steep enough.
    pub fn on_contact(&mut self, normals: &[Vec3]) {
        if normals
            .iter()
            .any(|n| n.dot(Vec3::Y) > self.config.ground_threshold)
        {
            self.grounded = true;
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input: &InputState,
        dt: f32,
        now: f64,
        player: &mut Player,
        physics: &mut PhysicsWorld,
        weapons: &mut WeaponManager,
        requests: &mut Vec<ProjectileRequest>,
    ) -> ControllerOutcome {
        let body = player.body();
        let mut outcome = ControllerOutcome::default();

        // Look: yaw turns the body, pitch only the camera
        let yaw = player.yaw() - input.look_delta.x * self.config.look_sensitivity;
        let pitch = (player.pitch() - input.look_delta.y * self.config.look_sensitivity)
            .clamp(-self.config.pitch_limit, self.config.pitch_limit);
        player.set_look(yaw, pitch);
        let rotation = Quat::from_rotation_y(yaw);
        physics.set_rotation(body, rotation);

        // Move
        let forward = rotation * Vec3::NEG_Z;
        let right = rotation * Vec3::X;
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        let wish = forward * axis(input.move_forward, input.move_backward)
            + right * axis(input.move_right, input.move_left);
        let wish = horizontal(wish).normalize_or_zero();

        let speed_multiplier = player.speed_multiplier(now);
        if wish != Vec3::ZERO {
            let control = if self.grounded {
                1.0
            } else {
                self.config.air_control
            };
            let impulse =
                wish * self.config.move_acceleration * speed_multiplier * control * dt * PLAYER_MASS;
            physics.apply_impulse(body, impulse);
        }

        // Clamp horizontal speed, leave vertical alone
        if let Some(velocity) = physics.velocity(body) {
            let flat = horizontal(velocity);
            let max = self.config.max_speed * speed_multiplier;
            if flat.length_squared() > max * max {
                let clamped = flat.normalize() * max;
                physics.set_velocity(body, Vec3::new(clamped.x, velocity.y, clamped.z));
            }
        }

        // Jump
        if input.jump && self.grounded {
            if let Some(velocity) = physics.velocity(body) {
                physics.set_velocity(body, Vec3::new(velocity.x, self.config.jump_speed, velocity.z));
                self.grounded = false;
                outcome.jumped = true;
            }
        }

        // Weapons
        if input.next_weapon {
            outcome.switched |= weapons.switch_to_next();
        }
        if input.previous_weapon {
            outcome.switched |= weapons.switch_to_previous();
        }
        let aim = Aim {
            origin: player.eye_position(),
            direction: player.aim_direction(),
        };
        outcome.fired = weapons.trigger(input.shoot_pressed, input.shoot_held, aim, requests);

        outcome
    }
}
