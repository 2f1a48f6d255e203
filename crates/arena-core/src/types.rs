//! Fundamental geometric and simulation types.
//!
//! World space is right-handed with Y up. The player looks down -Z at yaw 0.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Position and orientation of an entity.
///
/// For anything with a physics body this is a read-only projection of the
/// body, recomputed after each physics step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Unit forward vector (-Z rotated by the orientation).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Unit right vector (+X rotated by the orientation).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

/// Sphere used by the gameplay collision layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether two spheres overlap once each is grown by `skin`.
    pub fn intersects(&self, other: &BoundingSphere, skin: f32) -> bool {
        let reach = self.radius + other.radius + 2.0 * skin;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

/// Stable reference to a game entity: its kind plus the pool slot it was
/// constructed into. Slots are never reused across kinds, and a pooled
/// instance keeps its slot for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub slot: u32,
}

impl EntityRef {
    pub const PLAYER: EntityRef = EntityRef {
        kind: EntityKind::Player,
        slot: 0,
    };

    pub fn new(kind: EntityKind, slot: u32) -> Self {
        Self { kind, slot }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.slot)
    }
}

/// Project a vector onto the horizontal (XZ) plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw (radians about +Y) that turns -Z onto the horizontal part of `dir`.
pub fn yaw_of(dir: Vec3) -> f32 {
    (-dir.x).atan2(-dir.z)
}

/// Rotation about +Y facing the horizontal part of `dir`.
/// Returns identity for a vertical or zero vector.
pub fn facing_rotation(dir: Vec3) -> Quat {
    let flat = horizontal(dir);
    if flat.length_squared() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(yaw_of(flat))
}
