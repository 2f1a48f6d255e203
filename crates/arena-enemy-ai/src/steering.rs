//! Facing and movement helpers. All steering happens in the horizontal plane.

use glam::Vec3;

use arena_core::types::horizontal;

/// Unit horizontal direction from `from` to `to`, or `None` when they are
/// vertically aligned.
pub fn direction_to(from: Vec3, to: Vec3) -> Option<Vec3> {
    let flat = horizontal(to - from);
    if flat.length_squared() <= 1e-8 {
        None
    } else {
        Some(flat.normalize())
    }
}

/// Turn `facing` toward `desired` with exponential smoothing at `turn_rate`
/// per second. Never overshoots. A facing exactly opposite the desired one
/// is nudged sideways so the turn can start.
pub fn turn_towards(facing: Vec3, desired: Vec3, turn_rate: f32, dt: f32) -> Vec3 {
    let t = 1.0 - (-turn_rate * dt).exp();
    let blended = if facing.dot(desired) < -0.9999 {
        facing + Vec3::Y.cross(facing) * t
    } else {
        facing.lerp(desired, t)
    };
    horizontal(blended).try_normalize().unwrap_or(desired)
}

/// Velocity for moving along `facing` at `speed`.
pub fn velocity_along(facing: Vec3, speed: f32) -> Vec3 {
    horizontal(facing).normalize_or_zero() * speed
}
