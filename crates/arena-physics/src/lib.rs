//! Rigid-body physics for the arena.
//!
//! A thin layer over rapier3d. Bodies are addressed by rapier handles and
//! tagged with the game entity that owns them. The world steps with a fixed
//! timestep and a capped number of sub-steps per tick, and reports collision
//! events with contact normals in glam types.

pub mod body;
pub mod groups;
pub mod world;

pub use body::{BodyDesc, BodyHandle, BodyType, Shape};
pub use groups::{interaction_groups, layer_of};
pub use world::{CollisionEvent, PhysicsSettings, PhysicsWorld};

#[cfg(test)]
mod tests;
