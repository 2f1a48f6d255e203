//! Simulation engine for the arena.
//!
//! Owns the physics world, the entity pools and active lists, runs every
//! system at a fixed tick rate, and produces GameStateSnapshots for the
//! renderer and UI.

pub mod controller;
pub mod engine;
pub mod entities;
pub mod error;
pub mod pool;
pub mod score;
pub mod systems;
pub mod weapons;
pub mod world_setup;

pub use arena_core as core;
pub use engine::{SimConfig, SimulationEngine};
