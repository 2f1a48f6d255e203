//! Enemy AI for the arena.
//!
//! Implements the enemy behavior state machine, steering helpers and
//! per-type behavior profiles. Operates on plain data; pools, physics
//! and timers owned by the entity live in the simulation crate.

pub mod fsm;
pub mod profiles;
pub mod steering;

pub use arena_core as core;
