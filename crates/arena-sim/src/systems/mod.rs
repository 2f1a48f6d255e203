//! Systems run by the director each tick.
//!
//! Systems are free functions over the engine's parts. They own no state.

pub mod cleanup;
pub mod collision;
pub mod snapshot;
pub mod wave_spawner;
