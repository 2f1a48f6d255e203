//! Arena application shell.
//!
//! Wires the simulation engine to its collaborators: a simulation thread
//! with message-passed snapshots, the renderer/UI/asset/localization traits,
//! the asset preload, the language preference store and the string tables.

pub mod assets;
pub mod collaborators;
pub mod game_loop;
pub mod localization;
pub mod preferences;
pub mod state;

pub use arena_core as core;
