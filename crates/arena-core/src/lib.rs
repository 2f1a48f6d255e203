//! Core types and definitions for the arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, enums, configuration tables, commands, state snapshots,
//! events, errors and constants. It has no dependency on any runtime
//! framework, renderer or physics backend.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
