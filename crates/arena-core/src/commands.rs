//! Input snapshot and director commands.
//!
//! `InputState` is the per-tick snapshot produced by the input collaborator.
//! `PlayerCommand`s are menu-level requests queued for the next tick boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-tick snapshot of discrete and continuous player actions.
///
/// Edge-triggered fields (`*_pressed`, weapon switches, `pause`) are true
/// only on the tick the action began.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub shoot_pressed: bool,
    pub shoot_held: bool,
    pub next_weapon: bool,
    pub previous_weapon: bool,
    pub pause: bool,
    /// Accumulated pointer movement since the last tick (pixels).
    pub look_delta: Vec2,
}

/// Menu-level actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Asset loading finished successfully.
    AssetsLoaded,
    /// Asset loading was rejected; continue with defaults.
    AssetLoadFailed { reason: String },
    /// Start a new session from Title or GameOver.
    StartGame,
    Pause,
    Resume,
    TogglePause,
    /// Abandon the session from Paused or GameOver.
    ReturnToTitle,
}
