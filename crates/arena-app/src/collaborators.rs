//! Interfaces the simulation talks to, and the dispatcher that feeds them
//! from snapshots.
//!
//! The engine never calls these directly. Everything it has to say is in
//! the `GameStateSnapshot`; `present` turns one snapshot into renderer and
//! UI calls.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use arena_core::enums::GameState;
use arena_core::error::LoadError;
use arena_core::events::GameEvent;
use arena_core::state::GameStateSnapshot;
use arena_core::types::{EntityRef, Transform};

use crate::assets::{Mesh, Texture};

/// Scene graph owner.
pub trait Renderer {
    /// Attach a node for `entity` using `model`.
    fn add_node(&mut self, entity: EntityRef, model: &str);
    fn remove_node(&mut self, entity: EntityRef);
    /// Move an existing node.
    fn set_transform(&mut self, entity: EntityRef, transform: Transform);
    /// Place the camera at the player's eye.
    fn set_camera(&mut self, transform: Transform, pitch: f32);
    /// Draw one frame.
    fn render(&mut self);
    fn resize(&mut self, width: u32, height: u32);
}

/// Loads named assets. A rejected load is reported, never retried forever.
pub trait AssetLoader {
    fn load_model(&mut self, name: &str) -> Result<Mesh, LoadError>;
    fn load_texture(&mut self, name: &str) -> Result<Texture, LoadError>;
}

/// HUD and menus. Pure consumer of events and snapshots.
pub trait UiManager {
    fn on_event(&mut self, event: &GameEvent);
    /// Game-state change: swap menus and overlays.
    fn update(&mut self, state: GameState);
    fn update_hud(&mut self, snapshot: &GameStateSnapshot);
}

/// Looks up user-visible strings.
pub trait LocalizationService {
    /// Switch language. Unknown languages fall back to the default and
    /// report an error.
    fn set_language(&mut self, language: &str) -> Result<(), LoadError>;
    fn language(&self) -> &str;
    /// Text for `key` with `{name}` placeholders filled from `options`.
    fn get_text(&self, key: &str, options: &[(&str, String)]) -> String;
}

/// Feed one snapshot to the renderer and the UI, then draw.
///
/// Scene changes are applied before transforms so a node added this tick is
/// positioned in the same frame.
pub fn present(snapshot: &GameStateSnapshot, renderer: &mut dyn Renderer, ui: &mut dyn UiManager) {
    for event in &snapshot.events {
        match event {
            GameEvent::EntityActivated { entity, model } => renderer.add_node(*entity, model),
            GameEvent::EntityDeactivated { entity } => renderer.remove_node(*entity),
            GameEvent::StateChanged { to, .. } => ui.update(*to),
            _ => {}
        }
        ui.on_event(event);
    }

    for enemy in &snapshot.enemies {
        renderer.set_transform(enemy.entity, enemy.transform);
    }
    for bullet in &snapshot.bullets {
        renderer.set_transform(bullet.entity, bullet.transform);
    }
    for power_up in &snapshot.power_ups {
        renderer.set_transform(power_up.entity, power_up.transform);
    }
    renderer.set_camera(snapshot.player.transform, snapshot.player.pitch);

    ui.update_hud(snapshot);
    renderer.render();
}

/// Renderer that only tracks which nodes exist.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    nodes: HashMap<EntityRef, (String, Transform)>,
    camera: Transform,
    viewport: (u32, u32),
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn model_of(&self, entity: EntityRef) -> Option<&str> {
        self.nodes.get(&entity).map(|(model, _)| model.as_str())
    }

    pub fn transform_of(&self, entity: EntityRef) -> Option<Transform> {
        self.nodes.get(&entity).map(|(_, transform)| *transform)
    }

    pub fn camera(&self) -> Transform {
        self.camera
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for HeadlessRenderer {
    fn add_node(&mut self, entity: EntityRef, model: &str) {
        if self
            .nodes
            .insert(entity, (model.to_string(), Transform::default()))
            .is_some()
        {
            warn!(%entity, "node added twice");
        }
    }

    fn remove_node(&mut self, entity: EntityRef) {
        if self.nodes.remove(&entity).is_none() {
            warn!(%entity, "removing unknown node");
        }
    }

    fn set_transform(&mut self, entity: EntityRef, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.1 = transform;
        }
    }

    fn set_camera(&mut self, transform: Transform, _pitch: f32) {
        self.camera = transform;
    }

    fn render(&mut self) {
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!(width, height, "viewport resized");
        self.viewport = (width.max(1), height.max(1));
    }
}

/// UI that writes HUD changes and notices to the log.
pub struct LogUi<L: LocalizationService> {
    strings: L,
    score: u32,
    wave: u32,
    state: GameState,
    notices: Vec<String>,
}

impl<L: LocalizationService> LogUi<L> {
    pub fn new(strings: L) -> Self {
        Self {
            strings,
            score: 0,
            wave: 0,
            state: GameState::default(),
            notices: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Screen the UI is showing.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Localized notices shown so far.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn notice(&mut self, text: String) {
        info!(notice = %text);
        self.notices.push(text);
    }
}

impl<L: LocalizationService> UiManager for LogUi<L> {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged { score } => {
                self.score = *score;
                debug!(text = %self.strings.get_text("hud.score", &[("score", score.to_string())]));
            }
            GameEvent::WaveStarted { wave, .. } => {
                self.wave = *wave;
                debug!(text = %self.strings.get_text("hud.wave", &[("wave", wave.to_string())]));
            }
            GameEvent::WaveCompleted { wave } => {
                let text = self
                    .strings
                    .get_text("notice.wave_cleared", &[("wave", wave.to_string())]);
                self.notice(text);
            }
            GameEvent::Notice { key, .. } => {
                let text = self.strings.get_text(key, &[]);
                self.notice(text);
            }
            _ => {}
        }
    }

    fn update(&mut self, state: GameState) {
        self.state = state;
        debug!(?state, "screen changed");
    }

    fn update_hud(&mut self, _snapshot: &GameStateSnapshot) {}
}
