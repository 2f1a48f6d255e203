//! Headless arena runner.
//!
//! Plays a scripted session on the simulation thread, presents every
//! snapshot to a headless renderer and a logging UI, and reports the
//! result. `ARENA_CONFIG` points at a JSON config override,
//! `ARENA_ASSETS` at an asset directory (primitives stand in otherwise),
//! `ARENA_PREFS` at the preference file (default: the per-user config
//! directory), `ARENA_SEED` sets the seed.

use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arena_app::assets::{preload, AssetManifest, DirAssetLoader, PrimitiveAssets};
use arena_app::collaborators::{
    present, AssetLoader, HeadlessRenderer, LocalizationService, LogUi, Renderer,
};
use arena_app::localization::Localization;
use arena_app::preferences::PreferenceStore;
use arena_app::state::AppState;
use arena_core::commands::{InputState, PlayerCommand};
use arena_core::config::GameConfig;
use arena_core::constants::TICK_RATE;
use arena_core::enums::GameState;
use arena_sim::SimConfig;

/// Session length when no argument is given.
const DEFAULT_SECONDS: u32 = 30;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("arena_sim=info".parse()?)
                .add_directive("arena_app=info".parse()?)
                .add_directive("arena=info".parse()?),
        )
        .init();

    let seconds: u32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("session length must be whole seconds")?,
        None => DEFAULT_SECONDS,
    };
    let seed: u64 = match std::env::var("ARENA_SEED") {
        Ok(seed) => seed.parse().context("ARENA_SEED must be an integer")?,
        Err(_) => 42,
    };

    let config = match std::env::var("ARENA_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            GameConfig::from_json(&json).with_context(|| format!("loading config {path}"))?
        }
        Err(_) => GameConfig::default(),
    };

    let store = match std::env::var("ARENA_PREFS") {
        Ok(path) => Some(PreferenceStore::new(path)),
        Err(_) => PreferenceStore::user_default(),
    };
    let preferences = store.map(|s| s.load()).unwrap_or_default();
    let mut strings = Localization::builtin().context("loading built-in string tables")?;
    if let Err(e) = strings.set_language(&preferences.language) {
        warn!(error = %e, language = strings.language(), "using default language");
    }

    let mut loader: Box<dyn AssetLoader> = match std::env::var("ARENA_ASSETS") {
        Ok(root) => Box::new(DirAssetLoader::new(root)),
        Err(_) => Box::new(PrimitiveAssets::new()),
    };
    let assets = preload(loader.as_mut(), &AssetManifest::standard());

    info!(seed, seconds, language = strings.language(), "starting arena");

    let app = AppState::new();
    let snapshots = app.start(SimConfig {
        seed,
        config,
        ..Default::default()
    })?;

    app.send_command(assets.command())?;
    app.send_command(PlayerCommand::StartGame)?;

    let mut renderer = HeadlessRenderer::new();
    renderer.resize(1280, 720);
    let mut ui = LogUi::new(strings);
    let total_ticks = seconds * TICK_RATE;
    let mut ticks = 0;

    while ticks < total_ticks {
        let snapshot = match snapshots.recv_timeout(Duration::from_secs(1)) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "no snapshot from simulation thread");
                break;
            }
        };
        ticks += 1;
        present(&snapshot, &mut renderer, &mut ui);

        if snapshot.state == GameState::GameOver {
            info!(tick = snapshot.time.tick, "player died");
            break;
        }

        // Sweep the view and tap the trigger
        app.send_input(InputState {
            shoot_pressed: ticks % 20 == 0,
            shoot_held: true,
            look_delta: Vec2::new(4.0, 0.0),
            ..Default::default()
        })?;
    }

    app.shutdown()?;
    info!(
        score = ui.score(),
        wave = ui.wave(),
        nodes = renderer.node_count(),
        frames = renderer.frames(),
        "session finished"
    );
    Ok(())
}
