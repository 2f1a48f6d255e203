//! End-to-end session driven only through the public API.

use arena_sim::core::commands::{InputState, PlayerCommand};
use arena_sim::core::config::GameConfig;
use arena_sim::core::enums::GameState;
use arena_sim::core::events::GameEvent;
use arena_sim::{SimConfig, SimulationEngine};

#[test]
fn test_session_from_json_config() {
    let json = serde_json::to_string(&GameConfig::default()).unwrap();
    let config = GameConfig::from_json(&json).unwrap();
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 9,
        config,
        ..Default::default()
    });

    engine.queue_commands([PlayerCommand::AssetsLoaded, PlayerCommand::StartGame]);
    let mut states = Vec::new();
    let input = InputState {
        shoot_held: true,
        shoot_pressed: true,
        ..Default::default()
    };
    for _ in 0..600 {
        let snap = engine.tick(&input);
        for event in &snap.events {
            if let GameEvent::StateChanged { to, .. } = event {
                states.push(*to);
            }
        }
    }

    assert_eq!(
        &states[..3],
        &[GameState::Title, GameState::WaveTransition, GameState::Playing]
    );
    assert!(engine.score().shots_fired > 1);
    assert!(engine.check_invariants().is_ok());
}

#[test]
fn test_rejects_config_without_weapons() {
    let mut config = GameConfig::default();
    config.weapons.clear();
    let json = serde_json::to_string(&config).unwrap();
    assert!(GameConfig::from_json(&json).is_err());
}
