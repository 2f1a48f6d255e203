//! Simulation thread: runs the engine at the tick rate and publishes
//! snapshots.
//!
//! The engine is created inside the thread so it never crosses a thread
//! boundary. Commands and input arrive over `mpsc`; every snapshot is sent
//! back over a channel and the latest one is kept for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::{debug, info};

use arena_core::commands::InputState;
use arena_core::constants::TICK_RATE;
use arena_core::state::GameStateSnapshot;
use arena_sim::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the simulation thread. Returns the command sender and the join
/// handle.
pub fn spawn_game_loop(
    config: SimConfig,
    snapshot_tx: mpsc::Sender<GameStateSnapshot>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("arena-sim".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &snapshot_tx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// Runs until Shutdown or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: &mpsc::Sender<GameStateSnapshot>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    info!(seed = config.seed, "simulation thread started");
    let mut engine = SimulationEngine::new(config);
    let mut input = InputState::default();
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain pending messages
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Command(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Input(latest)) => merge_input(&mut input, &latest),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "simulation thread stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick(&input);
        consume_edges(&mut input);

        // 3. Publish
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        let _ = snapshot_tx.send(snapshot);

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            debug!("simulation thread fell behind, resetting schedule");
            next_tick_time = now;
        }
    }
}

/// Fold a newer input snapshot into one not yet consumed. Held state takes
/// the newest value, edges are kept until a tick sees them, look deltas
/// accumulate.
pub fn merge_input(pending: &mut InputState, latest: &InputState) {
    pending.move_forward = latest.move_forward;
    pending.move_backward = latest.move_backward;
    pending.move_left = latest.move_left;
    pending.move_right = latest.move_right;
    pending.shoot_held = latest.shoot_held;

    pending.jump |= latest.jump;
    pending.shoot_pressed |= latest.shoot_pressed;
    pending.next_weapon |= latest.next_weapon;
    pending.previous_weapon |= latest.previous_weapon;
    pending.pause |= latest.pause;
    pending.look_delta += latest.look_delta;
}

/// Clear everything a tick has consumed, keeping held state.
pub fn consume_edges(input: &mut InputState) {
    input.jump = false;
    input.shoot_pressed = false;
    input.next_weapon = false;
    input.previous_weapon = false;
    input.pause = false;
    input.look_delta = Vec2::ZERO;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::commands::PlayerCommand;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Command(PlayerCommand::StartGame))
            .unwrap();
        tx.send(GameLoopCommand::Input(InputState::default()))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Command(PlayerCommand::StartGame)
        ));
        assert!(matches!(commands[1], GameLoopCommand::Input(_)));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_merge_keeps_edges_until_consumed() {
        let mut pending = InputState::default();
        merge_input(
            &mut pending,
            &InputState {
                shoot_pressed: true,
                move_forward: true,
                ..Default::default()
            },
        );
        merge_input(&mut pending, &InputState::default());

        assert!(pending.shoot_pressed, "press survives a later release");
        assert!(!pending.move_forward, "held state follows the newest input");

        consume_edges(&mut pending);
        assert!(!pending.shoot_pressed);
    }

    #[test]
    fn test_look_delta_accumulates() {
        let mut pending = InputState::default();
        for _ in 0..3 {
            merge_input(
                &mut pending,
                &InputState {
                    look_delta: Vec2::new(2.0, -1.0),
                    ..Default::default()
                },
            );
        }
        assert_eq!(pending.look_delta, Vec2::new(6.0, -3.0));
        consume_edges(&mut pending);
        assert_eq!(pending.look_delta, Vec2::ZERO);
    }

    #[test]
    fn test_snapshot_serialization_under_5ms() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.queue_commands([PlayerCommand::AssetsLoaded, PlayerCommand::StartGame]);
        for _ in 0..300 {
            engine.tick(&InputState::default());
        }

        let snapshot = engine.tick(&InputState::default());
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(5),
            "Snapshot serialization took {:?}, should be <5ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_tick_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
