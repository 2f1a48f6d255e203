//! Application state shared between the front end and the simulation thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use arena_core::commands::{InputState, PlayerCommand};
use arena_core::state::GameStateSnapshot;
use arena_sim::SimConfig;

use crate::game_loop;

/// Messages sent to the simulation thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A menu-level command to forward to the engine.
    Command(PlayerCommand),
    /// Latest input snapshot. Merged with any input not yet consumed.
    Input(InputState),
    /// Shut down the simulation thread.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    #[error("simulation thread has stopped")]
    Disconnected,

    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("shared state lock poisoned")]
    Poisoned,
}

/// Front-end handle on the simulation thread.
///
/// `latest_snapshot` is shared with the thread for synchronous polling;
/// every snapshot is also delivered in order on the receiver returned by
/// `start`.
pub struct AppState {
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the simulation thread.
    pub fn start(&self, config: SimConfig) -> Result<mpsc::Receiver<GameStateSnapshot>, AppError> {
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(config, snapshot_tx, self.latest_snapshot.clone())?;

        *tx_lock = Some(cmd_tx);
        *self.thread.lock().map_err(|_| AppError::Poisoned)? = Some(handle);
        Ok(snapshot_rx)
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|tx| tx.is_some())
            .unwrap_or(false)
    }

    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.send(GameLoopCommand::Command(command))
    }

    pub fn send_input(&self, input: InputState) -> Result<(), AppError> {
        self.send(GameLoopCommand::Input(input))
    }

    /// Latest snapshot, if the thread has produced one.
    pub fn snapshot(&self) -> Result<Option<GameStateSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let tx = self
            .command_tx
            .lock()
            .map_err(|_| AppError::Poisoned)?
            .take();
        if let Some(tx) = tx {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }

        let handle = self.thread.lock().map_err(|_| AppError::Poisoned)?.take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| AppError::Disconnected)?;
        }
        Ok(())
    }

    fn send(&self, message: GameLoopCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx.send(message).map_err(|_| AppError::Disconnected),
            None => Err(AppError::NotStarted),
        }
    }
}
