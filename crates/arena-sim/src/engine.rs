//! Simulation engine: the director of the arena.
//!
//! `SimulationEngine` owns the physics world, pools, active lists and the
//! player, processes commands, runs all systems in a fixed order and
//! produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use arena_core::commands::{InputState, PlayerCommand};
use arena_core::config::{EnemyConfig, GameConfig};
use arena_core::constants::{DT, WAVE_TRANSITION_SECS};
use arena_core::enums::{EnemyType, GameState, NoticeLevel, Owner, PowerUpKind};
use arena_core::events::GameEvent;
use arena_core::state::GameStateSnapshot;
use arena_core::types::{EntityRef, SimTime};
use arena_physics::PhysicsWorld;

use crate::controller::{ControllerConfig, PlayerController};
use crate::entities::{ActiveEntities, EnemyAction, Player};
use crate::error::InvariantViolation;
use crate::pool::{EntityPool, Poolable, Pools};
use crate::score::ScoreState;
use crate::systems;
use crate::systems::wave_spawner::WaveSchedule;
use crate::weapons::{ProjectileRequest, WeaponManager};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Enemy, power-up and weapon tables.
    pub config: GameConfig,
    pub controller: ControllerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            config: GameConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

/// The simulation engine. Owns all sim state.
pub struct SimulationEngine {
    config: GameConfig,
    physics: PhysicsWorld,
    time: SimTime,
    state: GameState,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,

    player: Player,
    controller: PlayerController,
    weapons: WeaponManager,
    projectile_requests: Vec<ProjectileRequest>,

    pools: Pools,
    active: ActiveEntities,

    waves: WaveSchedule,
    transition_remaining: f32,
    score: ScoreState,
}

impl SimulationEngine {
    /// Create a new engine in the Loading state.
    pub fn new(config: SimConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        world_setup::build_arena(&mut physics);
        let player = Player::new(&mut physics, world_setup::PLAYER_SPAWN);
        let weapons = WeaponManager::new(&config.config.weapons);

        Self {
            config: config.config,
            physics,
            time: SimTime::default(),
            state: GameState::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            player,
            controller: PlayerController::new(config.controller),
            weapons,
            projectile_requests: Vec::new(),
            pools: Pools::new(),
            active: ActiveEntities::default(),
            waves: WaveSchedule::default(),
            transition_remaining: 0.0,
            score: ScoreState::default(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self, input: &InputState) -> GameStateSnapshot {
        self.process_commands();
        if input.pause {
            self.toggle_pause();
        }

        if self.state.runs_simulation() {
            self.run_systems(input);
            self.time.advance(DT);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.time,
            self.state,
            self.waves
                .view(self.active.enemies.len(), self.transition_remaining),
            &self.score,
            &self.player,
            &self.controller,
            &self.weapons,
            &self.active,
            events,
        )
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn weapons(&self) -> &WeaponManager {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponManager {
        &mut self.weapons
    }

    pub fn active(&self) -> &ActiveEntities {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveEntities {
        &mut self.active
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn waves(&self) -> &WaveSchedule {
        &self.waves
    }

    /// Place an enemy using the configured stats for its type.
    pub fn spawn_enemy(&mut self, enemy_type: EnemyType, position: Vec3) -> Option<EntityRef> {
        let config = self.config.enemy_or_minimal(enemy_type).into_owned();
        self.spawn_enemy_with(enemy_type, &config, position)
    }

    /// Place an enemy with explicit stats.
    pub fn spawn_enemy_with(
        &mut self,
        enemy_type: EnemyType,
        config: &EnemyConfig,
        position: Vec3,
    ) -> Option<EntityRef> {
        world_setup::spawn_enemy(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &mut self.rng,
            enemy_type,
            config,
            position,
            &mut self.events,
        )
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, position: Vec3) -> Option<EntityRef> {
        world_setup::spawn_power_up(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &self.config,
            kind,
            position,
            &mut self.events,
        )
    }

    pub fn spawn_projectile(&mut self, request: ProjectileRequest) -> Option<EntityRef> {
        world_setup::spawn_projectile(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &request,
            &mut self.events,
        )
    }

    /// Verify the active/pooled lifecycle: active entities are live with
    /// their bodies in the world, pooled ones are destroyed with their
    /// bodies out of it.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        check_active(&self.active.bullets, &self.physics)?;
        check_active(&self.active.enemies, &self.physics)?;
        check_active(&self.active.power_ups, &self.physics)?;
        check_pooled(&self.pools.bullets, &self.physics)?;
        check_pooled(&self.pools.enemies, &self.physics)?;
        check_pooled(&self.pools.power_ups, &self.physics)?;
        Ok(())
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::AssetsLoaded => {
                self.transition(GameState::Title);
            }
            PlayerCommand::AssetLoadFailed { reason } => {
                warn!(%reason, "asset loading failed, continuing with defaults");
                self.events.push(GameEvent::Notice {
                    level: NoticeLevel::Error,
                    key: "notice.asset_load_failed".to_string(),
                });
                self.transition(GameState::Title);
            }
            PlayerCommand::StartGame => {
                if matches!(self.state, GameState::Title | GameState::GameOver) {
                    self.start_session();
                }
            }
            PlayerCommand::Pause => {
                if self.state == GameState::Playing {
                    self.transition(GameState::Paused);
                }
            }
            PlayerCommand::Resume => {
                if self.state == GameState::Paused {
                    self.transition(GameState::Playing);
                }
            }
            PlayerCommand::TogglePause => self.toggle_pause(),
            PlayerCommand::ReturnToTitle => {
                if matches!(self.state, GameState::Paused | GameState::GameOver) {
                    systems::cleanup::clear_all(
                        &mut self.active,
                        &mut self.pools,
                        &mut self.physics,
                        &mut self.events,
                    );
                    self.transition_remaining = 0.0;
                    self.transition(GameState::Title);
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.transition(GameState::Paused);
            }
            GameState::Paused => {
                self.transition(GameState::Playing);
            }
            _ => {}
        }
    }

    /// Move along an edge of the game-state graph. Illegal edges are
    /// logged and ignored.
    fn transition(&mut self, next: GameState) -> bool {
        let from = self.state;
        if from == next {
            return false;
        }
        if !from.can_transition_to(next) {
            warn!(?from, to = ?next, "illegal game-state transition ignored");
            return false;
        }
        info!(?from, to = ?next, "game state changed");
        self.state = next;
        self.events.push(GameEvent::StateChanged { from, to: next });
        true
    }

    /// Fresh session from Title or GameOver, starting with the countdown to
    /// wave 1.
    fn start_session(&mut self) {
        systems::cleanup::clear_all(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &mut self.events,
        );
        self.player.reset(&mut self.physics);
        self.controller.reset();
        self.weapons.reset();
        self.projectile_requests.clear();
        self.score = ScoreState::default();
        self.waves = WaveSchedule::default();
        self.time = SimTime::default();
        self.transition_remaining = WAVE_TRANSITION_SECS;
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.transition(GameState::WaveTransition);
    }

    fn start_next_wave(&mut self) {
        let wave = self.waves.wave + 1;
        self.waves.begin(wave);
        self.transition_remaining = 0.0;
        info!(wave, enemies = self.waves.enemies_in_wave, "wave started");
        self.events.push(GameEvent::WaveStarted {
            wave,
            enemy_count: self.waves.enemies_in_wave,
        });
        self.transition(GameState::Playing);
    }

    /// Run all systems in order.
    fn run_systems(&mut self, input: &InputState) {
        let dt = DT;
        let now = self.time.elapsed_secs;

        // 1. Player timers and weapon cooldown
        self.player.update(dt, now);
        self.weapons.update(dt);

        // 2. Input
        let outcome = self.controller.update(
            input,
            dt,
            now,
            &mut self.player,
            &mut self.physics,
            &mut self.weapons,
            &mut self.projectile_requests,
        );
        if let Some(id) = self.weapons.equipped_id() {
            if outcome.switched {
                self.events.push(GameEvent::WeaponSwitched {
                    weapon_id: id.to_string(),
                });
            }
            if outcome.fired {
                self.score.shots_fired += 1;
                self.events.push(GameEvent::WeaponFired {
                    weapon_id: id.to_string(),
                });
            }
        }

        // 3. Wave spawning
        if self.state == GameState::Playing {
            self.spawn_due_enemy(dt);
        }

        // 4. Enemy AI
        let target = self.player.is_alive().then(|| self.player.position());
        for enemy in &mut self.active.enemies {
            let action = enemy.update(
                dt,
                target,
                &mut self.physics,
                &mut self.rng,
                &mut self.events,
            );
            match action {
                Some(EnemyAction::Fire {
                    origin,
                    direction,
                    damage,
                }) => self.projectile_requests.push(ProjectileRequest {
                    origin,
                    direction,
                    damage,
                    owner: Owner::Enemy,
                }),
                Some(EnemyAction::Strike { damage }) => {
                    let applied = self.player.take_damage(damage, now);
                    if applied > 0.0 {
                        self.events.push(GameEvent::PlayerDamaged {
                            amount: applied,
                            health: self.player.health(),
                        });
                    }
                }
                None => {}
            }
        }

        // 5. Projectile spawns requested this tick
        for request in self.projectile_requests.drain(..) {
            world_setup::spawn_projectile(
                &mut self.active,
                &mut self.pools,
                &mut self.physics,
                &request,
                &mut self.events,
            );
        }

        // 6. Bullets and pickups
        for bullet in &mut self.active.bullets {
            bullet.update(dt);
        }
        for power_up in &mut self.active.power_ups {
            power_up.update(dt);
        }

        // 7. Physics step, then project bodies onto transforms
        self.physics.step(dt);
        let contacts = self.physics.drain_collisions();
        self.player.sync_transform(&self.physics);
        for enemy in &mut self.active.enemies {
            enemy.sync_transform(&self.physics);
        }

        // 8. Collision dispatch
        systems::collision::run(
            &mut self.active,
            &mut self.player,
            &mut self.controller,
            &contacts,
            &self.physics,
            now,
            &mut self.events,
        );

        // 9. Cleanup
        systems::cleanup::run(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &self.config,
            &mut self.rng,
            &mut self.score,
            &mut self.events,
        );
        debug_assert!(
            self.check_invariants().is_ok(),
            "after cleanup: {:?}",
            self.check_invariants()
        );

        // 10. Game-state transitions
        self.check_transitions(dt);
    }

    fn spawn_due_enemy(&mut self, dt: f32) {
        let Some(order) = systems::wave_spawner::run(
            &mut self.waves,
            dt,
            &mut self.rng,
            self.player.position(),
        ) else {
            return;
        };

        let config = self.config.enemy_or_minimal(order.enemy_type);
        let position = order.position + Vec3::Y * config.radius;

        let spawned = world_setup::spawn_enemy(
            &mut self.active,
            &mut self.pools,
            &mut self.physics,
            &mut self.rng,
            order.enemy_type,
            &config,
            position,
            &mut self.events,
        );
        if spawned.is_some() {
            self.waves.spawned();
        }
    }

    fn check_transitions(&mut self, dt: f32) {
        if !self.player.is_alive() {
            info!(score = self.score.score, wave = self.waves.wave, "player died");
            self.transition(GameState::GameOver);
            return;
        }

        match self.state {
            GameState::Playing => {
                if self.waves.is_complete(self.active.enemies.len()) {
                    info!(wave = self.waves.wave, "wave completed");
                    self.events.push(GameEvent::WaveCompleted {
                        wave: self.waves.wave,
                    });
                    self.transition_remaining = WAVE_TRANSITION_SECS;
                    self.transition(GameState::WaveTransition);
                }
            }
            GameState::WaveTransition => {
                self.transition_remaining = (self.transition_remaining - dt).max(0.0);
                if self.transition_remaining <= 0.0 {
                    self.start_next_wave();
                }
            }
            _ => {}
        }
    }
}

fn check_active<T: Poolable>(
    list: &[T],
    physics: &PhysicsWorld,
) -> Result<(), InvariantViolation> {
    for item in list {
        if item.is_destroyed() {
            return Err(InvariantViolation::DestroyedButActive(item.entity_ref()));
        }
        if item.body().is_some_and(|b| !physics.is_enabled(b)) {
            return Err(InvariantViolation::ActiveBodyDisabled(item.entity_ref()));
        }
    }
    Ok(())
}

fn check_pooled<T: Poolable>(
    pool: &EntityPool<T>,
    physics: &PhysicsWorld,
) -> Result<(), InvariantViolation> {
    for item in pool.iter_free() {
        if !item.is_destroyed() {
            return Err(InvariantViolation::PooledButLive(item.entity_ref()));
        }
        if item.body().is_some_and(|b| physics.is_enabled(b)) {
            return Err(InvariantViolation::PooledBodyEnabled(item.entity_ref()));
        }
    }
    Ok(())
}
