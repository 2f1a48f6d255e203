//! Wave composition and spawn timing.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::constants::{
    BASIC_ENEMY_MIN_WEIGHT, ENEMY_SPAWN_MIN_PLAYER_DISTANCE, ENEMY_SPAWN_RADIUS,
    FAST_ENEMY_FIRST_WAVE, SHOOTER_ENEMY_FIRST_WAVE, TANK_ENEMY_FIRST_WAVE, WAVE_BASE_ENEMIES,
    WAVE_BASE_SPAWN_INTERVAL_SECS, WAVE_ENEMIES_PER_WAVE, WAVE_MIN_SPAWN_INTERVAL_SECS,
    WAVE_SPAWN_INTERVAL_STEP_SECS,
};
use arena_core::enums::EnemyType;
use arena_core::state::WaveView;

/// Enemies in wave `wave`: `floor(5 + 1.5 * wave)`.
pub fn enemy_count(wave: u32) -> u32 {
    (WAVE_BASE_ENEMIES + wave as f32 * WAVE_ENEMIES_PER_WAVE).floor() as u32
}

/// Seconds between spawns in wave `wave`, floored at 200ms.
pub fn spawn_interval(wave: u32) -> f32 {
    (WAVE_BASE_SPAWN_INTERVAL_SECS - wave as f32 * WAVE_SPAWN_INTERVAL_STEP_SECS)
        .max(WAVE_MIN_SPAWN_INTERVAL_SECS)
}

/// Normalized type weights for wave `wave`. Basic starts as the only type
/// and gives way as fast, tank and shooter phase in.
pub fn type_weights(wave: u32) -> [(EnemyType, f32); 4] {
    let phase_in = |first: u32, rate: f32, cap: f32| {
        if wave >= first {
            ((wave - first + 1) as f32 * rate).min(cap)
        } else {
            0.0
        }
    };

    let basic = (1.0 - wave.saturating_sub(1) as f32 * 0.1).max(BASIC_ENEMY_MIN_WEIGHT);
    let fast = phase_in(FAST_ENEMY_FIRST_WAVE, 0.1, 0.35);
    let tank = phase_in(TANK_ENEMY_FIRST_WAVE, 0.08, 0.3);
    let shooter = phase_in(SHOOTER_ENEMY_FIRST_WAVE, 0.08, 0.3);
    let total = basic + fast + tank + shooter;

    [
        (EnemyType::Basic, basic / total),
        (EnemyType::Fast, fast / total),
        (EnemyType::Tank, tank / total),
        (EnemyType::Shooter, shooter / total),
    ]
}

/// Weighted draw of an enemy type for wave `wave`.
pub fn pick_type(rng: &mut ChaCha8Rng, wave: u32) -> EnemyType {
    let roll: f32 = rng.gen();
    let mut acc = 0.0;
    let weights = type_weights(wave);
    for (kind, weight) in weights {
        acc += weight;
        if roll < acc {
            return kind;
        }
    }
    // Rounding left the roll past the last bucket.
    weights
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(kind, _)| *kind)
        .unwrap_or(EnemyType::Basic)
}

/// Point on the spawn ring, moved to the far side if it lands too close to
/// the player. `y` is left at 0; the caller lifts it by the enemy radius.
pub fn spawn_point(rng: &mut ChaCha8Rng, player: Vec3) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let point = Vec3::new(angle.sin(), 0.0, angle.cos()) * ENEMY_SPAWN_RADIUS;
    let flat_player = Vec3::new(player.x, 0.0, player.z);
    if point.distance_squared(flat_player)
        < ENEMY_SPAWN_MIN_PLAYER_DISTANCE * ENEMY_SPAWN_MIN_PLAYER_DISTANCE
    {
        -point
    } else {
        point
    }
}

/// Spawn the director should attempt this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub enemy_type: EnemyType,
    pub position: Vec3,
}

/// Progress of the current wave.
#[derive(Debug, Clone, Default)]
pub struct WaveSchedule {
    pub wave: u32,
    pub enemies_in_wave: u32,
    pub remaining_to_spawn: u32,
    pub spawn_timer: f32,
}

impl WaveSchedule {
    /// Start wave `wave`. The first enemy appears immediately.
    pub fn begin(&mut self, wave: u32) {
        self.wave = wave;
        self.enemies_in_wave = enemy_count(wave);
        self.remaining_to_spawn = self.enemies_in_wave;
        self.spawn_timer = 0.0;
    }

    /// Record a successful spawn.
    pub fn spawned(&mut self) {
        self.remaining_to_spawn = self.remaining_to_spawn.saturating_sub(1);
        self.spawn_timer = spawn_interval(self.wave);
    }

    /// Wave is over once the quota is spawned and nothing is left alive.
    pub fn is_complete(&self, active_enemies: usize) -> bool {
        self.wave > 0 && self.remaining_to_spawn == 0 && active_enemies == 0
    }

    pub fn view(&self, active_enemies: usize, transition_remaining_secs: f32) -> WaveView {
        WaveView {
            wave: self.wave,
            enemies_in_wave: self.enemies_in_wave,
            remaining_to_spawn: self.remaining_to_spawn,
            active_enemies: active_enemies as u32,
            transition_remaining_secs,
        }
    }
}

/// Count down the spawn timer. Returns an order when a spawn is due; the
/// timer is only restarted through `WaveSchedule::spawned`, so a spawn the
/// director had to skip is retried next tick.
pub fn run(
    schedule: &mut WaveSchedule,
    dt: f32,
    rng: &mut ChaCha8Rng,
    player: Vec3,
) -> Option<SpawnOrder> {
    if schedule.remaining_to_spawn == 0 {
        return None;
    }
    schedule.spawn_timer -= dt;
    if schedule.spawn_timer > 0.0 {
        return None;
    }

    Some(SpawnOrder {
        enemy_type: pick_type(rng, schedule.wave),
        position: spawn_point(rng, player),
    })
}
