//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Physics ---

/// Fixed physics sub-step (seconds).
pub const PHYSICS_FIXED_STEP: f32 = 1.0 / 60.0;

/// Maximum physics sub-steps per tick. Bounds worst-case cost after a frame hitch.
pub const PHYSICS_MAX_SUB_STEPS: u32 = 3;

/// Gravity along world Y (m/s²).
pub const GRAVITY: f32 = -9.82;

/// Extra margin added to bounding spheres when testing gameplay overlaps,
/// so bodies held apart by contact resolution still register as touching.
pub const CONTACT_SKIN: f32 = 0.05;

// --- Arena ---

/// Half extent of the square arena floor (meters).
pub const ARENA_HALF_EXTENT: f32 = 40.0;

/// Height of the arena boundary walls (meters).
pub const ARENA_WALL_HEIGHT: f32 = 4.0;

/// Thickness of the floor and boundary walls (meters).
pub const ARENA_WALL_THICKNESS: f32 = 1.0;

/// Distance from the arena center at which enemies spawn.
pub const ENEMY_SPAWN_RADIUS: f32 = 32.0;

/// Minimum distance between a fresh spawn and the player.
pub const ENEMY_SPAWN_MIN_PLAYER_DISTANCE: f32 = 12.0;

// --- Bullets ---

/// Lifespan after which a bullet self-destroys (seconds).
pub const BULLET_MAX_LIFESPAN: f32 = 3.0;

/// Speed of player-owned bullets (m/s).
pub const PLAYER_BULLET_SPEED: f32 = 60.0;

/// Speed of enemy-owned bullets (m/s).
pub const ENEMY_BULLET_SPEED: f32 = 25.0;

/// Bounding sphere radius of a bullet (meters).
pub const BULLET_RADIUS: f32 = 0.15;

/// Distance in front of the aim origin at which projectiles spawn.
pub const MUZZLE_OFFSET: f32 = 0.8;

// --- Enemies ---

/// Invincibility window after an enemy takes damage (seconds).
pub const ENEMY_INVINCIBILITY_SECS: f32 = 0.3;

/// Delay between entering Dying and returning to the pool (seconds).
pub const ENEMY_DEATH_DURATION_SECS: f32 = 1.5;

/// Shortest randomized idle duration (seconds).
pub const ENEMY_IDLE_MIN_SECS: f32 = 1.0;

/// Longest randomized idle duration (seconds).
pub const ENEMY_IDLE_MAX_SECS: f32 = 3.0;

/// Facing interpolation rate while chasing (per second).
pub const ENEMY_TURN_RATE: f32 = 5.0;

/// Fraction of the shoot interval a ranged enemy waits after entering Attacking.
pub const ENEMY_SHOOT_PREARM_FRACTION: f32 = 0.5;

/// Interval between melee strikes while Attacking (seconds).
pub const ENEMY_MELEE_INTERVAL_SECS: f32 = 1.0;

/// Height above the enemy's origin from which ranged shots leave.
pub const ENEMY_MUZZLE_HEIGHT: f32 = 0.3;

// --- Player ---

/// Player maximum health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Player collision sphere radius (meters).
pub const PLAYER_RADIUS: f32 = 0.5;

/// Player body mass (kg).
pub const PLAYER_MASS: f32 = 70.0;

/// Linear damping applied to the player body (fraction of velocity lost per second).
pub const PLAYER_LINEAR_DAMPING: f32 = 0.9;

/// Eye height above the body center used as the aim origin (meters).
pub const PLAYER_EYE_HEIGHT: f32 = 0.6;

/// Invincibility window after the player takes damage (seconds).
pub const PLAYER_INVINCIBILITY_SECS: f32 = 0.5;

/// Pointer-look sensitivity (radians per pixel of pointer delta).
pub const LOOK_SENSITIVITY: f32 = 0.002;

/// Pitch clamp: just short of straight up/down.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Horizontal acceleration applied by movement input (m/s²).
pub const MOVE_ACCELERATION: f32 = 60.0;

/// Fraction of movement acceleration available while airborne.
pub const AIR_CONTROL: f32 = 0.3;

/// Maximum horizontal speed before speed multipliers (m/s).
pub const PLAYER_MAX_SPEED: f32 = 8.0;

/// Vertical velocity set when jumping (m/s).
pub const JUMP_SPEED: f32 = 7.0;

/// Minimum dot(contact normal, up) for a contact to count as ground.
pub const GROUND_NORMAL_THRESHOLD: f32 = 0.5;

// --- Power-ups ---

/// Power-up collection sphere radius (meters).
pub const POWER_UP_RADIUS: f32 = 0.6;

/// Height of a power-up's rest position above the floor (meters).
pub const POWER_UP_HEIGHT: f32 = 0.8;

/// Vertical bob amplitude (meters).
pub const POWER_UP_BOB_AMPLITUDE: f32 = 0.25;

/// Bob angular frequency (radians per second).
pub const POWER_UP_BOB_SPEED: f32 = 2.0;

/// Yaw rotation speed (radians per second).
pub const POWER_UP_ROTATION_SPEED: f32 = 1.5;

// --- Waves ---

/// Enemy count for a wave is floor(WAVE_BASE_ENEMIES + wave * WAVE_ENEMIES_PER_WAVE).
pub const WAVE_BASE_ENEMIES: f32 = 5.0;

/// Additional enemies per wave number.
pub const WAVE_ENEMIES_PER_WAVE: f32 = 1.5;

/// Spawn interval for wave 0 (seconds).
pub const WAVE_BASE_SPAWN_INTERVAL_SECS: f32 = 2.0;

/// Spawn interval reduction per wave number (seconds).
pub const WAVE_SPAWN_INTERVAL_STEP_SECS: f32 = 0.15;

/// Spawn interval floor (seconds).
pub const WAVE_MIN_SPAWN_INTERVAL_SECS: f32 = 0.2;

/// Duration of the wave transition countdown (seconds).
pub const WAVE_TRANSITION_SECS: f32 = 3.0;

/// First wave in which fast enemies appear.
pub const FAST_ENEMY_FIRST_WAVE: u32 = 2;

/// First wave in which tank enemies appear.
pub const TANK_ENEMY_FIRST_WAVE: u32 = 3;

/// First wave in which shooter enemies appear.
pub const SHOOTER_ENEMY_FIRST_WAVE: u32 = 5;

/// Floor for the basic-enemy spawn weight.
pub const BASIC_ENEMY_MIN_WEIGHT: f32 = 0.2;
