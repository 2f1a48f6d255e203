//! Pooled enemy driven by the behavior FSM.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use arena_core::config::EnemyConfig;
use arena_core::constants::{
    ENEMY_DEATH_DURATION_SECS, ENEMY_IDLE_MAX_SECS, ENEMY_IDLE_MIN_SECS, ENEMY_INVINCIBILITY_SECS,
    ENEMY_MELEE_INTERVAL_SECS, ENEMY_MUZZLE_HEIGHT, ENEMY_SHOOT_PREARM_FRACTION, MUZZLE_OFFSET,
};
use arena_core::enums::{EnemyState, EnemyType};
use arena_core::events::GameEvent;
use arena_core::types::{facing_rotation, BoundingSphere, EntityRef, Transform};
use arena_enemy_ai::fsm::{self, AttackClock, EnemyContext, MAX_TRANSITIONS_PER_TICK};
use arena_enemy_ai::profiles::BehaviorProfile;
use arena_enemy_ai::steering;
use arena_physics::{BodyDesc, BodyHandle, BodyType, PhysicsWorld, Shape};

use crate::pool::Poolable;

/// Attack produced by an enemy this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    /// Ranged enemy wants a projectile spawned.
    Fire {
        origin: Vec3,
        direction: Vec3,
        damage: f32,
    },
    /// Melee enemy hits the player directly.
    Strike { damage: f32 },
}

/// An enemy. Its kinematic body is created on first reset and reused.
#[derive(Debug, Clone)]
pub struct Enemy {
    entity: EntityRef,
    enemy_type: EnemyType,
    config: EnemyConfig,
    profile: BehaviorProfile,
    body: Option<BodyHandle>,
    transform: Transform,
    facing: Vec3,
    velocity: Vec3,
    health: f32,
    state: EnemyState,
    idle_remaining: f32,
    death_remaining: f32,
    invincible_remaining: f32,
    attack_clock: AttackClock,
    destroyed: bool,
}

impl Enemy {
    /// New pooled (inactive) enemy.
    pub fn new(entity: EntityRef) -> Self {
        let config = EnemyConfig::minimal();
        Self {
            entity,
            enemy_type: EnemyType::Basic,
            profile: BehaviorProfile::from_config(&config),
            config,
            body: None,
            transform: Transform::default(),
            facing: Vec3::NEG_Z,
            velocity: Vec3::ZERO,
            health: 0.0,
            state: EnemyState::Inactive,
            idle_remaining: 0.0,
            death_remaining: 0.0,
            invincible_remaining: 0.0,
            attack_clock: AttackClock::new(ENEMY_MELEE_INTERVAL_SECS),
            destroyed: true,
        }
    }

    /// Activate as `enemy_type` at `position` with fresh stats, in Idle.
    pub fn reset(
        &mut self,
        enemy_type: EnemyType,
        config: &EnemyConfig,
        position: Vec3,
        physics: &mut PhysicsWorld,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        if !position.is_finite() {
            warn!(entity = %self.entity, ?position, "rejected enemy reset");
            self.deactivate(physics);
            return false;
        }

        self.enemy_type = enemy_type;
        self.config = config.clone();
        self.profile = BehaviorProfile::from_config(config);
        self.health = config.health;
        self.invincible_remaining = 0.0;
        self.death_remaining = 0.0;
        self.attack_clock = AttackClock::new(match config.ranged {
            Some(ranged) => ranged.interval,
            None => ENEMY_MELEE_INTERVAL_SECS,
        });

        let shape = Shape::Sphere {
            radius: config.radius,
        };
        let body = match self.body {
            Some(body) if physics.contains(body) => {
                physics.set_shape(body, shape);
                body
            }
            _ => {
                let body = physics.add_body(BodyDesc::new(BodyType::Kinematic, shape, self.entity));
                self.body = Some(body);
                body
            }
        };
        physics.set_position(body, position);
        physics.set_enabled(body, true);

        self.transform = Transform::from_position(position);
        self.destroyed = false;
        self.state = EnemyState::Idle;
        self.enter_idle(rng);
        self.write_body(physics);
        true
    }

    /// Run one tick of behavior. `target` is the player position, `None`
    /// when there is no live player.
    pub fn update(
        &mut self,
        dt: f32,
        target: Option<Vec3>,
        physics: &mut PhysicsWorld,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) -> Option<EnemyAction> {
        if self.destroyed || self.state == EnemyState::Inactive {
            return None;
        }

        self.invincible_remaining = (self.invincible_remaining - dt).max(0.0);
        match self.state {
            EnemyState::Idle => self.idle_remaining -= dt,
            EnemyState::Dying => self.death_remaining -= dt,
            _ => {}
        }

        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let update = fsm::evaluate(&self.context(target));
            if !update.state_changed {
                break;
            }
            let from = self.state;
            self.enter(update.new_state, rng);
            events.push(GameEvent::EnemyStateChanged {
                entity: self.entity,
                from,
                to: update.new_state,
            });
            if from == update.new_state {
                break;
            }
        }

        let action = match (self.state, target) {
            (EnemyState::Chasing, Some(target)) => {
                self.chase(target, dt);
                None
            }
            (EnemyState::Attacking, Some(target)) => self.attack(target, dt),
            _ => None,
        };

        self.write_body(physics);
        action
    }

    /// Apply damage. Ignored while invincible, dying or inactive. Returns
    /// the amount applied.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0
            || self.destroyed
            || self.state.is_terminal()
            || self.invincible_remaining > 0.0
        {
            return 0.0;
        }

        let applied = amount.min(self.health);
        self.health = (self.health - amount).max(0.0);
        self.invincible_remaining = ENEMY_INVINCIBILITY_SECS;

        if self.health <= 0.0 {
            self.enter_dying();
        }
        applied
    }

    /// Copy the body pose into the visual transform.
    pub fn sync_transform(&mut self, physics: &PhysicsWorld) {
        if let Some(transform) = self.body.and_then(|b| physics.transform(b)) {
            self.transform = transform;
        }
    }

    fn context(&self, target: Option<Vec3>) -> EnemyContext {
        EnemyContext {
            state: self.state,
            profile: self.profile,
            position: self.transform.position,
            target,
            health: self.health,
            idle_remaining: self.idle_remaining,
            death_remaining: self.death_remaining,
        }
    }

    fn enter(&mut self, state: EnemyState, rng: &mut ChaCha8Rng) {
        self.state = state;
        match state {
            EnemyState::Idle => self.enter_idle(rng),
            EnemyState::Chasing => {}
            EnemyState::Attacking => {
                self.velocity = Vec3::ZERO;
                if self.profile.ranged {
                    self.attack_clock.prearm(ENEMY_SHOOT_PREARM_FRACTION);
                } else {
                    self.attack_clock.reset();
                }
            }
            EnemyState::Dying => self.enter_dying(),
            EnemyState::Inactive => {
                self.velocity = Vec3::ZERO;
                self.destroy();
                debug!(entity = %self.entity, "death sequence finished");
            }
        }
    }

    fn enter_idle(&mut self, rng: &mut ChaCha8Rng) {
        self.idle_remaining = rng.gen_range(ENEMY_IDLE_MIN_SECS..ENEMY_IDLE_MAX_SECS);
        let heading = rng.gen_range(0.0..std::f32::consts::TAU);
        self.facing = Vec3::new(-heading.sin(), 0.0, -heading.cos());
        self.velocity = Vec3::ZERO;
    }

    fn enter_dying(&mut self) {
        self.state = EnemyState::Dying;
        self.death_remaining = ENEMY_DEATH_DURATION_SECS;
        self.velocity = Vec3::ZERO;
    }

    fn chase(&mut self, target: Vec3, dt: f32) {
        if let Some(desired) = steering::direction_to(self.transform.position, target) {
            self.facing = steering::turn_towards(self.facing, desired, self.profile.turn_rate, dt);
        }
        self.velocity = steering::velocity_along(self.facing, self.config.speed);
    }

    fn attack(&mut self, target: Vec3, dt: f32) -> Option<EnemyAction> {
        if let Some(desired) = steering::direction_to(self.transform.position, target) {
            self.facing = desired;
        }
        self.velocity = Vec3::ZERO;

        if !self.attack_clock.tick(dt) {
            return None;
        }

        match self.config.ranged {
            Some(ranged) => {
                let origin = self.transform.position
                    + Vec3::Y * ENEMY_MUZZLE_HEIGHT
                    + self.facing * MUZZLE_OFFSET;
                let direction = (target - origin).try_normalize().unwrap_or(self.facing);
                Some(EnemyAction::Fire {
                    origin,
                    direction,
                    damage: ranged.damage,
                })
            }
            None => Some(EnemyAction::Strike {
                damage: self.config.collision_damage,
            }),
        }
    }

    fn write_body(&self, physics: &mut PhysicsWorld) {
        if let Some(body) = self.body {
            physics.set_velocity(body, self.velocity);
            physics.set_rotation(body, facing_rotation(self.facing));
        }
    }

    pub fn enemy_type(&self) -> EnemyType {
        self.enemy_type
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.config.health
    }

    pub fn score_value(&self) -> u32 {
        self.config.score_value
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_remaining > 0.0
    }

    /// Whether the enemy can still hurt or be hurt.
    pub fn is_alive(&self) -> bool {
        !self.destroyed && !self.state.is_terminal()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn bounds(&self) -> BoundingSphere {
        BoundingSphere::new(self.transform.position, self.config.radius)
    }

    pub fn model(&self) -> String {
        format!("enemy_{}", self.enemy_type.id())
    }
}

impl Poolable for Enemy {
    fn entity_ref(&self) -> EntityRef {
        self.entity
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn body(&self) -> Option<BodyHandle> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::config::GameConfig;
    use arena_core::constants::DT;
    use arena_core::enums::EntityKind;
    use rand::SeedableRng;

    struct Rig {
        physics: PhysicsWorld,
        rng: ChaCha8Rng,
        events: Vec<GameEvent>,
        enemy: Enemy,
    }

    impl Rig {
        fn new(enemy_type: EnemyType, position: Vec3) -> Self {
            let config = GameConfig::default();
            let mut rig = Rig {
                physics: PhysicsWorld::new(),
                rng: ChaCha8Rng::seed_from_u64(7),
                events: Vec::new(),
                enemy: Enemy::new(EntityRef::new(EntityKind::Enemy, 0)),
            };
            let enemy_config = config.enemy(enemy_type).unwrap();
            assert!(rig.enemy.reset(
                enemy_type,
                enemy_config,
                position,
                &mut rig.physics,
                &mut rig.rng
            ));
            rig
        }

        fn tick(&mut self, target: Option<Vec3>) -> Option<EnemyAction> {
            let action =
                self.enemy
                    .update(DT, target, &mut self.physics, &mut self.rng, &mut self.events);
            self.physics.step(DT);
            self.enemy.sync_transform(&self.physics);
            action
        }
    }

    #[test]
    fn test_reset_starts_idle_with_fresh_stats() {
        let rig = Rig::new(EnemyType::Tank, Vec3::new(0.0, 1.0, -20.0));
        let e = &rig.enemy;
        assert_eq!(e.state(), EnemyState::Idle);
        assert_eq!(e.health(), 60.0);
        assert!(!e.is_destroyed());
        assert!(rig.physics.is_enabled(e.body().unwrap()));
        assert_eq!(e.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_damage_within_invincibility_window_counts_once() {
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -50.0));
        assert_eq!(rig.enemy.take_damage(5.0), 5.0);
        assert_eq!(rig.enemy.take_damage(5.0), 0.0);
        for _ in 0..10 {
            rig.tick(None);
        }
        assert_eq!(rig.enemy.take_damage(5.0), 0.0, "still inside 300ms");
        assert_eq!(rig.enemy.health(), 10.0);

        for _ in 0..10 {
            rig.tick(None);
        }
        assert_eq!(rig.enemy.take_damage(5.0), 5.0);
        assert_eq!(rig.enemy.health(), 5.0);
    }

    #[test]
    fn test_lethal_damage_enters_dying_then_inactive() {
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -50.0));
        rig.enemy.take_damage(100.0);
        assert_eq!(rig.enemy.health(), 0.0);
        assert_eq!(rig.enemy.state(), EnemyState::Dying);
        assert_eq!(rig.enemy.take_damage(5.0), 0.0);

        // 1.5s is 90 ticks
        for _ in 0..85 {
            rig.tick(Some(Vec3::ZERO));
        }
        assert_eq!(rig.enemy.state(), EnemyState::Dying, "player nearby does not matter");
        for _ in 0..10 {
            rig.tick(Some(Vec3::ZERO));
        }
        assert_eq!(rig.enemy.state(), EnemyState::Inactive);
        assert!(rig.enemy.is_destroyed());
    }

    #[test]
    fn test_chasing_turns_gradually_and_moves() {
        // Player behind the enemy's start position, inside chase range
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -10.0));
        let start = rig.enemy.position();
        rig.tick(Some(Vec3::new(0.0, 0.5, 0.0)));
        assert_eq!(rig.enemy.state(), EnemyState::Chasing);

        for _ in 0..60 {
            rig.tick(Some(Vec3::new(0.0, 0.5, 0.0)));
        }
        assert!(rig.enemy.facing().dot(Vec3::Z) > 0.95, "should face the player");
        assert!(rig.enemy.position().z > start.z, "should close in");
        assert!((rig.enemy.position().y - start.y).abs() < 1e-5, "stays on its plane");
    }

    #[test]
    fn test_melee_enemy_strikes_on_interval() {
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -1.0));
        let target = Some(Vec3::new(0.0, 0.5, 0.0));

        let mut strikes = 0;
        for _ in 0..130 {
            if let Some(EnemyAction::Strike { damage }) = rig.tick(target) {
                assert_eq!(damage, 10.0);
                strikes += 1;
            }
        }
        assert_eq!(rig.enemy.state(), EnemyState::Attacking);
        assert_eq!(strikes, 2);
    }

    #[test]
    fn test_shooter_fires_toward_player() {
        let mut rig = Rig::new(EnemyType::Shooter, Vec3::new(0.0, 0.6, -10.0));
        let target = Vec3::new(0.0, 0.5, 0.0);

        let mut shot = None;
        for _ in 0..120 {
            if let Some(action) = rig.tick(Some(target)) {
                shot = Some(action);
                break;
            }
        }
        let Some(EnemyAction::Fire {
            origin,
            direction,
            damage,
        }) = shot
        else {
            panic!("shooter should fire within a second of attacking: {shot:?}");
        };
        assert_eq!(damage, 5.0);
        assert!(direction.z > 0.99);
        assert!(origin.z > -10.0);
    }

    #[test]
    fn test_missing_player_degrades_to_idle() {
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -5.0));
        rig.tick(Some(Vec3::ZERO));
        assert_eq!(rig.enemy.state(), EnemyState::Chasing);

        rig.tick(None);
        assert_eq!(rig.enemy.state(), EnemyState::Idle);
        assert_eq!(rig.enemy.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_idle_wander_picks_new_heading() {
        let mut rig = Rig::new(EnemyType::Basic, Vec3::new(0.0, 0.6, -50.0));
        let first = rig.enemy.facing();
        for _ in 0..(ENEMY_IDLE_MAX_SECS / DT) as usize + 2 {
            rig.tick(None);
        }
        assert_eq!(rig.enemy.state(), EnemyState::Idle);
        assert_ne!(rig.enemy.facing(), first);
        let rewandered = rig.events.iter().any(|e| {
            matches!(
                e,
                GameEvent::EnemyStateChanged {
                    from: EnemyState::Idle,
                    to: EnemyState::Idle,
                    ..
                }
            )
        });
        assert!(rewandered);
    }

    #[test]
    fn test_reuse_resizes_body() {
        let mut rig = Rig::new(EnemyType::Fast, Vec3::new(0.0, 0.45, -50.0));
        let body = rig.enemy.body().unwrap();
        rig.enemy.deactivate(&mut rig.physics);
        assert!(!rig.physics.is_enabled(body));

        let config = GameConfig::default();
        rig.enemy.reset(
            EnemyType::Tank,
            config.enemy(EnemyType::Tank).unwrap(),
            Vec3::new(0.0, 1.0, -50.0),
            &mut rig.physics,
            &mut rig.rng,
        );
        assert_eq!(rig.enemy.body(), Some(body));
        assert_eq!(rig.enemy.bounds().radius, 1.0);
        assert!(rig.physics.is_enabled(body));
    }
}
